//! Generation request and result models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::platform::PlatformId;
use crate::policy::PolicyConfig;

/// One intermediate document produced by the generation pipeline.
///
/// Drafts arrive in pipeline order; the last entry is the candidate the
/// final content was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Pipeline stage that produced this draft (e.g. "generator", "critic").
    pub stage: String,
    /// Model that produced it.
    pub model: String,
    pub content: String,
}

/// Failure categories reported per platform by the generation backend.
///
/// Wire codes are SCREAMING_SNAKE_CASE. Codes this client does not know
/// degrade to `Unknown` so a newer backend never breaks an older client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    RateLimit,
    Timeout,
    NetworkError,
    InvalidApiKey,
    ValidationFailed,
    ProviderError,
    AllModelsFailed,
    CircuitOpen,
    Unknown,
}

impl ErrorKind {
    /// Parses a backend error code, falling back to `Unknown`.
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or(Self::Unknown)
    }

    /// The fixed user-facing message for this kind, or `None` when the
    /// backend-provided message should be shown instead.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::RateLimit => Some("AI model is rate limited. Try again in a minute."),
            Self::Timeout => Some("Request timed out. The AI is taking too long."),
            Self::NetworkError => Some("Network connection failed."),
            Self::InvalidApiKey => Some("API key is missing or invalid."),
            Self::ValidationFailed => {
                Some("Generated content did not meet platform requirements.")
            }
            Self::CircuitOpen => Some("AI model temporarily unavailable."),
            Self::AllModelsFailed => Some("All AI models failed to generate content."),
            Self::ProviderError | Self::Unknown => None,
        }
    }
}

/// A batched generation request across one or more platforms.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub idea_text: String,
    pub platforms: Vec<PlatformId>,
    /// Policies for requested platforms only. Platforms absent from the map
    /// let the backend pick its defaults.
    pub policies: BTreeMap<PlatformId, PolicyConfig>,
}

/// Terminal result of one platform's generation within a batch.
///
/// Exactly one of success or failure, by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlatformOutcome {
    Succeeded {
        /// Intermediate pipeline drafts, oldest first. Empty when the
        /// backend omits them.
        drafts: Vec<Draft>,
        final_content: String,
        model_used: Option<String>,
    },
    Failed {
        kind: ErrorKind,
        /// Backend-provided detail, shown verbatim when `kind` has no fixed
        /// user message.
        message: String,
    },
}

impl PlatformOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// The message to surface for a failed outcome.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Failed { kind, message } => Some(
                kind.user_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| message.clone()),
            ),
            Self::Succeeded { .. } => None,
        }
    }
}

/// One platform's entry in a batch response.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformResult {
    pub platform: PlatformId,
    pub outcome: PlatformOutcome,
}

/// Read model of one platform's slot in a composer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformStatus {
    /// Never generated in this session.
    Idle,
    /// A request covering this platform is in flight.
    Pending,
    Succeeded,
    Failed,
}

/// Aggregate classification of one batch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded { total: usize },
    Partial { succeeded: usize, failed: usize },
    AllFailed { total: usize },
}

impl BatchOutcome {
    /// Classifies the entries of a single response. Results from earlier
    /// batches never participate.
    pub fn classify(results: &[PlatformResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.outcome.is_success()).count();
        let failed = results.len() - succeeded;
        if failed == 0 {
            Self::AllSucceeded { total: succeeded }
        } else if succeeded == 0 {
            Self::AllFailed { total: failed }
        } else {
            Self::Partial { succeeded, failed }
        }
    }
}
