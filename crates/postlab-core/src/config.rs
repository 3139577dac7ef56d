//! Runtime configuration model for the client core.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::platform::{PlatformCatalog, PlatformId};
use crate::policy::PolicyConfig;

/// Backend endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the content service, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds. Generation runs a multi-stage
    /// pipeline per platform, so the default is generous.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ApiConfig {
    /// The HTTP request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Preference sync settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Quiet period after the last preference edit before it persists,
    /// in milliseconds.
    pub debounce_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { debounce_ms: 1000 }
    }
}

/// Top-level configuration for the client core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub sync: SyncConfig,
    /// Wire ids of the platforms currently offered, in display order.
    pub platforms: Vec<PlatformId>,
    /// Policy applied to a requested platform that has none configured.
    /// When unset, such platforms are omitted from the request and the
    /// backend applies its own defaults.
    pub default_policy: Option<PolicyConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            sync: SyncConfig::default(),
            platforms: PlatformCatalog::default().iter().cloned().collect(),
            default_policy: None,
        }
    }
}

impl AppConfig {
    /// The platform catalog as configured.
    pub fn catalog(&self) -> PlatformCatalog {
        PlatformCatalog::new(self.platforms.clone())
    }

    /// The sync debounce delay as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.sync.debounce_ms)
    }
}
