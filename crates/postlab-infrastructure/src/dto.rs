//! Wire DTOs for the content service API.
//!
//! The service speaks flat success/error records; the domain speaks outcome
//! enums. Conversions live here so neither side leaks into the other.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use postlab_core::archive::ContentRecord;
use postlab_core::generation::{
    Draft, ErrorKind, GenerationRequest, PlatformOutcome, PlatformResult,
};
use postlab_core::platform::PlatformId;
use postlab_core::policy::PolicyConfig;

/// POST /content/generate request body.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequestBody {
    pub idea_prompt: String,
    pub platforms: Vec<PlatformId>,
    pub platform_policies: BTreeMap<PlatformId, PolicyConfig>,
}

impl From<GenerationRequest> for GenerateRequestBody {
    fn from(request: GenerationRequest) -> Self {
        Self {
            idea_prompt: request.idea_text,
            platforms: request.platforms,
            platform_policies: request.policies,
        }
    }
}

/// One pipeline draft on the wire. `step` is the pipeline stage name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftDto {
    pub step: String,
    pub model: String,
    pub content: String,
}

impl From<DraftDto> for Draft {
    fn from(dto: DraftDto) -> Self {
        Self {
            stage: dto.step,
            model: dto.model,
            content: dto.content,
        }
    }
}

/// One platform's entry in the generate response.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformResultDto {
    pub platform: String,
    pub success: bool,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub char_count: Option<u32>,
    #[serde(default)]
    pub drafts: Option<Vec<DraftDto>>,
}

impl From<PlatformResultDto> for PlatformResult {
    fn from(dto: PlatformResultDto) -> Self {
        let platform = PlatformId::from(dto.platform);
        let outcome = if dto.success {
            PlatformOutcome::Succeeded {
                drafts: dto
                    .drafts
                    .unwrap_or_default()
                    .into_iter()
                    .map(Draft::from)
                    .collect(),
                // A success without content still renders; it renders empty.
                final_content: dto.content.unwrap_or_default(),
                model_used: dto.model_used,
            }
        } else {
            PlatformOutcome::Failed {
                kind: dto
                    .error_code
                    .as_deref()
                    .map(ErrorKind::from_code)
                    .unwrap_or(ErrorKind::Unknown),
                message: dto
                    .error
                    .unwrap_or_else(|| "Generation failed".to_string()),
            }
        };
        Self { platform, outcome }
    }
}

/// POST /content/generate response body.
///
/// The aggregate counters are advisory; classification always derives from
/// the entries themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponseBody {
    pub results: Vec<PlatformResultDto>,
    #[serde(default)]
    pub success_count: Option<usize>,
    #[serde(default)]
    pub failure_count: Option<usize>,
    #[serde(default)]
    pub total_platforms: Option<usize>,
}

/// POST /content/save request body.
#[derive(Debug, Clone, Serialize)]
pub struct SaveContentBody {
    pub idea_prompt: String,
    pub platform: PlatformId,
    pub content_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_count: Option<u32>,
}

impl From<ContentRecord> for SaveContentBody {
    fn from(record: ContentRecord) -> Self {
        Self {
            idea_prompt: record.idea_prompt,
            platform: record.platform,
            content_text: record.content_text,
            model_used: record.model_used,
            char_count: record.char_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_successful_result_converts_with_drafts() {
        let dto: PlatformResultDto = serde_json::from_value(json!({
            "platform": "x",
            "success": true,
            "content": "Ship day!",
            "model_used": "gemini-2.0-flash",
            "char_count": 9,
            "drafts": [
                {"step": "generator", "model": "gemini-2.0-flash", "content": "v1"},
                {"step": "improver", "model": "gemini-2.0-pro", "content": "v2"}
            ]
        }))
        .unwrap();

        let result = PlatformResult::from(dto);
        assert_eq!(result.platform, PlatformId::from("x"));
        match result.outcome {
            PlatformOutcome::Succeeded {
                drafts,
                final_content,
                model_used,
            } => {
                assert_eq!(drafts.len(), 2);
                assert_eq!(drafts[0].stage, "generator");
                assert_eq!(drafts[1].content, "v2");
                assert_eq!(final_content, "Ship day!");
                assert_eq!(model_used.as_deref(), Some("gemini-2.0-flash"));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_success_without_content_repairs_to_empty() {
        let dto: PlatformResultDto = serde_json::from_value(json!({
            "platform": "reddit",
            "success": true
        }))
        .unwrap();

        match PlatformResult::from(dto).outcome {
            PlatformOutcome::Succeeded {
                drafts,
                final_content,
                ..
            } => {
                assert!(drafts.is_empty());
                assert!(final_content.is_empty());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_result_parses_error_code() {
        let dto: PlatformResultDto = serde_json::from_value(json!({
            "platform": "linkedin",
            "success": false,
            "error": "429 from provider",
            "error_code": "RATE_LIMIT"
        }))
        .unwrap();

        match PlatformResult::from(dto).outcome {
            PlatformOutcome::Failed { kind, message } => {
                assert_eq!(kind, ErrorKind::RateLimit);
                assert_eq!(message, "429 from provider");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_result_without_code_or_message_is_repaired() {
        let dto: PlatformResultDto = serde_json::from_value(json!({
            "platform": "tiktok",
            "success": false
        }))
        .unwrap();

        match PlatformResult::from(dto).outcome {
            PlatformOutcome::Failed { kind, message } => {
                assert_eq!(kind, ErrorKind::Unknown);
                assert_eq!(message, "Generation failed");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_generate_request_wire_field_names() {
        let mut policies = BTreeMap::new();
        policies.insert(
            PlatformId::from("x"),
            PolicyConfig::from(json!({"tone": "punchy"})),
        );
        let body = GenerateRequestBody::from(GenerationRequest {
            idea_text: "launch post".to_string(),
            platforms: vec![PlatformId::from("x")],
            policies,
        });

        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(wire["idea_prompt"], "launch post");
        assert_eq!(wire["platforms"], json!(["x"]));
        assert_eq!(wire["platform_policies"]["x"]["tone"], "punchy");
    }

    #[test]
    fn test_save_body_omits_absent_optionals() {
        let body = SaveContentBody::from(ContentRecord {
            idea_prompt: "launch post".to_string(),
            platform: PlatformId::from("x"),
            content_text: "Ship day!".to_string(),
            model_used: None,
            char_count: None,
        });

        let wire = serde_json::to_value(&body).unwrap();
        assert!(wire.get("model_used").is_none());
        assert!(wire.get("char_count").is_none());
        assert_eq!(wire["content_text"], "Ship day!");
    }

    #[test]
    fn test_response_body_tolerates_missing_counters() {
        let parsed: GenerateResponseBody = serde_json::from_value(json!({
            "results": []
        }))
        .unwrap();
        assert!(parsed.results.is_empty());
        assert!(parsed.success_count.is_none());
        assert!(parsed.total_platforms.is_none());
    }
}
