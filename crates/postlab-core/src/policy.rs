//! Opaque per-platform generation policies.

use serde::{Deserialize, Serialize};

/// A per-platform generation policy (tone, length, hashtag rules, ...).
///
/// The orchestrator stores, compares and forwards policies without inspecting
/// their shape; the backend owns the schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyConfig(serde_json::Value);

impl PolicyConfig {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for PolicyConfig {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
