//! Composer preference state and its persisted wire shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::{PlatformCatalog, PlatformId};
use crate::policy::PolicyConfig;

/// The composer state the sync engine keeps durable.
///
/// Selection order is insertion order. Policies live in an ordered map so
/// that serialized forms are canonical (see [`PreferenceSnapshot`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub idea_text: String,
    pub selected_platforms: Vec<PlatformId>,
    pub policy_by_platform: BTreeMap<PlatformId, PolicyConfig>,
}

impl SessionState {
    /// Adds the platform to the selection, or removes it if already present.
    pub fn toggle_platform(&mut self, platform: &PlatformId) {
        if let Some(pos) = self.selected_platforms.iter().position(|p| p == platform) {
            self.selected_platforms.remove(pos);
        } else {
            self.selected_platforms.push(platform.clone());
        }
    }

    /// Stores (or replaces) the policy for one platform.
    pub fn set_policy(&mut self, platform: PlatformId, policy: PolicyConfig) {
        self.policy_by_platform.insert(platform, policy);
    }

    pub fn snapshot(&self) -> PreferenceSnapshot {
        PreferenceSnapshot::of(self)
    }

    /// Rebuilds state from a persisted record.
    ///
    /// The record is data from an earlier session: sub-fields may be missing,
    /// malformed, or reference platforms that are no longer offered. Anything
    /// unusable degrades to its default instead of failing hydration, and
    /// platform references outside `catalog` are dropped from both the
    /// selection and the policy map.
    pub fn from_record(record: &PreferenceRecord, catalog: &PlatformCatalog) -> Self {
        let idea_text = record.last_idea_prompt.clone().unwrap_or_default();

        let selected_platforms = record
            .last_platform_selection
            .as_deref()
            .map(|raw| parse_selection(raw, catalog))
            .unwrap_or_default();

        let policy_by_platform = record
            .last_policies
            .as_deref()
            .map(|raw| parse_policies(raw, catalog))
            .unwrap_or_default();

        Self {
            idea_text,
            selected_platforms,
            policy_by_platform,
        }
    }
}

fn parse_selection(raw: &str, catalog: &PlatformCatalog) -> Vec<PlatformId> {
    match serde_json::from_str::<Vec<PlatformId>>(raw) {
        Ok(ids) => catalog.filter_known(ids),
        Err(e) => {
            tracing::warn!(error = %e, "stored platform selection is not valid JSON, ignoring");
            Vec::new()
        }
    }
}

fn parse_policies(raw: &str, catalog: &PlatformCatalog) -> BTreeMap<PlatformId, PolicyConfig> {
    match serde_json::from_str::<BTreeMap<PlatformId, PolicyConfig>>(raw) {
        Ok(map) => map
            .into_iter()
            .filter(|(platform, _)| catalog.contains(platform))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "stored platform policies are not valid JSON, ignoring");
            BTreeMap::new()
        }
    }
}

/// A point-in-time projection of the preference fields the engine persists.
///
/// Equality is structural. Because the policy map is ordered, two snapshots
/// are equal exactly when their canonical JSON forms are byte-equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceSnapshot {
    pub idea_text: String,
    pub selected_platforms: Vec<PlatformId>,
    pub policy_by_platform: BTreeMap<PlatformId, PolicyConfig>,
}

impl PreferenceSnapshot {
    pub fn of(state: &SessionState) -> Self {
        Self {
            idea_text: state.idea_text.clone(),
            selected_platforms: state.selected_platforms.clone(),
            policy_by_platform: state.policy_by_platform.clone(),
        }
    }

    /// The canonical serialized form of this snapshot.
    pub fn canonical_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Projects the wire record the sync engine persists. The selection and
    /// policy sub-fields are JSON documents stored as strings.
    pub fn to_record(&self) -> Result<PreferenceRecord> {
        Ok(PreferenceRecord {
            last_idea_prompt: Some(self.idea_text.clone()),
            last_platform_selection: Some(serde_json::to_string(&self.selected_platforms)?),
            last_policies: Some(serde_json::to_string(&self.policy_by_platform)?),
            last_expanded_platforms: None,
        })
    }
}

/// Wire shape of the persisted preference record.
///
/// `None` fields are omitted from the serialized form, so a write updates
/// only the columns it carries and leaves the rest untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_idea_prompt: Option<String>,
    /// JSON array of platform ids, stored as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_platform_selection: Option<String>,
    /// JSON object mapping platform id to policy, stored as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_policies: Option<String>,
    /// Maintained by other surfaces of the product; loaded and carried,
    /// never written by the sync engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_expanded_platforms: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_state() -> SessionState {
        let mut state = SessionState {
            idea_text: "Launch announcement for the new API".to_string(),
            selected_platforms: vec![PlatformId::from("x"), PlatformId::from("linkedin")],
            ..Default::default()
        };
        state.set_policy(
            PlatformId::from("x"),
            PolicyConfig::from(json!({"tone": "punchy", "max_length": 280})),
        );
        state
    }

    #[test]
    fn test_toggle_platform_round_trip() {
        let mut state = SessionState::default();
        let reddit = PlatformId::from("reddit");

        state.toggle_platform(&reddit);
        assert_eq!(state.selected_platforms, vec![reddit.clone()]);

        state.toggle_platform(&reddit);
        assert!(state.selected_platforms.is_empty());
    }

    #[test]
    fn test_toggle_preserves_insertion_order() {
        let mut state = SessionState::default();
        state.toggle_platform(&PlatformId::from("tiktok"));
        state.toggle_platform(&PlatformId::from("x"));
        state.toggle_platform(&PlatformId::from("linkedin"));
        state.toggle_platform(&PlatformId::from("x"));

        assert_eq!(
            state.selected_platforms,
            vec![PlatformId::from("tiktok"), PlatformId::from("linkedin")]
        );
    }

    #[test]
    fn test_record_round_trip() {
        let state = sample_state();
        let record = state.snapshot().to_record().unwrap();
        let rebuilt = SessionState::from_record(&record, &PlatformCatalog::default());
        assert_eq!(rebuilt, state);
    }

    #[test]
    fn test_snapshot_equality_matches_canonical_json() {
        let a = sample_state().snapshot();
        let b = sample_state().snapshot();
        assert_eq!(a, b);
        assert_eq!(
            a.canonical_json().unwrap(),
            b.canonical_json().unwrap()
        );

        let mut other = sample_state();
        other.idea_text.push('!');
        let c = other.snapshot();
        assert_ne!(a, c);
        assert_ne!(a.canonical_json().unwrap(), c.canonical_json().unwrap());
    }

    #[test]
    fn test_from_record_drops_stale_platforms() {
        let record = PreferenceRecord {
            last_idea_prompt: Some("old idea".to_string()),
            last_platform_selection: Some(r#"["x","gopher_net","linkedin"]"#.to_string()),
            last_policies: Some(
                r#"{"gopher_net":{"tone":"retro"},"x":{"tone":"punchy"}}"#.to_string(),
            ),
            last_expanded_platforms: None,
        };

        let state = SessionState::from_record(&record, &PlatformCatalog::default());

        assert_eq!(
            state.selected_platforms,
            vec![PlatformId::from("x"), PlatformId::from("linkedin")]
        );
        assert_eq!(state.policy_by_platform.len(), 1);
        assert!(
            state
                .policy_by_platform
                .contains_key(&PlatformId::from("x"))
        );
    }

    #[test]
    fn test_from_record_tolerates_malformed_sub_fields() {
        let record = PreferenceRecord {
            last_idea_prompt: Some("still here".to_string()),
            last_platform_selection: Some("not json at all".to_string()),
            last_policies: Some("{broken".to_string()),
            last_expanded_platforms: None,
        };

        let state = SessionState::from_record(&record, &PlatformCatalog::default());

        assert_eq!(state.idea_text, "still here");
        assert!(state.selected_platforms.is_empty());
        assert!(state.policy_by_platform.is_empty());
    }

    #[test]
    fn test_from_empty_record_yields_defaults() {
        let state =
            SessionState::from_record(&PreferenceRecord::default(), &PlatformCatalog::default());
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn test_record_write_omits_fields_it_does_not_own() {
        let record = sample_state().snapshot().to_record().unwrap();
        let wire = serde_json::to_value(&record).unwrap();
        assert!(wire.get("last_expanded_platforms").is_none());
        assert!(wire.get("last_idea_prompt").is_some());
    }
}
