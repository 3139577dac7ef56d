//! Platform identity and the catalog of currently-offered platforms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire identifier of a target platform (e.g. `"linkedin"`, `"x"`).
///
/// The core treats platforms as opaque ids. Display labels, colors and other
/// presentation data belong to the embedding shell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformId(String);

impl PlatformId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlatformId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PlatformId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The set of platforms the product currently offers, in display order.
///
/// Injected wherever persisted platform references need validating; stored
/// preferences may reference platforms that have since been withdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCatalog {
    platforms: Vec<PlatformId>,
}

impl PlatformCatalog {
    pub fn new(platforms: Vec<PlatformId>) -> Self {
        Self { platforms }
    }

    pub fn contains(&self, id: &PlatformId) -> bool {
        self.platforms.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformId> {
        self.platforms.iter()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Keeps only the ids this catalog still offers, preserving input order.
    pub fn filter_known(&self, ids: Vec<PlatformId>) -> Vec<PlatformId> {
        ids.into_iter().filter(|id| self.contains(id)).collect()
    }
}

impl Default for PlatformCatalog {
    fn default() -> Self {
        Self::new(
            ["linkedin", "x", "reddit", "instagram", "facebook", "tiktok"]
                .into_iter()
                .map(PlatformId::from)
                .collect(),
        )
    }
}
