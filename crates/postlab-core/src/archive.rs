//! Saved-content history boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::PlatformId;

/// A record written to the content history when the user saves a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// The idea the content was generated from.
    pub idea_prompt: String,
    pub platform: PlatformId,
    /// The content as displayed at save time (a draft or the final).
    pub content_text: String,
    pub model_used: Option<String>,
    pub char_count: Option<u32>,
}

/// Append-only history of saved content. Browsing and editing the history
/// belong to other surfaces of the product.
#[async_trait]
pub trait ContentArchive: Send + Sync {
    async fn save_content(&self, record: ContentRecord) -> Result<()>;
}
