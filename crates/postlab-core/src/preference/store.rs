//! Persistence boundary for composer preferences.

use async_trait::async_trait;

use crate::error::Result;
use crate::preference::model::PreferenceRecord;

/// Abstracts the durable store behind preference sync.
///
/// Implementations must be callable from concurrent tasks; the sync engine
/// issues fire-and-forget saves from spawned tasks.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Loads the stored record, or `None` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<PreferenceRecord>>;

    /// Persists the record. Fields the record omits keep their stored value.
    async fn save(&self, record: PreferenceRecord) -> Result<()>;
}
