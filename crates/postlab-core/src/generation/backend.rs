//! Boundary trait for the remote generation service.

use async_trait::async_trait;

use crate::error::Result;
use crate::generation::model::{GenerationRequest, PlatformResult};

/// One batched generation round-trip.
///
/// `Err` means the batch itself failed (connection, timeout, non-success
/// response). Per-platform failures come back inside `Ok` as failed
/// outcomes, so one platform's trouble never hides another's content.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<PlatformResult>>;
}
