//! The composer session: batched generation across independently-failing
//! platforms, with per-platform retry, draft selection and history saves.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use postlab_core::archive::{ContentArchive, ContentRecord};
use postlab_core::config::AppConfig;
use postlab_core::error::{PostlabError, Result};
use postlab_core::generation::{
    BatchOutcome, GenerationBackend, GenerationRequest, PlatformOutcome, PlatformResult,
    PlatformStatus, PlatformViewState,
};
use postlab_core::notice::Notice;
use postlab_core::platform::PlatformId;
use postlab_core::policy::PolicyConfig;
use postlab_core::preference::{PreferenceStore, SessionState};

use crate::sync_engine::PreferenceSyncEngine;

/// Content a platform currently displays: the selected draft, or the final
/// content when no draft is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedContent {
    pub content: String,
    pub model: Option<String>,
}

/// Everything the session tracks for one platform.
#[derive(Debug, Default)]
struct PlatformSlot {
    outcome: Option<PlatformOutcome>,
    /// Number of in-flight requests covering this platform.
    pending: u32,
    /// Meaningful only while `outcome` is set.
    view: PlatformViewState,
    /// Bumped every time `outcome` is replaced. A save that started against
    /// an older epoch must not mark the newer outcome saved.
    epoch: u64,
}

impl PlatformSlot {
    /// Content and model this slot currently displays.
    fn displayed(&self) -> Option<(String, Option<String>)> {
        match &self.outcome {
            Some(PlatformOutcome::Succeeded {
                drafts,
                final_content,
                model_used,
            }) => Some(match self.view.selected_draft {
                Some(i) if i < drafts.len() => {
                    (drafts[i].content.clone(), Some(drafts[i].model.clone()))
                }
                _ => (final_content.clone(), model_used.clone()),
            }),
            _ => None,
        }
    }
}

/// One user's composer session.
///
/// `ComposerSession` is responsible for:
/// - Holding the editable session state and feeding edits into preference sync
/// - Submitting batched generation requests and merging results per platform
/// - Tracking per-platform pending, view state and saved/saving flags
/// - Emitting user-facing notices over the channel returned by [`start`]
///
/// All methods take `&self`; the session is meant to be shared as an `Arc`
/// across UI tasks.
///
/// [`start`]: ComposerSession::start
pub struct ComposerSession {
    id: Uuid,
    state: RwLock<SessionState>,
    slots: RwLock<HashMap<PlatformId, PlatformSlot>>,
    backend: Arc<dyn GenerationBackend>,
    archive: Arc<dyn ContentArchive>,
    sync: PreferenceSyncEngine,
    default_policy: Option<PolicyConfig>,
    notices: mpsc::UnboundedSender<Notice>,
}

impl ComposerSession {
    /// Hydrates preferences and starts a session over them.
    ///
    /// Returns the session and the receiver for its notices. Hydration never
    /// fails: an unreachable store yields a default state and the session
    /// stays usable.
    pub async fn start(
        store: Arc<dyn PreferenceStore>,
        backend: Arc<dyn GenerationBackend>,
        archive: Arc<dyn ContentArchive>,
        config: AppConfig,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<Notice>) {
        let sync = PreferenceSyncEngine::new(store, config.catalog(), config.debounce());
        let state = sync.hydrate().await;
        sync.observe(&state);

        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let session = Arc::new(Self {
            id: Uuid::new_v4(),
            state: RwLock::new(state),
            slots: RwLock::new(HashMap::new()),
            backend,
            archive,
            sync,
            default_policy: config.default_policy,
            notices: notice_tx,
        });
        tracing::info!(session_id = %session.id, "composer session started");

        (session, notice_rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    // ============================================================================
    // Session state edits
    // ============================================================================

    pub async fn idea_text(&self) -> String {
        self.state.read().await.idea_text.clone()
    }

    pub async fn set_idea_text(&self, text: impl Into<String>) {
        let mut state = self.state.write().await;
        state.idea_text = text.into();
        self.sync.observe(&state);
    }

    pub async fn selected_platforms(&self) -> Vec<PlatformId> {
        self.state.read().await.selected_platforms.clone()
    }

    /// Adds the platform to the selection, or removes it if already selected.
    pub async fn toggle_platform(&self, platform: &PlatformId) {
        let mut state = self.state.write().await;
        state.toggle_platform(platform);
        self.sync.observe(&state);
    }

    pub async fn set_policy(&self, platform: PlatformId, policy: PolicyConfig) {
        let mut state = self.state.write().await;
        state.set_policy(platform, policy);
        self.sync.observe(&state);
    }

    pub async fn session_state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    // ============================================================================
    // Generation
    // ============================================================================

    /// Generates content for every currently-selected platform.
    pub async fn generate(&self) -> Result<BatchOutcome> {
        let platforms = self.selected_platforms().await;
        self.generate_for(platforms).await
    }

    /// Re-generates content for a single platform, regardless of the current
    /// selection. Other platforms' results are untouched.
    pub async fn retry(&self, platform: &PlatformId) -> Result<BatchOutcome> {
        self.generate_for(vec![platform.clone()]).await
    }

    async fn generate_for(&self, platforms: Vec<PlatformId>) -> Result<BatchOutcome> {
        let request = match self.build_request(platforms).await {
            Ok(request) => request,
            Err(e) => {
                // Validation messages are written for the user; show them as-is.
                self.notify(Notice::error(match &e {
                    PostlabError::Validation(message) => message.clone(),
                    other => other.to_string(),
                }));
                return Err(e);
            }
        };
        let requested = request.platforms.clone();

        self.begin_pending(&requested).await;
        tracing::info!(
            session_id = %self.id,
            platforms = requested.len(),
            "submitting generation batch"
        );

        match self.backend.generate(request).await {
            Ok(results) => {
                let outcome = self.apply_response(&requested, results).await;
                self.notify_batch(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                // The batch itself failed; every platform keeps whatever it
                // showed before.
                self.release_pending(&requested).await;
                tracing::warn!(session_id = %self.id, error = %e, "generation batch failed");
                self.notify(Notice::error("Generation request failed."));
                Err(e)
            }
        }
    }

    /// Validates and assembles the batched request. Policies cover exactly
    /// the requested platforms; a platform with no stored policy falls back
    /// to the configured default, or is left to the backend.
    async fn build_request(&self, platforms: Vec<PlatformId>) -> Result<GenerationRequest> {
        let state = self.state.read().await;
        if state.idea_text.trim().is_empty() {
            return Err(PostlabError::validation("Enter an idea first."));
        }
        if platforms.is_empty() {
            return Err(PostlabError::validation("Select at least one platform."));
        }

        let mut policies = BTreeMap::new();
        for platform in &platforms {
            let policy = state
                .policy_by_platform
                .get(platform)
                .cloned()
                .or_else(|| self.default_policy.clone());
            if let Some(policy) = policy {
                policies.insert(platform.clone(), policy);
            }
        }

        Ok(GenerationRequest {
            idea_text: state.idea_text.clone(),
            platforms,
            policies,
        })
    }

    async fn begin_pending(&self, platforms: &[PlatformId]) {
        let mut slots = self.slots.write().await;
        for platform in platforms {
            slots.entry(platform.clone()).or_default().pending += 1;
        }
    }

    async fn release_pending(&self, platforms: &[PlatformId]) {
        let mut slots = self.slots.write().await;
        for platform in platforms {
            if let Some(slot) = slots.get_mut(platform) {
                slot.pending = slot.pending.saturating_sub(1);
            }
        }
    }

    /// Merges a batch response into the per-platform slots and classifies it.
    ///
    /// Only requested platforms are merged; each merged slot gets a fresh
    /// view state. When requests overlap, the last response to land wins the
    /// slot.
    async fn apply_response(
        &self,
        requested: &[PlatformId],
        results: Vec<PlatformResult>,
    ) -> BatchOutcome {
        let outcome = BatchOutcome::classify(&results);

        let mut slots = self.slots.write().await;
        for result in results {
            if !requested.contains(&result.platform) {
                tracing::warn!(
                    session_id = %self.id,
                    platform = %result.platform,
                    "response names a platform that was not requested, ignoring"
                );
                continue;
            }
            let draft_count = match &result.outcome {
                PlatformOutcome::Succeeded { drafts, .. } => drafts.len(),
                PlatformOutcome::Failed { .. } => 0,
            };
            let slot = slots.entry(result.platform).or_default();
            slot.outcome = Some(result.outcome);
            slot.view = PlatformViewState::for_drafts(draft_count);
            slot.epoch += 1;
        }
        for platform in requested {
            if let Some(slot) = slots.get_mut(platform) {
                slot.pending = slot.pending.saturating_sub(1);
            }
        }

        outcome
    }

    fn notify_batch(&self, outcome: &BatchOutcome) {
        let notice = match outcome {
            BatchOutcome::AllSucceeded { .. } => {
                Notice::success("Content generated for all platforms.")
            }
            BatchOutcome::Partial { succeeded, failed } => Notice::warning(format!(
                "Generated {}/{} platforms. Some failed.",
                succeeded,
                succeeded + failed
            )),
            BatchOutcome::AllFailed { .. } => {
                Notice::error("Generation failed for all selected platforms.")
            }
        };
        self.notify(notice);
    }

    fn notify(&self, notice: Notice) {
        // The receiver may be gone when the shell has shut down.
        let _ = self.notices.send(notice);
    }

    // ============================================================================
    // Per-platform read models
    // ============================================================================

    pub async fn status(&self, platform: &PlatformId) -> PlatformStatus {
        let slots = self.slots.read().await;
        match slots.get(platform) {
            None => PlatformStatus::Idle,
            Some(slot) if slot.pending > 0 => PlatformStatus::Pending,
            Some(slot) => match &slot.outcome {
                Some(PlatformOutcome::Succeeded { .. }) => PlatformStatus::Succeeded,
                Some(PlatformOutcome::Failed { .. }) => PlatformStatus::Failed,
                None => PlatformStatus::Idle,
            },
        }
    }

    /// True while any platform has a request in flight.
    pub async fn is_generating(&self) -> bool {
        self.slots.read().await.values().any(|slot| slot.pending > 0)
    }

    pub async fn outcome(&self, platform: &PlatformId) -> Option<PlatformOutcome> {
        self.slots
            .read()
            .await
            .get(platform)
            .and_then(|slot| slot.outcome.clone())
    }

    /// View state for a platform that has an outcome, `None` otherwise.
    pub async fn view_state(&self, platform: &PlatformId) -> Option<PlatformViewState> {
        let slots = self.slots.read().await;
        slots
            .get(platform)
            .filter(|slot| slot.outcome.is_some())
            .map(|slot| slot.view.clone())
    }

    /// Selects which draft a platform displays; `None` selects the final
    /// content. Out-of-range indexes clamp to the last draft. No-op for
    /// platforms without a successful outcome.
    pub async fn select_draft(&self, platform: &PlatformId, index: Option<usize>) {
        let mut slots = self.slots.write().await;
        let Some(slot) = slots.get_mut(platform) else {
            return;
        };
        let Some(PlatformOutcome::Succeeded { drafts, .. }) = &slot.outcome else {
            return;
        };
        let draft_count = drafts.len();
        slot.view.select(index, draft_count);
    }

    /// The content a platform currently displays.
    pub async fn displayed(&self, platform: &PlatformId) -> Option<DisplayedContent> {
        let slots = self.slots.read().await;
        slots
            .get(platform)
            .and_then(|slot| slot.displayed())
            .map(|(content, model)| DisplayedContent { content, model })
    }

    // ============================================================================
    // Saving
    // ============================================================================

    /// Archives the displayed content for one platform.
    ///
    /// Returns `Ok(true)` when a record was written, `Ok(false)` when there
    /// was nothing to do: no successful outcome, empty content, already
    /// saved, or a save already in flight. Overlapping calls collapse into a
    /// single archive write.
    pub async fn save(&self, platform: &PlatformId) -> Result<bool> {
        let idea_prompt = self.state.read().await.idea_text.clone();

        let (content, model, epoch) = {
            let mut slots = self.slots.write().await;
            let Some(slot) = slots.get_mut(platform) else {
                return Ok(false);
            };
            if slot.view.saved || slot.view.saving {
                return Ok(false);
            }
            let Some((content, model)) = slot.displayed() else {
                return Ok(false);
            };
            if content.is_empty() {
                return Ok(false);
            }
            // Claimed under the lock: a second call now sees `saving`.
            slot.view.saving = true;
            (content, model, slot.epoch)
        };

        let char_count = content.chars().count() as u32;
        let record = ContentRecord {
            idea_prompt,
            platform: platform.clone(),
            content_text: content,
            model_used: model,
            char_count: Some(char_count),
        };

        tracing::debug!(session_id = %self.id, platform = %platform, "archiving displayed content");
        let result = self.archive.save_content(record).await;

        let mut slots = self.slots.write().await;
        match result {
            Ok(()) => {
                if let Some(slot) = slots.get_mut(platform) {
                    // A save that raced a regeneration must not mark the
                    // fresh outcome saved.
                    if slot.epoch == epoch {
                        slot.view.saving = false;
                        slot.view.saved = true;
                    }
                }
                self.notify(Notice::success("Saved to history."));
                Ok(true)
            }
            Err(e) => {
                if let Some(slot) = slots.get_mut(platform) {
                    if slot.epoch == epoch {
                        slot.view.saving = false;
                    }
                }
                tracing::warn!(
                    session_id = %self.id,
                    platform = %platform,
                    error = %e,
                    "failed to archive content"
                );
                self.notify(Notice::error("Failed to save content."));
                Err(e)
            }
        }
    }
}
