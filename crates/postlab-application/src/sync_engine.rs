//! Debounced, baseline-compared persistence of composer preferences.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use postlab_core::debounce::Debouncer;
use postlab_core::platform::PlatformCatalog;
use postlab_core::preference::{PreferenceSnapshot, PreferenceStore, SessionState};

/// Keeps composer preferences durably in sync with the store.
///
/// `PreferenceSyncEngine` is responsible for:
/// - Hydrating the initial `SessionState` from the store
/// - Debouncing observed edits into settled snapshots
/// - Suppressing writes that would persist what is already stored
/// - Issuing fire-and-forget writes whose failures never disturb the session
pub struct PreferenceSyncEngine {
    store: Arc<dyn PreferenceStore>,
    catalog: PlatformCatalog,
    debouncer: Debouncer<PreferenceSnapshot>,
    /// Last snapshot known to match the store. `None` until hydration.
    baseline: Arc<Mutex<Option<PreferenceSnapshot>>>,
    worker: JoinHandle<()>,
}

impl PreferenceSyncEngine {
    /// Creates an engine over `store`. Nothing persists until [`hydrate`]
    /// has established a baseline.
    ///
    /// [`hydrate`]: PreferenceSyncEngine::hydrate
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        catalog: PlatformCatalog,
        debounce: Duration,
    ) -> Self {
        let debouncer = Debouncer::new(debounce);
        let baseline = Arc::new(Mutex::new(None));
        let worker = tokio::spawn(run_writer(
            debouncer.subscribe(),
            Arc::clone(&store),
            Arc::clone(&baseline),
        ));

        Self {
            store,
            catalog,
            debouncer,
            baseline,
            worker,
        }
    }

    /// Loads the persisted record and rebuilds the session state from it.
    ///
    /// Hydration always completes: an absent record or a failing load yields
    /// the default state (the failure is logged), and platforms the catalog
    /// no longer offers are dropped. The hydrated state becomes the baseline,
    /// so replaying it to [`observe`] never causes a write.
    ///
    /// [`observe`]: PreferenceSyncEngine::observe
    pub async fn hydrate(&self) -> SessionState {
        let state = match self.store.load().await {
            Ok(Some(record)) => SessionState::from_record(&record, &self.catalog),
            Ok(None) => SessionState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load preferences, starting from defaults");
                SessionState::default()
            }
        };

        let mut baseline = self.baseline.lock().unwrap();
        *baseline = Some(state.snapshot());
        state
    }

    /// Feeds the current state into the debounce window. Call after every
    /// edit; bursts settle into a single candidate snapshot.
    pub fn observe(&self, state: &SessionState) {
        self.debouncer.update(state.snapshot());
    }

    pub fn is_hydrated(&self) -> bool {
        self.baseline.lock().unwrap().is_some()
    }
}

impl Drop for PreferenceSyncEngine {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

/// Consumes settled snapshots and decides which of them persist.
async fn run_writer(
    mut settled: watch::Receiver<Option<PreferenceSnapshot>>,
    store: Arc<dyn PreferenceStore>,
    baseline: Arc<Mutex<Option<PreferenceSnapshot>>>,
) {
    while settled.changed().await.is_ok() {
        let snapshot = match settled.borrow_and_update().clone() {
            Some(snapshot) => snapshot,
            None => continue,
        };

        let should_write = {
            let mut baseline = baseline.lock().unwrap();
            match baseline.as_ref() {
                // Settles observed before hydration reflect nothing the
                // user did; ignore them.
                None => false,
                Some(current) if *current == snapshot => {
                    tracing::debug!("preferences unchanged, skipping write");
                    false
                }
                Some(_) => {
                    // Replace the baseline before the write is issued, so
                    // a slow save can never make the same settle look
                    // dirty twice.
                    *baseline = Some(snapshot.clone());
                    true
                }
            }
        };
        if !should_write {
            continue;
        }

        let record = match snapshot.to_record() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode preferences, skipping write");
                continue;
            }
        };

        tracing::debug!("persisting preference change");
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            if let Err(e) = store.save(record).await {
                tracing::warn!(error = %e, "failed to persist preferences");
            }
        });
    }
}
