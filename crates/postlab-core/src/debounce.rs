//! Trailing-edge debounce over a stream of values.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Debounces a stream of values.
///
/// `update` may be called at any rate; the latest value is published to
/// subscribers only once `delay` has elapsed with no further updates. A value
/// superseded inside the quiet window is never published. An update landing
/// exactly on the deadline restarts the window rather than settling early.
///
/// Dropping the debouncer aborts the worker; a value that has not settled by
/// then is discarded.
pub struct Debouncer<T> {
    input: watch::Sender<Option<T>>,
    output: watch::Receiver<Option<T>>,
    worker: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        let (input_tx, mut input_rx) = watch::channel(None::<T>);
        let (output_tx, output_rx) = watch::channel(None::<T>);

        let worker = tokio::spawn(async move {
            loop {
                // Park until the next burst begins.
                if input_rx.changed().await.is_err() {
                    return;
                }
                let mut deadline = Instant::now() + delay;
                loop {
                    tokio::select! {
                        biased;
                        changed = input_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            deadline = Instant::now() + delay;
                        }
                        _ = time::sleep_until(deadline) => {
                            let settled = input_rx.borrow_and_update().clone();
                            let _ = output_tx.send(settled);
                            break;
                        }
                    }
                }
            }
        });

        Self {
            input: input_tx,
            output: output_rx,
            worker,
        }
    }

    /// Feeds a new value, restarting the quiet window.
    pub fn update(&self, value: T) {
        // The worker holds the receiver for as long as self lives.
        let _ = self.input.send(Some(value));
    }

    /// A receiver observing settled values. Holds `None` until the first
    /// settle; use `changed()` to await the next one.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.output.clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_settles_once_with_last_value() {
        let debouncer = Debouncer::new(Duration::from_millis(1000));
        let mut settled = debouncer.subscribe();
        let started = Instant::now();

        debouncer.update("a");
        time::sleep(Duration::from_millis(100)).await;
        debouncer.update("b");
        time::sleep(Duration::from_millis(200)).await;
        debouncer.update("c");

        settled.changed().await.unwrap();
        assert_eq!(*settled.borrow_and_update(), Some("c"));
        // Quiet window runs from the last update at t=300.
        assert_eq!(started.elapsed(), Duration::from_millis(1300));
        assert!(!settled.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_settles_inside_quiet_window() {
        let debouncer = Debouncer::new(Duration::from_millis(1000));
        let mut settled = debouncer.subscribe();

        debouncer.update(1u32);
        time::sleep(Duration::from_millis(999)).await;
        assert!(!settled.has_changed().unwrap());

        time::sleep(Duration::from_millis(2)).await;
        assert!(settled.has_changed().unwrap());
        assert_eq!(*settled.borrow_and_update(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_update_restarts_the_window() {
        let debouncer = Debouncer::new(Duration::from_millis(1000));
        let mut settled = debouncer.subscribe();
        let started = Instant::now();

        debouncer.update("first");
        time::sleep(Duration::from_millis(900)).await;
        debouncer.update("second");
        time::sleep(Duration::from_millis(900)).await;
        debouncer.update("third");

        settled.changed().await.unwrap();
        assert_eq!(*settled.borrow_and_update(), Some("third"));
        assert_eq!(started.elapsed(), Duration::from_millis(2800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_settle_separately() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let mut settled = debouncer.subscribe();

        debouncer.update(1u32);
        settled.changed().await.unwrap();
        assert_eq!(*settled.borrow_and_update(), Some(1));

        debouncer.update(2u32);
        settled.changed().await.unwrap();
        assert_eq!(*settled.borrow_and_update(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_value() {
        let debouncer = Debouncer::new(Duration::from_millis(1000));
        let mut settled = debouncer.subscribe();

        debouncer.update("never seen");
        drop(debouncer);

        time::sleep(Duration::from_millis(5000)).await;
        // The sender side is gone and nothing was published.
        assert!(settled.has_changed().is_err());
        assert_eq!(*settled.borrow(), None);
    }
}
