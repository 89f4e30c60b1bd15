//! Async view-state container
//!
//! One container backs one view. It runs at most one fetch batch at a time
//! and publishes `Idle -> Loading -> Loaded | Errored` through a watch
//! channel. After [`ViewState::teardown`] no batch result is applied, even
//! one that was already in flight.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Failure shown in a view's error panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewError {
    /// Human-readable message
    pub message: String,
    /// The requested resource does not exist; retrying will not help
    pub not_found: bool,
}

impl From<&yacht_core::Error> for ViewError {
    fn from(err: &yacht_core::Error) -> Self {
        Self {
            message: err.user_message(),
            not_found: matches!(err, yacht_core::Error::NotFound { .. }),
        }
    }
}

/// Where a view's data stands
#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus<T> {
    /// Never activated
    Idle,
    /// A batch is in flight
    Loading,
    /// The last batch succeeded
    Loaded(T),
    /// The last batch failed as a whole
    Errored(ViewError),
}

impl<T> ViewStatus<T> {
    /// Short name used in page payloads and logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Errored(_) => "errored",
        }
    }

    /// Whether a batch is in flight
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// State holder for one view
#[derive(Debug)]
pub struct ViewState<T> {
    name: &'static str,
    status: Arc<watch::Sender<ViewStatus<T>>>,
    settled: Arc<AtomicU64>,
    cancel: CancellationToken,
}

impl<T> ViewState<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Idle container for the named view
    pub fn new(name: &'static str) -> Self {
        let (status, _) = watch::channel(ViewStatus::Idle);
        Self {
            name,
            status: Arc::new(status),
            settled: Arc::new(AtomicU64::new(0)),
            cancel: CancellationToken::new(),
        }
    }

    /// Snapshot of the current status
    pub fn status(&self) -> ViewStatus<T> {
        self.status.borrow().clone()
    }

    /// Receiver observing every published status
    pub fn subscribe(&self) -> watch::Receiver<ViewStatus<T>> {
        self.status.subscribe()
    }

    /// Number of batches whose result was applied
    pub fn settled_batches(&self) -> u64 {
        self.settled.load(Ordering::Acquire)
    }

    /// Whether the view has been torn down
    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Start the first batch if the view has never been activated.
    ///
    /// `fetch` is only called when a batch actually starts. Returns whether
    /// one did.
    pub fn activate<F, Fut>(&self, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = yacht_core::Result<T>> + Send + 'static,
    {
        self.begin(fetch, |status| matches!(status, ViewStatus::Idle))
    }

    /// Start a new batch unless one is in flight. Returns whether one did.
    pub fn refresh<F, Fut>(&self, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = yacht_core::Result<T>> + Send + 'static,
    {
        self.begin(fetch, |status| !status.is_loading())
    }

    /// Wait until no batch is in flight and return the status.
    ///
    /// Returns [`ViewStatus::Loading`] if the view is torn down first.
    pub async fn settled(&self) -> ViewStatus<T> {
        let mut rx = self.status.subscribe();
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => ViewStatus::Loading,
            result = rx.wait_for(|status| !status.is_loading()) => {
                result.map_or(ViewStatus::Loading, |status| status.clone())
            }
        }
    }

    /// Stop applying results to this view
    pub fn teardown(&self) {
        if !self.cancel.is_cancelled() {
            debug!(view = self.name, "view torn down");
            self.cancel.cancel();
        }
    }

    fn begin<F, Fut>(&self, fetch: F, allowed: impl Fn(&ViewStatus<T>) -> bool) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = yacht_core::Result<T>> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return false;
        }

        let started = self.status.send_if_modified(|status| {
            if allowed(status) {
                *status = ViewStatus::Loading;
                true
            } else {
                false
            }
        });
        if !started {
            debug!(view = self.name, "batch already in flight or view active");
            return false;
        }

        info!(view = self.name, "loading");
        let batch = fetch();
        let name = self.name;
        let status = Arc::clone(&self.status);
        let settled = Arc::clone(&self.settled);
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(view = name, "batch dropped after teardown");
                }
                outcome = batch => {
                    if cancel.is_cancelled() {
                        return;
                    }
                    let next = match outcome {
                        Ok(data) => {
                            info!(view = name, "loaded");
                            ViewStatus::Loaded(data)
                        }
                        Err(err) => {
                            warn!(view = name, error = %err, "batch failed");
                            ViewStatus::Errored(ViewError::from(&err))
                        }
                    };
                    settled.fetch_add(1, Ordering::AcqRel);
                    status.send_replace(next);
                }
            }
        });
        true
    }
}

impl<T> Drop for ViewState<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use yacht_core::Error;

    #[tokio::test]
    async fn test_activate_loads_once() {
        let view = ViewState::new("test");
        assert_eq!(view.status(), ViewStatus::Idle);

        assert!(view.activate(|| async { Ok(7_u32) }));
        assert_eq!(view.settled().await, ViewStatus::Loaded(7));
        assert_eq!(view.settled_batches(), 1);

        assert!(!view.activate(|| async { Ok(8_u32) }));
        assert_eq!(view.status(), ViewStatus::Loaded(7));
    }

    #[tokio::test]
    async fn test_no_second_batch_while_loading() {
        let view = ViewState::new("test");
        let (tx, rx) = oneshot::channel::<u32>();

        assert!(view.activate(move || async move { Ok(rx.await.unwrap()) }));
        assert!(view.status().is_loading());

        let mut called = false;
        assert!(!view.refresh(|| {
            called = true;
            async { Ok(0) }
        }));
        assert!(!called);

        tx.send(3).unwrap();
        assert_eq!(view.settled().await, ViewStatus::Loaded(3));
        assert_eq!(view.settled_batches(), 1);
    }

    #[tokio::test]
    async fn test_refresh_after_loaded() {
        let view = ViewState::new("test");
        view.activate(|| async { Ok(1_u32) });
        view.settled().await;

        assert!(view.refresh(|| async { Ok(2_u32) }));
        assert_eq!(view.settled().await, ViewStatus::Loaded(2));
        assert_eq!(view.settled_batches(), 2);
    }

    #[tokio::test]
    async fn test_failure_carries_user_message() {
        let view: ViewState<u32> = ViewState::new("test");
        view.activate(|| async { Err(Error::backend("get_call_summary", "boom")) });

        let ViewStatus::Errored(err) = view.settled().await else {
            panic!("expected errored");
        };
        assert_eq!(err.message, "Failed to load data from the backend");
        assert!(!err.not_found);
    }

    #[tokio::test]
    async fn test_teardown_discards_late_result() {
        let view = ViewState::new("test");
        let (tx, rx) = oneshot::channel::<u32>();

        view.activate(move || async move { Ok(rx.await.unwrap_or(0)) });
        view.teardown();
        let _ = tx.send(5);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(view.status().is_loading());
        assert_eq!(view.settled_batches(), 0);
        assert!(!view.activate(|| async { Ok(9) }));
        assert_eq!(view.settled().await, ViewStatus::Loading);
    }
}
