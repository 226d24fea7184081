//! Async error scope
//!
//! Holds the error state of one UI interaction area (a view, a panel) and the
//! handlers that move it between `Idle` and `Failed`. A scope is explicitly
//! started and cancelled: after [`AsyncErrorScope::cancel`] every late state
//! mutation is dropped and an in-flight [`AsyncErrorScope::retry`] is abandoned
//! at its await point.
//!
//! Overlapping calls are not serialized; the last write wins.

use crate::classifier::{classify, ErrorInfo};
use crate::error::Failure;
use crate::notify::Notifier;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

/// Context label used for failures of a retried operation
pub const RETRY_CONTEXT: &str = "retrying operation";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AsyncOperationState {
    #[default]
    Idle,
    Failed(String),
}

impl AsyncOperationState {
    pub fn error(&self) -> Option<&str> {
        match self {
            AsyncOperationState::Idle => None,
            AsyncOperationState::Failed(message) => Some(message),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, AsyncOperationState::Idle)
    }
}

/// How a retry ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    Succeeded,
    Failed,
    /// The scope was cancelled before the operation finished
    Abandoned,
}

struct ScopeInner {
    state: Mutex<AsyncOperationState>,
    alive: AtomicBool,
    cancel_tx: watch::Sender<bool>,
    notifier: Notifier,
}

/// Error state for one interaction scope. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AsyncErrorScope {
    inner: Arc<ScopeInner>,
}

impl AsyncErrorScope {
    /// Create a live scope in the `Idle` state.
    pub fn start(notifier: Notifier) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(ScopeInner {
                state: Mutex::new(AsyncOperationState::Idle),
                alive: AtomicBool::new(true),
                cancel_tx,
                notifier,
            }),
        }
    }

    /// Tear the scope down. Idempotent.
    pub fn cancel(&self) {
        if self.inner.alive.swap(false, Ordering::SeqCst) {
            debug!("Async error scope cancelled");
            self.inner.cancel_tx.send_replace(true);
        }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> AsyncOperationState {
        self.lock().clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error().map(str::to_string)
    }

    pub fn set_error(&self, error: Option<String>) {
        let next = match error {
            Some(message) => AsyncOperationState::Failed(message),
            None => AsyncOperationState::Idle,
        };
        self.transition(next);
    }

    /// Classify and surface a failure, then move to `Failed`.
    ///
    /// On a cancelled scope the failure is still classified and returned but
    /// neither shown nor stored.
    pub fn handle(&self, raw: impl Into<Failure>, context: Option<&str>) -> ErrorInfo {
        let raw = raw.into();
        if !self.is_alive() {
            debug!(error = %raw, "Dropping failure reported to a cancelled scope");
            return classify(&raw);
        }
        let info = self.inner.notifier.notify_error(&raw, context);
        self.transition(AsyncOperationState::Failed(info.message.clone()));
        info
    }

    pub fn clear(&self) {
        self.transition(AsyncOperationState::Idle);
    }

    /// Run `op` and route its failure through [`AsyncErrorScope::handle`].
    ///
    /// Returns the value on success, `None` on failure or cancellation.
    pub async fn run<T, F, Fut, E>(&self, context: &str, op: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Failure>,
    {
        match self.until_cancelled(op()).await? {
            Ok(value) => Some(value),
            Err(err) => {
                self.handle(err, Some(context));
                None
            }
        }
    }

    /// Clear the error, then run `op` once.
    ///
    /// A failure goes through `handle` with [`RETRY_CONTEXT`]; success leaves
    /// the scope `Idle`.
    pub async fn retry<F, Fut, E>(&self, op: F) -> RetryOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Into<Failure>,
    {
        self.clear();
        match self.until_cancelled(op()).await {
            None => RetryOutcome::Abandoned,
            Some(Ok(())) => RetryOutcome::Succeeded,
            Some(Err(err)) => {
                self.handle(err, Some(RETRY_CONTEXT));
                RetryOutcome::Failed
            }
        }
    }

    async fn until_cancelled<Fut: Future>(&self, fut: Fut) -> Option<Fut::Output> {
        let mut cancelled = self.inner.cancel_tx.subscribe();
        tokio::select! {
            output = fut => Some(output),
            _ = cancelled.wait_for(|c| *c) => None,
        }
    }

    fn transition(&self, next: AsyncOperationState) {
        if !self.is_alive() {
            return;
        }
        *self.lock() = next;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AsyncOperationState> {
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ErrorKind;
    use crate::notify::ToastQueue;
    use std::time::Duration;

    fn scope() -> (AsyncErrorScope, ToastQueue) {
        let queue = ToastQueue::new();
        let notifier = Notifier::new(Arc::new(queue.clone()), None);
        (AsyncErrorScope::start(notifier), queue)
    }

    #[test]
    fn test_handle_moves_to_failed() {
        let (scope, queue) = scope();
        let info = scope.handle(anyhow::anyhow!("API call failed: 401 Unauthorized"), Some("testing authentication"));

        assert_eq!(info.kind, ErrorKind::Auth);
        assert_eq!(scope.error().as_deref(), Some(info.message.as_str()));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_clear_is_unconditional() {
        let (scope, _) = scope();
        scope.clear();
        assert!(scope.state().is_idle());

        scope.set_error(Some("boom".into()));
        scope.clear();
        assert!(scope.state().is_idle());
    }

    #[tokio::test]
    async fn test_retry_success_leaves_idle() {
        let (scope, _) = scope();
        scope.set_error(Some("previous failure".into()));

        let outcome = scope.retry(|| async { Ok::<(), Failure>(()) }).await;
        assert_eq!(outcome, RetryOutcome::Succeeded);
        assert_eq!(scope.state(), AsyncOperationState::Idle);
    }

    #[tokio::test]
    async fn test_retry_failure_reports_classified_message() {
        let (scope, queue) = scope();

        let outcome = scope
            .retry(|| async { Err::<(), _>(anyhow::anyhow!("Server error: 500 Internal Server Error")) })
            .await;

        assert_eq!(outcome, RetryOutcome::Failed);
        assert_eq!(
            scope.state(),
            AsyncOperationState::Failed("Server error. Please try again later.".into())
        );
        let toasts = queue.visible(std::time::Instant::now());
        assert_eq!(toasts[0].notification.title, "Error retrying operation");
    }

    #[tokio::test]
    async fn test_retry_clears_before_running() {
        let (scope, _) = scope();
        scope.set_error(Some("stale".into()));
        let observer = scope.clone();

        scope
            .retry(|| async move {
                assert!(observer.state().is_idle());
                Ok::<(), Failure>(())
            })
            .await;
    }

    #[tokio::test]
    async fn test_cancel_abandons_inflight_retry() {
        let (scope, queue) = scope();
        let canceller = scope.clone();

        let handle = tokio::spawn(async move {
            scope
                .retry(|| async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err::<(), _>(Failure::message("too late"))
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();

        let outcome = handle.await.unwrap();
        assert_eq!(outcome, RetryOutcome::Abandoned);
        assert!(canceller.state().is_idle());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancelled_scope_ignores_mutations() {
        let (scope, queue) = scope();
        scope.cancel();
        scope.cancel();

        let info = scope.handle(Failure::message("late"), None);
        assert_eq!(info.message, "late");
        assert!(scope.state().is_idle());
        assert!(queue.is_empty());

        scope.set_error(Some("late".into()));
        assert!(scope.state().is_idle());
    }

    #[tokio::test]
    async fn test_run_routes_failure_with_context() {
        let (scope, queue) = scope();
        let value = scope
            .run("loading item assignments", || async { Err::<u32, _>(Failure::message("nope")) })
            .await;

        assert!(value.is_none());
        assert_eq!(scope.error().as_deref(), Some("nope"));
        let toasts = queue.visible(std::time::Instant::now());
        assert_eq!(toasts[0].notification.title, "Error loading item assignments");

        let value = scope.run("ok", || async { Ok::<u32, Failure>(7) }).await;
        assert_eq!(value, Some(7));
    }
}
