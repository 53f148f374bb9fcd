//! Best-effort notification dispatch.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use stagecast_core::models::NotificationEvent;
use stagecast_core::{NoOpNotificationSink, NotificationSink};

/// Delivers notifications on background tasks that callers never wait on.
///
/// Clones share the same sink and the same set of in-flight deliveries, so a
/// pipeline and a publisher built from one dispatcher can be drained together
/// before the runtime shuts down. Sink failures are logged and never reach
/// the caller.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    tracker: TaskTracker,
}

impl Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("NotificationDispatcher")
            .field("pending", &self.tracker.len())
            .finish()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(NoOpNotificationSink))
    }
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            tracker: TaskTracker::new(),
        }
    }

    /// Deliver `event` on a tracked task.
    ///
    /// The handle is returned for tests; callers normally drop it.
    pub fn notify(&self, event: NotificationEvent) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        self.tracker.spawn(async move {
            if let Err(e) = sink.notify(&event).await {
                tracing::warn!(
                    event_type = event.event_type(),
                    error = %e,
                    "Failed to deliver notification"
                );
            }
        })
    }

    /// Number of deliveries still in flight.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait up to `timeout` for every in-flight delivery to finish.
    ///
    /// Returns `false` when deliveries were still pending at the deadline.
    /// The dispatcher keeps accepting events afterwards.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let drained = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();
        self.tracker.reopen();

        if !drained {
            tracing::warn!(
                pending = self.tracker.len(),
                timeout_secs = timeout.as_secs(),
                "Notifications still pending after drain timeout"
            );
        }
        drained
    }
}
