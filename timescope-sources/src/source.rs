use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use timescope_core::CoreResult;
use timescope_protocol::LogEvent;

/// Callback receiving each batch a source produces.
///
/// Events within one batch are time-ascending, matching the index's
/// pre-sorted-input precondition.
pub type BatchSink = Box<dyn FnMut(Vec<LogEvent>) + Send>;

/// Cancellation handle shared between a running source and its owner.
///
/// Cloneable so it can live in a [`SessionRegistry`] while the source
/// task holds its own copy.
///
/// [`SessionRegistry`]: crate::registry::SessionRegistry
#[derive(Debug, Clone, Default)]
pub struct SourceHandle {
    stopped: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl SourceHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the source to cease production and release its
    /// underlying resources.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Resolves when `stop` is called. Callers must re-check
    /// `is_stopped` after any other wakeup.
    pub async fn cancelled(&self) {
        if self.is_stopped() {
            return;
        }
        self.notify.notified().await;
    }
}

/// Contract implemented by every input source.
#[async_trait]
pub trait EventSource: Send {
    /// Begins producing batches, invoking `on_events` one or more times.
    ///
    /// Resolves when the input is exhausted, the remote closes, or the
    /// source is stopped through its handle.
    async fn start(&mut self, on_events: BatchSink) -> CoreResult<()>;

    /// Handle used to cancel an in-flight stream. Owners must call
    /// `stop` on it before discarding a live source.
    fn handle(&self) -> SourceHandle;

    /// Ceases production and releases underlying resources.
    fn stop(&self) {
        self.handle().stop();
    }
}
