use tracing::warn;

use timescope_index::EventTypeIndex;

use crate::observer::Observer;

/// Outcome of one dispatch turn.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Observers whose callback ran (successfully or not).
    pub notified: usize,
    /// Ids whose callback returned an error this turn.
    pub failed: Vec<String>,
}

/// Registry of observers driven by an externally owned time cursor.
///
/// A pure dispatcher: it never validates the cursor against any
/// bucket's actual range, never schedules work and never retries.
/// Dispatch is synchronous, on the calling thread, in registration
/// order. Callers serialize `move_to` turns themselves; rapid cursor
/// changes should be coalesced through [`CursorCoalescer`] first.
///
/// [`CursorCoalescer`]: crate::coalesce::CursorCoalescer
#[derive(Debug, Default)]
pub struct TimelineEngine {
    observers: Vec<Observer>,
}

impl TimelineEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer, upserting by id.
    ///
    /// A re-registration replaces the previous callback in place,
    /// keeping the original slot so notify order stays deterministic.
    pub fn register(&mut self, observer: Observer) {
        match self.observers.iter_mut().find(|o| o.id == observer.id) {
            Some(slot) => *slot = observer,
            None => self.observers.push(observer),
        }
    }

    /// Removes an observer; returns whether one was registered.
    pub fn deregister(&mut self, id: &str) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Registered ids in notify order.
    pub fn observer_ids(&self) -> Vec<&str> {
        self.observers.iter().map(|o| o.id.as_str()).collect()
    }

    /// Moves the time cursor: every observer is invoked exactly once, in
    /// registration order, with the new cursor position and the index.
    ///
    /// A failing callback is logged and reported but does not stop the
    /// turn; later observers still run.
    pub fn move_to(&mut self, timestamp_ms: i64, index: &EventTypeIndex) -> DispatchReport {
        let mut report = DispatchReport::default();
        for observer in &mut self.observers {
            report.notified += 1;
            if let Err(err) = observer.render_at(timestamp_ms, index) {
                warn!(observer = %observer.id, %err, "observer failed during dispatch");
                report.failed.push(observer.id.clone());
            }
        }
        report
    }
}
