use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::source::SourceHandle;

/// Registry of running stream sessions, keyed by session id.
///
/// Constructed explicitly at application start and passed to whatever
/// owns live sources; `stop_all` belongs in the shutdown path. Keeping
/// the map inside an injected object (rather than module-level state)
/// gives it a documented lifecycle and makes tests trivial.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SourceHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a running source's handle. Re-registering an id stops the
    /// previous session first, so at most one stream runs per id.
    pub fn register(&self, session_id: impl Into<String>, handle: SourceHandle) {
        let session_id = session_id.into();
        let previous = self.sessions.lock().insert(session_id.clone(), handle);
        if let Some(previous) = previous {
            debug!(session = %session_id, "replacing live session");
            previous.stop();
        }
    }

    /// Stops and forgets one session; returns whether it existed.
    pub fn stop(&self, session_id: &str) -> bool {
        match self.sessions.lock().remove(session_id) {
            Some(handle) => {
                handle.stop();
                true
            }
            None => false,
        }
    }

    /// Stops every session; called at shutdown.
    pub fn stop_all(&self) {
        let mut sessions = self.sessions.lock();
        for (session_id, handle) in sessions.drain() {
            debug!(session = %session_id, "stopping session");
            handle.stop();
        }
    }

    /// Ids of sessions currently tracked.
    pub fn active(&self) -> Vec<String> {
        self.sessions.lock().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_removes_and_cancels() {
        let registry = SessionRegistry::new();
        let handle = SourceHandle::new();
        registry.register("upload-1", handle.clone());
        assert_eq!(registry.active(), vec!["upload-1".to_string()]);

        assert!(registry.stop("upload-1"));
        assert!(handle.is_stopped());
        assert!(registry.active().is_empty());
        assert!(!registry.stop("upload-1"));
    }

    #[test]
    fn reregistering_an_id_stops_the_previous_session() {
        let registry = SessionRegistry::new();
        let first = SourceHandle::new();
        let second = SourceHandle::new();
        registry.register("live", first.clone());
        registry.register("live", second.clone());
        assert!(first.is_stopped());
        assert!(!second.is_stopped());
        assert_eq!(registry.active().len(), 1);
    }

    #[test]
    fn stop_all_cancels_everything() {
        let registry = SessionRegistry::new();
        let a = SourceHandle::new();
        let b = SourceHandle::new();
        registry.register("a", a.clone());
        registry.register("b", b.clone());
        registry.stop_all();
        assert!(a.is_stopped());
        assert!(b.is_stopped());
        assert!(registry.active().is_empty());
    }
}
