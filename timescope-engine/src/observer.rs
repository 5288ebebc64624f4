use std::fmt;

use timescope_index::EventTypeIndex;

use crate::error::ObserverError;

/// Callback invoked for each registered observer on every cursor move.
pub type RenderFn = Box<dyn FnMut(i64, &EventTypeIndex) -> Result<(), ObserverError> + Send>;

/// A widget's registration with the timeline engine: identity, the event
/// types it cares about, and the callback run on each cursor move.
///
/// Identity is the `id`; registering again under the same id replaces
/// the callback while keeping the observer's slot in the notify order.
/// The interest set is advisory metadata for the UI layer (widgets query
/// whichever buckets they want inside the callback); the engine does not
/// filter dispatch by it.
pub struct Observer {
    pub id: String,
    pub interests: Vec<String>,
    pub(crate) render: RenderFn,
}

impl Observer {
    pub fn new<F>(id: impl Into<String>, interests: Vec<String>, render: F) -> Self
    where
        F: FnMut(i64, &EventTypeIndex) -> Result<(), ObserverError> + Send + 'static,
    {
        Self {
            id: id.into(),
            interests,
            render: Box::new(render),
        }
    }

    /// Runs the callback for one cursor position.
    pub fn render_at(&mut self, timestamp_ms: i64, index: &EventTypeIndex) -> Result<(), ObserverError> {
        (self.render)(timestamp_ms, index)
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.id)
            .field("interests", &self.interests)
            .finish_non_exhaustive()
    }
}
