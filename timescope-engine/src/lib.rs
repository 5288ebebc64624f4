//! Time-cursor dispatch for TimeScope dashboard widgets.
//!
//! Widgets register an [`Observer`] declaring their identity and the
//! event types they care about; every [`TimelineEngine::move_to`] call
//! notifies all observers synchronously, in registration order, with
//! the new cursor position and the current [`EventTypeIndex`].
//!
//! [`EventTypeIndex`]: timescope_index::EventTypeIndex

pub mod coalesce;
pub mod engine;
pub mod error;
pub mod observer;

pub use coalesce::CursorCoalescer;
pub use engine::{DispatchReport, TimelineEngine};
pub use error::ObserverError;
pub use observer::Observer;
