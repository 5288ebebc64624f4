//! Input sources for TimeScope.
//!
//! A source produces batches of raw [`LogEvent`]s and hands them to a
//! caller-supplied sink; the caller routes them into the event type
//! index. Batch sources (JSON array, NDJSON) read local files in
//! configurable chunks; stream sources (WebSocket, SSE) run until the
//! remote closes or [`EventSource::stop`] is called via their handle.
//!
//! [`LogEvent`]: timescope_protocol::LogEvent

pub mod batch;
pub mod registry;
pub mod source;
pub mod sse;
pub mod websocket;

pub use batch::{JsonArraySource, NdjsonSource};
pub use registry::SessionRegistry;
pub use source::{BatchSink, EventSource, SourceHandle};
pub use sse::SseSource;
pub use websocket::WebSocketSource;
