pub mod discover;
pub mod event;
pub mod time;

pub use discover::{discover_keys, DiscoveredKeys};
pub use event::LogEvent;
pub use time::parse_timestamp_ms;

pub mod prelude {
    pub use crate::discover::{discover_keys, DiscoveredKeys};
    pub use crate::event::LogEvent;
    pub use crate::time::parse_timestamp_ms;
}
