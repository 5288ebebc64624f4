use serde_json::Value;

use crate::event::LogEvent;
use crate::time::parse_timestamp_ms;

/// Field names tried first, in order, when looking for the date axis.
const DATE_CANDIDATES: &[&str] = &[
    "timestamp",
    "date",
    "ts",
    "time",
    "createdAt",
    "created_at",
    "datetime",
    "@timestamp",
];

/// Field names tried first, in order, when looking for the message axis.
const MESSAGE_CANDIDATES: &[&str] = &[
    "message",
    "msg",
    "logMessage",
    "log_message",
    "event",
    "type",
    "details",
    "body",
];

/// Result of inspecting a sample event: which field carries the
/// timestamp and which carries the event-type discriminator.
///
/// Each axis resolves independently; indexing requires both, so callers
/// treat a partial result as a total discovery failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveredKeys {
    pub date_key: Option<String>,
    pub message_key: Option<String>,
}

impl DiscoveredKeys {
    pub fn new(date_key: impl Into<String>, message_key: impl Into<String>) -> Self {
        Self {
            date_key: Some(date_key.into()),
            message_key: Some(message_key.into()),
        }
    }

    /// True when both axes resolved.
    pub fn is_complete(&self) -> bool {
        self.date_key.is_some() && self.message_key.is_some()
    }
}

/// Heuristically identifies the date and message fields of a sample event.
///
/// Priority candidates are tried first on each axis; when none match,
/// the date axis falls back to the first field whose value parses as a
/// timestamp, and the message axis falls back to the longest
/// string-valued field. Deterministic for a given sample since fields
/// are scanned in document order.
pub fn discover_keys(sample: &LogEvent) -> DiscoveredKeys {
    let mut date_key = DATE_CANDIDATES
        .iter()
        .find(|name| {
            sample
                .get(name)
                .map(|value| parse_timestamp_ms(value).is_some())
                .unwrap_or(false)
        })
        .map(|name| name.to_string());

    let mut message_key = MESSAGE_CANDIDATES
        .iter()
        .find(|name| matches!(sample.get(name), Some(Value::String(_))))
        .map(|name| name.to_string());

    if date_key.is_some() && message_key.is_some() {
        return DiscoveredKeys {
            date_key,
            message_key,
        };
    }

    // Fallback scan over every field in document order.
    let mut longest_string: Option<(&String, usize)> = None;
    for (name, value) in sample.fields() {
        if date_key.is_none() && parse_timestamp_ms(value).is_some() {
            date_key = Some(name.clone());
        }
        if let Value::String(text) = value {
            let longer = longest_string
                .map(|(_, len)| text.len() > len)
                .unwrap_or(true);
            if longer {
                longest_string = Some((name, text.len()));
            }
        }
    }

    if message_key.is_none() {
        message_key = longest_string.map(|(name, _)| name.clone());
    }

    DiscoveredKeys {
        date_key,
        message_key,
    }
}
