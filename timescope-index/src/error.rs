use thiserror::Error;

/// Errors surfaced by the bucket and index layer.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Key discovery could not resolve both axes on the sample event.
    #[error("key discovery failed: date key {date_found}, message key {message_found}")]
    DiscoveryFailed {
        date_found: bool,
        message_found: bool,
    },

    /// An append would have placed a timestamp before the bucket's tail.
    #[error("out-of-order append: {attempted} < last stored {last}")]
    OutOfOrderAppend { attempted: i64, last: i64 },

    /// A record could not be routed: date unparseable or type missing.
    #[error("malformed record: {0}")]
    MalformedRecord(&'static str),
}
