use thiserror::Error;

/// Failure raised by an observer callback during dispatch.
///
/// One observer failing never stops the dispatch turn; the engine logs
/// the failure and moves on to the next observer.
#[derive(Debug, Error)]
#[error("observer failed: {message}")]
pub struct ObserverError {
    pub message: String,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ObserverError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ObserverError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
