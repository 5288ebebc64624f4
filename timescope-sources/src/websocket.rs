use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

use timescope_core::{CoreResult, TimescopeError};
use timescope_protocol::LogEvent;

use crate::source::{BatchSink, EventSource, SourceHandle};

/// Live event stream over a WebSocket connection.
///
/// Each text or binary frame carries either one event object or an
/// array of events; either way the decoded batch is handed to the sink
/// as-is. Pings are answered, a close frame or `stop` ends the stream.
pub struct WebSocketSource {
    url: String,
    handle: SourceHandle,
}

impl WebSocketSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            handle: SourceHandle::new(),
        }
    }
}

#[async_trait]
impl EventSource for WebSocketSource {
    async fn start(&mut self, mut on_events: BatchSink) -> CoreResult<()> {
        let url = Url::parse(&self.url)
            .map_err(|err| TimescopeError::ConfigError(format!("invalid stream URL: {err}")))?;

        info!(url = %url, "connecting to event stream");
        let (stream, _) = connect_async(url)
            .await
            .map_err(|err| TimescopeError::TransportError(err.to_string()))?;
        let (mut sender, mut receiver) = stream.split();

        loop {
            tokio::select! {
                _ = self.handle.cancelled() => {
                    debug!("stream stopped by owner");
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
                incoming = receiver.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => {
                            match decode_frame(text.as_bytes()) {
                                Ok(events) if !events.is_empty() => on_events(events),
                                Ok(_) => {}
                                Err(err) => warn!(%err, "undecodable frame dropped"),
                            }
                        }
                        Some(Ok(Message::Binary(bytes))) => {
                            match decode_frame(&bytes) {
                                Ok(events) if !events.is_empty() => on_events(events),
                                Ok(_) => {}
                                Err(err) => warn!(%err, "undecodable frame dropped"),
                            }
                        }
                        Some(Ok(Message::Ping(payload))) => {
                            if let Err(err) = sender.send(Message::Pong(payload)).await {
                                warn!(%err, "failed to answer ping");
                                break;
                            }
                        }
                        Some(Ok(Message::Pong(_))) => {}
                        Some(Ok(Message::Close(frame))) => {
                            debug!(?frame, "stream closed by remote");
                            break;
                        }
                        Some(Ok(other)) => {
                            debug!(message = ?other, "control frame ignored");
                        }
                        Some(Err(err)) => {
                            return Err(TimescopeError::TransportError(err.to_string()));
                        }
                        None => {
                            debug!("stream ended");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn handle(&self) -> SourceHandle {
        self.handle.clone()
    }
}

/// Decodes one frame into a batch: a single object becomes a batch of
/// one, an array keeps its order with non-object elements dropped.
pub(crate) fn decode_frame(bytes: &[u8]) -> CoreResult<Vec<LogEvent>> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    match value {
        object @ serde_json::Value::Object(_) => {
            Ok(LogEvent::from_value(object).into_iter().collect())
        }
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(LogEvent::from_value)
            .collect()),
        other => Err(TimescopeError::DeserializationError(format!(
            "expected an event object or array, got {other}"
        ))),
    }
}
