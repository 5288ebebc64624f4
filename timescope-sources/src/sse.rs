use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, info, warn};
use url::Url;

use timescope_core::{CoreResult, TimescopeError};
use timescope_protocol::LogEvent;

use crate::source::{BatchSink, EventSource, SourceHandle};
use crate::websocket::decode_frame;

/// Live event stream over Server-Sent Events.
///
/// Standard SSE framing: `data:` lines accumulate, a blank line
/// dispatches the accumulated payload, comment lines (leading `:`) and
/// other fields are ignored. Each dispatched payload is decoded like a
/// WebSocket frame (one object or an array).
pub struct SseSource {
    url: String,
    client: reqwest::Client,
    handle: SourceHandle,
}

impl SseSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            handle: SourceHandle::new(),
        }
    }
}

#[async_trait]
impl EventSource for SseSource {
    async fn start(&mut self, mut on_events: BatchSink) -> CoreResult<()> {
        let url = Url::parse(&self.url)
            .map_err(|err| TimescopeError::ConfigError(format!("invalid stream URL: {err}")))?;

        info!(url = %url, "connecting to SSE stream");
        let response = self
            .client
            .get(url)
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|err| TimescopeError::TransportError(err.to_string()))?;
        if !response.status().is_success() {
            return Err(TimescopeError::TransportError(format!(
                "SSE endpoint returned {}",
                response.status()
            )));
        }

        let mut body = response.bytes_stream();
        let mut frames = SseFrameBuffer::default();

        loop {
            tokio::select! {
                _ = self.handle.cancelled() => {
                    debug!("stream stopped by owner");
                    break;
                }
                chunk = body.next() => {
                    match chunk {
                        Some(Ok(bytes)) => {
                            for payload in frames.push(&bytes) {
                                match decode_frame(payload.as_bytes()) {
                                    Ok(events) if !events.is_empty() => on_events(events),
                                    Ok(_) => {}
                                    Err(err) => warn!(%err, "undecodable SSE event dropped"),
                                }
                            }
                        }
                        Some(Err(err)) => {
                            return Err(TimescopeError::TransportError(err.to_string()));
                        }
                        None => {
                            debug!("SSE stream ended");
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

/// Incremental SSE frame parser.
///
/// Bytes arrive in arbitrary chunk boundaries; this buffer reassembles
/// lines, accumulates `data:` fields and yields one payload string per
/// blank-line-terminated event.
#[derive(Debug, Default)]
pub(crate) struct SseFrameBuffer {
    partial_line: String,
    data_lines: Vec<String>,
}

impl SseFrameBuffer {
    /// Feeds one chunk, returning every payload completed by it.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut completed = Vec::new();
        self.partial_line.push_str(&String::from_utf8_lossy(bytes));

        while let Some(newline) = self.partial_line.find('\n') {
            let mut line = self.partial_line[..newline].to_string();
            self.partial_line.drain(..=newline);
            if line.ends_with('\r') {
                line.pop();
            }

            if line.is_empty() {
                if !self.data_lines.is_empty() {
                    completed.push(self.data_lines.join("\n"));
                    self.data_lines.clear();
                }
            } else if let Some(data) = line.strip_prefix("data:") {
                self.data_lines.push(data.strip_prefix(' ').unwrap_or(data).to_string());
            }
            // Comments (leading ':') and other SSE fields are ignored.
        }

        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_dispatches_accumulated_data() {
        let mut buffer = SseFrameBuffer::default();
        let payloads = buffer.push(b"data: {\"date\":1,\"message\":\"a\"}\n\n");
        assert_eq!(payloads, vec![r#"{"date":1,"message":"a"}"#.to_string()]);
    }

    #[test]
    fn multiline_data_joins_with_newlines() {
        let mut buffer = SseFrameBuffer::default();
        let payloads = buffer.push(b"data: line one\ndata: line two\n\n");
        assert_eq!(payloads, vec!["line one\nline two".to_string()]);
    }

    #[test]
    fn chunk_boundaries_do_not_split_events() {
        let mut buffer = SseFrameBuffer::default();
        assert!(buffer.push(b"data: {\"da").is_empty());
        assert!(buffer.push(b"te\":1}").is_empty());
        let payloads = buffer.push(b"\n\n");
        assert_eq!(payloads, vec![r#"{"date":1}"#.to_string()]);
    }

    #[test]
    fn comments_and_other_fields_are_ignored() {
        let mut buffer = SseFrameBuffer::default();
        let payloads = buffer.push(b": keepalive\nid: 7\nevent: tick\ndata: {}\n\n");
        assert_eq!(payloads, vec!["{}".to_string()]);
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let mut buffer = SseFrameBuffer::default();
        let payloads = buffer.push(b"data: {}\r\n\r\n");
        assert_eq!(payloads, vec!["{}".to_string()]);
    }
}
