use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use timescope_core::config::DEFAULT_BATCH_CHUNK_SIZE;
use timescope_core::{CoreResult, TimescopeError};
use timescope_protocol::LogEvent;

use crate::source::{BatchSink, EventSource, SourceHandle};

/// Reads a whole-file JSON array and emits it in chunks.
///
/// Chunked emission keeps a large upload from landing on the caller as
/// one giant batch; chunk boundaries preserve input order, so the
/// index's pre-sorted precondition is unaffected.
pub struct JsonArraySource {
    path: PathBuf,
    chunk_size: usize,
    handle: SourceHandle,
}

impl JsonArraySource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_chunk_size(path, DEFAULT_BATCH_CHUNK_SIZE)
    }

    pub fn with_chunk_size(path: impl AsRef<Path>, chunk_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            chunk_size: chunk_size.max(1),
            handle: SourceHandle::new(),
        }
    }
}

#[async_trait]
impl EventSource for JsonArraySource {
    async fn start(&mut self, mut on_events: BatchSink) -> CoreResult<()> {
        let file = File::open(&self.path)?;
        let values: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| TimescopeError::DeserializationError(err.to_string()))?;

        let mut skipped = 0usize;
        let mut chunk = Vec::with_capacity(self.chunk_size.min(values.len()));
        for value in values {
            if self.handle.is_stopped() {
                break;
            }
            match LogEvent::from_value(value) {
                Some(event) => chunk.push(event),
                None => skipped += 1,
            }
            if chunk.len() == self.chunk_size {
                on_events(std::mem::take(&mut chunk));
            }
        }
        if !chunk.is_empty() {
            on_events(chunk);
        }
        if skipped > 0 {
            warn!(path = %self.path.display(), skipped, "non-object elements in JSON array");
        }
        Ok(())
    }

    fn handle(&self) -> SourceHandle {
        self.handle.clone()
    }
}

/// Reads newline-delimited JSON, one event per line.
///
/// Blank lines are skipped; malformed lines are counted and reported
/// once per file rather than failing the load.
pub struct NdjsonSource {
    path: PathBuf,
    chunk_size: usize,
    handle: SourceHandle,
}

impl NdjsonSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_chunk_size(path, DEFAULT_BATCH_CHUNK_SIZE)
    }

    pub fn with_chunk_size(path: impl AsRef<Path>, chunk_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            chunk_size: chunk_size.max(1),
            handle: SourceHandle::new(),
        }
    }
}

#[async_trait]
impl EventSource for NdjsonSource {
    async fn start(&mut self, mut on_events: BatchSink) -> CoreResult<()> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut skipped = 0usize;
        let mut chunk = Vec::new();
        for line in reader.lines() {
            if self.handle.is_stopped() {
                break;
            }
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<serde_json::Value>(&line)
                .ok()
                .and_then(LogEvent::from_value)
            {
                Some(event) => chunk.push(event),
                None => skipped += 1,
            }
            if chunk.len() == self.chunk_size {
                on_events(std::mem::take(&mut chunk));
            }
        }
        if !chunk.is_empty() {
            on_events(chunk);
        }
        if skipped > 0 {
            warn!(path = %self.path.display(), skipped, "malformed NDJSON lines");
        }
        Ok(())
    }

    fn handle(&self) -> SourceHandle {
        self.handle.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;

    fn collecting_sink() -> (BatchSink, Arc<Mutex<Vec<Vec<LogEvent>>>>) {
        let batches: Arc<Mutex<Vec<Vec<LogEvent>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_batches = batches.clone();
        let sink: BatchSink = Box::new(move |events| {
            sink_batches.lock().unwrap().push(events);
        });
        (sink, batches)
    }

    #[tokio::test]
    async fn json_array_emits_in_chunks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"date":1,"message":"a"}},{{"date":2,"message":"b"}},{{"date":3,"message":"c"}}]"#
        )
        .unwrap();

        let (sink, batches) = collecting_sink();
        let mut source = JsonArraySource::with_chunk_size(file.path(), 2);
        source.start(sink).await.unwrap();

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[1].len(), 1);
    }

    #[tokio::test]
    async fn json_array_skips_non_objects() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"date":1,"message":"a"}}, 42, "text"]"#).unwrap();

        let (sink, batches) = collecting_sink();
        let mut source = JsonArraySource::new(file.path());
        source.start(sink).await.unwrap();

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
    }

    #[tokio::test]
    async fn json_array_rejects_a_non_array_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"not":"an array"}}"#).unwrap();

        let (sink, _) = collecting_sink();
        let mut source = JsonArraySource::new(file.path());
        assert!(source.start(sink).await.is_err());
    }

    #[tokio::test]
    async fn ndjson_skips_blank_and_malformed_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"date":1,"message":"a"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{{broken").unwrap();
        writeln!(file, r#"{{"date":2,"message":"b"}}"#).unwrap();

        let (sink, batches) = collecting_sink();
        let mut source = NdjsonSource::new(file.path());
        source.start(sink).await.unwrap();

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let labels: Vec<_> = batches[0]
            .iter()
            .map(|e| e.get("message").cloned().unwrap())
            .collect();
        assert_eq!(labels, vec![serde_json::json!("a"), serde_json::json!("b")]);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let (sink, _) = collecting_sink();
        let mut source = NdjsonSource::new("/definitely/not/here.ndjson");
        let err = source.start(sink).await.unwrap_err();
        assert!(matches!(err, TimescopeError::IoError(_)));
    }
}
