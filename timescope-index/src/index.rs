use std::collections::HashMap;

use tracing::{debug, warn};

use timescope_protocol::{discover_keys, parse_timestamp_ms, DiscoveredKeys, LogEvent};

use crate::bucket::EventBucket;
use crate::error::IndexError;

/// Per-batch ingestion accounting.
///
/// Malformed records (unparseable date, missing or non-string type,
/// out-of-order timestamp) are skipped rather than failing the batch;
/// the skip count is surfaced once per batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub ingested: usize,
    pub skipped: usize,
}

/// Mapping from event-type string to its sorted [`EventBucket`].
///
/// Built once per loaded dataset and replaced wholesale when a new file
/// is loaded. The index only ever adds or extends buckets. Batches are
/// assumed pre-sorted by time across all types combined; a record that
/// would land before its bucket's tail is counted as skipped.
#[derive(Debug, Default)]
pub struct EventTypeIndex {
    buckets: HashMap<String, EventBucket>,
    keys: DiscoveredKeys,
}

impl EventTypeIndex {
    /// Empty index with pre-resolved keys, for live sessions where the
    /// keys are known before any data arrives.
    pub fn with_keys(keys: DiscoveredKeys) -> Self {
        Self {
            buckets: HashMap::new(),
            keys,
        }
    }

    /// Builds an index from one raw batch.
    ///
    /// Key discovery runs once against the first event. Missing either
    /// axis fails the build with [`IndexError::DiscoveryFailed`]; the
    /// caller surfaces a single user-visible warning and stays in a
    /// "no data" state.
    pub fn build_from_batch(
        events: Vec<LogEvent>,
    ) -> Result<(Self, IngestReport), IndexError> {
        let keys = match events.first() {
            Some(sample) => discover_keys(sample),
            None => DiscoveredKeys::default(),
        };
        if !keys.is_complete() {
            return Err(IndexError::DiscoveryFailed {
                date_found: keys.date_key.is_some(),
                message_found: keys.message_key.is_some(),
            });
        }

        let mut index = Self::with_keys(keys);
        let report = index.extend_from_batch(events);
        Ok((index, report))
    }

    /// Routes a further batch through the already-discovered keys.
    pub fn extend_from_batch(&mut self, events: Vec<LogEvent>) -> IngestReport {
        let mut report = IngestReport::default();
        for event in events {
            match self.route(event) {
                Ok(()) => report.ingested += 1,
                Err(err) => {
                    debug!(%err, "record skipped");
                    report.skipped += 1;
                }
            }
        }
        if report.skipped > 0 {
            warn!(
                skipped = report.skipped,
                ingested = report.ingested,
                "batch contained malformed or out-of-order records"
            );
        }
        report
    }

    /// Routes one live event; intended for streaming ingestion.
    ///
    /// The error says why the event was skipped so stream sources can
    /// keep their own skip counters; the index does not log per record.
    pub fn append_live(&mut self, event: LogEvent) -> Result<(), IndexError> {
        self.route(event)
    }

    fn route(&mut self, event: LogEvent) -> Result<(), IndexError> {
        let (Some(date_key), Some(message_key)) =
            (self.keys.date_key.as_deref(), self.keys.message_key.as_deref())
        else {
            return Err(IndexError::DiscoveryFailed {
                date_found: self.keys.date_key.is_some(),
                message_found: self.keys.message_key.is_some(),
            });
        };

        let Some(timestamp_ms) = event.get(date_key).and_then(parse_timestamp_ms) else {
            return Err(IndexError::MalformedRecord("date field missing or unparseable"));
        };
        let Some(event_type) = event.get(message_key).and_then(|v| v.as_str()) else {
            return Err(IndexError::MalformedRecord("type field missing or not a string"));
        };
        let event_type = event_type.to_owned();

        self.buckets
            .entry(event_type)
            .or_insert_with(EventBucket::new)
            .append_sorted(timestamp_ms, event)
    }

    /// Bucket for an exact type match.
    pub fn bucket(&self, event_type: &str) -> Option<&EventBucket> {
        self.buckets.get(event_type)
    }

    pub fn bucket_mut(&mut self, event_type: &str) -> Option<&mut EventBucket> {
        self.buckets.get_mut(event_type)
    }

    /// All buckets whose type key contains `needle`, case-insensitively.
    pub fn buckets_matching(&self, needle: &str) -> Vec<(&str, &EventBucket)> {
        let needle = needle.to_lowercase();
        self.buckets
            .iter()
            .filter(|(key, _)| key.to_lowercase().contains(&needle))
            .map(|(key, bucket)| (key.as_str(), bucket))
            .collect()
    }

    /// Bucket for `event_type`, created empty when absent; used when an
    /// observer declares interest before any data for that type arrives.
    pub fn get_or_create_bucket(&mut self, event_type: &str) -> &mut EventBucket {
        self.buckets
            .entry(event_type.to_owned())
            .or_insert_with(EventBucket::new)
    }

    /// Known type keys; order is not significant.
    pub fn types(&self) -> Vec<&str> {
        self.buckets.keys().map(String::as_str).collect()
    }

    /// The keys discovered at build time.
    pub fn keys(&self) -> &DiscoveredKeys {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total entries across all buckets.
    pub fn total_events(&self) -> usize {
        self.buckets.values().map(EventBucket::len).sum()
    }

    /// Trims every bucket's backing storage; used before long-term
    /// retention.
    pub fn seal_all(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.seal();
        }
    }
}
