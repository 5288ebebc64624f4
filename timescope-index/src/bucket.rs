use timescope_protocol::LogEvent;

use crate::error::IndexError;

/// Minimum backing capacity allocated on the first append.
const MIN_CAPACITY: usize = 4;

/// A per-event-type, timestamp-sorted, append-only sequence.
///
/// Timestamps and payloads live in parallel vectors kept in ascending
/// timestamp order, ties stable by insertion. All reads compose a single
/// upper-bound binary search, so point and range queries are O(log n).
/// The bucket never re-sorts: appends arriving out of order are rejected
/// rather than silently corrupting the invariant.
#[derive(Debug, Default)]
pub struct EventBucket {
    timestamps: Vec<i64>,
    payloads: Vec<LogEvent>,
}

/// Borrowed view over a contiguous time slice of a bucket.
#[derive(Debug, Clone, Copy)]
pub struct RangeView<'a> {
    pub timestamps: &'a [i64],
    pub payloads: &'a [LogEvent],
}

impl<'a> RangeView<'a> {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &'a LogEvent)> + '_ {
        self.timestamps.iter().copied().zip(self.payloads.iter())
    }
}

/// A single entry resolved by a point query.
#[derive(Debug, Clone, Copy)]
pub struct EventPointRef<'a> {
    pub timestamp_ms: i64,
    pub payload: &'a LogEvent,
}

impl EventBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry at the tail.
    ///
    /// Fails with [`IndexError::OutOfOrderAppend`] when `timestamp_ms` is
    /// older than the last stored timestamp; equal timestamps are fine
    /// and keep insertion order. Backing storage doubles when exhausted.
    pub fn append_sorted(&mut self, timestamp_ms: i64, payload: LogEvent) -> Result<(), IndexError> {
        if let Some(&last) = self.timestamps.last() {
            if timestamp_ms < last {
                return Err(IndexError::OutOfOrderAppend {
                    attempted: timestamp_ms,
                    last,
                });
            }
        }

        if self.timestamps.len() == self.timestamps.capacity() {
            let target = (self.timestamps.capacity() * 2).max(MIN_CAPACITY);
            self.timestamps.reserve_exact(target - self.timestamps.len());
            self.payloads.reserve_exact(target - self.payloads.len());
        }

        self.timestamps.push(timestamp_ms);
        self.payloads.push(payload);
        Ok(())
    }

    /// First index whose timestamp is strictly greater than `t`.
    ///
    /// The one search primitive behind every read operation.
    pub fn upper_bound(&self, t: i64) -> usize {
        self.timestamps.partition_point(|&stored| stored <= t)
    }

    /// Number of entries with `start < timestamp <= end`.
    pub fn count_in_range(&self, start_exclusive: i64, end_inclusive: i64) -> usize {
        self.upper_bound(end_inclusive)
            .saturating_sub(self.upper_bound(start_exclusive))
    }

    /// Entries with `start < timestamp <= end` as borrowed slices.
    pub fn range(&self, start_exclusive: i64, end_inclusive: i64) -> RangeView<'_> {
        if self.timestamps.is_empty() || end_inclusive <= start_exclusive {
            return RangeView {
                timestamps: &[],
                payloads: &[],
            };
        }
        let lo = self.upper_bound(start_exclusive);
        let hi = self.upper_bound(end_inclusive);
        RangeView {
            timestamps: &self.timestamps[lo..hi],
            payloads: &self.payloads[lo..hi],
        }
    }

    /// The latest entry with `timestamp <= t`, if any.
    pub fn last_at_or_before(&self, t: i64) -> Option<EventPointRef<'_>> {
        let idx = self.upper_bound(t).checked_sub(1)?;
        Some(EventPointRef {
            timestamp_ms: self.timestamps[idx],
            payload: &self.payloads[idx],
        })
    }

    /// First-inserted payload; used to introspect the schema of a type.
    pub fn first(&self) -> Option<&LogEvent> {
        self.payloads.first()
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.timestamps.last().copied()
    }

    /// Logical element count, distinct from backing capacity.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Trims backing storage to the logical size. Idempotent; queries and
    /// `len` are unaffected.
    pub fn seal(&mut self) {
        self.timestamps.shrink_to_fit();
        self.payloads.shrink_to_fit();
    }

    pub(crate) fn capacity(&self) -> usize {
        self.timestamps.capacity()
    }
}
