/// Latest-wins cell for pending cursor positions.
///
/// The UI layer feeds every cursor change through `set`; the dispatch
/// loop drains with `take` once per frame. Intermediate positions are
/// dropped by design, so a burst of scrub events costs one dispatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct CursorCoalescer {
    pending: Option<i64>,
}

impl CursorCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cursor position, overwriting any pending one.
    pub fn set(&mut self, timestamp_ms: i64) {
        self.pending = Some(timestamp_ms);
    }

    /// Drains the latest pending position, if any.
    pub fn take(&mut self) -> Option<i64> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_position_wins() {
        let mut coalescer = CursorCoalescer::new();
        coalescer.set(10);
        coalescer.set(20);
        coalescer.set(15);
        assert_eq!(coalescer.take(), Some(15));
    }

    #[test]
    fn take_drains_the_cell() {
        let mut coalescer = CursorCoalescer::new();
        assert_eq!(coalescer.take(), None);
        coalescer.set(7);
        assert!(coalescer.is_pending());
        assert_eq!(coalescer.take(), Some(7));
        assert_eq!(coalescer.take(), None);
        assert!(!coalescer.is_pending());
    }
}
