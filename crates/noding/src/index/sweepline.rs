//! Sweep-line overlap enumeration for 1D intervals.
//!
//! Every interval contributes an insert event at its min and a delete event
//! at its max. After one sort (insert before delete on equal keys, so
//! touching intervals overlap) each insert event records the position of its
//! delete event, and the overlaps of an interval are exactly the insert
//! events strictly between the two.

use crate::error::IndexError;
use crate::geom::Interval;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventKind {
    /// `delete_index` is the sorted position of the paired delete event.
    Insert { delete_index: usize },
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepEvent {
    pub key: f64,
    /// Index of the owning interval in insertion order.
    pub interval: usize,
    pub kind: EventKind,
}

impl SweepEvent {
    #[inline]
    pub fn is_insert(&self) -> bool {
        matches!(self.kind, EventKind::Insert { .. })
    }
}

pub struct SweepLineIndex<T> {
    intervals: Vec<(Interval, T)>,
    events: Vec<SweepEvent>,
    built: bool,
    overlaps: usize,
}

impl<T> Default for SweepLineIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SweepLineIndex<T> {
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            events: Vec::new(),
            built: false,
            overlaps: 0,
        }
    }

    pub fn add(&mut self, interval: Interval, item: T) -> Result<(), IndexError> {
        if self.built {
            return Err(IndexError::InsertAfterQuery);
        }
        let id = self.intervals.len();
        self.intervals.push((interval, item));
        self.events.push(SweepEvent {
            key: interval.min,
            interval: id,
            kind: EventKind::Insert { delete_index: 0 },
        });
        self.events.push(SweepEvent {
            key: interval.max,
            interval: id,
            kind: EventKind::Delete,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Sorted events (empty until the first `compute_overlaps`).
    pub fn events(&self) -> &[SweepEvent] {
        if self.built {
            &self.events
        } else {
            &[]
        }
    }

    /// Number of pairs reported by the last `compute_overlaps`.
    pub fn overlap_count(&self) -> usize {
        self.overlaps
    }

    fn build(&mut self) {
        if self.built {
            return;
        }
        self.events.sort_by(|a, b| {
            a.key
                .total_cmp(&b.key)
                .then_with(|| b.is_insert().cmp(&a.is_insert()))
        });
        let mut insert_pos = vec![0usize; self.intervals.len()];
        for i in 0..self.events.len() {
            let ev = self.events[i];
            match ev.kind {
                EventKind::Insert { .. } => insert_pos[ev.interval] = i,
                EventKind::Delete => {
                    self.events[insert_pos[ev.interval]].kind =
                        EventKind::Insert { delete_index: i };
                }
            }
        }
        self.built = true;
    }

    /// Calls `action` once for every unordered pair of overlapping intervals.
    /// The interval inserted first (in sweep order) is passed first.
    pub fn compute_overlaps<F: FnMut(&T, &T)>(&mut self, mut action: F) {
        self.build();
        let mut n = 0;
        for (i, ev) in self.events.iter().enumerate() {
            let EventKind::Insert { delete_index } = ev.kind else {
                continue;
            };
            let s0 = &self.intervals[ev.interval].1;
            for other in &self.events[i + 1..delete_index] {
                if other.is_insert() {
                    action(s0, &self.intervals[other.interval].1);
                    n += 1;
                }
            }
        }
        self.overlaps = n;
        tracing::trace!(overlaps = n, "sweep line");
    }
}
