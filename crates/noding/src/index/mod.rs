//! Spatial indexes over axis-aligned extents.
//!
//! Purpose
//! - `SpatialIndex<T>`: the 2D range-query contract (`insert`, `visit`,
//!   `query`, `remove`). Implemented by `Quadtree` (dynamic) and `StrTree`
//!   (static, packed), and by the `Index` enum that picks one at construction.
//! - `IntervalIndex<T>`: the same contract over 1D intervals. Implemented by
//!   `Bintree` (dynamic) and `SortedPackedIntervalRTree` (static, packed).
//! - `SweepLineIndex`: batch overlap enumeration for a fixed set of intervals.
//!
//! Conventions
//! - Extents are closed; touching extents overlap.
//! - Items are stored with their extent and filtered against the query, so
//!   results are exact (no false positives) for every variant.
//! - Queries on an empty index return nothing. Inserting into a static index
//!   after its first query returns `IndexError::InsertAfterQuery`.

mod bintree;
mod interval_rtree;
mod quadtree;
mod strtree;
mod sweepline;

pub use bintree::Bintree;
pub use interval_rtree::SortedPackedIntervalRTree;
pub use quadtree::Quadtree;
pub use strtree::StrTree;
pub use sweepline::{EventKind, SweepEvent, SweepLineIndex};

use crate::error::IndexError;
use crate::geom::{Envelope, Interval};

/// 2D range-query index.
pub trait SpatialIndex<T> {
    fn insert(&mut self, env: Envelope, item: T) -> Result<(), IndexError>;

    /// Calls `visitor` for every item whose extent intersects `env`.
    fn visit(&self, env: &Envelope, visitor: &mut dyn FnMut(&T));

    fn query(&self, env: &Envelope) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::new();
        self.visit(env, &mut |t| out.push(t.clone()));
        out
    }

    /// Removes one item equal to `item` inserted with an extent meeting `env`.
    fn remove(&mut self, env: &Envelope, item: &T) -> bool
    where
        T: PartialEq;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 1D range-query index.
pub trait IntervalIndex<T> {
    fn insert(&mut self, interval: Interval, item: T) -> Result<(), IndexError>;

    fn visit(&self, interval: &Interval, visitor: &mut dyn FnMut(&T));

    fn query(&self, interval: &Interval) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::new();
        self.visit(interval, &mut |t| out.push(t.clone()));
        out
    }

    fn remove(&mut self, interval: &Interval, item: &T) -> bool
    where
        T: PartialEq;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which 2D index backs a noder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexKind {
    #[default]
    StrTree,
    Quadtree,
}

/// A 2D index variant chosen at construction time.
pub enum Index<T> {
    StrTree(StrTree<T>),
    Quadtree(Quadtree<T>),
}

impl<T> Index<T> {
    pub fn new(kind: IndexKind) -> Self {
        match kind {
            IndexKind::StrTree => Index::StrTree(StrTree::new()),
            IndexKind::Quadtree => Index::Quadtree(Quadtree::new()),
        }
    }

    pub fn kind(&self) -> IndexKind {
        match self {
            Index::StrTree(_) => IndexKind::StrTree,
            Index::Quadtree(_) => IndexKind::Quadtree,
        }
    }
}

impl<T> SpatialIndex<T> for Index<T> {
    fn insert(&mut self, env: Envelope, item: T) -> Result<(), IndexError> {
        match self {
            Index::StrTree(t) => t.insert(env, item),
            Index::Quadtree(t) => t.insert(env, item),
        }
    }

    fn visit(&self, env: &Envelope, visitor: &mut dyn FnMut(&T)) {
        match self {
            Index::StrTree(t) => t.visit(env, visitor),
            Index::Quadtree(t) => t.visit(env, visitor),
        }
    }

    fn remove(&mut self, env: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self {
            Index::StrTree(t) => t.remove(env, item),
            Index::Quadtree(t) => t.remove(env, item),
        }
    }

    fn len(&self) -> usize {
        match self {
            Index::StrTree(t) => t.len(),
            Index::Quadtree(t) => t.len(),
        }
    }
}

/// Binary exponent of `d` (`floor(log2 |d|)` for normal values).
#[inline]
pub(crate) fn exponent(d: f64) -> i32 {
    (((d.to_bits() >> 52) & 0x7ff) as i32) - 1023
}

#[inline]
pub(crate) fn power_of_2(exp: i32) -> f64 {
    2f64.powi(exp)
}

/// Intervals narrower than this binary exponent, relative to their magnitude,
/// are treated as points when choosing a partition node.
const MIN_BINARY_EXPONENT: i32 = -50;

/// True if `[min, max]` is zero-width or too narrow to be split further
/// without running out of mantissa bits.
pub(crate) fn is_zero_width(min: f64, max: f64) -> bool {
    let width = max - min;
    if width == 0.0 {
        return true;
    }
    let max_abs = min.abs().max(max.abs());
    let scaled = width / max_abs;
    exponent(scaled) <= MIN_BINARY_EXPONENT
}

#[cfg(test)]
mod tests;
