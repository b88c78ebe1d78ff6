//! Noding: splitting segment strings at all mutual intersections.
//!
//! Purpose
//! - `SegmentString`: an owned polyline plus a sorted set of node positions;
//!   `split` materializes the noded pieces as new strings.
//! - `SegmentIntersector`: the injected intersection policy. It sees two
//!   borrowed segment views and returns the points (if any) to record as
//!   nodes on both strings. Closures implement it directly.
//! - Engines: `McIndexNoder` (monotone chains in a spatial index, the
//!   default), `McSweepLineNoder` (chains in a sweep line) and `SimpleNoder`
//!   (all pairs, the reference).
//! - Drivers: `IteratedNoder` (repeat until no interior intersections
//!   remain), `SnapRoundingNoder` (round to a grid and snap through hot
//!   pixels), `NodingValidator` (brute-force certification) and
//!   `SegmentStringDissolver` (merge duplicate output lines).
//!
//! Conventions
//! - Engines record nodes; they never split. Splitting happens once, at the
//!   end, through `SegmentString::noded_substrings`.
//! - Segment `i` of a string runs from vertex `i` to vertex `i + 1`.

mod dissolver;
mod intersectors;
mod iterated;
mod mc_index;
mod segment_string;
mod simple;
mod snap_round;
mod sweep;
mod validator;

pub use dissolver::SegmentStringDissolver;
pub use intersectors::{InteriorIntersectionFinder, IntersectionAdder};
pub use iterated::{IteratedCfg, IteratedNoder, NoderKind};
pub use mc_index::McIndexNoder;
pub use segment_string::{SegmentNode, SegmentString};
pub use simple::SimpleNoder;
pub use snap_round::{HotPixel, SnapRoundCfg, SnapRoundingNoder};
pub use sweep::McSweepLineNoder;
pub use validator::NodingValidator;

use smallvec::SmallVec;

use crate::error::NodingError;
use crate::geom::Coord;

/// Segment `index` of string `string`, borrowed from its coordinates.
#[derive(Clone, Copy, Debug)]
pub struct SegmentView<'a> {
    /// Position of the parent string in the noded collection.
    pub string: usize,
    pub index: usize,
    pub pts: &'a [Coord],
}

impl<'a> SegmentView<'a> {
    #[inline]
    pub fn p0(&self) -> Coord {
        self.pts[self.index]
    }

    #[inline]
    pub fn p1(&self) -> Coord {
        self.pts[self.index + 1]
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.pts.len() - 1
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.pts.first() == self.pts.last()
    }

    /// Both views lie on the same string.
    #[inline]
    pub fn same_string(&self, other: &SegmentView<'_>) -> bool {
        self.string == other.string
    }
}

/// Result of processing one segment pair: the points to record as nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum Intersection {
    None,
    Proper(Coord),
    Improper(SmallVec<[Coord; 2]>),
}

impl Intersection {
    pub fn points(&self) -> SmallVec<[Coord; 2]> {
        match self {
            Intersection::None => SmallVec::new(),
            Intersection::Proper(p) => SmallVec::from_buf_and_len([*p, *p], 1),
            Intersection::Improper(pts) => pts.clone(),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Intersection::None)
    }
}

/// Intersection policy injected into the noding engines.
pub trait SegmentIntersector {
    fn process(&mut self, a: SegmentView<'_>, b: SegmentView<'_>) -> Intersection;

    /// Engines stop scheduling pairs once this returns true.
    fn is_done(&self) -> bool {
        false
    }
}

impl<F> SegmentIntersector for F
where
    F: FnMut(SegmentView<'_>, SegmentView<'_>) -> Intersection,
{
    fn process(&mut self, a: SegmentView<'_>, b: SegmentView<'_>) -> Intersection {
        self(a, b)
    }
}

/// A complete noding step: input strings in, noded substrings out.
pub trait Noder {
    fn node<C: Clone>(
        &mut self,
        strings: Vec<SegmentString<C>>,
    ) -> Result<Vec<SegmentString<C>>, NodingError>;
}

/// Queues the returned points as nodes on both participating segments.
pub(crate) fn record_nodes(
    pending: &mut Vec<(usize, usize, Coord)>,
    a: &SegmentView<'_>,
    b: &SegmentView<'_>,
    result: Intersection,
) {
    for pt in result.points() {
        pending.push((a.string, a.index, pt));
        pending.push((b.string, b.index, pt));
    }
}

/// Applies queued nodes; string ids index into `strings`.
pub(crate) fn apply_nodes<C>(strings: &mut [SegmentString<C>], pending: Vec<(usize, usize, Coord)>) {
    for (s, seg, pt) in pending {
        strings[s].add_intersection(pt, seg);
    }
}

#[cfg(test)]
mod tests;
