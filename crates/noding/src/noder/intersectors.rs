//! Standard intersection policies.

use smallvec::SmallVec;

use super::{Intersection, SegmentIntersector, SegmentView};
use crate::geom::Coord;
use crate::math::{LineIntersection, LineIntersector};

/// The node-adding policy: every intersection becomes a node, except the
/// shared vertex of adjacent segments of one string (and the closing vertex
/// of a ring).
#[derive(Clone, Debug, Default)]
pub struct IntersectionAdder {
    li: LineIntersector,
    num_tests: usize,
    num_intersections: usize,
    num_interior: usize,
    num_proper: usize,
}

impl IntersectionAdder {
    pub fn new(li: LineIntersector) -> Self {
        Self {
            li,
            ..Self::default()
        }
    }

    pub fn line_intersector(&self) -> &LineIntersector {
        &self.li
    }

    pub fn num_tests(&self) -> usize {
        self.num_tests
    }

    pub fn num_intersections(&self) -> usize {
        self.num_intersections
    }

    /// Intersections interior to at least one of the two segments. Trivial
    /// intersections are never interior, so this is the number of nodes a
    /// pass created.
    pub fn num_interior_intersections(&self) -> usize {
        self.num_interior
    }

    pub fn num_proper_intersections(&self) -> usize {
        self.num_proper
    }

    pub fn has_proper_intersection(&self) -> bool {
        self.num_proper > 0
    }

    pub fn has_interior_intersection(&self) -> bool {
        self.num_interior > 0
    }

    fn is_trivial(a: &SegmentView<'_>, b: &SegmentView<'_>, li: &LineIntersection) -> bool {
        if !a.same_string(b) || li.points().len() != 1 {
            return false;
        }
        if a.index.abs_diff(b.index) == 1 {
            return true;
        }
        if a.is_closed() {
            let last = a.segment_count() - 1;
            let (lo, hi) = (a.index.min(b.index), a.index.max(b.index));
            if lo == 0 && hi == last {
                return true;
            }
        }
        false
    }
}

impl SegmentIntersector for IntersectionAdder {
    fn process(&mut self, a: SegmentView<'_>, b: SegmentView<'_>) -> Intersection {
        if a.same_string(&b) && a.index == b.index {
            return Intersection::None;
        }
        self.num_tests += 1;
        let (p0, p1, q0, q1) = (a.p0(), a.p1(), b.p0(), b.p1());
        let li = self.li.compute(p0, p1, q0, q1);
        if !li.has_intersection() {
            return Intersection::None;
        }
        self.num_intersections += 1;
        if li.is_interior_for(p0, p1) || li.is_interior_for(q0, q1) {
            self.num_interior += 1;
        }
        if Self::is_trivial(&a, &b, &li) {
            return Intersection::None;
        }
        match li {
            LineIntersection::Point { pt, proper: true } => {
                self.num_proper += 1;
                Intersection::Proper(pt)
            }
            _ => Intersection::Improper(li.points()),
        }
    }
}

/// Finds intersections interior to one of their segments.
///
/// By default it stops at the first one and records no nodes; `find_all`
/// keeps collecting and `adding_nodes` returns every interior intersection
/// to the engine as a node.
#[derive(Clone, Debug, Default)]
pub struct InteriorIntersectionFinder {
    li: LineIntersector,
    find_all: bool,
    add_nodes: bool,
    intersections: Vec<Coord>,
    segments: Option<[Coord; 4]>,
    num_tests: usize,
}

impl InteriorIntersectionFinder {
    pub fn new(li: LineIntersector) -> Self {
        Self {
            li,
            ..Self::default()
        }
    }

    pub fn find_all(mut self) -> Self {
        self.find_all = true;
        self
    }

    pub fn adding_nodes(mut self) -> Self {
        self.add_nodes = true;
        self
    }

    pub fn has_intersection(&self) -> bool {
        !self.intersections.is_empty()
    }

    /// The first interior intersection found.
    pub fn intersection(&self) -> Option<Coord> {
        self.intersections.first().copied()
    }

    pub fn intersections(&self) -> &[Coord] {
        &self.intersections
    }

    pub fn into_intersections(self) -> Vec<Coord> {
        self.intersections
    }

    /// Endpoints `[p0, p1, q0, q1]` of the first intersecting pair.
    pub fn segments(&self) -> Option<[Coord; 4]> {
        self.segments
    }

    pub fn num_tests(&self) -> usize {
        self.num_tests
    }
}

impl SegmentIntersector for InteriorIntersectionFinder {
    fn process(&mut self, a: SegmentView<'_>, b: SegmentView<'_>) -> Intersection {
        if self.is_done() || (a.same_string(&b) && a.index == b.index) {
            return Intersection::None;
        }
        self.num_tests += 1;
        let (p0, p1, q0, q1) = (a.p0(), a.p1(), b.p0(), b.p1());
        let li = self.li.compute(p0, p1, q0, q1);
        if !li.has_intersection() {
            return Intersection::None;
        }
        if !(li.is_interior_for(p0, p1) || li.is_interior_for(q0, q1)) {
            return Intersection::None;
        }
        let pts: SmallVec<[Coord; 2]> = li.points();
        self.intersections.extend(pts.iter().copied());
        if self.segments.is_none() {
            self.segments = Some([p0, p1, q0, q1]);
        }
        if self.add_nodes {
            Intersection::Improper(pts)
        } else {
            Intersection::None
        }
    }

    fn is_done(&self) -> bool {
        !self.find_all && !self.intersections.is_empty()
    }
}
