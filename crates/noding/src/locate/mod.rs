//! Point-in-area location by ray crossing.
//!
//! Purpose
//! - `RayCrossingCounter`: counts crossings of the ray from a point towards
//!   +x with a stream of segments, detecting points on a segment exactly.
//! - `locate_point_in_ring`: brute force over one ring.
//! - `IndexedPointInAreaLocator` and `McPointInRing`: the same count over
//!   only the segments spanning the point's y, found through a 1D index.
//!
//! Conventions
//! - A segment is counted as crossing when one endpoint is strictly above
//!   the ray and the other is on or below it, so a vertex on the ray is
//!   counted once.
//! - Orientation tests use the robust predicate; a point collinear with a
//!   spanning segment is on the boundary.

mod indexed;
mod mc_ring;

pub use indexed::IndexedPointInAreaLocator;
pub use mc_ring::McPointInRing;

use crate::geom::Coord;
use crate::math::{orientation_index, Orientation};

/// Position of a point relative to an area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    /// One-letter symbol (`i`, `b`, `e`).
    pub fn symbol(&self) -> char {
        match self {
            Location::Interior => 'i',
            Location::Boundary => 'b',
            Location::Exterior => 'e',
        }
    }
}

/// Locates points against an area fixed at construction.
pub trait PointInAreaLocator {
    fn locate(&self, p: Coord) -> Location;
}

#[derive(Clone, Copy, Debug)]
pub struct RayCrossingCounter {
    p: Coord,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    pub fn new(p: Coord) -> Self {
        Self {
            p,
            crossings: 0,
            on_segment: false,
        }
    }

    pub fn count_segment(&mut self, p1: Coord, p2: Coord) {
        let p = self.p;
        // Entirely left of the point.
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == p2 {
            self.on_segment = true;
            return;
        }
        if p1.y == p.y && p2.y == p.y {
            let (min_x, max_x) = (p1.x.min(p2.x), p1.x.max(p2.x));
            if p.x >= min_x && p.x <= max_x {
                self.on_segment = true;
            }
            return;
        }
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation_index(p1, p2, p).index();
            if orient == 0 {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                orient = -orient;
            }
            if orient == Orientation::CounterClockwise.index() {
                self.crossings += 1;
            }
        }
    }

    /// Once true, further segments cannot change the location.
    pub fn is_on_segment(&self) -> bool {
        self.on_segment
    }

    pub fn crossings(&self) -> usize {
        self.crossings
    }

    pub fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Location of `p` relative to the closed ring `ring`.
pub fn locate_point_in_ring(p: Coord, ring: &[Coord]) -> Location {
    let mut counter = RayCrossingCounter::new(p);
    for w in ring.windows(2) {
        counter.count_segment(w[0], w[1]);
        if counter.is_on_segment() {
            break;
        }
    }
    counter.location()
}

#[cfg(test)]
mod tests;
