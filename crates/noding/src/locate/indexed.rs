//! Ring segments in a packed interval tree keyed by their y-extent.

use super::{Location, PointInAreaLocator, RayCrossingCounter};
use crate::error::IndexError;
use crate::geom::{extract_lines, Coord, Geometry, Interval};
use crate::index::{IntervalIndex, SortedPackedIntervalRTree};

pub struct IndexedPointInAreaLocator {
    tree: SortedPackedIntervalRTree<[Coord; 2]>,
}

impl IndexedPointInAreaLocator {
    /// Indexes the segments of every ring (shell and holes alike).
    pub fn new<R: AsRef<[Coord]>>(rings: &[R]) -> Result<Self, IndexError> {
        let mut tree = SortedPackedIntervalRTree::new();
        for ring in rings {
            for w in ring.as_ref().windows(2) {
                tree.insert(Interval::new(w[0].y, w[1].y), [w[0], w[1]])?;
            }
        }
        Ok(Self { tree })
    }

    /// Locator over the linework of an areal geometry.
    pub fn from_geometry(g: &Geometry) -> Result<Self, IndexError> {
        Self::new(&extract_lines(std::slice::from_ref(g)))
    }
}

impl PointInAreaLocator for IndexedPointInAreaLocator {
    fn locate(&self, p: Coord) -> Location {
        let mut counter = RayCrossingCounter::new(p);
        self.tree.query_range(p.y, p.y, &mut |seg| {
            counter.count_segment(seg[0], seg[1]);
        });
        counter.location()
    }
}
