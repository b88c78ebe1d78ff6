//! Point in ring via monotone chains stored in a bintree.
//!
//! A horizontal line through the query point can only cross the chains whose
//! y-extent contains it; within a chain, selection narrows down to the
//! segments near that line.

use super::{Location, PointInAreaLocator, RayCrossingCounter};
use crate::chain::{build_chains, MonotoneChain};
use crate::error::IndexError;
use crate::geom::{Coord, Envelope, Interval};
use crate::index::{Bintree, IntervalIndex};

pub struct McPointInRing {
    ring: Vec<Coord>,
    chains: Vec<MonotoneChain>,
    tree: Bintree<usize>,
}

impl McPointInRing {
    pub fn new(ring: Vec<Coord>) -> Result<Self, IndexError> {
        let mut next_id = 0;
        let chains = build_chains(&ring, 0, &mut next_id);
        let mut tree = Bintree::new();
        for (k, c) in chains.iter().enumerate() {
            let env = c.envelope(&ring);
            tree.insert(Interval::new(env.min_y, env.max_y), k)?;
        }
        Ok(Self { ring, chains, tree })
    }

    pub fn ring(&self) -> &[Coord] {
        &self.ring
    }
}

impl PointInAreaLocator for McPointInRing {
    fn locate(&self, p: Coord) -> Location {
        let mut counter = RayCrossingCounter::new(p);
        let ray = Envelope::new(f64::NEG_INFINITY, f64::INFINITY, p.y, p.y);
        self.tree.visit(&Interval::point(p.y), &mut |&k| {
            self.chains[k].select(&self.ring, &ray, &mut |i| {
                counter.count_segment(self.ring[i], self.ring[i + 1]);
            });
        });
        counter.location()
    }
}
