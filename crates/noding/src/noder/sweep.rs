//! Monotone-chain noder driven by a sweep line over chain x-extents.

use tracing::trace;

use super::{apply_nodes, record_nodes, Noder, SegmentIntersector, SegmentString, SegmentView};
use crate::chain::{build_chains, MonotoneChain};
use crate::error::NodingError;
use crate::geom::Interval;
use crate::index::SweepLineIndex;

pub struct McSweepLineNoder<I> {
    intersector: I,
    overlaps: usize,
}

impl<I: SegmentIntersector> McSweepLineNoder<I> {
    pub fn new(intersector: I) -> Self {
        Self {
            intersector,
            overlaps: 0,
        }
    }

    /// Chain pairs whose x-extents overlapped in the last run.
    pub fn overlap_count(&self) -> usize {
        self.overlaps
    }

    pub fn intersector(&self) -> &I {
        &self.intersector
    }

    pub fn into_intersector(self) -> I {
        self.intersector
    }

    pub fn compute_nodes<C>(&mut self, strings: &mut [SegmentString<C>]) -> Result<(), NodingError> {
        let mut next_id = 0;
        let mut chains: Vec<MonotoneChain> = Vec::new();
        for (i, s) in strings.iter().enumerate() {
            chains.extend(build_chains(s.coords(), i, &mut next_id));
        }
        let mut sweep = SweepLineIndex::new();
        for (k, c) in chains.iter().enumerate() {
            let env = c.envelope(strings[c.string].coords());
            sweep.add(Interval::new(env.min_x, env.max_x), k)?;
        }

        let intersector = &mut self.intersector;
        let mut pending = Vec::new();
        let shared: &[SegmentString<C>] = strings;
        sweep.compute_overlaps(|&k0, &k1| {
            if intersector.is_done() {
                return;
            }
            let (c0, c1) = (&chains[k0], &chains[k1]);
            let (pts0, pts1) = (shared[c0.string].coords(), shared[c1.string].coords());
            c0.compute_overlaps(pts0, c1, pts1, 0.0, &mut |i, j| {
                let a = SegmentView {
                    string: c0.string,
                    index: i,
                    pts: pts0,
                };
                let b = SegmentView {
                    string: c1.string,
                    index: j,
                    pts: pts1,
                };
                let r = intersector.process(a, b);
                record_nodes(&mut pending, &a, &b, r);
            });
        });
        self.overlaps = sweep.overlap_count();
        trace!(chains = chains.len(), overlaps = self.overlaps, "mc sweep line noding");
        apply_nodes(strings, pending);
        Ok(())
    }
}

impl<I: SegmentIntersector> Noder for McSweepLineNoder<I> {
    fn node<C: Clone>(
        &mut self,
        mut strings: Vec<SegmentString<C>>,
    ) -> Result<Vec<SegmentString<C>>, NodingError> {
        self.compute_nodes(&mut strings)?;
        Ok(SegmentString::noded_substrings(&strings))
    }
}
