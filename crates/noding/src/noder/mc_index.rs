//! Monotone-chain noder driven by a spatial index.
//!
//! Every string is decomposed into monotone chains, each chain is inserted
//! into the index keyed by its envelope, and every chain is then queried
//! against the index. A chain pair is processed once, from the chain with
//! the smaller id. Within a pair, chain subdivision narrows the candidates
//! down to segment pairs, which go to the injected `SegmentIntersector`.

use tracing::trace;

use super::{apply_nodes, record_nodes, Noder, SegmentIntersector, SegmentString, SegmentView};
use crate::chain::{build_chains, MonotoneChain};
use crate::error::NodingError;
use crate::index::{Index, IndexKind, SpatialIndex};

pub struct McIndexNoder<I> {
    intersector: I,
    kind: IndexKind,
    overlap_tolerance: f64,
    overlaps: usize,
}

impl<I: SegmentIntersector> McIndexNoder<I> {
    pub fn new(intersector: I) -> Self {
        Self {
            intersector,
            kind: IndexKind::default(),
            overlap_tolerance: 0.0,
            overlaps: 0,
        }
    }

    pub fn with_index(mut self, kind: IndexKind) -> Self {
        self.kind = kind;
        self
    }

    /// Chains whose envelopes are within `tol` of each other are tested.
    pub fn with_overlap_tolerance(mut self, tol: f64) -> Self {
        self.overlap_tolerance = tol;
        self
    }

    /// Chain pairs handed to the chain-overlap search in the last run.
    pub fn overlap_count(&self) -> usize {
        self.overlaps
    }

    pub fn intersector(&self) -> &I {
        &self.intersector
    }

    pub fn intersector_mut(&mut self) -> &mut I {
        &mut self.intersector
    }

    pub fn into_intersector(self) -> I {
        self.intersector
    }

    /// Records the nodes of every mutual intersection among `strings`.
    pub fn compute_nodes<C>(&mut self, strings: &mut [SegmentString<C>]) -> Result<(), NodingError> {
        let mut next_id = 0;
        let mut chains: Vec<MonotoneChain> = Vec::new();
        for (i, s) in strings.iter().enumerate() {
            chains.extend(build_chains(s.coords(), i, &mut next_id));
        }
        let mut index: Index<usize> = Index::new(self.kind);
        for (k, c) in chains.iter().enumerate() {
            index.insert(c.envelope(strings[c.string].coords()), k)?;
        }

        let tol = self.overlap_tolerance;
        let intersector = &mut self.intersector;
        let mut pending = Vec::new();
        let mut overlaps = 0;
        'chains: for (qk, query) in chains.iter().enumerate() {
            let q_pts = strings[query.string].coords();
            let search = query.envelope_expanded(q_pts, tol);
            let mut candidates = index.query(&search);
            candidates.sort_unstable();
            for tk in candidates {
                if tk <= qk {
                    continue;
                }
                let test = &chains[tk];
                let t_pts = strings[test.string].coords();
                query.compute_overlaps(q_pts, test, t_pts, tol, &mut |i, j| {
                    let a = SegmentView {
                        string: query.string,
                        index: i,
                        pts: q_pts,
                    };
                    let b = SegmentView {
                        string: test.string,
                        index: j,
                        pts: t_pts,
                    };
                    let r = intersector.process(a, b);
                    record_nodes(&mut pending, &a, &b, r);
                });
                overlaps += 1;
                if intersector.is_done() {
                    break 'chains;
                }
            }
        }
        trace!(chains = chains.len(), overlaps, nodes = pending.len(), "mc index noding");
        self.overlaps = overlaps;
        apply_nodes(strings, pending);
        Ok(())
    }

    /// Records the nodes of intersections between a segment of `a` and a
    /// segment of `b`. Pairs within one set are never tested. Views report
    /// strings of `a` as `0..a.len()` and strings of `b` after them.
    pub fn compute_nodes_between<C, D>(
        &mut self,
        a: &mut [SegmentString<C>],
        b: &mut [SegmentString<D>],
    ) -> Result<(), NodingError> {
        let na = a.len();
        let mut next_id = 0;
        let mut a_chains = Vec::new();
        for (i, s) in a.iter().enumerate() {
            a_chains.extend(build_chains(s.coords(), i, &mut next_id));
        }
        let mut b_chains = Vec::new();
        for (i, s) in b.iter().enumerate() {
            b_chains.extend(build_chains(s.coords(), na + i, &mut next_id));
        }
        let mut index: Index<usize> = Index::new(self.kind);
        for (k, c) in a_chains.iter().enumerate() {
            index.insert(c.envelope(a[c.string].coords()), k)?;
        }

        let tol = self.overlap_tolerance;
        let intersector = &mut self.intersector;
        let mut pending = Vec::new();
        let mut overlaps = 0;
        'chains: for query in &b_chains {
            let q_pts = b[query.string - na].coords();
            let search = query.envelope_expanded(q_pts, tol);
            let mut candidates = index.query(&search);
            candidates.sort_unstable();
            for tk in candidates {
                let test = &a_chains[tk];
                let t_pts = a[test.string].coords();
                test.compute_overlaps(t_pts, query, q_pts, tol, &mut |i, j| {
                    let va = SegmentView {
                        string: test.string,
                        index: i,
                        pts: t_pts,
                    };
                    let vb = SegmentView {
                        string: query.string,
                        index: j,
                        pts: q_pts,
                    };
                    let r = intersector.process(va, vb);
                    record_nodes(&mut pending, &va, &vb, r);
                });
                overlaps += 1;
                if intersector.is_done() {
                    break 'chains;
                }
            }
        }
        trace!(overlaps, nodes = pending.len(), "mc index noding between sets");
        self.overlaps = overlaps;
        for (s, seg, pt) in pending {
            if s < na {
                a[s].add_intersection(pt, seg);
            } else {
                b[s - na].add_intersection(pt, seg);
            }
        }
        Ok(())
    }
}

impl<I: SegmentIntersector> Noder for McIndexNoder<I> {
    fn node<C: Clone>(
        &mut self,
        mut strings: Vec<SegmentString<C>>,
    ) -> Result<Vec<SegmentString<C>>, NodingError> {
        self.compute_nodes(&mut strings)?;
        Ok(SegmentString::noded_substrings(&strings))
    }
}
