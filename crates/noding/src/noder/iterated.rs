//! Iterated noding: node, split, repeat until a pass creates no interior
//! intersection.
//!
//! Rounded intersection points can land off their segments, so one pass is
//! not always enough. The loop fails once the number of nodes created per
//! pass stops decreasing after `max_iterations` passes.

use tracing::{debug, warn};

use super::{
    IntersectionAdder, McIndexNoder, McSweepLineNoder, Noder, SegmentString, SimpleNoder,
};
use crate::cfg::MAX_ITER;
use crate::error::NodingError;
use crate::geom::PrecisionModel;
use crate::index::IndexKind;
use crate::math::LineIntersector;

/// Single-pass engine used by each iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoderKind {
    #[default]
    McIndex,
    McSweepLine,
    Simple,
}

#[derive(Clone, Copy, Debug)]
pub struct IteratedCfg {
    pub max_iterations: usize,
    /// Precision applied to computed intersection points.
    pub precision: PrecisionModel,
    pub noder: NoderKind,
    /// Index used by `NoderKind::McIndex`.
    pub index: IndexKind,
}

impl Default for IteratedCfg {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITER,
            precision: PrecisionModel::Floating,
            noder: NoderKind::McIndex,
            index: IndexKind::StrTree,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct IteratedNoder {
    cfg: IteratedCfg,
    iterations: usize,
}

impl IteratedNoder {
    pub fn new(cfg: IteratedCfg) -> Self {
        Self { cfg, iterations: 0 }
    }

    pub fn cfg(&self) -> &IteratedCfg {
        &self.cfg
    }

    /// Passes run by the last `node` call.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// One noding pass; returns the split strings and the number of interior
    /// intersections it found.
    fn pass<C: Clone>(
        &self,
        mut strings: Vec<SegmentString<C>>,
    ) -> Result<(Vec<SegmentString<C>>, usize), NodingError> {
        let adder = IntersectionAdder::new(LineIntersector::with_precision(self.cfg.precision));
        let created = match self.cfg.noder {
            NoderKind::McIndex => {
                let mut noder = McIndexNoder::new(adder).with_index(self.cfg.index);
                noder.compute_nodes(&mut strings)?;
                noder.intersector().num_interior_intersections()
            }
            NoderKind::McSweepLine => {
                let mut noder = McSweepLineNoder::new(adder);
                noder.compute_nodes(&mut strings)?;
                noder.intersector().num_interior_intersections()
            }
            NoderKind::Simple => {
                let mut noder = SimpleNoder::new(adder);
                noder.compute_nodes(&mut strings)?;
                noder.intersector().num_interior_intersections()
            }
        };
        Ok((SegmentString::noded_substrings(&strings), created))
    }
}

/// Past the pass budget, a pass that creates no fewer nodes than the one
/// before it ends the run.
fn is_diverging(
    prev: Option<usize>,
    created: usize,
    iterations: usize,
    max_iterations: usize,
) -> bool {
    matches!(prev, Some(p) if p > 0 && created >= p) && iterations > max_iterations
}

impl Noder for IteratedNoder {
    fn node<C: Clone>(
        &mut self,
        strings: Vec<SegmentString<C>>,
    ) -> Result<Vec<SegmentString<C>>, NodingError> {
        let mut noded = strings;
        let mut last: Option<usize> = None;
        self.iterations = 0;
        loop {
            let (next, created) = self.pass(noded)?;
            noded = next;
            self.iterations += 1;
            debug!(
                iteration = self.iterations,
                nodes_created = created,
                strings = noded.len(),
                "noding pass"
            );
            if created == 0 {
                return Ok(noded);
            }
            if is_diverging(last, created, self.iterations, self.cfg.max_iterations) {
                warn!(
                    iterations = self.iterations,
                    nodes_created = created,
                    "iterated noding did not converge"
                );
                return Err(NodingError::NonConvergence {
                    iterations: self.iterations,
                    nodes_created: created,
                });
            }
            last = Some(created);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds per-pass node counts through the stop rule; returns the pass
    /// at which the run fails, if it does.
    fn failing_pass(counts: &[usize], max_iterations: usize) -> Option<usize> {
        let mut last = None;
        for (i, &created) in counts.iter().enumerate() {
            let iterations = i + 1;
            if created == 0 {
                return None;
            }
            if is_diverging(last, created, iterations, max_iterations) {
                return Some(iterations);
            }
            last = Some(created);
        }
        None
    }

    #[test]
    fn stalled_counts_fail_only_past_the_budget() {
        let counts = [4, 4, 4, 4, 4, 4, 4, 4];
        assert_eq!(failing_pass(&counts, 5), Some(6));
        assert_eq!(failing_pass(&counts, 2), Some(3));
        for max in 0..6 {
            let pass = failing_pass(&counts, max).unwrap();
            assert!(pass > max);
        }
    }

    #[test]
    fn decreasing_counts_never_fail() {
        assert_eq!(failing_pass(&[9, 8, 7, 6, 5, 4, 3, 2, 1, 0], 1), None);
        // A rise after a fall still fails once the budget is spent.
        assert_eq!(failing_pass(&[9, 8, 7, 6, 5, 4, 3, 4], 5), Some(8));
    }

    #[test]
    fn first_pass_never_fails() {
        assert!(!is_diverging(None, 10, 1, 0));
        assert!(is_diverging(Some(10), 10, 2, 0));
        assert!(!is_diverging(Some(10), 9, 2, 0));
    }
}
