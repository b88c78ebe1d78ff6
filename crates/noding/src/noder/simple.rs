//! All-pairs noder. Quadratic; the reference the indexed noders are
//! checked against.

use super::{apply_nodes, record_nodes, Noder, SegmentIntersector, SegmentString, SegmentView};
use crate::error::NodingError;

/// Processes every ordered pair of segments, including pairs within one
/// string and both orders of every pair.
pub struct SimpleNoder<I> {
    intersector: I,
}

impl<I: SegmentIntersector> SimpleNoder<I> {
    pub fn new(intersector: I) -> Self {
        Self { intersector }
    }

    pub fn intersector(&self) -> &I {
        &self.intersector
    }

    pub fn into_intersector(self) -> I {
        self.intersector
    }

    pub fn compute_nodes<C>(&mut self, strings: &mut [SegmentString<C>]) -> Result<(), NodingError> {
        let mut pending = Vec::new();
        'outer: for (i0, s0) in strings.iter().enumerate() {
            for (i1, s1) in strings.iter().enumerate() {
                for j0 in 0..s0.segment_count() {
                    for j1 in 0..s1.segment_count() {
                        let a = SegmentView {
                            string: i0,
                            index: j0,
                            pts: s0.coords(),
                        };
                        let b = SegmentView {
                            string: i1,
                            index: j1,
                            pts: s1.coords(),
                        };
                        let r = self.intersector.process(a, b);
                        record_nodes(&mut pending, &a, &b, r);
                    }
                }
                if self.intersector.is_done() {
                    break 'outer;
                }
            }
        }
        apply_nodes(strings, pending);
        Ok(())
    }
}

impl<I: SegmentIntersector> Noder for SimpleNoder<I> {
    fn node<C: Clone>(
        &mut self,
        mut strings: Vec<SegmentString<C>>,
    ) -> Result<Vec<SegmentString<C>>, NodingError> {
        self.compute_nodes(&mut strings)?;
        Ok(SegmentString::noded_substrings(&strings))
    }
}
