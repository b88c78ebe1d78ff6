//! Brute-force certification of a noded arrangement.
//!
//! Checks, in order: collapses (`a, b, a`), interior intersections between
//! any two segments (including segments of one string), and string
//! endpoints that coincide with an interior vertex of some string. Uses no
//! index, so it can certify the indexed noders.

use super::SegmentString;
use crate::error::ValidationError;
use crate::math::LineIntersector;

pub struct NodingValidator;

impl NodingValidator {
    /// First violation found, if any.
    pub fn check_valid<C>(strings: &[SegmentString<C>]) -> Result<(), ValidationError> {
        Self::check_collapses(strings)?;
        Self::check_interior_intersections(strings)?;
        Self::check_endpoint_vertices(strings)
    }

    fn check_collapses<C>(strings: &[SegmentString<C>]) -> Result<(), ValidationError> {
        for s in strings {
            for w in s.coords().windows(3) {
                if w[0] == w[2] {
                    return Err(ValidationError::Collapse {
                        at: w[0],
                        line: [w[0], w[1], w[2]],
                    });
                }
            }
        }
        Ok(())
    }

    fn check_interior_intersections<C>(
        strings: &[SegmentString<C>],
    ) -> Result<(), ValidationError> {
        let li = LineIntersector::new();
        for (i0, s0) in strings.iter().enumerate() {
            for (i1, s1) in strings.iter().enumerate() {
                let (pts0, pts1) = (s0.coords(), s1.coords());
                for j0 in 0..s0.segment_count() {
                    for j1 in 0..s1.segment_count() {
                        if i0 == i1 && j0 == j1 {
                            continue;
                        }
                        let (p0, p1) = (pts0[j0], pts0[j0 + 1]);
                        let (q0, q1) = (pts1[j1], pts1[j1 + 1]);
                        let r = li.compute(p0, p1, q0, q1);
                        if !r.has_intersection() {
                            continue;
                        }
                        if r.is_proper() || r.is_interior_for(p0, p1) || r.is_interior_for(q0, q1)
                        {
                            return Err(ValidationError::InteriorIntersection {
                                seg0: [p0, p1],
                                seg1: [q0, q1],
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_endpoint_vertices<C>(strings: &[SegmentString<C>]) -> Result<(), ValidationError> {
        for s in strings {
            let pts = s.coords();
            let (Some(first), Some(last)) = (pts.first(), pts.last()) else {
                continue;
            };
            for pt in [first, last] {
                for other in strings {
                    let opts = other.coords();
                    let interior = opts.get(1..opts.len().saturating_sub(1)).unwrap_or(&[]);
                    if let Some(k) = interior.iter().position(|v| v == pt) {
                        return Err(ValidationError::EndpointInteriorVertex {
                            pt: *pt,
                            index: k + 1,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
