//! Robust segment/segment intersection.
//!
//! Classification uses only the robust orientation predicate; the
//! intersection point of a proper crossing is computed in a frame centred on
//! the overlap of the two segment envelopes, which keeps the homogeneous
//! determinants small. A point computed outside both segment envelopes (a
//! symptom of near-parallel input) is replaced by the endpoint closest to the
//! other segment.

use smallvec::{smallvec, SmallVec};

use super::orientation::{orientation_index, Orientation};
use crate::geom::{Coord, Envelope, PrecisionModel};

/// Outcome of intersecting two closed segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineIntersection {
    None,
    /// A single point. `proper` is true when the point is interior to both
    /// segments (the segments cross).
    Point { pt: Coord, proper: bool },
    /// A collinear overlap from one point to another.
    Collinear(Coord, Coord),
}

impl LineIntersection {
    #[inline]
    pub fn has_intersection(&self) -> bool {
        !matches!(self, LineIntersection::None)
    }

    #[inline]
    pub fn is_proper(&self) -> bool {
        matches!(self, LineIntersection::Point { proper: true, .. })
    }

    #[inline]
    pub fn is_collinear(&self) -> bool {
        matches!(self, LineIntersection::Collinear(..))
    }

    /// Intersection points (0, 1 or 2).
    pub fn points(&self) -> SmallVec<[Coord; 2]> {
        match *self {
            LineIntersection::None => SmallVec::new(),
            LineIntersection::Point { pt, .. } => smallvec![pt],
            LineIntersection::Collinear(a, b) => smallvec![a, b],
        }
    }

    /// True if some intersection point is not an endpoint of `a0-a1`.
    pub fn is_interior_for(&self, a0: Coord, a1: Coord) -> bool {
        self.points().iter().any(|p| *p != a0 && *p != a1)
    }
}

/// Segment intersector with an optional precision model for the computed
/// intersection points. Input coordinates are never modified.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineIntersector {
    pm: PrecisionModel,
}

impl LineIntersector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computed points are rounded to `pm`.
    pub fn with_precision(pm: PrecisionModel) -> Self {
        Self { pm }
    }

    pub fn precision(&self) -> PrecisionModel {
        self.pm
    }

    /// Intersection of the segments `p1-p2` and `q1-q2`.
    pub fn compute(&self, p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> LineIntersection {
        if !Envelope::segments_intersect(p1, p2, q1, q2) {
            return LineIntersection::None;
        }
        let pq1 = orientation_index(p1, p2, q1);
        let pq2 = orientation_index(p1, p2, q2);
        if same_strict_side(pq1, pq2) {
            return LineIntersection::None;
        }
        let qp1 = orientation_index(q1, q2, p1);
        let qp2 = orientation_index(q1, q2, p2);
        if same_strict_side(qp1, qp2) {
            return LineIntersection::None;
        }
        use Orientation::Collinear as C;
        if pq1 == C && pq2 == C && qp1 == C && qp2 == C {
            return collinear_intersection(p1, p2, q1, q2);
        }
        if pq1 == C || pq2 == C || qp1 == C || qp2 == C {
            // Touching at an endpoint. Prefer an exactly shared endpoint so
            // the result carries no computation error.
            let pt = if p1 == q1 || p1 == q2 {
                p1
            } else if p2 == q1 || p2 == q2 {
                p2
            } else if pq1 == C {
                q1
            } else if pq2 == C {
                q2
            } else if qp1 == C {
                p1
            } else {
                p2
            };
            return LineIntersection::Point { pt, proper: false };
        }
        LineIntersection::Point {
            pt: self.proper_point(p1, p2, q1, q2),
            proper: true,
        }
    }

    fn proper_point(&self, p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> Coord {
        let mut pt = centred_intersection(p1, p2, q1, q2)
            .unwrap_or_else(|| nearest_endpoint(p1, p2, q1, q2));
        let env_p = Envelope::from_coords(p1, p2);
        let env_q = Envelope::from_coords(q1, q2);
        if !(env_p.intersects_point(pt) && env_q.intersects_point(pt)) {
            pt = nearest_endpoint(p1, p2, q1, q2);
        }
        self.pm.make_precise(pt)
    }
}

#[inline]
fn same_strict_side(a: Orientation, b: Orientation) -> bool {
    a != Orientation::Collinear && a == b
}

fn collinear_intersection(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> LineIntersection {
    let env_p = Envelope::from_coords(p1, p2);
    let env_q = Envelope::from_coords(q1, q2);
    let q1_in_p = env_p.intersects_point(q1);
    let q2_in_p = env_p.intersects_point(q2);
    let p1_in_q = env_q.intersects_point(p1);
    let p2_in_q = env_q.intersects_point(p2);

    if q1_in_p && q2_in_p {
        return LineIntersection::Collinear(q1, q2);
    }
    if p1_in_q && p2_in_q {
        return LineIntersection::Collinear(p1, p2);
    }
    let pair = |a: Coord, b: Coord, single: bool| {
        if a == b && single {
            LineIntersection::Point {
                pt: a,
                proper: false,
            }
        } else {
            LineIntersection::Collinear(a, b)
        }
    };
    if q1_in_p && p1_in_q {
        return pair(q1, p1, !q2_in_p && !p2_in_q);
    }
    if q1_in_p && p2_in_q {
        return pair(q1, p2, !q2_in_p && !p1_in_q);
    }
    if q2_in_p && p1_in_q {
        return pair(q2, p1, !q1_in_p && !p2_in_q);
    }
    if q2_in_p && p2_in_q {
        return pair(q2, p2, !q1_in_p && !p1_in_q);
    }
    LineIntersection::None
}

/// Homogeneous-coordinate intersection of the two infinite lines, computed
/// relative to the centre of the envelope overlap. `None` for parallel lines.
fn centred_intersection(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> Option<Coord> {
    let min_x0 = p1.x.min(p2.x);
    let min_y0 = p1.y.min(p2.y);
    let max_x0 = p1.x.max(p2.x);
    let max_y0 = p1.y.max(p2.y);
    let min_x1 = q1.x.min(q2.x);
    let min_y1 = q1.y.min(q2.y);
    let max_x1 = q1.x.max(q2.x);
    let max_y1 = q1.y.max(q2.y);

    let mid_x = (min_x0.max(min_x1) + max_x0.min(max_x1)) / 2.0;
    let mid_y = (min_y0.max(min_y1) + max_y0.min(max_y1)) / 2.0;

    let (p1x, p1y) = (p1.x - mid_x, p1.y - mid_y);
    let (p2x, p2y) = (p2.x - mid_x, p2.y - mid_y);
    let (q1x, q1y) = (q1.x - mid_x, q1.y - mid_y);
    let (q2x, q2y) = (q2.x - mid_x, q2.y - mid_y);

    let px = p1y - p2y;
    let py = p2x - p1x;
    let pw = p1x * p2y - p2x * p1y;
    let qx = q1y - q2y;
    let qy = q2x - q1x;
    let qw = q1x * q2y - q2x * q1y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let x_int = x / w;
    let y_int = y / w;
    if !x_int.is_finite() || !y_int.is_finite() {
        return None;
    }
    Some(Coord::new(x_int + mid_x, y_int + mid_y))
}

/// Endpoint of either segment closest to the other segment.
fn nearest_endpoint(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> Coord {
    let candidates = [
        (p1, point_to_segment(p1, q1, q2)),
        (p2, point_to_segment(p2, q1, q2)),
        (q1, point_to_segment(q1, p1, p2)),
        (q2, point_to_segment(q2, p1, p2)),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.1 < best.1 {
            best = *c;
        }
    }
    best.0
}

/// Euclidean distance from `p` to the closed segment `a-b`.
fn point_to_segment(p: Coord, a: Coord, b: Coord) -> f64 {
    if a == b {
        return (p - a).norm();
    }
    let ab = b - a;
    let r = (p - a).dot(&ab) / ab.norm_squared();
    if r <= 0.0 {
        return (p - a).norm();
    }
    if r >= 1.0 {
        return (p - b).norm();
    }
    // Perpendicular distance via the cross product.
    let s = ((a.y - p.y) * ab.x - (a.x - p.x) * ab.y) / ab.norm_squared();
    s.abs() * ab.norm()
}
