//! Robust orientation predicates.
//!
//! The orientation determinant is evaluated once in double precision with a
//! forward error bound; only results inside the bound are recomputed in
//! double-double. Exact zero after the recomputation means the points are
//! collinear.

use super::dd::DD;
use crate::cfg::DP_SAFE_EPSILON;
use crate::geom::Coord;

/// Side of a directed segment on which a point lies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    #[inline]
    fn from_sign(s: i32) -> Self {
        match s.signum() {
            1 => Orientation::CounterClockwise,
            -1 => Orientation::Clockwise,
            _ => Orientation::Collinear,
        }
    }

    /// `1` for counter-clockwise (left), `-1` for clockwise (right), `0` collinear.
    #[inline]
    pub fn index(self) -> i32 {
        match self {
            Orientation::CounterClockwise => 1,
            Orientation::Clockwise => -1,
            Orientation::Collinear => 0,
        }
    }
}

/// Orientation of `q` relative to the directed segment `p1 -> p2`.
pub fn orientation_index(p1: Coord, p2: Coord, q: Coord) -> Orientation {
    if let Some(s) = orientation_filter(p1, p2, q) {
        return Orientation::from_sign(s);
    }
    let dx1 = DD::new(p2.x) - p1.x;
    let dy1 = DD::new(p2.y) - p1.y;
    let dx2 = DD::new(q.x) - p2.x;
    let dy2 = DD::new(q.y) - p2.y;
    let det = dx1 * dy2 - dy1 * dx2;
    Orientation::from_sign(det.signum())
}

/// Fast double-precision evaluation; `None` when the sign cannot be certified.
fn orientation_filter(pa: Coord, pb: Coord, pc: Coord) -> Option<i32> {
    let detleft = (pa.x - pc.x) * (pb.y - pc.y);
    let detright = (pa.y - pc.y) * (pb.x - pc.x);
    let det = detleft - detright;
    let detsum = if detleft > 0.0 {
        if detright <= 0.0 {
            return Some(sign(det));
        }
        detleft + detright
    } else if detleft < 0.0 {
        if detright >= 0.0 {
            return Some(sign(det));
        }
        -detleft - detright
    } else {
        return Some(sign(det));
    };
    let errbound = DP_SAFE_EPSILON * detsum;
    if det >= errbound || -det >= errbound {
        return Some(sign(det));
    }
    None
}

#[inline]
fn sign(x: f64) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Sign of the 2x2 determinant `| x1 y1 ; x2 y2 |`, evaluated in double-double.
pub fn sign_of_det2x2(x1: f64, y1: f64, x2: f64, y2: f64) -> i32 {
    let det = DD::new(x1) * y2 - DD::new(y1) * x2;
    det.signum()
}
