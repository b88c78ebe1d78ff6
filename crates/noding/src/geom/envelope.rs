use super::Coord;

/// Axis-aligned rectangle `[min_x, max_x] × [min_y, max_y]`.
///
/// Invariants:
/// - A null envelope has `min_x > max_x` (built by `Envelope::null`); every
///   predicate treats it as empty.
/// - Otherwise `min_x <= max_x` and `min_y <= max_y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::null()
    }
}

impl Envelope {
    /// The empty envelope.
    #[inline]
    pub fn null() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Envelope from raw bounds; the bounds are reordered if given swapped.
    #[inline]
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            max_x: x1.max(x2),
            min_y: y1.min(y2),
            max_y: y1.max(y2),
        }
    }

    #[inline]
    pub fn from_coord(p: Coord) -> Self {
        Self::new(p.x, p.x, p.y, p.y)
    }

    /// Envelope spanned by two corner points.
    #[inline]
    pub fn from_coords(p: Coord, q: Coord) -> Self {
        Self::new(p.x, q.x, p.y, q.y)
    }

    /// Envelope of an arbitrary point sequence (null if empty).
    pub fn of_points(pts: &[Coord]) -> Self {
        let mut env = Self::null();
        for p in pts {
            env.expand_to_include(*p);
        }
        env
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.min_x > self.max_x
    }

    #[inline]
    pub fn width(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    #[inline]
    pub fn height(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Centre point; `None` for the null envelope.
    #[inline]
    pub fn centre(&self) -> Option<Coord> {
        if self.is_null() {
            return None;
        }
        Some(Coord::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        ))
    }

    pub fn expand_to_include(&mut self, p: Coord) {
        if self.is_null() {
            *self = Self::from_coord(p);
            return;
        }
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn expand_to_include_env(&mut self, other: &Envelope) {
        if other.is_null() {
            return;
        }
        if self.is_null() {
            *self = *other;
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Grow (or, for negative `d`, shrink) by `d` on every side. Shrinking past
    /// zero size yields the null envelope.
    pub fn expand_by(&mut self, d: f64) {
        if self.is_null() {
            return;
        }
        self.min_x -= d;
        self.max_x += d;
        self.min_y -= d;
        self.max_y += d;
        if self.min_x > self.max_x || self.min_y > self.max_y {
            *self = Self::null();
        }
    }

    #[inline]
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    #[inline]
    pub fn intersects_point(&self, p: Coord) -> bool {
        !self.is_null()
            && p.x >= self.min_x
            && p.x <= self.max_x
            && p.y >= self.min_y
            && p.y <= self.max_y
    }

    /// True if `other` lies wholly inside (boundary included).
    #[inline]
    pub fn contains(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Overlap test for the envelopes of segments `p1-p2` and `q1-q2`
    /// without materializing either envelope.
    #[inline]
    pub fn segments_intersect(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> bool {
        let min_q = q1.x.min(q2.x);
        let max_q = q1.x.max(q2.x);
        let min_p = p1.x.min(p2.x);
        let max_p = p1.x.max(p2.x);
        if min_p > max_q || max_p < min_q {
            return false;
        }
        let min_q = q1.y.min(q2.y);
        let max_q = q1.y.max(q2.y);
        let min_p = p1.y.min(p2.y);
        let max_p = p1.y.max(p2.y);
        !(min_p > max_q || max_p < min_q)
    }
}
