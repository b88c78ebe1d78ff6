/// Closed 1D interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Interval from two bounds in either order.
    #[inline]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn point(x: f64) -> Self {
        Self { min: x, max: x }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn centre(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        !(self.min > other.max || self.max < other.min)
    }

    #[inline]
    pub fn overlaps_range(&self, min: f64, max: f64) -> bool {
        !(self.min > max || self.max < min)
    }

    #[inline]
    pub fn contains(&self, other: &Interval) -> bool {
        other.min >= self.min && other.max <= self.max
    }

    #[inline]
    pub fn contains_value(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    pub fn expand_to_include(&mut self, other: &Interval) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}
