use super::Coord;

/// Coordinate precision: full double precision, or a fixed grid.
///
/// A fixed model with `scale = s` keeps coordinates on the grid `k / s`;
/// the grid size is `1 / s`. Rounding is half-up (`floor(v·s + 0.5) / s`).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum PrecisionModel {
    #[default]
    Floating,
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// Fixed model whose grid cells have side `grid_size`.
    pub fn fixed_grid(grid_size: f64) -> Self {
        Self::Fixed {
            scale: 1.0 / grid_size,
        }
    }

    #[inline]
    pub fn is_floating(&self) -> bool {
        matches!(self, PrecisionModel::Floating)
    }

    /// Grid spacing; zero for the floating model.
    #[inline]
    pub fn grid_size(&self) -> f64 {
        match *self {
            PrecisionModel::Floating => 0.0,
            PrecisionModel::Fixed { scale } => 1.0 / scale,
        }
    }

    #[inline]
    pub fn make_precise_value(&self, v: f64) -> f64 {
        match *self {
            PrecisionModel::Floating => v,
            PrecisionModel::Fixed { scale } => {
                if !v.is_finite() {
                    return v;
                }
                // Dividing by the scale (rather than multiplying by the grid
                // size) keeps values like 0.1 exact for scale 10.
                ((v * scale) + 0.5).floor() / scale
            }
        }
    }

    #[inline]
    pub fn make_precise(&self, p: Coord) -> Coord {
        Coord::new(self.make_precise_value(p.x), self.make_precise_value(p.y))
    }

    /// Round every coordinate of a sequence in place.
    pub fn reduce(&self, pts: &mut [Coord]) {
        if self.is_floating() {
            return;
        }
        for p in pts.iter_mut() {
            *p = self.make_precise(*p);
        }
    }
}
