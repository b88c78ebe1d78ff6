//! Geometric value types shared by every layer of the kernel.
//!
//! Purpose
//! - `Coord`: a 2D point (`nalgebra::Vector2<f64>`); equality is exact on both
//!   ordinates.
//! - `Envelope` / `Interval`: axis-aligned 2D and 1D extents used as index keys.
//! - `PrecisionModel`: floating or fixed-grid coordinate rounding.
//! - `Geometry`: the minimal linear model consumed by the snap-rounding noder.

mod envelope;
mod interval;
mod linework;
mod precision;

pub use envelope::Envelope;
pub use interval::Interval;
pub use linework::{extract_lines, remove_repeated_points, Geometry};
pub use precision::PrecisionModel;

use nalgebra::Vector2;

/// A point in the plane.
pub type Coord = Vector2<f64>;

/// Shorthand constructor used throughout tests and generators.
#[inline]
pub fn coord(x: f64, y: f64) -> Coord {
    Vector2::new(x, y)
}

/// Formats a coordinate as `x y`, the way coordinates appear in error messages.
pub(crate) fn fmt_coord(p: &Coord) -> String {
    format!("{} {}", p.x, p.y)
}

/// Formats a polyline as `LINESTRING (x0 y0, x1 y1, ...)`.
pub(crate) fn fmt_line(pts: &[Coord]) -> String {
    let body: Vec<String> = pts.iter().map(fmt_coord).collect();
    format!("LINESTRING ({})", body.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_formatting_matches_wkt_shape() {
        let s = fmt_line(&[coord(0.0, 0.0), coord(5.0, 0.5)]);
        assert_eq!(s, "LINESTRING (0 0, 5 0.5)");
    }
}
