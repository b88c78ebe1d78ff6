//! Minimal linear geometry model and linework extraction.
//!
//! The full geometry object model lives outside the kernel. This enum only
//! carries enough structure for callers to hand mixed linework to the
//! snap-rounding noder.

use super::Coord;

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    /// Closed rings: `shell` and each hole repeat their first vertex at the end.
    Polygon {
        shell: Vec<Coord>,
        holes: Vec<Vec<Coord>>,
    },
    Collection(Vec<Geometry>),
}

impl Geometry {
    fn collect_lines(&self, out: &mut Vec<Vec<Coord>>) {
        match self {
            Geometry::Point(_) => {}
            Geometry::LineString(pts) => out.push(pts.clone()),
            Geometry::Polygon { shell, holes } => {
                out.push(shell.clone());
                out.extend(holes.iter().cloned());
            }
            Geometry::Collection(parts) => {
                for g in parts {
                    g.collect_lines(out);
                }
            }
        }
    }
}

/// Linear components of every geometry, in input order (rings included).
/// Empty components are skipped.
pub fn extract_lines(geoms: &[Geometry]) -> Vec<Vec<Coord>> {
    let mut out = Vec::new();
    for g in geoms {
        g.collect_lines(&mut out);
    }
    out.retain(|l| !l.is_empty());
    out
}

/// Drop consecutive duplicates (exact equality).
pub fn remove_repeated_points(pts: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(pts.len());
    for p in pts {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::coord;

    #[test]
    fn extract_flattens_collections_and_rings() {
        let square = vec![
            coord(0.0, 0.0),
            coord(1.0, 0.0),
            coord(1.0, 1.0),
            coord(0.0, 0.0),
        ];
        let g = Geometry::Collection(vec![
            Geometry::Point(coord(5.0, 5.0)),
            Geometry::LineString(vec![coord(0.0, 0.0), coord(2.0, 2.0)]),
            Geometry::Polygon {
                shell: square.clone(),
                holes: vec![],
            },
            Geometry::LineString(vec![]),
        ]);
        let lines = extract_lines(&[g]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], square);
    }

    #[test]
    fn repeated_points_are_removed() {
        let pts = [
            coord(0.0, 0.0),
            coord(0.0, 0.0),
            coord(1.0, 0.0),
            coord(1.0, 0.0),
            coord(0.0, 0.0),
        ];
        assert_eq!(remove_repeated_points(&pts).len(), 3);
    }
}
