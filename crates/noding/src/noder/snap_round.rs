//! Snap rounding.
//!
//! Purpose
//! - Round all vertices to a fixed grid, node the rounded linework with
//!   rounded intersection points, then snap every segment that passes
//!   through a hot pixel (the grid cell around an intersection point or a
//!   vertex) to the pixel's centre.
//! - The output is fully noded on the grid: no two output lines cross except
//!   at shared vertices.
//!
//! Conventions
//! - A hot pixel is the square `centre ± 0.5` in scaled
//!   (grid unit) coordinates; segment tests run in that scaled space.
//! - A vertex is never snapped onto the segments adjacent to it on its own
//!   string.
//! - With a floating precision model there is no grid: the linework is noded
//!   once at its exact interior intersections.

use tracing::{debug, trace};

use super::{
    apply_nodes, InteriorIntersectionFinder, McIndexNoder, Noder, NodingValidator, SegmentString,
};
use crate::cfg::{HOT_PIXEL_TOLERANCE, SAFE_ENV_EXPANSION};
use crate::chain::{build_chains, MonotoneChain};
use crate::error::NodingError;
use crate::geom::{
    extract_lines, remove_repeated_points, Coord, Envelope, Geometry, PrecisionModel,
};
use crate::index::{Index, IndexKind, SpatialIndex};
use crate::math::LineIntersector;

/// The grid cell around a snap point.
#[derive(Clone, Copy, Debug)]
pub struct HotPixel {
    original: Coord,
    scale: f64,
    /// Centre in scaled coordinates.
    centre: Coord,
    /// Corners in scaled coordinates, counter-clockwise from the top right.
    corners: [Coord; 4],
    li: LineIntersector,
}

impl HotPixel {
    pub fn new(pt: Coord, scale: f64) -> Self {
        let centre = Coord::new(Self::scale_value(pt.x, scale), Self::scale_value(pt.y, scale));
        let t = HOT_PIXEL_TOLERANCE;
        let (min_x, max_x) = (centre.x - t, centre.x + t);
        let (min_y, max_y) = (centre.y - t, centre.y + t);
        Self {
            original: pt,
            scale,
            centre,
            corners: [
                Coord::new(max_x, max_y),
                Coord::new(min_x, max_y),
                Coord::new(min_x, min_y),
                Coord::new(max_x, min_y),
            ],
            li: LineIntersector::new(),
        }
    }

    #[inline]
    fn scale_value(v: f64, scale: f64) -> f64 {
        (v * scale + 0.5).floor()
    }

    /// The snap point in input coordinates.
    pub fn coord(&self) -> Coord {
        self.original
    }

    /// Envelope that contains every segment which may meet the pixel.
    pub fn safe_envelope(&self) -> Envelope {
        let tol = SAFE_ENV_EXPANSION / self.scale;
        let p = self.original;
        Envelope::new(p.x - tol, p.x + tol, p.y - tol, p.y + tol)
    }

    /// Does the segment `p0-p1` pass through the pixel?
    pub fn intersects(&self, p0: Coord, p1: Coord) -> bool {
        let s0 = Coord::new(
            Self::scale_value(p0.x, self.scale),
            Self::scale_value(p0.y, self.scale),
        );
        let s1 = Coord::new(
            Self::scale_value(p1.x, self.scale),
            Self::scale_value(p1.y, self.scale),
        );
        self.intersects_scaled(s0, s1)
    }

    fn intersects_scaled(&self, p0: Coord, p1: Coord) -> bool {
        let [top_right, top_left, bottom_left, bottom_right] = self.corners;
        let outside = top_right.x < p0.x.min(p1.x)
            || bottom_left.x > p0.x.max(p1.x)
            || top_right.y < p0.y.min(p1.y)
            || bottom_left.y > p0.y.max(p1.y);
        if outside {
            return false;
        }
        // A proper crossing of any side means the segment enters the pixel.
        // Touching both the left and bottom sides means it passes the bottom
        // left corner, which belongs to the pixel.
        let top = self.li.compute(p0, p1, top_right, top_left);
        if top.is_proper() {
            return true;
        }
        let left = self.li.compute(p0, p1, top_left, bottom_left);
        if left.is_proper() {
            return true;
        }
        let bottom = self.li.compute(p0, p1, bottom_left, bottom_right);
        if bottom.is_proper() {
            return true;
        }
        let right = self.li.compute(p0, p1, bottom_right, top_right);
        if right.is_proper() {
            return true;
        }
        if left.has_intersection() && bottom.has_intersection() {
            return true;
        }
        p0 == self.centre || p1 == self.centre
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SnapRoundCfg {
    /// Grid the output is rounded to.
    pub precision: PrecisionModel,
    /// Certify the result with `NodingValidator` before returning it.
    pub validate: bool,
    pub index: IndexKind,
}

impl Default for SnapRoundCfg {
    fn default() -> Self {
        Self {
            precision: PrecisionModel::fixed_grid(1.0),
            validate: false,
            index: IndexKind::StrTree,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SnapRoundingNoder {
    cfg: SnapRoundCfg,
}

impl SnapRoundingNoder {
    pub fn new(cfg: SnapRoundCfg) -> Self {
        Self { cfg }
    }

    pub fn cfg(&self) -> &SnapRoundCfg {
        &self.cfg
    }

    /// Snap-rounds the linework of `geoms`. Returns the noded lines, each
    /// with at least two points. Duplicate lines are kept; see
    /// `SegmentStringDissolver`.
    pub fn snap_round(&self, geoms: &[Geometry]) -> Result<Vec<Vec<Coord>>, NodingError> {
        let strings: Vec<SegmentString> = extract_lines(geoms)
            .into_iter()
            .map(SegmentString::new)
            .collect();
        let noded = self.round_and_node(strings)?;
        Ok(noded
            .into_iter()
            .map(SegmentString::into_coords)
            .filter(|pts| pts.len() >= 2)
            .collect())
    }

    /// Rounds every string, drops repeated points and collapsed strings,
    /// and nodes the rest.
    fn round_and_node<C: Clone>(
        &self,
        strings: Vec<SegmentString<C>>,
    ) -> Result<Vec<SegmentString<C>>, NodingError> {
        let pm = self.cfg.precision;
        let input = strings.len();
        let mut rounded: Vec<SegmentString<C>> = strings
            .into_iter()
            .filter_map(|s| {
                let (mut pts, context) = s.into_parts();
                pm.reduce(&mut pts);
                let pts = remove_repeated_points(&pts);
                (pts.len() >= 2).then(|| SegmentString::with_context(pts, context))
            })
            .collect();
        debug!(input, kept = rounded.len(), "snap rounding");

        self.compute_nodes(&mut rounded)?;
        let noded = SegmentString::noded_substrings(&rounded);
        if self.cfg.validate {
            NodingValidator::check_valid(&noded)?;
        }
        Ok(noded)
    }

    /// Records the snap-rounded nodes of already rounded strings.
    pub fn compute_nodes<C>(&self, strings: &mut [SegmentString<C>]) -> Result<(), NodingError> {
        let pm = self.cfg.precision;
        let finder = InteriorIntersectionFinder::new(LineIntersector::with_precision(pm))
            .find_all()
            .adding_nodes();
        let mut noder = McIndexNoder::new(finder).with_index(self.cfg.index);
        noder.compute_nodes(strings)?;
        let intersections = noder.into_intersector().into_intersections();

        let PrecisionModel::Fixed { scale } = pm else {
            return Ok(());
        };

        let mut vertex_nodes = 0;
        let pending = {
            let snapper = PointSnapper::new(strings, self.cfg.index)?;
            let mut pending = Vec::new();
            for pt in &intersections {
                snapper.snap(&HotPixel::new(*pt, scale), None, &mut pending);
            }
            for (i, s) in strings.iter().enumerate() {
                if s.len() < 2 {
                    continue;
                }
                let last_seg = s.segment_count() - 1;
                for (v, pt) in s.coords().iter().enumerate() {
                    if snapper.snap(&HotPixel::new(*pt, scale), Some((i, v)), &mut pending) {
                        pending.push((i, v.min(last_seg), *pt));
                        vertex_nodes += 1;
                    }
                }
            }
            pending
        };
        trace!(
            intersections = intersections.len(),
            vertex_nodes,
            nodes = pending.len(),
            "hot pixel snapping"
        );
        apply_nodes(strings, pending);
        Ok(())
    }
}

impl Noder for SnapRoundingNoder {
    fn node<C: Clone>(
        &mut self,
        strings: Vec<SegmentString<C>>,
    ) -> Result<Vec<SegmentString<C>>, NodingError> {
        self.round_and_node(strings)
    }
}

/// Monotone chains of the rounded strings, indexed by envelope, for finding
/// the segments that pass through a hot pixel.
struct PointSnapper<'a, C> {
    strings: &'a [SegmentString<C>],
    chains: Vec<MonotoneChain>,
    index: Index<usize>,
}

impl<'a, C> PointSnapper<'a, C> {
    fn new(strings: &'a [SegmentString<C>], kind: IndexKind) -> Result<Self, NodingError> {
        let mut next_id = 0;
        let mut chains = Vec::new();
        for (i, s) in strings.iter().enumerate() {
            chains.extend(build_chains(s.coords(), i, &mut next_id));
        }
        let mut index = Index::new(kind);
        for (k, c) in chains.iter().enumerate() {
            index.insert(c.envelope(strings[c.string].coords()), k)?;
        }
        Ok(Self {
            strings,
            chains,
            index,
        })
    }

    /// Queues a node at the pixel on every segment through it, skipping the
    /// segments adjacent to `vertex` (string, vertex index). Returns whether
    /// any node was queued.
    fn snap(
        &self,
        pixel: &HotPixel,
        vertex: Option<(usize, usize)>,
        pending: &mut Vec<(usize, usize, Coord)>,
    ) -> bool {
        let search = pixel.safe_envelope();
        let mut added = false;
        self.index.visit(&search, &mut |&k| {
            let chain = &self.chains[k];
            let pts = self.strings[chain.string].coords();
            chain.select(pts, &search, &mut |seg| {
                if let Some((s, v)) = vertex {
                    if s == chain.string && (seg == v || seg + 1 == v) {
                        return;
                    }
                }
                if pixel.intersects(pts[seg], pts[seg + 1]) {
                    pending.push((chain.string, seg, pixel.coord()));
                    added = true;
                }
            });
        });
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::coord;

    #[test]
    fn pixel_catches_segments_through_its_square() {
        let hp = HotPixel::new(coord(5.0, 1.0), 1.0);
        assert!(hp.intersects(coord(0.0, 0.0), coord(10.0, 1.0)));
        assert!(hp.intersects(coord(0.0, 1.0), coord(10.0, 0.0)));
        assert!(hp.intersects(coord(5.0, 1.0), coord(9.0, 9.0)));
        assert!(!hp.intersects(coord(0.0, 3.0), coord(10.0, 3.0)));
        assert!(!hp.intersects(coord(0.0, 0.0), coord(3.0, 0.0)));
    }

    #[test]
    fn pixel_scales_to_the_grid() {
        let hp = HotPixel::new(coord(0.5, 0.2), 10.0);
        assert!(hp.intersects(coord(0.0, 0.2), coord(1.0, 0.2)));
        assert!(!hp.intersects(coord(0.0, 0.4), coord(1.0, 0.4)));
        let env = hp.safe_envelope();
        assert!((env.width() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn crossing_lines_meet_at_the_rounded_intersection() {
        let noder = SnapRoundingNoder::new(SnapRoundCfg {
            validate: true,
            ..SnapRoundCfg::default()
        });
        let geoms = [
            Geometry::LineString(vec![coord(0.0, 0.0), coord(10.0, 1.0)]),
            Geometry::LineString(vec![coord(0.0, 1.0), coord(10.0, 0.0)]),
        ];
        let lines = noder.snap_round(&geoms).unwrap();
        assert_eq!(lines.len(), 4);
        let meet = coord(5.0, 1.0);
        for l in &lines {
            assert!(l.first() == Some(&meet) || l.last() == Some(&meet), "{l:?}");
        }
    }

    #[test]
    fn vertices_are_rounded_half_up() {
        let noder = SnapRoundingNoder::default();
        let geoms = [Geometry::LineString(vec![coord(0.04, 0.04), coord(1.96, 1.96)])];
        let lines = noder.snap_round(&geoms).unwrap();
        assert_eq!(lines, vec![vec![coord(0.0, 0.0), coord(2.0, 2.0)]]);
    }

    #[test]
    fn lines_collapsing_to_a_point_are_dropped() {
        let noder = SnapRoundingNoder::default();
        let geoms = [
            Geometry::LineString(vec![coord(0.1, 0.1), coord(0.3, 0.2)]),
            Geometry::Point(coord(4.0, 4.0)),
        ];
        assert!(noder.snap_round(&geoms).unwrap().is_empty());
    }

    #[test]
    fn vertex_near_a_segment_snaps_it() {
        let noder = SnapRoundingNoder::new(SnapRoundCfg {
            validate: true,
            ..SnapRoundCfg::default()
        });
        // The first line passes below (5, 1) but through its pixel.
        let geoms = [
            Geometry::LineString(vec![coord(0.0, 0.0), coord(10.0, 1.4)]),
            Geometry::LineString(vec![coord(5.0, 1.0), coord(5.0, 5.0)]),
        ];
        let lines = noder.snap_round(&geoms).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines.contains(&vec![coord(0.0, 0.0), coord(5.0, 1.0)]));
    }
}
