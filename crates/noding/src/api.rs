//! Curated API.
//!
//! Prefer these re-exports over deep module paths; the module layout
//! underneath may change.

// Numerics
pub use crate::math::{
    orientation_index, sign_of_det2x2, LineIntersection, LineIntersector, Orientation, DD,
};
// Value types
pub use crate::geom::{
    coord, extract_lines, remove_repeated_points, Coord, Envelope, Geometry, Interval,
    PrecisionModel,
};
// Indexes
pub use crate::index::{
    Bintree, Index, IndexKind, IntervalIndex, Quadtree, SortedPackedIntervalRTree, SpatialIndex,
    StrTree, SweepLineIndex,
};
// Chains
pub use crate::chain::{build_chains, quadrant, MonotoneChain, Quadrant};
// Noding
pub use crate::noder::{
    HotPixel, InteriorIntersectionFinder, Intersection, IntersectionAdder, IteratedCfg,
    IteratedNoder, McIndexNoder, McSweepLineNoder, Noder, NoderKind, NodingValidator,
    SegmentIntersector, SegmentNode, SegmentString, SegmentStringDissolver, SegmentView,
    SimpleNoder, SnapRoundCfg, SnapRoundingNoder,
};
// Location
pub use crate::locate::{
    locate_point_in_ring, IndexedPointInAreaLocator, Location, McPointInRing, PointInAreaLocator,
    RayCrossingCounter,
};
// Generators
pub use crate::shape::{grid_lines, random_lines, sine_star, ReplayToken};
// Errors
pub use crate::error::{IndexError, NodingError, ValidationError};
