//! Tolerance and sizing defaults (internal).
//!
//! Policy
//! - Defaults are fixed constants. Knobs that callers legitimately tune live on
//!   the `*Cfg` structs (`IteratedCfg`, `SnapRoundCfg`) or on index constructors.

/// Relative error bound for the double-precision orientation filter.
/// Determinants whose magnitude falls below `DP_SAFE_EPSILON * |detsum|` are
/// re-evaluated in double-double arithmetic.
pub(crate) const DP_SAFE_EPSILON: f64 = 1e-15;

/// Default fan-out of `StrTree` nodes.
pub(crate) const DEFAULT_NODE_CAPACITY: usize = 10;

/// Passes the iterated noder tolerates without a decreasing node count.
pub(crate) const MAX_ITER: usize = 5;

/// Initial padding applied to zero-width items in `Quadtree` and `Bintree`
/// until a smaller non-zero width has been observed.
pub(crate) const DEFAULT_MIN_EXTENT: f64 = 1.0;

/// Half the side of a hot pixel, in grid units.
pub(crate) const HOT_PIXEL_TOLERANCE: f64 = 0.5;

/// Half the side of the envelope searched for segments near a hot pixel, in
/// grid units. Larger than the pixel so rounding never hides a candidate.
pub(crate) const SAFE_ENV_EXPANSION: f64 = 0.75;
