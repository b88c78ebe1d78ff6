//! Robust noding and spatial indexing for planar linework.
//!
//! Layers, bottom up:
//! - `math`: double-double arithmetic, the robust orientation predicate and
//!   segment intersection.
//! - `geom`: coordinates, envelopes, intervals, precision models and the
//!   minimal linear geometry model.
//! - `index`: quadtree, STR-tree, bintree, packed interval R-tree, sweep line.
//! - `chain`: monotone chain decomposition.
//! - `noder`: segment strings, the indexed / sweep / all-pairs noders, the
//!   iterated and snap-rounding drivers, validation and dissolving.
//! - `locate`: point-in-area location through the indexes.
//! - `shape`: deterministic synthetic linework.
//!
//! API Policy
//! - `api` is the curated surface; module paths may move between versions.

pub mod api;
pub mod chain;
pub mod error;
pub mod geom;
pub mod index;
pub mod locate;
pub mod math;
pub mod noder;
pub mod shape;

pub(crate) mod cfg;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{IndexError, NodingError, ValidationError};
pub use geom::{coord, Coord, Envelope, Geometry, Interval, PrecisionModel};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{IndexError, NodingError, ValidationError};
    pub use crate::geom::{coord, Coord, Envelope, Geometry, Interval, PrecisionModel};
    pub use crate::index::{IndexKind, IntervalIndex, SpatialIndex};
    pub use crate::noder::{
        IntersectionAdder, IteratedCfg, IteratedNoder, McIndexNoder, Noder, NodingValidator,
        SegmentString, SnapRoundCfg, SnapRoundingNoder,
    };
    pub use crate::shape::ReplayToken;
}
