//! Numeric primitives.
//!
//! Purpose
//! - `DD`: double-double scalar (~106-bit mantissa) with float-like operators.
//! - `orientation_index`: robust left/right/collinear predicate (double
//!   evaluation with an error filter, DD fallback).
//! - `LineIntersector`: segment/segment intersection and classification built
//!   on the orientation predicate.
//!
//! Conventions
//! - All functions are pure; nothing here allocates on the heap except the
//!   small inline vectors returned by `LineIntersection::points`.

mod dd;
mod intersector;
mod orientation;

pub use dd::DD;
pub use intersector::{LineIntersection, LineIntersector};
pub use orientation::{orientation_index, sign_of_det2x2, Orientation};
