//! Error types surfaced by the kernel.
//!
//! - `IndexError`: misuse of a static index (contract violation).
//! - `ValidationError`: the first violation found by `NodingValidator`.
//! - `NodingError`: failures of a noding run; wraps the other two.
//!
//! Degenerate input (zero-length segments, collapsed lines) is never an error.

use thiserror::Error;

use crate::geom::{fmt_coord, fmt_line, Coord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("index cannot be added to once it has been queried")]
    InsertAfterQuery,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A string revisits a point after exactly one step (`a, b, a`).
    #[error("found non-noded collapse at {}", fmt_line(.line))]
    Collapse { at: Coord, line: [Coord; 3] },
    #[error(
        "found non-noded intersection between {} and {}",
        fmt_line(.seg0),
        fmt_line(.seg1)
    )]
    InteriorIntersection { seg0: [Coord; 2], seg1: [Coord; 2] },
    #[error("found endpt/interior pt intersection at index {index} :pt {}", fmt_coord(.pt))]
    EndpointInteriorVertex { pt: Coord, index: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodingError {
    #[error(
        "iterated noding failed to converge after {iterations} iterations \
         ({nodes_created} interior nodes in the last pass)"
    )]
    NonConvergence {
        iterations: usize,
        nodes_created: usize,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::coord;

    #[test]
    fn messages_carry_coordinates() {
        let e = ValidationError::Collapse {
            at: coord(0.0, 0.0),
            line: [coord(0.0, 0.0), coord(5.0, 0.0), coord(0.0, 0.0)],
        };
        assert_eq!(
            e.to_string(),
            "found non-noded collapse at LINESTRING (0 0, 5 0, 0 0)"
        );
        let e = ValidationError::EndpointInteriorVertex {
            pt: coord(1.5, 2.0),
            index: 3,
        };
        assert!(e.to_string().ends_with(":pt 1.5 2"));
        let n: NodingError = IndexError::InsertAfterQuery.into();
        assert!(matches!(n, NodingError::Index(_)));
    }
}
