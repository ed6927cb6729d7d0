//! Error type for descriptor construction and name-driven operations.
//!
//! Structural mismatch between two descriptors is not an error: the copy
//! and traversal routines report it as a `bool`. Caller contract
//! violations (wrong coordinate rank, out-of-range indices, invalid
//! permutations) panic instead of returning one of these.

use karma_types::ElementType;

/// Recoverable failures of the data structure engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DsError {
    #[error("packet descriptor has no elements")]
    EmptyPacket,

    #[error("array descriptor has no dimensions")]
    EmptyArray,

    #[error("dimension \"{0}\" has zero length")]
    EmptyDimension(String),

    #[error("multi-array has no structures")]
    EmptyMultiArray,

    /// The tile table does not have one row per dimension, or rows differ
    /// in their number of levels.
    #[error("tile table shape mismatch: expected {expected} rows of {levels} levels")]
    TilingShape { expected: usize, levels: usize },

    #[error("tiles of dimension {dim} (product {product}) do not divide its length {length}")]
    TileDoesNotDivide {
        dim: usize,
        length: usize,
        product: usize,
    },

    #[error("element type {0} is not atomic")]
    NotAtomic(ElementType),

    #[error("name \"{0}\" not found")]
    NameNotFound(String),

    #[error("name \"{0}\" is ambiguous")]
    AmbiguousName(String),

    #[error("\"{0}\" is not an element of the top-level packet")]
    NotAnElement(String),

    #[error("element \"{0}\" is not numeric")]
    NotNumeric(String),

    #[error("structure {0} of a multi-array must be named")]
    UnnamedStructure(usize),

    #[error("duplicate structure name \"{0}\"")]
    DuplicateStructure(String),

    #[error("tiled arrays cannot be reordered")]
    TiledReorder,

    #[error("cannot remove a dimension from a tiled array")]
    TiledRemove,

    #[error("cannot remove the only dimension of an array")]
    LastDimension,
}

/// Result alias for engine operations.
pub type Result<T, E = DsError> = std::result::Result<T, E>;
