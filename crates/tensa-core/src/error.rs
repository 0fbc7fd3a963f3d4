//! Error taxonomy for the tensa tensor engine.
//!
//! Every failure is local, synchronous, and non-retryable. In-place operations
//! (transpose, row operations) are not atomic: a mid-operation failure may
//! leave the tensor partially mutated.

use thiserror::Error;

/// Errors produced by tensor construction, indexing, algorithms, and the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensaError {
    /// Incompatible ranks or extents for an operation.
    #[error("shape mismatch: expected {expected}, got {got:?}")]
    ShapeMismatch {
        /// Human-readable description of the required shape.
        expected: String,
        /// Observed extents.
        got: Vec<usize>,
    },

    /// Checked indexing outside an axis extent.
    #[error("index {index} out of bounds for axis {axis} with extent {extent}")]
    IndexOutOfBounds {
        axis: usize,
        index: usize,
        extent: usize,
    },

    /// Malformed argument (bad slice range, zero divisor for exact types, ...).
    #[error("invalid argument: {0}")]
    ArgumentInvalid(String),

    /// LU decomposition hit a zero pivot that row exchanges would be needed to avoid.
    #[error("matrix has no LU decomposition without row exchanges")]
    ImpossibleDecomposition,

    /// Inversion of a singular matrix (determinant is the element type's zero).
    #[error("matrix is singular: determinant is zero")]
    InvalidDeterminant,

    /// Operation undefined for this rank or shape (e.g. cross product on non-3 vectors).
    #[error("not supported: {0}")]
    NotSupported(String),

    /// An element capability that was invoked but not supplied by the element type.
    #[error("element capability `{0}` is not implemented for this type")]
    NotImplemented(&'static str),

    /// Malformed or truncated serialized data.
    #[error("decode error: {0}")]
    DecodeError(String),
}

impl TensaError {
    /// Shorthand for a [`TensaError::ShapeMismatch`] built from an observed shape.
    pub fn shape_mismatch(expected: impl Into<String>, got: &[usize]) -> Self {
        TensaError::ShapeMismatch {
            expected: expected.into(),
            got: got.to_vec(),
        }
    }
}
