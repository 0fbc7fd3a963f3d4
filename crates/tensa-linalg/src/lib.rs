//! # tensa-linalg
//!
//! Linear algebra over [`tensa_core`] tensors, generic in the element type.
//!
//! Matrices are rank-2 tensors; every algorithm works for any [`Element`]
//! supplying the capabilities it actually invokes. Exact strategies
//! (cofactor expansion, fraction-based elimination) stay correct over rings
//! and integers; division-hungry strategies take the element type's division
//! semantics as given.
//!
//! ```
//! use tensa_core::Tensor;
//! use tensa_linalg::{determinant_gaussian, determinant_laplace};
//!
//! let m = Tensor::from_vec(vec![3i64, 8, 4, 6], &[2, 2]).unwrap();
//! let det = determinant_laplace(&m).unwrap();
//! assert_eq!(det, -14);
//! assert_eq!(determinant_gaussian(&m).unwrap(), det);
//! ```

pub mod batched;
pub mod determinant;
pub mod echelon;
pub mod fraction;
pub mod inverse;
pub mod lu;
pub mod matmul;
pub mod power;
pub mod vector;

pub use batched::{batched_determinant, batched_dot, batched_invert, batched_matmul};
pub use determinant::{determinant_gaussian, determinant_laplace};
pub use echelon::{add_scaled_row, multiply_row, reduced_row_echelon, row_echelon, swap_rows};
pub use fraction::Frac;
pub use inverse::{adjugate, divide, invert};
pub use lu::{lu, plu};
pub use matmul::matmul;
pub use power::power;
pub use vector::{cross, dot};

use tensa_core::{Element, Result, TensaError, Tensor};

/// Extract `(rows, cols)` of a rank-2 tensor.
pub(crate) fn require_matrix<T: Element>(t: &Tensor<T>) -> Result<(usize, usize)> {
    match t.shape().dims() {
        &[rows, cols] => Ok((rows, cols)),
        dims => Err(TensaError::shape_mismatch("a rank-2 matrix", dims)),
    }
}

/// Extract the order of a square rank-2 tensor.
pub(crate) fn require_square<T: Element>(t: &Tensor<T>) -> Result<usize> {
    match t.shape().dims() {
        &[n, m] if n == m => Ok(n),
        dims => Err(TensaError::shape_mismatch("a square matrix", dims)),
    }
}
