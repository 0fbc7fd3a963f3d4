//! Adjugate, inversion, and matrix division.

use tensa_core::{Element, Result, TensaError, Tensor};

use crate::determinant::{determinant_gaussian, laplace_flat, ScratchPool};
use crate::matmul::matmul;
use crate::require_square;

/// Adjugate (classical adjoint): the transposed cofactor matrix.
///
/// Exact for every element type; only ring operations are used. Satisfies
/// `A · adj(A) = det(A) · I` even for singular `A`.
pub fn adjugate<T: Element>(m: &Tensor<T>) -> Result<Tensor<T>> {
    let n = require_square(m)?;
    if n == 0 {
        return Ok(Tensor::from_shape(&[0, 0]));
    }
    if n == 1 {
        return Tensor::from_vec(vec![T::one()], &[1, 1]);
    }
    let cells = m.to_vec();
    let k = n - 1;
    let mut minor = vec![T::zero(); k * k];
    let mut pool = ScratchPool::new();
    let mut out = vec![T::zero(); n * n];
    for i in 0..n {
        for j in 0..n {
            let mut w = 0;
            for r in 0..n {
                if r == i {
                    continue;
                }
                for c in 0..n {
                    if c == j {
                        continue;
                    }
                    minor[w] = cells[r * n + c].clone();
                    w += 1;
                }
            }
            let det = laplace_flat(&minor, k, &mut pool);
            let cofactor = if (i + j) % 2 == 1 { det.neg() } else { det };
            // Transposed placement makes this the adjugate, not the cofactor
            // matrix.
            out[j * n + i] = cofactor;
        }
    }
    Tensor::from_vec(out, &[n, n])
}

/// Matrix inverse via the adjugate: `A⁻¹ = adj(A) / det(A)`.
///
/// Fails with [`TensaError::InvalidDeterminant`] when the determinant is the
/// element's zero. Each cell is resolved through the element's `div`
/// capability, so the result is exact whenever those quotients are (always
/// for unimodular integer matrices, IEEE-rounded for floats).
pub fn invert<T: Element>(m: &Tensor<T>) -> Result<Tensor<T>> {
    let n = require_square(m)?;
    let det = determinant_gaussian(m)?;
    if det.is_zero() {
        return Err(TensaError::InvalidDeterminant);
    }
    let adj = adjugate(m)?;
    let mut out = Vec::with_capacity(n * n);
    for cell in adj.iter() {
        out.push(cell.div(&det)?);
    }
    Tensor::from_vec(out, &[n, n])
}

/// Matrix division `a / b = a · b⁻¹` for equal-order square matrices.
pub fn divide<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>> {
    let na = require_square(a)?;
    let nb = require_square(b)?;
    if na != nb {
        return Err(TensaError::shape_mismatch(
            format!("a square matrix of order {na}"),
            b.shape().dims(),
        ));
    }
    matmul(a, &invert(b)?)
}
