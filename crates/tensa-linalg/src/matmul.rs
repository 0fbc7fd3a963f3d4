//! Matrix and matrix-vector products.

use tensa_core::{Element, Result, TensaError, Tensor};

/// Product of two conformable tensors: matrix x matrix `(m,k)(k,n) -> (m,n)`
/// or matrix x vector `(m,k)(k) -> (m)`.
///
/// Walks both operands through their strides, so transposed views multiply
/// without materializing.
pub fn matmul<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>> {
    match (a.shape().dims(), b.shape().dims()) {
        (&[m, k], &[k2, n]) if k == k2 => {
            let mut out = vec![T::zero(); m * n];
            for i in 0..m {
                for j in 0..n {
                    let mut acc = T::zero();
                    for p in 0..k {
                        // Safety: i < m, p < k, j < n by loop bounds.
                        unsafe {
                            acc = acc.add(
                                &a.get_unchecked(&[i, p]).mul(b.get_unchecked(&[p, j])),
                            );
                        }
                    }
                    out[i * n + j] = acc;
                }
            }
            Tensor::from_vec(out, &[m, n])
        }
        (&[m, k], &[k2]) if k == k2 => {
            let mut out = vec![T::zero(); m];
            for i in 0..m {
                let mut acc = T::zero();
                for p in 0..k {
                    // Safety: i < m, p < k by loop bounds.
                    unsafe {
                        acc = acc.add(&a.get_unchecked(&[i, p]).mul(b.get_unchecked(&[p])));
                    }
                }
                out[i] = acc;
            }
            Tensor::from_vec(out, &[m])
        }
        (_, dims) => Err(TensaError::shape_mismatch(
            format!("an operand conformable with {}", a.shape()),
            dims,
        )),
    }
}
