//! Determinants by two independent strategies.
//!
//! [`determinant_laplace`] is recursive cofactor expansion: exponential, but
//! exact for any ring since it never divides. [`determinant_gaussian`] is
//! O(n^3) elimination over [`Frac`] pairs with one deferred division at the
//! end, which stays exact for integer matrices. The two must agree on every
//! input; the test suites hold them against each other.

use tensa_core::{Element, Result, Tensor};

use crate::fraction::{forward_eliminate, Frac};
use crate::require_square;

/// Reusable minor buffers for cofactor recursion, one per depth.
///
/// Expansion of an n x n matrix wants an (n-1)^2 scratch buffer at every
/// level; the pool hands buffers out and takes them back so one call
/// allocates each size at most once. Per-call object, never shared.
pub(crate) struct ScratchPool<T> {
    bufs: Vec<Vec<T>>,
}

impl<T: Element> ScratchPool<T> {
    pub(crate) fn new() -> Self {
        Self { bufs: Vec::new() }
    }

    fn take(&mut self, len: usize) -> Vec<T> {
        let mut buf = self.bufs.pop().unwrap_or_default();
        buf.clear();
        buf.resize(len, T::zero());
        buf
    }

    fn give(&mut self, buf: Vec<T>) {
        self.bufs.push(buf);
    }
}

/// Cofactor expansion along the first row of a row-major n x n buffer.
pub(crate) fn laplace_flat<T: Element>(cells: &[T], n: usize, pool: &mut ScratchPool<T>) -> T {
    match n {
        0 => T::one(),
        1 => cells[0].clone(),
        2 => cells[0].mul(&cells[3]).sub(&cells[1].mul(&cells[2])),
        _ => {
            let m = n - 1;
            let mut acc = T::zero();
            let mut minor = pool.take(m * m);
            for col in 0..n {
                if cells[col].is_zero() {
                    continue; // zero cofactor contributes nothing
                }
                for i in 1..n {
                    let mut w = (i - 1) * m;
                    for j in 0..n {
                        if j == col {
                            continue;
                        }
                        minor[w] = cells[i * n + j].clone();
                        w += 1;
                    }
                }
                let term = cells[col].mul(&laplace_flat(&minor, m, pool));
                acc = if col % 2 == 0 {
                    acc.add(&term)
                } else {
                    acc.sub(&term)
                };
            }
            pool.give(minor);
            acc
        }
    }
}

/// Determinant by recursive cofactor expansion.
///
/// Exact for every element type: only ring operations are used. Exponential
/// in the order, so reserve it for small matrices and cross-checking.
pub fn determinant_laplace<T: Element>(m: &Tensor<T>) -> Result<T> {
    let n = require_square(m)?;
    let cells = m.to_vec();
    let mut pool = ScratchPool::new();
    Ok(laplace_flat(&cells, n, &mut pool))
}

/// Determinant by fraction-based Gaussian elimination.
///
/// O(n^3) ring operations plus one final division through the element's
/// `div` capability; the quotient equals the true determinant, so the
/// division is exact whenever the determinant lives in the element type.
pub fn determinant_gaussian<T: Element>(m: &Tensor<T>) -> Result<T> {
    let n = require_square(m)?;
    if n == 0 {
        return Ok(T::one());
    }
    let mut cells: Vec<Frac<T>> = m.iter().map(|v| Frac::from_value(v.clone())).collect();
    let (pivots, odd_swaps) = forward_eliminate(&mut cells, n, n);
    if pivots.len() < n {
        return Ok(T::zero()); // rank deficient
    }
    let mut acc = Frac::one();
    for i in 0..n {
        acc = acc.mul(&cells[i * n + i]);
    }
    let det = acc.resolve()?;
    Ok(if odd_swaps { det.neg() } else { det })
}
