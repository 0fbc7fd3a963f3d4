//! LU and PLU decompositions.

use tensa_core::{Element, Result, TensaError, Tensor};

use crate::require_square;

/// Doolittle decomposition without row exchanges: `A = L·U` with
/// unit-lower-triangular `L`.
///
/// Fails with [`TensaError::ImpossibleDecomposition`] when a pivot the
/// recurrence must divide by is zero; the all-zero matrix is the canonical
/// failing input. Use [`plu`] when row exchanges are acceptable.
pub fn lu<T: Element>(m: &Tensor<T>) -> Result<(Tensor<T>, Tensor<T>)> {
    let n = require_square(m)?;
    let a = m.to_vec();
    let mut l = vec![T::zero(); n * n];
    let mut u = vec![T::zero(); n * n];
    for i in 0..n {
        for j in i..n {
            let mut sum = a[i * n + j].clone();
            for k in 0..i {
                sum = sum.sub(&l[i * n + k].mul(&u[k * n + j]));
            }
            u[i * n + j] = sum;
        }
        l[i * n + i] = T::one();
        if u[i * n + i].is_zero() && i + 1 < n {
            return Err(TensaError::ImpossibleDecomposition);
        }
        for r in i + 1..n {
            let mut sum = a[r * n + i].clone();
            for k in 0..i {
                sum = sum.sub(&l[r * n + k].mul(&u[k * n + i]));
            }
            l[r * n + i] = sum.div(&u[i * n + i])?;
        }
    }
    Ok((Tensor::from_vec(l, &[n, n])?, Tensor::from_vec(u, &[n, n])?))
}

/// Decomposition with row exchanges: `P·A = L·U`.
///
/// `P` is a permutation matrix, `L` unit lower triangular, `U` upper
/// triangular. Pivots are the first nonzero candidate in each column
/// (element types carry no magnitude ordering); a column with no candidate
/// is skipped, so singular matrices still decompose.
pub fn plu<T: Element>(m: &Tensor<T>) -> Result<(Tensor<T>, Tensor<T>, Tensor<T>)> {
    let n = require_square(m)?;
    let mut u = m.to_vec();
    let mut l = vec![T::zero(); n * n];
    let mut perm: Vec<usize> = (0..n).collect();
    for k in 0..n {
        let Some(pivot_row) = (k..n).find(|&r| !u[r * n + k].is_zero()) else {
            continue;
        };
        if pivot_row != k {
            for j in 0..n {
                u.swap(pivot_row * n + j, k * n + j);
            }
            // Rows of L computed so far move with their U rows.
            for j in 0..k {
                l.swap(pivot_row * n + j, k * n + j);
            }
            perm.swap(pivot_row, k);
        }
        for i in k + 1..n {
            if u[i * n + k].is_zero() {
                continue;
            }
            let factor = u[i * n + k].div(&u[k * n + k])?;
            for j in k..n {
                let scaled = factor.mul(&u[k * n + j]);
                u[i * n + j] = u[i * n + j].sub(&scaled);
            }
            l[i * n + k] = factor;
        }
    }
    for i in 0..n {
        l[i * n + i] = T::one();
    }
    let mut p = vec![T::zero(); n * n];
    for (i, &src) in perm.iter().enumerate() {
        p[i * n + src] = T::one();
    }
    Ok((
        Tensor::from_vec(p, &[n, n])?,
        Tensor::from_vec(l, &[n, n])?,
        Tensor::from_vec(u, &[n, n])?,
    ))
}
