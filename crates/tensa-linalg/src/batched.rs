//! Batched matrix and vector operations.
//!
//! A batched operand is a tensor whose trailing one or two axes are the
//! working axes and whose leading axes enumerate independent problems. Each
//! leading-index combination is solved on its own; with
//! [`ThreadMode::Parallel`] (or `Auto` above a batch-count threshold) rayon
//! distributes combinations across workers, each producing its own disjoint
//! slice of the result.

use rayon::prelude::*;

use tensa_core::{Element, Result, TensaError, Tensor, TensorView, ThreadMode};

use crate::determinant::determinant_gaussian;
use crate::inverse::invert;
use crate::matmul::matmul;
use crate::vector::dot;

/// Batch count above which `ThreadMode::Auto` goes parallel. Combinations
/// are coarse work items, so the cutoff is much lower than the elementwise
/// one.
const PAR_BATCH_THRESHOLD: usize = 8;

/// Split dims into leading batch axes and the trailing `work` axes.
fn split_axes<'a>(
    dims: &'a [usize],
    work: usize,
    what: &str,
) -> Result<(&'a [usize], &'a [usize])> {
    if dims.len() < work {
        return Err(TensaError::shape_mismatch(
            format!("a batched {what} of rank >= {work}"),
            dims,
        ));
    }
    Ok(dims.split_at(dims.len() - work))
}

/// View of the working tensor at one leading-index combination.
fn combination<'a, T: Element>(
    t: &'a Tensor<T>,
    lead: &[usize],
    flat: usize,
) -> Result<TensorView<'a, T>> {
    let mut coords = vec![0usize; lead.len()];
    let mut rem = flat;
    for axis in (0..lead.len()).rev() {
        coords[axis] = rem % lead[axis];
        rem /= lead[axis];
    }
    let mut view = t.view();
    for &c in &coords {
        view = view.subtensor(c)?;
    }
    Ok(view)
}

/// Solve every combination, sequentially or across the rayon pool, and
/// return the per-combination cell runs in batch order.
fn solve_all<T, F>(batch: usize, mode: ThreadMode, f: F) -> Result<Vec<Vec<T>>>
where
    T: Element,
    F: Fn(usize) -> Result<Vec<T>> + Sync,
{
    if mode.runs_parallel(batch, PAR_BATCH_THRESHOLD) {
        (0..batch).into_par_iter().map(&f).collect()
    } else {
        (0..batch).map(f).collect()
    }
}

fn assemble<T: Element>(runs: Vec<Vec<T>>, dims: &[usize]) -> Result<Tensor<T>> {
    let mut data = Vec::new();
    for run in runs {
        data.extend(run);
    }
    Tensor::from_vec(data, dims)
}

/// Matrix product applied per leading-index combination.
///
/// Leading axes of both operands must agree; the trailing axes follow the
/// `(m,k)(k,n) -> (m,n)` rule.
pub fn batched_matmul<T: Element>(
    a: &Tensor<T>,
    b: &Tensor<T>,
    mode: ThreadMode,
) -> Result<Tensor<T>> {
    let (lead_a, ma) = split_axes(a.shape().dims(), 2, "matrix")?;
    let (lead_b, mb) = split_axes(b.shape().dims(), 2, "matrix")?;
    if lead_a != lead_b {
        return Err(TensaError::shape_mismatch(
            format!("leading axes {:?}", lead_a),
            lead_b,
        ));
    }
    if ma[1] != mb[0] {
        return Err(TensaError::shape_mismatch(
            format!("a trailing matrix conformable with {}x{}", ma[0], ma[1]),
            mb,
        ));
    }
    let batch: usize = lead_a.iter().product();
    let runs = solve_all(batch, mode, |i| {
        let x = combination(a, lead_a, i)?.to_tensor();
        let y = combination(b, lead_b, i)?.to_tensor();
        Ok(matmul(&x, &y)?.to_vec())
    })?;
    let mut out_dims = lead_a.to_vec();
    out_dims.extend([ma[0], mb[1]]);
    assemble(runs, &out_dims)
}

/// Determinant per trailing square matrix; the result drops both working
/// axes (a rank-2 input yields a rank-0 tensor).
pub fn batched_determinant<T: Element>(a: &Tensor<T>, mode: ThreadMode) -> Result<Tensor<T>> {
    let (lead, work) = split_axes(a.shape().dims(), 2, "matrix")?;
    if work[0] != work[1] {
        return Err(TensaError::shape_mismatch(
            "trailing square matrix axes",
            work,
        ));
    }
    let batch: usize = lead.iter().product();
    let runs = solve_all(batch, mode, |i| {
        let m = combination(a, lead, i)?.to_tensor();
        Ok(vec![determinant_gaussian(&m)?])
    })?;
    assemble(runs, lead)
}

/// Inverse per trailing square matrix; the result keeps the input shape.
pub fn batched_invert<T: Element>(a: &Tensor<T>, mode: ThreadMode) -> Result<Tensor<T>> {
    let (lead, work) = split_axes(a.shape().dims(), 2, "matrix")?;
    if work[0] != work[1] {
        return Err(TensaError::shape_mismatch(
            "trailing square matrix axes",
            work,
        ));
    }
    let batch: usize = lead.iter().product();
    let runs = solve_all(batch, mode, |i| {
        let m = combination(a, lead, i)?.to_tensor();
        Ok(invert(&m)?.to_vec())
    })?;
    assemble(runs, a.shape().dims())
}

/// Dot product per trailing vector pair; the result drops the working axis.
pub fn batched_dot<T: Element>(
    a: &Tensor<T>,
    b: &Tensor<T>,
    mode: ThreadMode,
) -> Result<Tensor<T>> {
    let (lead_a, va) = split_axes(a.shape().dims(), 1, "vector")?;
    let (lead_b, vb) = split_axes(b.shape().dims(), 1, "vector")?;
    if lead_a != lead_b || va != vb {
        return Err(TensaError::shape_mismatch(
            format!("{}", a.shape()),
            b.shape().dims(),
        ));
    }
    let batch: usize = lead_a.iter().product();
    let runs = solve_all(batch, mode, |i| {
        let x = combination(a, lead_a, i)?.to_tensor();
        let y = combination(b, lead_b, i)?.to_tensor();
        Ok(vec![dot(&x, &y)?])
    })?;
    assemble(runs, lead_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacked_matrices() -> Tensor<i64> {
        // Two 2x2 matrices: [[1,1],[0,1]] and [[2,1],[1,1]].
        Tensor::from_vec(vec![1, 1, 0, 1, 2, 1, 1, 1], &[2, 2, 2]).unwrap()
    }

    #[test]
    fn test_batched_matmul() {
        let a = stacked_matrices();
        let out = batched_matmul(&a, &a, ThreadMode::Single).unwrap();
        assert_eq!(out.shape().dims(), &[2, 2, 2]);
        // Each slot is the square of the stacked matrix.
        assert_eq!(out.slice(0, 1).unwrap().to_vec(), vec![1, 2, 0, 1]);
        assert_eq!(out.slice(1, 2).unwrap().to_vec(), vec![5, 3, 3, 2]);
    }

    #[test]
    fn test_batched_matmul_matches_per_slot() {
        let a = stacked_matrices();
        let out = batched_matmul(&a, &a, ThreadMode::Parallel).unwrap();
        for i in 0..2 {
            let slot = a.subtensor(i).unwrap().to_tensor();
            let expect = matmul(&slot, &slot).unwrap();
            assert_eq!(out.subtensor(i).unwrap().to_tensor(), expect);
        }
    }

    #[test]
    fn test_batched_determinant() {
        let a = stacked_matrices();
        let d = batched_determinant(&a, ThreadMode::Single).unwrap();
        assert_eq!(d.shape().dims(), &[2]);
        assert_eq!(d.to_vec(), vec![1, 1]);
    }

    #[test]
    fn test_batched_determinant_rank_two_gives_scalar() {
        let m = Tensor::from_vec(vec![3i64, 8, 4, 6], &[2, 2]).unwrap();
        let d = batched_determinant(&m, ThreadMode::Single).unwrap();
        assert_eq!(d.rank(), 0);
        assert_eq!(d.get(&[]).unwrap(), &-14);
    }

    #[test]
    fn test_batched_invert() {
        let a = stacked_matrices();
        let inv = batched_invert(&a, ThreadMode::Single).unwrap();
        let prod = batched_matmul(&a, &inv, ThreadMode::Single).unwrap();
        for i in 0..2 {
            assert_eq!(
                prod.subtensor(i).unwrap().to_tensor(),
                Tensor::identity(2)
            );
        }
    }

    #[test]
    fn test_batched_invert_fails_on_any_singular_slot() {
        let a = Tensor::from_vec(vec![1i64, 0, 0, 1, 1, 2, 2, 4], &[2, 2, 2]).unwrap();
        assert_eq!(
            batched_invert(&a, ThreadMode::Single).unwrap_err(),
            TensaError::InvalidDeterminant
        );
    }

    #[test]
    fn test_batched_dot() {
        let a = Tensor::from_vec(vec![1i64, 2, 3, 1, 0, -1], &[2, 3]).unwrap();
        let b = Tensor::from_vec(vec![-3i64, 5, 3, 2, 2, 2], &[2, 3]).unwrap();
        let d = batched_dot(&a, &b, ThreadMode::Single).unwrap();
        assert_eq!(d.to_vec(), vec![16, 0]);
    }

    #[test]
    fn test_parallel_matches_serial() {
        // 3x4 batch of shear matrices with distinct corners.
        let a = Tensor::from_fn(&[3, 4, 2, 2], ThreadMode::Single, |idx| {
            match (idx[2], idx[3]) {
                (0, 1) => (idx[0] * 4 + idx[1]) as i64,
                (r, c) if r == c => 1,
                _ => 0,
            }
        });
        let serial = batched_invert(&a, ThreadMode::Single).unwrap();
        let parallel = batched_invert(&a, ThreadMode::Parallel).unwrap();
        assert_eq!(serial, parallel);
        let auto = batched_invert(&a, ThreadMode::Auto).unwrap();
        assert_eq!(serial, auto);
    }

    #[test]
    fn test_shape_errors() {
        let a = stacked_matrices();
        let v = Tensor::from_vec(vec![1i64, 2], &[2]).unwrap();
        assert!(batched_matmul(&a, &v, ThreadMode::Single).is_err());
        assert!(batched_determinant(&v, ThreadMode::Single).is_err());

        // Mismatched leading axes.
        let b = Tensor::<i64>::from_shape(&[3, 2, 2]);
        assert!(matches!(
            batched_matmul(&a, &b, ThreadMode::Single).unwrap_err(),
            TensaError::ShapeMismatch { .. }
        ));
    }
}
