//! Cell-by-cell combination of same-shaped tensors.
//!
//! The engine walks operands through their strides, so transposed and
//! sub-tensor views combine at full speed without materializing. Loops are
//! specialized per rank up to 3; higher ranks fall back to the odometer
//! iterator. Parallel execution partitions the outermost axis so each worker
//! writes a disjoint chunk of the output buffer.

use rayon::prelude::*;

use crate::element::Element;
use crate::error::TensaError;
use crate::tensor::{Tensor, TensorView};
use crate::Result;

/// Volume above which `ThreadMode::Auto` switches to the parallel path.
pub(crate) const PAR_VOLUME_THRESHOLD: usize = 16_384;

/// Threading policy for elementwise traversal and tensor generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadMode {
    /// Sequential traversal.
    Single,
    /// Always partition across the rayon pool.
    Parallel,
    /// Sequential below a volume threshold, parallel above it.
    #[default]
    Auto,
}

impl ThreadMode {
    /// Whether this mode dispatches to the parallel path for `volume` work
    /// items against a caller-chosen threshold.
    pub fn runs_parallel(self, volume: usize, threshold: usize) -> bool {
        match self {
            ThreadMode::Single => false,
            ThreadMode::Parallel => true,
            ThreadMode::Auto => volume > threshold,
        }
    }
}

/// Combine two same-shaped tensors cell by cell into a new tensor.
///
/// Fails with [`TensaError::ShapeMismatch`] when the shapes differ, or with
/// the first error `f` itself produces (a fallible capability such as exact
/// division). Cells are combined in logical order; under `Parallel` the order
/// across chunks is unspecified but the result is identical.
pub fn zip_with<T, F>(a: &Tensor<T>, b: &Tensor<T>, mode: ThreadMode, f: F) -> Result<Tensor<T>>
where
    T: Element,
    F: Fn(&T, &T) -> Result<T> + Sync,
{
    if a.shape() != b.shape() {
        return Err(TensaError::shape_mismatch(
            format!("{}", a.shape()),
            b.shape().dims(),
        ));
    }
    let volume = a.volume();
    let mut out = Tensor::from_shape(a.shape().dims());
    if volume == 0 {
        return Ok(out);
    }
    let av = a.view();
    let bv = b.view();
    if mode.runs_parallel(volume, PAR_VOLUME_THRESHOLD) && a.rank() >= 1 {
        let n0 = a.shape().dims()[0];
        let chunk = volume / n0;
        out.data
            .par_chunks_mut(chunk)
            .enumerate()
            .try_for_each(|(i, slot)| {
                let ai = av.subtensor(i)?;
                let bi = bv.subtensor(i)?;
                fill_zip(slot, &ai, &bi, &f)
            })?;
    } else {
        fill_zip(&mut out.data, &av, &bv, &f)?;
    }
    Ok(out)
}

/// Transform one tensor cell by cell into a new tensor of the same shape.
pub fn map<T, F>(a: &Tensor<T>, mode: ThreadMode, f: F) -> Result<Tensor<T>>
where
    T: Element,
    F: Fn(&T) -> Result<T> + Sync,
{
    let volume = a.volume();
    let mut out = Tensor::from_shape(a.shape().dims());
    if volume == 0 {
        return Ok(out);
    }
    let av = a.view();
    if mode.runs_parallel(volume, PAR_VOLUME_THRESHOLD) && a.rank() >= 1 {
        let n0 = a.shape().dims()[0];
        let chunk = volume / n0;
        out.data
            .par_chunks_mut(chunk)
            .enumerate()
            .try_for_each(|(i, slot)| {
                let ai = av.subtensor(i)?;
                fill_map(slot, &ai, &f)
            })?;
    } else {
        fill_map(&mut out.data, &av, &f)?;
    }
    Ok(out)
}

/// Serial rank-specialized zip into a contiguous output slice.
///
/// `out.len()` equals the operand volume; writes cover it exactly in logical
/// row-major order.
fn fill_zip<T, F>(out: &mut [T], a: &TensorView<'_, T>, b: &TensorView<'_, T>, f: &F) -> Result<()>
where
    T: Element,
    F: Fn(&T, &T) -> Result<T>,
{
    let dims = a.shape().dims();
    let (sa, sb) = (a.strides(), b.strides());
    let (oa, ob) = (a.layout.offset(), b.layout.offset());
    match dims.len() {
        0 => {
            out[0] = f(&a.data[oa], &b.data[ob])?;
        }
        1 => {
            for i in 0..dims[0] {
                // Strided positions stay in bounds by the layout invariant.
                unsafe {
                    out[i] = f(
                        a.data.get_unchecked(oa + i * sa[0]),
                        b.data.get_unchecked(ob + i * sb[0]),
                    )?;
                }
            }
        }
        2 => {
            let mut w = 0;
            for i in 0..dims[0] {
                for j in 0..dims[1] {
                    unsafe {
                        out[w] = f(
                            a.data.get_unchecked(oa + i * sa[0] + j * sa[1]),
                            b.data.get_unchecked(ob + i * sb[0] + j * sb[1]),
                        )?;
                    }
                    w += 1;
                }
            }
        }
        3 => {
            let mut w = 0;
            for i in 0..dims[0] {
                for j in 0..dims[1] {
                    for k in 0..dims[2] {
                        unsafe {
                            out[w] = f(
                                a.data.get_unchecked(oa + i * sa[0] + j * sa[1] + k * sa[2]),
                                b.data.get_unchecked(ob + i * sb[0] + j * sb[1] + k * sb[2]),
                            )?;
                        }
                        w += 1;
                    }
                }
            }
        }
        _ => {
            for (w, idx) in a.layout.indices().enumerate() {
                let pa = a.layout.position_unchecked(&idx);
                let pb = b.layout.position_unchecked(&idx);
                out[w] = f(&a.data[pa], &b.data[pb])?;
            }
        }
    }
    Ok(())
}

fn fill_map<T, F>(out: &mut [T], a: &TensorView<'_, T>, f: &F) -> Result<()>
where
    T: Element,
    F: Fn(&T) -> Result<T>,
{
    for (w, idx) in a.layout.indices().enumerate() {
        let pa = a.layout.position_unchecked(&idx);
        out[w] = f(&a.data[pa])?;
    }
    Ok(())
}

impl<T: Element> Tensor<T> {
    /// Cell-by-cell sum of two same-shaped tensors.
    pub fn piecewise_add(&self, rhs: &Tensor<T>, mode: ThreadMode) -> Result<Tensor<T>> {
        zip_with(self, rhs, mode, |a, b| Ok(a.add(b)))
    }

    /// Cell-by-cell difference.
    pub fn piecewise_sub(&self, rhs: &Tensor<T>, mode: ThreadMode) -> Result<Tensor<T>> {
        zip_with(self, rhs, mode, |a, b| Ok(a.sub(b)))
    }

    /// Cell-by-cell (Hadamard) product.
    pub fn piecewise_mul(&self, rhs: &Tensor<T>, mode: ThreadMode) -> Result<Tensor<T>> {
        zip_with(self, rhs, mode, |a, b| Ok(a.mul(b)))
    }

    /// Cell-by-cell quotient, with the element type's division semantics
    /// (truncating for integers, IEEE for floats).
    pub fn piecewise_div(&self, rhs: &Tensor<T>, mode: ThreadMode) -> Result<Tensor<T>> {
        zip_with(self, rhs, mode, |a, b| a.div(b))
    }

    /// Cell-by-cell additive inverse.
    pub fn negate(&self, mode: ThreadMode) -> Result<Tensor<T>> {
        map(self, mode, |a| Ok(a.neg()))
    }

    /// Multiply every cell by one value.
    pub fn scale(&self, factor: &T, mode: ThreadMode) -> Result<Tensor<T>> {
        map(self, mode, |a| Ok(a.mul(factor)))
    }
}
