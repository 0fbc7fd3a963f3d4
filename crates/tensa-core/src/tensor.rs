//! The tensor core: an owned flat buffer plus strided addressing, and the
//! borrowing view types that alias it.
//!
//! A freshly constructed [`Tensor`] exclusively owns its buffer. Views
//! ([`TensorView`], [`TensorViewMut`]) borrow that buffer with their own
//! [`Layout`], so transpose and sub-tensor derivation never move data, and a
//! write through a mutable view is visible through the owner. The borrow
//! checker enforces that no view outlives the tensor it aliases.

use std::fmt;

use rayon::prelude::*;

use crate::element::Element;
use crate::elementwise::{ThreadMode, PAR_VOLUME_THRESHOLD};
use crate::error::TensaError;
use crate::layout::Layout;
use crate::shape::Shape;
use crate::Result;

/// N-dimensional array of one element type, addressed by an index tuple.
#[derive(Clone)]
pub struct Tensor<T> {
    pub(crate) data: Vec<T>,
    pub(crate) layout: Layout,
}

impl<T: Element> Tensor<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Tensor of the given shape with every cell set to the element's zero.
    pub fn from_shape(shape: &[usize]) -> Self {
        let shape = Shape::new(shape);
        let data = vec![T::zero(); shape.volume()];
        Self {
            data,
            layout: Layout::contiguous(shape),
        }
    }

    /// Tensor from a flattened row-major source.
    ///
    /// Fails with [`TensaError::ArgumentInvalid`] when the data length does
    /// not match the shape's volume.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let shape = Shape::new(shape);
        if data.len() != shape.volume() {
            return Err(TensaError::ArgumentInvalid(format!(
                "shape {} requires {} elements, got {}",
                shape,
                shape.volume(),
                data.len()
            )));
        }
        Ok(Self {
            data,
            layout: Layout::contiguous(shape),
        })
    }

    /// Tensor populated by an index-driven generator.
    ///
    /// `f` receives each index tuple in row-major order; with
    /// [`ThreadMode::Parallel`] (or `Auto` above the volume threshold) cells
    /// are generated concurrently, each worker filling a disjoint range.
    pub fn from_fn<F>(shape: &[usize], mode: ThreadMode, f: F) -> Self
    where
        F: Fn(&[usize]) -> T + Sync,
    {
        let shape = Shape::new(shape);
        let volume = shape.volume();
        let data: Vec<T> = if mode.runs_parallel(volume, PAR_VOLUME_THRESHOLD) {
            (0..volume)
                .into_par_iter()
                .map(|flat| f(&Layout::index_of(flat, &shape)))
                .collect()
        } else {
            Layout::contiguous(shape.clone())
                .indices()
                .map(|idx| f(&idx))
                .collect()
        };
        Self {
            data,
            layout: Layout::contiguous(shape),
        }
    }

    /// Rank-0 tensor holding a single value.
    pub fn scalar(value: T) -> Self {
        Self {
            data: vec![value],
            layout: Layout::contiguous(Shape::scalar()),
        }
    }

    /// The n-by-n identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut data = vec![T::zero(); n * n];
        for i in 0..n {
            data[i * n + i] = T::one();
        }
        Self {
            data,
            layout: Layout::contiguous(Shape::new(&[n, n])),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Shape of the tensor.
    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.layout.volume()
    }

    /// Strides (in elements).
    pub fn strides(&self) -> &[usize] {
        self.layout.strides()
    }

    /// Whether the logical order matches the physical buffer order.
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// The backing buffer in physical order, when contiguous.
    pub fn as_slice(&self) -> Option<&[T]> {
        if self.is_contiguous() {
            Some(&self.data)
        } else {
            None
        }
    }

    // =========================================================================
    // Element access
    // =========================================================================

    /// Checked cell read. The tuple length must equal the rank and every
    /// component must be within its extent.
    pub fn get(&self, idx: &[usize]) -> Result<&T> {
        let pos = self.layout.position(idx)?;
        Ok(&self.data[pos])
    }

    /// Checked cell write.
    pub fn set(&mut self, idx: &[usize], value: T) -> Result<()> {
        let pos = self.layout.position(idx)?;
        self.data[pos] = value;
        Ok(())
    }

    /// Unchecked cell read for validated hot loops.
    ///
    /// # Safety
    ///
    /// `idx.len()` must equal the rank and every component must be within its
    /// axis extent; otherwise the access is out of bounds.
    pub unsafe fn get_unchecked(&self, idx: &[usize]) -> &T {
        let pos = self.layout.position_unchecked(idx);
        self.data.get_unchecked(pos)
    }

    /// Unchecked cell write for validated hot loops.
    ///
    /// # Safety
    ///
    /// Same contract as [`Tensor::get_unchecked`].
    pub unsafe fn set_unchecked(&mut self, idx: &[usize], value: T) {
        let pos = self.layout.position_unchecked(idx);
        *self.data.get_unchecked_mut(pos) = value;
    }

    /// Iterator over cells in logical row-major order, stride-aware.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.layout.indices().map(move |idx| {
            // Odometer indices are always in bounds, so the position is valid.
            &self.data[self.layout.position_unchecked(&idx)]
        })
    }

    /// Cells in logical row-major order as an owned vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    // =========================================================================
    // Views and restructuring
    // =========================================================================

    /// Swap two axes' logical meaning in place. O(1), no data movement, its
    /// own inverse.
    pub fn transpose(&mut self, axis1: usize, axis2: usize) -> Result<()> {
        self.layout.transpose(axis1, axis2)
    }

    /// Read-only view of the whole tensor.
    pub fn view(&self) -> TensorView<'_, T> {
        TensorView {
            data: &self.data,
            layout: self.layout.clone(),
        }
    }

    /// Mutable view of the whole tensor.
    pub fn view_mut(&mut self) -> TensorViewMut<'_, T> {
        TensorViewMut {
            data: &mut self.data,
            layout: self.layout.clone(),
        }
    }

    /// Rank-(R-1) read-only view fixing the leading axis to `index`.
    ///
    /// Aliases this tensor's buffer; repeated application descends further.
    /// Addresses the logical leading axis, so it composes with transpose.
    pub fn subtensor(&self, index: usize) -> Result<TensorView<'_, T>> {
        Ok(TensorView {
            data: &self.data,
            layout: self.layout.subtensor(index)?,
        })
    }

    /// Rank-(R-1) mutable view fixing the leading axis to `index`.
    ///
    /// Writes through the view are visible through this tensor.
    pub fn subtensor_mut(&mut self, index: usize) -> Result<TensorViewMut<'_, T>> {
        Ok(TensorViewMut {
            layout: self.layout.subtensor(index)?,
            data: &mut self.data,
        })
    }

    /// Owned tensor holding rows `lo..hi` of the leading axis.
    ///
    /// Materializes a fresh buffer (O(N) in the copied volume).
    pub fn slice(&self, lo: usize, hi: usize) -> Result<Tensor<T>> {
        let extent = self.shape().dim(0).ok_or_else(|| {
            TensaError::NotSupported("slice of a rank-0 tensor".into())
        })?;
        if lo > hi || hi > extent {
            return Err(TensaError::ArgumentInvalid(format!(
                "slice range {lo}..{hi} invalid for extent {extent}"
            )));
        }
        let mut dims = self.shape().dims().to_vec();
        dims[0] = hi - lo;
        let mut data = Vec::with_capacity(Shape::new(&dims).volume());
        for i in lo..hi {
            data.extend(self.subtensor(i)?.iter().cloned());
        }
        Tensor::from_vec(data, &dims)
    }

    /// Deep copy: every cell cloned into a fresh contiguous buffer in logical
    /// order. Permuted strides do not survive the copy.
    pub fn copy(&self) -> Tensor<T> {
        Tensor {
            data: self.to_vec(),
            layout: Layout::contiguous(self.shape().clone()),
        }
    }
}

impl<T: Element> PartialEq for Tensor<T> {
    /// Logical equality: equal shapes and equal cells in logical order,
    /// regardless of strides or offsets.
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

/// Native-array construction: a rank-1..3 array becomes a tensor of the
/// matching shape, rows flattened in row-major order. Extents come from the
/// array type, so no length check can fail.
impl<T: Element, const N: usize> From<[T; N]> for Tensor<T> {
    fn from(cells: [T; N]) -> Self {
        Self {
            data: cells.into_iter().collect(),
            layout: Layout::contiguous(Shape::new(&[N])),
        }
    }
}

impl<T: Element, const R: usize, const C: usize> From<[[T; C]; R]> for Tensor<T> {
    fn from(rows: [[T; C]; R]) -> Self {
        let mut data = Vec::with_capacity(R * C);
        for row in rows {
            data.extend(row);
        }
        Self {
            data,
            layout: Layout::contiguous(Shape::new(&[R, C])),
        }
    }
}

impl<T: Element, const P: usize, const R: usize, const C: usize> From<[[[T; C]; R]; P]>
    for Tensor<T>
{
    fn from(planes: [[[T; C]; R]; P]) -> Self {
        let mut data = Vec::with_capacity(P * R * C);
        for plane in planes {
            for row in plane {
                data.extend(row);
            }
        }
        Self {
            data,
            layout: Layout::contiguous(Shape::new(&[P, R, C])),
        }
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(shape={}, contiguous={})",
            self.shape(),
            self.is_contiguous()
        )
    }
}

impl<T: Element> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DISPLAY_LIMIT: usize = 20;
        if self.volume() <= DISPLAY_LIMIT {
            write!(f, "tensor([")?;
            for (i, v) in self.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{v}")?;
            }
            write!(f, "], shape={})", self.shape())
        } else {
            write!(f, "tensor(volume={}, shape={})", self.volume(), self.shape())
        }
    }
}

/// Read-only view aliasing a tensor's buffer through its own layout.
#[derive(Clone)]
pub struct TensorView<'a, T> {
    pub(crate) data: &'a [T],
    pub(crate) layout: Layout,
}

impl<'a, T: Element> TensorView<'a, T> {
    /// Shape of the view.
    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.layout.volume()
    }

    /// Strides (in elements).
    pub fn strides(&self) -> &[usize] {
        self.layout.strides()
    }

    /// Checked cell read.
    pub fn get(&self, idx: &[usize]) -> Result<&T> {
        let pos = self.layout.position(idx)?;
        Ok(&self.data[pos])
    }

    /// Unchecked cell read.
    ///
    /// # Safety
    ///
    /// Same contract as [`Tensor::get_unchecked`].
    pub unsafe fn get_unchecked(&self, idx: &[usize]) -> &T {
        let pos = self.layout.position_unchecked(idx);
        self.data.get_unchecked(pos)
    }

    /// Swap two axes of this view in place. The parent tensor is unaffected.
    pub fn transpose(&mut self, axis1: usize, axis2: usize) -> Result<()> {
        self.layout.transpose(axis1, axis2)
    }

    /// Descend one axis: view fixing the leading axis to `index`.
    pub fn subtensor(&self, index: usize) -> Result<TensorView<'a, T>> {
        Ok(TensorView {
            data: self.data,
            layout: self.layout.subtensor(index)?,
        })
    }

    /// Iterator over cells in logical row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        let data = self.data;
        self.layout
            .indices()
            .map(move |idx| &data[self.layout.position_unchecked(&idx)])
    }

    /// Materialize this view into an owned contiguous tensor.
    pub fn to_tensor(&self) -> Tensor<T> {
        Tensor {
            data: self.iter().cloned().collect(),
            layout: Layout::contiguous(self.shape().clone()),
        }
    }
}

/// Mutable view aliasing a tensor's buffer; writes are visible through the
/// owner and any later views.
pub struct TensorViewMut<'a, T> {
    pub(crate) data: &'a mut [T],
    pub(crate) layout: Layout,
}

impl<'a, T: Element> TensorViewMut<'a, T> {
    /// Shape of the view.
    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.layout.volume()
    }

    /// Checked cell read.
    pub fn get(&self, idx: &[usize]) -> Result<&T> {
        let pos = self.layout.position(idx)?;
        Ok(&self.data[pos])
    }

    /// Checked cell write through the view.
    pub fn set(&mut self, idx: &[usize], value: T) -> Result<()> {
        let pos = self.layout.position(idx)?;
        self.data[pos] = value;
        Ok(())
    }

    /// Unchecked cell write.
    ///
    /// # Safety
    ///
    /// Same contract as [`Tensor::get_unchecked`].
    pub unsafe fn set_unchecked(&mut self, idx: &[usize], value: T) {
        let pos = self.layout.position_unchecked(idx);
        *self.data.get_unchecked_mut(pos) = value;
    }

    /// Swap two axes of this view in place.
    pub fn transpose(&mut self, axis1: usize, axis2: usize) -> Result<()> {
        self.layout.transpose(axis1, axis2)
    }

    /// Descend one axis mutably, reborrowing this view.
    pub fn subtensor_mut(&mut self, index: usize) -> Result<TensorViewMut<'_, T>> {
        Ok(TensorViewMut {
            layout: self.layout.subtensor(index)?,
            data: self.data,
        })
    }

    /// Materialize into an owned contiguous tensor.
    pub fn to_tensor(&self) -> Tensor<T> {
        let mut data = Vec::with_capacity(self.volume());
        for idx in self.layout.indices() {
            data.push(self.data[self.layout.position_unchecked(&idx)].clone());
        }
        Tensor {
            data,
            layout: Layout::contiguous(self.shape().clone()),
        }
    }
}
