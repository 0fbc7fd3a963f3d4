//! Strided addressing: translating index tuples into linear buffer positions.
//!
//! A [`Layout`] bundles a shape, a per-axis stride table, and a linear offset.
//! Owned tensors start with contiguous row-major strides; views reorder or
//! derive strides from their parent without recomputing them, which is what
//! makes transpose and sub-tensor O(1).

use smallvec::SmallVec;

use crate::error::TensaError;
use crate::shape::{Shape, Strides};
use crate::Result;

/// Index tuple type used by the odometer iterator.
pub type Index = SmallVec<[usize; 4]>;

/// Shape + strides + offset of one tensor or view.
///
/// Invariant: for every valid index tuple `idx` (checked against the shape),
/// `offset + Σ idx[i] * strides[i]` is within the bounds of the buffer the
/// layout was derived for. All layout-deriving operations preserve this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
    offset: usize,
}

impl Layout {
    /// Contiguous row-major layout over a fresh buffer.
    pub fn contiguous(shape: Shape) -> Self {
        let strides = shape.contiguous_strides();
        Self {
            shape,
            strides,
            offset: 0,
        }
    }

    /// The shape this layout addresses.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Per-axis strides.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Linear offset of the first cell.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of addressable cells.
    pub fn volume(&self) -> usize {
        self.shape.volume()
    }

    /// Whether strides are the row-major strides of the shape with no offset.
    pub fn is_contiguous(&self) -> bool {
        self.offset == 0 && self.strides == self.shape.contiguous_strides()
    }

    /// Checked index translation.
    ///
    /// Fails with [`TensaError::ShapeMismatch`] if the tuple length differs
    /// from the rank and with [`TensaError::IndexOutOfBounds`] if any
    /// component is outside its extent.
    pub fn position(&self, idx: &[usize]) -> Result<usize> {
        let dims = self.shape.dims();
        if idx.len() != dims.len() {
            return Err(TensaError::shape_mismatch(
                format!("an index tuple of length {}", dims.len()),
                idx,
            ));
        }
        let mut pos = self.offset;
        for (axis, (&i, &extent)) in idx.iter().zip(dims.iter()).enumerate() {
            if i >= extent {
                return Err(TensaError::IndexOutOfBounds {
                    axis,
                    index: i,
                    extent,
                });
            }
            pos += i * self.strides[axis];
        }
        Ok(pos)
    }

    /// Unchecked index translation. Skips both the rank and the bounds check.
    ///
    /// The result is meaningless (and may exceed the buffer) unless
    /// `idx.len() == rank` and every component is within its extent.
    #[inline]
    pub fn position_unchecked(&self, idx: &[usize]) -> usize {
        let mut pos = self.offset;
        for (axis, &i) in idx.iter().enumerate() {
            pos += i * self.strides[axis];
        }
        pos
    }

    /// Swap two axes in place: O(1), no data movement, its own inverse.
    pub fn transpose(&mut self, axis1: usize, axis2: usize) -> Result<()> {
        let rank = self.rank();
        for axis in [axis1, axis2] {
            if axis >= rank {
                return Err(TensaError::ArgumentInvalid(format!(
                    "transpose axis {axis} out of range for rank {rank}"
                )));
            }
        }
        self.strides.swap(axis1, axis2);
        let mut dims: SmallVec<[usize; 4]> = SmallVec::from_slice(self.shape.dims());
        dims.swap(axis1, axis2);
        self.shape = Shape::new(&dims);
        Ok(())
    }

    /// Layout addressing the rank-(R-1) sub-tensor at `index` along the
    /// current leading axis: drops the axis and folds `index * strides[0]`
    /// into the offset. Reads the *logical* leading axis, so it composes
    /// correctly with a prior transpose.
    pub fn subtensor(&self, index: usize) -> Result<Layout> {
        let tail = self.shape.tail().ok_or_else(|| {
            TensaError::shape_mismatch("a tensor of rank >= 1", self.shape.dims())
        })?;
        let extent = self.shape.dims()[0];
        if index >= extent {
            return Err(TensaError::IndexOutOfBounds {
                axis: 0,
                index,
                extent,
            });
        }
        Ok(Layout {
            shape: tail,
            strides: SmallVec::from_slice(&self.strides[1..]),
            offset: self.offset + index * self.strides[0],
        })
    }

    /// Iterator over all valid index tuples in logical row-major order.
    ///
    /// Yields exactly one empty tuple for rank 0 and nothing when any extent
    /// is 0.
    pub fn indices(&self) -> IndexIter {
        IndexIter::new(self.shape.clone())
    }

    /// Multi-dimensional index corresponding to a flat row-major position.
    pub(crate) fn index_of(flat: usize, shape: &Shape) -> Index {
        let strides = shape.contiguous_strides();
        let mut idx = SmallVec::with_capacity(shape.rank());
        let mut rem = flat;
        for &s in strides.iter() {
            idx.push(rem / s);
            rem %= s;
        }
        idx
    }
}

/// Row-major odometer over a shape's valid index tuples.
pub struct IndexIter {
    shape: Shape,
    next: Option<Index>,
}

impl IndexIter {
    fn new(shape: Shape) -> Self {
        let next = if shape.volume() == 0 {
            None
        } else {
            Some(SmallVec::from_elem(0usize, shape.rank()))
        };
        Self { shape, next }
    }
}

impl Iterator for IndexIter {
    type Item = Index;

    fn next(&mut self) -> Option<Index> {
        let current = self.next.take()?;
        // Advance the odometer from the innermost axis outward.
        let mut succ = current.clone();
        let dims = self.shape.dims();
        let mut axis = dims.len();
        loop {
            if axis == 0 {
                // Wrapped past the outermost axis: exhausted.
                break;
            }
            axis -= 1;
            succ[axis] += 1;
            if succ[axis] < dims[axis] {
                self.next = Some(succ);
                break;
            }
            succ[axis] = 0;
        }
        Some(current)
    }
}
