//! Tensor shapes: per-axis extents with stack-allocated storage for ≤4 axes.
//!
//! Most tensors in practice are rank 1-4 (vectors, matrices, batched
//! matrices), so we avoid heap allocation for the common case.

use smallvec::SmallVec;
use std::fmt;

/// Per-axis stride table, stored like [`Shape`] dims.
pub type Strides = SmallVec<[usize; 4]>;

/// Ordered sequence of non-negative per-axis extents.
///
/// Rank is the number of axes; volume is the product of extents (1 for the
/// rank-0 scalar shape, 0 if any extent is 0). Shapes are value-like: cloning
/// a shape never aliases another tensor's shape.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    /// Create a new shape from extents.
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: SmallVec::from_slice(dims),
        }
    }

    /// The rank-0 scalar shape.
    pub fn scalar() -> Self {
        Self {
            dims: SmallVec::new(),
        }
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total number of addressable cells.
    pub fn volume(&self) -> usize {
        if self.dims.is_empty() {
            1 // scalar
        } else {
            self.dims.iter().product()
        }
    }

    /// Extents as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Extent of a specific axis.
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// Whether this is the rank-0 scalar shape.
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// Row-major strides for a freshly laid out buffer of this shape:
    /// `stride[last] = 1`, `stride[i] = stride[i+1] * dims[i+1]`.
    pub fn contiguous_strides(&self) -> Strides {
        let rank = self.dims.len();
        if rank == 0 {
            return SmallVec::new();
        }
        let mut strides = SmallVec::from_elem(0usize, rank);
        strides[rank - 1] = 1;
        for i in (0..rank - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Shape with the leading axis removed (the sub-tensor shape).
    /// Returns `None` for the scalar shape.
    pub fn tail(&self) -> Option<Shape> {
        if self.dims.is_empty() {
            return None;
        }
        Some(Shape {
            dims: SmallVec::from_slice(&self.dims[1..]),
        })
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.dims.as_slice())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::new(dims)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape {
            dims: SmallVec::from_vec(dims),
        }
    }
}

macro_rules! impl_shape_from_array {
    ($($n:expr),*) => {
        $(
            impl From<[usize; $n]> for Shape {
                fn from(dims: [usize; $n]) -> Self {
                    Shape::new(&dims)
                }
            }
        )*
    };
}

impl_shape_from_array!(0, 1, 2, 3, 4, 5, 6);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar() {
        let s = Shape::scalar();
        assert_eq!(s.rank(), 0);
        assert_eq!(s.volume(), 1);
        assert!(s.is_scalar());
        assert!(s.contiguous_strides().is_empty());
    }

    #[test]
    fn test_basic_shape() {
        let s = Shape::new(&[2, 3, 4]);
        assert_eq!(s.rank(), 3);
        assert_eq!(s.volume(), 24);
        assert_eq!(s.dim(0), Some(2));
        assert_eq!(s.dim(2), Some(4));
        assert_eq!(s.dim(3), None);
    }

    #[test]
    fn test_zero_extent_volume() {
        let s = Shape::new(&[2, 0, 4]);
        assert_eq!(s.volume(), 0);
    }

    #[test]
    fn test_contiguous_strides() {
        let s = Shape::new(&[2, 3, 4]);
        assert_eq!(s.contiguous_strides().as_slice(), &[12, 4, 1]);
    }

    #[test]
    fn test_tail() {
        let s = Shape::new(&[2, 3, 4]);
        assert_eq!(s.tail().unwrap().dims(), &[3, 4]);
        assert_eq!(Shape::new(&[5]).tail().unwrap().dims(), &[] as &[usize]);
        assert!(Shape::scalar().tail().is_none());
    }

    #[test]
    fn test_equality() {
        assert_eq!(Shape::new(&[2, 3]), Shape::new(&[2, 3]));
        assert_ne!(Shape::new(&[2, 3]), Shape::new(&[3, 2]));
    }

    #[test]
    fn test_from_array() {
        let s: Shape = [2, 3].into();
        assert_eq!(s.dims(), &[2, 3]);

        let s: Shape = [].into();
        assert!(s.is_scalar());
    }
}
