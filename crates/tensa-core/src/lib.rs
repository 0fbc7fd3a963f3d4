//! # tensa-core
//!
//! Generic N-dimensional tensor engine for the tensa stack.
//!
//! Provides the foundational [`Tensor`] type with:
//! - Arbitrary element types through the [`Element`] capability trait
//! - Strided addressing with zero-copy views (transpose, sub-tensor)
//! - Checked and unchecked indexing paths
//! - An elementwise engine with single-threaded and data-parallel execution
//! - A byte-exact serialization codec
//!
//! ## Quick start
//!
//! ```
//! use tensa_core::{Tensor, ThreadMode};
//!
//! // A 2x3 matrix of i64, row-major.
//! let a = Tensor::from_vec(vec![1i64, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
//! assert_eq!(a.rank(), 2);
//! assert_eq!(a.volume(), 6);
//! assert_eq!(a.get(&[1, 2]).unwrap(), &6);
//!
//! // Elementwise arithmetic over equal shapes.
//! let b = Tensor::from_vec(vec![6i64, 5, 4, 3, 2, 1], &[2, 3]).unwrap();
//! let sum = a.piecewise_add(&b, ThreadMode::Auto).unwrap();
//! assert_eq!(sum.get(&[0, 0]).unwrap(), &7);
//! ```
//!
//! ## Views
//!
//! Transpose swaps strides in place without touching data; sub-tensors borrow
//! the parent buffer:
//!
//! ```
//! use tensa_core::Tensor;
//!
//! let mut m = Tensor::from_vec(vec![1i32, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
//! m.transpose(0, 1).unwrap();
//! assert_eq!(m.shape().dims(), &[3, 2]);
//! // Sub-tensoring addresses the logical (post-transpose) leading axis.
//! let row = m.subtensor(1).unwrap();
//! assert_eq!(row.get(&[0]).unwrap(), &2);
//! assert_eq!(row.get(&[1]).unwrap(), &5);
//! ```

pub mod element;
pub mod elementwise;
pub mod error;
pub mod layout;
pub mod prelude;
pub mod serialize;
pub mod shape;
pub mod tensor;

pub use element::{Complex, Element};
pub use elementwise::{map, zip_with, ThreadMode};
pub use error::TensaError;
pub use layout::Layout;
pub use shape::Shape;
pub use tensor::{Tensor, TensorView, TensorViewMut};

pub type Result<T> = std::result::Result<T, TensaError>;
