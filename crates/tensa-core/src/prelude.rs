//! Convenience re-exports for common tensa-core types.
//!
//! ```rust
//! use tensa_core::prelude::*;
//! ```

pub use crate::Complex;
pub use crate::Element;
pub use crate::Result;
pub use crate::Shape;
pub use crate::Tensor;
pub use crate::TensaError;
pub use crate::ThreadMode;
