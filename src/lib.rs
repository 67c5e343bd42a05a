//! # Derivar: Minimal Reverse-Mode Autograd
//!
//! Derivar provides a tape-based autograd core: elementwise tensor
//! operations build a dynamic computation graph as expressions are
//! evaluated, and a reverse topological traversal accumulates gradients
//! into leaf tensors.
//!
//! ## Architecture
//!
//! - **autograd**: tensors, operation recording, backward engine
//! - **error**: crate-wide error and result types
//!
//! ## Example
//!
//! ```
//! use derivar::{add, backward, mul, Tensor};
//!
//! let a = Tensor::from_shape_vec(&[2], vec![2.0, 3.0], true)?;
//! let b = Tensor::from_shape_vec(&[2], vec![4.0, 5.0], false)?;
//!
//! // r = (a + b) * b
//! let r = mul(&add(&a, &b)?, &b)?;
//! backward(&r, None)?;
//!
//! // ∂r/∂a = b
//! assert_eq!(a.grad().unwrap().as_slice().unwrap(), &[4.0, 5.0]);
//! # Ok::<(), derivar::Error>(())
//! ```

pub mod autograd;
pub mod error;

// Re-export commonly used types
pub use autograd::{add, backward, mul, sin, sub, tanh, BackwardOp, Tensor};
pub use error::{Error, Result};
