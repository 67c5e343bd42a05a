//! Tape-based autograd engine
//!
//! Elementwise operations record the computation graph as expressions are
//! evaluated; [`backward`] traverses it in reverse topological order and
//! accumulates gradients into leaf tensors.

mod backward;
mod ops;
mod tensor;


pub use backward::{backward, BackwardOp};
pub use ops::{add, mul, sin, sub, tanh};
pub use tensor::Tensor;
