//! Error types for Derivar

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Backward seed shape {got:?} does not match root shape {expected:?}")]
    SeedShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Backward pass requested on a tensor that does not require gradients")]
    NotDifferentiable,
}

pub type Result<T> = std::result::Result<T, Error>;
