//! Tensor type with gradient tracking

use super::BackwardOp;
use crate::error::{Error, Result};
use ndarray::{ArrayD, IxDyn};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared gradient storage. Clones of a tensor share one cell, so the
/// cell's address also serves as tensor identity during backward traversal.
pub(crate) type GradCell = Rc<RefCell<Option<ArrayD<f32>>>>;

/// Tensor with automatic differentiation support
#[derive(Clone)]
pub struct Tensor {
    data: ArrayD<f32>,
    grad: GradCell,
    backward_op: Option<Rc<dyn BackwardOp>>,
    requires_grad: bool,
}

impl Tensor {
    /// Create a new tensor from an n-dimensional array
    pub fn new(data: ArrayD<f32>, requires_grad: bool) -> Self {
        Self {
            data,
            grad: Rc::new(RefCell::new(None)),
            backward_op: None,
            requires_grad,
        }
    }

    /// Create a tensor of the given shape from a flat buffer
    ///
    /// Fails with [`Error::ShapeMismatch`] if the buffer length does not
    /// equal the product of the shape's dimensions.
    pub fn from_shape_vec(shape: &[usize], values: Vec<f32>, requires_grad: bool) -> Result<Self> {
        let len = values.len();
        let data = ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|_| Error::ShapeMismatch {
            expected: shape.to_vec(),
            got: vec![len],
        })?;
        Ok(Self::new(data, requires_grad))
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize], requires_grad: bool) -> Self {
        Self::new(ArrayD::zeros(IxDyn(shape)), requires_grad)
    }

    /// Create a tensor filled with ones
    pub fn ones(shape: &[usize], requires_grad: bool) -> Self {
        Self::new(ArrayD::ones(IxDyn(shape)), requires_grad)
    }

    /// Get reference to data
    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    /// Get shape
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Get number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get gradient accumulated by backward passes, or `None` if no
    /// backward pass has written one (never an error)
    pub fn grad(&self) -> Option<ArrayD<f32>> {
        self.grad.borrow().clone()
    }

    /// Accumulate gradient (sum, not overwrite, so a tensor feeding
    /// several passes keeps all contributions)
    pub fn accumulate_grad(&self, grad: ArrayD<f32>) {
        let mut grad_ref = self.grad.borrow_mut();
        if let Some(existing) = grad_ref.as_mut() {
            *existing += &grad;
        } else {
            *grad_ref = Some(grad);
        }
    }

    /// Zero out gradient
    pub fn zero_grad(&self) {
        *self.grad.borrow_mut() = None;
    }

    /// Check if requires gradient
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Toggle gradient tracking. The flag is the only metadata mutable
    /// after construction; values are not.
    pub fn set_requires_grad(&mut self, requires_grad: bool) {
        self.requires_grad = requires_grad;
    }

    /// Get reference to gradient cell (tensor identity for the engine)
    pub(crate) fn grad_cell(&self) -> GradCell {
        self.grad.clone()
    }

    /// Set backward operation
    pub(crate) fn set_backward_op(&mut self, op: Rc<dyn BackwardOp>) {
        self.backward_op = Some(op);
    }

    /// Get backward operation
    pub(crate) fn backward_op(&self) -> Option<Rc<dyn BackwardOp>> {
        self.backward_op.clone()
    }
}

impl std::fmt::Debug for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("data", &self.data)
            .field("grad", &self.grad.borrow())
            .field("requires_grad", &self.requires_grad)
            .finish()
    }
}
