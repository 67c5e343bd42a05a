//! Elementwise operations with backward rules
//!
//! Each operation returns a fresh tensor whose `requires_grad` is the OR of
//! its operands' flags, and records a [`BackwardOp`] node only when the
//! result requires gradients, so inference-only use builds no graph.

use super::{BackwardOp, Tensor};
use crate::error::{Error, Result};
use ndarray::ArrayD;
use std::rc::Rc;

fn check_same_shape(a: &Tensor, b: &Tensor) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(Error::ShapeMismatch {
            expected: a.shape().to_vec(),
            got: b.shape().to_vec(),
        });
    }
    Ok(())
}

/// Add two tensors elementwise
pub fn add(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    check_same_shape(a, b)?;
    let data = a.data() + b.data();
    let requires_grad = a.requires_grad() || b.requires_grad();

    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        result.set_backward_op(Rc::new(AddBackward {
            a: a.clone(),
            b: b.clone(),
        }));
    }

    Ok(result)
}

struct AddBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for AddBackward {
    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn input_grads(&self, upstream: &ArrayD<f32>) -> Vec<ArrayD<f32>> {
        // ∂(a+b)/∂a = 1, ∂(a+b)/∂b = 1
        vec![upstream.clone(), upstream.clone()]
    }
}

/// Subtract two tensors elementwise
pub fn sub(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    check_same_shape(a, b)?;
    let data = a.data() - b.data();
    let requires_grad = a.requires_grad() || b.requires_grad();

    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        result.set_backward_op(Rc::new(SubBackward {
            a: a.clone(),
            b: b.clone(),
        }));
    }

    Ok(result)
}

struct SubBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for SubBackward {
    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn input_grads(&self, upstream: &ArrayD<f32>) -> Vec<ArrayD<f32>> {
        // ∂(a−b)/∂a = 1, ∂(a−b)/∂b = −1
        vec![upstream.clone(), upstream.mapv(|g| -g)]
    }
}

/// Multiply two tensors elementwise
pub fn mul(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    check_same_shape(a, b)?;
    let data = a.data() * b.data();
    let requires_grad = a.requires_grad() || b.requires_grad();

    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        result.set_backward_op(Rc::new(MulBackward {
            a: a.clone(),
            b: b.clone(),
        }));
    }

    Ok(result)
}

struct MulBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for MulBackward {
    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn input_grads(&self, upstream: &ArrayD<f32>) -> Vec<ArrayD<f32>> {
        // ∂L/∂a = ∂L/∂out ⊙ b
        let grad_a = upstream * self.b.data();
        // ∂L/∂b = ∂L/∂out ⊙ a
        let grad_b = upstream * self.a.data();
        vec![grad_a, grad_b]
    }
}

/// Elementwise sine
pub fn sin(a: &Tensor) -> Tensor {
    let data = a.data().mapv(f32::sin);
    let requires_grad = a.requires_grad();

    let mut result = Tensor::new(data, requires_grad);

    if requires_grad {
        result.set_backward_op(Rc::new(SinBackward { a: a.clone() }));
    }

    result
}

struct SinBackward {
    a: Tensor,
}

impl BackwardOp for SinBackward {
    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }

    fn input_grads(&self, upstream: &ArrayD<f32>) -> Vec<ArrayD<f32>> {
        // ∂sin(a)/∂a = cos(a)
        vec![upstream * &self.a.data().mapv(f32::cos)]
    }
}

/// Elementwise hyperbolic tangent
pub fn tanh(a: &Tensor) -> Tensor {
    let data = a.data().mapv(f32::tanh);
    let requires_grad = a.requires_grad();

    let mut result = Tensor::new(data.clone(), requires_grad);

    if requires_grad {
        // The output doubles as the saved value: tanh' = 1 − tanh².
        result.set_backward_op(Rc::new(TanhBackward {
            a: a.clone(),
            output: data,
        }));
    }

    result
}

struct TanhBackward {
    a: Tensor,
    output: ArrayD<f32>,
}

impl BackwardOp for TanhBackward {
    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone()]
    }

    fn input_grads(&self, upstream: &ArrayD<f32>) -> Vec<ArrayD<f32>> {
        // ∂tanh(a)/∂a = 1 − tanh(a)²
        vec![upstream * &self.output.mapv(|y| 1.0 - y * y)]
    }
}
