//! Backward operation trait and the reverse-traversal engine

use super::Tensor;
use crate::error::{Error, Result};
use ndarray::ArrayD;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// One recorded operation in the computation graph
pub trait BackwardOp {
    /// Input tensors the operation consumed, in argument order
    fn inputs(&self) -> Vec<Tensor>;

    /// Gradient contribution to each input, given the upstream gradient of
    /// the operation's output. Same order and shapes as [`inputs`].
    ///
    /// [`inputs`]: BackwardOp::inputs
    fn input_grads(&self, upstream: &ArrayD<f32>) -> Vec<ArrayD<f32>>;
}

/// Tensor identity during traversal: clones share the gradient cell, so
/// its address distinguishes tensors.
fn tensor_id(tensor: &Tensor) -> usize {
    Rc::as_ptr(&tensor.grad_cell()) as usize
}

/// Perform a backward pass from `root`, accumulating gradients into every
/// reachable leaf tensor that requires them.
///
/// `seed` is the upstream gradient for `root` itself; `None` uses an
/// all-ones seed, differentiating a non-scalar root as if summed.
///
/// Fails with [`Error::NotDifferentiable`] if `root` does not require
/// gradients, and with [`Error::SeedShapeMismatch`] if an explicit seed's
/// shape disagrees with the root's. On failure no gradient is written.
///
/// Gradients accumulate across calls; [`Tensor::zero_grad`] resets a leaf
/// between independent passes. Intermediate tensors never receive a
/// gradient, only leaves do.
pub fn backward(root: &Tensor, seed: Option<ArrayD<f32>>) -> Result<()> {
    if !root.requires_grad() {
        return Err(Error::NotDifferentiable);
    }

    let seed = match seed {
        Some(seed) => {
            if seed.shape() != root.shape() {
                return Err(Error::SeedShapeMismatch {
                    expected: root.shape().to_vec(),
                    got: seed.shape().to_vec(),
                });
            }
            seed
        }
        None => ArrayD::ones(root.data().raw_dim()),
    };

    // Discover the reachable graph and count, per tensor, how many
    // reachable operations consume it. A tensor's upstream gradient is
    // complete only once every consumer has contributed.
    let mut pending: HashMap<usize, usize> = HashMap::new();
    let mut visited: HashSet<usize> = HashSet::new();
    let mut stack = vec![root.clone()];
    visited.insert(tensor_id(root));
    while let Some(tensor) = stack.pop() {
        if let Some(op) = tensor.backward_op() {
            for input in op.inputs() {
                let id = tensor_id(&input);
                *pending.entry(id).or_insert(0) += 1;
                if visited.insert(id) {
                    stack.push(input);
                }
            }
        }
    }

    // Reverse-topological worklist. The root has no reachable consumer
    // (the graph is acyclic), so it is ready immediately.
    let mut grads: HashMap<usize, ArrayD<f32>> = HashMap::new();
    grads.insert(tensor_id(root), seed);
    let mut ready = vec![root.clone()];
    while let Some(tensor) = ready.pop() {
        let upstream = match grads.remove(&tensor_id(&tensor)) {
            Some(grad) => grad,
            None => continue,
        };
        match tensor.backward_op() {
            Some(op) => {
                let inputs = op.inputs();
                let contributions = op.input_grads(&upstream);
                for (input, contribution) in inputs.iter().zip(contributions) {
                    let id = tensor_id(input);
                    match grads.get_mut(&id) {
                        Some(acc) => *acc += &contribution,
                        None => {
                            grads.insert(id, contribution);
                        }
                    }
                    if let Some(left) = pending.get_mut(&id) {
                        *left -= 1;
                        if *left == 0 {
                            ready.push(input.clone());
                        }
                    }
                }
            }
            // Leaf: the accumulated upstream gradient is final.
            None => {
                if tensor.requires_grad() {
                    tensor.accumulate_grad(upstream);
                }
            }
        }
    }

    Ok(())
}
