//! Integration tests for the autograd core public API.
//!
//! Exercises graph construction and reverse-mode differentiation through
//! the crate surface only, including a full mixed trig/hyperbolic
//! expression checked against its closed-form gradient.

use approx::assert_abs_diff_eq;
use derivar::{add, backward, mul, sin, sub, tanh, Error, Tensor};
use ndarray::{ArrayD, IxDyn};

#[test]
fn mixed_expression_matches_closed_form_gradient() {
    let xs = [0.1f32, 0.3, -0.4, 0.2];
    let ys = [0.7f32, -0.5, 0.1, 0.1];
    let zs = [0.2f32, -0.4, -0.5, -0.2];

    let mut x = Tensor::from_shape_vec(&[2, 2], xs.to_vec(), false).unwrap();
    let y = Tensor::from_shape_vec(&[2, 2], ys.to_vec(), false).unwrap();
    let z = Tensor::from_shape_vec(&[2, 2], zs.to_vec(), false).unwrap();

    x.set_requires_grad(true);

    // r = sin((x + y) ⊙ y) + tanh(z − x)
    let r = add(
        &sin(&mul(&add(&x, &y).unwrap(), &y).unwrap()),
        &tanh(&sub(&z, &x).unwrap()),
    )
    .unwrap();

    backward(&r, Some(ArrayD::ones(IxDyn(&[2, 2])))).unwrap();

    // ∂r/∂x = cos((x + y) ⊙ y) ⊙ y − (1 − tanh(z − x)²)
    let grad = x.grad().unwrap();
    for (i, ((&xv, &yv), &zv)) in xs.iter().zip(&ys).zip(&zs).enumerate() {
        let sech2 = {
            let t = (zv - xv).tanh();
            1.0 - t * t
        };
        let expected = ((xv + yv) * yv).cos() * yv - sech2;
        assert_abs_diff_eq!(grad[[i / 2, i % 2]], expected, epsilon = 1e-6);
    }

    // y and z never required gradients; they stay ungradded.
    assert!(y.grad().is_none());
    assert!(z.grad().is_none());
}

#[test]
fn gradients_accumulate_across_backward_calls() {
    let a = Tensor::from_shape_vec(&[2], vec![2.0, -3.0], true).unwrap();
    let b = Tensor::from_shape_vec(&[2], vec![4.0, 5.0], false).unwrap();
    let r = mul(&a, &b).unwrap();

    backward(&r, None).unwrap();
    let after_first = a.grad().unwrap();

    let seed = ArrayD::from_shape_vec(IxDyn(&[2]), vec![2.0, 2.0]).unwrap();
    backward(&r, Some(seed)).unwrap();
    let after_second = a.grad().unwrap();

    // grad_after_second = grad_after_first + grad_of_second_pass
    assert_abs_diff_eq!(after_second[[0]], after_first[[0]] + 2.0 * 4.0);
    assert_abs_diff_eq!(after_second[[1]], after_first[[1]] + 2.0 * 5.0);

    a.zero_grad();
    assert!(a.grad().is_none());
}

#[test]
fn construction_and_operand_shape_errors() {
    assert!(matches!(
        Tensor::from_shape_vec(&[3], vec![1.0, 2.0], false),
        Err(Error::ShapeMismatch { .. })
    ));

    let a = Tensor::from_shape_vec(&[2], vec![1.0, 2.0], true).unwrap();
    let b = Tensor::from_shape_vec(&[2, 2], vec![1.0; 4], true).unwrap();
    assert!(matches!(add(&a, &b), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn backward_contract_violations_leave_no_gradients() {
    let a = Tensor::from_shape_vec(&[2], vec![1.0, 2.0], false).unwrap();
    let r = sin(&a);
    assert!(matches!(backward(&r, None), Err(Error::NotDifferentiable)));

    let b = Tensor::from_shape_vec(&[2], vec![1.0, 2.0], true).unwrap();
    let s = tanh(&b);
    let bad_seed = ArrayD::ones(IxDyn(&[3]));
    assert!(matches!(
        backward(&s, Some(bad_seed)),
        Err(Error::SeedShapeMismatch { .. })
    ));
    assert!(b.grad().is_none());
}
