//! Finite difference helpers for checking the analytic gradients of the layers.
use ndarray::{Dimension, IntoDimension, Zip};
use crate::utils::{ArrayF, F};

/// Default step used by the centered differences. Small enough for f64 kernels, large enough
/// to stay away from cancellation noise.
pub const DEFAULT_STEP: F = 0.00001;

/// Estimates the gradient of `sum(f(x) * grad)` with respect to every element of `x`, which is
/// what a layer's backward pass computes when `grad` is its upstream gradient.
pub fn eval_numerical_gradient_array<D, E, Func>(mut f: Func, x: &ArrayF<D>, grad: &ArrayF<E>, step: F) -> ArrayF<D>
    where D: Dimension, E: Dimension, Func: FnMut(&ArrayF<D>) -> ArrayF<E> {
    let mut x = x.to_owned();
    let mut result = ArrayF::<D>::zeros(x.raw_dim());
    let indices: Vec<D> = x.indexed_iter().map(|(index, _)| index.into_dimension()).collect();

    for index in indices {
        let old = x[index.clone()];
        x[index.clone()] = old + step;
        let positive = f(&x);
        x[index.clone()] = old - step;
        let negative = f(&x);
        x[index.clone()] = old;

        result[index] = ((positive - negative) * grad).sum() / (2.0 * step);
    }

    result
}

/// Estimates the gradient of a scalar function, like a loss, with respect to every element of `x`.
pub fn eval_numerical_gradient<D, Func>(mut f: Func, x: &ArrayF<D>, step: F) -> ArrayF<D>
    where D: Dimension, Func: FnMut(&ArrayF<D>) -> F {
    let mut x = x.to_owned();
    let mut result = ArrayF::<D>::zeros(x.raw_dim());
    let indices: Vec<D> = x.indexed_iter().map(|(index, _)| index.into_dimension()).collect();

    for index in indices {
        let old = x[index.clone()];
        x[index.clone()] = old + step;
        let positive = f(&x);
        x[index.clone()] = old - step;
        let negative = f(&x);
        x[index.clone()] = old;

        result[index] = (positive - negative) / (2.0 * step);
    }

    result
}

/// Largest elementwise relative error between two arrays of the same shape.
pub fn rel_error<D: Dimension>(a: &ArrayF<D>, b: &ArrayF<D>) -> F {
    Zip::from(a).and(b).fold(0.0, |acc, a, b| {
        let error = (a - b).abs() / F::max(0.00000001, a.abs() + b.abs());
        F::max(acc, error)
    })
}

/// Largest elementwise difference between two arrays, relative to the largest magnitude found
/// in either of them. Unlike [rel_error], elements whose gradient is close to 0 don't blow up
/// the result with rounding noise.
pub fn scaled_error<D: Dimension>(a: &ArrayF<D>, b: &ArrayF<D>) -> F {
    let diff = Zip::from(a).and(b).fold(0.0, |acc, a, b| F::max(acc, (a - b).abs()));
    let scale = a.iter().chain(b.iter()).fold(0.0, |acc: F, o| acc.max(o.abs()));
    diff / F::max(0.00000001, scale)
}
