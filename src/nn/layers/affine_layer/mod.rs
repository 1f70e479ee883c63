mod affine_forward;
mod affine_backward;

use ndarray::Ix2;
use crate::nn::layers::nn_layer::LayerResult;
use crate::utils::{Array1F, Array2F, ArrayDynF, GenericResult};

pub use affine_forward::forward;
pub use affine_backward::backward;

/// Affine (fully connected) layer: flattens every dimension but the batch into `D` features
/// and computes `x · W + b`, where W is `(D, M)` and b is `(M,)`.
pub struct AffineLayer;

impl AffineLayer {
    pub fn forward(inputs: &ArrayDynF, weights: &Array2F, biases: &Array1F) -> LayerResult<Ix2, AffineCache> {
        forward(inputs, weights, biases)
    }

    pub fn backward(grad: &Array2F, cache: &AffineCache) -> GenericResult<AffineGrads> {
        backward(grad, cache)
    }
}

/// Values captured by the forward pass. The inputs keep their original (unflattened) shape
/// so the inputs' gradient can be reshaped back.
#[derive(Clone, Debug)]
pub struct AffineCache {
    pub inputs: ArrayDynF,
    pub weights: Array2F,
    pub biases: Array1F,
}

#[derive(Clone, Debug)]
pub struct AffineGrads {
    pub inputs: ArrayDynF,
    pub weights: Array2F,
    pub biases: Array1F,
}

fn flat_features(shape: &[usize]) -> usize {
    shape.iter().skip(1).product()
}
