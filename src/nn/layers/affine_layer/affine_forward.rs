use ndarray::Ix2;
use crate::nn::errors::{ensure_shape, LayerError};
use crate::nn::layers::affine_layer::{AffineCache, flat_features};
use crate::nn::layers::nn_layer::{LayerOutput, LayerResult};
use crate::utils::{Array1F, Array2F, ArrayDynF};

/// Multiplies the flattened inputs by the weights matrix and adds the biases to every row.
pub fn forward(inputs: &ArrayDynF, weights: &Array2F, biases: &Array1F) -> LayerResult<Ix2, AffineCache> {
    let batch = *inputs.shape().first()
        .ok_or_else(|| LayerError::ShapeMismatch("affine inputs need a batch dimension".to_owned()))?;
    let features = flat_features(inputs.shape());

    ensure_shape(weights.nrows() == features, || format!(
        "inputs {:?} flatten into {} features but weights are {:?}", inputs.shape(), features, weights.shape()
    ))?;
    ensure_shape(biases.len() == weights.ncols(), || format!(
        "{} biases for {} outputs", biases.len(), weights.ncols()
    ))?;
    log::trace!("affine forward: inputs {:?}, weights {:?}", inputs.shape(), weights.shape());

    let flat = inputs.to_shape((batch, features))?;
    let result = flat.dot(weights) + biases;

    Ok(LayerOutput(result, AffineCache {
        inputs: inputs.clone(),
        weights: weights.clone(),
        biases: biases.clone(),
    }))
}
