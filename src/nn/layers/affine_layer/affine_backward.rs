use ndarray::Axis;
use crate::nn::errors::ensure_shape;
use crate::nn::layers::affine_layer::{AffineCache, AffineGrads, flat_features};
use crate::utils::{Array2F, GenericResult};

/// Calculates the inputs' gradient as `grad · Wᵀ` (reshaped like the original inputs), the
/// weights' gradient as `xᵀ · grad` and the biases' gradient as the sum of `grad` over the batch.
pub fn backward(grad: &Array2F, cache: &AffineCache) -> GenericResult<AffineGrads> {
    let AffineCache { inputs, weights, biases } = cache;
    let batch = inputs.shape()[0];
    let features = flat_features(inputs.shape());

    ensure_shape(grad.dim() == (batch, weights.ncols()) && biases.len() == weights.ncols(), || format!(
        "gradient {:?} doesn't match affine output ({}, {})", grad.shape(), batch, weights.ncols()
    ))?;
    log::trace!("affine backward: grad {:?}", grad.shape());

    let flat = inputs.to_shape((batch, features))?;

    let inputs_grad = grad.dot(&weights.t()).into_shape(inputs.shape())?;
    let weights_grad = flat.t().dot(grad);
    let biases_grad = grad.sum_axis(Axis(0));

    Ok(AffineGrads {
        inputs: inputs_grad,
        weights: weights_grad,
        biases: biases_grad,
    })
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand_distr::Normal;
    use ndarray_rand::RandomExt;
    use crate::nn::gradient_check::{DEFAULT_STEP, eval_numerical_gradient_array, scaled_error};
    use crate::nn::layers::affine_layer::forward;
    use crate::nn::layers::nn_layer::LayerOutput;
    use crate::utils::{Array1F, ArrayDynF};
    use super::*;

    #[test]
    fn test_backward_matches_numerical() {
        let mut rng = StdRng::seed_from_u64(231);
        let dist = Normal::new(0.0, 1.0).unwrap();
        let inputs = ArrayDynF::random_using(vec![10, 2, 3], dist, &mut rng);
        let weights = Array2F::random_using((6, 5), dist, &mut rng);
        let biases = Array1F::random_using(5, dist, &mut rng);
        let grad = Array2F::random_using((10, 5), dist, &mut rng);

        let LayerOutput(_, cache) = forward(&inputs, &weights, &biases).unwrap();
        let grads = backward(&grad, &cache).unwrap();

        let num_inputs = eval_numerical_gradient_array(
            |x| forward(x, &weights, &biases).unwrap().0, &inputs, &grad, DEFAULT_STEP);
        let num_weights = eval_numerical_gradient_array(
            |w| forward(&inputs, w, &biases).unwrap().0, &weights, &grad, DEFAULT_STEP);
        let num_biases = eval_numerical_gradient_array(
            |b| forward(&inputs, &weights, b).unwrap().0, &biases, &grad, DEFAULT_STEP);

        assert_eq!(grads.inputs.shape(), inputs.shape());
        assert!(scaled_error(&grads.inputs, &num_inputs) < 1e-8);
        assert!(scaled_error(&grads.weights, &num_weights) < 1e-8);
        assert!(scaled_error(&grads.biases, &num_biases) < 1e-8);
    }

    #[test]
    fn test_backward_all_ones_grad() {
        let inputs = array![[[1.0, 2.0]], [[3.0, -1.0]]].into_dyn();
        let weights: Array2F = array![[0.5, -1.0, 2.0], [1.5, 0.0, -0.5]];
        let biases = Array1F::zeros(3);
        let LayerOutput(out, cache) = forward(&inputs, &weights, &biases).unwrap();
        let grads = backward(&Array2F::ones(out.raw_dim()), &cache).unwrap();

        // Each input row receives the row sums of W, dW sums the inputs over the batch.
        let expected_inputs = array![[[1.5, 1.0]], [[1.5, 1.0]]].into_dyn();
        let expected_weights: Array2F = array![[4.0, 4.0, 4.0], [1.0, 1.0, 1.0]];
        assert_eq!(grads.inputs, expected_inputs);
        assert_eq!(grads.weights, expected_weights);
        assert_eq!(grads.biases, array![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_backward_rejects_bad_grad() {
        let inputs = ArrayDynF::zeros(vec![2, 3]);
        let LayerOutput(_, cache) = forward(&inputs, &Array2F::zeros((3, 4)), &Array1F::zeros(4)).unwrap();
        assert!(backward(&Array2F::zeros((2, 3)), &cache).is_err());
    }
}
