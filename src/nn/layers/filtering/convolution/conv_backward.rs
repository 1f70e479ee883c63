use ndarray::{Axis, s};
use crate::nn::errors::ensure_shape;
use crate::nn::layers::filtering::convolution::{ConvolutionCache, ConvolutionGrads, get_output_shape};
use crate::nn::layers::filtering::{pad4d, remove_padding_4d};
use crate::utils::{Array1F, Array4F, GenericResult};

/// Walks the same windows as the forward pass. For every output position, the filter scaled
/// by the upstream gradient is added to the padded inputs' gradient, the inputs window scaled
/// by the upstream gradient is added to that filter's gradient, and the upstream gradient
/// itself goes to the filter's bias. Windows overlap when the stride is smaller than the
/// kernel, so everything accumulates.
pub fn backward(grad: &Array4F, cache: &ConvolutionCache) -> GenericResult<ConvolutionGrads> {
    let ConvolutionCache { inputs, kernel, biases, config } = cache;
    let out_shape = get_output_shape(inputs, kernel, biases, config)?;
    ensure_shape(grad.shape() == &out_shape[..], || format!(
        "convolution gradient {:?} doesn't match output {:?}", grad.shape(), out_shape
    ))?;
    log::trace!("convolution backward: grad {:?}", grad.shape());

    let [batch, out_channels, new_height, new_width] = out_shape;
    let (_, _, kernel_height, kernel_width) = kernel.dim();
    let stride = config.stride();

    let padded = pad4d(inputs, config.padding());
    let mut padded_inputs_grad = Array4F::zeros(padded.raw_dim());
    let mut kernel_grad = Array4F::zeros(kernel.raw_dim());
    let mut biases_grad = Array1F::zeros(out_channels);

    for b in 0..batch {
        for f in 0..out_channels {
            let filter = kernel.index_axis(Axis(0), f);
            for h in 0..new_height {
                for w in 0..new_width {
                    let h_offset = h * stride;
                    let w_offset = w * stride;
                    let current = grad[(b, f, h, w)];

                    padded_inputs_grad.slice_mut(s![
                        b,
                        ..,
                        h_offset..(h_offset + kernel_height),
                        w_offset..(w_offset + kernel_width)
                    ]).scaled_add(current, &filter);

                    let area = padded.slice(s![
                        b,
                        ..,
                        h_offset..(h_offset + kernel_height),
                        w_offset..(w_offset + kernel_width)
                    ]);
                    kernel_grad.index_axis_mut(Axis(0), f).scaled_add(current, &area);

                    biases_grad[f] += current;
                }
            }
        }
    }

    Ok(ConvolutionGrads {
        inputs: remove_padding_4d(padded_inputs_grad, config.padding()),
        kernel: kernel_grad,
        biases: biases_grad,
    })
}

#[cfg(test)]
mod tests {
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Normal;
    use ndarray_rand::RandomExt;
    use crate::nn::gradient_check::{DEFAULT_STEP, eval_numerical_gradient_array, scaled_error};
    use crate::nn::layers::filtering::convolution::{ConvolutionConfig, forward};
    use crate::nn::layers::filtering::convolution::test_values::*;
    use crate::nn::layers::nn_layer::LayerOutput;
    use crate::utils::arrays_almost_equal;
    use super::*;

    #[test]
    fn test_backward() {
        let LayerOutput(result, cache) = forward(&get_inputs(), &get_kernels(), &get_biases(), &get_config()).unwrap();
        let grad = result * -2.0;

        let grads = backward(&grad, &cache).unwrap();
        assert!(arrays_almost_equal(&grads.inputs, &get_backward_result()));
        assert!(arrays_almost_equal(&grads.kernel, &get_kernels_grad()));
        assert!(arrays_almost_equal(&grads.biases, &get_biases_grad()));
    }

    #[test]
    fn test_backward_matches_numerical() {
        let mut rng = StdRng::seed_from_u64(231);
        let dist = Normal::new(0.0, 1.0).unwrap();
        let inputs = Array4F::random_using((4, 3, 5, 5), dist, &mut rng);
        let kernel = Array4F::random_using((2, 3, 3, 3), dist, &mut rng);
        let biases = Array1F::random_using(2, dist, &mut rng);
        let grad = Array4F::random_using((4, 2, 5, 5), dist, &mut rng);
        let config = ConvolutionConfig::new(1, 1).unwrap();

        let LayerOutput(_, cache) = forward(&inputs, &kernel, &biases, &config).unwrap();
        let grads = backward(&grad, &cache).unwrap();

        let num_inputs = eval_numerical_gradient_array(
            |x| forward(x, &kernel, &biases, &config).unwrap().0, &inputs, &grad, DEFAULT_STEP);
        let num_kernel = eval_numerical_gradient_array(
            |k| forward(&inputs, k, &biases, &config).unwrap().0, &kernel, &grad, DEFAULT_STEP);
        let num_biases = eval_numerical_gradient_array(
            |b| forward(&inputs, &kernel, b, &config).unwrap().0, &biases, &grad, DEFAULT_STEP);

        assert_eq!(grads.inputs.shape(), inputs.shape());
        assert!(scaled_error(&grads.inputs, &num_inputs) < 1e-8);
        assert!(scaled_error(&grads.kernel, &num_kernel) < 1e-8);
        assert!(scaled_error(&grads.biases, &num_biases) < 1e-8);
    }

    #[test]
    fn test_backward_overlapping_windows_accumulate() {
        // 2x2 ones kernel with stride 1 over 3x3 inputs: the center is covered by all 4 windows
        let inputs = Array4F::zeros((1, 1, 3, 3));
        let kernel = Array4F::ones((1, 1, 2, 2));
        let config = ConvolutionConfig::new(1, 0).unwrap();
        let LayerOutput(result, cache) = forward(&inputs, &kernel, &Array1F::zeros(1), &config).unwrap();

        let grads = backward(&Array4F::ones(result.raw_dim()), &cache).unwrap();
        let expected = Array4F::from_shape_vec((1, 1, 3, 3), vec![
            1.0, 2.0, 1.0,
            2.0, 4.0, 2.0,
            1.0, 2.0, 1.0,
        ]).unwrap();
        assert_eq!(grads.inputs, expected);
        assert_eq!(grads.biases, Array1F::from_elem(1, 4.0));
    }

    #[test]
    fn test_backward_with_padding_matches_numerical() {
        let (inputs, kernel, biases, config) = get_linspace_case();
        let LayerOutput(result, cache) = forward(&inputs, &kernel, &biases, &config).unwrap();
        let grad = Array4F::ones(result.raw_dim());

        let grads = backward(&grad, &cache).unwrap();
        let num_inputs = eval_numerical_gradient_array(
            |x| forward(x, &kernel, &biases, &config).unwrap().0, &inputs, &grad, DEFAULT_STEP);
        assert!(scaled_error(&grads.inputs, &num_inputs) < 1e-8);
        // With an all ones gradient, each bias collects one unit per output position
        assert_eq!(grads.biases, Array1F::from_elem(2, 8.0));
    }

    #[test]
    fn test_backward_rejects_bad_grad() {
        let LayerOutput(_, cache) = forward(&get_inputs(), &get_kernels(), &get_biases(), &get_config()).unwrap();
        assert!(backward(&Array4F::zeros((1, 3, 3, 3)), &cache).is_err());
    }
}
