use ndarray::{ArrayView3, Axis, Ix4, s};
use crate::nn::layers::filtering::convolution::{ConvolutionCache, ConvolutionConfig, get_output_shape};
use crate::nn::layers::filtering::pad4d;
use crate::nn::layers::nn_layer::{LayerOutput, LayerResult};
use crate::utils::{Array1F, Array4F, F};

/// Slides every filter over the padded inputs. The shapes and the config are checked before
/// anything is allocated.
pub fn forward(inputs: &Array4F, kernel: &Array4F, biases: &Array1F,
               layer_config: &ConvolutionConfig) -> LayerResult<Ix4, ConvolutionCache> {
    let [batch, out_channels, new_height, new_width] = get_output_shape(inputs, kernel, biases, layer_config)?;
    log::trace!("convolution forward: inputs {:?}, kernel {:?}, {:?}", inputs.shape(), kernel.shape(), layer_config);

    let padded = pad4d(inputs, layer_config.padding);

    let result = Array4F::from_shape_fn((batch, out_channels, new_height, new_width), |(b, f, h, w)| {
        apply_conv_filter(&padded.index_axis(Axis(0), b), &kernel.index_axis(Axis(0), f),
                          layer_config.stride, h, w) + biases[f]
    });

    Ok(LayerOutput(result, ConvolutionCache {
        inputs: inputs.clone(),
        kernel: kernel.clone(),
        biases: biases.clone(),
        config: layer_config.clone(),
    }))
}

/// Sum of the product between one filter and the window of `inputs` (all channels) at output
/// position (h, w).
fn apply_conv_filter(inputs: &ArrayView3<F>, filter: &ArrayView3<F>, stride: usize, h: usize, w: usize) -> F {
    let (_, kernel_height, kernel_width) = filter.dim();
    let h_offset = h * stride;
    let w_offset = w * stride;
    let area = inputs.slice(s![
        ..,
        h_offset..(h_offset + kernel_height),
        w_offset..(w_offset + kernel_width)
    ]);
    (&area * filter).sum()
}
