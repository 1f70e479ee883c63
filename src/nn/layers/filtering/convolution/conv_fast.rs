use ndarray::{Axis, Ix4, s};
use crate::nn::errors::ensure_shape;
use crate::nn::layers::filtering::convolution::{ConvolutionCache, ConvolutionConfig, ConvolutionGrads, get_output_shape};
use crate::nn::layers::filtering::{pad4d, remove_padding_4d};
use crate::nn::layers::nn_layer::{LayerOutput, LayerResult};
use crate::utils::{Array1F, Array2F, Array4F, GenericResult};

/// Same result as [super::forward], computed as a single matrix product. Every window of the
/// padded inputs becomes a column, so the whole layer is `kernel (F, C*KH*KW) · columns`.
/// Produces the same cache as the naive version, so both backward passes accept it.
pub fn forward_im2col(inputs: &Array4F, kernel: &Array4F, biases: &Array1F,
                      layer_config: &ConvolutionConfig) -> LayerResult<Ix4, ConvolutionCache> {
    let [batch, out_channels, new_height, new_width] = get_output_shape(inputs, kernel, biases, layer_config)?;
    log::trace!("convolution forward (im2col): inputs {:?}, kernel {:?}, {:?}", inputs.shape(), kernel.shape(), layer_config);

    let (_, in_channels, kernel_height, kernel_width) = kernel.dim();
    let padded = pad4d(inputs, layer_config.padding);
    let cols = im2col(&padded, kernel_height, kernel_width, layer_config.stride, new_height, new_width);
    log::debug!("im2col columns: {:?}", cols.shape());

    let kernel_2d = kernel.to_shape((out_channels, in_channels * kernel_height * kernel_width))?;
    let product = kernel_2d.dot(&cols).into_shape((out_channels, batch, new_height, new_width))?;

    let mut result = Array4F::zeros((batch, out_channels, new_height, new_width));
    result.assign(&product.permuted_axes([1, 0, 2, 3]));
    result += &biases.view().into_shape((1, out_channels, 1, 1))?;

    Ok(LayerOutput(result, ConvolutionCache {
        inputs: inputs.clone(),
        kernel: kernel.clone(),
        biases: biases.clone(),
        config: layer_config.clone(),
    }))
}

/// Same result as [super::backward]. The columns are rebuilt from the cached inputs, the
/// gradients are computed as matrix products and the columns' gradient is scattered back onto
/// the padded inputs, adding where windows overlap.
pub fn backward_col2im(grad: &Array4F, cache: &ConvolutionCache) -> GenericResult<ConvolutionGrads> {
    let ConvolutionCache { inputs, kernel, biases, config } = cache;
    let out_shape = get_output_shape(inputs, kernel, biases, config)?;
    ensure_shape(grad.shape() == &out_shape[..], || format!(
        "convolution gradient {:?} doesn't match output {:?}", grad.shape(), out_shape
    ))?;
    log::trace!("convolution backward (col2im): grad {:?}", grad.shape());

    let [batch, out_channels, new_height, new_width] = out_shape;
    let (_, in_channels, kernel_height, kernel_width) = kernel.dim();
    let stride = config.stride;
    let window_size = in_channels * kernel_height * kernel_width;

    let padded = pad4d(inputs, config.padding);
    let cols = im2col(&padded, kernel_height, kernel_width, stride, new_height, new_width);

    // (F, N, OH, OW) flattened, matching the columns' order
    let grad_t = grad.view().permuted_axes([1, 0, 2, 3]);
    let grad_2d = grad_t.to_shape((out_channels, batch * new_height * new_width))?;
    let kernel_2d = kernel.to_shape((out_channels, window_size))?;

    let kernel_grad = grad_2d.dot(&cols.t())
        .into_shape((out_channels, in_channels, kernel_height, kernel_width))?;
    let biases_grad = grad.sum_axis(Axis(3)).sum_axis(Axis(2)).sum_axis(Axis(0));

    let cols_grad = kernel_2d.t().dot(&grad_2d);
    let mut padded_inputs_grad = Array4F::zeros(padded.raw_dim());
    for b in 0..batch {
        for h in 0..new_height {
            for w in 0..new_width {
                let col = (b * new_height + h) * new_width + w;
                let h_offset = h * stride;
                let w_offset = w * stride;
                let mut area = padded_inputs_grad.slice_mut(s![
                    b,
                    ..,
                    h_offset..(h_offset + kernel_height),
                    w_offset..(w_offset + kernel_width)
                ]);
                area.iter_mut()
                    .zip(cols_grad.column(col))
                    .for_each(|(dest, value)| *dest += *value);
            }
        }
    }

    Ok(ConvolutionGrads {
        inputs: remove_padding_4d(padded_inputs_grad, config.padding),
        kernel: kernel_grad,
        biases: biases_grad,
    })
}

/// Lays out every `(C, KH, KW)` window of `padded` as a column of a `(C*KH*KW, N*OH*OW)` matrix.
/// Column `(b * OH + h) * OW + w` holds the window of output position (h, w) of sample b.
fn im2col(padded: &Array4F, kernel_height: usize, kernel_width: usize, stride: usize,
          new_height: usize, new_width: usize) -> Array2F {
    let (batch, channels, _, _) = padded.dim();
    let mut cols = Array2F::zeros((channels * kernel_height * kernel_width, batch * new_height * new_width));

    for b in 0..batch {
        for h in 0..new_height {
            for w in 0..new_width {
                let col = (b * new_height + h) * new_width + w;
                let h_offset = h * stride;
                let w_offset = w * stride;
                let area = padded.slice(s![
                    b,
                    ..,
                    h_offset..(h_offset + kernel_height),
                    w_offset..(w_offset + kernel_width)
                ]);
                cols.column_mut(col).iter_mut()
                    .zip(area.iter())
                    .for_each(|(dest, value)| *dest = *value);
            }
        }
    }
    cols
}
