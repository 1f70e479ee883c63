use ndarray::Ix4;
use serde::{Deserialize, Serialize};
use crate::nn::errors::{ensure_shape, LayerError};
use crate::nn::layers::nn_layer::LayerResult;
use crate::utils::{Array1F, Array4F, GenericResult, get_dims_after_filter_4};

mod conv_forward;
mod conv_backward;
mod conv_fast;

#[cfg(test)]
mod test_values;

pub use conv_forward::forward;
pub use conv_backward::backward;
pub use conv_fast::{backward_col2im, forward_im2col};

/// Stride and zero padding of a 2D convolution. The kernel size comes from the kernel array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvolutionConfig {
    stride: usize,
    #[serde(default)]
    padding: usize,
}

impl ConvolutionConfig {
    pub fn new(stride: usize, padding: usize) -> GenericResult<Self> {
        let config = Self { stride, padding };
        config.validate()?;
        Ok(config)
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn validate(&self) -> Result<(), LayerError> {
        if self.stride == 0 {
            return Err(LayerError::InvalidConfig("convolution stride must be at least 1".to_owned()));
        }
        Ok(())
    }
}

/// The unpadded inputs, kernel, biases and config of a forward pass. Padding is recomputed
/// by the backward pass.
#[derive(Clone, Debug)]
pub struct ConvolutionCache {
    pub inputs: Array4F,
    pub kernel: Array4F,
    pub biases: Array1F,
    pub config: ConvolutionConfig,
}

#[derive(Clone, Debug)]
pub struct ConvolutionGrads {
    pub inputs: Array4F,
    pub kernel: Array4F,
    pub biases: Array1F,
}

/// Apply the convolution operation with 2D filters. Inputs are `(batch, channels, height, width)`,
/// the kernel is `(filters, channels, kernel height, kernel width)` and the biases `(filters,)`.
/// Each output position is the sum of the product between a window of the padded inputs (over
/// every channel) and one filter, plus that filter's bias.
pub struct ConvolutionLayer;

impl ConvolutionLayer {
    pub fn forward(inputs: &Array4F, kernel: &Array4F, biases: &Array1F,
                   layer_config: &ConvolutionConfig) -> LayerResult<Ix4, ConvolutionCache> {
        forward(inputs, kernel, biases, layer_config)
    }

    pub fn backward(grad: &Array4F, cache: &ConvolutionCache) -> GenericResult<ConvolutionGrads> {
        backward(grad, cache)
    }
}

/// Checks that the inputs, kernel and biases agree with each other and that the kernel tiles
/// the padded inputs exactly. Returns the output shape.
fn get_output_shape(inputs: &Array4F, kernel: &Array4F, biases: &Array1F,
                    layer_config: &ConvolutionConfig) -> GenericResult<[usize; 4]> {
    layer_config.validate()?;

    let (out_channels, in_channels, kernel_height, kernel_width) = kernel.dim();
    ensure_shape(inputs.shape()[1] == in_channels, || format!(
        "inputs have {} channels but kernel {:?} expects {}", inputs.shape()[1], kernel.shape(), in_channels
    ))?;
    ensure_shape(biases.len() == out_channels, || format!(
        "{} biases for {} filters", biases.len(), out_channels
    ))?;

    let [batch, _, new_height, new_width] = get_dims_after_filter_4(
        inputs.shape(), kernel_height, kernel_width, layer_config.stride, layer_config.padding)?;
    Ok([batch, out_channels, new_height, new_width])
}
