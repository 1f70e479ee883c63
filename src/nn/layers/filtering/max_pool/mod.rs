mod max_pool_forward;
mod max_pool_backward;

use ndarray::{ArrayView2, Ix4};
use serde::{Deserialize, Serialize};
use crate::nn::errors::LayerError;
use crate::nn::layers::nn_layer::{LayerOps, LayerResult};
use crate::utils::{Array4F, F, GenericResult, get_dims_after_filter_4};

pub use max_pool_forward::forward;
pub use max_pool_backward::backward;

/// Window size and stride of a max pooling layer. There is no padding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxPoolConfig {
    pool_height: usize,
    pool_width: usize,
    stride: usize,
}

impl MaxPoolConfig {
    pub fn new(pool_height: usize, pool_width: usize, stride: usize) -> GenericResult<Self> {
        let config = Self { pool_height, pool_width, stride };
        config.validate()?;
        Ok(config)
    }

    /// Square windows, `size` by `size`.
    pub fn square(size: usize, stride: usize) -> GenericResult<Self> {
        Self::new(size, size, stride)
    }

    pub fn pool_height(&self) -> usize {
        self.pool_height
    }

    pub fn pool_width(&self) -> usize {
        self.pool_width
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn validate(&self) -> Result<(), LayerError> {
        if self.pool_height == 0 || self.pool_width == 0 || self.stride == 0 {
            return Err(LayerError::InvalidConfig(format!("max pool sizes and stride must be at least 1, got {:?}", self)));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct MaxPoolCache {
    pub inputs: Array4F,
    pub config: MaxPoolConfig,
}

/// Keeps the largest value of every window, separately for each channel. The gradient only
/// flows back to the position that was picked.
pub struct MaxPoolLayer;

impl LayerOps<MaxPoolConfig> for MaxPoolLayer {
    type Dim = Ix4;
    type Cache = MaxPoolCache;

    fn forward(inputs: &Array4F, layer_config: &MaxPoolConfig) -> LayerResult<Ix4, MaxPoolCache> {
        forward(inputs, layer_config)
    }

    fn backward(grad: &Array4F, cache: &MaxPoolCache) -> GenericResult<Array4F> {
        backward(grad, cache)
    }
}

fn get_output_shape(inputs: &Array4F, layer_config: &MaxPoolConfig) -> GenericResult<[usize; 4]> {
    layer_config.validate()?;
    get_dims_after_filter_4(inputs.shape(), layer_config.pool_height, layer_config.pool_width, layer_config.stride, 0)
}

/// Position and value of the maximum of a non-empty window, scanning in row-major order. The
/// first maximum wins ties, and the first NaN wins over any number, so forward and backward
/// always pick the same position.
fn window_argmax(area: &ArrayView2<F>) -> ((usize, usize), F) {
    area.indexed_iter().fold(((0, 0), area[(0, 0)]), |accum, (index, &value)| {
        if (value.is_nan() && !accum.1.is_nan()) || value > accum.1 { (index, value) } else { accum }
    })
}
