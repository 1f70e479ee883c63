use ndarray::{Ix4, s};
use crate::nn::layers::filtering::max_pool::{get_output_shape, MaxPoolCache, MaxPoolConfig, window_argmax};
use crate::nn::layers::nn_layer::{LayerOutput, LayerResult};
use crate::utils::Array4F;

pub fn forward(inputs: &Array4F, layer_config: &MaxPoolConfig) -> LayerResult<Ix4, MaxPoolCache> {
    let [batch_size, channels, new_height, new_width] = get_output_shape(inputs, layer_config)?;
    log::trace!("max pool forward: inputs {:?}, {:?}", inputs.shape(), layer_config);

    let pool_height = layer_config.pool_height;
    let pool_width = layer_config.pool_width;
    let stride = layer_config.stride;

    let result = Array4F::from_shape_fn((batch_size, channels, new_height, new_width), |(b, c, h, w)| {
        let h_offset = h * stride;
        let w_offset = w * stride;
        let area = inputs.slice(s![b, c, h_offset..(h_offset + pool_height), w_offset..(w_offset + pool_width)]);
        window_argmax(&area).1
    });

    Ok(LayerOutput(result, MaxPoolCache {
        inputs: inputs.clone(),
        config: layer_config.clone(),
    }))
}
