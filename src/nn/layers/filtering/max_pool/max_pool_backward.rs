use ndarray::s;
use crate::nn::errors::ensure_shape;
use crate::nn::layers::filtering::max_pool::{get_output_shape, MaxPoolCache, window_argmax};
use crate::utils::{Array4F, GenericResult};

/// Routes each upstream value to the position of its window's maximum. The windows are scanned
/// in row-major order and the first maximum wins ties. Overlapping windows add up.
pub fn backward(grad: &Array4F, cache: &MaxPoolCache) -> GenericResult<Array4F> {
    let MaxPoolCache { inputs, config } = cache;
    let out_shape = get_output_shape(inputs, config)?;
    ensure_shape(grad.shape() == &out_shape[..], || format!(
        "max pool gradient {:?} doesn't match output {:?}", grad.shape(), out_shape
    ))?;
    log::trace!("max pool backward: grad {:?}", grad.shape());

    let [_, _, new_height, new_width] = out_shape;
    let pool_height = config.pool_height;
    let pool_width = config.pool_width;
    let stride = config.stride;

    let mut result = Array4F::zeros(inputs.raw_dim());

    inputs.outer_iter().enumerate().for_each(|(b, batch)| {
        batch.outer_iter().enumerate().for_each(|(c, channel)| {
            for h in 0..new_height {
                for w in 0..new_width {
                    let h_offset = h * stride;
                    let w_offset = w * stride;
                    let area = channel.slice(s![h_offset..(h_offset + pool_height), w_offset..(w_offset + pool_width)]);
                    let ((arg_h, arg_w), _) = window_argmax(&area);
                    result[(b, c, h_offset + arg_h, w_offset + arg_w)] += grad[(b, c, h, w)];
                }
            }
        })
    });

    Ok(result)
}
