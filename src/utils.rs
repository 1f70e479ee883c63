use ndarray::{Array, Array1, Array2, Array3, Array4, azip, Dimension, IxDyn};
use crate::nn::errors::LayerError;

pub type F = f64;
pub type ArrayF<D> = Array<F, D>;
pub type Array1F = Array1<F>;
pub type Array2F = Array2<F>;
pub type Array3F = Array3<F>;
pub type Array4F = Array4<F>;
pub type ArrayDynF = Array<F, IxDyn>;

pub type GenericResult<T> = anyhow::Result<T>;

pub fn arrays_almost_equal<D: Dimension>(arr1: &ArrayF<D>, arr2: &ArrayF<D>) -> bool {
    arr1.shape() == arr2.shape() && azip!(arr1, arr2).all(|a, b| (a - b).abs() < 0.00001)
}

/// Number of window positions along one axis: `(size + 2 * padding - window) / stride + 1`.
/// Fails unless the window tiles the padded axis exactly and yields at least one position.
pub fn get_dims_after_filter(size: usize, window: usize, stride: usize, padding: usize) -> GenericResult<usize> {
    if stride == 0 {
        return Err(LayerError::InvalidConfig("stride must be at least 1".to_owned()).into());
    }

    let padded = size + 2 * padding;
    if window == 0 || window > padded {
        return Err(LayerError::InvalidConfig(
            format!("window of {} doesn't fit in axis of {} (padding {})", window, size, padding)
        ).into());
    }

    let span = padded - window;
    if span % stride != 0 {
        return Err(LayerError::InvalidConfig(
            format!("stride {} doesn't evenly divide ({} + 2 * {} - {})", stride, size, padding, window)
        ).into());
    }

    Ok(span / stride + 1)
}

/// Output shape of a windowed operation over the last 2 dimensions of a 4D array.
pub fn get_dims_after_filter_4(shape: &[usize], height: usize, width: usize, stride: usize,
                               padding: usize) -> GenericResult<[usize; 4]> {
    let [batch, channels, h, w]: [usize; 4] = shape.try_into()
        .map_err(|_| LayerError::ShapeMismatch(format!("expected a 4D array, got {:?}", shape)))?;
    Ok([
        batch,
        channels,
        get_dims_after_filter(h, height, stride, padding)?,
        get_dims_after_filter(w, width, stride, padding)?,
    ])
}
