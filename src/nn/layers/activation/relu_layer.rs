use ndarray::{IxDyn, Zip};
use crate::nn::errors::ensure_shape;
use crate::nn::layers::nn_layer::{LayerOps, LayerOutput, LayerResult};
use crate::utils::{ArrayDynF, GenericResult};

/// Rectified Linear Unit. That means:
/// * For x > 0: x
/// * For x <= 0: 0
pub struct ReluLayer;

/// The forward inputs. Backward only lets the gradient through where they were strictly positive.
#[derive(Clone, Debug)]
pub struct ReluCache(pub ArrayDynF);

impl LayerOps<()> for ReluLayer {
    type Dim = IxDyn;
    type Cache = ReluCache;

    fn forward(inputs: &ArrayDynF, _: &()) -> LayerResult<IxDyn, ReluCache> {
        log::trace!("relu forward: {:?}", inputs.shape());
        let result = inputs.mapv(|o| if o > 0.0 { o } else { 0.0 });
        Ok(LayerOutput(result, ReluCache(inputs.clone())))
    }

    fn backward(grad: &ArrayDynF, cache: &ReluCache) -> GenericResult<ArrayDynF> {
        let ReluCache(inputs) = cache;
        ensure_shape(grad.shape() == inputs.shape(), || format!(
            "relu gradient {:?} doesn't match inputs {:?}", grad.shape(), inputs.shape()
        ))?;

        Ok(Zip::from(grad).and(inputs).map_collect(|&g, &i| if i > 0.0 { g } else { 0.0 }))
    }
}
