use ndarray::Dimension;
use crate::utils::{ArrayF, GenericResult};

/// Output of a forward pass: the layer result and whatever the matching backward pass needs.
/// The cache is owned by the caller, who must hand it back unmodified to **backward**.
#[derive(Clone, Debug)]
pub struct LayerOutput<D: Dimension, C>(pub ArrayF<D>, pub C);

pub type LayerResult<D, C> = GenericResult<LayerOutput<D, C>>;

/// Common shape of the layers that transform a single array without trainable parameters.
/// Parametric layers (affine, convolution) expose inherent functions instead, since their
/// backward pass also returns parameter gradients.
pub trait LayerOps<T> {
    type Dim: Dimension;
    type Cache;

    fn forward(inputs: &ArrayF<Self::Dim>, layer_config: &T) -> LayerResult<Self::Dim, Self::Cache>;

    fn backward(grad: &ArrayF<Self::Dim>, cache: &Self::Cache) -> GenericResult<ArrayF<Self::Dim>>;
}
