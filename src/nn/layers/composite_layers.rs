//! Common sequences of layers run in a single call. Each one only chains the primitives and
//! keeps all of their caches.
use ndarray::{Ix2, Ix4};
use crate::nn::layers::activation::relu_layer::{ReluCache, ReluLayer};
use crate::nn::layers::affine_layer::{AffineCache, AffineGrads, AffineLayer};
use crate::nn::layers::filtering::convolution::{ConvolutionCache, ConvolutionConfig, ConvolutionGrads, ConvolutionLayer};
use crate::nn::layers::filtering::max_pool::{MaxPoolCache, MaxPoolConfig, MaxPoolLayer};
use crate::nn::layers::nn_layer::{LayerOps, LayerOutput, LayerResult};
use crate::utils::{Array1F, Array2F, Array4F, ArrayDynF, GenericResult};

#[derive(Clone, Debug)]
pub struct AffineReluCache {
    pub affine: AffineCache,
    pub relu: ReluCache,
}

#[derive(Clone, Debug)]
pub struct ConvReluPoolCache {
    pub conv: ConvolutionCache,
    pub relu: ReluCache,
    pub pool: MaxPoolCache,
}

/// Affine layer followed by a ReLU.
pub fn affine_relu_forward(inputs: &ArrayDynF, weights: &Array2F, biases: &Array1F) -> LayerResult<Ix2, AffineReluCache> {
    let LayerOutput(affine_out, affine) = AffineLayer::forward(inputs, weights, biases)?;
    let LayerOutput(relu_out, relu) = ReluLayer::forward(&affine_out.into_dyn(), &())?;
    Ok(LayerOutput(relu_out.into_dimensionality()?, AffineReluCache { affine, relu }))
}

pub fn affine_relu_backward(grad: &Array2F, cache: &AffineReluCache) -> GenericResult<AffineGrads> {
    let relu_grad = ReluLayer::backward(&grad.clone().into_dyn(), &cache.relu)?;
    AffineLayer::backward(&relu_grad.into_dimensionality()?, &cache.affine)
}

/// Convolution, ReLU and max pooling.
pub fn conv_relu_pool_forward(inputs: &Array4F, kernel: &Array4F, biases: &Array1F, conv_config: &ConvolutionConfig,
                              pool_config: &MaxPoolConfig) -> LayerResult<Ix4, ConvReluPoolCache> {
    let LayerOutput(conv_out, conv) = ConvolutionLayer::forward(inputs, kernel, biases, conv_config)?;
    let LayerOutput(relu_out, relu) = ReluLayer::forward(&conv_out.into_dyn(), &())?;
    let LayerOutput(pool_out, pool) = MaxPoolLayer::forward(&relu_out.into_dimensionality()?, pool_config)?;
    Ok(LayerOutput(pool_out, ConvReluPoolCache { conv, relu, pool }))
}

pub fn conv_relu_pool_backward(grad: &Array4F, cache: &ConvReluPoolCache) -> GenericResult<ConvolutionGrads> {
    let pool_grad = MaxPoolLayer::backward(grad, &cache.pool)?;
    let relu_grad = ReluLayer::backward(&pool_grad.into_dyn(), &cache.relu)?;
    ConvolutionLayer::backward(&relu_grad.into_dimensionality()?, &cache.conv)
}
