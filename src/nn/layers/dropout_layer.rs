use ndarray::IxDyn;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use crate::nn::errors::{ensure_shape, LayerError};
use crate::nn::layers::nn_layer::{LayerOutput, LayerResult};
use crate::utils::{ArrayDynF, F, GenericResult};

/// Randomly nullifies inputs while training, scaling the survivors by `1 / keep` (inverted
/// dropout) so the expected activation is the same in both modes.
pub struct DropoutLayer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropoutMode {
    Train,
    Test,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropoutConfig {
    keep: F,
    mode: DropoutMode,
    #[serde(default)]
    seed: Option<u64>,
}

impl DropoutConfig {
    /// `keep` is the probability of keeping each value, in (0, 1].
    pub fn new(keep: F, mode: DropoutMode) -> GenericResult<Self> {
        let config = Self { keep, mode, seed: None };
        config.validate()?;
        Ok(config)
    }

    /// Reseeds the generator passed to **forward** before every mask is drawn. Only meant for
    /// gradient checking, since every call will then draw the same mask.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The same configuration in another mode. The training loop switches this between epochs
    /// and evaluation.
    pub fn with_mode(mut self, mode: DropoutMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn keep(&self) -> F {
        self.keep
    }

    pub fn mode(&self) -> DropoutMode {
        self.mode
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn validate(&self) -> Result<(), LayerError> {
        if self.keep > 0.0 && self.keep <= 1.0 {
            Ok(())
        } else {
            Err(LayerError::InvalidConfig(format!("dropout keep probability must be in (0, 1], got {}", self.keep)))
        }
    }
}

/// Config used for the forward pass and the mask, if one was drawn (only in train mode).
#[derive(Clone, Debug)]
pub struct DropoutCache {
    pub config: DropoutConfig,
    pub mask: Option<ArrayDynF>,
}

impl DropoutLayer {
    /// In train mode, draws a mask from `rng` where each value is `1 / keep` with probability
    /// `keep` and 0 otherwise, and multiplies it into the inputs. In test mode the inputs pass
    /// through unchanged.
    ///
    /// If the config has a seed, `rng` is reseeded with it first. That replaces the caller's
    /// generator state, so anything else drawing from the same generator afterwards sees the
    /// seeded sequence too.
    pub fn forward(inputs: &ArrayDynF, layer_config: &DropoutConfig, rng: &mut StdRng) -> LayerResult<IxDyn, DropoutCache> {
        layer_config.validate()?;
        log::trace!("dropout forward: {:?} {:?}", inputs.shape(), layer_config.mode);

        match layer_config.mode {
            DropoutMode::Train => {
                if let Some(seed) = layer_config.seed {
                    log::debug!("Reseeding dropout generator with {}", seed);
                    *rng = StdRng::seed_from_u64(seed);
                }

                let keep = layer_config.keep;
                let dist = Uniform::new(0.0, 1.0);
                let mask = ArrayDynF::random_using(inputs.raw_dim(), dist, rng)
                    .mapv_into(|o| if o < keep { 1.0 / keep } else { 0.0 });

                let result = inputs * &mask;
                Ok(LayerOutput(result, DropoutCache { config: layer_config.clone(), mask: Some(mask) }))
            }
            DropoutMode::Test => {
                Ok(LayerOutput(inputs.clone(), DropoutCache { config: layer_config.clone(), mask: None }))
            }
        }
    }

    pub fn backward(grad: &ArrayDynF, cache: &DropoutCache) -> GenericResult<ArrayDynF> {
        match (&cache.config.mode, &cache.mask) {
            (DropoutMode::Train, Some(mask)) => {
                ensure_shape(grad.shape() == mask.shape(), || format!(
                    "dropout gradient {:?} doesn't match mask {:?}", grad.shape(), mask.shape()
                ))?;
                Ok(grad * mask)
            }
            (DropoutMode::Train, None) => {
                Err(LayerError::ShapeMismatch("train mode dropout cache has no mask".to_owned()).into())
            }
            (DropoutMode::Test, _) => Ok(grad.clone()),
        }
    }
}
