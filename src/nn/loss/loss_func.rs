use serde::{Deserialize, Serialize};
use crate::nn::errors::{ensure_shape, LayerError};
use crate::nn::loss::softmax_loss::SoftmaxLoss;
use crate::nn::loss::svm_loss::SvmLoss;
use crate::utils::{Array2F, F, GenericResult};

/// Scalar loss averaged over the batch, and its gradient with respect to the scores.
#[derive(Clone, Debug)]
pub struct LossOutput {
    pub loss: F,
    pub grad: Array2F,
}

/// A classification loss over a `(N, C)` matrix of scores and `N` labels in `[0, C)`.
pub trait LossFuncOps {
    fn calc_loss(scores: &Array2F, labels: &[usize]) -> GenericResult<LossOutput>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossFunc {
    Svm,
    Softmax,
}

pub fn calc_loss(loss_func: &LossFunc, scores: &Array2F, labels: &[usize]) -> GenericResult<LossOutput> {
    use LossFunc::*;
    match loss_func {
        Svm => SvmLoss::calc_loss(scores, labels),
        Softmax => SoftmaxLoss::calc_loss(scores, labels),
    }
}

/// Checks there is one label per row, at least one row, and that every label is a column of `scores`.
pub(crate) fn validate_labels(scores: &Array2F, labels: &[usize]) -> Result<(), LayerError> {
    let (batch, classes) = scores.dim();
    ensure_shape(batch > 0, || "scores have no rows".to_owned())?;
    ensure_shape(labels.len() == batch, || format!(
        "{} labels for {} rows of scores", labels.len(), batch
    ))?;

    match labels.iter().enumerate().find(|(_, &label)| label >= classes) {
        Some((index, &label)) => Err(LayerError::LabelOutOfRange { index, label, classes }),
        None => Ok(()),
    }
}
