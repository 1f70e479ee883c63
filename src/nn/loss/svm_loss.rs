use std::iter::zip;
use crate::nn::loss::loss_func::{LossFuncOps, LossOutput, validate_labels};
use crate::utils::{Array2F, F, GenericResult};

/// Multiclass hinge loss with a margin of 1. Every wrong class scoring within 1 of the correct
/// class adds the difference to the loss.
pub struct SvmLoss;

impl LossFuncOps for SvmLoss {
    fn calc_loss(scores: &Array2F, labels: &[usize]) -> GenericResult<LossOutput> {
        validate_labels(scores, labels)?;
        log::trace!("svm loss: scores {:?}", scores.shape());

        let batch = scores.nrows() as F;
        let mut grad = Array2F::zeros(scores.raw_dim());
        let mut loss = 0.0;

        for ((row, mut grad_row), &label) in zip(scores.outer_iter(), grad.outer_iter_mut()).zip(labels) {
            let correct = row[label];
            let mut positive = 0.0;
            for (j, &score) in row.iter().enumerate() {
                if j == label {
                    continue;
                }
                let margin = score - correct + 1.0;
                if margin > 0.0 {
                    loss += margin;
                    grad_row[j] = 1.0 / batch;
                    positive += 1.0;
                }
            }
            grad_row[label] = -positive / batch;
        }

        Ok(LossOutput { loss: loss / batch, grad })
    }
}
