use std::iter::zip;
use crate::nn::loss::loss_func::{LossFuncOps, LossOutput, validate_labels};
use crate::utils::{Array2F, F, GenericResult};

/// Cross entropy between the softmax of the scores and the one-hot labels.
pub struct SoftmaxLoss;

/// Row-wise log of the softmax. Each row is shifted by its maximum first, so large logits
/// don't overflow.
fn log_softmax(scores: &Array2F) -> Array2F {
    let mut result = scores.clone();
    result.outer_iter_mut().for_each(|mut row| {
        let max = row.iter().copied().fold(F::NEG_INFINITY, F::max);
        row.mapv_inplace(|o| o - max);
        let log_sum = row.iter().map(|o| o.exp()).sum::<F>().ln();
        row.mapv_inplace(|o| o - log_sum);
    });
    result
}

impl LossFuncOps for SoftmaxLoss {
    fn calc_loss(scores: &Array2F, labels: &[usize]) -> GenericResult<LossOutput> {
        validate_labels(scores, labels)?;
        log::trace!("softmax loss: scores {:?}", scores.shape());

        let batch = scores.nrows() as F;
        let log_probs = log_softmax(scores);
        let loss = -zip(log_probs.outer_iter(), labels)
            .map(|(row, &label)| row[label])
            .sum::<F>() / batch;

        let mut grad = log_probs.mapv(F::exp);
        zip(grad.outer_iter_mut(), labels).for_each(|(mut row, &label)| row[label] -= 1.0);
        grad /= batch;

        Ok(LossOutput { loss, grad })
    }
}
