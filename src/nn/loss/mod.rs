pub mod loss_func;
pub mod svm_loss;
pub mod softmax_loss;
