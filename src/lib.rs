//! Forward and backward kernels for a handful of neural network layers (affine, ReLU, inverted
//! dropout, 2D convolution, 2D max pooling) and two classification losses (multiclass SVM and
//! softmax cross-entropy).
//!
//! Every layer is a pair of pure functions: **forward** returns its output together with a
//! cache, and **backward** takes the upstream gradient plus that cache and returns the
//! gradients for every forward input. Training loops, optimizers and model assembly are left
//! to the caller.

pub mod nn;
pub mod utils;

pub use utils::{Array1F, Array2F, Array4F, ArrayDynF, GenericResult};
