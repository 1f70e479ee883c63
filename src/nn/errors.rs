use std::fmt::{Display, Formatter};

/// Failures a layer reports back to its caller. Every layer checks its arguments before
/// allocating any output, so an error never comes with a partial result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerError {
    /// Hyperparameters that can't work for the given input, like a stride that doesn't tile
    /// the padded input exactly or a keep probability outside (0, 1].
    InvalidConfig(String),

    /// Arrays whose shapes don't agree with each other or with the cache they are paired with.
    ShapeMismatch(String),

    /// A label that isn't a valid class index for the scores matrix.
    LabelOutOfRange { index: usize, label: usize, classes: usize },
}

impl Display for LayerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerError::InvalidConfig(message) => write!(f, "Invalid layer configuration: {}", message),
            LayerError::ShapeMismatch(message) => write!(f, "Shape mismatch: {}", message),
            LayerError::LabelOutOfRange { index, label, classes } => write!(
                f, "Label {} at index {} is out of range for {} classes", label, index, classes
            ),
        }
    }
}

impl std::error::Error for LayerError {}

/// Shorthand for failing with [LayerError::ShapeMismatch] unless `condition` holds.
pub(crate) fn ensure_shape(condition: bool, message: impl FnOnce() -> String) -> Result<(), LayerError> {
    if condition {
        Ok(())
    } else {
        Err(LayerError::ShapeMismatch(message()))
    }
}
