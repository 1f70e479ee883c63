pub mod layers;
pub mod loss;
pub mod errors;
pub mod gradient_check;
