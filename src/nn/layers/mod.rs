pub mod nn_layer;
pub mod affine_layer;
pub mod activation;
pub mod dropout_layer;
pub mod filtering;
pub mod composite_layers;
