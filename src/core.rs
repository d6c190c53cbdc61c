// src/core.rs
pub mod activations;
pub mod cache;
pub mod layers;

// Re-export commonly used items
pub use activations::{relu, relu_gradient, softmax, Activation};
pub use cache::{ForwardCache, Gradients};
pub use layers::{Dense, LayerTrait};
