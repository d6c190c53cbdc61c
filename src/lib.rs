pub mod core;
pub mod error;
pub mod models;
pub mod persistence;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::core::{Activation, Dense, ForwardCache, Gradients, LayerTrait};
pub use error::{NNError, Result};
pub use models::{Network, NetworkBuilder, NetworkConfig};
