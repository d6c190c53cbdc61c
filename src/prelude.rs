pub use serde::{Deserialize, Serialize};

pub use ndarray::*;
pub use ndarray_rand::rand_distr::StandardNormal;
pub use ndarray_rand::RandomExt;

pub use crate::error::*;
pub use crate::models::{Network, NetworkBuilder, NetworkConfig};

// Internal re-exports
pub use crate::core::{
    Activation,
    Dense,
    ForwardCache,
    Gradients,
    LayerTrait,
};
