use crate::prelude::*;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Softmax,
}

impl Activation {
    pub fn forward(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Self::Relu => relu(z),
            Self::Softmax => softmax(z),
        }
    }

    /// Multiplies the back-propagated error `da` by this activation's local
    /// derivative. Only defined for hidden layers; the output layer's error
    /// arrives already combined with the softmax derivative.
    pub fn backward(&self, z: &Array2<f64>, da: Array2<f64>) -> Array2<f64> {
        match self {
            Self::Relu => da * relu_gradient(z),
            Self::Softmax => da,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Relu => "relu",
            Self::Softmax => "softmax",
        }
    }
}

pub fn relu(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|z| if z > 0.0 { z } else { 0.0 })
}

pub fn relu_gradient(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|z| if z > 0.0 { 1.0 } else { 0.0 })
}

/// Column-wise softmax. Every column is shifted by its maximum before
/// exponentiating so large pre-activations cannot overflow.
pub fn softmax(z: &Array2<f64>) -> Array2<f64> {
    let mut out = z.clone();
    for mut column in out.axis_iter_mut(Axis(1)) {
        let max = column.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        column.mapv_inplace(|v| (v - max).exp());
        let sum = column.sum();
        column.mapv_inplace(|v| v / sum);
    }
    out
}
