use crate::prelude::*;
use crate::core::activations::Activation;
use rand::Rng;

pub trait LayerTrait {
    fn new<R: Rng + ?Sized>(
        perceptron: usize,
        prev: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self>
    where
        Self: Sized;

    fn typ(&self) -> String;
}

/// Fully connected layer computing `z = w · a + b`.
///
/// `w` has shape `(perceptron, prev)` and `b` is a column `(perceptron, 1)`,
/// so samples travel through the network as columns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dense {
    pub w: Array2<f64>,
    pub b: Array2<f64>,
    pub activation: Activation,
}

impl LayerTrait for Dense {
    /// Weights are standard normal draws scaled by `1/sqrt(prev)`; biases are
    /// unscaled standard normal draws.
    fn new<R: Rng + ?Sized>(
        perceptron: usize,
        prev: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        if perceptron == 0 || prev == 0 {
            return Err(NNError::InvalidConfiguration(
                "Layer dimensions must be greater than 0".to_string()
            ));
        }
        let scale = 1.0 / (prev as f64).sqrt();
        Ok(Self {
            w: Array2::random_using((perceptron, prev), StandardNormal, rng) * scale,
            b: Array2::random_using((perceptron, 1), StandardNormal, rng),
            activation,
        })
    }

    fn typ(&self) -> String {
        "Dense".into()
    }
}

impl Dense {
    /// Builds a layer from existing parameters, checking that `b` is a column
    /// matching the rows of `w`.
    pub fn from_parameters(w: Array2<f64>, b: Array2<f64>, activation: Activation) -> Result<Self> {
        if w.nrows() == 0 || w.ncols() == 0 {
            return Err(NNError::InvalidConfiguration(
                "Layer dimensions must be greater than 0".to_string()
            ));
        }
        if b.dim() != (w.nrows(), 1) {
            return Err(NNError::ShapeMismatch(format!(
                "bias shape {:?} does not fit weight shape {:?}",
                b.dim(), w.dim()
            )));
        }
        Ok(Self { w, b, activation })
    }

    pub fn perceptron(&self) -> usize {
        self.w.nrows()
    }

    pub fn prev(&self) -> usize {
        self.w.ncols()
    }

    pub fn num_params(&self) -> usize {
        self.w.len() + self.b.len()
    }

    /// Returns `(z, a)` for the previous layer's activations `a_prev`.
    /// The bias column broadcasts across every sample in the batch.
    pub fn forward(&self, a_prev: &Array2<f64>) -> Result<(Array2<f64>, Array2<f64>)> {
        if a_prev.nrows() != self.prev() {
            return Err(NNError::ShapeMismatch(format!(
                "expected {} input rows, got {}",
                self.prev(), a_prev.nrows()
            )));
        }
        let z = self.w.dot(a_prev) + &self.b;
        let a = self.activation.forward(&z);
        Ok((z, a))
    }

    /// Returns `(dw, db, da_prev)` for this layer's pre-activation error `dz`.
    /// Per-sample contributions are summed across the batch.
    pub fn backward(
        &self,
        a_prev: &Array2<f64>,
        dz: &Array2<f64>,
    ) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
        let dw = dz.dot(&a_prev.t());
        let db = dz.sum_axis(Axis(1)).insert_axis(Axis(1));
        let da_prev = self.w.t().dot(dz);
        (dw, db, da_prev)
    }
}
