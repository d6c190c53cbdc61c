use crate::prelude::*;

/// Intermediates of one forward pass, indexed by network layer.
///
/// `activations[0]` is the input the pass ran on and `linear_transforms[0]`
/// is a zero placeholder, since the input layer computes nothing. Every
/// entry has one column per sample.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForwardCache {
    pub(crate) linear_transforms: Vec<Array2<f64>>,
    pub(crate) activations: Vec<Array2<f64>>,
}

impl ForwardCache {
    pub(crate) fn from_parts(linear_transforms: Vec<Array2<f64>>, activations: Vec<Array2<f64>>) -> Self {
        Self { linear_transforms, activations }
    }

    /// Zero-filled cache for a single sample, matching `sizes`.
    pub fn zeros(sizes: &[usize]) -> Self {
        Self {
            linear_transforms: sizes.iter().map(|&n| Array2::zeros((n, 1))).collect(),
            activations: sizes.iter().map(|&n| Array2::zeros((n, 1))).collect(),
        }
    }

    pub fn num_layers(&self) -> usize {
        self.activations.len()
    }

    pub fn batch_size(&self) -> usize {
        self.activations.first().map_or(0, |a| a.ncols())
    }

    pub fn input(&self) -> Option<&Array2<f64>> {
        self.activations.first()
    }

    pub fn output(&self) -> Option<&Array2<f64>> {
        self.activations.last()
    }

    pub fn activation(&self, layer: usize) -> Option<&Array2<f64>> {
        self.activations.get(layer)
    }

    pub fn linear_transform(&self, layer: usize) -> Option<&Array2<f64>> {
        self.linear_transforms.get(layer)
    }

    pub fn activations(&self) -> &[Array2<f64>] {
        &self.activations
    }

    pub fn linear_transforms(&self) -> &[Array2<f64>] {
        &self.linear_transforms
    }

    /// Row count of every cached layer.
    pub fn sizes(&self) -> Vec<usize> {
        self.activations.iter().map(|a| a.nrows()).collect()
    }

    /// Checks that both lists hold one `(sizes[layer], batch)` entry per
    /// layer, with the batch width taken from the input.
    pub fn validate(&self, sizes: &[usize]) -> Result<()> {
        if self.activations.len() != sizes.len() || self.linear_transforms.len() != sizes.len() {
            return Err(NNError::ShapeMismatch(format!(
                "cache holds {} activations and {} linear transforms, network has {} layers",
                self.activations.len(), self.linear_transforms.len(), sizes.len()
            )));
        }
        let batch = self.batch_size();
        for (layer, &size) in sizes.iter().enumerate() {
            for (name, cached) in [
                ("linear_transform", &self.linear_transforms[layer]),
                ("activation", &self.activations[layer]),
            ] {
                if cached.dim() != (size, batch) {
                    return Err(NNError::ShapeMismatch(format!(
                        "{} {} has shape {:?}, expected {:?}",
                        name, layer, cached.dim(), (size, batch)
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parameter gradients from one backward pass, index-aligned with the
/// network layers. Layer 0 holds zero-filled placeholders.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Vec<Array2<f64>>,
    pub biases: Vec<Array2<f64>>,
}

impl Gradients {
    pub(crate) fn zeros(sizes: &[usize]) -> Self {
        let mut weights = Vec::with_capacity(sizes.len());
        let mut biases = Vec::with_capacity(sizes.len());
        weights.push(Array2::zeros((sizes[0], 0)));
        biases.push(Array2::zeros((sizes[0], 1)));
        for pair in sizes.windows(2) {
            weights.push(Array2::zeros((pair[1], pair[0])));
            biases.push(Array2::zeros((pair[1], 1)));
        }
        Self { weights, biases }
    }

    pub fn num_layers(&self) -> usize {
        self.biases.len()
    }

    pub fn weight(&self, layer: usize) -> Option<&Array2<f64>> {
        self.weights.get(layer)
    }

    pub fn bias(&self, layer: usize) -> Option<&Array2<f64>> {
        self.biases.get(layer)
    }

    /// Euclidean norm over every gradient entry.
    pub fn norm(&self) -> f64 {
        self.weights
            .iter()
            .chain(self.biases.iter())
            .map(|g| g.mapv(|x| x * x).sum())
            .sum::<f64>()
            .sqrt()
    }
}
