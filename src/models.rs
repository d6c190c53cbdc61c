use crate::prelude::*;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Layer sizes plus an optional seed for reproducible initialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub sizes: Vec<usize>,
    pub seed: Option<u64>,
}

impl NetworkConfig {
    pub fn new(sizes: &[usize]) -> Self {
        Self { sizes: sizes.to_vec(), seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_sizes(&self.sizes)
    }

    pub fn build(&self) -> Result<Network> {
        self.validate()?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Network::with_rng(&self.sizes, &mut rng)
    }
}

pub(crate) fn validate_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(NNError::InvalidConfiguration(format!(
            "a network needs at least 2 layers, got {}",
            sizes.len()
        )));
    }
    if let Some(layer) = sizes.iter().position(|&n| n == 0) {
        return Err(NNError::InvalidConfiguration(format!(
            "layer {} has size 0",
            layer
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    input: Option<usize>,
    dense: Vec<usize>,
    seed: Option<u64>,
}

impl NetworkBuilder {
    /// Sets the input size. A later call replaces an earlier one.
    pub fn input(mut self, size: usize) -> Self {
        self.input = Some(size);
        self
    }

    pub fn dense(mut self, size: usize) -> Self {
        self.dense.push(size);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(self) -> Result<NetworkConfig> {
        let input = self.input.ok_or_else(|| {
            NNError::InvalidConfiguration("input size not set".to_string())
        })?;
        let mut sizes = Vec::with_capacity(self.dense.len() + 1);
        sizes.push(input);
        sizes.extend(self.dense);
        Ok(NetworkConfig { sizes, seed: self.seed })
    }

    pub fn build(self) -> Result<Network> {
        self.config()?.build()
    }
}

/// Feed-forward network with ReLU hidden layers and a softmax output.
///
/// Layer 0 is the input and owns no parameters, so `layers[i]` holds the
/// parameters of network layer `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    sizes: Vec<usize>,
    layers: Vec<Dense>,
}

impl Network {
    pub fn new(sizes: &[usize]) -> Result<Self> {
        NetworkConfig::new(sizes).build()
    }

    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    pub fn with_rng<R: Rng + ?Sized>(sizes: &[usize], rng: &mut R) -> Result<Self> {
        validate_sizes(sizes)?;
        let last = sizes.len() - 1;
        let layers = (1..sizes.len())
            .map(|layer| {
                let activation = if layer == last { Activation::Softmax } else { Activation::Relu };
                Dense::new(sizes[layer], sizes[layer - 1], activation, &mut *rng)
            })
            .collect::<Result<Vec<_>>>()?;
        info!("initialized network with sizes {:?}", sizes);
        Ok(Self { sizes: sizes.to_vec(), layers })
    }

    /// Assembles a network from per-layer `(weights, bias)` pairs for layers
    /// `1..num_layers`. Sizes are read off the parameter shapes.
    pub fn from_parameters(parameters: Vec<(Array2<f64>, Array2<f64>)>) -> Result<Self> {
        if parameters.is_empty() {
            return Err(NNError::InvalidConfiguration(
                "a network needs at least 2 layers, got 1".to_string()
            ));
        }
        let mut sizes = vec![parameters[0].0.ncols()];
        let last = parameters.len() - 1;
        let mut layers = Vec::with_capacity(parameters.len());
        for (i, (w, b)) in parameters.into_iter().enumerate() {
            if w.ncols() != sizes[i] {
                return Err(NNError::ShapeMismatch(format!(
                    "layer {} expects {} inputs but layer {} has {} units",
                    i + 1, w.ncols(), i, sizes[i]
                )));
            }
            let activation = if i == last { Activation::Softmax } else { Activation::Relu };
            let dense = Dense::from_parameters(w, b, activation)?;
            sizes.push(dense.perceptron());
            layers.push(dense);
        }
        validate_sizes(&sizes)?;
        Ok(Self { sizes, layers })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn num_layers(&self) -> usize {
        self.sizes.len()
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    fn layer(&self, layer: usize) -> Result<&Dense> {
        if layer == 0 {
            return Err(NNError::InvalidLayer(layer));
        }
        self.layers.get(layer - 1).ok_or(NNError::InvalidLayer(layer))
    }

    pub fn weights(&self, layer: usize) -> Result<&Array2<f64>> {
        Ok(&self.layer(layer)?.w)
    }

    pub fn biases(&self, layer: usize) -> Result<&Array2<f64>> {
        Ok(&self.layer(layer)?.b)
    }

    /// Replaces the parameters of `layer`, keeping its shape.
    pub fn set_parameters(&mut self, layer: usize, w: Array2<f64>, b: Array2<f64>) -> Result<()> {
        let current = self.layer(layer)?;
        if w.dim() != current.w.dim() || b.dim() != current.b.dim() {
            return Err(NNError::ShapeMismatch(format!(
                "layer {} expects weights {:?} and bias {:?}, got {:?} and {:?}",
                layer, current.w.dim(), current.b.dim(), w.dim(), b.dim()
            )));
        }
        let activation = current.activation;
        self.layers[layer - 1] = Dense { w, b, activation };
        Ok(())
    }

    pub fn num_params(&self) -> usize {
        self.layers.iter().map(Dense::num_params).sum()
    }

    pub fn summary(&self) -> String {
        let mut res = "\nModel Network\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer (Type)\t\t Output shape\t\t No.of params\n");
        res.push_str(&format!("Input\t\t\t  (None, {})\t\t  0\n", self.sizes[0]));
        for layer in self.layers.iter() {
            res.push_str(&format!(
                "{} ({})\t\t  (None, {})\t\t  {}\n",
                layer.typ(), layer.activation.name(), layer.perceptron(), layer.num_params()
            ));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", self.num_params()));
        res
    }

    fn check_input(&self, input: &Array2<f64>) -> Result<()> {
        if input.nrows() != self.sizes[0] {
            return Err(NNError::ShapeMismatch(format!(
                "input has {} rows, network expects {}",
                input.nrows(), self.sizes[0]
            )));
        }
        Ok(())
    }

    /// Runs the input (one sample per column) through every layer and returns
    /// the softmax output together with the intermediates `backward` needs.
    pub fn forward(&self, input: Array2<f64>) -> Result<(Array2<f64>, ForwardCache)> {
        self.check_input(&input)?;
        debug!("forward pass over batch of {}", input.ncols());
        let mut linear_transforms = Vec::with_capacity(self.num_layers());
        let mut activations = Vec::with_capacity(self.num_layers());
        linear_transforms.push(Array2::zeros(input.dim()));
        let mut a = input;
        for layer in self.layers.iter() {
            let (z, next) = layer.forward(&a)?;
            activations.push(a);
            linear_transforms.push(z);
            a = next;
        }
        activations.push(a.clone());
        Ok((a, ForwardCache::from_parts(linear_transforms, activations)))
    }

    /// Forward pass that keeps no intermediates.
    pub fn predict(&self, input: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_input(input)?;
        let mut a = input.clone();
        for layer in self.layers.iter() {
            (_, a) = layer.forward(&a)?;
        }
        Ok(a)
    }

    /// Backpropagates `loss_gradient` through the pass recorded in `cache`.
    ///
    /// `loss_gradient` is the derivative of the loss with respect to the
    /// output layer's *pre-activation*, with the softmax derivative already
    /// folded in. For softmax with cross-entropy that is `predicted - target`.
    /// Callers pairing softmax with another loss must apply the softmax
    /// Jacobian themselves before calling this.
    pub fn backward(&self, cache: &ForwardCache, loss_gradient: Array2<f64>) -> Result<Gradients> {
        cache.validate(&self.sizes)?;
        let expected = (self.sizes[self.num_layers() - 1], cache.batch_size());
        if loss_gradient.dim() != expected {
            return Err(NNError::ShapeMismatch(format!(
                "loss gradient has shape {:?}, expected {:?}",
                loss_gradient.dim(), expected
            )));
        }
        debug!("backward pass over batch of {}", cache.batch_size());

        let mut grads = Gradients::zeros(&self.sizes);
        let mut dz = loss_gradient;
        for layer in (1..self.num_layers()).rev() {
            let dense = &self.layers[layer - 1];
            let (dw, db, da_prev) = dense.backward(&cache.activations[layer - 1], &dz);
            grads.weights[layer] = dw;
            grads.biases[layer] = db;
            if layer > 1 {
                let below = &self.layers[layer - 2];
                dz = below.activation.backward(&cache.linear_transforms[layer - 1], da_prev);
            }
        }
        Ok(grads)
    }
}
