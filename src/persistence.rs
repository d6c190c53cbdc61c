use crate::models::validate_sizes;
use crate::prelude::*;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// On-disk layout: four per-layer array lists, each of length `num_layers`.
///
/// Layer 0 holds placeholders. `biases[0]` is a zero column with `sizes[0]`
/// rows so every layer size can be read back from the bias rows.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelFile {
    pub weights: Vec<Array2<f64>>,
    pub biases: Vec<Array2<f64>>,
    pub linear_transforms: Vec<Array2<f64>>,
    pub activations: Vec<Array2<f64>>,
}

impl ModelFile {
    pub fn from_network(network: &Network, cache: &ForwardCache) -> Self {
        let input = network.sizes()[0];
        let mut weights = vec![Array2::zeros((input, 0))];
        let mut biases = vec![Array2::zeros((input, 1))];
        for layer in network.layers() {
            weights.push(layer.w.clone());
            biases.push(layer.b.clone());
        }
        Self {
            weights,
            biases,
            linear_transforms: cache.linear_transforms().to_vec(),
            activations: cache.activations().to_vec(),
        }
    }

    /// Layer sizes read from the bias rows.
    pub fn sizes(&self) -> Vec<usize> {
        self.biases.iter().map(|b| b.nrows()).collect()
    }

    /// Rebuilds the network and the stored cache, rejecting any file whose
    /// arrays disagree with the sizes derived from the biases.
    pub fn into_network(self) -> Result<(Network, ForwardCache)> {
        let sizes = self.sizes();
        let num_layers = sizes.len();
        let corrupt = |msg: String| NNError::CorruptData(msg);

        if self.weights.len() != num_layers
            || self.linear_transforms.len() != num_layers
            || self.activations.len() != num_layers
        {
            return Err(corrupt(format!(
                "array lists differ in length: weights {}, biases {}, linear_transforms {}, activations {}",
                self.weights.len(), num_layers, self.linear_transforms.len(), self.activations.len()
            )));
        }
        validate_sizes(&sizes).map_err(|err| corrupt(err.to_string()))?;

        for (layer, b) in self.biases.iter().enumerate() {
            if b.ncols() != 1 {
                return Err(corrupt(format!("bias {} has {} columns", layer, b.ncols())));
            }
        }
        for layer in 1..num_layers {
            let expected = (sizes[layer], sizes[layer - 1]);
            if self.weights[layer].dim() != expected {
                return Err(corrupt(format!(
                    "weight {} has shape {:?}, expected {:?}",
                    layer, self.weights[layer].dim(), expected
                )));
            }
        }
        let cache = ForwardCache::from_parts(self.linear_transforms, self.activations);
        cache.validate(&sizes).map_err(|err| corrupt(err.to_string()))?;

        let parameters = self.weights.into_iter().zip(self.biases).skip(1).collect();
        let network = Network::from_parameters(parameters).map_err(|err| corrupt(err.to_string()))?;
        Ok((network, cache))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_compressed(tmp: &Path, path: &Path, file: &ModelFile) -> Result<()> {
    let mut encoder = GzEncoder::new(File::create(tmp)?, Compression::default());
    bincode::serialize_into(&mut encoder, file)?;
    encoder.finish()?.sync_all()?;
    fs::rename(tmp, path)?;
    Ok(())
}

impl Network {
    /// Saves the parameters with an all-zero single-sample cache.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_with_cache(path, &ForwardCache::zeros(self.sizes()))
    }

    /// Saves the parameters together with the intermediates of a forward pass
    /// as a gzip-compressed bincode payload. The bytes land in a sibling
    /// temporary file that is renamed over `path` once fully written.
    pub fn save_with_cache<P: AsRef<Path>>(&self, path: P, cache: &ForwardCache) -> Result<()> {
        let path = path.as_ref();
        cache.validate(self.sizes())?;

        let tmp = temp_path(path);
        if let Err(err) = write_compressed(&tmp, path, &ModelFile::from_network(self, cache)) {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
        info!("saved network {:?} to {}", self.sizes(), path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network> {
        Ok(Self::load_with_cache(path)?.0)
    }

    pub fn load_with_cache<P: AsRef<Path>>(path: P) -> Result<(Network, ForwardCache)> {
        let path = path.as_ref();
        let mut buffer = Vec::new();
        File::open(path)
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => NNError::NotFound(path.to_path_buf()),
                _ => NNError::IoError(err),
            })?
            .read_to_end(&mut buffer)?;

        let mut decoded = Vec::new();
        GzDecoder::new(&buffer[..])
            .read_to_end(&mut decoded)
            .map_err(|err| NNError::CorruptData(err.to_string()))?;
        let file: ModelFile = bincode::deserialize(&decoded)
            .map_err(|err| NNError::CorruptData(err.to_string()))?;
        let (network, cache) = file.into_network()?;
        info!("loaded network {:?} from {}", network.sizes(), path.display());
        Ok((network, cache))
    }
}
