use std::error::Error;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum NNError {
    // Construction errors
    InvalidConfiguration(String),

    // Pass related errors
    ShapeMismatch(String),
    InvalidLayer(usize),

    // File operations
    NotFound(PathBuf),
    CorruptData(String),

    IoError(std::io::Error),
    SerializationError(Box<bincode::ErrorKind>),
}

impl fmt::Display for NNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NNError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            NNError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            NNError::InvalidLayer(layer) => write!(f, "Layer {} has no parameters", layer),
            NNError::NotFound(path) => write!(f, "Model file not found: {}", path.display()),
            NNError::CorruptData(msg) => write!(f, "Corrupt model data: {}", msg),
            NNError::IoError(err) => write!(f, "I/O error: {}", err),
            NNError::SerializationError(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl From<std::io::Error> for NNError {
    fn from(err: std::io::Error) -> NNError {
        NNError::IoError(err)
    }
}

impl From<Box<bincode::ErrorKind>> for NNError {
    fn from(err: Box<bincode::ErrorKind>) -> NNError {
        NNError::SerializationError(err)
    }
}

impl Error for NNError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NNError::IoError(err) => Some(err),
            NNError::SerializationError(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NNError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure() {
        let err = NNError::InvalidLayer(0);
        assert_eq!(err.to_string(), "Layer 0 has no parameters");

        let err = NNError::NotFound(PathBuf::from("models/missing.bin"));
        assert!(err.to_string().contains("models/missing.bin"));
    }

    #[test]
    fn io_errors_convert_and_keep_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: NNError = io.into();
        assert!(matches!(err, NNError::IoError(_)));
        assert!(err.source().is_some());
    }
}
