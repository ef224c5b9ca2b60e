use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Errors raised while loading or publishing a rule model
#[derive(Debug)]
pub enum ModelError {
    /// The model file does not exist
    SourceNotFound(PathBuf),
    /// The file exists but does not decode to a valid rule model
    MalformedModel(String),
    /// Any other I/O failure while reading the model file
    IoError(std::io::Error),
    /// A background load task panicked or was cancelled
    TaskFailed(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ModelError::SourceNotFound(path) => write!(f, "Model file not found at {}", path.display()),
            ModelError::MalformedModel(msg) => write!(f, "Malformed model: {}", msg),
            ModelError::IoError(err) => write!(f, "I/O error: {}", err),
            ModelError::TaskFailed(msg) => write!(f, "Load task failed: {}", msg),
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        ModelError::IoError(err)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::MalformedModel(err.to_string())
    }
}

impl ModelError {
    /// Missing files are expected while waiting for the first model
    pub fn is_source_missing(&self) -> bool {
        matches!(self, ModelError::SourceNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_display() {
        let err = ModelError::SourceNotFound(PathBuf::from("/tmp/model.json"));
        assert_eq!(err.to_string(), "Model file not found at /tmp/model.json");
        assert!(err.is_source_missing());

        let err = ModelError::MalformedModel("rules must be an array".to_string());
        assert!(err.to_string().contains("rules must be an array"));
        assert!(!err.is_source_missing());
    }

    #[test]
    fn test_model_error_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let err: ModelError = io.into();
        assert!(err.source().is_some());
    }
}
