use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum OdmError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("TOML Parsing Error: {0}")]
    Toml(#[from] Arc<toml::de::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TransportError: Failed to fetch '{url}': {reason}")]
    Transport { url: String, reason: String },

    #[error("StorageError: {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("Dependency Error: '{dependency}' required by '{required_by}' could not be materialized: {source}")]
    Dependency {
        required_by: String,
        dependency: String,
        source: Arc<OdmError>,
    },

    #[error("Invalid module path '{0}': {1}")]
    InvalidPath(String, String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),
}

impl OdmError {
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        OdmError::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn storage(path: &std::path::Path, reason: impl ToString) -> Self {
        OdmError::Storage {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Wraps a failure that happened while expanding the dependencies of
    /// `required_by`. Already-wrapped errors pass through so the innermost
    /// requester stays visible.
    pub fn dependency(required_by: impl Into<String>, dependency: impl Into<String>, err: OdmError) -> Self {
        match err {
            e @ OdmError::Dependency { .. } => e,
            other => OdmError::Dependency {
                required_by: required_by.into(),
                dependency: dependency.into(),
                source: Arc::new(other),
            },
        }
    }
}

impl From<std::io::Error> for OdmError {
    fn from(err: std::io::Error) -> Self {
        OdmError::Io(Arc::new(err))
    }
}

impl From<toml::de::Error> for OdmError {
    fn from(err: toml::de::Error) -> Self {
        OdmError::Toml(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, OdmError>;
