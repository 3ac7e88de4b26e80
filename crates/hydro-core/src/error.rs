use thiserror::Error;

/// Top-level error type for the HydroIntel workspace.
///
/// Subsystem crates define their own error types and implement
/// `From<HydroError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HydroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for HydroError {
    fn from(err: toml::de::Error) -> Self {
        HydroError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HydroError {
    fn from(err: toml::ser::Error) -> Self {
        HydroError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for HydroIntel operations.
pub type Result<T> = std::result::Result<T, HydroError>;
