use thiserror::Error;

/// Top-level error type for the Mindful workspace.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for MindfulError` so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MindfulError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Session limit reached: {limit} live sessions")]
    SessionLimit { limit: usize },
}

impl From<toml::de::Error> for MindfulError {
    fn from(err: toml::de::Error) -> Self {
        MindfulError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MindfulError {
    fn from(err: toml::ser::Error) -> Self {
        MindfulError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MindfulError {
    fn from(err: serde_json::Error) -> Self {
        MindfulError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Mindful operations.
pub type Result<T> = std::result::Result<T, MindfulError>;
