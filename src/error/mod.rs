//! Error types for the academy.

use thiserror::Error;

/// Primary error type for all academy operations.
#[derive(Error, Debug)]
pub enum AcademyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Action unavailable: {0}")]
    ActionUnavailable(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Canceled: {0}")]
    Canceled(String),
}

impl AcademyError {
    /// Whether the error came from the user's input rather than the simulator itself.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::InvalidRoute(_) | Self::ActionUnavailable(_)
        )
    }
}

impl From<toml::de::Error> for AcademyError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration(error.to_string())
    }
}

impl From<url::ParseError> for AcademyError {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidRoute(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AcademyError>;
