pub mod gemini;
pub mod mock;

use crate::service::ImageProvider;
use std::fmt;
use std::sync::Arc;

/// Fixed message for the one error path where the service answered but the
/// response carried no inline image part.
pub const NO_IMAGE_MESSAGE: &str = "The model did not return an image. Please try again.";

#[derive(Clone, Debug)]
pub enum ProviderConfig {
    Gemini(gemini::GeminiConfig),
    Mock(mock::MockConfig),
}

#[derive(Debug)]
pub enum ProviderError {
    Configuration(String),
    Transport(String),
    InvalidResponse(String),
    NoImage,
}

impl ProviderError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        ProviderError::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        ProviderError::Transport(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        ProviderError::InvalidResponse(msg.into())
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Configuration(msg)
            | ProviderError::Transport(msg)
            | ProviderError::InvalidResponse(msg) => write!(f, "{msg}"),
            ProviderError::NoImage => write!(f, "{NO_IMAGE_MESSAGE}"),
        }
    }
}

impl std::error::Error for ProviderError {}

pub fn build_provider(config: ProviderConfig) -> Result<Arc<dyn ImageProvider>, ProviderError> {
    match config {
        ProviderConfig::Gemini(cfg) => Ok(Arc::new(gemini::GeminiImageProvider::new(cfg)?)),
        ProviderConfig::Mock(cfg) => Ok(Arc::new(mock::MockImageProvider::new(cfg))),
    }
}
