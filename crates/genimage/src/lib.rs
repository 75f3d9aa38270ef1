mod models;
mod providers;
mod service;

pub use models::{GenerationRequest, ImageData, ProviderKind};
pub use providers::{
    build_provider,
    gemini::{GeminiConfig, GeminiImageProvider, DEFAULT_IMAGE_MODEL, GEMINI_API_BASE},
    mock::{MockConfig, MockImageProvider, MockOutcome},
    ProviderConfig, ProviderError, NO_IMAGE_MESSAGE,
};
pub use service::{GenerationService, ImageProvider};
