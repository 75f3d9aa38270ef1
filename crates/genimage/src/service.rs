use crate::models::{GenerationRequest, ImageData, ProviderKind};
use crate::providers::ProviderError;
use std::sync::Arc;

/// An image-generation backend. One network call per `generate` invocation;
/// no retry. Implementations must be safe to share across worker threads.
pub trait ImageProvider: Send + Sync {
    fn provider_kind(&self) -> ProviderKind;
    fn model_name(&self) -> &str;
    fn generate(&self, request: &GenerationRequest) -> Result<ImageData, ProviderError>;
}

/// Cloneable handle the application hands to worker threads.
#[derive(Clone)]
pub struct GenerationService {
    provider: Arc<dyn ImageProvider>,
}

impl GenerationService {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> Arc<dyn ImageProvider> {
        Arc::clone(&self.provider)
    }

    pub fn generate(&self, request: &GenerationRequest) -> Result<ImageData, ProviderError> {
        self.provider.generate(request)
    }
}
