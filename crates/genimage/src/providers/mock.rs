use super::ProviderError;
use crate::models::{GenerationRequest, ImageData, ProviderKind};
use crate::service::ImageProvider;
use std::collections::VecDeque;
use std::sync::Mutex;

/// 1x1 opaque PNG, the stand-in payload for scripted successes.
const PLACEHOLDER_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

#[derive(Clone, Debug)]
pub enum MockOutcome {
    Image(ImageData),
    NoImage,
    Transport(String),
    Configuration(String),
}

/// Scripted outcomes are consumed in order; once exhausted every call
/// succeeds with the placeholder image.
#[derive(Clone, Debug, Default)]
pub struct MockConfig {
    pub outcomes: Vec<MockOutcome>,
}

pub struct MockImageProvider {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockImageProvider {
    pub fn new(config: MockConfig) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::from(config.outcomes)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn placeholder_image() -> ImageData {
        ImageData::new("image/png", PLACEHOLDER_PNG)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ImageProvider for MockImageProvider {
    fn provider_kind(&self) -> ProviderKind {
        ProviderKind::Mock
    }

    fn model_name(&self) -> &str {
        "mock-image-model"
    }

    fn generate(&self, request: &GenerationRequest) -> Result<ImageData, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        let outcome = self.outcomes.lock().unwrap().pop_front();
        match outcome {
            None => Ok(Self::placeholder_image()),
            Some(MockOutcome::Image(image)) => Ok(image),
            Some(MockOutcome::NoImage) => Err(ProviderError::NoImage),
            Some(MockOutcome::Transport(msg)) => Err(ProviderError::Transport(msg)),
            Some(MockOutcome::Configuration(msg)) => Err(ProviderError::Configuration(msg)),
        }
    }
}
