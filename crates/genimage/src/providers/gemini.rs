use super::ProviderError;
use crate::models::{GenerationRequest, ImageData, ProviderKind};
use crate::service::ImageProvider;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct GeminiImageProvider {
    config: GeminiConfig,
    agent: ureq::Agent,
}

impl GeminiImageProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::configuration(
                "Gemini API key is required.",
            ));
        }
        if config.model.trim().is_empty() {
            return Err(ProviderError::configuration(
                "Gemini model name is required.",
            ));
        }
        // Image generation is slow; the read timeout is the only local bound
        // on call duration.
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(20))
            .timeout_read(Duration::from_secs(120))
            .timeout_write(Duration::from_secs(20))
            .build();
        Ok(Self { config, agent })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model.trim(),
            urlencoding::encode(self.config.api_key.trim())
        )
    }

    /// Request shape: the inline image part (when present) precedes the text
    /// part, and the IMAGE response modality is always requested.
    fn build_payload(request: &GenerationRequest) -> Value {
        let mut parts = Vec::new();
        if let Some(reference) = &request.reference {
            parts.push(json!({
                "inlineData": {
                    "mimeType": reference.mime_type,
                    "data": reference.data,
                }
            }));
        }
        parts.push(json!({ "text": request.prompt }));
        let mut generation_config = json!({ "responseModalities": ["IMAGE"] });
        if let Some(ratio) = &request.aspect_ratio {
            generation_config["imageConfig"] = json!({ "aspectRatio": ratio });
        }
        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": generation_config,
        })
    }

    fn extract_image(parsed: GeminiResponse) -> Result<ImageData, ProviderError> {
        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            ProviderError::invalid_response("Gemini response had no candidates.")
        })?;
        let parts = candidate
            .content
            .and_then(|content| content.parts)
            .unwrap_or_default();
        parts
            .into_iter()
            .find_map(|part| part.inline_data)
            .map(|inline| ImageData::new(inline.mime_type, inline.data))
            .ok_or(ProviderError::NoImage)
    }
}

impl ImageProvider for GeminiImageProvider {
    fn provider_kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn generate(&self, request: &GenerationRequest) -> Result<ImageData, ProviderError> {
        let payload = Self::build_payload(request);
        let start = Instant::now();
        let response = self
            .agent
            .post(&self.endpoint())
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .set("X-Goog-Api-Key", self.config.api_key.trim())
            .send_string(&payload.to_string())
            .map_err(|err| ProviderError::transport(format!("Gemini request failed: {err}")))?;
        let body = response.into_string().map_err(|err| {
            ProviderError::transport(format!("Read Gemini response failed: {err}"))
        })?;
        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|err| {
            ProviderError::invalid_response(format!("Invalid Gemini response JSON: {err}"))
        })?;
        let result = Self::extract_image(parsed);
        match &result {
            Ok(image) => tracing::info!(
                target: "genimage",
                "Generated {} image in {:.2?}",
                image.mime_type,
                start.elapsed()
            ),
            Err(err) => tracing::warn!(
                target: "genimage",
                "Generation returned no usable image after {:.2?}: {}",
                start.elapsed(),
                err
            ),
        }
        result
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default, rename = "inlineData")]
    inline_data: Option<GeminiInlineData>,
    #[allow(dead_code)]
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::NO_IMAGE_MESSAGE;

    fn reference() -> ImageData {
        ImageData::new("image/png", "QUJD")
    }

    #[test]
    fn payload_puts_reference_before_text() {
        let request = GenerationRequest::text("a red fox").with_reference(reference());
        let payload = GeminiImageProvider::build_payload(&request);

        let parts = payload["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["text"], "a red fox");
        assert_eq!(
            payload["generationConfig"]["responseModalities"][0],
            "IMAGE"
        );
    }

    #[test]
    fn payload_without_reference_is_text_only() {
        let payload = GeminiImageProvider::build_payload(&GenerationRequest::text("a red fox"));

        let parts = payload["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0]["text"], "a red fox");
    }

    #[test]
    fn payload_carries_aspect_ratio_hint() {
        let mut request = GenerationRequest::text("a red fox");
        request.aspect_ratio = Some("16:9".to_string());
        let payload = GeminiImageProvider::build_payload(&request);

        assert_eq!(
            payload["generationConfig"]["imageConfig"]["aspectRatio"],
            "16:9"
        );
    }

    #[test]
    fn extract_takes_first_inline_image_part() {
        let parsed: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your image." },
                        { "inlineData": { "mimeType": "image/png", "data": "Zmlyc3Q=" } },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "c2Vjb25k" } }
                    ]
                }
            }]
        }))
        .unwrap();

        let image = GeminiImageProvider::extract_image(parsed).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "Zmlyc3Q=");
    }

    #[test]
    fn extract_without_image_part_is_generation_failure() {
        let parsed: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Sorry, cannot draw that." }] }
            }]
        }))
        .unwrap();

        let err = GeminiImageProvider::extract_image(parsed).unwrap_err();
        assert!(matches!(err, ProviderError::NoImage));
        assert_eq!(err.to_string(), NO_IMAGE_MESSAGE);
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = GeminiImageProvider::new(GeminiConfig::default()).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }
}
