//! Client for the hosted try-on generation model.
//!
//! The model is an opaque dependency: it takes the person photo and the
//! garment image as inline base64 parts plus a fixed instructional
//! prompt, and returns either a composite image or a textual refusal.
//! Nothing here knows how the composite is produced.

use reqwest::Client;
use serde_json::{json, Value};

use crate::app::{FitroomError, Result};
use crate::config::TryOnConfig;
use crate::encode::{self, ImagePart};

const TRYON_PROMPT: &str = "\
INSTRUCTION:
Apply the garment from the second image onto the person in the first image.

RULES:
- Keep the person's face, hair, and body shape identical.
- Replace only the clothing.
- Make the fit look natural with realistic folds and lighting.
- Return ONLY the final edited image.";

pub struct TryOnClient {
    client: Client,
    endpoint: String,
    model: String,
    aspect_ratio: String,
    api_key: String,
}

impl TryOnClient {
    /// Build a client, reading the API key from the configured
    /// environment variable. Fails before any network call when the key
    /// is missing.
    pub fn new(config: &TryOnConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            FitroomError::Generation(format!(
                "{} is not set. Export your API key before running try-on.",
                config.api_key_env
            ))
        })?;
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: &TryOnConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            aspect_ratio: config.aspect_ratio.clone(),
            api_key,
        }
    }

    /// Render the garment onto the person and return the composite as a
    /// `data:` URL.
    pub async fn generate(&self, person: &ImagePart, garment: &ImagePart) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = request_body(person, garment, &self.aspect_ratio);

        tracing::debug!(model = %self.model, "requesting try-on composite");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "generation request rejected");
            return Err(FitroomError::Generation(friendly_api_error(status.as_u16())));
        }

        let body: Value = response.json().await?;
        extract_image(&body)
    }
}

fn request_body(person: &ImagePart, garment: &ImagePart, aspect_ratio: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": person.mime_type, "data": person.data } },
                { "inlineData": { "mimeType": garment.mime_type, "data": garment.data } },
                { "text": TRYON_PROMPT },
            ]
        }],
        "generationConfig": {
            "imageConfig": { "aspectRatio": aspect_ratio }
        }
    })
}

/// Pull the first inline image out of a generation response, surfacing
/// any textual refusal as the error.
fn extract_image(body: &Value) -> Result<String> {
    let parts = body["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| {
            FitroomError::Generation(
                "No response generated. The model may have filtered the content due to safety settings."
                    .to_string(),
            )
        })?;

    for part in parts {
        let inline = &part["inlineData"];
        if let Some(data) = inline["data"].as_str() {
            let mime_type = inline["mimeType"].as_str().unwrap_or("image/png");
            return Ok(encode::to_data_url(mime_type, data));
        }
    }

    let refusal = parts
        .iter()
        .find_map(|part| part["text"].as_str())
        .unwrap_or("The model did not return an image. Try using clearer photos.");

    Err(FitroomError::Generation(refusal.to_string()))
}

/// Map common API failures to actionable messages.
fn friendly_api_error(status: u16) -> String {
    match status {
        401 | 403 => "Invalid API key. Please check the key provided in your environment.".into(),
        429 => "Too many requests. Please wait a moment before trying again.".into(),
        s if s >= 500 => "The generation service is temporarily unavailable.".into(),
        s => format!("Generation request failed with HTTP status {}.", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> ImagePart {
        ImagePart {
            mime_type: "image/jpeg".into(),
            data: "UEVSU09O".into(),
        }
    }

    fn garment() -> ImagePart {
        ImagePart {
            mime_type: "image/png".into(),
            data: "R0FSTUVOVA==".into(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body(&person(), &garment(), "1:1");
        let parts = body["contents"][0]["parts"].as_array().unwrap();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "UEVSU09O");
        assert_eq!(parts[1]["inlineData"]["data"], "R0FSTUVOVA==");
        let prompt = parts[2]["text"].as_str().unwrap();
        assert!(prompt.contains("Replace only the clothing"));
        assert_eq!(
            body["generationConfig"]["imageConfig"]["aspectRatio"],
            "1:1"
        );
    }

    #[test]
    fn test_extract_image_returns_data_url() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "Zm9v" } },
                    ]
                }
            }]
        });
        let url = extract_image(&body).unwrap();
        assert_eq!(url, "data:image/png;base64,Zm9v");
    }

    #[test]
    fn test_extract_image_defaults_mime() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [ { "inlineData": { "data": "Zm9v" } } ] }
            }]
        });
        assert_eq!(extract_image(&body).unwrap(), "data:image/png;base64,Zm9v");
    }

    #[test]
    fn test_refusal_text_surfaced() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [ { "text": "I can't edit this image." } ] }
            }]
        });
        let err = extract_image(&body).unwrap_err();
        assert_eq!(err.to_string(), "I can't edit this image.");
    }

    #[test]
    fn test_empty_response_is_an_error() {
        let err = extract_image(&json!({})).unwrap_err();
        assert!(err.to_string().contains("No response generated"));
    }

    #[test]
    fn test_friendly_api_errors() {
        assert!(friendly_api_error(401).contains("Invalid API key"));
        assert!(friendly_api_error(403).contains("Invalid API key"));
        assert!(friendly_api_error(429).contains("Too many requests"));
        assert!(friendly_api_error(503).contains("temporarily unavailable"));
        assert!(friendly_api_error(418).contains("418"));
    }
}
