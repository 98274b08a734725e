//! Gemini REST backend
//!
//! Implements both collaborator traits over the `generateContent` endpoint
//! using a blocking HTTP client; the batch pipeline is sequential anyway.

use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::io::Cursor;
use std::time::Duration;
use tracing::debug;

use super::backend::{CaptionGenerator, ImageClassifier};
use super::parse::{parse_classification, parse_hooks};
use super::types::{
    looks_like_quota, Classification, ClassifyError, Result, API_KEY_ENV, DEFAULT_ENDPOINT,
    DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use crate::candidate::SourceImage;

const CLASSIFY_PROMPT: &str = "\
Analyze this image for fashion e-commerce.
1. isModel: is there at least one human model? (boolean)
2. personCount: exact number of distinct human bodies visible.
   - Two separate people (a couple, two models side by side): 2.
   - A mirror selfie of one person: 1.
   - One person in several poses (collage): the number of figures.
3. isCollage: is this image a collage or grid of several photos? (boolean)
4. logo: location of any visible text watermark or shop logo, as integer
   coordinates from 0 to 1000 relative to the image (hasLogo, xmin, ymin, xmax, ymax).";

/// Gemini client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Create a client; an empty key is a configuration error
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClassifyError::MissingCredentials);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Create a client from the environment
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV).map_err(|_| ClassifyError::MissingCredentials)?;
        Self::new(key)
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// POST a request body and return the first candidate's text
    fn generate(&self, body: &Value) -> Result<String> {
        debug!(model = %self.model, "Calling generateContent");
        let response = self
            .http
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(status_error(status, &detail));
        }

        let value: Value = response.json()?;
        extract_text(&value)
    }
}

impl ImageClassifier for GeminiClient {
    fn classify(&self, image: &SourceImage) -> Result<Classification> {
        let mut png = Vec::new();
        image
            .bitmap
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| ClassifyError::ImageEncode(e.to_string()))?;

        let body = json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": "image/png", "data": general_purpose::STANDARD.encode(&png) } },
                    { "text": CLASSIFY_PROMPT }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": classification_schema()
            }
        });

        parse_classification(&self.generate(&body)?)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn is_remote(&self) -> bool {
        true
    }
}

impl CaptionGenerator for GeminiClient {
    fn generate_hooks(
        &self,
        product_type: &str,
        occasion: &str,
        count: usize,
    ) -> Result<Vec<String>> {
        let body = json!({
            "contents": [{ "parts": [{ "text": hook_prompt(product_type, occasion, count) }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        let hooks = parse_hooks(&self.generate(&body)?)?;
        if hooks.is_empty() {
            return Err(ClassifyError::InvalidResponse("empty hook list".into()));
        }
        Ok(hooks)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn hook_prompt(product_type: &str, occasion: &str, count: usize) -> String {
    format!(
        "Write {count} different opening captions (hooks) for a fashion product listing.\n\
         Occasion: \"{occasion}\"\n\
         Product type: \"{product_type}\"\n\
         Requirements:\n\
         - 8 to 14 words each.\n\
         - Warm, playful tone that sparks curiosity.\n\
         - Each must mention the occasion or the product type.\n\
         - Vary the sentence structure.\n\
         - Output a JSON array of strings only."
    )
}

fn classification_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isModel": { "type": "BOOLEAN" },
            "personCount": { "type": "INTEGER" },
            "isCollage": { "type": "BOOLEAN" },
            "logo": {
                "type": "OBJECT",
                "properties": {
                    "hasLogo": { "type": "BOOLEAN" },
                    "ymin": { "type": "INTEGER" },
                    "xmin": { "type": "INTEGER" },
                    "ymax": { "type": "INTEGER" },
                    "xmax": { "type": "INTEGER" }
                }
            }
        }
    })
}

fn status_error(status: StatusCode, detail: &str) -> ClassifyError {
    let message = format!("HTTP {status}: {}", detail.trim());
    if status == StatusCode::TOO_MANY_REQUESTS || looks_like_quota(detail) {
        ClassifyError::RateLimited(message)
    } else {
        ClassifyError::Transient(message)
    }
}

/// Text of the first candidate's first text part
fn extract_text(response: &Value) -> Result<String> {
    response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .and_then(|parts| parts.iter().find_map(|p| p.get("text")?.as_str()))
        .map(String::from)
        .ok_or_else(|| {
            let reason = response
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .unwrap_or("no text in response");
            ClassifyError::InvalidResponse(reason.to_string())
        })
}
