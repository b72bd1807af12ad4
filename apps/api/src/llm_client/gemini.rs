//! Gemini adapter: candidate-based `generateContent` protocol with JSON mime output.
//!
//! Text accessors, first success wins:
//! 1. quick text: every text part of the first candidate, concatenated
//! 2. `candidates[0].content.parts[0].text`

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{present, require_text, send, ProviderAdapter, ProviderFailure, ProviderKind};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER: &str = "Gemini";
/// Model used for every Gemini analysis. Hardcoded to prevent drift.
pub const MODEL: &str = "gemini-2.5-flash";
const RESPONSE_MIME_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default, deserialize_with = "present")]
    text: Option<Value>,
}

impl GenerateResponse {
    fn first_parts(&self) -> Option<&[Part]> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_deref()
    }

    /// Concatenated text of the first candidate. `None` unless non-empty.
    fn quick_text(&self) -> Option<Value> {
        let joined: String = self
            .first_parts()?
            .iter()
            .filter_map(|part| part.text.as_ref()?.as_str())
            .collect();
        (!joined.is_empty()).then_some(Value::String(joined))
    }

    /// Strict `candidates[0].content.parts[0].text` walk.
    fn first_part_text(&self) -> Result<Option<Value>, &'static str> {
        let candidate = self
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or("response contains no candidates")?;
        let content = candidate
            .content
            .as_ref()
            .ok_or("first candidate has no content")?;
        let part = content
            .parts
            .as_ref()
            .and_then(|p| p.first())
            .ok_or("candidate content has no parts")?;
        part.text
            .clone()
            .map(Some)
            .ok_or("no text in any known accessor")
    }

    fn text(&self) -> Result<Option<Value>, &'static str> {
        match self.quick_text() {
            Some(text) => Ok(Some(text)),
            None => self.first_part_text(),
        }
    }
}

#[derive(Clone)]
pub struct GeminiAdapter {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Points the adapter at a different API base (everything before `/models`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{MODEL}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn call(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderFailure::NotConfigured { provider: PROVIDER })?;

        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE,
            },
        };

        debug!("Sending prompt to Gemini ({} chars)", prompt.len());
        let body = send(
            PROVIDER,
            self.client
                .post(self.endpoint())
                .header("x-goog-api-key", api_key)
                .json(&request_body),
        )
        .await?;

        let malformed = |detail: String| ProviderFailure::MalformedResponse {
            provider: PROVIDER,
            detail,
        };
        let response: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| malformed(e.to_string()))?;
        let text = response
            .text()
            .map_err(|detail| malformed(detail.to_string()))?;

        let text = require_text(PROVIDER, text)?;
        debug!("Gemini returned {} chars", text.len());
        Ok(text)
    }
}
