/// LLM Client: the single point of entry for all language-model calls in FeasAI.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// Every provider sits behind `ProviderAdapter`; wire shapes never leave this module.
///
/// No retries: one failed attempt surfaces immediately as a `ProviderFailure`.
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub mod cerebras;
pub mod gemini;

pub use cerebras::CerebrasAdapter;
pub use gemini::GeminiAdapter;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderFailure {
    #[error("{provider} API key is not configured on the server")]
    NotConfigured { provider: &'static str },

    #[error("{provider} request failed: {detail}")]
    TransportError {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} response has an unexpected shape: {detail}")]
    MalformedResponse {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },
}

/// The two supported providers. Parsed from the caller-facing model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Cerebras,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Cerebras => "cerebras",
            ProviderKind::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown provider '{0}'")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cerebras" => Ok(ProviderKind::Cerebras),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Uniform call contract shared by every provider integration.
///
/// Implementations must check their credential before touching the network and
/// return the raw model text unmodified on success.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn call(&self, prompt: &str) -> Result<String, ProviderFailure>;
}

/// Error envelope both providers use for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Sends a prepared request and returns the response body as text.
/// Network failures and non-2xx statuses are both `TransportError`.
pub(crate) async fn send(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<String, ProviderFailure> {
    let transport = |detail: String| ProviderFailure::TransportError { provider, detail };

    let response = request.send().await.map_err(|e| transport(e.to_string()))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| transport(e.to_string()))?;

    if !status.is_success() {
        warn!("{provider} API returned {status}");
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(transport(format!("status {}: {message}", status.as_u16())));
    }

    Ok(body)
}

/// Deserializes a field so that a present `null` becomes `Some(Value::Null)`
/// while a missing field stays `None`. Use with `#[serde(default)]`.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Accepts the extracted text only if it is a non-blank string.
pub(crate) fn require_text(
    provider: &'static str,
    text: Option<Value>,
) -> Result<String, ProviderFailure> {
    match text {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text),
        _ => Err(ProviderFailure::EmptyResponse { provider }),
    }
}
