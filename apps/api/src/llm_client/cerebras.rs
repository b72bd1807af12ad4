//! Cerebras adapter: choice-based chat completions protocol.
//!
//! Single non-streaming request, exactly one choice consumed:
//! `choices[0].message.content`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{present, require_text, send, ProviderAdapter, ProviderFailure, ProviderKind};

const CEREBRAS_API_URL: &str = "https://api.cerebras.ai/v1/chat/completions";
const PROVIDER: &str = "Cerebras";
/// Instruct model used for every Cerebras analysis. Hardcoded to prevent drift.
pub const MODEL: &str = "qwen-3-235b-a22b-instruct-2507";
const MAX_TOKENS: u32 = 20_000;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.8;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default, deserialize_with = "present")]
    content: Option<Value>,
}

impl ChatResponse {
    /// Walks `choices[0].message.content`. A missing level is a shape error;
    /// a present-but-null content is left for the emptiness check.
    fn into_content(self) -> Result<Option<Value>, &'static str> {
        let choice = self
            .choices
            .and_then(|choices| choices.into_iter().next())
            .ok_or("response contains no choices")?;
        let message = choice.message.ok_or("first choice has no message")?;
        message
            .content
            .map(Some)
            .ok_or("message has no content field")
    }
}

#[derive(Clone)]
pub struct CerebrasAdapter {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl CerebrasAdapter {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            url: CEREBRAS_API_URL.to_string(),
        }
    }

    /// Points the adapter at a different chat-completions endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl ProviderAdapter for CerebrasAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Cerebras
    }

    async fn call(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderFailure::NotConfigured { provider: PROVIDER })?;

        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            stream: false,
        };

        debug!("Sending prompt to Cerebras ({} chars)", prompt.len());
        let body = send(
            PROVIDER,
            self.client
                .post(&self.url)
                .bearer_auth(api_key)
                .json(&request_body),
        )
        .await?;

        let malformed = |detail: String| ProviderFailure::MalformedResponse {
            provider: PROVIDER,
            detail,
        };
        let response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| malformed(e.to_string()))?;
        let content = response
            .into_content()
            .map_err(|detail| malformed(detail.to_string()))?;

        let text = require_text(PROVIDER, content)?;
        debug!("Cerebras returned {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;

    fn adapter(server: &StubServer, api_key: Option<&str>) -> CerebrasAdapter {
        CerebrasAdapter::new(Client::new(), api_key.map(String::from)).with_url(&server.url)
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network_call() {
        let server = StubServer::spawn(200, "{}").await;
        let result = adapter(&server, None).call("prompt").await;
        assert_eq!(
            result,
            Err(ProviderFailure::NotConfigured { provider: PROVIDER })
        );
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn test_returns_first_choice_content_unmodified() {
        let body = r#"{"choices": [
            {"message": {"role": "assistant", "content": "Aquí está: {\"a\": 1}"}},
            {"message": {"role": "assistant", "content": "second"}}
        ]}"#;
        let server = StubServer::spawn(200, body).await;
        let text = adapter(&server, Some("key")).call("prompt").await.unwrap();
        assert_eq!(text, "Aquí está: {\"a\": 1}");
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_auth_and_sampling_parameters() {
        let server = StubServer::spawn(200, r#"{"choices":[{"message":{"content":"ok"}}]}"#).await;
        adapter(&server, Some("secret-key"))
            .call("analiza esto")
            .await
            .unwrap();

        let request = server.last_request();
        let lower = request.to_lowercase();
        assert!(lower.contains("authorization: bearer secret-key"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let sent: Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["model"], MODEL);
        assert_eq!(sent["max_tokens"], 20_000);
        assert_eq!(sent["stream"], false);
        assert_eq!(sent["messages"].as_array().unwrap().len(), 1);
        assert_eq!(sent["messages"][0]["role"], "user");
        assert_eq!(sent["messages"][0]["content"], "analiza esto");
        assert!((sent["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((sent["top_p"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_empty_choices_is_malformed() {
        let server = StubServer::spawn(200, r#"{"choices": []}"#).await;
        let result = adapter(&server, Some("key")).call("prompt").await;
        assert!(matches!(
            result,
            Err(ProviderFailure::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_message_or_content_is_malformed() {
        for body in [
            r#"{"choices": [{}]}"#,
            r#"{"choices": [{"message": {"role": "assistant"}}]}"#,
            r#"{"id": "x"}"#,
            "not json at all",
        ] {
            let server = StubServer::spawn(200, body).await;
            let result = adapter(&server, Some("key")).call("prompt").await;
            assert!(
                matches!(result, Err(ProviderFailure::MalformedResponse { .. })),
                "expected malformed for {body}, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_null_or_blank_content_is_empty_response() {
        for body in [
            r#"{"choices": [{"message": {"content": null}}]}"#,
            r#"{"choices": [{"message": {"content": "   "}}]}"#,
        ] {
            let server = StubServer::spawn(200, body).await;
            let result = adapter(&server, Some("key")).call("prompt").await;
            assert_eq!(
                result,
                Err(ProviderFailure::EmptyResponse { provider: PROVIDER })
            );
        }
    }

    #[tokio::test]
    async fn test_http_error_status_is_transport_error_with_api_message() {
        let server =
            StubServer::spawn(401, r#"{"error": {"message": "Wrong API Key"}}"#).await;
        let result = adapter(&server, Some("bad")).call("prompt").await;
        match result {
            Err(ProviderFailure::TransportError { detail, .. }) => {
                assert!(detail.contains("401"));
                assert!(detail.contains("Wrong API Key"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
        assert_eq!(server.hits(), 1, "no retries");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let adapter = CerebrasAdapter::new(Client::new(), Some("key".to_string()))
            .with_url("http://127.0.0.1:1/v1/chat/completions");
        let result = adapter.call("prompt").await;
        assert!(matches!(
            result,
            Err(ProviderFailure::TransportError { .. })
        ));
    }
}
