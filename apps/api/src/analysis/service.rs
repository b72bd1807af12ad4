//! FeasibilityService: build prompt → call provider → extract JSON.
//!
//! The returned document is NOT schema-checked here; callers go through
//! `FeasibilityReport::from_value` before trusting scores.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::extract::{extract_json, StructuredObject};
use crate::analysis::prompts::{build_prompt, ValidationFailure};
use crate::config::Config;
use crate::llm_client::{
    CerebrasAdapter, GeminiAdapter, ProviderAdapter, ProviderFailure, ProviderKind,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceFailure {
    #[error("unsupported provider '{0}'")]
    UnsupportedProvider(String),

    #[error("invalid problem description: {0}")]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Provider(#[from] ProviderFailure),

    #[error("no valid JSON could be recovered from the model response")]
    Extraction,
}

pub struct FeasibilityService {
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl FeasibilityService {
    pub fn new(adapters: impl IntoIterator<Item = Arc<dyn ProviderAdapter>>) -> Self {
        Self {
            adapters: adapters
                .into_iter()
                .map(|adapter| (adapter.kind(), adapter))
                .collect(),
        }
    }

    /// Both adapters, sharing one HTTP client. Keys are injected, never read here.
    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new([
            Arc::new(CerebrasAdapter::new(
                client.clone(),
                config.cerebras_api_key.clone(),
            )) as Arc<dyn ProviderAdapter>,
            Arc::new(GeminiAdapter::new(client, config.gemini_api_key.clone())),
        ])
    }

    pub async fn analyze(
        &self,
        provider: &str,
        problem: &str,
    ) -> Result<StructuredObject, ServiceFailure> {
        let adapter = provider
            .parse::<ProviderKind>()
            .ok()
            .and_then(|kind| self.adapters.get(&kind))
            .ok_or_else(|| ServiceFailure::UnsupportedProvider(provider.to_string()))?;

        let prompt = build_prompt(problem)?;

        let raw = adapter.call(&prompt).await.map_err(|e| {
            warn!("Provider call failed: {e}");
            ServiceFailure::from(e)
        })?;

        let report = extract_json(&raw).ok_or_else(|| {
            warn!(
                "Could not recover JSON from {} response ({} chars)",
                adapter.kind(),
                raw.len()
            );
            ServiceFailure::Extraction
        })?;

        info!("Analysis completed with {}", adapter.kind());
        Ok(report)
    }
}
