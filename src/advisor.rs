//! Free-text commentary from a local Ollama model.
//!
//! One request, one response. Latency and failure behavior belong to the
//! model server, not to this client: there is no retry and no timeout.

use crate::config::AdvisorConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &AdvisorConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Ask the model for fundamental-analysis commentary on `symbol`.
    pub async fn commentary(&self, symbol: &str) -> Result<String> {
        let prompt = format!(
            "Give me information about {} from 2021-01-01 to nowadays.",
            symbol.to_uppercase()
        );
        self.generate(prompt).await
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        debug!("requesting commentary from {} ({})", url, self.model);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("model server unreachable")?
            .error_for_status()
            .context("model server rejected the request")?;

        let body: GenerateResponse = response
            .json()
            .await
            .context("unexpected model server response")?;

        Ok(body.response)
    }
}
