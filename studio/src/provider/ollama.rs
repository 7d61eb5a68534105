//! Local Ollama `/api/generate` backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{classify_failure, http_client, retry_after, TextCompletionProvider};
use crate::error::{ProviderError, StudioError};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: String, model: String) -> Result<Self, StudioError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client: http_client()?,
        })
    }
}

#[async_trait]
impl TextCompletionProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let wait = retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure("Ollama", status, &body, wait));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(body.response)
    }
}
