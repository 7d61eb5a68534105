//! Google Gemini `generateContent` backend.

use async_trait::async_trait;
use serde_json::Value;

use super::{classify_failure, http_client, retry_after, TextCompletionProvider};
use crate::error::{ProviderError, StudioError};

pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, StudioError> {
        Ok(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextCompletionProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request_body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let wait = retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure("Gemini", status, &body, wait));
        }

        let resp_json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        candidate_text(&resp_json).ok_or_else(|| {
            ProviderError::InvalidResponse("Gemini response has no candidate text".to_string())
        })
    }
}

/// Concatenated text parts of the first candidate.
fn candidate_text(resp: &Value) -> Option<String> {
    let parts = resp["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_text_joins_parts() {
        let resp = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"message\":" }, { "text": " \"hi\"}" }] }
            }]
        });
        assert_eq!(candidate_text(&resp).unwrap(), "{\"message\": \"hi\"}");
    }

    #[test]
    fn test_candidate_text_missing() {
        assert!(candidate_text(&serde_json::json!({ "candidates": [] })).is_none());
        assert!(candidate_text(&serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": {} }] } }]
        }))
        .is_none());
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = GeminiProvider::new(
            "k".into(),
            "gemini-2.5-flash".into(),
            "https://generativelanguage.googleapis.com/".into(),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_connection_failure_keeps_key_out_of_error() {
        let provider = GeminiProvider::new(
            "SECRETKEY123".into(),
            "m".into(),
            "http://127.0.0.1:1".into(),
        )
        .unwrap();

        let err = provider.complete("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
        assert!(!err.to_string().contains("SECRETKEY123"));
    }
}
