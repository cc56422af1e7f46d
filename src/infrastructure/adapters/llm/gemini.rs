//! Gemini Client - Google Generative Language API
//!
//! API:
//! POST {base_url}/models/{model}:generateContent?key={api_key}
//! POST {base_url}/models/{model}:batchEmbedContents?key={api_key}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::{build_client, send_json, EMBEDDING_TIMEOUT_SECS};
use crate::application::ports::{BackendError, EmbeddingClientPort, LlmClientPort};
use crate::domain::settings::{EmbeddingConfig, LlmConfig};

pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, BackendError> {
        let content = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| BackendError::InvalidResponse("response has no candidates".to_string()))?;
        Ok(content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}

/// 模型名统一加上 `models/` 前缀
fn full_model_name(model: &str) -> String {
    let model = model.trim();
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

fn resolve_base_url(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    if raw.is_empty() {
        GEMINI_DEFAULT_BASE_URL.to_string()
    } else {
        raw.to_string()
    }
}

/// Gemini 文本生成客户端
pub struct GeminiClient {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            base_url: resolve_base_url(&config.base_url),
            config: config.clone(),
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url,
            full_model_name(&self.config.model_name)
        )
    }
}

#[async_trait]
impl LlmClientPort for GeminiClient {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        };

        tracing::debug!(
            url = %self.generate_url(),
            prompt_chars = prompt.chars().count(),
            "Sending Gemini generateContent request"
        );

        let response: GenerateResponse = send_json(
            self.client
                .post(self.generate_url())
                .query(&[("key", self.config.api_key.trim())])
                .json(&request),
        )
        .await?;

        response.into_text()
    }
}

/// Gemini Embedding 客户端
pub struct GeminiEmbeddingClient {
    client: Client,
    config: EmbeddingConfig,
    base_url: String,
}

impl GeminiEmbeddingClient {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(EMBEDDING_TIMEOUT_SECS)?,
            base_url: resolve_base_url(&config.base_url),
            config: config.clone(),
        })
    }
}

#[async_trait]
impl EmbeddingClientPort for GeminiEmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = full_model_name(&self.config.model_name);
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: model.clone(),
                    content: Content {
                        parts: vec![Part { text: text.clone() }],
                    },
                })
                .collect(),
        };

        let url = format!("{}/{}:batchEmbedContents", self.base_url, model);
        let response: BatchEmbedResponse = send_json(
            self.client
                .post(url)
                .query(&[("key", self.config.api_key.trim())])
                .json(&request),
        )
        .await?;

        if response.embeddings.len() != texts.len() {
            return Err(BackendError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_model_name() {
        assert_eq!(full_model_name("gemini-1.5-pro"), "models/gemini-1.5-pro");
        assert_eq!(full_model_name("models/text-embedding-004"), "models/text-embedding-004");
    }

    #[test]
    fn test_generate_url_uses_default_base() {
        let config = LlmConfig {
            interface_format: "Gemini".to_string(),
            base_url: String::new(),
            model_name: "gemini-1.5-flash".to_string(),
            ..LlmConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_parse_generate_response_joins_parts() {
        let json = r#"{"candidates": [{"content": {"parts": [{"text": "第一"}, {"text": "段"}], "role": "model"}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text().unwrap(), "第一段");
    }

    #[test]
    fn test_blocked_response_is_invalid() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_text().is_err());
    }

    #[test]
    fn test_generate_request_uses_camel_case() {
        let request = GenerateRequest {
            contents: vec![],
            generation_config: GenerationConfig {
                max_output_tokens: 100,
                temperature: 0.5,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 100);
    }
}
