//! Embedding Clients - OpenAI 兼容与 Ollama
//!
//! API:
//! - OpenAI 兼容: POST {base_url}/embeddings  {"model": "...", "input": [...]}
//! - Ollama:      POST {host}/api/embed       {"model": "...", "input": [...]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::{build_client, send_json, EMBEDDING_TIMEOUT_SECS};
use crate::application::ports::{BackendError, EmbeddingClientPort};
use crate::domain::settings::{normalize_base_url, EmbeddingConfig, InterfaceFormat};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    #[serde(default)]
    data: Vec<OpenAiEmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddingResponse {
    /// 按 `index` 还原输入顺序
    fn into_vectors(mut self, expected: usize) -> Result<Vec<Vec<f32>>, BackendError> {
        if self.data.len() != expected {
            return Err(BackendError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                expected,
                self.data.len()
            )));
        }
        self.data.sort_by_key(|item| item.index);
        Ok(self.data.into_iter().map(|item| item.embedding).collect())
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

/// OpenAI 兼容 Embedding 客户端
pub struct OpenAiEmbeddingClient {
    client: Client,
    config: EmbeddingConfig,
    base_url: String,
}

impl OpenAiEmbeddingClient {
    pub fn new(config: &EmbeddingConfig, format: InterfaceFormat) -> Result<Self, BackendError> {
        let base_url = if format.uses_raw_base_url() {
            config.base_url.trim().trim_end_matches('/').to_string()
        } else {
            normalize_base_url(&config.base_url)
                .trim_end_matches('/')
                .to_string()
        };
        if base_url.is_empty() {
            return Err(BackendError::ServiceError(format!(
                "{} embedding base_url is empty",
                format
            )));
        }

        Ok(Self {
            client: build_client(EMBEDDING_TIMEOUT_SECS)?,
            config: config.clone(),
            base_url,
        })
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }
}

#[async_trait]
impl EmbeddingClientPort for OpenAiEmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            url = %self.embeddings_url(),
            model = %self.config.model_name,
            inputs = texts.len(),
            "Sending embedding request"
        );

        let response: OpenAiEmbeddingResponse = send_json(
            self.client
                .post(self.embeddings_url())
                .bearer_auth(self.config.api_key.trim())
                .json(&EmbeddingRequest {
                    model: &self.config.model_name,
                    input: texts,
                }),
        )
        .await?;

        response.into_vectors(texts.len())
    }
}

/// Ollama Embedding 客户端
pub struct OllamaEmbeddingClient {
    client: Client,
    config: EmbeddingConfig,
    host: String,
}

impl OllamaEmbeddingClient {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(EMBEDDING_TIMEOUT_SECS)?,
            host: ollama_host(&config.base_url),
            config: config.clone(),
        })
    }
}

/// 去掉为 OpenAI 兼容接口填写的 `/v1` 与 `/api` 后缀
fn ollama_host(base_url: &str) -> String {
    let mut host = base_url.trim().trim_end_matches('/');
    for suffix in ["/v1", "/api"] {
        if let Some(stripped) = host.strip_suffix(suffix) {
            host = stripped;
        }
    }
    if host.is_empty() {
        "http://localhost:11434".to_string()
    } else {
        host.to_string()
    }
}

#[async_trait]
impl EmbeddingClientPort for OllamaEmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response: OllamaEmbeddingResponse = send_json(
            self.client
                .post(format!("{}/api/embed", self.host))
                .json(&EmbeddingRequest {
                    model: &self.config.model_name,
                    input: texts,
                }),
        )
        .await?;

        if response.embeddings.len() != texts.len() {
            return Err(BackendError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }
        Ok(response.embeddings)
    }
}
