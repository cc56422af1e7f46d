//! HTTP Client Provider - 按接口类型选择客户端实现
//!
//! 实现 ClientProviderPort trait

use std::sync::Arc;

use super::{
    AzureOpenAiClient, GeminiClient, GeminiEmbeddingClient, OllamaEmbeddingClient,
    OpenAiCompatibleClient, OpenAiEmbeddingClient,
};
use crate::application::ports::{
    BackendError, ClientProviderPort, EmbeddingClientPort, LlmClientPort,
};
use crate::domain::settings::{EmbeddingConfig, InterfaceFormat, LlmConfig};

/// HTTP 客户端工厂
#[derive(Debug, Default, Clone)]
pub struct HttpClientProvider;

impl HttpClientProvider {
    pub fn new() -> Self {
        Self
    }
}

fn parse_format(raw: &str) -> Result<InterfaceFormat, BackendError> {
    raw.parse::<InterfaceFormat>()
        .map_err(|e| BackendError::Unsupported(e.to_string()))
}

impl ClientProviderPort for HttpClientProvider {
    fn llm(&self, config: &LlmConfig) -> Result<Arc<dyn LlmClientPort>, BackendError> {
        let format = parse_format(&config.interface_format)?;
        let client: Arc<dyn LlmClientPort> = match format {
            InterfaceFormat::Gemini => Arc::new(GeminiClient::new(config)?),
            InterfaceFormat::AzureOpenAi => Arc::new(AzureOpenAiClient::openai(config)?),
            InterfaceFormat::AzureAi => Arc::new(AzureOpenAiClient::ai_inference(config)?),
            other => Arc::new(OpenAiCompatibleClient::new(config, other)?),
        };

        tracing::debug!(interface = %format, model = %config.model_name, "LLM client created");
        Ok(client)
    }

    fn embedding(
        &self,
        config: &EmbeddingConfig,
    ) -> Result<Arc<dyn EmbeddingClientPort>, BackendError> {
        let format = parse_format(&config.interface_format)?;
        let client: Arc<dyn EmbeddingClientPort> = match format {
            InterfaceFormat::Ollama => Arc::new(OllamaEmbeddingClient::new(config)?),
            InterfaceFormat::Gemini => Arc::new(GeminiEmbeddingClient::new(config)?),
            InterfaceFormat::AzureOpenAi | InterfaceFormat::AzureAi => {
                return Err(BackendError::Unsupported(format!(
                    "{} embeddings",
                    format
                )))
            }
            other => Arc::new(OpenAiEmbeddingClient::new(config, other)?),
        };

        tracing::debug!(interface = %format, model = %config.model_name, "Embedding client created");
        Ok(client)
    }
}
