//! Validation Command Handlers - 服务连通性探测
//!
//! 每次探测只做一次往返，不重试；超时由客户端按配置控制。探测结果仅供展示，不写入任何文件

use std::sync::Arc;

use crate::application::commands::{TestEmbeddingConfig, TestLlmConfig};
use crate::application::ports::{BackendError, ClientProviderPort};

pub const LLM_PROBE_PROMPT: &str = "Please reply 'OK'";
pub const EMBEDDING_PROBE_TEXT: &str = "这是一个测试文本";

/// 探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome<T> {
    Ok(T),
    Failed { diagnostic: String },
}

impl<T> ProbeOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    fn failed(err: impl std::fmt::Display) -> Self {
        Self::Failed {
            diagnostic: err.to_string(),
        }
    }
}

/// ConfigValidator - 测试 LLM / Embedding 配置
pub struct ConfigValidator {
    provider: Arc<dyn ClientProviderPort>,
}

impl ConfigValidator {
    pub fn new(provider: Arc<dyn ClientProviderPort>) -> Self {
        Self { provider }
    }

    /// 成功时返回模型回复
    pub async fn test_llm(&self, command: TestLlmConfig) -> ProbeOutcome<String> {
        tracing::info!(config = %command.llm.describe(), "Testing LLM config");

        let result = match self.provider.llm(&command.llm) {
            Ok(client) => client.invoke(LLM_PROBE_PROMPT).await,
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(reply) if !reply.trim().is_empty() => ProbeOutcome::Ok(reply.trim().to_string()),
            Ok(_) => ProbeOutcome::failed(BackendError::EmptyResponse),
            Err(e) => ProbeOutcome::failed(e),
        };

        match &outcome {
            ProbeOutcome::Ok(reply) => tracing::info!(reply = %reply, "LLM config test passed"),
            ProbeOutcome::Failed { diagnostic } => {
                tracing::warn!(diagnostic = %diagnostic, "LLM config test failed")
            }
        }
        outcome
    }

    /// 成功时返回向量维度
    pub async fn test_embedding(&self, command: TestEmbeddingConfig) -> ProbeOutcome<usize> {
        tracing::info!(
            interface = %command.embedding.interface_format,
            model = %command.embedding.model_name,
            base_url = %command.embedding.base_url,
            "Testing embedding config"
        );

        let result = match self.provider.embedding(&command.embedding) {
            Ok(client) => client.embed_query(EMBEDDING_PROBE_TEXT).await,
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(vector) if !vector.is_empty() => ProbeOutcome::Ok(vector.len()),
            Ok(_) => ProbeOutcome::failed(BackendError::EmptyResponse),
            Err(e) => ProbeOutcome::failed(e),
        };

        match &outcome {
            ProbeOutcome::Ok(dimension) => {
                tracing::info!(dimension = dimension, "Embedding config test passed")
            }
            ProbeOutcome::Failed { diagnostic } => {
                tracing::warn!(diagnostic = %diagnostic, "Embedding config test failed")
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::{EmbeddingConfig, LlmConfig};
    use crate::infrastructure::adapters::{FakeClientProvider, FakeEmbeddingClient, FakeLlmClient};

    fn validator(llm: FakeLlmClient, embedding: FakeEmbeddingClient) -> ConfigValidator {
        ConfigValidator::new(Arc::new(FakeClientProvider::new(llm, embedding)))
    }

    #[tokio::test]
    async fn test_llm_probe_ok() {
        let validator = validator(FakeLlmClient::replying(" OK \n"), FakeEmbeddingClient::new(8));
        let outcome = validator
            .test_llm(TestLlmConfig { llm: LlmConfig::default() })
            .await;
        assert_eq!(outcome, ProbeOutcome::Ok("OK".to_string()));
    }

    #[tokio::test]
    async fn test_llm_probe_reports_diagnostic() {
        let validator = validator(
            FakeLlmClient::failing(BackendError::ServiceError("HTTP 401: invalid api key".into())),
            FakeEmbeddingClient::new(8),
        );
        let outcome = validator
            .test_llm(TestLlmConfig { llm: LlmConfig::default() })
            .await;
        match outcome {
            ProbeOutcome::Failed { diagnostic } => assert!(diagnostic.contains("401")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_llm_probe_blank_reply_fails() {
        let validator = validator(FakeLlmClient::replying("   "), FakeEmbeddingClient::new(8));
        let outcome = validator
            .test_llm(TestLlmConfig { llm: LlmConfig::default() })
            .await;
        assert!(!outcome.is_ok());
    }

    #[tokio::test]
    async fn test_embedding_probe_reports_dimension() {
        let validator = validator(FakeLlmClient::replying("OK"), FakeEmbeddingClient::new(1536));
        let outcome = validator
            .test_embedding(TestEmbeddingConfig {
                embedding: EmbeddingConfig::default(),
            })
            .await;
        assert_eq!(outcome, ProbeOutcome::Ok(1536));
    }

    #[tokio::test]
    async fn test_embedding_probe_empty_vector_fails() {
        let validator = validator(FakeLlmClient::replying("OK"), FakeEmbeddingClient::new(0));
        let outcome = validator
            .test_embedding(TestEmbeddingConfig {
                embedding: EmbeddingConfig::default(),
            })
            .await;
        assert!(!outcome.is_ok());
    }
}
