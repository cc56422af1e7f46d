//! Fake Model Clients - 用于测试与离线运行的模型客户端
//!
//! 不发起任何网络请求

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{
    BackendError, ClientProviderPort, EmbeddingClientPort, LlmClientPort,
};
use crate::domain::settings::{EmbeddingConfig, LlmConfig};

/// Fake LLM 客户端
///
/// 固定回复，或固定失败
#[derive(Debug, Clone)]
pub struct FakeLlmClient {
    reply: Result<String, BackendError>,
}

impl FakeLlmClient {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
        }
    }

    pub fn failing(err: BackendError) -> Self {
        Self { reply: Err(err) }
    }
}

#[async_trait]
impl LlmClientPort for FakeLlmClient {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        tracing::debug!(
            prompt_chars = prompt.chars().count(),
            "FakeLlmClient: returning fixed reply"
        );
        self.reply.clone()
    }
}

/// Fake Embedding 客户端
///
/// 向量由文本内容确定性地生成：相同文本得到相同向量
#[derive(Debug, Clone)]
pub struct FakeEmbeddingClient {
    dimension: usize,
    error: Option<BackendError>,
}

impl FakeEmbeddingClient {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            error: None,
        }
    }

    pub fn failing(err: BackendError) -> Self {
        Self {
            dimension: 0,
            error: Some(err),
        }
    }

    /// 按字符累加到各维度
    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }
        for c in text.chars() {
            vector[(c as usize) % self.dimension] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingClientPort for FakeEmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }
}

/// 始终返回同一组 Fake 客户端的工厂
pub struct FakeClientProvider {
    llm: Arc<FakeLlmClient>,
    embedding: Arc<FakeEmbeddingClient>,
}

impl FakeClientProvider {
    pub fn new(llm: FakeLlmClient, embedding: FakeEmbeddingClient) -> Self {
        Self {
            llm: Arc::new(llm),
            embedding: Arc::new(embedding),
        }
    }
}

impl ClientProviderPort for FakeClientProvider {
    fn llm(&self, _config: &LlmConfig) -> Result<Arc<dyn LlmClientPort>, BackendError> {
        Ok(self.llm.clone())
    }

    fn embedding(
        &self,
        _config: &EmbeddingConfig,
    ) -> Result<Arc<dyn EmbeddingClientPort>, BackendError> {
        Ok(self.embedding.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_embedding_is_deterministic() {
        let client = FakeEmbeddingClient::new(16);
        let texts = vec!["灯塔".to_string(), "灯塔".to_string(), "海浪".to_string()];
        let vectors = client.embed(&texts).await.unwrap();
        assert_eq!(vectors[0], vectors[1]);
        assert_ne!(vectors[0], vectors[2]);
        assert_eq!(vectors[0].len(), 16);
    }
}
