//! Model Client Port - LLM / Embedding 客户端抽象
//!
//! 具体实现在 infrastructure/adapters/llm（HTTP）

use async_trait::async_trait;
use std::sync::Arc;

use super::BackendError;
use crate::domain::settings::{EmbeddingConfig, LlmConfig};

/// LLM 客户端
#[async_trait]
pub trait LlmClientPort: Send + Sync {
    /// 发送单条提示词，返回完整回复文本
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Embedding 客户端
#[async_trait]
pub trait EmbeddingClientPort: Send + Sync {
    /// 批量生成向量，返回顺序与输入一致
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, BackendError> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| BackendError::InvalidResponse("no embedding returned".to_string()))
    }
}

/// 按配置构造客户端
///
/// 配置随每次调用传入，客户端不在会话间共享
pub trait ClientProviderPort: Send + Sync {
    fn llm(&self, config: &LlmConfig) -> Result<Arc<dyn LlmClientPort>, BackendError>;

    fn embedding(
        &self,
        config: &EmbeddingConfig,
    ) -> Result<Arc<dyn EmbeddingClientPort>, BackendError>;
}
