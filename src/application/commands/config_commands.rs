//! Config Commands - 配置相关命令

use crate::domain::settings::{EmbeddingConfig, LlmConfig, NovelParams};

/// 保存全局配置（写入并激活当前表单中的服务商条目）
#[derive(Debug, Clone)]
pub struct SaveGlobalConfig {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
}

/// 保存项目参数到 `novel_config.json`
#[derive(Debug, Clone)]
pub struct SaveProjectParams {
    pub project_path: String,
    pub params: NovelParams,
}

/// 测试 LLM 配置
#[derive(Debug, Clone)]
pub struct TestLlmConfig {
    pub llm: LlmConfig,
}

/// 测试 Embedding 配置
#[derive(Debug, Clone)]
pub struct TestEmbeddingConfig {
    pub embedding: EmbeddingConfig,
}

/// 保存项目内的单个逻辑文件（手工编辑后的架构、蓝图等）
#[derive(Debug, Clone)]
pub struct SaveProjectFile {
    pub project_path: String,
    pub file_name: String,
    pub content: String,
}
