//! Settings Context - 配置限界上下文
//!
//! 职责:
//! - 全局 LLM / Embedding 服务配置
//! - 项目级小说参数
//! - 服务商接口类型与 Base URL 规范化

mod errors;
mod provider;
mod value_objects;

pub use errors::SettingsError;
pub use provider::{normalize_base_url, InterfaceFormat};
pub use value_objects::{
    resolve_novel_params, EmbeddingConfig, GlobalConfig, LlmConfig, NovelParams,
    DEFAULT_BASE_URL, DEFAULT_EMBEDDING_MODEL, DEFAULT_INTERFACE, DEFAULT_LLM_MODEL,
};
