//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Project Context: 小说项目、章节与生成流水线状态
//! - Settings Context: 模型服务配置与小说参数

pub mod project;
pub mod settings;

// 共享的检索工具
mod retrieval;

pub use retrieval::{
    cosine_similarity, split_passages, top_k, Passage, DEFAULT_MAX_PASSAGE_CHARS,
};
