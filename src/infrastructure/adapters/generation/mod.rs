//! Generation Adapters - 生成后端实现

mod llm_backend;
mod prompts;

pub use llm_backend::{chapter_outline, LlmGenerationBackend};
