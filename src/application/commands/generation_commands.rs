//! Generation Commands - 生成流水线命令
//!
//! 表单值在边界处组装为结构化配置对象，由编排器统一校验

use chrono::{DateTime, Utc};

use crate::domain::project::{ChapterNumber, ChapterStatus, ProjectPath};
use crate::domain::settings::{EmbeddingConfig, LlmConfig};

/// 阶段 1: 生成小说架构
#[derive(Debug, Clone)]
pub struct GenerateArchitecture {
    pub llm: LlmConfig,
    pub project_path: String,
    pub topic: String,
    pub genre: String,
    pub chapter_count: u32,
    pub word_target: u32,
    pub guidance: String,
}

/// 生成架构响应
#[derive(Debug, Clone)]
pub struct GenerateArchitectureResponse {
    pub project: ProjectPath,
    pub architecture: String,
    /// 阶段 2 是否已开放
    pub blueprint_enabled: bool,
    pub completed_at: DateTime<Utc>,
}

/// 阶段 2: 生成章节蓝图
#[derive(Debug, Clone)]
pub struct GenerateBlueprint {
    pub llm: LlmConfig,
    pub project_path: String,
    pub chapter_count: u32,
    pub guidance: String,
}

/// 生成蓝图响应
#[derive(Debug, Clone)]
pub struct GenerateBlueprintResponse {
    pub project: ProjectPath,
    pub blueprint: String,
    /// 阶段 3 是否已开放
    pub draft_enabled: bool,
    pub completed_at: DateTime<Utc>,
}

/// 阶段 3: 生成章节草稿
#[derive(Debug, Clone)]
pub struct GenerateChapterDraft {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub project_path: String,
    pub chapter: u32,
    pub word_target: u32,
    pub guidance: String,
    pub characters_involved: String,
    pub key_items: String,
    pub scene_location: String,
    pub time_constraint: String,
}

/// 生成草稿响应
#[derive(Debug, Clone)]
pub struct GenerateChapterDraftResponse {
    pub project: ProjectPath,
    pub chapter: ChapterNumber,
    pub content: String,
    pub status: ChapterStatus,
    /// 当前章节指针，起草不会前移
    pub current_chapter: ChapterNumber,
    pub completed_at: DateTime<Utc>,
}

/// 阶段 4: 定稿章节
#[derive(Debug, Clone)]
pub struct FinalizeChapter {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub project_path: String,
    pub chapter: u32,
    pub word_target: u32,
    /// 用户编辑后的正文，优先于已保存的草稿
    pub chapter_text: String,
}

/// 定稿响应
#[derive(Debug, Clone)]
pub struct FinalizeChapterResponse {
    pub project: ProjectPath,
    pub chapter: ChapterNumber,
    pub status: ChapterStatus,
    /// 定稿成功后前移的当前章节指针
    pub next_chapter: ChapterNumber,
    pub completed_at: DateTime<Utc>,
}

/// 一致性检查
#[derive(Debug, Clone)]
pub struct CheckConsistency {
    pub llm: LlmConfig,
    pub project_path: String,
    pub chapter: u32,
    /// 未提供时读取已保存的章节正文
    pub chapter_text: Option<String>,
}

/// 一致性检查响应
#[derive(Debug, Clone)]
pub struct ConsistencyReport {
    pub project: ProjectPath,
    pub chapter: ChapterNumber,
    pub report: String,
    pub completed_at: DateTime<Utc>,
}
