//! Generation Backend Port - 生成后端抽象
//!
//! 架构、蓝图、章节草稿、定稿与一致性检查的外部生成能力
//! 后端只负责"文本进、文本出"，读取项目文件与持久化结果由编排器完成

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::project::{ChapterNumber, ProjectPath};
use crate::domain::settings::{EmbeddingConfig, LlmConfig};

/// 后端错误
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Backend returned empty content")]
    EmptyResponse,

    #[error("Unsupported provider: {0}")]
    Unsupported(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_connect() {
            BackendError::NetworkError(format!("Cannot connect to model service: {}", err))
        } else if err.is_decode() {
            BackendError::InvalidResponse(err.to_string())
        } else {
            BackendError::NetworkError(err.to_string())
        }
    }
}

/// 生成流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Architecture,
    Blueprint,
    Draft,
    Finalize,
    Consistency,
}

impl GenerationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStage::Architecture => "architecture",
            GenerationStage::Blueprint => "blueprint",
            GenerationStage::Draft => "draft",
            GenerationStage::Finalize => "finalize",
            GenerationStage::Consistency => "consistency",
        }
    }
}

impl std::fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 架构生成请求
#[derive(Debug, Clone)]
pub struct ArchitectureRequest {
    pub project: ProjectPath,
    pub topic: String,
    pub genre: String,
    pub chapter_count: u32,
    pub word_target: u32,
    pub guidance: String,
}

/// 蓝图生成请求
#[derive(Debug, Clone)]
pub struct BlueprintRequest {
    pub project: ProjectPath,
    pub architecture: String,
    pub chapter_count: u32,
    pub guidance: String,
}

/// 草稿生成请求
#[derive(Debug, Clone)]
pub struct DraftRequest {
    pub project: ProjectPath,
    pub chapter: ChapterNumber,
    pub word_target: u32,
    pub guidance: String,
    pub characters_involved: String,
    pub key_items: String,
    pub scene_location: String,
    pub time_constraint: String,
    pub architecture: String,
    pub blueprint: String,
    pub global_summary: String,
    pub character_state: String,
    /// 编号小于当前章节的已有章节，升序
    pub previous_chapters: Vec<(ChapterNumber, String)>,
}

/// 定稿请求
#[derive(Debug, Clone)]
pub struct FinalizeRequest {
    pub project: ProjectPath,
    pub chapter: ChapterNumber,
    pub word_target: u32,
    pub chapter_text: String,
    pub global_summary: String,
    pub character_state: String,
}

/// 定稿后需要持久化的簿记内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeUpdate {
    pub character_state: String,
    pub global_summary: String,
}

/// 一致性检查请求
#[derive(Debug, Clone)]
pub struct ConsistencyRequest {
    pub project: ProjectPath,
    pub chapter: ChapterNumber,
    pub novel_setting: String,
    pub character_state: String,
    pub global_summary: String,
    pub chapter_text: String,
}

/// Generation Backend Port
///
/// 每个方法对应一次外部调用，失败时返回错误，不做重试
#[async_trait]
pub trait GenerationBackendPort: Send + Sync {
    async fn generate_architecture(
        &self,
        llm: &LlmConfig,
        request: &ArchitectureRequest,
    ) -> Result<String, BackendError>;

    async fn generate_blueprint(
        &self,
        llm: &LlmConfig,
        request: &BlueprintRequest,
    ) -> Result<String, BackendError>;

    async fn generate_chapter_draft(
        &self,
        llm: &LlmConfig,
        embedding: &EmbeddingConfig,
        request: &DraftRequest,
    ) -> Result<String, BackendError>;

    async fn finalize_chapter(
        &self,
        llm: &LlmConfig,
        embedding: &EmbeddingConfig,
        request: &FinalizeRequest,
    ) -> Result<FinalizeUpdate, BackendError>;

    async fn check_consistency(
        &self,
        llm: &LlmConfig,
        request: &ConsistencyRequest,
    ) -> Result<String, BackendError>;
}
