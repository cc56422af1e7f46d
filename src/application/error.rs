//! 应用层错误定义
//!
//! 编排器、配置处理器与查询统一返回的错误类型；界面层只负责展示，不做重试

use thiserror::Error;

use crate::application::ports::{
    BackendError, ConfigStoreError, GenerationStage, PersistenceError,
};
use crate::domain::project::{ChapterNumber, ProjectError};
use crate::domain::settings::SettingsError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 缺少必填输入或阶段门控未开放；不会调用后端，也不会修改任何状态
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部生成 / LLM / Embedding 服务失败
    #[error("Backend error during {stage}: {message}")]
    BackendError {
        stage: GenerationStage,
        message: String,
    },

    /// 文件读写失败
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// 配置文件不是合法 JSON
    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    /// 定稿时章节正文已保存，但摘要 / 角色状态更新失败，章节仍为草稿
    #[error("Chapter {chapter} saved as draft, finalization failed: {message}")]
    ChapterSavedNotFinalized {
        chapter: ChapterNumber,
        message: String,
    },
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建后端错误
    pub fn backend(stage: GenerationStage, err: BackendError) -> Self {
        Self::BackendError {
            stage,
            message: err.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::BackendError { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::PersistenceError(_))
    }
}

impl From<PersistenceError> for ApplicationError {
    fn from(err: PersistenceError) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl From<ConfigStoreError> for ApplicationError {
    fn from(err: ConfigStoreError) -> Self {
        match err {
            ConfigStoreError::Parse { .. } => Self::ConfigParseError(err.to_string()),
            other => Self::PersistenceError(other.to_string()),
        }
    }
}

impl From<ProjectError> for ApplicationError {
    fn from(err: ProjectError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<SettingsError> for ApplicationError {
    fn from(err: SettingsError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
