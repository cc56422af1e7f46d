//! Project Store Port - 出站端口
//!
//! 定义单个小说项目的文件持久化接口
//! 具体实现在 infrastructure 层（文件系统）

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::project::{ChapterNumber, ChapterStatus, ProjectFile, ProjectPath};

/// 持久化错误
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error at {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Corrupt status file {path}: {message}")]
    CorruptStatusFile { path: String, message: String },
}

impl PersistenceError {
    pub fn io(path: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Self::IoError {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

/// Project Store Port
///
/// 读取不存在的文件返回 `None` 而非错误；写入为整体覆盖，父目录按需创建
#[async_trait]
pub trait ProjectStorePort: Send + Sync {
    /// 读取逻辑文件
    async fn read(
        &self,
        project: &ProjectPath,
        file: ProjectFile,
    ) -> Result<Option<String>, PersistenceError>;

    /// 覆盖写入逻辑文件
    async fn write(
        &self,
        project: &ProjectPath,
        file: ProjectFile,
        text: &str,
    ) -> Result<(), PersistenceError>;

    /// 扫描章节目录，返回升序章节号；不符合命名规则的文件被忽略
    async fn list_chapters(&self, project: &ProjectPath)
        -> Result<Vec<ChapterNumber>, PersistenceError>;

    /// 完整的章节状态表
    async fn chapter_statuses(
        &self,
        project: &ProjectPath,
    ) -> Result<BTreeMap<ChapterNumber, ChapterStatus>, PersistenceError>;

    /// 章节状态，没有记录时为 `Draft`
    async fn chapter_status(
        &self,
        project: &ProjectPath,
        chapter: ChapterNumber,
    ) -> Result<ChapterStatus, PersistenceError> {
        let statuses = self.chapter_statuses(project).await?;
        Ok(statuses.get(&chapter).copied().unwrap_or_default())
    }

    /// 更新章节状态（对整张状态表读改写，最后写入者生效）
    async fn set_chapter_status(
        &self,
        project: &ProjectPath,
        chapter: ChapterNumber,
        status: ChapterStatus,
    ) -> Result<(), PersistenceError>;

    /// 读取文件并把纯空白内容视为不存在
    async fn read_non_empty(
        &self,
        project: &ProjectPath,
        file: ProjectFile,
    ) -> Result<Option<String>, PersistenceError> {
        Ok(self
            .read(project, file)
            .await?
            .filter(|text| !text.trim().is_empty()))
    }
}
