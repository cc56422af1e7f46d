//! Project Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    #[error("项目路径不能为空")]
    EmptyPath,

    #[error("无效的章节号: {0}")]
    InvalidChapterNumber(String),

    #[error("未知的项目文件: {0}")]
    UnknownFile(String),

    #[error("无效的章节状态: {0}")]
    InvalidStatus(String),
}
