//! Settings Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("未知的接口类型: {0}")]
    UnknownInterface(String),

    #[error("无效的 Base URL: {0}")]
    InvalidBaseUrl(String),
}
