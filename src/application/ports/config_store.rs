//! Config Store Port - 出站端口
//!
//! 全局配置与项目参数两种作用域的持久化接口

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::project::ProjectPath;
use crate::domain::settings::{GlobalConfig, NovelParams};

/// 配置存储错误
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("IO error at {path}: {message}")]
    IoError { path: String, message: String },

    /// 配置文件不是合法 JSON
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Config Store Port
#[async_trait]
pub trait ConfigStorePort: Send + Sync {
    /// 读取全局配置，文件不存在时返回 `None`（由调用方替换为默认值）
    async fn load_global(&self) -> Result<Option<GlobalConfig>, ConfigStoreError>;

    /// 保存全局配置
    async fn save_global(&self, config: &GlobalConfig) -> Result<(), ConfigStoreError>;

    /// 读取项目参数，文件不存在时返回 `None`
    async fn load_project_params(
        &self,
        project: &ProjectPath,
    ) -> Result<Option<NovelParams>, ConfigStoreError>;

    /// 保存项目参数，项目目录不存在时创建
    async fn save_project_params(
        &self,
        project: &ProjectPath,
        params: &NovelParams,
    ) -> Result<(), ConfigStoreError>;
}
