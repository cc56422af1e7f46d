//! Config Command Handlers - 全局配置与项目参数

use std::sync::Arc;

use crate::application::commands::{SaveGlobalConfig, SaveProjectParams};
use crate::application::error::ApplicationError;
use crate::application::input::project_path;
use crate::application::ports::{ConfigStoreError, ConfigStorePort};
use crate::application::queries::LoadProjectParams;
use crate::domain::settings::{resolve_novel_params, GlobalConfig, NovelParams};

/// 全局配置的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// 从配置文件读取
    File,
    /// 配置文件不存在，使用内置默认值
    Defaults,
    /// 配置文件无法解析，使用内置默认值
    ParseFallback,
}

/// 全局配置读取结果
#[derive(Debug, Clone)]
pub struct GlobalConfigLoad {
    pub config: GlobalConfig,
    pub origin: ConfigOrigin,
}

/// ConfigHandler - 配置读写
pub struct ConfigHandler {
    store: Arc<dyn ConfigStorePort>,
}

impl ConfigHandler {
    pub fn new(store: Arc<dyn ConfigStorePort>) -> Self {
        Self { store }
    }

    /// 读取全局配置
    ///
    /// 文件缺失或损坏都不会中断启动，回退到默认配置
    pub async fn load_global(&self) -> Result<GlobalConfigLoad, ApplicationError> {
        match self.store.load_global().await {
            Ok(Some(config)) => Ok(GlobalConfigLoad {
                config,
                origin: ConfigOrigin::File,
            }),
            Ok(None) => {
                tracing::info!("Global config not found, using defaults");
                Ok(GlobalConfigLoad {
                    config: GlobalConfig::default(),
                    origin: ConfigOrigin::Defaults,
                })
            }
            Err(e @ ConfigStoreError::Parse { .. }) => {
                tracing::warn!(error = %e, "Global config is malformed, using defaults");
                Ok(GlobalConfigLoad {
                    config: GlobalConfig::default(),
                    origin: ConfigOrigin::ParseFallback,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 保存全局配置：当前服务商条目写入并激活，其余条目保留
    pub async fn save_global(
        &self,
        command: SaveGlobalConfig,
    ) -> Result<GlobalConfig, ApplicationError> {
        command.llm.interface()?;
        command.embedding.interface()?;

        let mut config = self.load_global().await?.config;
        config.upsert_llm(command.llm);
        config.upsert_embedding(command.embedding);
        self.store.save_global(&config).await?;

        tracing::info!(
            llm = %config.last_interface_format,
            embedding = %config.last_embedding_interface_format,
            "Global config saved"
        );

        Ok(config)
    }

    /// 读取项目参数
    ///
    /// 项目文件优先，其次是旧版全局配置里的 `other_params`，最后是默认值
    pub async fn load_project_params(
        &self,
        query: LoadProjectParams,
        legacy: Option<&NovelParams>,
    ) -> Result<NovelParams, ApplicationError> {
        let project = project_path(&query.project_path)?;
        let stored = match self.store.load_project_params(&project).await {
            Ok(stored) => stored,
            Err(e @ ConfigStoreError::Parse { .. }) => {
                tracing::warn!(project = %project, error = %e, "Project params are malformed, ignoring");
                None
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            project = %project,
            from_project = stored.is_some(),
            from_legacy = stored.is_none() && legacy.is_some(),
            "Project params loaded"
        );

        let mut params = resolve_novel_params(stored, legacy);
        params.filepath = project.to_string();
        Ok(params)
    }

    pub async fn save_project_params(
        &self,
        command: SaveProjectParams,
    ) -> Result<(), ApplicationError> {
        let project = project_path(&command.project_path)?;
        let mut params = command.params;
        params.filepath = project.to_string();
        self.store.save_project_params(&project, &params).await?;

        tracing::info!(project = %project, topic = %params.topic, "Project params saved");
        Ok(())
    }
}
