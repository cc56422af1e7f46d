//! JSON Config Store - 配置文件存储实现
//!
//! 实现 ConfigStorePort trait
//! - 全局配置: 启动时指定的 `config.json`
//! - 项目参数: `<project>/novel_config.json`

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ConfigStoreError, ConfigStorePort};
use crate::domain::project::ProjectPath;
use crate::domain::settings::{GlobalConfig, NovelParams};

/// 项目参数文件名
pub const PROJECT_PARAMS_FILE: &str = "novel_config.json";

/// JSON 文件配置存储
pub struct JsonConfigStore {
    global_path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(global_path: impl AsRef<Path>) -> Self {
        Self {
            global_path: global_path.as_ref().to_path_buf(),
        }
    }

    pub fn global_path(&self) -> &Path {
        &self.global_path
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigStoreError> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigStoreError::IoError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| ConfigStoreError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }

    async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigStoreError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| ConfigStoreError::SerializationError(e.to_string()))?;

        let io_error = |e: std::io::Error| ConfigStoreError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        fs::write(path, json).await.map_err(io_error)
    }
}

#[async_trait]
impl ConfigStorePort for JsonConfigStore {
    async fn load_global(&self) -> Result<Option<GlobalConfig>, ConfigStoreError> {
        Self::read_json(&self.global_path).await
    }

    async fn save_global(&self, config: &GlobalConfig) -> Result<(), ConfigStoreError> {
        Self::write_json(&self.global_path, config).await?;
        tracing::debug!(path = %self.global_path.display(), "Global config written");
        Ok(())
    }

    async fn load_project_params(
        &self,
        project: &ProjectPath,
    ) -> Result<Option<NovelParams>, ConfigStoreError> {
        Self::read_json(&project.as_path().join(PROJECT_PARAMS_FILE)).await
    }

    async fn save_project_params(
        &self,
        project: &ProjectPath,
        params: &NovelParams,
    ) -> Result<(), ConfigStoreError> {
        let path = project.as_path().join(PROJECT_PARAMS_FILE);
        Self::write_json(&path, params).await?;
        tracing::debug!(path = %path.display(), "Project params written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::LlmConfig;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_files_are_none() {
        let dir = tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("config.json"));
        let project = ProjectPath::new(dir.path().join("novel")).unwrap();

        assert!(store.load_global().await.unwrap().is_none());
        assert!(store.load_project_params(&project).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_global_config_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("nested").join("config.json"));

        let mut config = GlobalConfig::default();
        config.upsert_llm(LlmConfig {
            interface_format: "Ollama".to_string(),
            base_url: "http://localhost:11434/v1".to_string(),
            model_name: "qwen2".to_string(),
            ..LlmConfig::default()
        });
        store.save_global(&config).await.unwrap();

        let loaded = store.load_global().await.unwrap().unwrap();
        assert_eq!(loaded.last_interface_format, "Ollama");
        assert_eq!(loaded.active_llm().model_name, "qwen2");
        assert_eq!(loaded.llm_configs.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_global_config_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let err = JsonConfigStore::new(&path).load_global().await.unwrap_err();
        assert!(matches!(err, ConfigStoreError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_project_params_accept_legacy_keys() {
        let dir = tempdir().unwrap();
        let store = JsonConfigStore::new(dir.path().join("config.json"));
        let project = ProjectPath::new(dir.path()).unwrap();
        std::fs::write(
            dir.path().join(PROJECT_PARAMS_FILE),
            r#"{"topic": "灯塔", "chapter_count": 12, "word_count": 2500, "guidance": "慢节奏"}"#,
        )
        .unwrap();

        let params = store.load_project_params(&project).await.unwrap().unwrap();
        assert_eq!(params.topic, "灯塔");
        assert_eq!(params.num_chapters, 12);
        assert_eq!(params.word_number, 2500);
        assert_eq!(params.user_guidance, "慢节奏");
        assert_eq!(params.genre, "玄幻");
    }
}
