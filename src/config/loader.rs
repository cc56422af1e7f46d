//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（novelforge.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["novelforge", "novelforge.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "NOVELFORGE";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `NOVELFORGE_`，层级分隔符 `__`）
/// 2. 配置文件（novelforge.toml 或 novelforge.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `NOVELFORGE_PROJECT__PATH=/data/novels/lighthouse`
/// - `NOVELFORGE_RUN__ACTION=draft`
/// - `NOVELFORGE_RUN__CHAPTER=3`
/// - `NOVELFORGE_STORAGE__GLOBAL_CONFIG_PATH=/etc/novelforge/config.json`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("storage.global_config_path", "config.json")?
        .set_default("log.level", "info")?
        .set_default("run.action", "status")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: NOVELFORGE_RUN__ACTION=finalize
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.storage.global_config_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Global config path cannot be empty".to_string(),
        ));
    }

    if config.log.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Log level cannot be empty".to_string(),
        ));
    }

    if config.run.chapter == Some(0) {
        return Err(ConfigError::ValidationError(
            "Chapter numbers start at 1".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Global Config: {:?}", config.storage.global_config_path);
    tracing::info!(
        "Project: {}",
        config.project.path.as_deref().unwrap_or("(from global config)")
    );
    tracing::info!("Action: {}", config.run.action);
    if let Some(chapter) = config.run.chapter {
        tracing::info!("Chapter: {}", chapter);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunAction;
    use tempfile::tempdir;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_chapter() {
        let mut config = AppConfig::default();
        config.run.chapter = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_global_path() {
        let mut config = AppConfig::default();
        config.storage.global_config_path = std::path::PathBuf::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("novelforge.toml");
        std::fs::write(
            &path,
            r#"
[project]
path = "/data/novels/lighthouse"

[run]
action = "draft"
chapter = 3
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.project.path.as_deref(), Some("/data/novels/lighthouse"));
        assert_eq!(config.run.action, RunAction::Draft);
        assert_eq!(config.run.chapter, Some(3));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_unknown_action_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("novelforge.toml");
        std::fs::write(&path, "[run]\naction = \"publish\"\n").unwrap();

        assert!(matches!(
            load_config_from_path(Some(&path)),
            Err(ConfigError::ParseError(_))
        ));
    }
}
