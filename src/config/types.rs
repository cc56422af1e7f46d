//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 启动时打开的项目
    #[serde(default)]
    pub project: ProjectConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,

    /// 本次运行执行的动作
    #[serde(default)]
    pub run: RunConfig,
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 全局模型配置文件（LLM / Embedding 服务商条目）
    #[serde(default = "default_global_config_path")]
    pub global_config_path: PathBuf,
}

fn default_global_config_path() -> PathBuf {
    PathBuf::from("config.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            global_config_path: default_global_config_path(),
        }
    }
}

/// 项目配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// 小说项目目录；未设置时使用全局配置中旧版参数记录的目录
    #[serde(default)]
    pub path: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// 运行动作
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunAction {
    /// 打印流水线状态与章节列表
    #[default]
    Status,
    TestLlm,
    TestEmbedding,
    Architecture,
    Blueprint,
    Draft,
    /// 定稿磁盘上的章节正文（可先手工修改）
    Finalize,
    Consistency,
}

impl RunAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunAction::Status => "status",
            RunAction::TestLlm => "test-llm",
            RunAction::TestEmbedding => "test-embedding",
            RunAction::Architecture => "architecture",
            RunAction::Blueprint => "blueprint",
            RunAction::Draft => "draft",
            RunAction::Finalize => "finalize",
            RunAction::Consistency => "consistency",
        }
    }

    /// 是否需要打开项目目录
    pub fn needs_project(&self) -> bool {
        !matches!(self, RunAction::TestLlm | RunAction::TestEmbedding)
    }
}

impl std::fmt::Display for RunAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 运行配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub action: RunAction,

    /// 起草 / 定稿 / 一致性检查的章节号，未设置时使用会话的当前章节
    #[serde(default)]
    pub chapter: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.global_config_path, PathBuf::from("config.json"));
        assert_eq!(config.project.path, None);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.run.action, RunAction::Status);
    }

    #[test]
    fn test_run_action_names() {
        let action: RunAction = serde_json::from_str("\"test-embedding\"").unwrap();
        assert_eq!(action, RunAction::TestEmbedding);
        assert_eq!(action.to_string(), "test-embedding");
        assert!(!action.needs_project());
        assert!(RunAction::Finalize.needs_project());
    }
}
