//! Settings Context - Value Objects
//!
//! 全局配置（`config.json`）与项目参数（`novel_config.json`）的结构定义

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::{InterfaceFormat, SettingsError};

pub const DEFAULT_INTERFACE: &str = "OpenAI";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// LLM 配置
///
/// `interface_format` 即 `llm_configs` 中的键，不写入条目本身
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip)]
    pub interface_format: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model_name: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens", deserialize_with = "whole_number")]
    pub max_tokens: u32,

    /// 请求超时（秒）
    #[serde(default = "default_timeout", deserialize_with = "whole_number")]
    pub timeout: u64,
}

/// 读取非负整数，兼容 `8192.0` 这类没有小数部分的浮点写法
fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let value = match number.as_u64() {
        Some(value) => value,
        None => match number.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => f as u64,
            _ => {
                return Err(D::Error::custom(format!(
                    "expected a non-negative whole number, got {}",
                    number
                )))
            }
        },
    };
    T::try_from(value).map_err(|_| D::Error::custom(format!("number out of range: {}", value)))
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_timeout() -> u64 {
    600
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            interface_format: DEFAULT_INTERFACE.to_string(),
            api_key: String::new(),
            base_url: default_base_url(),
            model_name: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout: default_timeout(),
        }
    }
}

impl LlmConfig {
    pub fn interface(&self) -> Result<InterfaceFormat, SettingsError> {
        self.interface_format.parse()
    }

    /// 日志用的安全描述，不包含 api_key
    pub fn describe(&self) -> String {
        format!(
            "{} / {} @ {} (temperature={}, max_tokens={}, timeout={}s)",
            self.interface_format,
            self.model_name,
            self.base_url,
            self.temperature,
            self.max_tokens,
            self.timeout
        )
    }
}

/// Embedding 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(skip)]
    pub interface_format: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub model_name: String,

    /// 起草时检索的上下文片段数
    #[serde(default = "default_retrieval_k", deserialize_with = "whole_number")]
    pub retrieval_k: usize,
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_retrieval_k() -> usize {
    4
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            interface_format: DEFAULT_INTERFACE.to_string(),
            api_key: String::new(),
            base_url: default_base_url(),
            model_name: default_embedding_model(),
            retrieval_k: default_retrieval_k(),
        }
    }
}

impl EmbeddingConfig {
    pub fn interface(&self) -> Result<InterfaceFormat, SettingsError> {
        self.interface_format.parse()
    }
}

/// 小说参数（项目级）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovelParams {
    #[serde(default)]
    pub topic: String,

    #[serde(default = "default_genre")]
    pub genre: String,

    #[serde(
        default = "default_num_chapters",
        alias = "chapter_count",
        deserialize_with = "whole_number"
    )]
    pub num_chapters: u32,

    /// 每章目标字数
    #[serde(
        default = "default_word_number",
        alias = "word_count",
        deserialize_with = "whole_number"
    )]
    pub word_number: u32,

    /// 旧版全局配置中记录的项目路径
    #[serde(default)]
    pub filepath: String,

    #[serde(default, alias = "guidance")]
    pub user_guidance: String,

    #[serde(default)]
    pub characters_involved: String,

    #[serde(default)]
    pub key_items: String,

    #[serde(default)]
    pub scene_location: String,

    #[serde(default)]
    pub time_constraint: String,
}

fn default_genre() -> String {
    "玄幻".to_string()
}

fn default_num_chapters() -> u32 {
    10
}

fn default_word_number() -> u32 {
    3000
}

impl Default for NovelParams {
    fn default() -> Self {
        Self {
            topic: String::new(),
            genre: default_genre(),
            num_chapters: default_num_chapters(),
            word_number: default_word_number(),
            filepath: String::new(),
            user_guidance: String::new(),
            characters_involved: String::new(),
            key_items: String::new(),
            scene_location: String::new(),
            time_constraint: String::new(),
        }
    }
}

/// 全局配置（进程级，与项目无关）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default = "default_interface")]
    pub last_interface_format: String,

    #[serde(default = "default_interface")]
    pub last_embedding_interface_format: String,

    #[serde(default)]
    pub llm_configs: BTreeMap<String, LlmConfig>,

    #[serde(default)]
    pub embedding_configs: BTreeMap<String, EmbeddingConfig>,

    /// 旧版内嵌的小说参数，仅在项目目录没有 `novel_config.json` 时使用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_params: Option<NovelParams>,
}

fn default_interface() -> String {
    DEFAULT_INTERFACE.to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        let mut config = Self {
            last_interface_format: default_interface(),
            last_embedding_interface_format: default_interface(),
            llm_configs: BTreeMap::new(),
            embedding_configs: BTreeMap::new(),
            other_params: None,
        };
        config.upsert_llm(LlmConfig::default());
        config.upsert_embedding(EmbeddingConfig::default());
        config
    }
}

impl GlobalConfig {
    /// 当前激活的 LLM 配置，缺失时回退为默认值
    pub fn active_llm(&self) -> LlmConfig {
        let mut config = self
            .llm_configs
            .get(&self.last_interface_format)
            .cloned()
            .unwrap_or_default();
        config.interface_format = self.last_interface_format.clone();
        config
    }

    pub fn active_embedding(&self) -> EmbeddingConfig {
        let mut config = self
            .embedding_configs
            .get(&self.last_embedding_interface_format)
            .cloned()
            .unwrap_or_default();
        config.interface_format = self.last_embedding_interface_format.clone();
        config
    }

    /// 写入（或覆盖）一个 LLM 条目并设为激活项，其他服务商条目保持不变
    pub fn upsert_llm(&mut self, config: LlmConfig) {
        self.last_interface_format = config.interface_format.clone();
        self.llm_configs.insert(config.interface_format.clone(), config);
    }

    pub fn upsert_embedding(&mut self, config: EmbeddingConfig) {
        self.last_embedding_interface_format = config.interface_format.clone();
        self.embedding_configs
            .insert(config.interface_format.clone(), config);
    }
}

/// 解析生效的小说参数
///
/// 项目目录下的参数文件整体优先；仅当项目文件不存在时才回退到旧版全局配置中的参数
pub fn resolve_novel_params(
    project: Option<NovelParams>,
    legacy: Option<&NovelParams>,
) -> NovelParams {
    match (project, legacy) {
        (Some(params), _) => params,
        (None, Some(legacy)) => legacy.clone(),
        (None, None) => NovelParams::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_global_config() {
        let config = GlobalConfig::default();
        let llm = config.active_llm();
        assert_eq!(llm.interface_format, "OpenAI");
        assert_eq!(llm.model_name, "gpt-4o-mini");
        assert_eq!(llm.max_tokens, 8192);
        assert_eq!(llm.timeout, 600);
        let embedding = config.active_embedding();
        assert_eq!(embedding.model_name, "text-embedding-ada-002");
        assert_eq!(embedding.retrieval_k, 4);
    }

    #[test]
    fn test_parse_source_schema() {
        let json = r#"{
            "last_interface_format": "DeepSeek",
            "last_embedding_interface_format": "Ollama",
            "llm_configs": {
                "DeepSeek": {
                    "api_key": "sk-test",
                    "base_url": "https://api.deepseek.com/v1",
                    "model_name": "deepseek-chat",
                    "temperature": 0.9,
                    "max_tokens": 4096,
                    "timeout": 300
                }
            },
            "embedding_configs": {
                "Ollama": {
                    "api_key": "",
                    "base_url": "http://localhost:11434/api",
                    "model_name": "nomic-embed-text",
                    "retrieval_k": 2
                }
            },
            "other_params": {"topic": "星海", "num_chapters": 20, "word_number": 2500}
        }"#;

        let config: GlobalConfig = serde_json::from_str(json).unwrap();
        let llm = config.active_llm();
        assert_eq!(llm.interface_format, "DeepSeek");
        assert_eq!(llm.model_name, "deepseek-chat");
        assert_eq!(llm.max_tokens, 4096);
        let embedding = config.active_embedding();
        assert_eq!(embedding.interface_format, "Ollama");
        assert_eq!(embedding.retrieval_k, 2);

        let legacy = config.other_params.as_ref().unwrap();
        assert_eq!(legacy.topic, "星海");
        assert_eq!(legacy.num_chapters, 20);
        assert_eq!(legacy.genre, "玄幻");
    }

    #[test]
    fn test_parse_float_numbers_from_number_widgets() {
        let json = r#"{
            "last_interface_format": "DeepSeek",
            "llm_configs": {
                "DeepSeek": {
                    "api_key": "sk-test",
                    "model_name": "deepseek-chat",
                    "max_tokens": 8192.0,
                    "timeout": 600.0
                }
            },
            "embedding_configs": {
                "OpenAI": {"retrieval_k": 4.0}
            },
            "other_params": {"topic": "星海", "num_chapters": 10.0, "word_number": 3000.0}
        }"#;

        let config: GlobalConfig = serde_json::from_str(json).unwrap();
        let llm = config.active_llm();
        assert_eq!(llm.model_name, "deepseek-chat");
        assert_eq!(llm.max_tokens, 8192);
        assert_eq!(llm.timeout, 600);
        assert_eq!(config.active_embedding().retrieval_k, 4);
        let legacy = config.other_params.as_ref().unwrap();
        assert_eq!(legacy.num_chapters, 10);
        assert_eq!(legacy.word_number, 3000);
    }

    #[test]
    fn test_fractional_or_negative_counts_rejected() {
        assert!(serde_json::from_str::<NovelParams>(r#"{"num_chapters": 10.5}"#).is_err());
        assert!(serde_json::from_str::<NovelParams>(r#"{"num_chapters": -1}"#).is_err());
        assert!(serde_json::from_str::<LlmConfig>(r#"{"max_tokens": 5000000000}"#).is_err());
    }

    #[test]
    fn test_upsert_keeps_other_providers() {
        let mut config = GlobalConfig::default();
        config.upsert_llm(LlmConfig {
            interface_format: "Gemini".to_string(),
            model_name: "gemini-1.5-pro".to_string(),
            ..LlmConfig::default()
        });

        assert_eq!(config.last_interface_format, "Gemini");
        assert!(config.llm_configs.contains_key("OpenAI"));
        assert_eq!(config.active_llm().model_name, "gemini-1.5-pro");
    }

    #[test]
    fn test_novel_params_aliases() {
        let params: NovelParams =
            serde_json::from_str(r#"{"topic": "灯塔", "chapter_count": 5, "word_count": 2000}"#)
                .unwrap();
        assert_eq!(params.num_chapters, 5);
        assert_eq!(params.word_number, 2000);
    }

    #[test]
    fn test_project_params_override_legacy() {
        let legacy = NovelParams {
            topic: "legacy".to_string(),
            ..NovelParams::default()
        };
        let project = NovelParams {
            topic: "project".to_string(),
            ..NovelParams::default()
        };

        assert_eq!(resolve_novel_params(Some(project), Some(&legacy)).topic, "project");
        assert_eq!(resolve_novel_params(None, Some(&legacy)).topic, "legacy");
        assert_eq!(resolve_novel_params(None, None), NovelParams::default());
    }
}
