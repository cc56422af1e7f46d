//! Settings Context - 模型服务商
//!
//! 接口类型名称与 `config.json` 中 `llm_configs` / `embedding_configs` 的键一致

use std::str::FromStr;

use super::SettingsError;

/// 模型服务接口类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceFormat {
    OpenAi,
    DeepSeek,
    Ollama,
    MlStudio,
    Gemini,
    AzureOpenAi,
    /// Azure AI Inference（`*.services.ai.azure.com`）
    AzureAi,
    /// 阿里云百炼
    AliyunBailian,
    /// 火山引擎
    VolcEngine,
    /// 硅基流动
    SiliconFlow,
}

impl InterfaceFormat {
    pub fn display_name(&self) -> &'static str {
        match self {
            InterfaceFormat::OpenAi => "OpenAI",
            InterfaceFormat::DeepSeek => "DeepSeek",
            InterfaceFormat::Ollama => "Ollama",
            InterfaceFormat::MlStudio => "ML Studio",
            InterfaceFormat::Gemini => "Gemini",
            InterfaceFormat::AzureOpenAi => "Azure OpenAI",
            InterfaceFormat::AzureAi => "Azure AI",
            InterfaceFormat::AliyunBailian => "阿里云百炼",
            InterfaceFormat::VolcEngine => "火山引擎",
            InterfaceFormat::SiliconFlow => "硅基流动",
        }
    }

    /// 是否走 OpenAI 兼容的 `/chat/completions` 协议
    pub fn is_openai_compatible(&self) -> bool {
        !matches!(
            self,
            InterfaceFormat::Gemini | InterfaceFormat::AzureOpenAi | InterfaceFormat::AzureAi
        )
    }

    /// 火山引擎与硅基流动直接使用用户填写的地址，不做 `/v1` 补全
    pub fn uses_raw_base_url(&self) -> bool {
        matches!(self, InterfaceFormat::VolcEngine | InterfaceFormat::SiliconFlow)
    }
}

impl FromStr for InterfaceFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().to_lowercase().as_str() {
            "openai" => InterfaceFormat::OpenAi,
            "deepseek" => InterfaceFormat::DeepSeek,
            "ollama" => InterfaceFormat::Ollama,
            "ml studio" => InterfaceFormat::MlStudio,
            "gemini" => InterfaceFormat::Gemini,
            "azure openai" => InterfaceFormat::AzureOpenAi,
            "azure ai" => InterfaceFormat::AzureAi,
            "阿里云百炼" => InterfaceFormat::AliyunBailian,
            "火山引擎" => InterfaceFormat::VolcEngine,
            "硅基流动" => InterfaceFormat::SiliconFlow,
            _ => return Err(SettingsError::UnknownInterface(s.to_string())),
        };
        Ok(format)
    }
}

impl std::fmt::Display for InterfaceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// 规范化 OpenAI 兼容接口的 Base URL
///
/// 规则:
/// 1. 以 `#` 结尾时去掉 `#` 并原样使用
/// 2. 已以 `/v<数字>` 结尾或包含 `/v1` 时保持不变
/// 3. 其余情况补上 `/v1`
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    if let Some(raw) = url.strip_suffix('#') {
        return raw.trim_end_matches('#').to_string();
    }
    if ends_with_version_segment(url) || url.contains("/v1") {
        return url.to_string();
    }
    format!("{}/v1", url.trim_end_matches('/'))
}

fn ends_with_version_segment(url: &str) -> bool {
    url.rsplit('/')
        .next()
        .and_then(|segment| segment.strip_prefix('v'))
        .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interface_format() {
        assert_eq!("OpenAI".parse::<InterfaceFormat>().unwrap(), InterfaceFormat::OpenAi);
        assert_eq!(" ollama ".parse::<InterfaceFormat>().unwrap(), InterfaceFormat::Ollama);
        assert_eq!("Azure OpenAI".parse::<InterfaceFormat>().unwrap(), InterfaceFormat::AzureOpenAi);
        assert_eq!("azure ai".parse::<InterfaceFormat>().unwrap(), InterfaceFormat::AzureAi);
        assert!(!InterfaceFormat::AzureAi.is_openai_compatible());
        assert_eq!("硅基流动".parse::<InterfaceFormat>().unwrap(), InterfaceFormat::SiliconFlow);
        assert!("Claude".parse::<InterfaceFormat>().is_err());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://api.openai.com"), "https://api.openai.com/v1");
        assert_eq!(normalize_base_url("https://api.openai.com/"), "https://api.openai.com/v1");
        assert_eq!(normalize_base_url("https://api.openai.com/v1"), "https://api.openai.com/v1");
        assert_eq!(normalize_base_url("https://ark.cn/api/v3"), "https://ark.cn/api/v3");
        assert_eq!(normalize_base_url("http://localhost:1234/custom#"), "http://localhost:1234/custom");
        assert_eq!(normalize_base_url("  "), "");
    }
}
