//! Azure Clients - Azure OpenAI 与 Azure AI Inference
//!
//! 两者都从用户填写的完整地址中解析出端点:
//! - Azure OpenAI: `https://{resource}/openai/deployments/{deployment}/chat/completions?api-version={v}`
//! - Azure AI:     `https://{name}.services.ai.azure.com/models/chat/completions?api-version={v}`

use async_trait::async_trait;
use reqwest::Client;

use super::http::{build_client, send_json};
use super::openai_compatible::{chat_body, ChatResponse};
use crate::application::ports::{BackendError, LlmClientPort};
use crate::domain::settings::LlmConfig;

const AZURE_AI_DEFAULT_API_VERSION: &str = "2024-05-01-preview";
const AZURE_AI_HOST_SUFFIX: &str = ".services.ai.azure.com";

/// 解析后的 Azure 端点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureEndpoint {
    /// 完整的 chat completions 地址（不含查询参数）
    pub url: String,
    /// 请求体中的模型名；Azure OpenAI 由部署名决定，无需传入
    pub model: Option<String>,
    pub api_version: String,
}

fn split_query(url: &str) -> (&str, Option<String>) {
    match url.split_once('?') {
        Some((path, query)) => {
            let version = query
                .split('&')
                .find_map(|pair| pair.strip_prefix("api-version="))
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            (path, version)
        }
        None => (url, None),
    }
}

/// 解析 Azure OpenAI 部署地址
pub fn parse_azure_openai_url(base_url: &str) -> Result<AzureEndpoint, BackendError> {
    let invalid = || {
        BackendError::ServiceError(format!(
            "invalid Azure OpenAI base_url: {} (expected https://<resource>/openai/deployments/<deployment>/chat/completions?api-version=<version>)",
            base_url
        ))
    };

    let (path, api_version) = split_query(base_url.trim());
    let rest = path.strip_prefix("https://").ok_or_else(invalid)?;
    let (resource, rest) = rest.split_once("/openai/deployments/").ok_or_else(invalid)?;
    let deployment = rest
        .strip_suffix("/chat/completions")
        .filter(|d| !d.is_empty() && !d.contains('/'))
        .ok_or_else(invalid)?;
    let api_version = api_version.ok_or_else(invalid)?;
    if resource.is_empty() {
        return Err(invalid());
    }

    Ok(AzureEndpoint {
        url: format!(
            "https://{}/openai/deployments/{}/chat/completions",
            resource, deployment
        ),
        model: None,
        api_version,
    })
}

/// 解析 Azure AI Inference 地址；`/models`、`/chat/completions` 与版本号均可省略
pub fn parse_azure_ai_url(base_url: &str, model: &str) -> Result<AzureEndpoint, BackendError> {
    let invalid = || {
        BackendError::ServiceError(format!(
            "invalid Azure AI base_url: {} (expected https://<endpoint>.services.ai.azure.com/models/chat/completions?api-version=<version>)",
            base_url
        ))
    };

    let (path, api_version) = split_query(base_url.trim());
    let rest = path.strip_prefix("https://").ok_or_else(invalid)?;
    let host_end = rest.find(AZURE_AI_HOST_SUFFIX).ok_or_else(invalid)?;
    let name = &rest[..host_end];
    if name.is_empty() || name.contains('/') {
        return Err(invalid());
    }

    Ok(AzureEndpoint {
        url: format!(
            "https://{}{}/models/chat/completions",
            name, AZURE_AI_HOST_SUFFIX
        ),
        model: Some(model.to_string()),
        api_version: api_version.unwrap_or_else(|| AZURE_AI_DEFAULT_API_VERSION.to_string()),
    })
}

/// Azure 客户端
///
/// 以 `api-key` 请求头认证
pub struct AzureOpenAiClient {
    client: Client,
    config: LlmConfig,
    endpoint: AzureEndpoint,
}

impl AzureOpenAiClient {
    /// Azure OpenAI 部署
    pub fn openai(config: &LlmConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            endpoint: parse_azure_openai_url(&config.base_url)?,
            config: config.clone(),
        })
    }

    /// Azure AI Inference 端点
    pub fn ai_inference(config: &LlmConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            endpoint: parse_azure_ai_url(&config.base_url, &config.model_name)?,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl LlmClientPort for AzureOpenAiClient {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        tracing::debug!(
            url = %self.endpoint.url,
            api_version = %self.endpoint.api_version,
            prompt_chars = prompt.chars().count(),
            "Sending Azure chat completion request"
        );

        let response: ChatResponse = send_json(
            self.client
                .post(&self.endpoint.url)
                .query(&[("api-version", self.endpoint.api_version.as_str())])
                .header("api-key", self.config.api_key.trim())
                .json(&chat_body(self.endpoint.model.as_deref(), prompt, &self.config)),
        )
        .await?;

        response.into_text()
    }
}
