//! OpenAI Compatible Client - `/chat/completions` 协议
//!
//! 覆盖 OpenAI、DeepSeek、Ollama、ML Studio、阿里云百炼、火山引擎、硅基流动
//!
//! API:
//! POST {base_url}/chat/completions
//! Request: {"model": "...", "messages": [{"role": "user", "content": "..."}], ...}
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::{build_client, send_json};
use crate::application::ports::{BackendError, LlmClientPort};
use crate::domain::settings::{normalize_base_url, InterfaceFormat, LlmConfig};

/// Ollama 不校验密钥，但请求头不能为空
const OLLAMA_PLACEHOLDER_KEY: &str = "ollama";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    pub(super) fn into_text(self) -> Result<String, BackendError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::InvalidResponse("response has no choices".to_string()))
    }
}

pub(super) fn chat_body<'a>(
    model: Option<&'a str>,
    prompt: &'a str,
    config: &LlmConfig,
) -> impl Serialize + 'a {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// OpenAI 兼容客户端
pub struct OpenAiCompatibleClient {
    client: Client,
    config: LlmConfig,
    base_url: String,
    api_key: String,
}

impl OpenAiCompatibleClient {
    pub fn new(config: &LlmConfig, format: InterfaceFormat) -> Result<Self, BackendError> {
        let base_url = resolve_base_url(&config.base_url, format);
        if base_url.is_empty() {
            return Err(BackendError::ServiceError(format!(
                "{} base_url is empty",
                format
            )));
        }

        let api_key = if config.api_key.trim().is_empty() && format == InterfaceFormat::Ollama {
            OLLAMA_PLACEHOLDER_KEY.to_string()
        } else {
            config.api_key.trim().to_string()
        };

        Ok(Self {
            client: build_client(config.timeout)?,
            config: config.clone(),
            base_url,
            api_key,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// 火山引擎与硅基流动使用原始地址，其余接口做 `/v1` 补全
fn resolve_base_url(raw: &str, format: InterfaceFormat) -> String {
    if format.uses_raw_base_url() {
        raw.trim().trim_end_matches('/').to_string()
    } else {
        normalize_base_url(raw).trim_end_matches('/').to_string()
    }
}

#[async_trait]
impl LlmClientPort for OpenAiCompatibleClient {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        tracing::debug!(
            url = %self.chat_url(),
            model = %self.config.model_name,
            prompt_chars = prompt.chars().count(),
            "Sending chat completion request"
        );

        let response: ChatResponse = send_json(
            self.client
                .post(self.chat_url())
                .bearer_auth(&self.api_key)
                .json(&chat_body(Some(&self.config.model_name), prompt, &self.config)),
        )
        .await?;

        let text = response.into_text()?;
        tracing::debug!(
            model = %self.config.model_name,
            reply_chars = text.chars().count(),
            "Chat completion finished"
        );
        Ok(text)
    }
}
