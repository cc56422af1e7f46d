//! 模型服务 HTTP 公共部分

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::application::ports::BackendError;

/// Embedding 请求超时（秒），Embedding 配置本身不带超时字段
pub const EMBEDDING_TIMEOUT_SECS: u64 = 60;

/// 按超时创建 HTTP 客户端
pub fn build_client(timeout_secs: u64) -> Result<Client, BackendError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .map_err(|e| BackendError::NetworkError(e.to_string()))
}

/// 发送请求并把成功响应解析为 JSON；非 2xx 状态转为 `ServiceError`
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(BackendError::ServiceError(format!(
            "HTTP {}: {}",
            status,
            truncate(&error_text, 500)
        )));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        BackendError::InvalidResponse(format!("{}: {}", e, truncate(&body, 200)))
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("短文本", 10), "短文本");
        assert_eq!(truncate("一二三四五", 3), "一二三...");
    }
}
