//! LLM / Embedding 模型客户端

mod azure;
mod embedding;
mod fake_client;
mod gemini;
mod http;
mod openai_compatible;
mod provider;

pub use azure::{parse_azure_ai_url, parse_azure_openai_url, AzureEndpoint, AzureOpenAiClient};
pub use embedding::{OllamaEmbeddingClient, OpenAiEmbeddingClient};
pub use fake_client::{FakeClientProvider, FakeEmbeddingClient, FakeLlmClient};
pub use gemini::{GeminiClient, GeminiEmbeddingClient, GEMINI_DEFAULT_BASE_URL};
pub use openai_compatible::OpenAiCompatibleClient;
pub use provider::HttpClientProvider;
