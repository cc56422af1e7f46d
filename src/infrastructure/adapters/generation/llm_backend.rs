//! LLM Generation Backend - 基于模型客户端的生成后端
//!
//! 实现 GenerationBackendPort trait，每个阶段一次（定稿两次）LLM 调用
//!
//! 起草时的上下文检索:
//! 1. 把已写章节切成段落级片段
//! 2. 用 Embedding 按与本章目录的相似度选出 `retrieval_k` 段
//! 3. Embedding 不可用时退化为最近的 `retrieval_k` 段

use async_trait::async_trait;
use std::sync::Arc;

use super::prompts::{self, DraftContext};
use crate::application::ports::{
    ArchitectureRequest, BackendError, BlueprintRequest, ClientProviderPort, ConsistencyRequest,
    DraftRequest, FinalizeRequest, FinalizeUpdate, GenerationBackendPort,
};
use crate::domain::project::ChapterNumber;
use crate::domain::settings::{EmbeddingConfig, LlmConfig};
use crate::domain::{split_passages, top_k, Passage, DEFAULT_MAX_PASSAGE_CHARS};

/// 上一章结尾摘录的字符数
const PREVIOUS_EXCERPT_CHARS: usize = 1500;

/// LLM 生成后端
pub struct LlmGenerationBackend {
    provider: Arc<dyn ClientProviderPort>,
    max_passage_chars: usize,
}

impl LlmGenerationBackend {
    pub fn new(provider: Arc<dyn ClientProviderPort>) -> Self {
        Self {
            provider,
            max_passage_chars: DEFAULT_MAX_PASSAGE_CHARS,
        }
    }

    pub fn with_max_passage_chars(mut self, max_chars: usize) -> Self {
        self.max_passage_chars = max_chars.max(1);
        self
    }

    async fn invoke(&self, llm: &LlmConfig, prompt: &str) -> Result<String, BackendError> {
        let client = self.provider.llm(llm)?;
        let reply = client.invoke(prompt).await?;
        Ok(reply.trim().to_string())
    }

    /// 检索与本章相关的前文片段
    async fn retrieve(
        &self,
        embedding: &EmbeddingConfig,
        query: &str,
        previous: &[(ChapterNumber, String)],
    ) -> Vec<String> {
        let k = embedding.retrieval_k;
        if k == 0 {
            return Vec::new();
        }

        let passages: Vec<Passage> = previous
            .iter()
            .flat_map(|(chapter, text)| {
                split_passages(text, self.max_passage_chars)
                    .into_iter()
                    .map(move |text| Passage {
                        chapter: chapter.get(),
                        text,
                    })
            })
            .collect();
        if passages.len() <= k {
            return passages.into_iter().map(|p| p.text).collect();
        }

        match self.rank_by_similarity(embedding, query, &passages, k).await {
            Ok(indices) => {
                tracing::debug!(
                    candidates = passages.len(),
                    selected = indices.len(),
                    "Context passages ranked by embedding"
                );
                indices.into_iter().map(|i| passages[i].text.clone()).collect()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Embedding retrieval failed, using latest passages");
                passages[passages.len() - k..]
                    .iter()
                    .map(|p| p.text.clone())
                    .collect()
            }
        }
    }

    async fn rank_by_similarity(
        &self,
        embedding: &EmbeddingConfig,
        query: &str,
        passages: &[Passage],
        k: usize,
    ) -> Result<Vec<usize>, BackendError> {
        let client = self.provider.embedding(embedding)?;
        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let vectors = client.embed(&texts).await?;
        let query_vector = client.embed_query(query).await?;
        Ok(top_k(&query_vector, &vectors, k))
    }
}

/// 从章节目录中截取第 n 章的条目
///
/// 条目从以 `第n章` 开头的行开始，到下一个以 `第` 开头、`章` 为编号结尾的行为止
pub fn chapter_outline(blueprint: &str, chapter: ChapterNumber) -> Option<String> {
    let heading = format!("第{}章", chapter);
    let mut lines = blueprint.lines().skip_while(|line| !is_heading_of(line, &heading));
    let first = lines.next()?;

    let mut outline = vec![first.trim()];
    for line in lines {
        if chapter_heading(line).is_some() {
            break;
        }
        outline.push(line.trim());
    }
    Some(outline.join("\n").trim().to_string())
}

fn is_heading_of(line: &str, heading: &str) -> bool {
    chapter_heading(line).map_or(false, |h| h == heading)
}

/// 行首的 `第<数字>章`
fn chapter_heading(line: &str) -> Option<&str> {
    let line = line.trim_start_matches(|c: char| c.is_whitespace() || c == '#' || c == '*');
    let rest = line.strip_prefix('第')?;
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 || !rest[digits..].starts_with('章') {
        return None;
    }
    Some(&line[..'第'.len_utf8() + digits + '章'.len_utf8()])
}

/// 文本末尾的若干字符
fn tail_chars(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let start = text
        .char_indices()
        .nth(count - max_chars)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &text[start..]
}

#[async_trait]
impl GenerationBackendPort for LlmGenerationBackend {
    async fn generate_architecture(
        &self,
        llm: &LlmConfig,
        request: &ArchitectureRequest,
    ) -> Result<String, BackendError> {
        self.invoke(llm, &prompts::architecture(request)).await
    }

    async fn generate_blueprint(
        &self,
        llm: &LlmConfig,
        request: &BlueprintRequest,
    ) -> Result<String, BackendError> {
        self.invoke(llm, &prompts::blueprint(request)).await
    }

    async fn generate_chapter_draft(
        &self,
        llm: &LlmConfig,
        embedding: &EmbeddingConfig,
        request: &DraftRequest,
    ) -> Result<String, BackendError> {
        let outline = chapter_outline(&request.blueprint, request.chapter);
        let previous_excerpt = request
            .previous_chapters
            .last()
            .map(|(_, text)| tail_chars(text.trim(), PREVIOUS_EXCERPT_CHARS));

        let query = match &outline {
            Some(outline) => format!("{}\n{}", outline, request.guidance),
            None => format!("第{}章\n{}", request.chapter, request.guidance),
        };
        let retrieved = self
            .retrieve(embedding, &query, &request.previous_chapters)
            .await;

        let context = DraftContext {
            outline: outline.as_deref(),
            previous_excerpt,
            retrieved: &retrieved,
        };
        self.invoke(llm, &prompts::draft(request, &context)).await
    }

    async fn finalize_chapter(
        &self,
        llm: &LlmConfig,
        _embedding: &EmbeddingConfig,
        request: &FinalizeRequest,
    ) -> Result<FinalizeUpdate, BackendError> {
        let global_summary = self.invoke(llm, &prompts::global_summary(request)).await?;
        let character_state = self.invoke(llm, &prompts::character_state(request)).await?;
        if global_summary.is_empty() || character_state.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(FinalizeUpdate {
            character_state,
            global_summary,
        })
    }

    async fn check_consistency(
        &self,
        llm: &LlmConfig,
        request: &ConsistencyRequest,
    ) -> Result<String, BackendError> {
        self.invoke(llm, &prompts::consistency(request)).await
    }
}
