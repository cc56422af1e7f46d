//! 上下文检索
//!
//! 起草章节时把已写章节切成段落级片段，按与查询向量的相似度选出最相关的 k 段

/// 默认片段最大字符数
pub const DEFAULT_MAX_PASSAGE_CHARS: usize = 600;

/// 带来源章节的候选片段
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    /// 来源章节号
    pub chapter: u32,
    pub text: String,
}

/// 检查行是否为空白行（段落分隔）
#[inline]
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// 按段落切分文本
///
/// 策略:
/// 1. 以空行为段落边界
/// 2. 相邻短段落合并，直到接近 `max_chars`
/// 3. 单段超过 `max_chars` 时按字符数硬切
pub fn split_passages(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if is_blank(line) {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line.trim());
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    let mut passages: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0;

    for paragraph in paragraphs {
        let paragraph_chars = paragraph.chars().count();

        if paragraph_chars > max_chars {
            if !buffer.is_empty() {
                passages.push(std::mem::take(&mut buffer));
                buffer_chars = 0;
            }
            passages.extend(hard_split(&paragraph, max_chars));
            continue;
        }

        if buffer_chars + paragraph_chars > max_chars && !buffer.is_empty() {
            passages.push(std::mem::take(&mut buffer));
            buffer_chars = 0;
        }
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&paragraph);
        buffer_chars += paragraph_chars;
    }
    if !buffer.is_empty() {
        passages.push(buffer);
    }

    passages
}

fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect()
}

/// 余弦相似度，维度不一致或零向量时为 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// 返回与查询最相似的 k 个候选下标，按相似度降序；相似度相同时保留原顺序
pub fn top_k(query: &[f32], candidates: &[Vec<f32>], k: usize) -> Vec<usize> {
    let mut scored: Vec<(usize, f32)> = candidates
        .iter()
        .enumerate()
        .map(|(i, v)| (i, cosine_similarity(query, v)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(k).map(|(i, _)| i).collect()
}
