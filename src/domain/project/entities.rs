//! Project Context - Entities

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{ChapterNumber, ProjectError};

/// 章节状态
///
/// 不变量: 只有定稿阶段成功完成后章节才会成为 `Finalized`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChapterStatus {
    #[default]
    Draft,
    Finalized,
}

impl ChapterStatus {
    /// 持久化标签，与既有项目目录中的 `chapter_status.json` 保持兼容
    pub fn as_label(&self) -> &'static str {
        match self {
            ChapterStatus::Draft => "草稿",
            ChapterStatus::Finalized => "已定稿",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterStatus::Draft => "draft",
            ChapterStatus::Finalized => "finalized",
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, ChapterStatus::Finalized)
    }
}

impl FromStr for ChapterStatus {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "草稿" | "draft" => Ok(ChapterStatus::Draft),
            "已定稿" | "finalized" => Ok(ChapterStatus::Finalized),
            other => Err(ProjectError::InvalidStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for ChapterStatus {
    type Error = ProjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChapterStatus> for String {
    fn from(value: ChapterStatus) -> Self {
        value.as_label().to_string()
    }
}

impl std::fmt::Display for ChapterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 章节概览条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterEntry {
    pub number: ChapterNumber,
    pub status: ChapterStatus,
}

impl ChapterEntry {
    pub fn new(number: ChapterNumber, status: ChapterStatus) -> Self {
        Self { number, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!("草稿".parse::<ChapterStatus>().unwrap(), ChapterStatus::Draft);
        assert_eq!("已定稿".parse::<ChapterStatus>().unwrap(), ChapterStatus::Finalized);
        assert_eq!("finalized".parse::<ChapterStatus>().unwrap(), ChapterStatus::Finalized);
        assert!("published".parse::<ChapterStatus>().is_err());
        assert_eq!(ChapterStatus::default(), ChapterStatus::Draft);
    }

    #[test]
    fn test_status_serializes_with_legacy_labels() {
        let json = serde_json::to_string(&ChapterStatus::Finalized).unwrap();
        assert_eq!(json, "\"已定稿\"");
        let parsed: ChapterStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(parsed, ChapterStatus::Draft);
    }
}
