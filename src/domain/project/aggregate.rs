//! Project Context - 流水线状态机
//!
//! 项目状态完全由磁盘内容推导，不保存任何内存态

use std::collections::BTreeMap;

use super::{ChapterNumber, ChapterStatus};

/// 某一时刻的项目快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSnapshot {
    pub has_architecture: bool,
    pub has_blueprint: bool,
    pub chapters: BTreeMap<ChapterNumber, ChapterStatus>,
}

impl ProjectSnapshot {
    pub fn latest_chapter(&self) -> Option<(ChapterNumber, ChapterStatus)> {
        self.chapters.iter().next_back().map(|(n, s)| (*n, *s))
    }
}

/// 流水线状态
///
/// `Empty -> ArchitectureReady -> BlueprintReady -> ChapterDrafted(n) -> ChapterFinalized(n)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Empty,
    ArchitectureReady,
    BlueprintReady,
    ChapterDrafted(ChapterNumber),
    ChapterFinalized(ChapterNumber),
}

impl PipelineState {
    /// 从快照推导当前状态，章节以编号最大者为准
    pub fn derive(snapshot: &ProjectSnapshot) -> Self {
        if snapshot.has_blueprint {
            if let Some((n, status)) = snapshot.latest_chapter() {
                return match status {
                    ChapterStatus::Draft => PipelineState::ChapterDrafted(n),
                    ChapterStatus::Finalized => PipelineState::ChapterFinalized(n),
                };
            }
            return PipelineState::BlueprintReady;
        }
        if snapshot.has_architecture {
            PipelineState::ArchitectureReady
        } else {
            PipelineState::Empty
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Empty => "empty",
            PipelineState::ArchitectureReady => "architecture_ready",
            PipelineState::BlueprintReady => "blueprint_ready",
            PipelineState::ChapterDrafted(_) => "chapter_drafted",
            PipelineState::ChapterFinalized(_) => "chapter_finalized",
        }
    }
}

/// 各阶段的开放状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageGates {
    /// 阶段 2: 架构已存在
    pub blueprint: bool,
    /// 阶段 3: 蓝图已存在
    pub draft: bool,
    /// 阶段 4: 已有内容的章节
    pub finalizable: Vec<ChapterNumber>,
}

impl StageGates {
    pub fn from_snapshot(snapshot: &ProjectSnapshot) -> Self {
        Self {
            blueprint: snapshot.has_architecture,
            draft: snapshot.has_blueprint,
            finalizable: snapshot.chapters.keys().copied().collect(),
        }
    }

    pub fn can_finalize(&self, chapter: ChapterNumber) -> bool {
        self.finalizable.contains(&chapter)
    }
}

/// 下一个待写章节
///
/// 没有章节时为第 1 章；最新章节仍是草稿时继续该章，否则为最新章节 + 1
pub fn next_chapter_to_write(chapters: &BTreeMap<ChapterNumber, ChapterStatus>) -> ChapterNumber {
    match chapters.iter().next_back() {
        None => ChapterNumber::FIRST,
        Some((n, ChapterStatus::Draft)) => *n,
        Some((n, ChapterStatus::Finalized)) => n.next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(n: u32) -> ChapterNumber {
        ChapterNumber::new(n).unwrap()
    }

    #[test]
    fn test_state_progression() {
        let mut snapshot = ProjectSnapshot::default();
        assert_eq!(PipelineState::derive(&snapshot), PipelineState::Empty);

        snapshot.has_architecture = true;
        assert_eq!(PipelineState::derive(&snapshot), PipelineState::ArchitectureReady);

        snapshot.has_blueprint = true;
        assert_eq!(PipelineState::derive(&snapshot), PipelineState::BlueprintReady);

        snapshot.chapters.insert(ch(1), ChapterStatus::Finalized);
        snapshot.chapters.insert(ch(2), ChapterStatus::Draft);
        assert_eq!(PipelineState::derive(&snapshot), PipelineState::ChapterDrafted(ch(2)));

        snapshot.chapters.insert(ch(2), ChapterStatus::Finalized);
        assert_eq!(PipelineState::derive(&snapshot), PipelineState::ChapterFinalized(ch(2)));
    }

    #[test]
    fn test_gates_follow_persisted_content() {
        let mut snapshot = ProjectSnapshot::default();
        let gates = StageGates::from_snapshot(&snapshot);
        assert!(!gates.blueprint);
        assert!(!gates.draft);

        snapshot.has_architecture = true;
        snapshot.chapters.insert(ch(3), ChapterStatus::Draft);
        let gates = StageGates::from_snapshot(&snapshot);
        assert!(gates.blueprint);
        assert!(!gates.draft);
        assert!(gates.can_finalize(ch(3)));
        assert!(!gates.can_finalize(ch(4)));
    }

    #[test]
    fn test_next_chapter_to_write() {
        let mut chapters = BTreeMap::new();
        assert_eq!(next_chapter_to_write(&chapters), ch(1));

        chapters.insert(ch(1), ChapterStatus::Finalized);
        assert_eq!(next_chapter_to_write(&chapters), ch(2));

        chapters.insert(ch(4), ChapterStatus::Draft);
        assert_eq!(next_chapter_to_write(&chapters), ch(4));
    }
}
