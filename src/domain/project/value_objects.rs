//! Project Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::ProjectError;

/// 章节文件所在子目录
pub const CHAPTERS_DIR: &str = "chapters";

/// 项目根目录
///
/// 不变量: 路径不可为空（纯空白同样视为空）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectPath(PathBuf);

impl ProjectPath {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(ProjectError::EmptyPath);
        }
        Ok(Self(path.to_path_buf()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// 逻辑文件在磁盘上的完整路径
    pub fn file_path(&self, file: &ProjectFile) -> PathBuf {
        self.0.join(file.relative_path())
    }

    pub fn chapters_dir(&self) -> PathBuf {
        self.0.join(CHAPTERS_DIR)
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// 章节号（从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ChapterNumber(u32);

impl ChapterNumber {
    pub const FIRST: ChapterNumber = ChapterNumber(1);

    pub fn new(n: u32) -> Result<Self, ProjectError> {
        if n == 0 {
            return Err(ProjectError::InvalidChapterNumber(n.to_string()));
        }
        Ok(Self(n))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// 章节文件名: `chapter_<N>.txt`，不补零
    pub fn file_name(&self) -> String {
        format!("chapter_{}.txt", self.0)
    }

    /// 从章节文件名解析章节号，不符合命名规则时返回 None
    pub fn from_file_name(name: &str) -> Option<Self> {
        let digits = name.strip_prefix("chapter_")?.strip_suffix(".txt")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().and_then(|n| Self::new(n).ok())
    }
}

impl TryFrom<u32> for ChapterNumber {
    type Error = ProjectError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChapterNumber> for u32 {
    fn from(value: ChapterNumber) -> Self {
        value.0
    }
}

impl FromStr for ChapterNumber {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ProjectError::InvalidChapterNumber(s.to_string()))?;
        Self::new(n)
    }
}

impl std::fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 项目内的逻辑文件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectFile {
    /// 小说架构（阶段 1 输出）
    Architecture,
    /// 章节蓝图（阶段 2 输出）
    Blueprint,
    /// 角色状态（定稿阶段维护）
    CharacterState,
    /// 全局摘要（定稿阶段维护）
    GlobalSummary,
    /// 剧情要点
    PlotArcs,
    /// 单个章节正文
    Chapter(ChapterNumber),
}

impl ProjectFile {
    /// 相对于项目根目录的路径
    pub fn relative_path(&self) -> PathBuf {
        match self {
            ProjectFile::Architecture => PathBuf::from("Novel_architecture.txt"),
            ProjectFile::Blueprint => PathBuf::from("Novel_directory.txt"),
            ProjectFile::CharacterState => PathBuf::from("character_state.txt"),
            ProjectFile::GlobalSummary => PathBuf::from("global_summary.txt"),
            ProjectFile::PlotArcs => PathBuf::from("plot_arcs.txt"),
            ProjectFile::Chapter(n) => PathBuf::from(CHAPTERS_DIR).join(n.file_name()),
        }
    }

    pub fn logical_name(&self) -> String {
        match self {
            ProjectFile::Architecture => "architecture".to_string(),
            ProjectFile::Blueprint => "blueprint".to_string(),
            ProjectFile::CharacterState => "character_state".to_string(),
            ProjectFile::GlobalSummary => "global_summary".to_string(),
            ProjectFile::PlotArcs => "plot_arcs".to_string(),
            ProjectFile::Chapter(n) => format!("chapter_{}", n),
        }
    }

    /// 解析逻辑文件名
    ///
    /// 同时接受逻辑名（`architecture`、`chapter_7`）与磁盘文件名
    /// （`Novel_architecture.txt`、`chapter_7.txt`）
    pub fn from_name(name: &str) -> Result<Self, ProjectError> {
        let name = name.trim();
        let file = match name {
            "architecture" | "Novel_architecture.txt" => ProjectFile::Architecture,
            "blueprint" | "Novel_directory.txt" => ProjectFile::Blueprint,
            "character_state" | "character_state.txt" => ProjectFile::CharacterState,
            "global_summary" | "global_summary.txt" => ProjectFile::GlobalSummary,
            "plot_arcs" | "plot_arcs.txt" => ProjectFile::PlotArcs,
            other => {
                let file_name = other.strip_prefix("chapters/").unwrap_or(other);
                let with_ext = if file_name.ends_with(".txt") {
                    file_name.to_string()
                } else {
                    format!("{}.txt", file_name)
                };
                ChapterNumber::from_file_name(&with_ext)
                    .map(ProjectFile::Chapter)
                    .ok_or_else(|| ProjectError::UnknownFile(name.to_string()))?
            }
        };
        Ok(file)
    }
}

impl std::fmt::Display for ProjectFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.logical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_path_rejects_blank() {
        assert_eq!(ProjectPath::new("").unwrap_err(), ProjectError::EmptyPath);
        assert_eq!(ProjectPath::new("   ").unwrap_err(), ProjectError::EmptyPath);
        assert!(ProjectPath::new("/tmp/novel").is_ok());
    }

    #[test]
    fn test_chapter_number_must_be_positive() {
        assert!(ChapterNumber::new(0).is_err());
        assert_eq!(ChapterNumber::new(3).unwrap().next().get(), 4);
        assert_eq!("12".parse::<ChapterNumber>().unwrap().get(), 12);
        assert!("abc".parse::<ChapterNumber>().is_err());
    }

    #[test]
    fn test_chapter_file_name_parsing() {
        assert_eq!(ChapterNumber::from_file_name("chapter_7.txt").map(|n| n.get()), Some(7));
        assert_eq!(ChapterNumber::from_file_name("chapter_012.txt").map(|n| n.get()), Some(12));
        assert!(ChapterNumber::from_file_name("chapter_0.txt").is_none());
        assert!(ChapterNumber::from_file_name("chapter_.txt").is_none());
        assert!(ChapterNumber::from_file_name("chapter_1a.txt").is_none());
        assert!(ChapterNumber::from_file_name("chapter_-1.txt").is_none());
        assert!(ChapterNumber::from_file_name("notes.txt").is_none());
        assert!(ChapterNumber::from_file_name("chapter_3.md").is_none());
    }

    #[test]
    fn test_project_file_layout() {
        let root = ProjectPath::new("/novels/lighthouse").unwrap();
        assert_eq!(
            root.file_path(&ProjectFile::Architecture),
            PathBuf::from("/novels/lighthouse/Novel_architecture.txt")
        );
        assert_eq!(
            root.file_path(&ProjectFile::Blueprint),
            PathBuf::from("/novels/lighthouse/Novel_directory.txt")
        );
        let chapter = ProjectFile::Chapter(ChapterNumber::new(5).unwrap());
        assert_eq!(
            root.file_path(&chapter),
            PathBuf::from("/novels/lighthouse/chapters/chapter_5.txt")
        );
    }

    #[test]
    fn test_project_file_from_name() {
        assert_eq!(ProjectFile::from_name("architecture").unwrap(), ProjectFile::Architecture);
        assert_eq!(ProjectFile::from_name("Novel_directory.txt").unwrap(), ProjectFile::Blueprint);
        assert_eq!(
            ProjectFile::from_name("chapter_9").unwrap(),
            ProjectFile::Chapter(ChapterNumber::new(9).unwrap())
        );
        assert_eq!(
            ProjectFile::from_name("chapters/chapter_2.txt").unwrap(),
            ProjectFile::Chapter(ChapterNumber::new(2).unwrap())
        );
        assert!(ProjectFile::from_name("config.json").is_err());
    }
}
