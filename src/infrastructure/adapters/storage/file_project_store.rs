//! File Project Store - 文件系统项目存储实现
//!
//! 实现 ProjectStorePort trait
//!
//! 目录布局:
//! ```text
//! <project>/
//!   Novel_architecture.txt
//!   Novel_directory.txt
//!   character_state.txt
//!   global_summary.txt
//!   plot_arcs.txt
//!   chapter_status.json
//!   chapters/chapter_<n>.txt
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

use crate::application::ports::{PersistenceError, ProjectStorePort};
use crate::domain::project::{ChapterNumber, ChapterStatus, ProjectFile, ProjectPath};

/// 章节状态表文件名
pub const STATUS_FILE: &str = "chapter_status.json";

/// 文件系统项目存储
///
/// 不绑定具体项目目录，项目路径随每次调用传入
pub struct FileProjectStore {
    /// 串行化状态表的读改写
    status_lock: Mutex<()>,
}

impl FileProjectStore {
    pub fn new() -> Self {
        Self {
            status_lock: Mutex::new(()),
        }
    }

    fn status_path(project: &ProjectPath) -> PathBuf {
        project.as_path().join(STATUS_FILE)
    }

    async fn load_statuses(
        project: &ProjectPath,
    ) -> Result<BTreeMap<ChapterNumber, ChapterStatus>, PersistenceError> {
        let path = Self::status_path(project);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(PersistenceError::io(path.display(), e)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let entries: BTreeMap<String, ChapterStatus> =
            serde_json::from_str(&raw).map_err(|e| PersistenceError::CorruptStatusFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut statuses = BTreeMap::new();
        for (key, status) in entries {
            match key.parse::<ChapterNumber>() {
                Ok(chapter) => {
                    statuses.insert(chapter, status);
                }
                Err(_) => {
                    tracing::warn!(path = %path.display(), key = %key, "Ignoring invalid chapter key");
                }
            }
        }
        Ok(statuses)
    }

    async fn save_statuses(
        project: &ProjectPath,
        statuses: &BTreeMap<ChapterNumber, ChapterStatus>,
    ) -> Result<(), PersistenceError> {
        let entries: BTreeMap<String, ChapterStatus> = statuses
            .iter()
            .map(|(chapter, status)| (chapter.to_string(), *status))
            .collect();
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        fs::create_dir_all(project.as_path())
            .await
            .map_err(|e| PersistenceError::io(project, e))?;

        let path = Self::status_path(project);
        fs::write(&path, json)
            .await
            .map_err(|e| PersistenceError::io(path.display(), e))
    }
}

impl Default for FileProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStorePort for FileProjectStore {
    async fn read(
        &self,
        project: &ProjectPath,
        file: ProjectFile,
    ) -> Result<Option<String>, PersistenceError> {
        let path = project.file_path(&file);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::io(path.display(), e)),
        }
    }

    async fn write(
        &self,
        project: &ProjectPath,
        file: ProjectFile,
        text: &str,
    ) -> Result<(), PersistenceError> {
        let path = project.file_path(&file);

        // 确保父目录存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::io(parent.display(), e))?;
        }

        fs::write(&path, text)
            .await
            .map_err(|e| PersistenceError::io(path.display(), e))?;

        tracing::debug!(
            project = %project,
            file = %file,
            bytes = text.len(),
            "Project file written"
        );
        Ok(())
    }

    async fn list_chapters(
        &self,
        project: &ProjectPath,
    ) -> Result<Vec<ChapterNumber>, PersistenceError> {
        let dir = project.chapters_dir();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::io(dir.display(), e)),
        };

        let mut chapters = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PersistenceError::io(dir.display(), e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(chapter) = entry
                .file_name()
                .to_str()
                .and_then(ChapterNumber::from_file_name)
            {
                chapters.push(chapter);
            }
        }

        chapters.sort();
        Ok(chapters)
    }

    async fn chapter_statuses(
        &self,
        project: &ProjectPath,
    ) -> Result<BTreeMap<ChapterNumber, ChapterStatus>, PersistenceError> {
        Self::load_statuses(project).await
    }

    async fn set_chapter_status(
        &self,
        project: &ProjectPath,
        chapter: ChapterNumber,
        status: ChapterStatus,
    ) -> Result<(), PersistenceError> {
        let _guard = self.status_lock.lock().await;

        let mut statuses = Self::load_statuses(project).await?;
        statuses.insert(chapter, status);
        Self::save_statuses(project, &statuses).await?;

        tracing::debug!(
            project = %project,
            chapter = chapter.get(),
            status = %status,
            "Chapter status updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ch(n: u32) -> ChapterNumber {
        ChapterNumber::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = FileProjectStore::new();
        let project = ProjectPath::new(dir.path()).unwrap();

        assert_eq!(store.read(&project, ProjectFile::Architecture).await.unwrap(), None);
        assert!(store.list_chapters(&project).await.unwrap().is_empty());
        assert!(store.chapter_statuses(&project).await.unwrap().is_empty());
        assert_eq!(
            store.chapter_status(&project, ch(7)).await.unwrap(),
            ChapterStatus::Draft
        );
        assert!(!dir.path().join(STATUS_FILE).exists());
    }

    #[tokio::test]
    async fn test_write_creates_directories() {
        let dir = tempdir().unwrap();
        let store = FileProjectStore::new();
        let project = ProjectPath::new(dir.path().join("new").join("novel")).unwrap();

        store
            .write(&project, ProjectFile::Chapter(ch(1)), "第一章")
            .await
            .unwrap();

        let on_disk = std::fs::read_to_string(
            dir.path().join("new/novel/chapters/chapter_1.txt"),
        )
        .unwrap();
        assert_eq!(on_disk, "第一章");
    }

    #[tokio::test]
    async fn test_list_chapters_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let store = FileProjectStore::new();
        let project = ProjectPath::new(dir.path()).unwrap();

        for n in [10, 2, 1] {
            store
                .write(&project, ProjectFile::Chapter(ch(n)), "text")
                .await
                .unwrap();
        }
        let chapters_dir = dir.path().join("chapters");
        std::fs::write(chapters_dir.join("notes.txt"), "x").unwrap();
        std::fs::write(chapters_dir.join("chapter_x.txt"), "x").unwrap();
        std::fs::write(chapters_dir.join("chapter_0.txt"), "x").unwrap();
        std::fs::create_dir(chapters_dir.join("chapter_4.txt")).unwrap();

        let chapters = store.list_chapters(&project).await.unwrap();
        assert_eq!(chapters, vec![ch(1), ch(2), ch(10)]);
    }

    #[tokio::test]
    async fn test_status_file_uses_existing_labels() {
        let dir = tempdir().unwrap();
        let store = FileProjectStore::new();
        let project = ProjectPath::new(dir.path()).unwrap();

        store
            .set_chapter_status(&project, ch(1), ChapterStatus::Finalized)
            .await
            .unwrap();
        store
            .set_chapter_status(&project, ch(2), ChapterStatus::Draft)
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join(STATUS_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["1"], "已定稿");
        assert_eq!(json["2"], "草稿");

        assert_eq!(
            store.chapter_status(&project, ch(1)).await.unwrap(),
            ChapterStatus::Finalized
        );
        assert_eq!(
            store.chapter_status(&project, ch(3)).await.unwrap(),
            ChapterStatus::Draft
        );
    }

    #[tokio::test]
    async fn test_corrupt_status_file_is_error() {
        let dir = tempdir().unwrap();
        let store = FileProjectStore::new();
        let project = ProjectPath::new(dir.path()).unwrap();
        std::fs::write(dir.path().join(STATUS_FILE), "{\"1\": ").unwrap();

        let err = store.chapter_statuses(&project).await.unwrap_err();
        assert!(matches!(err, PersistenceError::CorruptStatusFile { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_status_updates_are_not_lost() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(FileProjectStore::new());
        let project = ProjectPath::new(dir.path()).unwrap();

        let mut handles = Vec::new();
        for n in 1..=8 {
            let store = store.clone();
            let project = project.clone();
            handles.push(tokio::spawn(async move {
                store
                    .set_chapter_status(&project, ch(n), ChapterStatus::Finalized)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.chapter_statuses(&project).await.unwrap().len(), 8);
    }
}
