//! Chapter Query Handlers - 章节生命周期视图
//!
//! 纯派生视图：每次调用都重新扫描项目目录，不保存任何独立状态

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::input::{chapter_number, project_path};
use crate::application::ports::ProjectStorePort;
use crate::application::queries::{GetChapterStatus, ListChapters, NextChapter, PrevChapter};
use crate::domain::project::{
    next_chapter_to_write, ChapterEntry, ChapterNumber, ChapterStatus, ProjectFile, ProjectPath,
    ProjectSnapshot,
};

/// ChapterLifecycle - 章节列表、状态与前后导航
pub struct ChapterLifecycle {
    store: Arc<dyn ProjectStorePort>,
}

impl ChapterLifecycle {
    pub fn new(store: Arc<dyn ProjectStorePort>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: ListChapters) -> Result<Vec<ChapterNumber>, ApplicationError> {
        let project = project_path(&query.project_path)?;
        Ok(self.store.list_chapters(&project).await?)
    }

    pub async fn status_of(
        &self,
        query: GetChapterStatus,
    ) -> Result<ChapterStatus, ApplicationError> {
        let project = project_path(&query.project_path)?;
        let chapter = chapter_number(query.chapter)?;
        Ok(self.store.chapter_status(&project, chapter).await?)
    }

    /// 编号大于 `after` 的最小已有章节
    pub async fn next_after(
        &self,
        query: NextChapter,
    ) -> Result<Option<ChapterNumber>, ApplicationError> {
        let project = project_path(&query.project_path)?;
        let chapters = self.store.list_chapters(&project).await?;
        Ok(chapters.into_iter().find(|n| n.get() > query.after))
    }

    /// 编号小于 `before` 的最大已有章节
    pub async fn prev_before(
        &self,
        query: PrevChapter,
    ) -> Result<Option<ChapterNumber>, ApplicationError> {
        let project = project_path(&query.project_path)?;
        let chapters = self.store.list_chapters(&project).await?;
        Ok(chapters.into_iter().rev().find(|n| n.get() < query.before))
    }

    /// 章节列表及各自状态
    pub async fn overview(&self, project: &ProjectPath) -> Result<Vec<ChapterEntry>, ApplicationError> {
        Ok(self
            .chapter_map(project)
            .await?
            .into_iter()
            .map(|(n, status)| ChapterEntry::new(n, status))
            .collect())
    }

    /// 切换项目后应定位到的章节
    pub async fn next_to_write(&self, project: &ProjectPath) -> Result<ChapterNumber, ApplicationError> {
        Ok(next_chapter_to_write(&self.chapter_map(project).await?))
    }

    /// 当前项目快照，供流水线状态推导
    pub async fn snapshot(&self, project: &ProjectPath) -> Result<ProjectSnapshot, ApplicationError> {
        let has_architecture = self
            .store
            .read_non_empty(project, ProjectFile::Architecture)
            .await?
            .is_some();
        let has_blueprint = self
            .store
            .read_non_empty(project, ProjectFile::Blueprint)
            .await?
            .is_some();

        Ok(ProjectSnapshot {
            has_architecture,
            has_blueprint,
            chapters: self.chapter_map(project).await?,
        })
    }

    /// 只包含磁盘上真实存在的章节；状态表中多余的记录被忽略
    async fn chapter_map(
        &self,
        project: &ProjectPath,
    ) -> Result<BTreeMap<ChapterNumber, ChapterStatus>, ApplicationError> {
        let chapters = self.store.list_chapters(project).await?;
        let statuses = self.store.chapter_statuses(project).await?;
        Ok(chapters
            .into_iter()
            .map(|n| (n, statuses.get(&n).copied().unwrap_or_default()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::FileProjectStore;
    use tempfile::tempdir;

    fn ch(n: u32) -> ChapterNumber {
        ChapterNumber::new(n).unwrap()
    }

    async fn seeded(dir: &std::path::Path) -> (ChapterLifecycle, Arc<FileProjectStore>, ProjectPath) {
        let store = Arc::new(FileProjectStore::new());
        let project = ProjectPath::new(dir).unwrap();
        for n in [1, 2, 5] {
            store
                .write(&project, ProjectFile::Chapter(ch(n)), &format!("第{}章", n))
                .await
                .unwrap();
        }
        store
            .set_chapter_status(&project, ch(1), ChapterStatus::Finalized)
            .await
            .unwrap();
        (ChapterLifecycle::new(store.clone()), store, project)
    }

    #[tokio::test]
    async fn test_navigation_over_sparse_chapters() {
        let dir = tempdir().unwrap();
        let (lifecycle, _, project) = seeded(dir.path()).await;
        let path = project.to_string();

        let listed = lifecycle
            .list(ListChapters { project_path: path.clone() })
            .await
            .unwrap();
        assert_eq!(listed, vec![ch(1), ch(2), ch(5)]);

        let next = lifecycle
            .next_after(NextChapter { project_path: path.clone(), after: 2 })
            .await
            .unwrap();
        assert_eq!(next, Some(ch(5)));

        let prev = lifecycle
            .prev_before(PrevChapter { project_path: path.clone(), before: 5 })
            .await
            .unwrap();
        assert_eq!(prev, Some(ch(2)));

        let none = lifecycle
            .prev_before(PrevChapter { project_path: path, before: 1 })
            .await
            .unwrap();
        assert_eq!(none, None);
    }

    #[tokio::test]
    async fn test_every_listed_chapter_has_a_status() {
        let dir = tempdir().unwrap();
        let (lifecycle, _, project) = seeded(dir.path()).await;

        let overview = lifecycle.overview(&project).await.unwrap();
        assert_eq!(
            overview,
            vec![
                ChapterEntry::new(ch(1), ChapterStatus::Finalized),
                ChapterEntry::new(ch(2), ChapterStatus::Draft),
                ChapterEntry::new(ch(5), ChapterStatus::Draft),
            ]
        );

        for entry in overview {
            let status = lifecycle
                .status_of(GetChapterStatus {
                    project_path: project.to_string(),
                    chapter: entry.number.get(),
                })
                .await
                .unwrap();
            assert_eq!(status, entry.status);
        }
    }

    #[tokio::test]
    async fn test_status_records_without_files_are_ignored() {
        let dir = tempdir().unwrap();
        let (lifecycle, store, project) = seeded(dir.path()).await;
        store
            .set_chapter_status(&project, ch(9), ChapterStatus::Finalized)
            .await
            .unwrap();

        let snapshot = lifecycle.snapshot(&project).await.unwrap();
        assert!(!snapshot.chapters.contains_key(&ch(9)));
        assert_eq!(lifecycle.next_to_write(&project).await.unwrap(), ch(5));
    }

    #[tokio::test]
    async fn test_empty_path_is_rejected() {
        let store = Arc::new(FileProjectStore::new());
        let lifecycle = ChapterLifecycle::new(store);
        let err = lifecycle
            .list(ListChapters { project_path: String::new() })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
