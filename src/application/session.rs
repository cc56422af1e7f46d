//! Session Context - 单个界面会话的可变状态
//!
//! 持有当前激活的服务配置、项目参数与章节指针，并把它们组装成各阶段命令。
//! 会话本身不做任何持久化，所有持久状态都在项目目录与全局配置文件中

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::commands::handlers::ConfigHandler;
use crate::application::commands::{
    CheckConsistency, FinalizeChapter, FinalizeChapterResponse, GenerateArchitecture,
    GenerateBlueprint, GenerateChapterDraft, GenerateChapterDraftResponse,
};
use crate::application::error::ApplicationError;
use crate::application::input::project_path;
use crate::application::queries::handlers::ChapterLifecycle;
use crate::application::queries::LoadProjectParams;
use crate::domain::project::{ChapterNumber, ProjectPath};
use crate::domain::settings::{
    resolve_novel_params, EmbeddingConfig, GlobalConfig, LlmConfig, NovelParams,
};

/// 会话上下文
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub global: GlobalConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub project: Option<ProjectPath>,
    pub params: NovelParams,
    /// 下一次起草 / 定稿默认作用的章节
    pub current_chapter: ChapterNumber,
}

impl SessionContext {
    /// 用全局配置初始化会话（尚未打开项目时使用旧版内嵌参数）
    pub fn from_global(global: GlobalConfig) -> Self {
        let params = resolve_novel_params(None, global.other_params.as_ref());
        let project = ProjectPath::new(&params.filepath).ok();

        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            llm: global.active_llm(),
            embedding: global.active_embedding(),
            global,
            project,
            params,
            current_chapter: ChapterNumber::FIRST,
        };

        tracing::info!(
            session_id = %session.id,
            llm = %session.llm.describe(),
            embedding = %session.embedding.interface_format,
            "Session started"
        );
        session
    }

    /// 切换项目目录
    ///
    /// 重新加载项目参数并把章节指针定位到下一章待写章节；服务配置保持不变
    pub async fn switch_project(
        &mut self,
        raw_path: &str,
        config: &ConfigHandler,
        lifecycle: &ChapterLifecycle,
    ) -> Result<(), ApplicationError> {
        let project = project_path(raw_path)?;
        let params = config
            .load_project_params(
                LoadProjectParams {
                    project_path: project.to_string(),
                },
                self.global.other_params.as_ref(),
            )
            .await?;
        let current_chapter = lifecycle.next_to_write(&project).await?;

        tracing::info!(
            session_id = %self.id,
            project = %project,
            current_chapter = current_chapter.get(),
            "Project switched"
        );

        self.project = Some(project);
        self.params = params;
        self.current_chapter = current_chapter;
        Ok(())
    }

    pub fn record_draft(&mut self, response: &GenerateChapterDraftResponse) {
        self.current_chapter = response.current_chapter;
    }

    /// 定稿成功后章节指针前移
    pub fn record_finalized(&mut self, response: &FinalizeChapterResponse) {
        self.current_chapter = response.next_chapter;
    }

    /// 项目路径原样交给处理器校验，未打开项目时为空串
    pub fn project_path(&self) -> String {
        self.project
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn architecture_command(&self) -> GenerateArchitecture {
        GenerateArchitecture {
            llm: self.llm.clone(),
            project_path: self.project_path(),
            topic: self.params.topic.clone(),
            genre: self.params.genre.clone(),
            chapter_count: self.params.num_chapters,
            word_target: self.params.word_number,
            guidance: self.params.user_guidance.clone(),
        }
    }

    pub fn blueprint_command(&self) -> GenerateBlueprint {
        GenerateBlueprint {
            llm: self.llm.clone(),
            project_path: self.project_path(),
            chapter_count: self.params.num_chapters,
            guidance: self.params.user_guidance.clone(),
        }
    }

    /// 未指定章节时起草当前章节
    pub fn draft_command(&self, chapter: Option<u32>) -> GenerateChapterDraft {
        GenerateChapterDraft {
            llm: self.llm.clone(),
            embedding: self.embedding.clone(),
            project_path: self.project_path(),
            chapter: chapter.unwrap_or(self.current_chapter.get()),
            word_target: self.params.word_number,
            guidance: self.params.user_guidance.clone(),
            characters_involved: self.params.characters_involved.clone(),
            key_items: self.params.key_items.clone(),
            scene_location: self.params.scene_location.clone(),
            time_constraint: self.params.time_constraint.clone(),
        }
    }

    pub fn finalize_command(&self, chapter: Option<u32>, chapter_text: String) -> FinalizeChapter {
        FinalizeChapter {
            llm: self.llm.clone(),
            embedding: self.embedding.clone(),
            project_path: self.project_path(),
            chapter: chapter.unwrap_or(self.current_chapter.get()),
            word_target: self.params.word_number,
            chapter_text,
        }
    }

    pub fn consistency_command(
        &self,
        chapter: Option<u32>,
        chapter_text: Option<String>,
    ) -> CheckConsistency {
        CheckConsistency {
            llm: self.llm.clone(),
            project_path: self.project_path(),
            chapter: chapter.unwrap_or(self.current_chapter.get()),
            chapter_text,
        }
    }
}
