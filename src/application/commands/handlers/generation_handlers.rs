//! Generation Command Handlers - 生成流水线编排
//!
//! 阶段严格有序: 架构 -> 蓝图 -> 草稿 -> 定稿
//!
//! 门控条件每次调用都从磁盘重新检查（无内存会话锁），因此每个调用都可以无状态地重入。
//! 除定稿外所有阶段都是全有或全无：后端失败时不写入任何文件。

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::{
    CheckConsistency, ConsistencyReport, FinalizeChapter, FinalizeChapterResponse,
    GenerateArchitecture, GenerateArchitectureResponse, GenerateBlueprint,
    GenerateBlueprintResponse, GenerateChapterDraft, GenerateChapterDraftResponse,
};
use crate::application::error::ApplicationError;
use crate::application::input::{chapter_number, project_path};
use crate::application::ports::{
    ArchitectureRequest, BackendError, BlueprintRequest, ConsistencyRequest, DraftRequest,
    FinalizeRequest, FinalizeUpdate, GenerationBackendPort, GenerationStage, ProjectStorePort,
};
use crate::application::queries::handlers::ChapterLifecycle;
use crate::application::queries::GetPipeline;
use crate::domain::project::{
    ChapterNumber, ChapterStatus, PipelineState, ProjectFile, ProjectPath, StageGates,
};

/// 流水线概览
#[derive(Debug, Clone)]
pub struct PipelineOverview {
    pub project: ProjectPath,
    pub state: PipelineState,
    pub gates: StageGates,
}

/// GenerationOrchestrator - 驱动四阶段生成流水线
pub struct GenerationOrchestrator {
    store: Arc<dyn ProjectStorePort>,
    backend: Arc<dyn GenerationBackendPort>,
}

impl GenerationOrchestrator {
    pub fn new(store: Arc<dyn ProjectStorePort>, backend: Arc<dyn GenerationBackendPort>) -> Self {
        Self { store, backend }
    }

    // ========================================================================
    // Stage 1: Architecture
    // ========================================================================

    pub async fn generate_architecture(
        &self,
        command: GenerateArchitecture,
    ) -> Result<GenerateArchitectureResponse, ApplicationError> {
        let project = project_path(&command.project_path)?;
        if command.topic.trim().is_empty() {
            return Err(ApplicationError::validation("novel topic is empty"));
        }

        let request = ArchitectureRequest {
            project: project.clone(),
            topic: command.topic,
            genre: command.genre,
            chapter_count: command.chapter_count,
            word_target: command.word_target,
            guidance: command.guidance,
        };

        tracing::info!(
            project = %project,
            topic = %request.topic,
            genre = %request.genre,
            chapters = request.chapter_count,
            "Generating novel architecture"
        );

        let architecture = self
            .backend
            .generate_architecture(&command.llm, &request)
            .await
            .and_then(require_content)
            .map_err(|e| backend_failure(GenerationStage::Architecture, &project, e))?;

        self.store
            .write(&project, ProjectFile::Architecture, &architecture)
            .await?;

        tracing::info!(
            project = %project,
            chars = architecture.chars().count(),
            "Novel architecture generated"
        );

        Ok(GenerateArchitectureResponse {
            project,
            architecture,
            blueprint_enabled: true,
            completed_at: Utc::now(),
        })
    }

    // ========================================================================
    // Stage 2: Blueprint
    // ========================================================================

    pub async fn generate_blueprint(
        &self,
        command: GenerateBlueprint,
    ) -> Result<GenerateBlueprintResponse, ApplicationError> {
        let project = project_path(&command.project_path)?;

        let architecture = self
            .store
            .read_non_empty(&project, ProjectFile::Architecture)
            .await?
            .ok_or_else(|| {
                gate_closed(&project, GenerationStage::Blueprint, "novel architecture is missing")
            })?;

        let request = BlueprintRequest {
            project: project.clone(),
            architecture,
            chapter_count: command.chapter_count,
            guidance: command.guidance,
        };

        tracing::info!(
            project = %project,
            chapters = request.chapter_count,
            "Generating chapter blueprint"
        );

        let blueprint = self
            .backend
            .generate_blueprint(&command.llm, &request)
            .await
            .and_then(require_content)
            .map_err(|e| backend_failure(GenerationStage::Blueprint, &project, e))?;

        self.store
            .write(&project, ProjectFile::Blueprint, &blueprint)
            .await?;

        tracing::info!(
            project = %project,
            chars = blueprint.chars().count(),
            "Chapter blueprint generated"
        );

        Ok(GenerateBlueprintResponse {
            project,
            blueprint,
            draft_enabled: true,
            completed_at: Utc::now(),
        })
    }

    // ========================================================================
    // Stage 3: Chapter draft
    // ========================================================================

    pub async fn generate_chapter_draft(
        &self,
        command: GenerateChapterDraft,
    ) -> Result<GenerateChapterDraftResponse, ApplicationError> {
        let project = project_path(&command.project_path)?;
        let chapter = chapter_number(command.chapter)?;

        let blueprint = self
            .store
            .read_non_empty(&project, ProjectFile::Blueprint)
            .await?
            .ok_or_else(|| {
                gate_closed(&project, GenerationStage::Draft, "chapter blueprint is missing")
            })?;

        // 状态文件损坏时在调用后端之前失败，不留下章节文件
        self.store.chapter_statuses(&project).await?;

        let architecture = self.read_or_empty(&project, ProjectFile::Architecture).await?;
        let global_summary = self.read_or_empty(&project, ProjectFile::GlobalSummary).await?;
        let character_state = self.read_or_empty(&project, ProjectFile::CharacterState).await?;
        let previous_chapters = self.previous_chapters(&project, chapter).await?;

        let request = DraftRequest {
            project: project.clone(),
            chapter,
            word_target: command.word_target,
            guidance: command.guidance,
            characters_involved: command.characters_involved,
            key_items: command.key_items,
            scene_location: command.scene_location,
            time_constraint: command.time_constraint,
            architecture,
            blueprint,
            global_summary,
            character_state,
            previous_chapters,
        };

        tracing::info!(
            project = %project,
            chapter = chapter.get(),
            word_target = request.word_target,
            retrieval_k = command.embedding.retrieval_k,
            previous = request.previous_chapters.len(),
            "Generating chapter draft"
        );

        let content = self
            .backend
            .generate_chapter_draft(&command.llm, &command.embedding, &request)
            .await
            .and_then(require_content)
            .map_err(|e| backend_failure(GenerationStage::Draft, &project, e))?;

        self.store
            .write(&project, ProjectFile::Chapter(chapter), &content)
            .await?;
        self.store
            .set_chapter_status(&project, chapter, ChapterStatus::Draft)
            .await?;

        tracing::info!(
            project = %project,
            chapter = chapter.get(),
            chars = content.chars().count(),
            "Chapter draft generated"
        );

        Ok(GenerateChapterDraftResponse {
            project,
            chapter,
            content,
            status: ChapterStatus::Draft,
            current_chapter: chapter,
            completed_at: Utc::now(),
        })
    }

    // ========================================================================
    // Stage 4: Finalize
    // ========================================================================

    /// 定稿章节
    ///
    /// 调用方传入的正文先于一切后端调用写入磁盘；之后摘要 / 角色状态更新失败时，
    /// 正文保留、状态保持草稿，并返回 `ChapterSavedNotFinalized`。
    /// 更新结果先写全局摘要、再写角色状态，最后才标记为已定稿
    pub async fn finalize_chapter(
        &self,
        command: FinalizeChapter,
    ) -> Result<FinalizeChapterResponse, ApplicationError> {
        let project = project_path(&command.project_path)?;
        let chapter = chapter_number(command.chapter)?;
        if command.chapter_text.trim().is_empty() {
            return Err(ApplicationError::validation(format!(
                "chapter {} content is empty, nothing to finalize",
                chapter
            )));
        }

        self.store
            .write(&project, ProjectFile::Chapter(chapter), &command.chapter_text)
            .await?;
        self.store
            .set_chapter_status(&project, chapter, ChapterStatus::Draft)
            .await?;

        tracing::info!(
            project = %project,
            chapter = chapter.get(),
            chars = command.chapter_text.chars().count(),
            "Chapter content saved, finalizing"
        );

        let request = FinalizeRequest {
            project: project.clone(),
            chapter,
            word_target: command.word_target,
            global_summary: self.read_or_empty(&project, ProjectFile::GlobalSummary).await?,
            character_state: self.read_or_empty(&project, ProjectFile::CharacterState).await?,
            chapter_text: command.chapter_text,
        };

        let update = self
            .backend
            .finalize_chapter(&command.llm, &command.embedding, &request)
            .await
            .and_then(require_update)
            .map_err(|e| {
                tracing::error!(
                    project = %project,
                    chapter = chapter.get(),
                    error = %e,
                    "Finalization failed, chapter kept as draft"
                );
                ApplicationError::ChapterSavedNotFinalized {
                    chapter,
                    message: e.to_string(),
                }
            })?;

        self.store
            .write(&project, ProjectFile::GlobalSummary, &update.global_summary)
            .await?;
        self.store
            .write(&project, ProjectFile::CharacterState, &update.character_state)
            .await?;
        self.store
            .set_chapter_status(&project, chapter, ChapterStatus::Finalized)
            .await?;

        let next_chapter = chapter.next();
        tracing::info!(
            project = %project,
            chapter = chapter.get(),
            next_chapter = next_chapter.get(),
            "Chapter finalized"
        );

        Ok(FinalizeChapterResponse {
            project,
            chapter,
            status: ChapterStatus::Finalized,
            next_chapter,
            completed_at: Utc::now(),
        })
    }

    // ========================================================================
    // Consistency check (read-only)
    // ========================================================================

    pub async fn check_consistency(
        &self,
        command: CheckConsistency,
    ) -> Result<ConsistencyReport, ApplicationError> {
        let project = project_path(&command.project_path)?;
        let chapter = chapter_number(command.chapter)?;

        let chapter_text = match command.chapter_text.filter(|t| !t.trim().is_empty()) {
            Some(text) => text,
            None => self
                .store
                .read_non_empty(&project, ProjectFile::Chapter(chapter))
                .await?
                .ok_or_else(|| {
                    ApplicationError::validation(format!("chapter {} has no content", chapter))
                })?,
        };

        let request = ConsistencyRequest {
            project: project.clone(),
            chapter,
            novel_setting: self.read_or_empty(&project, ProjectFile::Architecture).await?,
            character_state: self.read_or_empty(&project, ProjectFile::CharacterState).await?,
            global_summary: self.read_or_empty(&project, ProjectFile::GlobalSummary).await?,
            chapter_text,
        };

        tracing::info!(project = %project, chapter = chapter.get(), "Checking consistency");

        let report = self
            .backend
            .check_consistency(&command.llm, &request)
            .await
            .and_then(require_content)
            .map_err(|e| backend_failure(GenerationStage::Consistency, &project, e))?;

        Ok(ConsistencyReport {
            project,
            chapter,
            report,
            completed_at: Utc::now(),
        })
    }

    /// 流水线状态与各阶段门控
    pub async fn pipeline(&self, query: GetPipeline) -> Result<PipelineOverview, ApplicationError> {
        let project = project_path(&query.project_path)?;
        let snapshot = ChapterLifecycle::new(self.store.clone())
            .snapshot(&project)
            .await?;

        Ok(PipelineOverview {
            project,
            state: PipelineState::derive(&snapshot),
            gates: StageGates::from_snapshot(&snapshot),
        })
    }

    async fn read_or_empty(
        &self,
        project: &ProjectPath,
        file: ProjectFile,
    ) -> Result<String, ApplicationError> {
        Ok(self.store.read(project, file).await?.unwrap_or_default())
    }

    async fn previous_chapters(
        &self,
        project: &ProjectPath,
        chapter: ChapterNumber,
    ) -> Result<Vec<(ChapterNumber, String)>, ApplicationError> {
        let mut previous = Vec::new();
        for n in self.store.list_chapters(project).await? {
            if n >= chapter {
                break;
            }
            if let Some(text) = self.store.read_non_empty(project, ProjectFile::Chapter(n)).await? {
                previous.push((n, text));
            }
        }
        Ok(previous)
    }
}

fn require_content(text: String) -> Result<String, BackendError> {
    if text.trim().is_empty() {
        Err(BackendError::EmptyResponse)
    } else {
        Ok(text)
    }
}

fn require_update(update: FinalizeUpdate) -> Result<FinalizeUpdate, BackendError> {
    if update.character_state.trim().is_empty() || update.global_summary.trim().is_empty() {
        Err(BackendError::EmptyResponse)
    } else {
        Ok(update)
    }
}

fn backend_failure(
    stage: GenerationStage,
    project: &ProjectPath,
    err: BackendError,
) -> ApplicationError {
    tracing::error!(project = %project, stage = %stage, error = %err, "Generation stage failed");
    ApplicationError::backend(stage, err)
}

fn gate_closed(project: &ProjectPath, stage: GenerationStage, reason: &str) -> ApplicationError {
    tracing::warn!(project = %project, stage = %stage, reason = reason, "Stage gate closed");
    ApplicationError::validation(format!("cannot run {} stage: {}", stage, reason))
}
