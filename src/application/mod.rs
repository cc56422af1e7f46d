//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（ProjectStore、ConfigStore、GenerationBackend、模型客户端）
//! - commands: CQRS 命令及处理器（生成流水线、配置、连通性探测）
//! - queries: CQRS 查询及处理器（章节生命周期、项目文件）
//! - session: 界面会话上下文
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
mod input;
pub mod ports;
pub mod queries;
pub mod session;

// Re-exports
pub use commands::{
    // Generation commands
    CheckConsistency,
    ConsistencyReport,
    FinalizeChapter,
    FinalizeChapterResponse,
    GenerateArchitecture,
    GenerateArchitectureResponse,
    GenerateBlueprint,
    GenerateBlueprintResponse,
    GenerateChapterDraft,
    GenerateChapterDraftResponse,
    // Config commands
    SaveGlobalConfig,
    SaveProjectFile,
    SaveProjectParams,
    TestEmbeddingConfig,
    TestLlmConfig,
    // Handlers
    handlers::{
        ConfigHandler, ConfigOrigin, ConfigValidator, GenerationOrchestrator, GlobalConfigLoad,
        PipelineOverview, ProbeOutcome, SaveProjectFileHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    BackendError, ClientProviderPort, ConfigStoreError, ConfigStorePort, EmbeddingClientPort,
    GenerationBackendPort, GenerationStage, LlmClientPort, PersistenceError, ProjectStorePort,
};

pub use queries::{
    GetChapterStatus, GetPipeline, ListChapters, LoadProjectFile, LoadProjectParams, NextChapter,
    PrevChapter,
    // Handlers
    handlers::{ChapterLifecycle, LoadProjectFileHandler, ProjectFileResponse},
};

pub use session::SessionContext;
