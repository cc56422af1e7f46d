//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod config_store;
mod generation_backend;
mod model_client;
mod project_store;

pub use config_store::{ConfigStoreError, ConfigStorePort};
pub use generation_backend::{
    ArchitectureRequest, BackendError, BlueprintRequest, ConsistencyRequest, DraftRequest,
    FinalizeRequest, FinalizeUpdate, GenerationBackendPort, GenerationStage,
};
pub use model_client::{ClientProviderPort, EmbeddingClientPort, LlmClientPort};
pub use project_store::{PersistenceError, ProjectStorePort};
