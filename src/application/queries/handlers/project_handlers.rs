//! Project Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::input::project_path;
use crate::application::ports::ProjectStorePort;
use crate::application::queries::LoadProjectFile;
use crate::domain::project::ProjectFile;

/// 项目文件读取响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFileResponse {
    pub file: ProjectFile,
    /// 文件不存在时为 None
    pub content: Option<String>,
}

/// LoadProjectFile Handler
pub struct LoadProjectFileHandler {
    store: Arc<dyn ProjectStorePort>,
}

impl LoadProjectFileHandler {
    pub fn new(store: Arc<dyn ProjectStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: LoadProjectFile,
    ) -> Result<ProjectFileResponse, ApplicationError> {
        let project = project_path(&query.project_path)?;
        let file = ProjectFile::from_name(&query.file_name)?;
        let content = self.store.read(&project, file).await?;

        tracing::debug!(
            project = %project,
            file = %file,
            found = content.is_some(),
            "Project file loaded"
        );

        Ok(ProjectFileResponse { file, content })
    }
}
