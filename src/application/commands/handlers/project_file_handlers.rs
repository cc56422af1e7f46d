//! Project File Command Handlers - 手工编辑的项目文件保存

use std::sync::Arc;

use crate::application::commands::SaveProjectFile;
use crate::application::error::ApplicationError;
use crate::application::input::project_path;
use crate::application::ports::ProjectStorePort;
use crate::domain::project::ProjectFile;

/// SaveProjectFile Handler
///
/// 整体覆盖写入，不改变章节状态
pub struct SaveProjectFileHandler {
    store: Arc<dyn ProjectStorePort>,
}

impl SaveProjectFileHandler {
    pub fn new(store: Arc<dyn ProjectStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: SaveProjectFile) -> Result<ProjectFile, ApplicationError> {
        let project = project_path(&command.project_path)?;
        let file = ProjectFile::from_name(&command.file_name)?;
        self.store.write(&project, file, &command.content).await?;

        tracing::info!(
            project = %project,
            file = %file,
            chars = command.content.chars().count(),
            "Project file saved"
        );
        Ok(file)
    }
}
