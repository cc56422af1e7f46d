//! 边界输入校验
//!
//! 表单中的原始字符串 / 数字在进入处理器时一次性转换为领域值对象

use crate::application::error::ApplicationError;
use crate::domain::project::{ChapterNumber, ProjectPath};

pub(crate) fn project_path(raw: &str) -> Result<ProjectPath, ApplicationError> {
    ProjectPath::new(raw.trim())
        .map_err(|_| ApplicationError::validation("project path is empty, set a save directory first"))
}

pub(crate) fn chapter_number(raw: u32) -> Result<ChapterNumber, ApplicationError> {
    ChapterNumber::new(raw)
        .map_err(|_| ApplicationError::validation(format!("invalid chapter number: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_path_is_validation_error() {
        assert!(project_path("  ").unwrap_err().is_validation());
        assert!(project_path("/tmp/novel").is_ok());
    }

    #[test]
    fn test_zero_chapter_is_validation_error() {
        assert!(chapter_number(0).unwrap_err().is_validation());
        assert_eq!(chapter_number(2).unwrap().get(), 2);
    }
}
