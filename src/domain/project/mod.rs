//! Project Context - 小说项目限界上下文
//!
//! 职责:
//! - 项目目录与逻辑文件命名
//! - 章节号与章节状态
//! - 生成流水线状态机与阶段门控

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::{next_chapter_to_write, PipelineState, ProjectSnapshot, StageGates};
pub use entities::{ChapterEntry, ChapterStatus};
pub use errors::ProjectError;
pub use value_objects::{ChapterNumber, ProjectFile, ProjectPath, CHAPTERS_DIR};
