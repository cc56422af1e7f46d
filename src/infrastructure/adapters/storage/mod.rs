//! Storage Adapters - 文件系统存储

mod file_project_store;
mod json_config_store;

pub use file_project_store::{FileProjectStore, STATUS_FILE};
pub use json_config_store::{JsonConfigStore, PROJECT_PARAMS_FILE};
