//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod config_handlers;
mod generation_handlers;
mod project_file_handlers;
mod validation_handlers;

pub use config_handlers::*;
pub use generation_handlers::*;
pub use project_file_handlers::*;
pub use validation_handlers::*;
