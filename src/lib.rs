//! NovelForge - LLM 长篇小说生成编排
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Project Context: 项目目录、章节状态、生成流水线状态机
//! - Settings Context: 模型服务配置、小说参数
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ProjectStore, ConfigStore, GenerationBackend, 模型客户端）
//! - Commands: 生成流水线、配置保存、连通性探测
//! - Queries: 章节生命周期、项目文件读取
//! - Session: 界面会话上下文
//!
//! 基础设施层 (infrastructure/):
//! - Storage: 项目目录与 JSON 配置文件
//! - LLM: OpenAI 兼容 / Gemini / Azure 客户端与 Embedding 客户端
//! - Generation: 基于 LLM 的生成后端

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
