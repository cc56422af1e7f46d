//! Project Queries - 项目文件与流水线状态

/// 读取项目内的单个逻辑文件
#[derive(Debug, Clone)]
pub struct LoadProjectFile {
    pub project_path: String,
    pub file_name: String,
}

/// 查询流水线状态与阶段门控
#[derive(Debug, Clone)]
pub struct GetPipeline {
    pub project_path: String,
}

/// 读取项目参数
#[derive(Debug, Clone)]
pub struct LoadProjectParams {
    pub project_path: String,
}
