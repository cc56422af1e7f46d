//! Chapter Queries - 章节导航与状态

/// 列出项目中已有的章节
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub project_path: String,
}

/// 查询单个章节状态
#[derive(Debug, Clone)]
pub struct GetChapterStatus {
    pub project_path: String,
    pub chapter: u32,
}

/// 查询某章之后的下一个已有章节
#[derive(Debug, Clone)]
pub struct NextChapter {
    pub project_path: String,
    pub after: u32,
}

/// 查询某章之前的上一个已有章节
#[derive(Debug, Clone)]
pub struct PrevChapter {
    pub project_path: String,
    pub before: u32,
}
