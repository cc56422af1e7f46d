//! 各生成阶段的提示词模板

use crate::application::ports::{
    ArchitectureRequest, BlueprintRequest, ConsistencyRequest, DraftRequest, FinalizeRequest,
};

/// 可选字段为空时不出现在提示词中
fn optional_line(label: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{}：{}\n", label, value)
    }
}

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "（暂无）"
    } else {
        text
    }
}

pub fn architecture(request: &ArchitectureRequest) -> String {
    format!(
        "你是一名资深的长篇小说策划。请根据以下信息设计完整的小说架构。\n\n\
         主题：{topic}\n\
         类型：{genre}\n\
         计划章节数：{chapters}\n\
         每章字数：约{words}字\n\
         {guidance}\n\
         请依次输出：\n\
         1. 核心种子（一句话概括故事内核）\n\
         2. 角色动力学（主要角色的目标、矛盾与成长弧线）\n\
         3. 世界观设定（时代、地理、规则体系）\n\
         4. 三幕式情节架构（每幕的关键转折与高潮）\n",
        topic = request.topic.trim(),
        genre = request.genre.trim(),
        chapters = request.chapter_count,
        words = request.word_target,
        guidance = optional_line("额外指导", &request.guidance),
    )
}

pub fn blueprint(request: &BlueprintRequest) -> String {
    format!(
        "以下是小说架构：\n{architecture}\n\n\
         请据此为全书 {chapters} 章生成章节目录。每章单独成段，格式为：\n\
         第N章 - 章节标题\n\
         本章定位：…\n\
         核心作用：…\n\
         悬念密度：…\n\
         伏笔操作：…\n\
         本章简述：…\n\n\
         {guidance}\
         章节编号必须从第1章连续到第{chapters}章。\n",
        architecture = request.architecture.trim(),
        chapters = request.chapter_count,
        guidance = optional_line("额外指导", &request.guidance),
    )
}

pub struct DraftContext<'a> {
    pub outline: Option<&'a str>,
    pub previous_excerpt: Option<&'a str>,
    pub retrieved: &'a [String],
}

pub fn draft(request: &DraftRequest, context: &DraftContext<'_>) -> String {
    let retrieved = if context.retrieved.is_empty() {
        "（暂无）".to_string()
    } else {
        context
            .retrieved
            .iter()
            .enumerate()
            .map(|(i, passage)| format!("[{}] {}", i + 1, passage))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "你是一名小说作者，正在创作第{chapter}章。\n\n\
         【小说架构】\n{architecture}\n\n\
         【本章目录】\n{outline}\n\n\
         【全局摘要】\n{summary}\n\n\
         【角色状态】\n{state}\n\n\
         【上一章结尾】\n{previous}\n\n\
         【相关前文片段】\n{retrieved}\n\n\
         写作要求：\n\
         - 字数约{words}字\n\
         {characters}{items}{scene}{time}{guidance}\
         - 与前文保持连贯，不要重复已经发生的情节\n\n\
         请直接输出第{chapter}章正文：\n",
        chapter = request.chapter,
        architecture = or_none(&request.architecture),
        outline = context.outline.map(str::trim).filter(|o| !o.is_empty()).unwrap_or("（目录中没有本章条目）"),
        summary = or_none(&request.global_summary),
        state = or_none(&request.character_state),
        previous = context.previous_excerpt.unwrap_or("（这是第一章）"),
        retrieved = retrieved,
        words = request.word_target,
        characters = optional_line("- 核心人物", &request.characters_involved),
        items = optional_line("- 关键道具", &request.key_items),
        scene = optional_line("- 空间坐标", &request.scene_location),
        time = optional_line("- 时间压力", &request.time_constraint),
        guidance = optional_line("- 额外指导", &request.guidance),
    )
}

pub fn global_summary(request: &FinalizeRequest) -> String {
    format!(
        "以下是第{chapter}章的正文：\n{text}\n\n\
         以下是截至上一章的全局摘要：\n{summary}\n\n\
         请把本章的关键事件合并进全局摘要，保持按时间顺序、简洁客观。只输出更新后的完整摘要：\n",
        chapter = request.chapter,
        text = request.chapter_text.trim(),
        summary = or_none(&request.global_summary),
    )
}

pub fn character_state(request: &FinalizeRequest) -> String {
    format!(
        "以下是第{chapter}章的正文：\n{text}\n\n\
         以下是当前的角色状态文档：\n{state}\n\n\
         请根据本章内容更新每个角色的物品、能力、状态、主要关系与触发或加深的事件；\
         新登场角色追加条目。只输出更新后的完整角色状态文档：\n",
        chapter = request.chapter,
        text = request.chapter_text.trim(),
        state = or_none(&request.character_state),
    )
}

pub fn consistency(request: &ConsistencyRequest) -> String {
    format!(
        "请审校第{chapter}章与既有设定是否冲突。\n\n\
         【小说设定】\n{setting}\n\n\
         【角色状态】\n{state}\n\n\
         【全局摘要】\n{summary}\n\n\
         【待检查章节】\n{text}\n\n\
         请逐条列出角色行为、时间线、世界规则与前文事实上的冲突，并给出修改建议；\
         没有冲突时回答“无明显冲突”。\n",
        chapter = request.chapter,
        setting = or_none(&request.novel_setting),
        state = or_none(&request.character_state),
        summary = or_none(&request.global_summary),
        text = request.chapter_text.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ProjectPath;

    #[test]
    fn test_architecture_prompt_skips_empty_guidance() {
        let request = ArchitectureRequest {
            project: ProjectPath::new("/tmp/novel").unwrap(),
            topic: "A lonely lighthouse keeper".to_string(),
            genre: "mystery".to_string(),
            chapter_count: 5,
            word_target: 2000,
            guidance: "  ".to_string(),
        };
        let prompt = architecture(&request);
        assert!(prompt.contains("A lonely lighthouse keeper"));
        assert!(prompt.contains("计划章节数：5"));
        assert!(!prompt.contains("额外指导"));
    }
}
