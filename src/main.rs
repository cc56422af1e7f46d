//! NovelForge - 单次运行入口
//!
//! 加载配置、恢复会话，然后执行 `run.action` 指定的一个动作

use std::sync::Arc;

use anyhow::{anyhow, bail};
use novelforge::application::{
    ApplicationError, ChapterLifecycle, ConfigHandler, ConfigOrigin, ConfigValidator,
    GenerationOrchestrator, GetPipeline, LoadProjectFile, LoadProjectFileHandler, ProbeOutcome,
    SessionContext, TestEmbeddingConfig, TestLlmConfig,
};
use novelforge::config::{load_config, print_config, RunAction};
use novelforge::infrastructure::{
    FileProjectStore, HttpClientProvider, JsonConfigStore, LlmGenerationBackend,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},novelforge={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("NovelForge - 小说生成流水线");
    print_config(&config);

    // 全局模型配置：缺失或损坏时使用默认值
    let config_handler = ConfigHandler::new(Arc::new(JsonConfigStore::new(
        &config.storage.global_config_path,
    )));
    let global = config_handler.load_global().await?;
    if global.origin == ConfigOrigin::ParseFallback {
        tracing::warn!(
            path = %config.storage.global_config_path.display(),
            "Global config could not be parsed, running with defaults"
        );
    }

    // 适配器
    let store = Arc::new(FileProjectStore::new());
    let provider = Arc::new(HttpClientProvider::new());
    let backend = Arc::new(LlmGenerationBackend::new(provider.clone()));

    let lifecycle = ChapterLifecycle::new(store.clone());
    let orchestrator = GenerationOrchestrator::new(store.clone(), backend);
    let validator = ConfigValidator::new(provider);
    let files = LoadProjectFileHandler::new(store);

    // 恢复会话：配置中的项目目录优先，其次是旧版参数记录的目录
    let mut session = SessionContext::from_global(global.config);
    let project_path = config
        .project
        .path
        .clone()
        .or_else(|| session.project.as_ref().map(ToString::to_string));
    if let Some(path) = project_path {
        session
            .switch_project(&path, &config_handler, &lifecycle)
            .await?;
    } else if config.run.action.needs_project() {
        bail!("no project directory configured, set NOVELFORGE_PROJECT__PATH");
    }

    let chapter = config.run.chapter;
    tracing::info!(action = %config.run.action, session_id = %session.id, "Running action");

    match config.run.action {
        RunAction::Status => {
            let overview = orchestrator
                .pipeline(GetPipeline {
                    project_path: session.project_path(),
                })
                .await?;
            println!("project: {}", overview.project);
            println!("state: {}", overview.state.as_str());
            println!(
                "gates: blueprint={} draft={} finalizable={:?}",
                overview.gates.blueprint,
                overview.gates.draft,
                overview.gates.finalizable.iter().map(|n| n.get()).collect::<Vec<_>>()
            );
            if let Some(project) = &session.project {
                for entry in lifecycle.overview(project).await? {
                    println!("  chapter {:>3}  {}", entry.number, entry.status.as_label());
                }
            }
            println!("current chapter: {}", session.current_chapter);
        }
        RunAction::TestLlm => {
            match validator
                .test_llm(TestLlmConfig {
                    llm: session.llm.clone(),
                })
                .await
            {
                ProbeOutcome::Ok(reply) => println!("LLM OK: {}", reply),
                ProbeOutcome::Failed { diagnostic } => bail!("LLM test failed: {}", diagnostic),
            }
        }
        RunAction::TestEmbedding => {
            match validator
                .test_embedding(TestEmbeddingConfig {
                    embedding: session.embedding.clone(),
                })
                .await
            {
                ProbeOutcome::Ok(dimension) => println!("Embedding OK, dimension {}", dimension),
                ProbeOutcome::Failed { diagnostic } => {
                    bail!("Embedding test failed: {}", diagnostic)
                }
            }
        }
        RunAction::Architecture => {
            let response = orchestrator
                .generate_architecture(session.architecture_command())
                .await?;
            println!("{}", response.architecture);
        }
        RunAction::Blueprint => {
            let response = orchestrator
                .generate_blueprint(session.blueprint_command())
                .await?;
            println!("{}", response.blueprint);
        }
        RunAction::Draft => {
            let response = orchestrator
                .generate_chapter_draft(session.draft_command(chapter))
                .await?;
            session.record_draft(&response);
            println!("{}", response.content);
        }
        RunAction::Finalize => {
            let command = session.finalize_command(chapter, String::new());
            let file = files
                .handle(LoadProjectFile {
                    project_path: command.project_path.clone(),
                    file_name: format!("chapter_{}", command.chapter),
                })
                .await?;
            let Some(text) = file.content else {
                bail!("chapter {} has no saved content to finalize", command.chapter);
            };

            match orchestrator
                .finalize_chapter(session.finalize_command(Some(command.chapter), text))
                .await
            {
                Ok(response) => {
                    session.record_finalized(&response);
                    println!(
                        "chapter {} finalized, next chapter {}",
                        response.chapter, response.next_chapter
                    );
                }
                Err(e @ ApplicationError::ChapterSavedNotFinalized { .. }) => {
                    tracing::warn!(error = %e, "Chapter kept as draft");
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        RunAction::Consistency => {
            let report = orchestrator
                .check_consistency(session.consistency_command(chapter, None))
                .await?;
            println!("{}", report.report);
        }
    }

    tracing::info!(
        action = %config.run.action,
        current_chapter = session.current_chapter.get(),
        "Action complete"
    );

    Ok(())
}
