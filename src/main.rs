use clap::Parser;
use entity_enrich::core::{ConfigProvider, Extractor, ExtractorMode, TableSource};
use entity_enrich::utils::error::{ErrorSeverity, Result};
use entity_enrich::utils::{logger, validation::Validate};
use entity_enrich::{
    CliConfig, CsvSource, EmailExtractor, EnrichPipeline, JobConfig, LocalStorage,
    OpenAiExtractor, RunEngine, Secrets, SerpApiClient, SheetsSource,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting entity-enrich CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 缺少搜尋密鑰時在任何處理開始前中止
    let secrets = match Secrets::from_env() {
        Ok(secrets) => secrets,
        Err(e) => {
            tracing::error!("❌ {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    let monitor_enabled = cli.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 任務檔優先於 CLI 旗標
    let outcome = if let Some(path) = cli.config.clone() {
        match JobConfig::from_file(&path) {
            Ok(job) => run_job(job, &secrets, monitor_enabled).await,
            Err(e) => Err(e),
        }
    } else {
        run_cli(cli, &secrets, monitor_enabled).await
    };

    match outcome {
        Ok(output_path) => {
            tracing::info!("✅ Enrichment run completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Enrichment run completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Enrichment run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run_cli(config: CliConfig, secrets: &Secrets, monitor_enabled: bool) -> Result<String> {
    config.validate()?;

    let source: Arc<dyn TableSource> = if config.uses_sheets_source() {
        Arc::new(SheetsSource::new(
            config.sheet_url.clone().unwrap_or_default(),
            config.credentials.clone(),
        ))
    } else {
        Arc::new(CsvSource::new(config.input.clone().unwrap_or_default()))
    };

    let model = config.model.clone();
    let max_tokens = config.max_tokens;
    run(config, source, secrets, &model, max_tokens, monitor_enabled).await
}

async fn run_job(config: JobConfig, secrets: &Secrets, monitor_enabled: bool) -> Result<String> {
    config.validate()?;

    let source: Arc<dyn TableSource> = if config.uses_sheets_source() {
        Arc::new(SheetsSource::new(
            config.sheet_url().unwrap_or_default().to_string(),
            config.credentials_path().to_string(),
        ))
    } else {
        Arc::new(CsvSource::new(
            config.csv_path().unwrap_or_default().to_string(),
        ))
    };

    let model = config.model().to_string();
    let max_tokens = config.max_output_tokens();
    run(config, source, secrets, &model, max_tokens, monitor_enabled).await
}

async fn run<C: ConfigProvider + 'static>(
    config: C,
    source: Arc<dyn TableSource>,
    secrets: &Secrets,
    model: &str,
    max_tokens: u32,
    monitor_enabled: bool,
) -> Result<String> {
    let searcher = Arc::new(SerpApiClient::new(
        &secrets.serpapi_api_key,
        config.search_language(),
        config.search_region(),
    ));

    let extractor: Option<Arc<dyn Extractor>> = match config.extractor_mode() {
        ExtractorMode::Llm => Some(Arc::new(OpenAiExtractor::new(
            secrets.require_openai_key()?,
            model,
            max_tokens,
        ))),
        ExtractorMode::Email => Some(Arc::new(EmailExtractor::new())),
        ExtractorMode::None => None,
    };

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = EnrichPipeline::new(source, searcher, extractor, storage, config);

    let engine = RunEngine::new_with_monitoring(pipeline, monitor_enabled);
    engine.run().await
}
