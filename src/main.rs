use clap::Parser;
use domain_rank::config::Command;
use domain_rank::utils::error::ErrorSeverity;
use domain_rank::utils::{logger, validation::Validate};
use domain_rank::{
    fetch_all, normalize_file, read_domains, AizhanClient, AppConfig, Cli, LocalStorage,
    Normalizer, RankFetcher, ToolError,
};

async fn run_normalize(config: &AppConfig) -> domain_rank::Result<()> {
    let storage = LocalStorage::new(".");
    let normalizer = Normalizer::from_kind(config.normalize.strategy);

    let report = normalize_file(
        &storage,
        &normalizer,
        &config.normalize.input,
        &config.normalize.output,
    )
    .await?;

    println!(
        "✅ 處理完成，共提取出 {} 個主域名，結果已保存到 {}",
        report.unique_domains, report.output_path
    );
    Ok(())
}

async fn run_rank(config: &AppConfig) -> domain_rank::Result<()> {
    let api_key = config.require_api_key()?;
    let domains = read_domains(&LocalStorage::new("."), &config.rank.input).await?;
    tracing::info!("📋 Loaded {} domains from {}", domains.len(), config.rank.input);

    let client = AizhanClient::new(&config.api.endpoint, api_key, config.request_timeout())?;
    let results = LocalStorage::new(&config.rank.results_dir);
    let fetcher = RankFetcher::new(client, results, config.retry_policy())
        .with_rate_limit_sentinel(config.api.rate_limit_sentinel.clone());

    let summary = fetch_all(&fetcher, &domains).await;

    println!(
        "✅ 查詢完成: {} 成功, {} 服務錯誤, {} 無資料, {} 失敗",
        summary.recorded,
        summary.api_errors,
        summary.no_data,
        summary.failed.len()
    );
    Ok(())
}

fn exit_with(e: &ToolError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting domain-rank");

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    tracing::debug!(
        "Effective config: normalize={:?} rank={:?} retry={:?}",
        config.normalize,
        config.rank,
        config.retry
    );

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let result = match &cli.command {
        Command::Normalize(_) => run_normalize(&config).await,
        Command::Rank(_) => run_rank(&config).await,
        Command::Run { .. } => match run_normalize(&config).await {
            Ok(()) => run_rank(&config).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        exit_with(&e);
    }

    Ok(())
}
