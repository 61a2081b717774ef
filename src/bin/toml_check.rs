use clap::Parser;
use wa_checker::app::runner::{self, PromptGuard};
use wa_checker::core::ConfigProvider;
use wa_checker::utils::{logger, validation::Validate};
use wa_checker::{HttpCheckService, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-check")]
#[command(about = "Phone number checker driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "wa-checker.toml")]
    config: String,

    /// File with raw numbers; stdin is read when omitted
    #[arg(short, long)]
    input: Option<String>,

    /// Override the chunk size from config
    #[arg(short, long)]
    workers: Option<usize>,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Skip the confirmation prompt for large inputs
    #[arg(short, long)]
    yes: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dry run - show the normalized numbers and batches without sending requests
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置（日誌尚未初始化，直接輸出到 stderr）
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose, config.log_json());
    tracing::info!("🚀 Starting TOML-based checker");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(workers) = args.workers {
        config.dispatch.workers = Some(workers);
        tracing::info!("🔧 Workers overridden to: {}", workers);
    }

    if let Err(e) = config.validate() {
        std::process::exit(runner::report_failure(&e));
    }

    display_config_summary(&config);

    let raw = match runner::read_raw_input(args.input.as_deref(), None) {
        Ok(raw) => raw,
        Err(e) => std::process::exit(runner::report_failure(&e)),
    };

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        perform_dry_run(&config, &raw);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let service = match HttpCheckService::with_request_timeout(config.endpoint(), config.request_timeout()) {
        Ok(service) => service.with_headers(config.headers()),
        Err(e) => std::process::exit(runner::report_failure(&e)),
    };
    let guard = PromptGuard::new(args.yes);

    match runner::execute(&config, service, &raw, &guard, monitor_enabled).await {
        Ok(outcome) => {
            tracing::info!(
                "✅ Check completed: {} numbers in {} batches",
                outcome.summary.total,
                outcome.summary.batches
            );
            println!("✅ Check completed successfully!");
        }
        Err(e) => {
            let exit_code = runner::report_failure(&e);
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  🌐 Endpoint: {}", config.endpoint());
    tracing::info!(
        "  📦 Workers: {}, Concurrency: {}, Timeout: {}s",
        config.chunk_size(),
        config.concurrency(),
        config.timeout_seconds()
    );
    tracing::info!("  🧮 Result policy: {:?}", config.result_policy());
    tracing::info!("  📁 Output: {}", config.output_path());
    if let Some(timeout) = config.request_timeout() {
        tracing::info!("  ⏱️ Request timeout: {:?}", timeout);
    }
}

fn perform_dry_run(config: &TomlConfig, raw: &str) {
    let numbers = wa_checker::normalize(raw);
    let chunk_size = config.chunk_size().max(1);

    println!("🔍 Dry run: {} unique numbers", numbers.len());
    for (index, chunk) in numbers.as_slice().chunks(chunk_size).enumerate() {
        let batch: Vec<&str> = chunk.iter().map(|n| n.as_str()).collect();
        println!("  Batch {}: {}", index + 1, batch.join(", "));
    }

    if numbers.len() > config.large_run_threshold() {
        println!(
            "⚠️ {} numbers exceed the threshold of {}; a real run will ask for confirmation",
            numbers.len(),
            config.large_run_threshold()
        );
    }
}
