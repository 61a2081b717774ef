use clap::Parser;
use wa_checker::app::runner::{self, PromptGuard};
use wa_checker::utils::{logger, validation::Validate};
use wa_checker::{CliConfig, HttpCheckService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting wa-checker CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        std::process::exit(runner::report_failure(&e));
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let raw = match runner::read_raw_input(config.input.as_deref(), config.numbers.as_deref()) {
        Ok(raw) => raw,
        Err(e) => std::process::exit(runner::report_failure(&e)),
    };

    let service = HttpCheckService::new(config.endpoint.clone());
    let guard = PromptGuard::new(config.yes);

    match runner::execute(&config, service, &raw, &guard, config.monitor).await {
        Ok(outcome) => {
            tracing::info!(
                "✅ Check completed: {} numbers, {} active, {} errors",
                outcome.summary.total,
                outcome.summary.active,
                outcome.summary.errors
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
