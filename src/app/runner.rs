use crate::adapters::http::HttpCheckService;
use crate::adapters::storage::LocalStorage;
use crate::core::check::{CheckEngine, EngineOptions};
use crate::core::dispatcher::{BatchDispatcher, DispatchSettings};
use crate::core::presenter::present;
use crate::domain::model::{RunOutcome, RunProgress, RunState};
use crate::domain::ports::{ConfigProvider, ProgressReporter, VolumeGuard};
use crate::utils::error::{CheckError, ErrorSeverity, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io::{self, IsTerminal, Read};

/// 以日誌顯示進度，取代網頁上的進度條
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn on_progress(&self, progress: RunProgress) {
        tracing::info!("⏳ Progress: {} ({}%)", progress, progress.percent());
    }
}

/// 輸入量過大時在終端機詢問使用者。
///
/// 號碼由管線送進 stdin 時沒有終端機可以回答，除非帶了 --yes，否則直接回傳錯誤。
pub struct PromptGuard {
    auto_confirm: bool,
    interactive: bool,
}

impl PromptGuard {
    pub fn new(auto_confirm: bool) -> Self {
        Self {
            auto_confirm,
            interactive: io::stdin().is_terminal(),
        }
    }
}

impl VolumeGuard for PromptGuard {
    fn confirm_large_run(&self, count: usize) -> Result<bool> {
        if self.auto_confirm {
            tracing::debug!("Large run of {} numbers confirmed by --yes", count);
            return Ok(true);
        }

        if !self.interactive {
            return Err(CheckError::ConfirmationUnavailable { count });
        }

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "⚠️ {} numbers is a large batch (risk of load or bans). Continue?",
                count
            ))
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}

/// 讀取原始號碼：優先使用 --numbers，其次是 --input 檔案，最後是 stdin
pub fn read_raw_input(input: Option<&str>, numbers: Option<&str>) -> Result<String> {
    if let Some(numbers) = numbers {
        return Ok(numbers.to_string());
    }

    if let Some(path) = input {
        tracing::debug!("Reading numbers from {}", path);
        return Ok(std::fs::read_to_string(path)?);
    }

    tracing::debug!("Reading numbers from stdin");
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    Ok(raw)
}

/// 依配置建立引擎並完成一次檢查：執行、顯示表格、匯出
pub async fn execute<C, G>(
    config: &C,
    service: HttpCheckService,
    raw: &str,
    guard: &G,
    monitor_enabled: bool,
) -> Result<RunOutcome>
where
    C: ConfigProvider + ?Sized,
    G: VolumeGuard + ?Sized,
{
    let dispatcher = BatchDispatcher::new(service, DispatchSettings::from_config(config));
    let storage = LocalStorage::new(config.output_path());
    let engine = CheckEngine::new_with_monitoring(
        dispatcher,
        storage,
        EngineOptions::from_config(config),
        monitor_enabled,
    );

    let outcome = engine.run(RunState::idle(), raw, guard, &LogProgress).await?;

    println!(
        "{}",
        present(&outcome.results, config.active_label()).render_text()
    );

    if outcome.state.can_export() {
        let csv_path = engine.export(&outcome.results).await?;
        tracing::info!("📁 CSV saved to: {}", csv_path);
        println!("📁 CSV saved to: {}", csv_path);

        if config.write_html() {
            let html_path = engine.export_html(&outcome.results).await?;
            tracing::info!("📁 HTML saved to: {}", html_path);
            println!("📁 HTML saved to: {}", html_path);
        }
    }

    Ok(outcome)
}

/// 記錄錯誤並回傳對應的退出碼
pub fn report_failure(e: &CheckError) -> i32 {
    let severity = e.severity();

    if severity == ErrorSeverity::Low {
        tracing::warn!("⚠️ {}", e);
        tracing::warn!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    } else {
        tracing::error!(
            "❌ Check run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            severity
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    }

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    severity.exit_code()
}
