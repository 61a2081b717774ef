use crate::core::dispatcher::BatchDispatcher;
use crate::core::export::{self, EXPORT_FILENAME, HTML_FILENAME};
use crate::core::normalizer::normalize;
use crate::core::presenter::present;
use crate::domain::model::{CheckResult, RunOutcome, RunProgress, RunState, RunSummary, ACTIVE_STATUS};
use crate::domain::ports::{CheckService, ConfigProvider, ProgressReporter, Storage, VolumeGuard};
use crate::utils::error::{CheckError, Result};
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;

pub const LARGE_RUN_THRESHOLD: usize = 500;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub output_path: String,
    pub active_label: String,
    pub large_run_threshold: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            active_label: ACTIVE_STATUS.to_string(),
            large_run_threshold: LARGE_RUN_THRESHOLD,
        }
    }
}

impl EngineOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            output_path: config.output_path().to_string(),
            active_label: config.active_label().to_string(),
            large_run_threshold: config.large_run_threshold(),
        }
    }
}

/// 一次完整的檢查流程：正規化、事前檢查、分批送出、統計與匯出
pub struct CheckEngine<C: CheckService, S: Storage> {
    dispatcher: BatchDispatcher<C>,
    storage: S,
    options: EngineOptions,
    monitor: SystemMonitor,
}

impl<C: CheckService, S: Storage> CheckEngine<C, S> {
    pub fn new(dispatcher: BatchDispatcher<C>, storage: S, options: EngineOptions) -> Self {
        Self {
            dispatcher,
            storage,
            options,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(
        dispatcher: BatchDispatcher<C>,
        storage: S,
        options: EngineOptions,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            dispatcher,
            storage,
            options,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub async fn run<G, R>(
        &self,
        state: RunState,
        raw: &str,
        guard: &G,
        progress: &R,
    ) -> Result<RunOutcome>
    where
        G: VolumeGuard + ?Sized,
        R: ProgressReporter + ?Sized,
    {
        let numbers = normalize(raw);
        if numbers.is_empty() {
            return Err(CheckError::ValidationError {
                message: "Enter at least 1 valid number".to_string(),
            });
        }

        let total = numbers.len();
        if total > self.options.large_run_threshold {
            tracing::warn!(
                "⚠️ {} numbers exceed the threshold of {}",
                total,
                self.options.large_run_threshold
            );
            if !guard.confirm_large_run(total)? {
                return Err(CheckError::RunDeclined { count: total });
            }
        }

        let state = state.start(total)?;
        let started_at = Utc::now();
        tracing::info!("🔍 Checking {} numbers", total);
        self.monitor.log_stats("Normalization");

        let results = self.dispatcher.run_check(&numbers, progress).await;
        self.monitor.log_stats("Dispatch");

        let state = state
            .advance(RunProgress::new(results.len(), total))
            .finish(!results.is_empty());

        let summary = RunSummary::from_results(
            &results,
            &self.options.active_label,
            self.dispatcher.settings().batch_count(total),
            started_at,
            Utc::now(),
        );
        tracing::info!(
            "✅ Run finished: {} active, {} inactive, {} errors ({} batches, {} ms)",
            summary.active,
            summary.inactive,
            summary.errors,
            summary.batches,
            summary.duration().num_milliseconds()
        );
        self.monitor.log_final_stats();

        Ok(RunOutcome {
            results,
            state,
            summary,
        })
    }

    /// 寫出 CSV，回傳輸出位置
    pub async fn export(&self, results: &[CheckResult]) -> Result<String> {
        let payload = export::encode(results)?;
        tracing::debug!("Writing CSV ({} bytes) to storage", payload.len());
        self.storage.write_file(EXPORT_FILENAME, &payload).await?;
        Ok(format!("{}/{}", self.options.output_path, EXPORT_FILENAME))
    }

    pub async fn export_html(&self, results: &[CheckResult]) -> Result<String> {
        let html = present(results, &self.options.active_label).render_html();
        self.storage.write_file(HTML_FILENAME, html.as_bytes()).await?;
        Ok(format!("{}/{}", self.options.output_path, HTML_FILENAME))
    }
}
