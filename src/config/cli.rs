use crate::core::check::LARGE_RUN_THRESHOLD;
use crate::domain::model::{ResultPolicy, ACTIVE_STATUS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_run_settings, Validate};
use clap::Parser;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8888/.netlify/functions/check-whatsapp";

#[derive(Debug, Clone, Parser)]
#[command(name = "wa-checker")]
#[command(about = "Check a list of phone numbers against a WhatsApp checking service")]
pub struct CliConfig {
    /// File with raw numbers; stdin is read when neither --input nor --numbers is given
    #[arg(short, long)]
    pub input: Option<String>,

    /// Raw numbers separated by whitespace, commas or semicolons
    #[arg(short, long)]
    pub numbers: Option<String>,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Numbers sent per request
    #[arg(short, long, default_value = "8")]
    pub workers: usize,

    /// Seconds forwarded to the checking service
    #[arg(short, long, default_value = "8")]
    pub timeout: u64,

    /// Requests kept in flight at once
    #[arg(long, default_value = "1")]
    pub concurrency: usize,

    #[arg(long, default_value = "reconcile")]
    pub result_policy: ResultPolicy,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = ACTIVE_STATUS)]
    pub active_label: String,

    /// Also write whatsapp_results.html
    #[arg(long)]
    pub html: bool,

    /// Skip the confirmation prompt for large inputs
    #[arg(short, long)]
    pub yes: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage during the run")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn chunk_size(&self) -> usize {
        self.workers
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn result_policy(&self) -> ResultPolicy {
        self.result_policy
    }

    fn active_label(&self) -> &str {
        &self.active_label
    }

    fn large_run_threshold(&self) -> usize {
        LARGE_RUN_THRESHOLD
    }

    fn write_html(&self) -> bool {
        self.html
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_run_settings(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["wa-checker"]);
        assert_eq!(config.chunk_size(), 8);
        assert_eq!(config.timeout_seconds(), 8);
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.result_policy(), ResultPolicy::Reconcile);
        assert_eq!(config.active_label(), "Aktif");
        assert_eq!(config.large_run_threshold(), 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = CliConfig::parse_from([
            "wa-checker",
            "--numbers",
            "0812,0813",
            "--workers",
            "4",
            "--concurrency",
            "2",
            "--result-policy",
            "pass_through",
            "--yes",
        ]);
        assert_eq!(config.numbers.as_deref(), Some("0812,0813"));
        assert_eq!(config.chunk_size(), 4);
        assert_eq!(config.concurrency(), 2);
        assert_eq!(config.result_policy(), ResultPolicy::PassThrough);
        assert!(config.yes);
    }

    #[test]
    fn test_zero_workers_fail_validation() {
        let config = CliConfig::parse_from(["wa-checker", "--workers", "0"]);
        assert!(config.validate().is_err());
    }
}
