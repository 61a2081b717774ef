use crate::core::check::LARGE_RUN_THRESHOLD;
use crate::core::dispatcher::{DEFAULT_CHUNK_SIZE, DEFAULT_TIMEOUT_SECONDS};
use crate::domain::model::{ResultPolicy, ACTIVE_STATUS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{invalid, validate_run_settings, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    /// 用戶端的請求逾時，未設定時不限制
    pub request_timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub workers: Option<usize>,
    pub concurrency: Option<usize>,
    pub result_policy: Option<ResultPolicy>,
    pub large_run_threshold: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: Option<String>,
    pub html: Option<bool>,
    pub active_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CHECKER_API_KEY})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| CheckError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.service.request_timeout_seconds.map(Duration::from_secs)
    }

    pub fn headers(&self) -> HashMap<String, String> {
        self.service.headers.clone().unwrap_or_default()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_json(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_json)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.service.endpoint
    }

    fn output_path(&self) -> &str {
        self.output.output_path.as_deref().unwrap_or("./output")
    }

    fn chunk_size(&self) -> usize {
        self.dispatch.workers.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    fn timeout_seconds(&self) -> u64 {
        self.service.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn concurrency(&self) -> usize {
        self.dispatch.concurrency.unwrap_or(1)
    }

    fn result_policy(&self) -> ResultPolicy {
        self.dispatch.result_policy.unwrap_or_default()
    }

    fn active_label(&self) -> &str {
        self.output.active_label.as_deref().unwrap_or(ACTIVE_STATUS)
    }

    fn large_run_threshold(&self) -> usize {
        self.dispatch.large_run_threshold.unwrap_or(LARGE_RUN_THRESHOLD)
    }

    fn write_html(&self) -> bool {
        self.output.html.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_run_settings(self)?;
        if self.service.request_timeout_seconds == Some(0) {
            return Err(invalid(
                "service.request_timeout_seconds",
                0,
                "a zero client timeout would abort every request",
            ));
        }
        Ok(())
    }
}
