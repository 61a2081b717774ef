use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CheckError, Result};
use url::Url;

/// 服務端允許的 timeout 範圍（秒）
pub const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=300;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub(crate) fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> CheckError {
    CheckError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn check_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| {
        invalid(
            "endpoint",
            endpoint,
            format!("not a usable checking service URL ({})", e),
        )
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            "endpoint",
            endpoint,
            format!("the checking service is reached over HTTP POST, '{}' is not supported", scheme),
        )),
    }
}

/// CLI 與 TOML 配置共用的執行設定檢查
pub fn validate_run_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    check_endpoint(config.endpoint())?;

    let output_path = config.output_path();
    if output_path.trim().is_empty() || output_path.contains('\0') {
        return Err(invalid(
            "output_path",
            output_path,
            "the CSV export needs a writable directory",
        ));
    }

    if config.chunk_size() == 0 {
        return Err(invalid("workers", 0, "each batch must carry at least 1 number"));
    }

    if config.concurrency() == 0 {
        return Err(invalid("concurrency", 0, "at least 1 batch must be in flight"));
    }

    let timeout = config.timeout_seconds();
    if !TIMEOUT_RANGE.contains(&timeout) {
        return Err(invalid(
            "timeout",
            timeout,
            format!(
                "the service accepts {} to {} seconds",
                TIMEOUT_RANGE.start(),
                TIMEOUT_RANGE.end()
            ),
        ));
    }

    if config.active_label().trim().is_empty() {
        return Err(invalid(
            "active_label",
            config.active_label(),
            "rows could never be highlighted as active",
        ));
    }

    if config.large_run_threshold() == 0 {
        return Err(invalid(
            "large_run_threshold",
            0,
            "every run would ask for confirmation",
        ));
    }

    Ok(())
}
