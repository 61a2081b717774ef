use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Confirmation prompt failed: {0}")]
    PromptError(#[from] dialoguer::Error),

    #[error("Checking service responded with status {status}")]
    ServiceStatusError { status: u16 },

    #[error("Malformed response from checking service: {message}")]
    MalformedResponse { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Run of {count} numbers was not confirmed")]
    RunDeclined { count: usize },

    #[error("Run of {count} numbers needs confirmation but stdin is not a terminal")]
    ConfirmationUnavailable { count: usize },

    #[error("A check run is already in progress")]
    RunInProgress,
}

/// 錯誤分類，用於日誌與統計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Processing,
    System,
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 使用者取消，不算失敗
            ErrorSeverity::Medium => 2,   // 可重試的錯誤
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::ApiError(_)
            | CheckError::ServiceStatusError { .. }
            | CheckError::MalformedResponse { .. } => ErrorCategory::Network,
            CheckError::ConfigError { .. }
            | CheckError::ConfigValidationError { .. }
            | CheckError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CheckError::ValidationError { .. }
            | CheckError::RunDeclined { .. }
            | CheckError::ConfirmationUnavailable { .. } => ErrorCategory::Validation,
            CheckError::CsvError(_) | CheckError::RunInProgress => ErrorCategory::Processing,
            CheckError::IoError(_) | CheckError::PromptError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CheckError::RunDeclined { .. } => ErrorSeverity::Low,
            CheckError::ApiError(_)
            | CheckError::ServiceStatusError { .. }
            | CheckError::MalformedResponse { .. }
            | CheckError::RunInProgress => ErrorSeverity::Medium,
            CheckError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the checking service endpoint is reachable and try again"
            }
            ErrorCategory::Configuration => "Review the command-line flags or the TOML config file",
            ErrorCategory::Validation => match self {
                CheckError::RunDeclined { .. } => {
                    "Split the input into smaller lists or pass --yes to skip the prompt"
                }
                CheckError::ConfirmationUnavailable { .. } => {
                    "Pass --yes to confirm large runs, or use --input/--numbers from a terminal"
                }
                _ => "Enter at least one phone number containing digits",
            },
            ErrorCategory::Processing => "Wait for the current run to finish, then export again",
            ErrorCategory::System => "Check that the output directory exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckError::ValidationError { message } => message.clone(),
            CheckError::RunDeclined { count } => {
                format!("Run cancelled: {} numbers were not confirmed", count)
            }
            CheckError::ConfirmationUnavailable { count } => format!(
                "{} numbers need confirmation, but stdin is not a terminal; pass --yes",
                count
            ),
            CheckError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            CheckError::ConfigValidationError { field, message } => {
                format!("Invalid configuration '{}': {}", field, message)
            }
            CheckError::ServiceStatusError { status } => {
                format!("The checking service returned HTTP {}", status)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declined_run_is_low_severity() {
        let err = CheckError::RunDeclined { count: 750 };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.severity().exit_code(), 0);
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.user_friendly_message().contains("750"));
    }

    #[test]
    fn test_validation_error_message_is_passed_through() {
        let err = CheckError::ValidationError {
            message: "Enter at least 1 valid number".to_string(),
        };
        assert_eq!(err.user_friendly_message(), "Enter at least 1 valid number");
        assert_eq!(err.severity().exit_code(), 1);
    }

    #[test]
    fn test_unanswerable_prompt_is_a_failure() {
        let err = CheckError::ConfirmationUnavailable { count: 501 };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.user_friendly_message().contains("pass --yes"));
        assert!(err.recovery_suggestion().contains("--yes"));
    }

    #[test]
    fn test_service_errors_are_network_category() {
        let err = CheckError::ServiceStatusError { status: 502 };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Checking service responded with status 502");
    }
}
