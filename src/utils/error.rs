use crate::core::pagination::PaginationError;
use crate::core::selection::SelectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Selection rejected: {0}")]
    SelectionError(#[from] SelectionError),

    #[error("Pagination error: {0}")]
    PaginationError(#[from] PaginationError),

    #[error("{count} of {total} requests failed: {numbers}", count = .failed.len(), numbers = .failed.join(", "))]
    PartialFailure { failed: Vec<String>, total: usize },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Nothing selected: {message}")]
    EmptySelection { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Configuration,
    Input,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PortalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PortalError::ApiError(_) => ErrorCategory::Network,
            PortalError::HttpError { .. } | PortalError::PartialFailure { .. } => {
                ErrorCategory::Remote
            }
            PortalError::ConfigValidationError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::MissingConfigError { .. }
            | PortalError::TomlError(_) => ErrorCategory::Configuration,
            PortalError::SelectionError(_)
            | PortalError::PaginationError(_)
            | PortalError::EmptySelection { .. } => ErrorCategory::Input,
            PortalError::CsvError(_)
            | PortalError::SerializationError(_)
            | PortalError::TemplateError { .. } => ErrorCategory::Data,
            PortalError::IoError(_) | PortalError::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PortalError::SelectionError(_)
            | PortalError::PaginationError(_)
            | PortalError::EmptySelection { .. } => ErrorSeverity::Low,
            PortalError::ApiError(_) | PortalError::PartialFailure { .. } => ErrorSeverity::Medium,
            PortalError::HttpError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            PortalError::HttpError { .. }
            | PortalError::CsvError(_)
            | PortalError::SerializationError(_)
            | PortalError::TemplateError { .. } => ErrorSeverity::High,
            PortalError::ConfigValidationError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::MissingConfigError { .. }
            | PortalError::TomlError(_)
            | PortalError::IoError(_)
            | PortalError::ProcessingError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PortalError::ApiError(e) if e.is_timeout() => {
                "The API did not answer in time, raise api.timeout_seconds or try again later".to_string()
            }
            PortalError::ApiError(_) => {
                "Check network connectivity and api.base_url".to_string()
            }
            PortalError::HttpError { status: 401, .. } | PortalError::HttpError { status: 403, .. } => {
                "Check that api.token is set and still valid".to_string()
            }
            PortalError::HttpError { status: 404, .. } => {
                "The resource no longer exists, refresh the list and try again".to_string()
            }
            PortalError::HttpError { .. } => "Try again later or contact support".to_string(),
            PortalError::PartialFailure { .. } => {
                "Refresh the list to see which requests were recorded, then retry the failed numbers".to_string()
            }
            PortalError::ConfigValidationError { field, .. }
            | PortalError::InvalidConfigValueError { field, .. } => {
                format!("Fix '{}' in the configuration file", field)
            }
            PortalError::TomlError(_) => "Check the configuration file for TOML syntax errors".to_string(),
            PortalError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration file or pass it on the command line", field)
            }
            PortalError::SelectionError(SelectionError::LimitReached { max }) => {
                format!("Submit the current selection first, at most {} numbers fit in one batch", max)
            }
            PortalError::SelectionError(_) => {
                "Only assigned numbers without a pending cancellation can be selected".to_string()
            }
            PortalError::PaginationError(_) => "Use one of the page sizes 6, 12, 24, 48 or 96".to_string(),
            PortalError::EmptySelection { .. } => "Select at least one item first".to_string(),
            PortalError::CsvError(_) | PortalError::IoError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            PortalError::ProcessingError { .. } => "Run the command again with --verbose and report the log".to_string(),
            PortalError::SerializationError(_) | PortalError::TemplateError { .. } => {
                "Check the input data against the expected fields".to_string()
            }
        }
    }

    /// CLI 結束碼；任何錯誤都不可回傳 0，輸入被拒時同樣沒有送出任何請求
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 給使用者看的訊息（對應前端的 toast）
    pub fn user_friendly_message(&self) -> String {
        match self {
            PortalError::ApiError(_) => "Could not reach the phone number service".to_string(),
            PortalError::HttpError { message, .. } => message.clone(),
            PortalError::PartialFailure { failed, total } => {
                format!(
                    "Cancellation failed for {} ({} of {} requests)",
                    failed.join(", "),
                    failed.len(),
                    total
                )
            }
            PortalError::SelectionError(e) => e.to_string(),
            PortalError::EmptySelection { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
