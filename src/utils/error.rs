use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("No domains found in {path}")]
    NoDomains { path: String },

    #[error("Rate limited by ranking service")]
    RateLimited,

    #[error("Malformed API response: {message}")]
    MalformedResponse { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ToolError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolError::ApiError(_) | ToolError::RateLimited => ErrorCategory::Network,
            ToolError::IoError(_) => ErrorCategory::Storage,
            ToolError::SerializationError(_) | ToolError::MalformedResponse { .. } => {
                ErrorCategory::Data
            }
            ToolError::ConfigError { .. }
            | ToolError::ConfigValidationError { .. }
            | ToolError::InvalidConfigValueError { .. }
            | ToolError::MissingConfigError { .. }
            | ToolError::InputNotFound { .. }
            | ToolError::NoDomains { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ToolError::RateLimited => ErrorSeverity::Low,
            ToolError::ApiError(_)
            | ToolError::SerializationError(_)
            | ToolError::MalformedResponse { .. } => ErrorSeverity::Medium,
            ToolError::ConfigError { .. }
            | ToolError::ConfigValidationError { .. }
            | ToolError::InvalidConfigValueError { .. }
            | ToolError::MissingConfigError { .. }
            | ToolError::InputNotFound { .. }
            | ToolError::NoDomains { .. } => ErrorSeverity::High,
            ToolError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於可重試的暫時性錯誤
    pub fn is_transient(&self) -> bool {
        match self {
            ToolError::ApiError(_)
            | ToolError::RateLimited
            | ToolError::SerializationError(_)
            | ToolError::MalformedResponse { .. }
            | ToolError::IoError(_) => true,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ToolError::ApiError(_) => "Check network connectivity and the API endpoint, then rerun",
            ToolError::RateLimited => "Increase retry.base_delay_seconds or query fewer domains per run",
            ToolError::IoError(_) => "Check file permissions and free disk space",
            ToolError::SerializationError(_) | ToolError::MalformedResponse { .. } => {
                "The ranking service returned an unexpected payload; verify the API key and endpoint"
            }
            ToolError::MissingConfigError { .. } => {
                "Set the value in the config file or pass it on the command line (e.g. --api-key)"
            }
            ToolError::ConfigError { .. }
            | ToolError::ConfigValidationError { .. }
            | ToolError::InvalidConfigValueError { .. } => "Fix the configuration file and rerun",
            ToolError::InputNotFound { .. } => {
                "Make sure the input file exists next to the binary or pass --input"
            }
            ToolError::NoDomains { .. } => "Add at least one domain to the input file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ToolError::InputNotFound { path } => format!("找不到輸入檔案 {}", path),
            ToolError::NoDomains { path } => format!("檔案 {} 中沒有可用的域名", path),
            ToolError::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            ToolError::ApiError(e) if e.is_timeout() => "Request to ranking service timed out".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
