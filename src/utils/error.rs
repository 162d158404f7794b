use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Remote call '{method}' rejected ({status}): {message}")]
    RejectedError {
        method: String,
        status: u16,
        message: String,
    },

    #[error("Remote call '{method}' unauthorized: {message}")]
    UnauthorizedError { method: String, message: String },

    #[error("User is already authenticated")]
    AlreadyAuthenticated,

    #[error("Not authenticated: {message}")]
    NotAuthenticated { message: String },

    #[error("Upload failed: {message}")]
    UploadError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Action failed: {message}")]
    ActionFailed { message: String },
}

pub type Result<T> = std::result::Result<T, PortalError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Auth,
    Configuration,
    Validation,
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
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PortalError::ApiError(_) | PortalError::UploadError { .. } => ErrorCategory::Network,
            PortalError::RejectedError { .. } | PortalError::ActionFailed { .. } => {
                ErrorCategory::Remote
            }
            PortalError::UnauthorizedError { .. }
            | PortalError::AlreadyAuthenticated
            | PortalError::NotAuthenticated { .. } => ErrorCategory::Auth,
            PortalError::ConfigError { .. }
            | PortalError::InvalidConfigValueError { .. }
            | PortalError::ConfigValidationError { .. }
            | PortalError::UrlError(_) => ErrorCategory::Configuration,
            PortalError::ValidationError { .. } => ErrorCategory::Validation,
            PortalError::IoError(_) | PortalError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Auth | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// The text a notice shows. Remote rejections carry the service's own message.
    pub fn user_friendly_message(&self) -> String {
        match self {
            PortalError::RejectedError { message, .. } | PortalError::ActionFailed { message } => {
                message.clone()
            }
            PortalError::UnauthorizedError { .. } => {
                "You are not allowed to perform this action".to_string()
            }
            PortalError::AlreadyAuthenticated => "User is already authenticated".to_string(),
            PortalError::NotAuthenticated { .. } => "Please log in first".to_string(),
            PortalError::ApiError(e) if e.is_timeout() => "The service did not respond in time".to_string(),
            PortalError::ApiError(_) => "Could not reach the content service".to_string(),
            PortalError::UploadError { message } => format!("File upload failed: {}", message),
            PortalError::ValidationError { message } => message.clone(),
            PortalError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the service endpoint and your network connection",
            ErrorCategory::Remote => "Review the submitted values and try again",
            ErrorCategory::Auth => "Log in again or ask an administrator for access",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Validation => "Correct the highlighted input",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}
