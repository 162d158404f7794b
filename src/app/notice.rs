use crate::utils::error::{PortalError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient outcome message of a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Error notices carry the service's own message when it sent one.
    pub fn from_result<T>(result: &Result<T>, success: &str, fallback: &str) -> Self {
        match result {
            Ok(_) => Self::success(success),
            Err(e) => Self::error(error_message(e).unwrap_or_else(|| fallback.to_string())),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

fn error_message(error: &PortalError) -> Option<String> {
    let message = match error {
        PortalError::RejectedError { message, .. }
        | PortalError::UnauthorizedError { message, .. }
        | PortalError::ValidationError { message }
        | PortalError::UploadError { message } => message.trim(),
        _ => return None,
    };
    (!message.is_empty()).then(|| message.to_string())
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "✅ {}", self.message),
            NoticeLevel::Error => write!(f, "❌ {}", self.message),
        }
    }
}
