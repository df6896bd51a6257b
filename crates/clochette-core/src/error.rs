//! Error types for clochette-core
//!
//! `CoreError` is also the error type of every backend call, so the HTTP
//! layer can turn any failure into a toast with a readable message.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    ValidationError,
    BackendError,
    TransportError,
    InvalidFormat,
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::Forbidden => write!(f, "FORBIDDEN"),
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::BackendError => write!(f, "BACKEND_ERROR"),
            ErrorCode::TransportError => write!(f, "TRANSPORT_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for JSON API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            status: None,
            suggestions: vec![],
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for clochette-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Missing, expired or rejected bearer token
    #[error("Session expirée, veuillez vous reconnecter")]
    Unauthorized,

    /// Role not allowed for this operation
    #[error("{message}")]
    Forbidden { message: String },

    #[error("Introuvable : {resource}")]
    NotFound { resource: String },

    #[error("{message}")]
    ValidationError { message: String },

    /// Non-2xx answer; `message` comes from the error body
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Connection, timeout or TLS failure
    #[error("Serveur injoignable : {message}")]
    Transport { message: String },

    /// Response body did not match the expected schema
    #[error("Réponse invalide du serveur : {message}")]
    InvalidFormat { message: String },

    #[error("Erreur interne : {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Unauthorized => ErrorCode::Unauthorized,
            CoreError::Forbidden { .. } => ErrorCode::Forbidden,
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::Api { .. } => ErrorCode::BackendError,
            CoreError::Transport { .. } => ErrorCode::TransportError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Unauthorized => ErrorSeverity::Info,
            CoreError::Forbidden { .. } => ErrorSeverity::Warning,
            CoreError::NotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::Api { status, .. } if *status >= 500 => ErrorSeverity::Error,
            CoreError::Api { .. } => ErrorSeverity::Warning,
            CoreError::Transport { .. } => ErrorSeverity::Error,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// HTTP status the front end should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            CoreError::Unauthorized => 401,
            CoreError::Forbidden { .. } => 403,
            CoreError::NotFound { .. } => 404,
            CoreError::ValidationError { .. } => 422,
            CoreError::Api { status, .. } => *status,
            CoreError::Transport { .. } | CoreError::InvalidFormat { .. } => 502,
            CoreError::InternalError { .. } => 500,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string()).with_status(self.http_status());

        match self {
            CoreError::Unauthorized => {
                details.with_suggestion("Log in again from /login.".to_string())
            }
            CoreError::Transport { .. } => details
                .with_suggestion("Check that the backend is running.".to_string())
                .with_suggestion("Check backend.base_url in the configuration.".to_string()),
            CoreError::InvalidFormat { .. } => details
                .with_suggestion("The backend schema may be newer than this front end.".to_string()),
            _ => details,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::BackendError.to_string(), "BACKEND_ERROR");
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
    }

    #[test]
    fn test_api_error_displays_backend_message() {
        let error = CoreError::Api {
            status: 400,
            message: "Stock insuffisant".to_string(),
        };
        assert_eq!(error.to_string(), "Stock insuffisant");
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert_eq!(error.http_status(), 400);
    }

    #[test]
    fn test_server_errors_are_errors() {
        let error = CoreError::Api {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_transport_details_suggest_config() {
        let details = CoreError::Transport { message: "connection refused".to_string() }.to_details();
        assert_eq!(details.code, ErrorCode::TransportError);
        assert_eq!(details.status, Some(502));
        assert_eq!(details.suggestions.len(), 2);
    }
}
