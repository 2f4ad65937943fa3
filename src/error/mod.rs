//! Error types for Roost.

use thiserror::Error;

use crate::auth::AuthError;
use crate::geo::GeocodeError;

/// Primary error type for Roost operations that cross the use-case boundary.
#[derive(Error, Debug)]
pub enum RoostError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The refresh token was rejected; the user must log in again.
    #[error("Session expired: {0}")]
    AuthExpired(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Credential error: {0}")]
    Auth(#[from] AuthError),

    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Broad classification used for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Timeout,
    Server,
    Api,
    Storage,
    Configuration,
    Serialization,
    Cancelled,
    Unknown,
}

impl RoostError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthExpired(_) => ErrorCategory::Authentication,
            Self::Network(_) => ErrorCategory::Network,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) | Self::Mapping(_) => ErrorCategory::Serialization,
            Self::Auth(_) | Self::Io(_) => ErrorCategory::Storage,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::Geocode(err) => match err {
                GeocodeError::Network(_) => ErrorCategory::Network,
                GeocodeError::Timeout(_) => ErrorCategory::Timeout,
                GeocodeError::Api { status, .. } if *status >= 500 => ErrorCategory::Server,
                GeocodeError::Api { .. } => ErrorCategory::Api,
                GeocodeError::InvalidResponse(_) => ErrorCategory::Serialization,
            },
            Self::Task(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether the caller should send the user back through login rather than
    /// show a generic failure.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::Server
        )
    }
}

/// A wire record could not be turned into a domain entity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{entity} is missing required field `{field}`")]
pub struct MappingError {
    pub entity: &'static str,
    pub field: &'static str,
}

impl MappingError {
    pub fn missing(entity: &'static str, field: &'static str) -> Self {
        Self { entity, field }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RoostError>;
