use serde::Serialize;
use strum::Display;
use thiserror::Error;

/// Which secure-storage primitive failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageOp {
    Write,
    Read,
    Delete,
}

/// Credential storage errors, returned as status values rather than raised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Secure storage {operation} failed for '{account}': {message}")]
    Storage {
        operation: StorageOp,
        account: String,
        message: String,
    },
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Stored credential is not valid UTF-8: {0}")]
    Encoding(String),
}

impl AuthError {
    pub fn storage(operation: StorageOp, account: &str, message: impl Into<String>) -> Self {
        Self::Storage {
            operation,
            account: account.to_string(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::ser::Error> for AuthError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<base64::DecodeError> for AuthError {
    fn from(error: base64::DecodeError) -> Self {
        Self::Serialization(error.to_string())
    }
}
