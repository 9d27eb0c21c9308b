//! Error types for Khata core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures of the key-value collaborator or of the records kept in it
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt value under key '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Rejections when parsing a complete PIN
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFormatError {
    #[error("PIN must be exactly {0} digits")]
    Length(usize),

    #[error("PIN must contain only digits")]
    NonDigit,
}
