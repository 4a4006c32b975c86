// models/src/errors.rs

use std::io;
pub use thiserror::Error;

use serde_json::Error as SerdeJsonError;

#[derive(Debug, Error)]
pub enum HospitalError {
    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input or data: {0}")]
    Validation(String),

    #[error("Invalid state transition: {0}")]
    InvalidState(String),

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to acquire lock: {0}")]
    Lock(String),

    #[error("File I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] SerdeJsonError),

    #[cfg(feature = "sled-errors")]
    #[error(transparent)]
    Sled(#[from] sled::Error),
}

pub type HospitalResult<T> = std::result::Result<T, HospitalError>;
