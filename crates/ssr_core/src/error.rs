//! Core SSR error types (pure - no I/O variants).

use thiserror::Error;

/// Maximum size for the encoded initial state (5MB).
pub const MAX_INITIAL_STATE_SIZE: usize = 5 * 1024 * 1024;

/// Core SSR errors (pure - no I/O variants).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SsrCoreError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("State serialization failed: {0}")]
    Serialization(String),

    #[error("State deserialization failed: {0}")]
    Deserialization(String),

    #[error("Invalid client manifest: {0}")]
    InvalidManifest(String),

    #[error("Template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),

    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, SsrCoreError>;
