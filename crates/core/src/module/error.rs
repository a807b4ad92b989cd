use thiserror::Error;

/// Errors produced while resolving dynamic module names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("Module name is empty")]
    EmptyName,
    #[error("Module name has an empty segment: {0}")]
    EmptySegment(String),
}

/// Result type for module name operations.
pub type Result<T> = std::result::Result<T, ModuleError>;
