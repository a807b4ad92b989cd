//! Runtime errors.

use thiserror::Error;
use trellis_core::module::ModuleError;
use trellis_ssr_core::SsrCoreError;

/// Store operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Module already registered: {0}")]
    DuplicateModule(String),

    #[error("Module not registered: {0}")]
    UnknownModule(String),

    #[error("State at {0} is not an object")]
    NotAnObject(String),

    #[error("Root state must be an object")]
    InvalidRootState,
}

/// Failures while registering or tearing down dynamic modules.
///
/// Raised from a navigation guard, these block the navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Invalid module name: {0}")]
    Module(#[from] ModuleError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A rejected fetch operation or hook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Fetch failed: {0}")]
    Failed(String),

    #[error("Hook failed: {0}")]
    Hook(String),
}

/// Route table errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("No route matches {0}")]
    NotFound(String),

    #[error("Invalid route pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Errors that block a navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error(transparent)]
    Route(#[from] RouterError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Too many redirects (max: {0})")]
    TooManyRedirects(usize),
}

/// Errors while assembling or bootstrapping an app.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error(transparent)]
    Route(#[from] RouterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("Hydration failed: {0}")]
    Hydration(#[from] SsrCoreError),

    #[error("Initial navigation to {0} did not complete")]
    InitialNavigation(String),
}

pub type Result<T, E = NavigationError> = std::result::Result<T, E>;
