//! Server rendering errors, including I/O.

use thiserror::Error;
use trellis_runtime::{AppError, FetchError, LifecycleError, NavigationError};
use trellis_ssr_core::SsrCoreError;

#[derive(Error, Debug)]
pub enum SsrError {
    #[error("Core error: {0}")]
    Core(#[from] SsrCoreError),

    #[error("App error: {0}")]
    App(#[from] AppError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Module registration error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to load {path}: {reason}")]
    AssetLoad { path: String, reason: String },

    #[error("Navigation to {0} did not commit")]
    NotCommitted(String),
}

pub type Result<T> = std::result::Result<T, SsrError>;

/// Sanitize error messages for client-facing responses.
///
/// Hides internal details while providing useful feedback.
pub fn sanitize_error(error: &SsrError) -> String {
    match error {
        // Safe to expose
        SsrError::Navigation(NavigationError::Route(_)) => "Page not found".to_string(),
        SsrError::Navigation(NavigationError::TooManyRedirects(max)) => {
            format!("Too many redirects (max: {max})")
        }
        SsrError::NotCommitted(_) => "Navigation was cancelled".to_string(),
        SsrError::Core(SsrCoreError::PayloadTooLarge { .. }) => "Page state too large".to_string(),
        // Hide internal details
        SsrError::Fetch(_) | SsrError::Navigation(_) => "Failed to load page data".to_string(),
        SsrError::AssetLoad { .. } => "Internal configuration error".to_string(),
        SsrError::App(_) | SsrError::Lifecycle(_) | SsrError::Core(_) => "Render failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use trellis_runtime::RouterError;

    use super::*;

    #[test]
    fn test_sanitize_hides_fetch_details() {
        let error = SsrError::Fetch(FetchError::Failed("db password rejected".to_string()));
        assert_eq!(sanitize_error(&error), "Failed to load page data");
    }

    #[test]
    fn test_sanitize_not_found() {
        let error = SsrError::Navigation(RouterError::NotFound("/nope".to_string()).into());
        assert_eq!(sanitize_error(&error), "Page not found");
    }

    #[test]
    fn test_sanitize_asset_load() {
        let error = SsrError::AssetLoad {
            path: "/etc/secret/template.html".to_string(),
            reason: "No such file".to_string(),
        };
        let message = sanitize_error(&error);
        assert!(!message.contains("/etc"));
    }
}
