//! Configuration types for SSR with validation.

use crate::error::{Result, SsrCoreError, MAX_INITIAL_STATE_SIZE};

/// Options for assembling a server-rendered page (validated).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SsrOptions {
    /// URL prefix for client assets, e.g. `/dist/`.
    pub public_path: String,
    /// Maximum encoded initial state size in bytes.
    pub max_state_size: usize,
}

impl SsrOptions {
    /// Create and validate options.
    pub fn new(public_path: impl Into<String>, max_state_size: usize) -> Result<Self> {
        let public_path = public_path.into();
        if !public_path.starts_with('/') || !public_path.ends_with('/') {
            return Err(SsrCoreError::InvalidConfig(format!(
                "public path must start and end with '/': {public_path}"
            )));
        }
        if max_state_size == 0 {
            return Err(SsrCoreError::InvalidConfig(
                "max state size must be positive".to_string(),
            ));
        }

        Ok(Self {
            public_path,
            max_state_size,
        })
    }

    /// Create with defaults (`/dist/`, 5MB state limit).
    pub fn with_defaults() -> Self {
        Self {
            public_path: "/dist/".to_string(),
            max_state_size: MAX_INITIAL_STATE_SIZE,
        }
    }
}

impl Default for SsrOptions {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_valid() {
        let options = SsrOptions::new("/static/", 1024).unwrap();
        assert_eq!(options.public_path, "/static/");
        assert_eq!(options.max_state_size, 1024);
    }

    #[test]
    fn test_options_root_public_path() {
        assert!(SsrOptions::new("/", 1).is_ok());
    }

    #[test]
    fn test_options_invalid_public_path() {
        let result = SsrOptions::new("dist/", 1024);
        assert!(matches!(result, Err(SsrCoreError::InvalidConfig(_))));

        let result = SsrOptions::new("/dist", 1024);
        assert!(matches!(result, Err(SsrCoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_options_zero_state_size() {
        let result = SsrOptions::new("/dist/", 0);
        assert!(matches!(result, Err(SsrCoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_options_with_defaults() {
        let options = SsrOptions::with_defaults();
        assert_eq!(options.public_path, "/dist/");
        assert_eq!(options.max_state_size, MAX_INITIAL_STATE_SIZE);
        assert_eq!(options, SsrOptions::default());
    }
}
