use std::{env, path::PathBuf};

use trellis_core::policy::UpdatePolicy;
use trellis_ssr::{SsrCoreError, SsrOptions, MAX_INITIAL_STATE_SIZE};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL prefix of client assets (default: "/dist/")
    pub public_path: String,
    /// HTML page template; the built-in template is used when unset
    pub template_path: Option<PathBuf>,
    /// Client build manifest; no assets are referenced when unset
    pub manifest_path: Option<PathBuf>,
    /// Process same-route navigations that only change the query (default: false)
    pub process_query: bool,
    /// Process same-route navigations that only change the hash (default: false)
    pub process_hash: bool,
    /// Maximum hydration payload size in bytes (default: 5MB)
    pub max_state_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRELLIS_PUBLIC_PATH` - Asset URL prefix (default: "/dist/")
    /// - `TRELLIS_TEMPLATE_PATH` - Page template file (default: built-in)
    /// - `TRELLIS_MANIFEST_PATH` - Client manifest file (default: none)
    /// - `TRELLIS_PROCESS_QUERY` - Process query-only changes (default: false)
    /// - `TRELLIS_PROCESS_HASH` - Process hash-only changes (default: false)
    /// - `TRELLIS_MAX_STATE_BYTES` - Payload size limit (default: 5MB)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            public_path: lookup("TRELLIS_PUBLIC_PATH").unwrap_or_else(|| "/dist/".to_string()),
            template_path: lookup("TRELLIS_TEMPLATE_PATH").map(PathBuf::from),
            manifest_path: lookup("TRELLIS_MANIFEST_PATH").map(PathBuf::from),
            process_query: lookup("TRELLIS_PROCESS_QUERY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            process_hash: lookup("TRELLIS_PROCESS_HASH")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            max_state_bytes: lookup("TRELLIS_MAX_STATE_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_INITIAL_STATE_SIZE),
        }
    }

    /// Validated page assembly options.
    pub fn ssr_options(&self) -> Result<SsrOptions, SsrCoreError> {
        SsrOptions::new(self.public_path.clone(), self.max_state_bytes)
    }

    /// Application-wide route-update defaults.
    pub fn update_policy(&self) -> UpdatePolicy {
        UpdatePolicy {
            path: true,
            query: self.process_query,
            hash: self.process_hash,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config(&[]);

        assert_eq!(config.public_path, "/dist/");
        assert_eq!(config.template_path, None);
        assert_eq!(config.manifest_path, None);
        assert!(!config.process_query);
        assert!(!config.process_hash);
        assert_eq!(config.max_state_bytes, MAX_INITIAL_STATE_SIZE);
        assert_eq!(config.update_policy(), UpdatePolicy::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("TRELLIS_PUBLIC_PATH", "/static/"),
            ("TRELLIS_MANIFEST_PATH", "build/manifest.json"),
            ("TRELLIS_PROCESS_QUERY", "true"),
            ("TRELLIS_MAX_STATE_BYTES", "1024"),
        ]);

        assert_eq!(config.manifest_path, Some(PathBuf::from("build/manifest.json")));
        assert!(config.update_policy().query);
        assert!(!config.update_policy().hash);

        let options = config.ssr_options().unwrap();
        assert_eq!(options.public_path, "/static/");
        assert_eq!(options.max_state_size, 1024);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config(&[
            ("TRELLIS_PROCESS_HASH", "yes please"),
            ("TRELLIS_MAX_STATE_BYTES", "lots"),
        ]);

        assert!(!config.process_hash);
        assert_eq!(config.max_state_bytes, MAX_INITIAL_STATE_SIZE);
    }

    #[test]
    fn test_invalid_public_path() {
        let config = config(&[("TRELLIS_PUBLIC_PATH", "dist")]);
        assert!(config.ssr_options().is_err());
    }
}
