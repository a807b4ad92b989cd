//! Pure SSR logic - no I/O, no async, no side effects.
//!
//! This crate provides:
//! - Hydration payload encoding (double JSON encoding) and decoding
//! - Client manifest parsing and asset inference
//! - Page template substitution
//! - Validated SSR options and error types
//!
//! # Example
//!
//! ```
//! use trellis_ssr_core::{
//!     decode_state, encode_state, ClientManifest, PageParts, PageTemplate, SsrOptions,
//! };
//!
//! let payload = encode_state(&serde_json::json!({ "count": 1, "$memo": [] })).unwrap();
//! let state: serde_json::Value = decode_state(&payload).unwrap();
//! assert_eq!(state, serde_json::json!({ "count": 1 }));
//!
//! let manifest = ClientManifest::from_json(r#"{"all":["app.js"],"modules":{"root":[0]}}"#).unwrap();
//! let assets = manifest.active_assets(["root"]);
//!
//! let options = SsrOptions::with_defaults();
//! let parts = PageParts::new(&assets, &options.public_path, "<p>hi</p>", Some(&payload));
//! let html = PageTemplate::default().render(&parts);
//! assert!(html.contains("/dist/app.js"));
//! ```

mod config;
mod error;
mod manifest;
mod state;
mod template;

pub use config::SsrOptions;
pub use error::{Result, SsrCoreError, MAX_INITIAL_STATE_SIZE};
pub use manifest::{ActiveAssets, ClientManifest};
pub use state::{decode_state, encode_state, encode_state_limited, MEMO_KEY_PREFIX};
pub use template::{
    state_script, PageParts, PageTemplate, CONTENTS_PLACEHOLDER, DEFAULT_TEMPLATE,
    INITIAL_STATE_PLACEHOLDER, PRELOAD_PLACEHOLDER, SCRIPTS_PLACEHOLDER,
    STYLESHEETS_PLACEHOLDER,
};
