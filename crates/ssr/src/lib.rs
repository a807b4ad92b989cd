//! Server entry - Imperative Shell.
//!
//! This crate renders one request with the navigation pipeline of
//! `trellis_runtime` and assembles the page with the pure functions of
//! `trellis_ssr_core`.
//!
//! # Architecture
//!
//! - **Functional Core** (`trellis_ssr_core`): payload encoding, manifest, template
//! - **Imperative Shell** (this crate): per-request app, fetching, file loading
//!
//! # Example
//!
//! ```ignore
//! use trellis_ssr::{render_page, render_route, ServerRender};
//!
//! let options = SsrOptions::with_defaults();
//! match render_route(build_app(), "/product/1", &options).await? {
//!     ServerRender::Rendered(rendered) => {
//!         let html = render_page(&rendered, &app_html, &manifest, &template, &options);
//!     }
//!     ServerRender::Redirect(target) => { /* answer with a redirect */ }
//! }
//! ```

mod assets;
mod entry;
mod error;
mod page;

// Re-export core types for convenience
pub use trellis_runtime::SsrContext;
pub use trellis_ssr_core::{
    ClientManifest, PageTemplate, SsrCoreError, SsrOptions, MAX_INITIAL_STATE_SIZE,
};

pub use assets::{load_manifest, load_template};
pub use entry::{render_route, RenderedRoute, ServerRender};
pub use error::{sanitize_error, Result, SsrError};
pub use page::render_page;
