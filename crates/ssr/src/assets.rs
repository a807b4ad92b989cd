//! Loading the client manifest and page template from disk.

use std::path::Path;

use trellis_ssr_core::{ClientManifest, PageTemplate};

use crate::error::{Result, SsrError};

fn read(path: &Path) -> Result<String> {
    let canonical = path.canonicalize().map_err(|e| SsrError::AssetLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    std::fs::read_to_string(&canonical).map_err(|e| SsrError::AssetLoad {
        path: canonical.display().to_string(),
        reason: e.to_string(),
    })
}

/// Reads and parses a client build manifest.
pub fn load_manifest(path: &Path) -> Result<ClientManifest> {
    let manifest = ClientManifest::from_json(&read(path)?)?;
    tracing::info!(
        path = %path.display(),
        files = manifest.all.len(),
        modules = manifest.modules.len(),
        "Loaded client manifest"
    );
    Ok(manifest)
}

/// Reads a page template; it must contain the contents placeholder.
pub fn load_template(path: &Path) -> Result<PageTemplate> {
    let template = PageTemplate::new(read(path)?)?;
    tracing::info!(path = %path.display(), "Loaded page template");
    Ok(template)
}
