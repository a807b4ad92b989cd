//! Client build manifest and asset inference.
//!
//! The client build writes a manifest listing every emitted file (`all`) and,
//! per component asset id, the indices of the files that component needs
//! (`modules`). Cross-referencing the components that actually rendered on
//! the server yields the scripts and stylesheets a page should reference.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SsrCoreError};

/// Client build manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    #[serde(default)]
    pub all: Vec<String>,
    #[serde(default)]
    pub modules: HashMap<String, Vec<usize>>,
}

/// Files a rendered page depends on, relative to the public path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveAssets {
    pub scripts: Vec<String>,
    pub stylesheets: Vec<String>,
}

impl ClientManifest {
    /// Parse a manifest from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SsrCoreError::InvalidManifest(e.to_string()))
    }

    /// Resolve the assets used by the given component asset ids.
    ///
    /// Unknown ids and out-of-range indices are skipped. Each file appears
    /// once, in first-use order. Files that are neither `.js` nor `.css` are
    /// ignored.
    pub fn active_assets<'a, I>(&self, component_ids: I) -> ActiveAssets
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut assets = ActiveAssets::default();

        let files = component_ids
            .into_iter()
            .filter_map(|id| self.modules.get(id))
            .flatten()
            .filter_map(|&idx| self.all.get(idx));

        for file in files {
            if !seen.insert(file.as_str()) {
                continue;
            }
            if is_js(file) {
                assets.scripts.push(file.clone());
            } else if is_css(file) {
                assets.stylesheets.push(file.clone());
            }
        }

        assets
    }
}

/// Strips a `?query` suffix before checking the extension.
fn extension_path(file: &str) -> &str {
    file.split_once('?').map_or(file, |(path, _)| path)
}

fn is_js(file: &str) -> bool {
    extension_path(file).ends_with(".js")
}

fn is_css(file: &str) -> bool {
    extension_path(file).ends_with(".css")
}
