//! Pure HTML page assembly.
//!
//! The page template is plain HTML with comment placeholders that are
//! replaced by the rendered app, the asset tags and the initial state script.

use crate::error::{Result, SsrCoreError};
use crate::manifest::ActiveAssets;

pub const STYLESHEETS_PLACEHOLDER: &str = "<!-- ssr-stylesheets -->";
pub const PRELOAD_PLACEHOLDER: &str = "<!-- ssr-preload -->";
pub const CONTENTS_PLACEHOLDER: &str = "<!-- ssr-contents -->";
pub const INITIAL_STATE_PLACEHOLDER: &str = "<!-- ssr-initial-state -->";
pub const SCRIPTS_PLACEHOLDER: &str = "<!-- ssr-scripts -->";

/// Template used when the application does not provide one.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <!-- ssr-stylesheets -->
    <!-- ssr-preload -->
</head>
<body>
    <div id="app"><!-- ssr-contents --></div>
    <!-- ssr-initial-state -->
    <!-- ssr-scripts -->
</body>
</html>
"#;

/// Validated page template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageTemplate {
    source: String,
}

/// Rendered fragments substituted into a [`PageTemplate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageParts {
    pub stylesheets: String,
    pub preload: String,
    pub contents: String,
    pub initial_state: String,
    pub scripts: String,
}

impl PageTemplate {
    /// Create a template; it must at least contain the contents placeholder.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        if !source.contains(CONTENTS_PLACEHOLDER) {
            return Err(SsrCoreError::MissingPlaceholder(CONTENTS_PLACEHOLDER));
        }
        Ok(Self { source })
    }

    /// Substitute every placeholder (first occurrence each).
    pub fn render(&self, parts: &PageParts) -> String {
        self.source
            .replacen(STYLESHEETS_PLACEHOLDER, &parts.stylesheets, 1)
            .replacen(PRELOAD_PLACEHOLDER, &parts.preload, 1)
            .replacen(CONTENTS_PLACEHOLDER, &parts.contents, 1)
            .replacen(INITIAL_STATE_PLACEHOLDER, &parts.initial_state, 1)
            .replacen(SCRIPTS_PLACEHOLDER, &parts.scripts, 1)
    }
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PageParts {
    /// Build the asset tags for `assets`, the app HTML and the state script.
    pub fn new(
        assets: &ActiveAssets,
        public_path: &str,
        contents: impl Into<String>,
        state_payload: Option<&str>,
    ) -> Self {
        let href = |file: &str| format!("{public_path}{file}");

        let stylesheets = assets
            .stylesheets
            .iter()
            .map(|file| {
                render_el(
                    "link",
                    &[("rel", Some("stylesheet")), ("href", Some(href(file).as_str()))],
                )
            })
            .collect();

        let preload = assets
            .scripts
            .iter()
            .map(|file| {
                render_el(
                    "link",
                    &[
                        ("rel", Some("preload")),
                        ("as", Some("script")),
                        ("href", Some(href(file).as_str())),
                    ],
                )
            })
            .collect();

        let scripts = assets
            .scripts
            .iter()
            .map(|file| render_el("script", &[("src", Some(href(file).as_str())), ("defer", None)]))
            .collect();

        Self {
            stylesheets,
            preload,
            contents: contents.into(),
            initial_state: state_payload.map(state_script).unwrap_or_default(),
            scripts,
        }
    }
}

/// Script tag assigning the decoded payload to `window.initialState`.
///
/// `</` is written as `<\/` so the payload cannot close the script element;
/// both spell the same string once the literal is parsed.
pub fn state_script(payload: &str) -> String {
    let payload = payload.replace("</", "<\\/");
    format!("<script>window.initialState=JSON.parse({payload});</script>")
}

fn render_el(tag: &str, attrs: &[(&str, Option<&str>)]) -> String {
    let attrs = attrs
        .iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{key}=\"{}\"", escape_attr(value)),
            None => (*key).to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("<{tag} {attrs}></{tag}>")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
