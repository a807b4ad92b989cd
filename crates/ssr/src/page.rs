//! Page assembly from a rendered route.

use trellis_ssr_core::{ClientManifest, PageParts, PageTemplate, SsrOptions};

use crate::entry::RenderedRoute;

/// Fills `template` with the assets of the components that rendered, the
/// app HTML and the hydration payload.
///
/// The manifest's public path, when it has one, takes precedence over
/// `options.public_path`.
pub fn render_page(
    rendered: &RenderedRoute,
    app_html: &str,
    manifest: &ClientManifest,
    template: &PageTemplate,
    options: &SsrOptions,
) -> String {
    let ids = rendered.context.registered_components();
    let assets = manifest.active_assets(ids.iter().map(String::as_str));
    let public_path = manifest
        .public_path
        .as_deref()
        .unwrap_or(&options.public_path);

    let payload = rendered.payload();
    let parts = PageParts::new(&assets, public_path, app_html, payload.as_deref());
    template.render(&parts)
}
