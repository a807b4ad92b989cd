//! Server entry: render one request's route and its hydration payload.

use std::sync::Arc;
use std::time::Instant;

use trellis_runtime::{App, AppBuilder, NavigationOutcome, NavigationOverride, Route, SsrContext};
use trellis_ssr_core::{encode_state_limited, SsrOptions};

use crate::error::{Result, SsrError};

/// A route rendered on the server, ready for page assembly.
pub struct RenderedRoute {
    /// The request's app, holding the fetched store state.
    pub app: App,
    pub route: Arc<Route>,
    pub context: Arc<SsrContext>,
}

impl RenderedRoute {
    /// Hydration payload produced for this request.
    pub fn payload(&self) -> Option<String> {
        self.context.initial_state()
    }
}

pub enum ServerRender {
    Rendered(RenderedRoute),
    /// A fetch operation asked for another URL; nothing was rendered.
    Redirect(String),
}

/// Renders `url` on a fresh app built from `builder`.
///
/// The navigation runs without guards. The route's modules are registered
/// unconditionally, every matched component fetches, and the resulting store
/// state becomes the hydration payload.
pub async fn render_route(
    builder: AppBuilder,
    url: &str,
    options: &SsrOptions,
) -> Result<ServerRender> {
    let start = Instant::now();
    let context = Arc::new(SsrContext::new(url));
    let app = builder.ssr_context(Arc::clone(&context)).build()?;

    let route = match app.router().push(url).await? {
        NavigationOutcome::Committed(route) => route,
        NavigationOutcome::Aborted | NavigationOutcome::Superseded => {
            return Err(SsrError::NotCommitted(url.to_string()));
        }
    };

    app.lifecycle().register_route_modules(&route)?;
    for component in route.components() {
        if let Some(asset_id) = component.asset_id() {
            context.register_component(asset_id);
        }
    }

    let nav = app
        .router()
        .navigation_context(Arc::new(Route::start()), Arc::clone(&route));
    match app.fetch().run_server(&nav).await? {
        Some(NavigationOverride::Redirect(target)) => {
            tracing::info!(url, redirect = %target, "Server fetch redirected");
            return Ok(ServerRender::Redirect(target));
        }
        Some(NavigationOverride::Abort) => {
            tracing::warn!(url, "Server fetch aborted; rendering anyway");
        }
        None => {}
    }

    let payload = encode_state_limited(&app.store().state(), options.max_state_size)?;
    tracing::debug!(
        url,
        payload_bytes = payload.len(),
        components = context.registered_components().len(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Rendered route"
    );
    context.set_initial_state(payload);

    Ok(ServerRender::Rendered(RenderedRoute {
        app,
        route,
        context,
    }))
}
