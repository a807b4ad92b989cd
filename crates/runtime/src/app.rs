//! Application assembly.
//!
//! One `App` per client session or per server request: it owns the store,
//! the router and one lifecycle manager (and so one removal queue).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use trellis_core::policy::UpdatePolicy;
use trellis_ssr_core::decode_state;

use crate::context::SsrContext;
use crate::error::{AppError, Result};
use crate::fetch::{FetchHooks, FetchOrchestrator};
use crate::lifecycle::ModuleLifecycleManager;
use crate::route::{Route, RouteConfig, RouteTable};
use crate::router::{NavigationOutcome, Router};
use crate::store::{MemoryStore, Store};

#[derive(Default)]
pub struct AppBuilder {
    routes: Vec<RouteConfig>,
    root_state: Option<Value>,
    store: Option<Arc<dyn Store>>,
    defaults: UpdatePolicy,
    hooks: FetchHooks,
    ssr_context: Option<Arc<SsrContext>>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, route: RouteConfig) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = RouteConfig>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Initial state of the in-memory store. Ignored when a store is given.
    pub fn root_state(mut self, state: Value) -> Self {
        self.root_state = Some(state);
        self
    }

    /// Uses `store` instead of a fresh `MemoryStore`.
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Application-wide route-update defaults.
    pub fn update_policy(mut self, defaults: UpdatePolicy) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn hooks(mut self, hooks: FetchHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Marks the app as rendering one server request.
    pub fn ssr_context(mut self, ctx: Arc<SsrContext>) -> Self {
        self.ssr_context = Some(ctx);
        self
    }

    pub fn build(self) -> Result<App, AppError> {
        let store: Arc<dyn Store> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryStore::new(
                self.root_state.unwrap_or_else(|| Value::Object(Map::new())),
            )?),
        };
        let routes = Arc::new(RouteTable::new(self.routes)?);
        let router = Arc::new(Router::new(
            routes,
            Arc::clone(&store),
            self.ssr_context.clone(),
        ));

        tracing::debug!(
            routes = router.routes().patterns().len(),
            ssr = self.ssr_context.is_some(),
            "Created app"
        );

        Ok(App {
            lifecycle: Arc::new(ModuleLifecycleManager::new(Arc::clone(&store), self.defaults)),
            fetch: Arc::new(FetchOrchestrator::new(self.defaults, self.hooks)),
            store,
            router,
            ssr_context: self.ssr_context,
            hooks_installed: AtomicBool::new(false),
        })
    }
}

pub struct App {
    store: Arc<dyn Store>,
    router: Arc<Router>,
    lifecycle: Arc<ModuleLifecycleManager>,
    fetch: Arc<FetchOrchestrator>,
    ssr_context: Option<Arc<SsrContext>>,
    hooks_installed: AtomicBool,
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn lifecycle(&self) -> &Arc<ModuleLifecycleManager> {
        &self.lifecycle
    }

    pub fn fetch(&self) -> &Arc<FetchOrchestrator> {
        &self.fetch
    }

    pub fn ssr_context(&self) -> Option<&Arc<SsrContext>> {
        self.ssr_context.as_ref()
    }

    /// Installs the client navigation pipeline: the lifecycle guard, then
    /// the fetch guard, then the lifecycle after-each hook. Repeated calls
    /// do nothing.
    pub fn install_client_hooks(&self) {
        if self.hooks_installed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.router.before_resolve(self.lifecycle.clone());
        self.router.before_resolve(self.fetch.clone());
        self.router.after_each(self.lifecycle.clone());
    }

    /// Boots the client on server-rendered state.
    ///
    /// Restores the store from the hydration `payload`, navigates to `url`
    /// without running any guard, registers the modules of that route on top
    /// of the hydrated state and finally installs the client hooks.
    pub async fn hydrate(&self, payload: &str, url: &str) -> Result<Arc<Route>, AppError> {
        let state: Value = decode_state(payload)?;
        self.store.replace_state(state)?;

        let route = match self.router.push(url).await? {
            NavigationOutcome::Committed(route) => route,
            NavigationOutcome::Aborted | NavigationOutcome::Superseded => {
                return Err(AppError::InitialNavigation(url.to_string()));
            }
        };

        self.lifecycle.register_route_modules(&route)?;
        self.install_client_hooks();
        tracing::info!(route = %route.full_path(), "Hydrated app");
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use trellis_core::module::ModulePath;
    use trellis_ssr_core::encode_state;

    use super::*;
    use crate::component::Component;
    use crate::error::StoreError;
    use crate::testing::{shop_routes, Fetcher, Log};

    fn shop_app(log: &Log) -> App {
        App::builder()
            .routes(shop_routes(
                Component::new("Product").with_fetch(Fetcher::new("product", log)),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_rejects_non_object_state() {
        let result = App::builder().root_state(json!([1, 2])).build();
        assert!(matches!(result, Err(AppError::Store(StoreError::InvalidRootState))));
    }

    #[tokio::test]
    async fn test_hydrate_restores_state_without_fetching() {
        let log = Log::default();
        let app = shop_app(&log);
        let payload = encode_state(&json!({
            "cart": { "1": { "items": ["apple"] } },
            "$memo": { "cached": true },
        }))
        .unwrap();

        let route = app.hydrate(&payload, "/product/1").await.unwrap();
        assert_eq!(route.path(), "/product/1");
        assert!(log.entries().is_empty());

        let cart = ModulePath::parse("cart/1").unwrap();
        assert!(app.store().has_module(&cart));
        assert_eq!(app.store().module_state(&cart), Some(json!({ "items": ["apple"] })));
        assert!(app.store().state().get("$memo").is_none());
    }

    #[tokio::test]
    async fn test_hydrate_installs_client_hooks_once() {
        let log = Log::default();
        let app = shop_app(&log);
        let payload = encode_state(&json!({})).unwrap();

        app.hydrate(&payload, "/").await.unwrap();
        app.install_client_hooks();

        app.router().push("/product/2").await.unwrap();
        assert_eq!(log.entries(), vec!["fetch:product"]);
        assert!(app.store().has_module(&ModulePath::parse("cart/2").unwrap()));
    }

    #[tokio::test]
    async fn test_hydrate_rejects_malformed_payload() {
        let app = shop_app(&Log::default());
        let result = app.hydrate("{not json", "/").await;
        assert!(matches!(result, Err(AppError::Hydration(_))));
    }
}
