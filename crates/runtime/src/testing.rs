//! Shared fixtures for the runtime tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use trellis_core::module::ModulePath;

use crate::component::{Component, FetchData, FetchHook, FetchResult, ModuleSpec};
use crate::context::{FetchContext, NavigationContext};
use crate::error::{FetchError, StoreError};
use crate::route::{RouteConfig, RouteTable};
use crate::store::{MemoryStore, ModuleDef, RegisterOptions, Store};

/// Ordered event log shared between fixtures.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A fetch operation that optionally sleeps, logs, and returns a fixed result.
pub struct Fetcher {
    label: String,
    log: Log,
    delay: Duration,
    result: FetchResult,
}

impl Fetcher {
    pub fn new(label: &str, log: &Log) -> Self {
        Self {
            label: label.to_string(),
            log: log.clone(),
            delay: Duration::ZERO,
            result: Ok(None),
        }
    }

    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    pub fn result(mut self, result: FetchResult) -> Self {
        self.result = result;
        self
    }
}

#[async_trait]
impl FetchData for Fetcher {
    async fn fetch_data(&self, _ctx: &FetchContext) -> FetchResult {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log.push(format!("fetch:{}", self.label));
        self.result.clone()
    }
}

/// A pre- or post-hook that logs and optionally fails.
pub struct Hook {
    label: String,
    log: Log,
    fail: bool,
}

impl Hook {
    pub fn new(label: &str, log: &Log) -> Self {
        Self {
            label: label.to_string(),
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl FetchHook for Hook {
    async fn run(&self, _ctx: &FetchContext) -> Result<(), FetchError> {
        self.log.push(self.label.clone());
        if self.fail {
            return Err(FetchError::Hook(self.label.clone()));
        }
        Ok(())
    }
}

/// A `MemoryStore` that logs register/unregister calls.
pub struct RecordingStore {
    inner: MemoryStore,
    log: Log,
}

impl RecordingStore {
    pub fn new(log: &Log) -> Self {
        Self {
            inner: MemoryStore::default(),
            log: log.clone(),
        }
    }

    pub fn module_names(&self) -> Vec<String> {
        self.inner.module_names()
    }
}

impl Store for RecordingStore {
    fn has_module(&self, path: &ModulePath) -> bool {
        self.inner.has_module(path)
    }

    fn register_module(
        &self,
        path: &ModulePath,
        module: &ModuleDef,
        options: RegisterOptions,
    ) -> Result<(), StoreError> {
        self.log.push(format!("register:{path}"));
        self.inner.register_module(path, module, options)
    }

    fn unregister_module(&self, path: &ModulePath) -> Result<(), StoreError> {
        self.log.push(format!("unregister:{path}"));
        self.inner.unregister_module(path)
    }

    fn module_state(&self, path: &ModulePath) -> Option<Value> {
        self.inner.module_state(path)
    }

    fn state(&self) -> Value {
        self.inner.state()
    }

    fn replace_state(&self, state: Value) -> Result<(), StoreError> {
        self.inner.replace_state(state)
    }

    fn set_state(&self, path: &ModulePath, value: Value) -> Result<(), StoreError> {
        self.inner.set_state(path, value)
    }
}

/// `cart/{id}`, named after the `id` route param.
pub fn cart_module() -> ModuleSpec {
    ModuleSpec::routed(
        |location| format!("cart/{}", location.param("id").unwrap_or_default()),
        ModuleDef::new(json!({ "items": [] })),
    )
}

/// Home at `/`, a product page declaring `cart/{id}`, and an about page
/// declaring `about`.
pub fn shop_routes(product: Component) -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/")
            .name("home")
            .component(Component::new("Home")),
        RouteConfig::new("/product/{id}")
            .name("product")
            .component(product.with_module(cart_module())),
        RouteConfig::new("/about")
            .name("about")
            .component(Component::new("About").with_module(ModuleSpec::new(
                "about",
                ModuleDef::new(json!({ "team": [] })),
            ))),
    ]
}

/// A navigation context between two URLs of `routes`.
pub fn navigation(
    routes: &Arc<RouteTable>,
    store: Arc<dyn Store>,
    from: &str,
    to: &str,
) -> NavigationContext {
    NavigationContext {
        from: Arc::new(routes.resolve(from).unwrap()),
        to: Arc::new(routes.resolve(to).unwrap()),
        store,
        routes: Arc::clone(routes),
        ssr_context: None,
        epoch: 1,
    }
}
