//! Component descriptors and their declared capabilities.
//!
//! The router owns components; the pipeline only reads what they declare:
//! a fetch operation, dynamic store modules, and a route-update policy.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use trellis_core::policy::PolicyOverride;
use trellis_core::route::Location;

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::store::ModuleDef;

/// A fetch result that replaces the pending navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOverride {
    /// Navigate to this URL instead.
    Redirect(String),
    /// Cancel the navigation and stay on the current route.
    Abort,
}

/// Outcome of a fetch operation: `Some` overrides the navigation.
pub type FetchResult = Result<Option<NavigationOverride>, FetchError>;

/// Per-component (or global) data fetching.
#[async_trait]
pub trait FetchData: Send + Sync {
    async fn fetch_data(&self, ctx: &FetchContext) -> FetchResult;
}

/// A hook run before or after the fetch operations of a navigation.
#[async_trait]
pub trait FetchHook: Send + Sync {
    async fn run(&self, ctx: &FetchContext) -> Result<(), FetchError>;
}

/// Component-supplied decision on whether a same-entry navigation matters.
pub type RoutePredicate = Arc<dyn Fn(&FetchContext) -> bool + Send + Sync>;

/// How a component decides whether to process a navigation.
#[derive(Clone)]
pub enum RouteUpdate {
    /// Field-level override of the application defaults.
    Policy(PolicyOverride),
    /// Authoritative predicate.
    Predicate(RoutePredicate),
}

impl fmt::Debug for RouteUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteUpdate::Policy(policy) => f.debug_tuple("Policy").field(policy).finish(),
            RouteUpdate::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Name of a dynamic module, possibly derived from the destination route.
#[derive(Clone)]
pub enum ModuleName {
    Static(String),
    Routed(Arc<dyn Fn(&Location) -> String + Send + Sync>),
}

impl ModuleName {
    pub fn resolve(&self, location: &Location) -> String {
        match self {
            ModuleName::Static(name) => name.clone(),
            ModuleName::Routed(name_for) => name_for(location),
        }
    }
}

impl fmt::Debug for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleName::Static(name) => f.debug_tuple("Static").field(name).finish(),
            ModuleName::Routed(_) => f.write_str("Routed(..)"),
        }
    }
}

/// A dynamic module declared by a component.
#[derive(Debug, Clone)]
pub struct ModuleSpec {
    pub name: ModuleName,
    pub module: ModuleDef,
}

impl ModuleSpec {
    /// A module registered under a fixed name.
    pub fn new(name: impl Into<String>, module: ModuleDef) -> Self {
        Self {
            name: ModuleName::Static(name.into()),
            module,
        }
    }

    /// A module whose name is computed from the destination location,
    /// e.g. `cart/{id}`.
    pub fn routed<F>(name_for: F, module: ModuleDef) -> Self
    where
        F: Fn(&Location) -> String + Send + Sync + 'static,
    {
        Self {
            name: ModuleName::Routed(Arc::new(name_for)),
            module,
        }
    }

    pub fn resolve_name(&self, location: &Location) -> String {
        self.name.resolve(location)
    }
}

/// A renderable unit matched by a route.
#[derive(Clone)]
pub struct Component {
    name: String,
    asset_id: Option<String>,
    fetch: Option<Arc<dyn FetchData>>,
    modules: Vec<ModuleSpec>,
    route_update: Option<RouteUpdate>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset_id: None,
            fetch: None,
            modules: Vec::new(),
            route_update: None,
        }
    }

    /// Id under which the client manifest lists this component's assets.
    pub fn with_asset_id(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = Some(asset_id.into());
        self
    }

    pub fn with_fetch(mut self, fetch: impl FetchData + 'static) -> Self {
        self.fetch = Some(Arc::new(fetch));
        self
    }

    /// Appends a dynamic module; modules register in declaration order.
    pub fn with_module(mut self, spec: ModuleSpec) -> Self {
        self.modules.push(spec);
        self
    }

    pub fn with_policy(mut self, policy: PolicyOverride) -> Self {
        self.route_update = Some(RouteUpdate::Policy(policy));
        self
    }

    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FetchContext) -> bool + Send + Sync + 'static,
    {
        self.route_update = Some(RouteUpdate::Predicate(Arc::new(predicate)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn asset_id(&self) -> Option<&str> {
        self.asset_id.as_deref()
    }

    pub fn fetch(&self) -> Option<&Arc<dyn FetchData>> {
        self.fetch.as_ref()
    }

    pub fn modules(&self) -> &[ModuleSpec] {
        &self.modules
    }

    pub fn has_modules(&self) -> bool {
        !self.modules.is_empty()
    }

    pub fn route_update(&self) -> Option<&RouteUpdate> {
        self.route_update.as_ref()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("asset_id", &self.asset_id)
            .field("fetch", &self.fetch.is_some())
            .field("modules", &self.modules)
            .field("route_update", &self.route_update)
            .finish()
    }
}
