//! Per-navigation contexts.

use std::sync::{Arc, Mutex, PoisonError};

use crate::component::Component;
use crate::route::{Route, RouteTable};
use crate::store::Store;

/// Everything a navigation attempt carries. Immutable for its duration.
#[derive(Clone)]
pub struct NavigationContext {
    pub from: Arc<Route>,
    pub to: Arc<Route>,
    pub store: Arc<dyn Store>,
    /// Route table, e.g. for resolving redirect targets.
    pub routes: Arc<RouteTable>,
    /// Present when the navigation runs during server rendering.
    pub ssr_context: Option<Arc<SsrContext>>,
    /// Identity of the navigation; later navigations have larger epochs.
    pub epoch: u64,
}

impl NavigationContext {
    /// A fetch context for the given subset of destination components.
    pub fn fetch_context(&self, components: Vec<Arc<Component>>) -> FetchContext {
        FetchContext {
            navigation: self.clone(),
            components,
        }
    }

    /// `from -> to`, for log messages.
    pub fn describe(&self) -> String {
        format!("{} -> {}", self.from.full_path(), self.to.full_path())
    }
}

/// What fetch operations and hooks receive.
#[derive(Clone)]
pub struct FetchContext {
    pub navigation: NavigationContext,
    pub components: Vec<Arc<Component>>,
}

impl FetchContext {
    /// Destination route.
    pub fn route(&self) -> &Route {
        &self.navigation.to
    }

    /// Origin route.
    pub fn from(&self) -> &Route {
        &self.navigation.from
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.navigation.store
    }

    pub fn routes(&self) -> &RouteTable {
        &self.navigation.routes
    }

    pub fn ssr_context(&self) -> Option<&SsrContext> {
        self.navigation.ssr_context.as_deref()
    }
}

/// Server-render bookkeeping for one request.
#[derive(Debug, Default)]
pub struct SsrContext {
    url: String,
    registered_components: Mutex<Vec<String>>,
    initial_state: Mutex<Option<String>>,
}

impl SsrContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Records that the component with `asset_id` rendered; repeats are ignored.
    pub fn register_component(&self, asset_id: &str) {
        let mut registered = self
            .registered_components
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !registered.iter().any(|id| id == asset_id) {
            registered.push(asset_id.to_string());
        }
    }

    /// Asset ids of rendered components, in first-render order.
    pub fn registered_components(&self) -> Vec<String> {
        self.registered_components
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_initial_state(&self, payload: String) {
        *self
            .initial_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(payload);
    }

    /// Encoded hydration payload, once the server pipeline has produced it.
    pub fn initial_state(&self) -> Option<String> {
        self.initial_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssr_context_registers_each_component_once() {
        let ctx = SsrContext::new("/product/1");
        ctx.register_component("b");
        ctx.register_component("a");
        ctx.register_component("b");
        assert_eq!(ctx.registered_components(), vec!["b", "a"]);
        assert_eq!(ctx.url(), "/product/1");
    }

    #[test]
    fn test_ssr_context_initial_state() {
        let ctx = SsrContext::new("/");
        assert!(ctx.initial_state().is_none());
        ctx.set_initial_state("\"{}\"".to_string());
        assert_eq!(ctx.initial_state().as_deref(), Some("\"{}\""));
    }
}
