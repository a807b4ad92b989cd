//! Route-scoped dynamic store modules.
//!
//! Components declare the store modules they need. Entering a route registers
//! them before the navigation commits; leaving it queues them for removal,
//! and they are only unregistered once neither side of a later navigation
//! declares them.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use trellis_core::module::{ModulePath, Removal, RemovalQueue};
use trellis_core::policy::UpdatePolicy;

use crate::component::NavigationOverride;
use crate::context::NavigationContext;
use crate::error::{LifecycleError, NavigationError, Result};
use crate::policy::should_process;
use crate::route::Route;
use crate::router::{AfterEachHook, NavigationGuard};
use crate::store::{ModuleDef, RegisterOptions, Store};

/// Registers and tears down the dynamic modules of one application instance.
pub struct ModuleLifecycleManager {
    store: Arc<dyn Store>,
    defaults: UpdatePolicy,
    queue: Mutex<RemovalQueue>,
}

impl ModuleLifecycleManager {
    pub fn new(store: Arc<dyn Store>, defaults: UpdatePolicy) -> Self {
        Self {
            store,
            defaults,
            queue: Mutex::new(RemovalQueue::new()),
        }
    }

    /// Registers the modules of every component matched by `route`, without
    /// route-update filtering. Used for the initial server render and when
    /// the client boots on hydrated state.
    pub fn register_route_modules(&self, route: &Route) -> Result<(), LifecycleError> {
        let _queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        for component in route.components() {
            for spec in component.modules() {
                let name = spec.resolve_name(&route.location);
                safely_register(self.store.as_ref(), &name, &spec.module)?;
            }
        }
        Ok(())
    }

    /// Registers the modules declared by destination components that process
    /// this navigation, parents before children.
    ///
    /// Any failure blocks the navigation. Modules registered before the
    /// failure stay registered.
    pub fn before_resolve(&self, nav: &NavigationContext) -> Result<(), LifecycleError> {
        let _queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let ctx = nav.fetch_context(nav.to.components());

        let components = ctx
            .components
            .iter()
            .filter(|c| c.has_modules())
            .filter(|c| should_process(c, &ctx, &self.defaults));

        for component in components {
            for spec in component.modules() {
                let name = spec.resolve_name(&nav.to.location);
                safely_register(self.store.as_ref(), &name, &spec.module)?;
            }
        }
        Ok(())
    }

    /// Drains the removal queue once the navigation has committed, then
    /// queues the modules of the route that was left.
    ///
    /// Every drained name is handled on its own; a name that cannot be torn
    /// down is logged and dropped without affecting the others.
    pub fn after_each(&self, nav: &NavigationContext) {
        let ctx = nav.fetch_context(nav.to.components());
        let significant = ctx
            .components
            .iter()
            .any(|c| should_process(c, &ctx, &self.defaults));
        if !significant {
            return;
        }

        let to_names = module_names(&nav.to);
        let from_names = module_names(&nav.from);
        let active: HashSet<String> = to_names.iter().chain(&from_names).cloned().collect();

        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        for removal in queue.cycle(&active, from_names) {
            match removal {
                Removal::Retain(name) => {
                    tracing::info!(module = %name, "Skipping deregistration for active dynamic module");
                }
                Removal::Unregister(name) => {
                    if let Err(e) = self.teardown(&name) {
                        tracing::warn!(module = %name, error = %e, "Failed to unregister dynamic module");
                    }
                }
            }
        }
    }

    fn teardown(&self, name: &str) -> Result<(), LifecycleError> {
        let path = match ModulePath::parse(name) {
            Ok(path) => path,
            Err(_) => {
                tracing::info!(module = %name, "No existing dynamic module to unregister");
                return Ok(());
            }
        };

        if self.store.has_module(&path) {
            tracing::info!(module = %name, "Unregistering dynamic module");
            self.store.unregister_module(&path)?;
        } else {
            tracing::info!(module = %name, "No existing dynamic module to unregister");
        }
        Ok(())
    }

    /// Names waiting for removal, bottom of the queue first.
    pub fn pending_removals(&self) -> Vec<String> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .names()
            .to_vec()
    }
}

#[async_trait]
impl NavigationGuard for ModuleLifecycleManager {
    async fn before_resolve(
        &self,
        nav: &NavigationContext,
    ) -> Result<Option<NavigationOverride>, NavigationError> {
        ModuleLifecycleManager::before_resolve(self, nav).map_err(|e| {
            tracing::error!(error = %e, route = %nav.describe(), "Caught error during beforeResolve");
            NavigationError::from(e)
        })?;
        Ok(None)
    }
}

impl AfterEachHook for ModuleLifecycleManager {
    fn after_each(&self, nav: &NavigationContext) -> Result<(), NavigationError> {
        ModuleLifecycleManager::after_each(self, nav);
        Ok(())
    }
}

/// Module names declared by every component of `route`, resolved against it.
fn module_names(route: &Route) -> Vec<String> {
    route
        .components()
        .iter()
        .flat_map(|c| {
            c.modules()
                .iter()
                .map(|spec| spec.resolve_name(&route.location))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Registers `module` under `name` unless a module already lives there.
fn safely_register(store: &dyn Store, name: &str, module: &ModuleDef) -> Result<(), LifecycleError> {
    let path = ModulePath::parse(name)?;
    if store.has_module(&path) {
        tracing::info!(module = %name, "Skipping duplicate dynamic module registration");
        return Ok(());
    }

    let preserve_state = store
        .module_state(&path)
        .is_some_and(|state| !state.is_null());
    tracing::info!(module = %name, preserve_state, "Registering dynamic module");
    store.register_module(&path, module, RegisterOptions { preserve_state })?;
    Ok(())
}
