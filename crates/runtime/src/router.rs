//! Memory-history router driving the navigation pipeline.
//!
//! `push` resolves the destination, runs the before-resolve guards in
//! registration order, commits the destination and runs the after-each
//! hooks. Every navigation gets a new epoch; a navigation that is overtaken
//! by a newer one while its guards are pending never commits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::component::NavigationOverride;
use crate::context::{NavigationContext, SsrContext};
use crate::error::{NavigationError, Result};
use crate::route::{Route, RouteTable};
use crate::store::Store;

/// Maximum number of redirects followed by a single `push`.
pub const MAX_REDIRECTS: usize = 10;

/// Runs after the destination is matched, before the navigation commits.
#[async_trait]
pub trait NavigationGuard: Send + Sync {
    /// `Ok(Some(_))` replaces the navigation; `Err(_)` blocks it.
    async fn before_resolve(
        &self,
        nav: &NavigationContext,
    ) -> Result<Option<NavigationOverride>, NavigationError>;
}

/// Runs once a navigation has committed.
pub trait AfterEachHook: Send + Sync {
    fn after_each(&self, nav: &NavigationContext) -> Result<(), NavigationError>;
}

/// How a `push` ended, when it did not fail.
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    /// The destination (possibly after redirects) is now current.
    Committed(Arc<Route>),
    /// A guard cancelled the navigation.
    Aborted,
    /// A newer navigation started before this one settled.
    Superseded,
}

pub struct Router {
    routes: Arc<RouteTable>,
    store: Arc<dyn Store>,
    ssr_context: Option<Arc<SsrContext>>,
    current: RwLock<Arc<Route>>,
    epoch: AtomicU64,
    guards: RwLock<Vec<Arc<dyn NavigationGuard>>>,
    after_hooks: RwLock<Vec<Arc<dyn AfterEachHook>>>,
}

impl Router {
    pub fn new(
        routes: Arc<RouteTable>,
        store: Arc<dyn Store>,
        ssr_context: Option<Arc<SsrContext>>,
    ) -> Self {
        Self {
            routes,
            store,
            ssr_context,
            current: RwLock::new(Arc::new(Route::start())),
            epoch: AtomicU64::new(0),
            guards: RwLock::new(Vec::new()),
            after_hooks: RwLock::new(Vec::new()),
        }
    }

    /// Appends a before-resolve guard.
    pub fn before_resolve(&self, guard: Arc<dyn NavigationGuard>) {
        self.guards
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(guard);
    }

    /// Appends an after-each hook.
    pub fn after_each(&self, hook: Arc<dyn AfterEachHook>) {
        self.after_hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    pub fn current_route(&self) -> Arc<Route> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Epoch of the latest navigation started on this router.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// A context for a navigation from `from` to `to` under the current epoch.
    pub fn navigation_context(&self, from: Arc<Route>, to: Arc<Route>) -> NavigationContext {
        NavigationContext {
            from,
            to,
            store: Arc::clone(&self.store),
            routes: Arc::clone(&self.routes),
            ssr_context: self.ssr_context.clone(),
            epoch: self.epoch(),
        }
    }

    /// Navigates to `url`.
    pub async fn push(&self, url: &str) -> Result<NavigationOutcome> {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let mut target = url.to_string();
        let mut redirects = 0;

        loop {
            let to = Arc::new(self.routes.resolve(&target)?);
            let nav = NavigationContext {
                epoch,
                ..self.navigation_context(self.current_route(), to)
            };

            let guarded = self.run_guards(&nav).await;
            if self.is_stale(epoch) {
                tracing::warn!(epoch, route = %nav.describe(), "Navigation superseded");
                return Ok(NavigationOutcome::Superseded);
            }

            match guarded {
                Ok(None) => {}
                Ok(Some(NavigationOverride::Redirect(next))) => {
                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        return Err(NavigationError::TooManyRedirects(MAX_REDIRECTS));
                    }
                    tracing::debug!(from = %target, to = %next, "Redirecting navigation");
                    target = next;
                    continue;
                }
                Ok(Some(NavigationOverride::Abort)) => {
                    tracing::info!(route = %nav.describe(), "Navigation aborted");
                    return Ok(NavigationOutcome::Aborted);
                }
                Err(e) => {
                    tracing::error!(error = %e, route = %nav.describe(), "Navigation blocked");
                    return Err(e);
                }
            }

            *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&nav.to);
            self.run_after_hooks(&nav);
            return Ok(NavigationOutcome::Committed(nav.to));
        }
    }

    async fn run_guards(&self, nav: &NavigationContext) -> Result<Option<NavigationOverride>> {
        let guards = self
            .guards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for guard in guards {
            if let Some(over) = guard.before_resolve(nav).await? {
                return Ok(Some(over));
            }
            if self.is_stale(nav.epoch) {
                return Ok(None);
            }
        }
        Ok(None)
    }

    fn run_after_hooks(&self, nav: &NavigationContext) {
        let hooks = self
            .after_hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for hook in hooks {
            if let Err(e) = hook.after_each(nav) {
                tracing::warn!(error = %e, route = %nav.describe(), "afterEach hook failed");
            }
        }
    }

    fn is_stale(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) != epoch
    }
}
