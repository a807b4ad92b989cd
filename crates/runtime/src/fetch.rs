//! Per-navigation data fetching.
//!
//! For every navigation that matters to at least one destination component:
//! run the pre-hook, then the global fetch and every component fetch
//! concurrently, then the post-hook. The first failure aborts the pipeline
//! and the first non-null result overrides the navigation.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::{try_join_all, BoxFuture};
use trellis_core::policy::UpdatePolicy;

use crate::component::{FetchData, FetchHook, FetchResult, NavigationOverride};
use crate::context::{FetchContext, NavigationContext};
use crate::error::{FetchError, NavigationError, Result};
use crate::policy::should_process;
use crate::router::NavigationGuard;

/// Optional hooks around the component fetch operations.
#[derive(Clone, Default)]
pub struct FetchHooks {
    /// Runs before any fetch operation.
    pub middleware: Option<Arc<dyn FetchHook>>,
    /// Runs concurrently with the component fetch operations.
    pub global_fetch: Option<Arc<dyn FetchData>>,
    /// Runs after every fetch operation has resolved.
    pub post_middleware: Option<Arc<dyn FetchHook>>,
}

impl FetchHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn middleware(mut self, hook: impl FetchHook + 'static) -> Self {
        self.middleware = Some(Arc::new(hook));
        self
    }

    pub fn global_fetch(mut self, fetch: impl FetchData + 'static) -> Self {
        self.global_fetch = Some(Arc::new(fetch));
        self
    }

    pub fn post_middleware(mut self, hook: impl FetchHook + 'static) -> Self {
        self.post_middleware = Some(Arc::new(hook));
        self
    }
}

/// Runs the hooks and fetch operations for the components in `ctx`.
///
/// Returns the resolved values, global fetch first, then components in
/// matched order. Components without a fetch operation contribute nothing.
pub async fn run_fetch_data(
    ctx: &FetchContext,
    hooks: &FetchHooks,
) -> Result<Vec<Option<NavigationOverride>>, FetchError> {
    if let Some(middleware) = &hooks.middleware {
        middleware.run(ctx).await?;
    }

    let mut pending: Vec<BoxFuture<'_, FetchResult>> = Vec::new();
    if let Some(global_fetch) = &hooks.global_fetch {
        pending.push(global_fetch.fetch_data(ctx));
    }
    for component in &ctx.components {
        if let Some(fetch) = component.fetch() {
            pending.push(fetch.fetch_data(ctx));
        }
    }
    let results = try_join_all(pending).await?;

    if let Some(post_middleware) = &hooks.post_middleware {
        post_middleware.run(ctx).await?;
    }

    Ok(results)
}

/// Decides per navigation whether to fetch, and runs the pipeline.
pub struct FetchOrchestrator {
    defaults: UpdatePolicy,
    hooks: FetchHooks,
}

impl FetchOrchestrator {
    pub fn new(defaults: UpdatePolicy, hooks: FetchHooks) -> Self {
        Self { defaults, hooks }
    }

    /// Client navigation: only destination components that process this
    /// route update take part. When none do, nothing runs at all.
    pub async fn run_client(
        &self,
        nav: &NavigationContext,
    ) -> Result<Option<NavigationOverride>, FetchError> {
        let all = nav.fetch_context(nav.to.components());
        let components: Vec<_> = all
            .components
            .iter()
            .filter(|c| should_process(c, &all, &self.defaults))
            .cloned()
            .collect();

        if components.is_empty() {
            tracing::debug!(route = %nav.describe(), "Ignoring route update");
            return Ok(None);
        }

        tracing::debug!(
            route = %nav.describe(),
            components = components.len(),
            "Running middleware/fetchData for route update"
        );
        let ctx = nav.fetch_context(components);
        let results = run_fetch_data(&ctx, &self.hooks).await?;
        Ok(first_override(results))
    }

    /// Initial server render: every matched component fetches.
    pub async fn run_server(
        &self,
        nav: &NavigationContext,
    ) -> Result<Option<NavigationOverride>, FetchError> {
        let ctx = nav.fetch_context(nav.to.components());
        tracing::debug!(
            route = %nav.to.full_path(),
            components = ctx.components.len(),
            "Running server middleware/fetchData"
        );
        let results = run_fetch_data(&ctx, &self.hooks).await?;
        Ok(first_override(results))
    }
}

#[async_trait]
impl NavigationGuard for FetchOrchestrator {
    async fn before_resolve(
        &self,
        nav: &NavigationContext,
    ) -> Result<Option<NavigationOverride>, NavigationError> {
        Ok(self.run_client(nav).await?)
    }
}

fn first_override(results: Vec<Option<NavigationOverride>>) -> Option<NavigationOverride> {
    results.into_iter().flatten().next()
}
