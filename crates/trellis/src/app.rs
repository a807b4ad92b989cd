//! Demo shop wired to the navigation pipeline.

use async_trait::async_trait;
use serde_json::{json, Value};
use trellis_core::module::ModulePath;
use trellis_core::policy::PolicyOverride;
use trellis_runtime::{
    AppBuilder, Component, FetchContext, FetchData, FetchError, FetchHook, FetchHooks,
    FetchResult, ModuleDef, ModuleSpec, NavigationOverride, RouteConfig,
};
use trellis_ssr::RenderedRoute;

use crate::config::Config;

/// Loads a product into its `cart/{id}` module. Non-numeric ids go home.
struct LoadProduct;

#[async_trait]
impl FetchData for LoadProduct {
    async fn fetch_data(&self, ctx: &FetchContext) -> FetchResult {
        let id = ctx.route().location.param("id").unwrap_or_default();
        if id.parse::<u32>().is_err() {
            tracing::debug!(id, "Unknown product");
            return Ok(Some(NavigationOverride::Redirect("/".to_string())));
        }

        let tab = ctx.route().location.query.get("tab").unwrap_or("details");
        write(ctx, &format!("cart/{id}"), json!({ "product": id, "tab": tab, "items": [] }))?;
        Ok(None)
    }
}

/// Old product URLs.
struct LegacyRedirect;

#[async_trait]
impl FetchData for LegacyRedirect {
    async fn fetch_data(&self, ctx: &FetchContext) -> FetchResult {
        let id = ctx.route().location.param("id").unwrap_or_default();
        Ok(Some(NavigationOverride::Redirect(format!("/product/{id}"))))
    }
}

struct LoadOrders;

#[async_trait]
impl FetchData for LoadOrders {
    async fn fetch_data(&self, ctx: &FetchContext) -> FetchResult {
        write(ctx, "account/orders", json!({ "orders": [1001, 1002], "$page": 0 }))?;
        Ok(None)
    }
}

/// Counts navigations that fetched, under `visits`.
struct CountVisits;

#[async_trait]
impl FetchHook for CountVisits {
    async fn run(&self, ctx: &FetchContext) -> Result<(), FetchError> {
        let path = module_path("visits")?;
        let visits = ctx
            .store()
            .module_state(&path)
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        write(ctx, "visits", json!(visits + 1))
    }
}

fn module_path(name: &str) -> Result<ModulePath, FetchError> {
    ModulePath::parse(name).map_err(|e| FetchError::Failed(e.to_string()))
}

fn write(ctx: &FetchContext, name: &str, value: Value) -> Result<(), FetchError> {
    ctx.store()
        .set_state(&module_path(name)?, value)
        .map_err(|e| FetchError::Failed(e.to_string()))
}

/// Routes, hooks and defaults of the demo shop.
pub fn shop(config: &Config) -> AppBuilder {
    AppBuilder::new()
        .root_state(json!({ "visits": 0 }))
        .update_policy(config.update_policy())
        .hooks(FetchHooks::new().post_middleware(CountVisits))
        .route(
            RouteConfig::new("/")
                .name("home")
                .component(Component::new("Home").with_asset_id("home")),
        )
        .route(
            RouteConfig::new("/product/{id}").name("product").component(
                Component::new("Product")
                    .with_asset_id("product")
                    .with_fetch(LoadProduct)
                    .with_policy(PolicyOverride::default().query(true))
                    .with_module(ModuleSpec::routed(
                        |location| format!("cart/{}", location.param("id").unwrap_or_default()),
                        ModuleDef::new(json!({ "items": [] })),
                    )),
            ),
        )
        .route(
            RouteConfig::new("/legacy/{id}")
                .name("legacy")
                .component(Component::new("Legacy").with_fetch(LegacyRedirect)),
        )
        .route(
            RouteConfig::new("/account")
                .component(
                    Component::new("Account")
                        .with_asset_id("account")
                        .with_module(ModuleSpec::new("account", ModuleDef::new(json!({})))),
                )
                .child(RouteConfig::new("").name("account"))
                .child(
                    RouteConfig::new("orders").name("orders").component(
                        Component::new("Orders")
                            .with_asset_id("orders")
                            .with_fetch(LoadOrders)
                            .with_module(ModuleSpec::new(
                                "account/orders",
                                ModuleDef::new(json!({ "orders": [] })),
                            )),
                    ),
                ),
        )
}

/// Stand-in for the UI framework's render-to-string.
pub fn render_app_html(rendered: &RenderedRoute) -> String {
    let names: Vec<_> = rendered
        .route
        .components()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    format!(
        r#"<div id="app" data-route="{}">{}</div>"#,
        rendered.route.path(),
        names.join(" &gt; ")
    )
}
