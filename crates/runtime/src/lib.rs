//! Navigation pipeline - dynamic store modules and data fetching (imperative shell).
//!
//! This crate wires the pure logic of `trellis_core` to a store, a router and
//! async fetch operations:
//! - [`lifecycle::ModuleLifecycleManager`] registers the store modules of the
//!   destination before a navigation commits and tears down the ones that are
//!   no longer used, deepest first, one navigation later
//! - [`fetch::FetchOrchestrator`] runs the pre-hook, the global and component
//!   fetch operations, and the post-hook for every significant navigation
//! - [`router::Router`] is a memory-history router running both as guards
//! - [`app::App`] assembles one instance per session or server request

pub mod app;
pub mod component;
pub mod context;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod policy;
pub mod route;
pub mod router;
pub mod store;

#[cfg(test)]
mod testing;

pub use app::{App, AppBuilder};
pub use component::{
    Component, FetchData, FetchHook, FetchResult, ModuleSpec, NavigationOverride, RouteUpdate,
};
pub use context::{FetchContext, NavigationContext, SsrContext};
pub use error::{
    AppError, FetchError, LifecycleError, NavigationError, RouterError, StoreError,
};
pub use fetch::{run_fetch_data, FetchHooks, FetchOrchestrator};
pub use lifecycle::ModuleLifecycleManager;
pub use policy::should_process;
pub use route::{Route, RouteConfig, RouteTable};
pub use router::{AfterEachHook, NavigationGuard, NavigationOutcome, Router, MAX_REDIRECTS};
pub use store::{MemoryStore, ModuleDef, RegisterOptions, Store};
