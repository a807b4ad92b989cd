//! Should-process predicate.

use trellis_core::policy::{should_process_static, UpdatePolicy};

use crate::component::{Component, RouteUpdate};
use crate::context::FetchContext;

/// Whether `component` should run its fetch/module processing for the
/// navigation described by `ctx`.
///
/// Navigations between different route entries always qualify. Otherwise a
/// component predicate decides on its own, and a component policy is merged
/// over `defaults` field by field.
pub fn should_process(component: &Component, ctx: &FetchContext, defaults: &UpdatePolicy) -> bool {
    let from = &ctx.from().location;
    let to = &ctx.route().location;

    if !from.same_entry(to) {
        return true;
    }

    match component.route_update() {
        Some(RouteUpdate::Predicate(predicate)) => predicate(ctx),
        Some(RouteUpdate::Policy(over)) => should_process_static(defaults, Some(over), from, to),
        None => should_process_static(defaults, None, from, to),
    }
}
