//! Route-update policies.
//!
//! A navigation between two locations of the same route table entry (for
//! example `/product/1?tab=a` to `/product/1?tab=b`) is only worth processing
//! when the fields a component cares about changed. Navigations between
//! different entries are always significant.

use serde::{Deserialize, Serialize};

use crate::route::Location;

/// Which location fields make a same-entry navigation significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePolicy {
    pub path: bool,
    pub query: bool,
    pub hash: bool,
}

impl Default for UpdatePolicy {
    /// Only path changes are processed.
    fn default() -> Self {
        Self {
            path: true,
            query: false,
            hash: false,
        }
    }
}

impl UpdatePolicy {
    /// Applies a component override on top of these defaults, field by field.
    pub fn merge(&self, over: &PolicyOverride) -> UpdatePolicy {
        UpdatePolicy {
            path: over.path.unwrap_or(self.path),
            query: over.query.unwrap_or(self.query),
            hash: over.hash.unwrap_or(self.hash),
        }
    }

    /// Whether any field enabled by this policy differs between the locations.
    pub fn changed(&self, from: &Location, to: &Location) -> bool {
        (self.path && from.path != to.path)
            || (self.query && from.query != to.query)
            || (self.hash && from.hash != to.hash)
    }
}

/// A component-level policy; unset fields fall back to the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOverride {
    pub path: Option<bool>,
    pub query: Option<bool>,
    pub hash: Option<bool>,
}

impl PolicyOverride {
    pub fn path(mut self, enabled: bool) -> Self {
        self.path = Some(enabled);
        self
    }

    pub fn query(mut self, enabled: bool) -> Self {
        self.query = Some(enabled);
        self
    }

    pub fn hash(mut self, enabled: bool) -> Self {
        self.hash = Some(enabled);
        self
    }
}

/// Evaluates a static policy for a navigation.
///
/// Always true across route table entries; otherwise the merged policy decides.
pub fn should_process_static(
    defaults: &UpdatePolicy,
    over: Option<&PolicyOverride>,
    from: &Location,
    to: &Location,
) -> bool {
    if !from.same_entry(to) {
        return true;
    }

    let policy = over.map_or(*defaults, |o| defaults.merge(o));
    policy.changed(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(url: &str) -> Location {
        Location::from_url(url).with_name("product")
    }

    #[test]
    fn test_default_policy_is_path_only() {
        let policy = UpdatePolicy::default();
        assert!(policy.path);
        assert!(!policy.query);
        assert!(!policy.hash);
    }

    #[test]
    fn test_merge_is_field_level() {
        let defaults = UpdatePolicy {
            path: true,
            query: true,
            hash: false,
        };
        let merged = defaults.merge(&PolicyOverride::default().hash(true));
        assert_eq!(
            merged,
            UpdatePolicy {
                path: true,
                query: true,
                hash: true,
            }
        );
    }

    #[test]
    fn test_different_entries_always_process() {
        let off = PolicyOverride::default().path(false);
        let from = Location::from_url("/").with_name("home");
        let to = product("/");
        assert!(should_process_static(
            &UpdatePolicy::default(),
            Some(&off),
            &from,
            &to
        ));
    }

    #[test]
    fn test_query_change_ignored_by_default() {
        let from = product("/product/1?tab=a");
        let to = product("/product/1?tab=b");
        assert!(!should_process_static(
            &UpdatePolicy::default(),
            None,
            &from,
            &to
        ));

        let defaults = UpdatePolicy::default().merge(&PolicyOverride::default().query(true));
        assert!(should_process_static(&defaults, None, &from, &to));
    }

    #[test]
    fn test_override_enables_hash() {
        let from = product("/product/1#a");
        let to = product("/product/1#b");
        let over = PolicyOverride::default().hash(true);
        assert!(!should_process_static(
            &UpdatePolicy::default(),
            None,
            &from,
            &to
        ));
        assert!(should_process_static(
            &UpdatePolicy::default(),
            Some(&over),
            &from,
            &to
        ));
    }

    #[test]
    fn test_path_change_processed() {
        assert!(should_process_static(
            &UpdatePolicy::default(),
            None,
            &product("/product/1"),
            &product("/product/2"),
        ));
    }

    #[test]
    fn test_reordered_query_counts_as_change() {
        let defaults = UpdatePolicy {
            path: true,
            query: true,
            hash: false,
        };
        assert!(should_process_static(
            &defaults,
            None,
            &product("/product/1?a=1&b=2"),
            &product("/product/1?b=2&a=1"),
        ));
    }
}
