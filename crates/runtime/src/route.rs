//! Route table and resolved routes.
//!
//! Route entries are declared as a tree. Resolving a URL yields the matched
//! chain: the entries from the outermost to the innermost one, each carrying
//! its components.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use matchit::Router as MatchRouter;
use trellis_core::route::{split_url, Location, Query};

use crate::component::Component;
use crate::error::{Result, RouterError};

/// Declaration of a route table entry.
///
/// Paths use `{param}` segments. A child's path is relative to its parent
/// unless it starts with `/`; a child with an empty path takes over its
/// parent's URL.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    path: String,
    name: Option<String>,
    components: Vec<Arc<Component>>,
    children: Vec<RouteConfig>,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn component(mut self, component: Component) -> Self {
        self.components.push(Arc::new(component));
        self
    }

    pub fn child(mut self, child: RouteConfig) -> Self {
        self.children.push(child);
        self
    }
}

/// One entry of a matched chain.
#[derive(Debug)]
pub struct RouteRecord {
    pub name: Option<String>,
    /// Full pattern, including parent segments.
    pub path: String,
    pub components: Vec<Arc<Component>>,
}

/// A resolved route: location data plus its matched chain.
#[derive(Debug, Clone)]
pub struct Route {
    pub location: Location,
    pub matched: Vec<Arc<RouteRecord>>,
}

impl Route {
    /// The route before the first navigation; it matches nothing.
    pub fn start() -> Self {
        Self {
            location: Location::start(),
            matched: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.location.name.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.location.path
    }

    pub fn full_path(&self) -> String {
        self.location.full_path()
    }

    /// Components of the matched chain, outermost entry first.
    pub fn components(&self) -> Vec<Arc<Component>> {
        self.matched
            .iter()
            .flat_map(|record| record.components.iter().cloned())
            .collect()
    }
}

/// Compiled route table.
pub struct RouteTable {
    matcher: MatchRouter<usize>,
    chains: Vec<Vec<Arc<RouteRecord>>>,
    patterns: Vec<String>,
}

impl RouteTable {
    pub fn new(configs: Vec<RouteConfig>) -> Result<Self, RouterError> {
        let mut flat = Vec::new();
        for config in configs {
            flatten(config, "", &[], &mut flat);
        }

        let mut matcher = MatchRouter::new();
        let mut chains: Vec<Vec<Arc<RouteRecord>>> = Vec::new();
        let mut patterns = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (pattern, chain) in flat {
            if let Some(&idx) = index.get(&pattern) {
                // Deeper entries come later; an empty child path wins.
                chains[idx] = chain;
                continue;
            }

            let idx = chains.len();
            matcher
                .insert(pattern.clone(), idx)
                .map_err(|e| RouterError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            index.insert(pattern.clone(), idx);
            patterns.push(pattern);
            chains.push(chain);
        }

        Ok(Self {
            matcher,
            chains,
            patterns,
        })
    }

    /// Resolves a URL (path, optional query and hash) against the table.
    pub fn resolve(&self, url: &str) -> Result<Route, RouterError> {
        let (path, query, hash) = split_url(url);
        let matched = self
            .matcher
            .at(path)
            .map_err(|_| RouterError::NotFound(path.to_string()))?;

        let chain = self.chains[*matched.value].clone();
        let params: BTreeMap<String, String> = matched
            .params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        let location = Location {
            name: chain.last().and_then(|record| record.name.clone()),
            path: path.to_string(),
            params,
            query: Query::parse(query),
            hash: hash.to_string(),
        };

        Ok(Route {
            location,
            matched: chain,
        })
    }

    /// Registered patterns, in declaration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("patterns", &self.patterns)
            .finish()
    }
}

fn flatten(
    config: RouteConfig,
    parent_path: &str,
    parent_chain: &[Arc<RouteRecord>],
    out: &mut Vec<(String, Vec<Arc<RouteRecord>>)>,
) {
    let full_path = join_paths(parent_path, &config.path);
    let record = Arc::new(RouteRecord {
        name: config.name,
        path: full_path.clone(),
        components: config.components,
    });

    let mut chain = parent_chain.to_vec();
    chain.push(record);
    out.push((full_path.clone(), chain.clone()));

    for child in config.children {
        flatten(child, &full_path, &chain, out);
    }
}

fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    if child.is_empty() {
        return if parent.is_empty() {
            "/".to_string()
        } else {
            parent.to_string()
        };
    }
    format!("{}/{child}", parent.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(vec![
            RouteConfig::new("/")
                .name("home")
                .component(Component::new("Home")),
            RouteConfig::new("/product/{id}")
                .name("product")
                .component(Component::new("ProductLayout"))
                .child(
                    RouteConfig::new("reviews")
                        .name("product-reviews")
                        .component(Component::new("Reviews")),
                ),
            RouteConfig::new("/account")
                .component(Component::new("AccountLayout"))
                .child(
                    RouteConfig::new("")
                        .name("account")
                        .component(Component::new("AccountHome")),
                ),
        ])
        .unwrap()
    }

    fn names(route: &Route) -> Vec<String> {
        route
            .components()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("", "/"), "/");
        assert_eq!(join_paths("/product/{id}", "reviews"), "/product/{id}/reviews");
        assert_eq!(join_paths("/", "about"), "/about");
        assert_eq!(join_paths("/a", "/abs"), "/abs");
        assert_eq!(join_paths("/a", ""), "/a");
    }

    #[test]
    fn test_resolve_with_params_query_and_hash() {
        let route = table().resolve("/product/42?tab=specs#top").unwrap();
        assert_eq!(route.name(), Some("product"));
        assert_eq!(route.location.param("id"), Some("42"));
        assert_eq!(route.location.query.get("tab"), Some("specs"));
        assert_eq!(route.location.hash, "top");
        assert_eq!(names(&route), vec!["ProductLayout"]);
    }

    #[test]
    fn test_nested_chain_outermost_first() {
        let route = table().resolve("/product/42/reviews").unwrap();
        assert_eq!(route.name(), Some("product-reviews"));
        assert_eq!(route.matched.len(), 2);
        assert_eq!(names(&route), vec!["ProductLayout", "Reviews"]);
    }

    #[test]
    fn test_empty_child_takes_over_parent_path() {
        let route = table().resolve("/account").unwrap();
        assert_eq!(route.name(), Some("account"));
        assert_eq!(names(&route), vec!["AccountLayout", "AccountHome"]);
    }

    #[test]
    fn test_not_found() {
        let result = table().resolve("/nope");
        assert_eq!(result.unwrap_err(), RouterError::NotFound("/nope".to_string()));
    }

    #[test]
    fn test_conflicting_patterns_rejected() {
        let result = RouteTable::new(vec![
            RouteConfig::new("/item/{id}"),
            RouteConfig::new("/item/{slug}"),
        ]);
        assert!(matches!(result, Err(RouterError::InvalidPattern { .. })));
    }

    #[test]
    fn test_start_route_matches_nothing() {
        let route = Route::start();
        assert!(route.components().is_empty());
        assert_eq!(route.full_path(), "/");
        assert_eq!(route.name(), None);
    }
}
