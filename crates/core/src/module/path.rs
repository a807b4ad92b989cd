use std::fmt;

use super::{ModuleError, Result};

/// A store module address: the module name split on `/`.
///
/// `cart/42` addresses the `42` module nested under `cart`, and its state
/// lives at `state.cart["42"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    /// Parses a module name, rejecting empty names and empty segments.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(ModuleError::EmptyName);
        }

        let segments: Vec<String> = name.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ModuleError::EmptySegment(name.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments; `cart` is 1, `cart/42` is 2.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The enclosing module path, if any.
    pub fn parent(&self) -> Option<ModulePath> {
        (self.segments.len() > 1).then(|| ModulePath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Whether `self` is `other` or nested somewhere below it.
    pub fn starts_with(&self, other: &ModulePath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Depth of a raw module name, counted the same way as [`ModulePath::depth`].
pub fn depth(name: &str) -> usize {
    name.split('/').count()
}
