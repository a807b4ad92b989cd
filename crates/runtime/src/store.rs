//! Store handle and an in-memory implementation.
//!
//! The lifecycle manager only needs to register, unregister and read module
//! state; everything else about the store (mutations, getters, plugins)
//! belongs to the host application.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};
use trellis_core::module::ModulePath;

use crate::error::{Result, StoreError};

/// An opaque store module definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleDef {
    state: Value,
}

impl ModuleDef {
    /// A module whose state starts as `state`.
    pub fn new(state: Value) -> Self {
        Self { state }
    }

    pub fn initial_state(&self) -> &Value {
        &self.state
    }
}

/// Options for [`Store::register_module`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Keep existing state at the module path instead of resetting it.
    pub preserve_state: bool,
}

/// Store operations used by the navigation pipeline.
pub trait Store: Send + Sync {
    /// Whether a module is registered at `path`.
    fn has_module(&self, path: &ModulePath) -> bool;

    /// Registers `module` at `path`.
    fn register_module(
        &self,
        path: &ModulePath,
        module: &ModuleDef,
        options: RegisterOptions,
    ) -> Result<(), StoreError>;

    /// Unregisters the module at `path` and drops its state.
    fn unregister_module(&self, path: &ModulePath) -> Result<(), StoreError>;

    /// State stored at `path`, whether or not a module is registered there.
    fn module_state(&self, path: &ModulePath) -> Option<Value>;

    /// Snapshot of the whole state tree.
    fn state(&self) -> Value;

    /// Replaces the whole state tree (client hydration).
    fn replace_state(&self, state: Value) -> Result<(), StoreError>;

    /// Writes `value` at `path`.
    fn set_state(&self, path: &ModulePath, value: Value) -> Result<(), StoreError>;
}

#[derive(Debug)]
struct Inner {
    state: Value,
    modules: BTreeSet<ModulePath>,
}

/// In-memory store backed by a JSON state tree.
///
/// Registering a nested module creates missing intermediate state objects,
/// so `cart/42` can be registered without a `cart` module.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates a store with the given root state, which must be an object.
    pub fn new(root_state: Value) -> Result<Self, StoreError> {
        if !root_state.is_object() {
            return Err(StoreError::InvalidRootState);
        }

        Ok(Self {
            inner: RwLock::new(Inner {
                state: root_state,
                modules: BTreeSet::new(),
            }),
        })
    }

    /// Names of the registered dynamic modules, sorted.
    pub fn module_names(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.modules.iter().map(ToString::to_string).collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: Value::Object(Map::new()),
                modules: BTreeSet::new(),
            }),
        }
    }
}

impl Store for MemoryStore {
    fn has_module(&self, path: &ModulePath) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.modules.contains(path)
    }

    fn register_module(
        &self,
        path: &ModulePath,
        module: &ModuleDef,
        options: RegisterOptions,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.modules.contains(path) {
            return Err(StoreError::DuplicateModule(path.to_string()));
        }

        let (parent, key) = parent_object(&mut inner.state, path)?;
        if !options.preserve_state || !parent.contains_key(key) {
            parent.insert(key.to_string(), module.initial_state().clone());
        }

        inner.modules.insert(path.clone());
        Ok(())
    }

    fn unregister_module(&self, path: &ModulePath) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.modules.contains(path) {
            return Err(StoreError::UnknownModule(path.to_string()));
        }

        inner.modules.retain(|registered| !registered.starts_with(path));

        let (parent, key) = parent_object(&mut inner.state, path)?;
        parent.remove(key);
        Ok(())
    }

    fn module_state(&self, path: &ModulePath) -> Option<Value> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        path.segments()
            .iter()
            .try_fold(&inner.state, |state, key| state.get(key))
            .cloned()
    }

    fn state(&self) -> Value {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.state.clone()
    }

    fn replace_state(&self, state: Value) -> Result<(), StoreError> {
        if !state.is_object() {
            return Err(StoreError::InvalidRootState);
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.state = state;
        Ok(())
    }

    fn set_state(&self, path: &ModulePath, value: Value) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let (parent, key) = parent_object(&mut inner.state, path)?;
        parent.insert(key.to_string(), value);
        Ok(())
    }
}

/// Walks to the object holding the last segment of `path`, creating missing
/// objects on the way.
fn parent_object<'a, 'p>(
    root: &'a mut Value,
    path: &'p ModulePath,
) -> Result<(&'a mut Map<String, Value>, &'p str), StoreError> {
    let segments = path.segments();
    let (last, ancestors) = segments
        .split_last()
        .ok_or_else(|| StoreError::NotAnObject(path.to_string()))?;

    let mut current = root;
    for segment in ancestors {
        let map = current
            .as_object_mut()
            .ok_or_else(|| StoreError::NotAnObject(path.to_string()))?;
        current = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    let parent = current
        .as_object_mut()
        .ok_or_else(|| StoreError::NotAnObject(path.to_string()))?;
    Ok((parent, last.as_str()))
}
