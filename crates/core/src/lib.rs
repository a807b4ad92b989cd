//! Pure routing and dynamic store-module logic - no I/O, no async.
//!
//! This crate provides:
//! - Route locations with order-preserving query strings
//! - Route-update policies deciding when a navigation is significant
//! - Module paths and the deferred, depth-ordered removal queue
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//!
//! use trellis_core::module::{ModulePath, Removal, RemovalQueue};
//!
//! let mut queue = RemovalQueue::new();
//! queue.enqueue(["cart", "cart/1"]);
//!
//! // Deepest names come off the queue first.
//! let drained = queue.drain(&HashSet::new());
//! assert_eq!(drained[0], Removal::Unregister("cart/1".to_string()));
//!
//! let path = ModulePath::parse("cart/1").unwrap();
//! assert_eq!(path.depth(), 2);
//! ```

pub mod module;
pub mod policy;
pub mod route;
