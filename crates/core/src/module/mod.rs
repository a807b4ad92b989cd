mod error;
mod path;
mod queue;

pub use error::{ModuleError, Result};
pub use path::{depth, ModulePath};
pub use queue::{Removal, RemovalQueue};
