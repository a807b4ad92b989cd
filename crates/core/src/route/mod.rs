mod location;
mod query;

pub use location::{split_url, Location};
pub use query::Query;
