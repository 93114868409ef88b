mod schema;
mod loader;

pub use schema::*;
pub use loader::{load, load_from_str};
