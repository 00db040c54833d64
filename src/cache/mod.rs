// Cache module for local filesystem caching.
// Stores census API tables so repeat lookups work offline and start instantly.

pub mod paths;
pub mod store;

pub use paths::{cache_dir, log_path, table_path, tables_dir, vintage_dir};
pub use store::{delete_dir, read_cached, write_cached};
