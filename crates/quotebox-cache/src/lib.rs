// SQLite-backed key-value storage
// Durable on disk for the collection, in memory for per-session state

pub mod store;

pub use store::{CacheError, KeyValueStore, SqliteStore};
