//! Key-value store adapters.

mod file_store;
mod http_store;
mod memory_store;

pub use file_store::FileKeyValueStore;
pub use http_store::{HttpKeyValueStore, DEFAULT_HTTP_TIMEOUT};
pub use memory_store::InMemoryKeyValueStore;
