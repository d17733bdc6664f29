//! # rc-infra
//!
//! Infrastructure adapters for the RollCall ports: key-value stores
//! (file, HTTP, in-memory), notification output and host identity.

pub mod identity;
pub mod kv;
pub mod notify;

pub use identity::StaticIdentity;
pub use kv::{FileKeyValueStore, HttpKeyValueStore, InMemoryKeyValueStore};
pub use notify::TracingNotifier;
