//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the core business logic to remain independent of
//! external dependencies.

pub mod errors;
pub mod identity;
pub mod kv_store;
mod notifier;

pub use errors::StoreError;
pub use identity::IdentityPort;
pub use kv_store::{KeyValueStorePort, StoredEntry, STATE_KEY, VIEW_STATUS_KEY};
pub use notifier::NotifierPort;
