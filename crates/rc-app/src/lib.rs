//! RollCall Application Orchestration Layer
//!
//! This crate contains the use cases, the supply store and the persistence
//! synchronization between in-memory state and the remote key-value store.

pub mod persistence;
pub mod session;
pub mod supply;
pub mod throttle;
pub mod usecases;

pub use persistence::{LoadFailure, LoadedState, PersistenceSync, SyncError};
pub use session::{LoadingIndicator, SessionDeps, TrackerSession};
pub use supply::{SupplyStore, WriteChannel};
pub use throttle::{Edge, Throttle};
