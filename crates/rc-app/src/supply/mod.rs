//! Supply state store and its write channels.

mod context;
mod store;

pub use context::SupplyContext;
pub use store::{SupplyStore, WriteChannel};
