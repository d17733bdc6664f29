//! Supply domain module.
//!
//! Counters for rolls and sheets, the consumption-rate inputs, the pure
//! transition function over them and the days-remaining estimate.

mod estimate;
pub mod machine;
pub mod model;

pub use estimate::days_remaining;
pub use machine::{SupplyAction, SupplyCommand, SupplyMachine};
pub use model::{SupplyPatch, SupplyRules, SupplyState, SHEETS_PER_ROLL, SHEETS_PER_VISIT};
