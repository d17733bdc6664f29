//! # rc-core
//!
//! Core domain models and business logic for RollCall.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod config;
pub mod identity;
pub mod notification;
pub mod onboarding;
pub mod ports;
pub mod supply;

// Re-export commonly used types at the crate root
pub use config::TrackerConfig;
pub use identity::UserProfile;
pub use notification::{Notification, Severity};
pub use onboarding::{OnboardingStatus, Screen};
pub use supply::{
    days_remaining, SupplyAction, SupplyCommand, SupplyMachine, SupplyPatch, SupplyRules,
    SupplyState,
};
