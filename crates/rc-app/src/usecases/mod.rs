//! Business logic use cases

pub mod load_session;
pub mod onboarding;

pub use load_session::{LoadSession, SessionSnapshot};
pub use onboarding::{AcknowledgeIntro, OnboardingFlag};
