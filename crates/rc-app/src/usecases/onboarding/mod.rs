//! Onboarding use cases and the in-memory intro flag.

mod acknowledge;
mod flag;

pub use acknowledge::AcknowledgeIntro;
pub use flag::OnboardingFlag;
