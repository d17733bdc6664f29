//! Onboarding domain models
//!
//! A single flag records whether the user has dismissed the intro screen.
//! It is stored under its own key and never merged into the supply record.

use serde::{Deserialize, Serialize};

/// Persisted onboarding status (`"viewStatus"` key).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingStatus {
    /// Whether the intro screen has been acknowledged
    #[serde(rename = "hasSeenIntro", default)]
    pub has_seen_intro: bool,
}

impl OnboardingStatus {
    pub fn seen() -> Self {
        Self {
            has_seen_intro: true,
        }
    }

    /// Screen to open the session on.
    pub fn initial_screen(&self) -> Screen {
        if self.has_seen_intro {
            Screen::Home
        } else {
            Screen::Intro
        }
    }
}

/// Top-level screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Intro,
    Home,
}
