use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::debug;

use rc_core::{OnboardingStatus, Screen};

use super::AcknowledgeIntro;
use crate::persistence::SyncError;

/// One-time gate deciding between the intro and home screens.
///
/// Once acknowledged the flag stays set for the rest of the session; there
/// is no way back.
pub struct OnboardingFlag {
    seen: AtomicBool,
    acknowledge: AcknowledgeIntro,
    ack_lock: Mutex<()>,
}

impl OnboardingFlag {
    pub fn new(status: OnboardingStatus, acknowledge: AcknowledgeIntro) -> Self {
        Self {
            seen: AtomicBool::new(status.has_seen_intro),
            acknowledge,
            ack_lock: Mutex::new(()),
        }
    }

    pub fn has_seen_intro(&self) -> bool {
        self.seen.load(Ordering::Acquire)
    }

    pub fn status(&self) -> OnboardingStatus {
        OnboardingStatus {
            has_seen_intro: self.has_seen_intro(),
        }
    }

    pub fn active_screen(&self) -> Screen {
        self.status().initial_screen()
    }

    /// Persist the acknowledgment, then latch the flag.
    ///
    /// On failure the flag is untouched and the user stays on the intro
    /// screen; they may try again.
    pub async fn acknowledge_intro(&self) -> Result<Screen, SyncError> {
        let _guard = self.ack_lock.lock().await;
        if self.has_seen_intro() {
            debug!("intro already acknowledged");
            return Ok(Screen::Home);
        }

        self.acknowledge.execute().await?;
        self.seen.store(true, Ordering::Release);
        Ok(Screen::Home)
    }
}
