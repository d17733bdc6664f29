use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use rc_core::OnboardingStatus;

use crate::persistence::{PersistenceSync, SyncError};

/// Use case for acknowledging the intro screen.
///
/// Persists `{hasSeenIntro: true}` immediately. The caller only moves on to
/// the home screen once this returns `Ok`.
pub struct AcknowledgeIntro {
    sync: Arc<PersistenceSync>,
}

impl AcknowledgeIntro {
    pub fn new(sync: Arc<PersistenceSync>) -> Self {
        Self { sync }
    }

    /// Write the acknowledged status. No retry on failure.
    pub async fn execute(&self) -> Result<(), SyncError> {
        let span = info_span!("usecase.acknowledge_intro.execute");

        async {
            self.sync.write_view_status(&OnboardingStatus::seen()).await?;
            info!("intro acknowledged");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
