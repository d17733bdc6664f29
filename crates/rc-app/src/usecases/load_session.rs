use std::sync::Arc;

use tracing::{info_span, warn, Instrument};

use rc_core::ports::IdentityPort;
use rc_core::UserProfile;

use crate::persistence::{LoadedState, PersistenceSync};

/// Everything the session needs before the first screen is shown.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub profile: Option<UserProfile>,
    pub state: LoadedState,
}

/// Use case for the startup read.
///
/// Fetches the host identity and both persisted keys. Neither step can fail
/// the startup: identity errors are logged, storage errors fall back to
/// defaults inside [`PersistenceSync::load`].
pub struct LoadSession {
    identity: Arc<dyn IdentityPort>,
    sync: Arc<PersistenceSync>,
}

impl LoadSession {
    pub fn new(identity: Arc<dyn IdentityPort>, sync: Arc<PersistenceSync>) -> Self {
        Self { identity, sync }
    }

    pub async fn execute(&self) -> SessionSnapshot {
        let span = info_span!("usecase.load_session.execute");

        async {
            let profile = match self.identity.fetch_profile().await {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!(error = %err, "identity unavailable");
                    None
                }
            };
            let state = self.sync.load().await;

            SessionSnapshot { profile, state }
        }
        .instrument(span)
        .await
    }
}
