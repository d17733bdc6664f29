//! Session startup and wiring of the stateful components.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use rc_core::config::SyncConfig;
use rc_core::ports::{IdentityPort, KeyValueStorePort, NotifierPort};
use rc_core::{Screen, SupplyRules, UserProfile};

use crate::persistence::{LoadFailure, PersistenceSync, SyncError};
use crate::supply::SupplyStore;
use crate::usecases::{AcknowledgeIntro, LoadSession, OnboardingFlag};

/// Busy indicator shown while persisted state is being read.
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn release(&self);
}

/// Session dependency grouping (just parameter grouping, no defaults).
pub struct SessionDeps {
    pub store: Arc<dyn KeyValueStorePort>,
    pub notifier: Arc<dyn NotifierPort>,
    pub identity: Arc<dyn IdentityPort>,
    pub loading: Arc<dyn LoadingIndicator>,
    pub rules: SupplyRules,
    pub sync: SyncConfig,
}

/// A running tracker session.
pub struct TrackerSession {
    supply: SupplyStore,
    onboarding: OnboardingFlag,
    profile: Option<UserProfile>,
    load_failures: Vec<LoadFailure>,
}

impl TrackerSession {
    /// Load persisted state and build the session.
    ///
    /// Always completes; unreadable data is replaced by defaults.
    pub async fn start(deps: SessionDeps) -> Self {
        let SessionDeps {
            store,
            notifier,
            identity,
            loading,
            rules,
            sync: sync_config,
        } = deps;

        let span = info_span!("session.start");
        async move {
            loading.show();

            let sync = Arc::new(PersistenceSync::new(store, Arc::clone(&notifier), rules));
            let snapshot = LoadSession::new(identity, Arc::clone(&sync)).execute().await;
            let loaded = snapshot.state;

            let supply = SupplyStore::new(
                loaded.supply,
                rules,
                Arc::clone(&sync),
                notifier,
                &sync_config,
            );
            let onboarding =
                OnboardingFlag::new(loaded.onboarding, AcknowledgeIntro::new(sync));

            loading.release();
            info!(screen = ?onboarding.active_screen(), "session ready");

            Self {
                supply,
                onboarding,
                profile: snapshot.profile,
                load_failures: loaded.failures,
            }
        }
        .instrument(span)
        .await
    }

    pub fn supply(&self) -> &SupplyStore {
        &self.supply
    }

    pub fn onboarding(&self) -> &OnboardingFlag {
        &self.onboarding
    }

    pub fn active_screen(&self) -> Screen {
        self.onboarding.active_screen()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn load_failures(&self) -> &[LoadFailure] {
        &self.load_failures
    }

    /// Persist the intro acknowledgment; navigates home only on success.
    pub async fn acknowledge_intro(&self) -> Result<Screen, SyncError> {
        self.onboarding.acknowledge_intro().await
    }

    /// Push out any throttled write still waiting for its window.
    pub async fn shutdown(&self) {
        self.supply.flush().await;
    }
}
