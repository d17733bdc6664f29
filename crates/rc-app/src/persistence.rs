//! Bridge between in-memory state and the remote key-value store.
//!
//! Loading never fails as a whole: every key that cannot be read or decoded
//! falls back to its defaults and raises a load-failure notification.
//! Writes report failures both to the notifier and to the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};

use rc_core::ports::{
    KeyValueStorePort, NotifierPort, StoreError, StoredEntry, STATE_KEY, VIEW_STATUS_KEY,
};
use rc_core::{Notification, OnboardingStatus, SupplyPatch, SupplyRules, SupplyState};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("encode {key} failed: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("write {key} failed: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Why part of the initial load fell back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    /// The read request itself was rejected; every key defaulted.
    Transport,
    /// The value under `key` was not valid serialized text.
    Decode { key: &'static str },
}

/// Result of the initial load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    pub supply: SupplyState,
    pub onboarding: OnboardingStatus,
    pub failures: Vec<LoadFailure>,
}

pub struct PersistenceSync {
    store: Arc<dyn KeyValueStorePort>,
    notifier: Arc<dyn NotifierPort>,
    rules: SupplyRules,
}

impl PersistenceSync {
    pub fn new(
        store: Arc<dyn KeyValueStorePort>,
        notifier: Arc<dyn NotifierPort>,
        rules: SupplyRules,
    ) -> Self {
        Self {
            store,
            notifier,
            rules,
        }
    }

    /// Read both keys in one round-trip and build the session's state.
    pub async fn load(&self) -> LoadedState {
        let span = info_span!("persistence.load");

        async {
            let mut failures = Vec::new();
            let (supply_patch, onboarding) =
                match self.store.get(&[STATE_KEY, VIEW_STATUS_KEY]).await {
                    Ok(entries) => {
                        let supply_patch = self
                            .decode_entry::<SupplyPatch>(&entries, STATE_KEY)
                            .unwrap_or_else(|failure| {
                                failures.push(failure);
                                SupplyPatch::default()
                            });
                        let onboarding = self
                            .decode_entry::<OnboardingStatus>(&entries, VIEW_STATUS_KEY)
                            .unwrap_or_else(|failure| {
                                failures.push(failure);
                                OnboardingStatus::default()
                            });
                        (supply_patch, onboarding)
                    }
                    Err(err) => {
                        warn!(error = %err, "storage read failed, using defaults");
                        failures.push(LoadFailure::Transport);
                        (SupplyPatch::default(), OnboardingStatus::default())
                    }
                };

            for _ in &failures {
                self.notifier.notify(Notification::LoadFailed);
            }

            let supply = SupplyState::from_patch(&supply_patch, &self.rules);
            info!(
                ?supply,
                has_seen_intro = onboarding.has_seen_intro,
                failures = failures.len(),
                "persisted state loaded"
            );

            LoadedState {
                supply,
                onboarding,
                failures,
            }
        }
        .instrument(span)
        .await
    }

    fn decode_entry<T>(&self, entries: &[StoredEntry], key: &'static str) -> Result<T, LoadFailure>
    where
        T: DeserializeOwned + Default,
    {
        let Some(text) = entries
            .iter()
            .rev()
            .find(|entry| entry.key == key)
            .and_then(StoredEntry::text)
        else {
            debug!(key, "no stored value, using defaults");
            return Ok(T::default());
        };

        serde_json::from_str(text).map_err(|err| {
            warn!(key, error = %err, "stored value is malformed, using defaults");
            LoadFailure::Decode { key }
        })
    }

    /// Write the full supply snapshot to the `"state"` key.
    pub async fn write_supply(&self, state: &SupplyState) -> Result<(), SyncError> {
        self.write(STATE_KEY, state)
            .instrument(info_span!("persistence.write_supply"))
            .await
    }

    /// Write the onboarding status to the `"viewStatus"` key.
    pub async fn write_view_status(&self, status: &OnboardingStatus) -> Result<(), SyncError> {
        self.write(VIEW_STATUS_KEY, status)
            .instrument(info_span!("persistence.write_view_status"))
            .await
    }

    async fn write<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), SyncError> {
        let text =
            serde_json::to_string(value).map_err(|source| SyncError::Encode { key, source })?;

        match self.store.set(key, &text).await {
            Ok(()) => {
                debug!(key, value = %text, "stored");
                Ok(())
            }
            Err(source) => {
                warn!(key, error = %source, "storage write failed");
                self.notifier.notify(Notification::SaveFailed);
                Err(SyncError::Write { key, source })
            }
        }
    }
}
