use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};

use rc_core::config::SyncConfig;
use rc_core::ports::NotifierPort;
use rc_core::{
    days_remaining, SupplyAction, SupplyCommand, SupplyMachine, SupplyPatch, SupplyRules,
    SupplyState,
};

use crate::persistence::{PersistenceSync, SyncError};
use crate::supply::context::SupplyContext;
use crate::throttle::{Edge, Throttle};

/// Outbound write channels that are throttled independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteChannel {
    Supply,
}

/// Owns the session's supply counters.
///
/// Every command runs the pure [`SupplyMachine`] under the dispatch lock and
/// then carries out the resulting actions: slider changes go through the
/// throttled channel, consumed sheets are written immediately and awaited.
pub struct SupplyStore {
    context: Arc<SupplyContext>,
    rules: SupplyRules,
    sync: Arc<PersistenceSync>,
    notifier: Arc<dyn NotifierPort>,
    throttle: Throttle<WriteChannel, SupplyPatch>,
}

impl SupplyStore {
    pub fn new(
        initial: SupplyState,
        rules: SupplyRules,
        sync: Arc<PersistenceSync>,
        notifier: Arc<dyn NotifierPort>,
        sync_config: &SyncConfig,
    ) -> Self {
        let context = SupplyContext::new(initial).arc();
        let edge = if sync_config.leading_edge {
            Edge::Leading
        } else {
            Edge::Trailing
        };

        let sink_context = Arc::clone(&context);
        let sink_sync = Arc::clone(&sync);
        let throttle = Throttle::new(
            sync_config.throttle_window,
            edge,
            move |channel: WriteChannel, patch: SupplyPatch| {
                let context = Arc::clone(&sink_context);
                let sync = Arc::clone(&sink_sync);
                async move {
                    let _dispatch_guard = context.acquire_dispatch_lock().await;
                    let snapshot = context.get_state().await.merged(&patch);
                    // Failures are already logged and notified; the next
                    // successful write carries the state forward.
                    if let Err(err) = sync.write_supply(&snapshot).await {
                        debug!(?channel, error = %err, "throttled write dropped");
                    }
                }
            },
        );

        Self {
            context,
            rules,
            sync,
            notifier,
            throttle,
        }
    }

    pub fn rules(&self) -> &SupplyRules {
        &self.rules
    }

    pub async fn snapshot(&self) -> SupplyState {
        self.context.get_state().await
    }

    pub async fn days_remaining(&self) -> u32 {
        days_remaining(&self.snapshot().await, &self.rules)
    }

    pub async fn set_rolls(&self, rolls: u32) -> Result<SupplyState, SyncError> {
        self.dispatch(SupplyCommand::SetRolls(rolls)).await
    }

    pub async fn set_visits(&self, visits: u32) -> Result<SupplyState, SyncError> {
        self.dispatch(SupplyCommand::SetVisits(visits)).await
    }

    pub async fn set_persons(&self, persons: u32) -> Result<SupplyState, SyncError> {
        self.dispatch(SupplyCommand::SetPersons(persons)).await
    }

    /// Use one sheet. The write is awaited; on failure the local decrement
    /// stands and the error is returned.
    pub async fn consume_sheet(&self) -> Result<SupplyState, SyncError> {
        self.dispatch(SupplyCommand::ConsumeSheet).await
    }

    /// Queue a throttled write of the current snapshot merged with `patch`.
    pub fn sync_state(&self, patch: Option<SupplyPatch>) {
        self.throttle
            .call(WriteChannel::Supply, patch.unwrap_or_default());
    }

    /// Fire any throttled write still waiting for its window.
    pub async fn flush(&self) {
        self.throttle.flush().await;
    }

    async fn dispatch(&self, command: SupplyCommand) -> Result<SupplyState, SyncError> {
        // Serializes commands so two rapid consumes never read the same
        // pre-decrement value or reorder their writes.
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!("usecase.supply_store.dispatch", command = ?command);
        async {
            let current = self.context.get_state().await;
            let (next, actions) = SupplyMachine::transition(current, command, &self.rules);
            if next != current {
                info!(from = ?current, to = ?next, "supply state transition");
            }
            self.context.set_state(next).await;

            let mut outcome = Ok(next);
            for action in actions {
                debug!(?action, "supply executing action");
                match action {
                    SupplyAction::Notify(notification) => self.notifier.notify(notification),
                    SupplyAction::PersistThrottled => self.sync_state(None),
                    SupplyAction::PersistNow => {
                        if let Err(err) = self.sync.write_supply(&next).await {
                            outcome = Err(err);
                        }
                    }
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }
}
