use std::sync::Arc;

use tokio::sync::Mutex;
use rc_core::SupplyState;

/// Shared supply context containing state and dispatch lock.
///
/// Shared between `SupplyStore` and its throttled write channel so that
/// snapshots and writes never interleave with a command in progress.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `state`.
/// - `dispatch_lock`: serializes commands and outbound supply writes.
/// - `state`: used for both reading (`get_state`) and writing (during dispatch).
pub struct SupplyContext {
    state: Mutex<SupplyState>,
    dispatch_lock: Mutex<()>,
}

impl SupplyContext {
    pub fn new(initial_state: SupplyState) -> Self {
        Self {
            state: Mutex::new(initial_state),
            dispatch_lock: Mutex::new(()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Current supply counters. Readers may see a state mid-command; take
    /// `dispatch_lock` first for a snapshot that no command is changing.
    pub async fn get_state(&self) -> SupplyState {
        *self.state.lock().await
    }

    /// Returns a guard that releases the lock when dropped.
    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Replace the counters with a transition's result. Caller holds
    /// `dispatch_lock`.
    pub async fn set_state(&self, state: SupplyState) {
        *self.state.lock().await = state;
    }
}
