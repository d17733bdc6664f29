//! Keyed time-window throttle.
//!
//! Each key is an independent channel. While a channel's window is open,
//! further calls only replace the pending arguments; when the window
//! elapses the most recent arguments fire once. Calls to the sink of one
//! channel are awaited one after another, so a channel never has two
//! writes in flight.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::time::sleep;
use tracing::trace;

type Sink<K, A> = Arc<dyn Fn(K, A) -> BoxFuture<'static, ()> + Send + Sync>;

/// Which end of the window fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Fire the first call immediately; coalesce the rest into one call at
    /// window end, which re-opens the window.
    Leading,
    /// Open the window on the first call and fire only the latest arguments
    /// when it elapses.
    Trailing,
}

struct Channel<A> {
    generation: u64,
    pending: Option<A>,
}

enum Step<A> {
    Reopen(A),
    Finish(Option<A>),
    Detached,
}

struct Inner<K, A> {
    window: Duration,
    edge: Edge,
    channels: Mutex<HashMap<K, Channel<A>>>,
    generations: AtomicU64,
    sink: Sink<K, A>,
}

impl<K, A> Inner<K, A> {
    fn channels(&self) -> MutexGuard<'_, HashMap<K, Channel<A>>> {
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct Throttle<K, A> {
    inner: Arc<Inner<K, A>>,
}

impl<K, A> Clone for Throttle<K, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, A> Throttle<K, A>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    pub fn new<F, Fut>(window: Duration, edge: Edge, sink: F) -> Self
    where
        F: Fn(K, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let sink: Sink<K, A> = Arc::new(move |key, args| Box::pin(sink(key, args)));
        Self {
            inner: Arc::new(Inner {
                window,
                edge,
                channels: Mutex::new(HashMap::new()),
                generations: AtomicU64::new(0),
                sink,
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    /// Submit `args` on channel `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call(&self, key: K, args: A) {
        let mut channels = self.inner.channels();
        if let Some(channel) = channels.get_mut(&key) {
            trace!("throttle window open, replacing pending call");
            channel.pending = Some(args);
            return;
        }

        let generation = self.inner.generations.fetch_add(1, Ordering::Relaxed);
        let (pending, first) = match self.inner.edge {
            Edge::Leading => (None, Some(args)),
            Edge::Trailing => (Some(args), None),
        };
        channels.insert(
            key.clone(),
            Channel {
                generation,
                pending,
            },
        );
        drop(channels);

        tokio::spawn(run_channel(Arc::clone(&self.inner), key, generation, first));
    }

    /// Whether `key` currently has an open window.
    pub fn is_open(&self, key: &K) -> bool {
        self.inner.channels().contains_key(key)
    }

    /// Close every open window and fire pending calls right away.
    pub async fn flush(&self) {
        let pending: Vec<(K, A)> = self
            .inner
            .channels()
            .drain()
            .filter_map(|(key, channel)| channel.pending.map(|args| (key, args)))
            .collect();

        for (key, args) in pending {
            (self.inner.sink)(key, args).await;
        }
    }
}

async fn run_channel<K, A>(inner: Arc<Inner<K, A>>, key: K, generation: u64, first: Option<A>)
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    let mut next = first;
    loop {
        if let Some(args) = next.take() {
            (inner.sink)(key.clone(), args).await;
        }

        sleep(inner.window).await;

        let step = {
            let mut channels = inner.channels();
            let owned = channels
                .get(&key)
                .is_some_and(|channel| channel.generation == generation);
            if !owned {
                Step::Detached
            } else {
                let pending = channels
                    .get_mut(&key)
                    .and_then(|channel| channel.pending.take());
                match (inner.edge, pending) {
                    (Edge::Leading, Some(args)) => Step::Reopen(args),
                    (_, pending) => {
                        channels.remove(&key);
                        Step::Finish(pending)
                    }
                }
            }
        };

        match step {
            Step::Reopen(args) => next = Some(args),
            Step::Finish(pending) => {
                if let Some(args) = pending {
                    (inner.sink)(key.clone(), args).await;
                }
                return;
            }
            // Flushed while sleeping.
            Step::Detached => return,
        }
    }
}
