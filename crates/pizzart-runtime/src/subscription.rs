#![forbid(unsafe_code)]

//! Long-lived message sources (order status feeds).
//!
//! The model declares which subscriptions it wants from
//! [`Model::subscriptions`](crate::program::Model::subscriptions). After each
//! update the runtime compares that set against what is running, keyed by
//! [`SubId`]: new ids are started on their own thread, missing ids are
//! stopped, unchanged ids keep running untouched.
//!
//! Subscription messages enter the same queue as every other message, so they
//! are applied by `update` on the loop thread like anything else.

use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex, PoisonError, mpsc};
use std::thread;
use std::time::{Duration, Instant};

/// Identity used to deduplicate subscriptions across update cycles.
pub type SubId = u64;

/// A message source that runs on a background thread.
pub trait Subscription<M: Send + 'static>: Send {
    /// Subscriptions with the same id are considered identical.
    fn id(&self) -> SubId;

    /// Produce messages until `stop` fires or the channel closes.
    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal);
}

/// Cooperative stop flag handed to a running subscription.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    /// Create a (signal, trigger) pair.
    pub fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: Arc::clone(&inner),
        };
        (signal, StopTrigger { inner })
    }

    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until stopped or `duration` elapses. Returns `true` if stopped.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let start = Instant::now();
        loop {
            if *stopped {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (guard, _) = cvar
                .wait_timeout(stopped, duration - elapsed)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = guard;
        }
    }
}

/// Runtime side of a [`StopSignal`].
pub struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }
}

struct RunningSubscription {
    id: SubId,
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<()>>,
}

impl RunningSubscription {
    fn stop(mut self) {
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RunningSubscription {
    fn drop(&mut self) {
        // no join here; `stop` joins when called explicitly
        self.trigger.stop();
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Starts and stops subscriptions to match the declared set.
pub struct SubscriptionManager<M: Send + 'static> {
    active: Vec<RunningSubscription>,
    sender: mpsc::Sender<M>,
}

impl<M: Send + 'static> SubscriptionManager<M> {
    /// Messages from every subscription are delivered to `sender`.
    pub fn new(sender: mpsc::Sender<M>) -> Self {
        Self {
            active: Vec::new(),
            sender,
        }
    }

    /// Reconcile running subscriptions against `subscriptions`.
    pub fn reconcile(&mut self, subscriptions: Vec<Box<dyn Subscription<M>>>) {
        let wanted: HashSet<SubId> = subscriptions.iter().map(|s| s.id()).collect();
        let before = self.active.len();

        let (keep, drop): (Vec<_>, Vec<_>) = self
            .active
            .drain(..)
            .partition(|running| wanted.contains(&running.id));
        self.active = keep;
        for running in drop {
            crate::debug_trace!("stopping subscription: id={}", running.id);
            tracing::debug!(sub_id = running.id, "stopping subscription");
            running.stop();
        }

        let mut active_ids: HashSet<SubId> = self.active.iter().map(|r| r.id).collect();
        for sub in subscriptions {
            let id = sub.id();
            if !active_ids.insert(id) {
                continue;
            }
            crate::debug_trace!("starting subscription: id={}", id);
            tracing::debug!(sub_id = id, "starting subscription");
            let (signal, trigger) = StopSignal::new();
            let sender = self.sender.clone();
            let spawned = thread::Builder::new()
                .name(format!("pizzart-sub-{id:x}"))
                .spawn(move || sub.run(sender, signal));
            match spawned {
                Ok(handle) => self.active.push(RunningSubscription {
                    id,
                    trigger,
                    thread: Some(handle),
                }),
                Err(err) => {
                    tracing::warn!(sub_id = id, error = %err, "failed to start subscription");
                    active_ids.remove(&id);
                }
            }
        }

        tracing::trace!(
            active_before = before,
            active_after = self.active.len(),
            "subscription reconcile complete"
        );
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Ids of running subscriptions, in start order.
    pub fn active_ids(&self) -> Vec<SubId> {
        self.active.iter().map(|r| r.id).collect()
    }

    pub fn stop_all(&mut self) {
        for running in self.active.drain(..) {
            running.stop();
        }
    }
}

impl<M: Send + 'static> Drop for SubscriptionManager<M> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Subscription that sends a fixed list of messages and returns.
pub struct MockSubscription<M: Send + 'static> {
    id: SubId,
    messages: Vec<M>,
}

impl<M: Send + Clone + 'static> MockSubscription<M> {
    pub fn new(id: SubId, messages: Vec<M>) -> Self {
        Self { id, messages }
    }
}

impl<M: Send + Clone + 'static> Subscription<M> for MockSubscription<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn run(&self, sender: mpsc::Sender<M>, _stop: StopSignal) {
        for msg in &self.messages {
            if sender.send(msg.clone()).is_err() {
                break;
            }
        }
    }
}
