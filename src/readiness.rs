//! Module-readiness barrier.
//!
//! Feature modules finish their setup independently and each one flips its own
//! flag. The barrier runs a single completion callback the first time every
//! flag is set, and also exposes an awaitable completion signal for callers
//! that would rather wait than register a callback.

use std::collections::BTreeMap;
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{debug, info};

type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

struct BarrierState {
    flags: BTreeMap<String, bool>,
    fired: bool,
    on_ready: Option<ReadyCallback>,
}

/// Barrier over a fixed set of named modules.
///
/// Flags are monotonic: once a module is marked ready it stays ready for the
/// life of the barrier. Mutation and the aggregate check happen inside one
/// critical section, the callback runs after the lock is released.
pub struct ReadinessBarrier {
    state: Mutex<BarrierState>,
    done: watch::Sender<bool>,
}

impl ReadinessBarrier {
    /// Create a barrier over `names` with the callback to run once all are ready.
    ///
    /// A barrier with no names is ready immediately and runs `on_ready` before
    /// returning.
    pub fn new<I, S, F>(names: I, on_ready: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce() + Send + 'static,
    {
        let flags: BTreeMap<String, bool> =
            names.into_iter().map(|n| (n.into(), false)).collect();
        let (done, _) = watch::channel(false);

        let barrier = Self {
            state: Mutex::new(BarrierState {
                flags,
                fired: false,
                on_ready: Some(Box::new(on_ready)),
            }),
            done,
        };

        let callback = {
            let mut state = barrier.lock();
            Self::latch_if_ready(&mut state)
        };
        if let Some(callback) = callback {
            barrier.fire(callback);
        }

        barrier
    }

    /// Create a barrier with no completion callback; use [`wait`](Self::wait).
    pub fn without_callback<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names, || {})
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BarrierState> {
        // A poisoned barrier still holds valid flags.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn latch_if_ready(state: &mut BarrierState) -> Option<ReadyCallback> {
        if state.fired || !state.flags.values().all(|ready| *ready) {
            return None;
        }
        state.fired = true;
        state.on_ready.take()
    }

    fn fire(&self, callback: ReadyCallback) {
        info!("All modules ready");
        callback();
        self.done.send_replace(true);
    }

    /// Mark `name` ready. Names outside the initial set are accepted silently.
    pub fn mark_ready(&self, name: &str) {
        let callback = {
            let mut state = self.lock();
            match state.flags.get_mut(name) {
                Some(flag) if *flag => {
                    debug!("Module '{}' already marked ready", name);
                }
                Some(flag) => {
                    *flag = true;
                    debug!("Module '{}' ready", name);
                }
                None => {
                    state.flags.insert(name.to_string(), true);
                    debug!("Unregistered module '{}' marked ready", name);
                }
            }
            Self::latch_if_ready(&mut state)
        };

        if let Some(callback) = callback {
            self.fire(callback);
        }
    }

    /// True iff every known flag is set.
    pub fn is_all_ready(&self) -> bool {
        self.lock().flags.values().all(|ready| *ready)
    }

    /// Check whether a single module has been marked ready.
    #[allow(dead_code)]
    pub fn is_ready(&self, name: &str) -> bool {
        self.lock().flags.get(name).copied().unwrap_or(false)
    }

    /// Names still waiting, in sorted order.
    pub fn pending(&self) -> Vec<String> {
        self.lock()
            .flags
            .iter()
            .filter(|(_, ready)| !**ready)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Resolve once every module is ready.
    pub async fn wait(&self) {
        let mut rx = self.done.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|done| *done).await;
    }
}

impl std::fmt::Debug for ReadinessBarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ReadinessBarrier")
            .field("flags", &state.flags)
            .field("fired", &state.fired)
            .finish()
    }
}
