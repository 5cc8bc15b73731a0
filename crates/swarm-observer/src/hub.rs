//! Registry and fan-out for connected observers.
//!
//! The [`BroadcastHub`] tracks the live set of observer connections.
//! Each observer gets its own bounded queue; a broadcast attempts a
//! non-blocking delivery to every queue and collects the failures --
//! closed receivers and full queues alike -- for removal *after* the
//! pass completes, never mid-iteration. Failures only affect
//! membership; they are invisible to the broadcaster.
//!
//! Blocking delivery to the actual socket (with its wall-clock timeout)
//! lives in the per-connection forwarding task in [`ws`](crate::ws);
//! the hub itself never awaits anything, so it is safe to call from the
//! tick path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Capacity of each observer's delivery queue.
///
/// An observer that falls this many frames behind is considered
/// unresponsive and is pruned on the next broadcast pass.
const OBSERVER_QUEUE_CAPACITY: usize = 64;

/// Opaque identity of a registered observer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl core::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tracks the live observer set and fans frames out to all of it.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    /// Per-observer bounded senders, keyed by observer id.
    observers: Mutex<HashMap<u64, mpsc::Sender<Arc<str>>>>,
    /// Source of observer ids.
    next_id: AtomicU64,
}

impl BroadcastHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer and immediately queue `initial` for it,
    /// on the same delivery path regular ticks use, so late joiners are
    /// never missing state.
    ///
    /// Returns the observer's identity and the receiving end of its
    /// queue; the caller's forwarding task drains the receiver into the
    /// actual connection.
    pub fn register(
        &self,
        initial: Arc<str>,
    ) -> (ObserverId, mpsc::Receiver<Arc<str>>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(OBSERVER_QUEUE_CAPACITY);

        // The queue is freshly created with free capacity, so this
        // cannot fail.
        let _ = tx.try_send(initial);

        let mut observers = self.lock();
        observers.insert(id, tx);
        debug!(observer = id, total = observers.len(), "observer registered");
        drop(observers);

        (ObserverId(id), rx)
    }

    /// Remove an observer. Idempotent.
    pub fn unregister(&self, id: ObserverId) {
        let mut observers = self.lock();
        if observers.remove(&id.0).is_some() {
            debug!(observer = id.0, total = observers.len(), "observer unregistered");
        }
    }

    /// Deliver `message` to every registered observer.
    ///
    /// Delivery is non-blocking and bounded: an observer whose queue is
    /// full or whose receiver is gone fails the pass and is removed
    /// afterwards. Failures are not surfaced to the caller.
    pub fn broadcast(&self, message: &Arc<str>) {
        let mut failed = Vec::new();

        let mut observers = self.lock();
        for (&id, tx) in observers.iter() {
            if tx.try_send(Arc::clone(message)).is_err() {
                failed.push(id);
            }
        }
        for id in &failed {
            observers.remove(id);
        }
        let remaining = observers.len();
        drop(observers);

        if !failed.is_empty() {
            warn!(
                pruned = failed.len(),
                remaining, "removed unresponsive observers"
            );
        }
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }

    /// Lock the registry, recovering from a poisoned mutex: membership
    /// data stays usable even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HashMap<u64, mpsc::Sender<Arc<str>>>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
