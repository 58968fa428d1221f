//! Signals for change notification.
//!
//! A [`Signal<Args>`] holds a set of connected slots and invokes each of them
//! when emitted. Delivery is always direct: slots run synchronously on the
//! emitting thread, in connection order.
//!
//! Emission takes a snapshot of the connected slots and releases the internal
//! lock before invoking them, so a slot may connect, disconnect or emit on the
//! same signal without deadlocking. Slots connected during an emission are
//! first invoked by the next emission.
//!
//! # Example
//!
//! ```
//! use horizon_frameless_core::Signal;
//!
//! let ready = Signal::<u32>::new();
//! let id = ready.connect(|generation| println!("ready: {generation}"));
//! ready.emit(1);
//! assert!(ready.disconnect(id));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identifies a slot connected to a [`Signal`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification source with any number of connected slots.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot. The returned id can be used to disconnect it.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Disconnect a slot. Returns `false` if it was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Block or unblock emission. A blocked signal drops emissions silently.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::Release);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    /// Invoke every connected slot with `args`.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "emission suppressed: signal blocked");
            return;
        }

        let snapshot: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = snapshot.len(), "emitting signal");
        for slot in snapshot {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.slots.lock().len())
            .field("blocked", &self.blocked.load(Ordering::Relaxed))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn test_connect_emit_disconnect() {
        let signal = Signal::<i32>::new();
        let total = Arc::new(AtomicUsize::new(0));

        let sink = total.clone();
        let id = signal.connect(move |value| {
            sink.fetch_add(*value as usize, Ordering::SeqCst);
        });

        signal.emit(3);
        signal.emit(4);
        assert_eq!(total.load(Ordering::SeqCst), 7);

        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(100);
        assert_eq!(total.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_blocked_signal_drops_emissions() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));
        let sink = count.clone();
        signal.connect(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        signal.set_blocked(true);
        signal.emit(());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_slot_may_reenter_signal() {
        let signal = Arc::new(Signal::<()>::new());
        let count = Arc::new(AtomicUsize::new(0));

        let inner_signal = signal.clone();
        let sink = count.clone();
        signal.connect(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
            let sink = sink.clone();
            inner_signal.connect(move |_| {
                sink.fetch_add(10, Ordering::SeqCst);
            });
        });

        signal.emit(());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 2);

        signal.emit(());
        assert_eq!(count.load(Ordering::SeqCst), 1 + 1 + 10);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        signal.connect(|_| {});
        signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 2);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }
}
