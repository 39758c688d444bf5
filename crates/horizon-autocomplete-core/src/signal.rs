//! Signal/slot system for Horizon Autocomplete.
//!
//! Widgets expose their lifecycle notifications as typed signals owned by the
//! widget instance. There is no global event bus: a listener connects to the
//! exact signal it cares about and disconnects through the returned
//! [`ConnectionId`] (or by dropping a [`ConnectionGuard`]).
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - Plain notification, slots cannot influence the emitter
//! - [`VetoSignal<Args>`] - Cancellable notification, any slot may return
//!   [`Propagation::Prevent`] to veto the operation being announced
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Reentrancy
//!
//! Slots are snapshotted before they are invoked, so a slot may connect or
//! disconnect slots on the signal that is currently emitting. Changes become
//! visible on the next emission.
//!
//! # Example
//!
//! ```
//! use horizon_autocomplete_core::{Propagation, Signal, VetoSignal};
//!
//! let selected = Signal::<String>::new();
//! let conn_id = selected.connect(|value| {
//!     println!("Selected: {}", value);
//! });
//! selected.emit("apple".to_string());
//! selected.disconnect(conn_id);
//!
//! let lookup = VetoSignal::<String>::new();
//! lookup.connect(|query| {
//!     if query.starts_with('#') {
//!         Propagation::Prevent
//!     } else {
//!         Propagation::Continue
//!     }
//! });
//! assert!(lookup.emit("ap".to_string()));
//! assert!(!lookup.emit("#tag".to_string()));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`] or [`VetoSignal::disconnect`]. The ID remains
    /// valid until the connection is explicitly disconnected or the signal
    /// is dropped.
    pub struct ConnectionId;
}

/// The verdict a slot of a [`VetoSignal`] returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagation {
    /// Let the announced operation proceed.
    #[default]
    Continue,
    /// Cancel the announced operation.
    Prevent,
}

impl Propagation {
    /// Returns `true` for [`Propagation::Prevent`].
    pub fn is_prevented(self) -> bool {
        matches!(self, Self::Prevent)
    }
}

impl From<bool> for Propagation {
    /// `true` lets the operation continue, `false` prevents it.
    fn from(proceed: bool) -> Self {
        if proceed { Self::Continue } else { Self::Prevent }
    }
}

type SlotMapOf<S> = Mutex<SlotMap<ConnectionId, Arc<S>>>;

/// Shared connection table, referenced weakly by [`ConnectionGuard`].
struct Connections<S: ?Sized> {
    slots: Arc<SlotMapOf<S>>,
}

impl<S: ?Sized> Connections<S> {
    fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    fn insert(&self, slot: Arc<S>) -> ConnectionId {
        self.slots.lock().insert(slot)
    }

    fn remove(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    fn clear(&self) {
        self.slots.lock().clear();
    }

    fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Clone the current slots so they can run without holding the lock.
    fn snapshot(&self) -> Vec<Arc<S>> {
        self.slots.lock().values().cloned().collect()
    }
}

/// Object-safe disconnect hook used by [`ConnectionGuard`].
trait Disconnect: Send + Sync {
    fn disconnect(&self, id: ConnectionId) -> bool;
}

impl<S: ?Sized + Send + Sync> Disconnect for SlotMapOf<S> {
    fn disconnect(&self, id: ConnectionId) -> bool {
        self.lock().remove(id).is_some()
    }
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with a reference
/// to the provided arguments, in connection order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple for multiple arguments.
pub struct Signal<Args> {
    connections: Connections<dyn Fn(&Args) + Send + Sync>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Connections::new(),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use horizon_autocomplete_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.insert(Arc::new(slot))
    }

    /// Connect a slot that is disconnected when the returned guard is dropped.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard
    where
        F: Fn(&Args) + Send + Sync + 'static,
        Args: Send,
    {
        let id = self.connect(slot);
        let table: Arc<SlotMapOf<dyn Fn(&Args) + Send + Sync>> = self.connections.slots.clone();
        let table: Arc<dyn Disconnect> = table;
        ConnectionGuard {
            table: Arc::downgrade(&table),
            id,
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.remove(id)
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` will do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    #[tracing::instrument(skip_all, target = "horizon_autocomplete_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots = self.connections.snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");
        for slot in slots {
            slot(&args);
        }
    }
}

/// A signal whose slots may veto the operation it announces.
///
/// Every connected slot runs, even after one of them prevented the operation,
/// so observers such as analytics still see the notification. The emitter
/// learns the combined verdict from the return value of [`emit`](Self::emit).
pub struct VetoSignal<Args> {
    connections: Connections<dyn Fn(&Args) -> Propagation + Send + Sync>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for VetoSignal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> VetoSignal<Args> {
    /// Create a new vetoable signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Connections::new(),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot that decides whether the operation may proceed.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) -> Propagation + Send + Sync + 'static,
    {
        self.connections.insert(Arc::new(slot))
    }

    /// Connect a slot that only observes the notification.
    pub fn observe<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connect(move |args| {
            slot(args);
            Propagation::Continue
        })
    }

    /// Connect a slot that is disconnected when the returned guard is dropped.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard
    where
        F: Fn(&Args) -> Propagation + Send + Sync + 'static,
        Args: Send,
    {
        let id = self.connect(slot);
        let table: Arc<SlotMapOf<dyn Fn(&Args) -> Propagation + Send + Sync>> =
            self.connections.slots.clone();
        let table: Arc<dyn Disconnect> = table;
        ConnectionGuard {
            table: Arc::downgrade(&table),
            id,
        }
    }

    /// Disconnect a specific slot by its connection ID.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.remove(id)
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Block signal emission temporarily. A blocked signal never vetoes.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal.
    ///
    /// Returns `true` when the operation may proceed, `false` if at least one
    /// slot returned [`Propagation::Prevent`].
    #[tracing::instrument(skip_all, target = "horizon_autocomplete_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) -> bool {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return true;
        }

        let slots = self.connections.snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting vetoable signal");
        let mut proceed = true;
        for slot in slots {
            if slot(&args).is_prevented() {
                proceed = false;
            }
        }
        proceed
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// The guard only holds a weak reference to the connection table, so it may
/// outlive the signal it was created from.
///
/// # Example
///
/// ```
/// use horizon_autocomplete_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let signal = Signal::<i32>::new();
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);
/// }
/// signal.emit(43);
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard {
    table: Weak<dyn Disconnect>,
    id: ConnectionId,
}

impl ConnectionGuard {
    /// The connection this guard owns.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.disconnect(self.id);
        }
    }
}

impl std::fmt::Debug for ConnectionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        signal.set_blocked(true);
        signal.emit(2);
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(*received.lock(), vec![1, 3]);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        for _ in 0..5 {
            signal.connect(|_| {});
        }

        assert_eq!(signal.connection_count(), 5);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        {
            let received_clone = received.clone();
            let _guard = signal.connect_scoped(move |&value| {
                received_clone.lock().push(value);
            });
            signal.emit(1);
        }

        signal.emit(2);
        assert_eq!(*received.lock(), vec![1]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard_outlives_signal() {
        let guard = {
            let signal = Signal::<i32>::new();
            signal.connect_scoped(|_| {})
        };
        drop(guard);
    }

    #[test]
    fn test_slot_may_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let count = Arc::new(Mutex::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let signal_clone = signal.clone();
        let count_clone = count.clone();
        let own_id_clone = own_id.clone();
        let id = signal.connect(move |_| {
            *count_clone.lock() += 1;
            if let Some(id) = *own_id_clone.lock() {
                signal_clone.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(());
        signal.emit(());
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_veto_signal_without_slots_proceeds() {
        let signal = VetoSignal::<String>::new();
        assert!(signal.emit("query".to_string()));
    }

    #[test]
    fn test_veto_signal_any_slot_prevents() {
        let signal = VetoSignal::<String>::new();
        let seen = Arc::new(Mutex::new(0));

        signal.connect(|_| Propagation::Prevent);
        let seen_clone = seen.clone();
        signal.observe(move |_| {
            *seen_clone.lock() += 1;
        });

        assert!(!signal.emit("ap".to_string()));
        // Observers still run after a veto.
        assert_eq!(*seen.lock(), 1);
    }

    #[test]
    fn test_veto_signal_blocked_never_vetoes() {
        let signal = VetoSignal::<()>::new();
        signal.connect(|_| Propagation::Prevent);
        signal.set_blocked(true);
        assert!(signal.emit(()));
    }

    #[test]
    fn test_propagation_from_bool() {
        assert_eq!(Propagation::from(true), Propagation::Continue);
        assert_eq!(Propagation::from(false), Propagation::Prevent);
        assert!(Propagation::Prevent.is_prevented());
    }
}
