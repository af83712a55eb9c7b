//! Event dispatcher: per-kind persistent and one-shot handler sets.
//!
//! Emission snapshots the persistent handlers and takes the one-shot set
//! before invoking anything, so handlers may freely call back into the
//! dispatcher. Handlers registered during an emit fire from the next emit;
//! handlers removed during an emit still complete the current one.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use beyond_core::{EventKind, SocketEvent};
use parking_lot::Mutex;

/// A cloneable event callback compared by identity.
///
/// Two `EventHandler`s are equal when they share the same allocation, so a
/// clone of a handler can later be used to remove it.
#[derive(Clone)]
pub struct EventHandler(Arc<dyn Fn(&SocketEvent) + Send + Sync>);

impl EventHandler {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&SocketEvent) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, event: &SocketEvent) {
        (self.0)(event);
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EventHandler {}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventHandler")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl<F> From<F> for EventHandler
where
    F: Fn(&SocketEvent) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

#[derive(Default)]
struct Registry {
    persistent: HashMap<EventKind, Vec<EventHandler>>,
    once: HashMap<EventKind, Vec<EventHandler>>,
}

fn insert_unique(set: &mut Vec<EventHandler>, handler: EventHandler) {
    if !set.contains(&handler) {
        set.push(handler);
    }
}

fn remove_from(map: &mut HashMap<EventKind, Vec<EventHandler>>, kind: EventKind, handler: &EventHandler) {
    if let Some(set) = map.get_mut(&kind) {
        set.retain(|h| h != handler);
        if set.is_empty() {
            let _ = map.remove(&kind);
        }
    }
}

/// Registry of event handlers keyed by [`EventKind`].
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("EventDispatcher")
            .field("persistent_kinds", &registry.persistent.len())
            .field("once_kinds", &registry.once.len())
            .finish()
    }
}

impl EventDispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every emit of `kind` until unsubscribed.
    pub fn on(&self, kind: EventKind, handler: impl Into<EventHandler>) -> Subscription {
        let handler = handler.into();
        insert_unique(
            self.registry.lock().persistent.entry(kind).or_default(),
            handler.clone(),
        );
        Subscription {
            registry: Arc::downgrade(&self.registry),
            kind,
            handler,
        }
    }

    /// Register `handler` for the next emit of `kind` only.
    pub fn once(&self, kind: EventKind, handler: impl Into<EventHandler>) -> EventHandler {
        let handler = handler.into();
        insert_unique(
            self.registry.lock().once.entry(kind).or_default(),
            handler.clone(),
        );
        handler
    }

    /// Remove `handler` from both sets for `kind`. No-op if absent.
    pub fn off(&self, kind: EventKind, handler: &EventHandler) {
        let mut registry = self.registry.lock();
        remove_from(&mut registry.persistent, kind, handler);
        remove_from(&mut registry.once, kind, handler);
    }

    /// Invoke persistent handlers, then one-shot handlers, for `event`'s kind.
    ///
    /// A panicking handler unwinds through this call; see
    /// [`EventDispatcher::emit_with`] for isolation.
    pub fn emit(&self, event: &SocketEvent) {
        self.emit_with(event, |handler, event| handler.call(event));
    }

    /// Like [`EventDispatcher::emit`] but each invocation goes through `invoke`.
    pub fn emit_with(&self, event: &SocketEvent, mut invoke: impl FnMut(&EventHandler, &SocketEvent)) {
        let kind = event.kind();
        let (persistent, once) = {
            let mut registry = self.registry.lock();
            let persistent = registry.persistent.get(&kind).cloned().unwrap_or_default();
            let once = registry.once.remove(&kind).unwrap_or_default();
            (persistent, once)
        };
        for handler in persistent.iter().chain(once.iter()) {
            invoke(handler, event);
        }
    }

    /// Drop every subscription for every kind.
    pub fn clear(&self) {
        let mut registry = self.registry.lock();
        registry.persistent.clear();
        registry.once.clear();
    }

    /// Number of handlers (persistent plus one-shot) registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        let registry = self.registry.lock();
        registry.persistent.get(&kind).map_or(0, Vec::len) + registry.once.get(&kind).map_or(0, Vec::len)
    }
}

/// Handle returned by [`EventDispatcher::on`].
///
/// Dropping it leaves the handler registered; call
/// [`Subscription::unsubscribe`] to remove exactly this handler.
#[must_use = "dropping a Subscription keeps the handler registered"]
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    kind: EventKind,
    handler: EventHandler,
}

impl Subscription {
    /// Kind this subscription listens to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The registered handler, usable with `off`.
    #[must_use]
    pub fn handler(&self) -> &EventHandler {
        &self.handler
    }

    /// Remove this handler from the persistent set. Safe after `clear()` or
    /// after the dispatcher is gone.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            remove_from(&mut registry.lock().persistent, self.kind, &self.handler);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use beyond_core::protocol::UsernamePayload;
    use proptest::prelude::*;

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, EventHandler) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let handler = EventHandler::new(move |_| {
            let _ = c.fetch_add(1, Ordering::SeqCst);
        });
        (count, handler)
    }

    fn hits(count: &AtomicUsize) -> usize {
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn on_receives_every_emit() {
        let dispatcher = EventDispatcher::new();
        let (count, handler) = counter();
        let _sub = dispatcher.on(EventKind::Heartbeat, handler);
        dispatcher.emit(&SocketEvent::Heartbeat);
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 2);
    }

    #[test]
    fn emit_only_reaches_matching_kind() {
        let dispatcher = EventDispatcher::new();
        let (count, handler) = counter();
        let _sub = dispatcher.on(EventKind::User, handler);
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 0);
    }

    #[test]
    fn emit_without_subscribers_is_noop() {
        EventDispatcher::new().emit(&SocketEvent::Connected);
    }

    #[test]
    fn handler_sees_payload() {
        let dispatcher = EventDispatcher::new();
        let seen = Arc::new(Mutex::new(None));
        let s = Arc::clone(&seen);
        let _sub = dispatcher.on(EventKind::CheckUsername, move |event: &SocketEvent| {
            if let SocketEvent::CheckUsername(p) = event {
                *s.lock() = Some(p.username.clone());
            }
        });
        dispatcher.emit(&SocketEvent::CheckUsername(UsernamePayload::new("neo")));
        assert_eq!(seen.lock().as_deref(), Some("neo"));
    }

    #[test]
    fn duplicate_registration_is_idempotent() {
        let dispatcher = EventDispatcher::new();
        let (count, handler) = counter();
        let _a = dispatcher.on(EventKind::Heartbeat, handler.clone());
        let _b = dispatcher.on(EventKind::Heartbeat, handler);
        assert_eq!(dispatcher.listener_count(EventKind::Heartbeat), 1);
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 1);
    }

    #[test]
    fn unsubscribe_removes_exactly_that_handler() {
        let dispatcher = EventDispatcher::new();
        let (count_a, a) = counter();
        let (count_b, b) = counter();
        let sub_a = dispatcher.on(EventKind::Heartbeat, a);
        let _sub_b = dispatcher.on(EventKind::Heartbeat, b);
        sub_a.unsubscribe();
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count_a), 0);
        assert_eq!(hits(&count_b), 1);
    }

    #[test]
    fn once_fires_once_and_is_removed() {
        let dispatcher = EventDispatcher::new();
        let (count, handler) = counter();
        let _ = dispatcher.once(EventKind::Connected, handler);
        assert_eq!(dispatcher.listener_count(EventKind::Connected), 1);
        dispatcher.emit(&SocketEvent::Connected);
        assert_eq!(dispatcher.listener_count(EventKind::Connected), 0);
        dispatcher.emit(&SocketEvent::Connected);
        assert_eq!(hits(&count), 1);
    }

    #[test]
    fn off_removes_from_both_sets() {
        let dispatcher = EventDispatcher::new();
        let (count, handler) = counter();
        let _sub = dispatcher.on(EventKind::Heartbeat, handler.clone());
        let _ = dispatcher.once(EventKind::Heartbeat, handler.clone());
        dispatcher.off(EventKind::Heartbeat, &handler);
        dispatcher.off(EventKind::Heartbeat, &handler);
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let dispatcher = EventDispatcher::new();
        let (count, handler) = counter();
        let sub = dispatcher.on(EventKind::Heartbeat, handler.clone());
        let _ = dispatcher.once(EventKind::User, handler);
        dispatcher.clear();
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 0);
        assert_eq!(dispatcher.listener_count(EventKind::User), 0);
        sub.unsubscribe();
    }

    #[test]
    fn handler_added_during_emit_fires_next_time() {
        let dispatcher = EventDispatcher::new();
        let (count, late) = counter();
        let d = dispatcher.clone();
        let _ = dispatcher.once(EventKind::Heartbeat, move |_: &SocketEvent| {
            let _ = d.on(EventKind::Heartbeat, late.clone());
        });
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 0);
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 1);
    }

    #[test]
    fn handler_removed_during_emit_still_completes_current() {
        let dispatcher = EventDispatcher::new();
        let (count, victim) = counter();
        let d = dispatcher.clone();
        let v = victim.clone();
        let _remover = dispatcher.on(EventKind::Heartbeat, move |_: &SocketEvent| {
            d.off(EventKind::Heartbeat, &v);
        });
        let _victim = dispatcher.on(EventKind::Heartbeat, victim);
        dispatcher.emit(&SocketEvent::Heartbeat);
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 1);
    }

    #[test]
    fn once_reregistering_itself_does_not_double_fire() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<EventHandler>>> = Arc::new(Mutex::new(None));
        let (d, c, s) = (dispatcher.clone(), Arc::clone(&count), Arc::clone(&slot));
        let handler = EventHandler::new(move |_| {
            let _ = c.fetch_add(1, Ordering::SeqCst);
            if let Some(me) = s.lock().clone() {
                let _ = d.once(EventKind::Heartbeat, me);
            }
        });
        *slot.lock() = Some(handler.clone());
        let _ = dispatcher.once(EventKind::Heartbeat, handler);
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 1);
        *slot.lock() = None;
        dispatcher.emit(&SocketEvent::Heartbeat);
        assert_eq!(hits(&count), 2);
    }

    #[test]
    fn emit_with_wraps_each_invocation() {
        let dispatcher = EventDispatcher::new();
        let (_, a) = counter();
        let (_, b) = counter();
        let _a = dispatcher.on(EventKind::Heartbeat, a);
        let _ = dispatcher.once(EventKind::Heartbeat, b);
        let mut calls = 0;
        dispatcher.emit_with(&SocketEvent::Heartbeat, |_, _| calls += 1);
        assert_eq!(calls, 2);
    }

    #[test]
    fn unsubscribe_after_dispatcher_dropped_is_harmless() {
        let dispatcher = EventDispatcher::new();
        let (_, handler) = counter();
        let sub = dispatcher.on(EventKind::Heartbeat, handler);
        drop(dispatcher);
        sub.unsubscribe();
    }

    #[derive(Clone, Debug)]
    enum Op {
        On(usize),
        Once(usize),
        Off(usize),
        Emit,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..4usize).prop_map(Op::On),
            (0..4usize).prop_map(Op::Once),
            (0..4usize).prop_map(Op::Off),
            Just(Op::Emit),
        ]
    }

    proptest! {
        #[test]
        fn once_fires_at_most_once_per_registration(ops in proptest::collection::vec(op(), 1..40)) {
            let dispatcher = EventDispatcher::new();
            let pool: Vec<(Arc<AtomicUsize>, EventHandler)> = (0..4).map(|_| counter()).collect();
            let mut persistent = [false; 4];
            let mut pending_once = [false; 4];
            let mut expected = [0usize; 4];

            for op in ops {
                match op {
                    Op::On(i) => {
                        let _ = dispatcher.on(EventKind::Heartbeat, pool[i].1.clone());
                        persistent[i] = true;
                    }
                    Op::Once(i) => {
                        let _ = dispatcher.once(EventKind::Heartbeat, pool[i].1.clone());
                        pending_once[i] = true;
                    }
                    Op::Off(i) => {
                        dispatcher.off(EventKind::Heartbeat, &pool[i].1);
                        persistent[i] = false;
                        pending_once[i] = false;
                    }
                    Op::Emit => {
                        dispatcher.emit(&SocketEvent::Heartbeat);
                        for i in 0..4 {
                            expected[i] += usize::from(persistent[i]) + usize::from(pending_once[i]);
                            pending_once[i] = false;
                        }
                        prop_assert_eq!(
                            dispatcher.listener_count(EventKind::Heartbeat),
                            persistent.iter().filter(|p| **p).count()
                        );
                    }
                }
            }
            for i in 0..4 {
                prop_assert_eq!(hits(&pool[i].0), expected[i]);
            }
        }

        #[test]
        fn off_unregistered_never_affects_others(registered in 0..4usize, stranger in 0..4usize) {
            prop_assume!(registered != stranger);
            let dispatcher = EventDispatcher::new();
            let pool: Vec<(Arc<AtomicUsize>, EventHandler)> = (0..4).map(|_| counter()).collect();
            let _sub = dispatcher.on(EventKind::User, pool[registered].1.clone());
            dispatcher.off(EventKind::User, &pool[stranger].1);
            dispatcher.emit(&SocketEvent::User(beyond_core::BeyondUser::default()));
            prop_assert_eq!(hits(&pool[registered].0), 1);
            prop_assert_eq!(hits(&pool[stranger].0), 0);
        }
    }
}
