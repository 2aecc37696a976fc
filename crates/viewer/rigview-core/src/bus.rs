//! Synchronous typed publish/subscribe bus.
//!
//! The bus is the sole coupling mechanism between UI components and the
//! viewer core. Delivery is synchronous and in registration order, so an
//! animation-completion reaction can start the next timeline step within the
//! same tick. Dispatch takes a snapshot of the current subscriber list before
//! invoking anything, which makes re-entrant dispatch/subscribe/unsubscribe
//! from inside a handler safe: handlers registered during a dispatch do not
//! see that dispatch, and a handler disposed mid-dispatch still receives the
//! event it was registered for when the snapshot was taken.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;

use rigview_api_core::{Event, EventKind};

/// A registered bus callback. `Rc` identity doubles as the removal key for
/// [`EventBus::unsubscribe`].
pub type Callback = Rc<dyn Fn(&Event)>;

struct Entry {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct BusInner {
    subscribers: HashMap<EventKind, Vec<Entry>>,
    next_id: u64,
}

/// Cheaply cloneable handle to one bus instance. Single-threaded by design;
/// there is no concurrent dispatcher in the core.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `kind`. The returned [`Subscription`] removes
    /// exactly this registration when disposed.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&Event) + 'static,
    {
        self.subscribe_callback(kind, Rc::new(callback))
    }

    /// Like [`EventBus::subscribe`], for callers that keep the `Rc` callback
    /// around to unsubscribe by identity later.
    pub fn subscribe_callback(&self, kind: EventKind, callback: Callback) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .subscribers
            .entry(kind)
            .or_default()
            .push(Entry { id, callback });
        Subscription {
            bus: Rc::downgrade(&self.inner),
            kind,
            id: Some(id),
        }
    }

    /// Remove a previously-registered callback by identity. Removing a
    /// callback that is not registered is a no-op.
    pub fn unsubscribe(&self, kind: EventKind, callback: &Callback) {
        let mut inner = self.inner.borrow_mut();
        if let Some(entries) = inner.subscribers.get_mut(&kind) {
            entries.retain(|entry| !Rc::ptr_eq(&entry.callback, callback));
        }
    }

    /// Synchronously invoke every current subscriber of the event's kind, in
    /// registration order. Zero subscribers is fine.
    pub fn dispatch(&self, event: &Event) {
        let snapshot: Vec<Callback> = {
            let inner = self.inner.borrow();
            match inner.subscribers.get(&event.kind()) {
                Some(entries) => entries.iter().map(|e| e.callback.clone()).collect(),
                None => Vec::new(),
            }
        };
        for callback in snapshot {
            callback(event);
        }
    }

    /// Number of live registrations for a kind.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .subscribers
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

/// Disposer for one bus registration. Disposing twice is a no-op.
pub struct Subscription {
    bus: Weak<RefCell<BusInner>>,
    kind: EventKind,
    id: Option<u64>,
}

impl Subscription {
    /// Remove exactly this registration; other subscriptions on the same
    /// kind are unaffected.
    pub fn dispose(&mut self) {
        let Some(id) = self.id.take() else { return };
        if let Some(bus) = self.bus.upgrade() {
            let mut inner = bus.borrow_mut();
            if let Some(entries) = inner.subscribers.get_mut(&self.kind) {
                entries.retain(|entry| entry.id != id);
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.id.is_none()
    }
}

/// Uniform collection of subscriptions, disposed in bulk on teardown. The
/// lifecycle manager registers every handler through one of these so that
/// Live→Disposed removes exactly what Initializing added.
#[derive(Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn dispose_all(&mut self) {
        for subscription in &mut self.subscriptions {
            subscription.dispose();
        }
        self.subscriptions.clear();
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn ping() -> Event {
        Event::RigEvent {
            name: "ping".into(),
        }
    }

    #[test]
    fn dispatch_invokes_in_registration_order() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let _subs: Vec<Subscription> = ["first", "second", "third"]
            .into_iter()
            .map(|tag| {
                let seen = seen.clone();
                bus.subscribe(EventKind::RigEvent, move |_| seen.borrow_mut().push(tag))
            })
            .collect();

        bus.dispatch(&ping());
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn dispatch_with_no_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.dispatch(&Event::DestroyApp);
    }

    #[test]
    fn dispose_removes_only_that_registration() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut first = {
            let seen = seen.clone();
            bus.subscribe(EventKind::RigEvent, move |_| seen.borrow_mut().push("a"))
        };
        let _second = {
            let seen = seen.clone();
            bus.subscribe(EventKind::RigEvent, move |_| seen.borrow_mut().push("b"))
        };

        first.dispose();
        bus.dispatch(&ping());
        assert_eq!(*seen.borrow(), vec!["b"]);
        assert_eq!(bus.subscriber_count(EventKind::RigEvent), 1);
    }

    #[test]
    fn dispose_is_idempotent() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe(EventKind::SetupPose, |_| {});
        sub.dispose();
        sub.dispose();
        assert!(sub.is_disposed());
        assert_eq!(bus.subscriber_count(EventKind::SetupPose), 0);
    }

    #[test]
    fn unsubscribe_by_callback_identity() {
        let bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let callback: Callback = {
            let hits = hits.clone();
            Rc::new(move |_| *hits.borrow_mut() += 1)
        };
        let _sub = bus.subscribe_callback(EventKind::RigEvent, callback.clone());

        bus.dispatch(&ping());
        bus.unsubscribe(EventKind::RigEvent, &callback);
        bus.dispatch(&ping());
        assert_eq!(*hits.borrow(), 1);

        // absent callback: no-op
        bus.unsubscribe(EventKind::RigEvent, &callback);
    }

    #[test]
    fn reentrant_dispatch_from_handler() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner_seen = seen.clone();
        let _marker = bus.subscribe(EventKind::RigEvent, move |event| {
            if let Event::RigEvent { name } = event {
                inner_seen.borrow_mut().push(name.clone());
            }
        });

        let chain_bus = bus.clone();
        let _chain = bus.subscribe(EventKind::SetupPose, move |_| {
            chain_bus.dispatch(&Event::RigEvent {
                name: "from-handler".into(),
            });
        });

        bus.dispatch(&Event::SetupPose);
        assert_eq!(*seen.borrow(), vec!["from-handler"]);
    }

    #[test]
    fn subscriber_added_during_dispatch_misses_current_event() {
        let bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let add_bus = bus.clone();
        let add_hits = hits.clone();
        let added = Rc::new(RefCell::new(Vec::new()));
        let added_store = added.clone();
        let _adder = bus.subscribe(EventKind::RigEvent, move |_| {
            let hits = add_hits.clone();
            let sub = add_bus.subscribe(EventKind::RigEvent, move |_| *hits.borrow_mut() += 1);
            added_store.borrow_mut().push(sub);
        });

        bus.dispatch(&ping());
        assert_eq!(*hits.borrow(), 0);
        bus.dispatch(&ping());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn subscription_set_bulk_dispose() {
        let bus = EventBus::new();
        let mut set = SubscriptionSet::new();
        set.push(bus.subscribe(EventKind::SetSkin, |_| {}));
        set.push(bus.subscribe(EventKind::SetBlend, |_| {}));
        assert_eq!(set.len(), 2);

        set.dispose_all();
        assert!(set.is_empty());
        assert_eq!(bus.subscriber_count(EventKind::SetSkin), 0);
        assert_eq!(bus.subscriber_count(EventKind::SetBlend), 0);
    }
}
