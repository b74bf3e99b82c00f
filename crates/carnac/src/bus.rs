//! Notification bus: subscriber registry, synchronous dispatch and the batch
//! stack.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dispatch iterates a snapshot of the registry, so subscribing or
//!    unsubscribing from inside a callback takes effect from the next event.
//! 3. While a batch is active, events are appended to the innermost
//!    collector instead of being dispatched.
//! 4. A panicking subscriber unwinds through `notify`; the remaining
//!    subscribers are not called.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use carnac_value::Object;

use crate::events::StoreEvent;

type Subscriber = Rc<dyn Fn(&StoreEvent, &Object)>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: BTreeMap<u64, Subscriber>,
}

/// Shared handle to a bus's subscriber list.
///
/// Callbacks that need to subscribe further listeners can capture a clone.
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    inner: Rc<RefCell<Subscribers>>,
}

impl SubscriberRegistry {
    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&StoreEvent, &Object) + 'static,
    {
        let mut subs = self.inner.borrow_mut();
        let id = subs.next_id;
        subs.next_id = subs.next_id.saturating_add(1);
        subs.entries.insert(id, Rc::new(callback));
        Unsubscribe {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Subscriber> {
        self.inner.borrow().entries.values().cloned().collect()
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("len", &self.len())
            .finish()
    }
}

/// Removes exactly one subscription. Calling it again does nothing.
///
/// Dropping the handle keeps the subscription alive.
#[derive(Debug, Clone)]
pub struct Unsubscribe {
    registry: Weak<RefCell<Subscribers>>,
    id: u64,
}

impl Unsubscribe {
    /// Returns true if the subscription was still registered.
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|subs| subs.borrow_mut().entries.remove(&self.id).is_some())
    }
}

/// Subscriber registry plus a stack of batch collectors.
#[derive(Debug, Default)]
pub struct NotificationBus {
    registry: SubscriberRegistry,
    batch_stack: Vec<Vec<StoreEvent>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&StoreEvent, &Object) + 'static,
    {
        self.registry.subscribe(callback)
    }

    pub fn registry(&self) -> SubscriberRegistry {
        self.registry.clone()
    }

    /// Number of open batch scopes.
    pub fn batch_depth(&self) -> usize {
        self.batch_stack.len()
    }

    /// Collects `event` into the active batch, or dispatches it to every
    /// subscriber together with `state`.
    pub fn notify(&mut self, event: StoreEvent, state: &Object) {
        let depth = self.batch_stack.len();
        if let Some(collector) = self.batch_stack.last_mut() {
            tracing::trace!(kind = event.kind(), depth, "event collected");
            collector.push(event);
            return;
        }
        let subscribers = self.registry.snapshot();
        tracing::trace!(kind = event.kind(), subscribers = subscribers.len(), "dispatching event");
        for subscriber in subscribers {
            subscriber(&event, state);
        }
    }

    /// Opens a batch scope.
    pub fn push_collector(&mut self) {
        self.batch_stack.push(Vec::new());
        tracing::trace!(depth = self.batch_stack.len(), "batch opened");
    }

    /// Closes the innermost batch scope and returns what it collected.
    ///
    /// Returns `None`, with a warning, if no batch is active.
    pub fn pop_collector(&mut self) -> Option<Vec<StoreEvent>> {
        let events = self.batch_stack.pop();
        match &events {
            Some(events) => {
                tracing::trace!(depth = self.batch_stack.len(), events = events.len(), "batch closed")
            }
            None => tracing::warn!("finished a batch with no active batch"),
        }
        events
    }
}
