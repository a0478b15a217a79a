//! Per-entity typed event dispatch

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::any::{Any, TypeId};

new_key_type! {
    /// Handle returned by [`Events::subscribe`]
    pub struct SubscriptionId;
}

type Handler = Box<dyn FnMut(&dyn Any)>;

struct Subscription {
    event: TypeId,
    handler: Handler,
}

/// Event dispatcher owned by a single entity
///
/// Handlers are keyed by the event type and invoked in subscription order.
///
/// # Example
///
/// ```rust
/// use ecl_core::ecs::Events;
///
/// struct Damaged(u32);
///
/// let mut events = Events::new();
/// events.subscribe(|hit: &Damaged| assert_eq!(hit.0, 5));
/// assert_eq!(events.emit(&Damaged(5)), 1);
/// ```
#[derive(Default)]
pub struct Events {
    subscriptions: SlotMap<SubscriptionId, Subscription>,
    by_event: FxHashMap<TypeId, SmallVec<[SubscriptionId; 4]>>,
}

impl std::fmt::Debug for Events {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Events")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl Events {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for events of type `E`
    pub fn subscribe<E: 'static>(
        &mut self,
        mut handler: impl FnMut(&E) + 'static,
    ) -> SubscriptionId {
        let event = TypeId::of::<E>();
        let id = self.subscriptions.insert(Subscription {
            event,
            handler: Box::new(move |any: &dyn Any| {
                if let Some(event) = any.downcast_ref::<E>() {
                    handler(event);
                }
            }),
        });
        self.by_event.entry(event).or_default().push(id);
        id
    }

    /// Remove a handler, returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(subscription) = self.subscriptions.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_event.get_mut(&subscription.event) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_event.remove(&subscription.event);
            }
        }
        true
    }

    /// Dispatch an event to every handler of its type
    ///
    /// Returns the number of handlers invoked.
    pub fn emit<E: 'static>(&mut self, event: &E) -> usize {
        let Some(ids) = self.by_event.get(&TypeId::of::<E>()) else {
            return 0;
        };
        let mut invoked = 0;
        for id in ids {
            if let Some(subscription) = self.subscriptions.get_mut(*id) {
                (subscription.handler)(event);
                invoked += 1;
            }
        }
        invoked
    }

    /// Number of handlers for events of type `E`
    pub fn listener_count<E: 'static>(&self) -> usize {
        self.by_event
            .get(&TypeId::of::<E>())
            .map_or(0, |ids| ids.len())
    }

    /// Check if there are no handlers at all
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Hit(u32);
    struct Healed;

    #[test]
    fn test_emit_reaches_matching_handlers_in_order() {
        let mut events = Events::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = log.clone();
        events.subscribe(move |hit: &Hit| first.borrow_mut().push(("first", hit.0)));
        let second = log.clone();
        events.subscribe(move |hit: &Hit| second.borrow_mut().push(("second", hit.0)));

        assert_eq!(events.emit(&Hit(7)), 2);
        assert_eq!(events.emit(&Healed), 0);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut events = Events::new();
        let id = events.subscribe(|_: &Hit| {});

        assert_eq!(events.listener_count::<Hit>(), 1);
        assert!(events.unsubscribe(id));
        assert!(!events.unsubscribe(id));
        assert_eq!(events.listener_count::<Hit>(), 0);
        assert_eq!(events.emit(&Hit(1)), 0);
        assert!(events.is_empty());
    }
}
