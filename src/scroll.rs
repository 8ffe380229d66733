//! Global scroll-event source.
//!
//! The page owns one `ScrollBus`. Controllers that need to react to scrolling
//! register a listener and get back a `ListenerId`; the event loop asks the
//! bus which listeners to notify whenever the page scrolls.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Default)]
pub struct ScrollBus {
    next_id: u64,
    listeners: BTreeSet<ListenerId>,
}

impl ScrollBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.insert(id);
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id)
    }

    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.listeners.contains(&id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners to notify for one scroll event, in registration order.
    pub fn dispatch(&self) -> Vec<ListenerId> {
        self.listeners.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_and_unsubscribe() {
        let mut bus = ScrollBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        assert_ne!(a, b);
        assert_eq!(bus.dispatch(), vec![a, b]);
        assert!(bus.unsubscribe(a));
        assert!(!bus.unsubscribe(a));
        assert!(!bus.is_subscribed(a));
        assert_eq!(bus.listener_count(), 1);
    }
}
