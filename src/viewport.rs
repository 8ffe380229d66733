//! Keep-in-view positioning for the busy message.
//!
//! When a tall blocked region is only partly on screen, a message centered in
//! the region can end up off screen. The tracker moves the message center
//! into the visible slice of the region, recomputing on every scroll event
//! while blocking and keep-in-view both hold.

use crate::geometry::{Bounds, ViewportOffset};
use crate::host::{BlockRefs, Host};
use crate::scroll::{ListenerId, ScrollBus};

/// New offset for the message, or `None` when `current` should stay.
///
/// `container` is the blocked region and `message_height` the height of the
/// message box, both measured against a viewport of `viewport_height` rows.
pub fn recompute_position(
    current: ViewportOffset,
    container: Bounds,
    message_height: f64,
    viewport_height: f64,
) -> Option<ViewportOffset> {
    if container.is_outside(viewport_height) {
        return None;
    }
    let next = if container.is_within(viewport_height) {
        ViewportOffset::Centered
    } else {
        let mut top = container.visible_extent(viewport_height).max(message_height) / 2.0;
        if container.top < 0.0 {
            // Never let the message slide past the bottom of the container.
            top = (top - container.top).min(container.height - message_height / 2.0);
        }
        ViewportOffset::Cells(top)
    };
    (next != current).then_some(next)
}

#[derive(Debug, Default)]
pub struct ViewportTracker {
    offset: ViewportOffset,
    listener: Option<ListenerId>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> ViewportOffset {
        self.offset
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Register for scroll events. A second call keeps the first
    /// registration.
    pub fn attach(&mut self, bus: &mut ScrollBus) -> ListenerId {
        if let Some(id) = self.listener {
            return id;
        }
        let id = bus.subscribe();
        tracing::debug!(listener = ?id, "attached scroll listener");
        self.listener = Some(id);
        id
    }

    pub fn detach(&mut self, bus: &mut ScrollBus) {
        if let Some(id) = self.listener.take() {
            bus.unsubscribe(id);
            tracing::debug!(listener = ?id, "detached scroll listener");
        }
    }

    /// Measure the container and message through `host` and update the
    /// offset. Returns whether the offset changed.
    pub fn recompute<H>(
        &mut self,
        host: &H,
        refs: &BlockRefs<H::Node>,
        blocking: bool,
        keep_in_view: bool,
    ) -> bool
    where
        H: Host + ?Sized,
    {
        if !blocking || !keep_in_view {
            return false;
        }
        let Some(container) = refs.container.and_then(|node| host.bounds(node)) else {
            return false;
        };
        let message_height = refs
            .message_container
            .and_then(|node| host.bounds(node))
            .map_or(0.0, |b| b.height);
        match recompute_position(
            self.offset,
            container,
            message_height,
            host.viewport_height(),
        ) {
            Some(next) => {
                tracing::debug!(from = %self.offset, to = %next, "moved busy message");
                self.offset = next;
                true
            }
            None => false,
        }
    }
}
