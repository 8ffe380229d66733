//! The blocking controller.
//!
//! `BlockUi` owns the focus trap, the viewport tracker, and the next-tick
//! queue for one blocked region. The owner pushes props through `update`;
//! every call compares the previous and current props so each blocking
//! transition fires exactly once.
//!
//! Per tick, the event loop is expected to:
//! 1. route key events on the trap markers to the `tabbed_*` handlers,
//! 2. call `handle_scroll` for every scroll event the bus dispatches to this
//!    controller's listener,
//! 3. call `run_deferred` once the event has finished dispatching.

use std::fmt::Debug;

use crossterm::event::KeyEvent;

use crate::config::BlockProps;
use crate::focus_trap::{FocusTrap, TabOutcome};
use crate::geometry::ViewportOffset;
use crate::host::{BlockRefs, Boundary, Host, KeyPhase, TabKey};
use crate::scheduler::{Deferred, TaskQueue};
use crate::scroll::{ListenerId, ScrollBus};
use crate::viewport::ViewportTracker;

#[derive(Debug)]
pub struct BlockUi<N> {
    props: BlockProps,
    refs: BlockRefs<N>,
    trap: FocusTrap<N>,
    tracker: ViewportTracker,
    queue: TaskQueue<N>,
}

impl<N: Copy + Eq + Debug> BlockUi<N> {
    pub fn new(props: BlockProps) -> Self {
        Self {
            props,
            refs: BlockRefs::default(),
            trap: FocusTrap::new(),
            tracker: ViewportTracker::new(),
            queue: TaskQueue::new(),
        }
    }

    pub fn props(&self) -> &BlockProps {
        &self.props
    }

    pub fn blocking(&self) -> bool {
        self.props.blocking
    }

    pub fn refs(&self) -> &BlockRefs<N> {
        &self.refs
    }

    /// Handles for the render layer to populate.
    pub fn refs_mut(&mut self) -> &mut BlockRefs<N> {
        &mut self.refs
    }

    pub fn anchor(&self) -> Option<N> {
        self.trap.anchor()
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.tracker.listener()
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Apply new props. Returns whether the message offset changed.
    pub fn update<H>(&mut self, props: BlockProps, host: &mut H, bus: &mut ScrollBus) -> bool
    where
        H: Host<Node = N> + ?Sized,
    {
        let prev = std::mem::replace(&mut self.props, props);
        if prev.blocking != self.props.blocking {
            if self.props.blocking {
                tracing::debug!("blocking started");
                self.trap.on_blocking_started(&*host, &self.refs, &mut self.queue);
            } else {
                tracing::debug!("blocking ended");
                self.tracker.detach(bus);
                self.trap.on_blocking_ended(host, &self.refs);
            }
        }
        if self.props.blocking && self.props.keep_in_view {
            self.tracker.attach(bus);
            return self.tracker.recompute(&*host, &self.refs, true, true);
        }
        false
    }

    /// Scroll listener body. Returns whether the message offset changed.
    pub fn handle_scroll<H>(&mut self, host: &H) -> bool
    where
        H: Host<Node = N> + ?Sized,
    {
        self.tracker
            .recompute(host, &self.refs, self.props.blocking, self.props.keep_in_view)
    }

    /// Run tasks deferred to the next tick.
    pub fn run_deferred<H>(&mut self, host: &mut H)
    where
        H: Host<Node = N> + ?Sized,
    {
        for task in self.queue.drain() {
            match task {
                Deferred::Blur(captured) => {
                    let blurred = self.trap.run_deferred_blur(host, captured);
                    tracing::trace!(anchor = ?captured, blurred, "ran deferred blur");
                }
            }
        }
    }

    pub fn unmount(&mut self, bus: &mut ScrollBus) {
        self.tracker.detach(bus);
    }

    /// Offset the render layer applies to the message container. `None`
    /// unless blocking with keep-in-view.
    pub fn message_top(&self) -> Option<ViewportOffset> {
        (self.props.blocking && self.props.keep_in_view).then_some(self.tracker.offset())
    }

    pub fn handle_boundary_tab<H>(
        &mut self,
        boundary: Boundary,
        phase: KeyPhase,
        key: &KeyEvent,
        host: &mut H,
    ) -> TabOutcome<N>
    where
        H: Host<Node = N> + ?Sized,
    {
        self.trap.handle_boundary_tab(
            boundary,
            phase,
            TabKey::from_key_event(key),
            self.props.blocking,
            host,
            &self.refs,
        )
    }

    pub fn tabbed_up_top<H>(&mut self, key: &KeyEvent, host: &mut H) -> TabOutcome<N>
    where
        H: Host<Node = N> + ?Sized,
    {
        self.handle_boundary_tab(Boundary::Top, KeyPhase::Up, key, host)
    }

    pub fn tabbed_down_top<H>(&mut self, key: &KeyEvent, host: &mut H) -> TabOutcome<N>
    where
        H: Host<Node = N> + ?Sized,
    {
        self.handle_boundary_tab(Boundary::Top, KeyPhase::Down, key, host)
    }

    pub fn tabbed_up_bottom<H>(&mut self, key: &KeyEvent, host: &mut H) -> TabOutcome<N>
    where
        H: Host<Node = N> + ?Sized,
    {
        self.handle_boundary_tab(Boundary::Bottom, KeyPhase::Up, key, host)
    }

    pub fn tabbed_down_bottom<H>(&mut self, key: &KeyEvent, host: &mut H) -> TabOutcome<N>
    where
        H: Host<Node = N> + ?Sized,
    {
        self.handle_boundary_tab(Boundary::Bottom, KeyPhase::Down, key, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};
    use crossterm::event::{KeyCode, KeyModifiers};

    struct Page {
        doc: Document,
        bus: ScrollBus,
        ui: BlockUi<NodeId>,
        inner: NodeId,
        outside: NodeId,
    }

    /// Region of 30 rows starting at row 5 on a 10-row viewport.
    fn page() -> Page {
        let mut doc = Document::new(10.0);
        let body = doc.body();
        let outside = doc.create_element(body, true).unwrap();
        let root = doc.create_element(body, false).unwrap();
        doc.set_layout(root, 5.0, 30.0).unwrap();
        let top_focus = doc.create_element(root, true).unwrap();
        let inner = doc.create_element(root, true).unwrap();
        let blocker = doc.create_element(root, true).unwrap();
        let container = doc.create_element(blocker, false).unwrap();
        doc.set_layout(container, 5.0, 30.0).unwrap();
        let message = doc.create_element(blocker, false).unwrap();
        doc.set_layout(message, 0.0, 4.0).unwrap();
        let helper = doc.create_element(root, false).unwrap();
        let mut ui = BlockUi::new(BlockProps::default());
        *ui.refs_mut() = BlockRefs {
            top_focus: Some(top_focus),
            blocker: Some(blocker),
            container: Some(container),
            message_container: Some(message),
            helper: Some(helper),
        };
        Page {
            doc,
            bus: ScrollBus::new(),
            ui,
            inner,
            outside,
        }
    }

    fn set(p: &mut Page, props: BlockProps) -> bool {
        p.ui.update(props, &mut p.doc, &mut p.bus)
    }

    #[test]
    fn focus_round_trip_through_blocking() {
        let mut p = page();
        p.doc.focus(p.inner);
        set(&mut p, BlockProps::default().blocking(true));
        assert_eq!(p.ui.anchor(), Some(p.inner));
        assert!(p.ui.has_pending_tasks());
        p.ui.run_deferred(&mut p.doc);
        assert_eq!(p.doc.focused(), None);
        set(&mut p, BlockProps::default());
        assert_eq!(p.doc.focused(), Some(p.inner));
        assert_eq!(p.ui.anchor(), None);
    }

    #[test]
    fn repeated_blocking_update_is_noop() {
        let mut p = page();
        p.doc.focus(p.inner);
        set(&mut p, BlockProps::default().blocking(true));
        p.ui.run_deferred(&mut p.doc);
        p.doc.focus(p.outside);
        set(&mut p, BlockProps::default().blocking(true));
        assert_eq!(p.ui.anchor(), Some(p.inner));
        assert!(!p.ui.has_pending_tasks());
    }

    #[test]
    fn keep_in_view_attaches_once_and_detaches_on_end() {
        let mut p = page();
        let props = BlockProps::default().blocking(true).keep_in_view(true);
        set(&mut p, props.clone());
        set(&mut p, props.clone());
        assert_eq!(p.bus.listener_count(), 1);
        assert!(p.ui.listener().is_some());
        set(&mut p, props.blocking(false));
        assert_eq!(p.bus.listener_count(), 0);
        assert_eq!(p.ui.message_top(), None);
    }

    #[test]
    fn scroll_moves_message_into_view() {
        let mut p = page();
        set(&mut p, BlockProps::default().blocking(true).keep_in_view(true));
        // container rows 5..35 on a 10-row viewport: visible 5 rows from row 5
        assert_eq!(p.ui.message_top(), Some(ViewportOffset::Cells(2.5)));
        p.doc.scroll_to(15.0);
        assert!(p.ui.handle_scroll(&p.doc));
        // top = -10, visible 10 rows: 5 + 10
        assert_eq!(p.ui.message_top(), Some(ViewportOffset::Cells(15.0)));
        assert!(!p.ui.handle_scroll(&p.doc));
    }

    #[test]
    fn message_top_hidden_without_keep_in_view() {
        let mut p = page();
        set(&mut p, BlockProps::default().blocking(true));
        assert_eq!(p.ui.message_top(), None);
        assert!(p.ui.listener().is_none());
        assert!(!p.ui.handle_scroll(&p.doc));
    }

    #[test]
    fn unmount_releases_listener() {
        let mut p = page();
        set(&mut p, BlockProps::default().blocking(true).keep_in_view(true));
        p.ui.unmount(&mut p.bus);
        assert_eq!(p.bus.listener_count(), 0);
    }

    #[test]
    fn tab_handlers_follow_blocking_flag() {
        let mut p = page();
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(p.ui.tabbed_down_top(&tab, &mut p.doc), TabOutcome::Ignored);
        set(&mut p, BlockProps::default().blocking(true));
        let blocker = p.ui.refs().blocker.unwrap();
        let top = p.ui.refs().top_focus.unwrap();
        assert!(p.ui.tabbed_down_top(&tab, &mut p.doc).prevents_default());
        assert_eq!(p.doc.focused(), Some(blocker));
        assert_eq!(
            p.ui.tabbed_up_bottom(&back_tab, &mut p.doc),
            TabOutcome::Redirected {
                target: top,
                prevent_default: false
            }
        );
        assert_eq!(p.ui.tabbed_up_top(&back_tab, &mut p.doc), TabOutcome::Ignored);
        assert_eq!(p.ui.tabbed_down_bottom(&tab, &mut p.doc), TabOutcome::Ignored);
    }
}
