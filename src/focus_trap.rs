//! Focus trap for the blocked region.
//!
//! While blocking, the region is bracketed in tab order by two markers: the
//! top sentinel and the blocker container. Tab on the top marker jumps to the
//! blocker, Shift+Tab on the blocker jumps back to the top marker, so keyboard
//! focus cycles between the two and never reaches the content underneath.
//!
//! The trap also remembers which element inside the region had focus when
//! blocking started (the anchor), blurs it on the next tick, and hands focus
//! back once blocking ends.

use crate::host::{BlockRefs, Boundary, Host, KeyPhase, TabKey};
use crate::scheduler::{Deferred, TaskQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabOutcome<N> {
    Ignored,
    /// Focus was moved to `target`. When `prevent_default` is set the caller
    /// must not run the native tab navigation for this key.
    Redirected { target: N, prevent_default: bool },
}

impl<N> TabOutcome<N> {
    pub fn prevents_default(&self) -> bool {
        matches!(
            self,
            TabOutcome::Redirected {
                prevent_default: true,
                ..
            }
        )
    }
}

#[derive(Debug)]
pub struct FocusTrap<N> {
    anchor: Option<N>,
}

impl<N> Default for FocusTrap<N> {
    fn default() -> Self {
        Self { anchor: None }
    }
}

impl<N: Copy + Eq + std::fmt::Debug> FocusTrap<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element that will receive focus back when blocking ends.
    pub fn anchor(&self) -> Option<N> {
        self.anchor
    }

    pub fn on_blocking_started<H>(
        &mut self,
        host: &H,
        refs: &BlockRefs<N>,
        queue: &mut TaskQueue<N>,
    ) where
        H: Host<Node = N> + ?Sized,
    {
        let Some(active) = host.active_element() else {
            return;
        };
        let Some(root) = refs.helper.and_then(|helper| host.parent(helper)) else {
            return;
        };
        match host.contains(root, active) {
            Some(true) => {
                tracing::debug!(anchor = ?active, "captured focus anchor");
                self.anchor = Some(active);
                if !host.is_body(active) {
                    queue.defer(Deferred::Blur(active));
                }
            }
            Some(false) => {}
            None => tracing::debug!("containment query unsupported; skipping anchor capture"),
        }
    }

    /// Deferred half of `on_blocking_started`. Only blurs `captured` if it is
    /// still the live anchor.
    pub fn run_deferred_blur<H>(&self, host: &mut H, captured: N) -> bool
    where
        H: Host<Node = N> + ?Sized,
    {
        if self.anchor != Some(captured) || !host.can_blur(captured) {
            return false;
        }
        host.blur(captured)
    }

    /// Restore focus to the anchor when nothing else picked it up during the
    /// blocked interval. The anchor never outlives the blocking session.
    pub fn on_blocking_ended<H>(&mut self, host: &mut H, refs: &BlockRefs<N>) -> bool
    where
        H: Host<Node = N> + ?Sized,
    {
        let Some(anchor) = self.anchor.take() else {
            return false;
        };
        let restorable = match host.active_element() {
            None => true,
            Some(active) => host.is_body(active) || refs.top_focus == Some(active),
        };
        if !restorable || !host.can_focus(anchor) {
            tracing::debug!(anchor = ?anchor, restorable, "dropped focus anchor");
            return false;
        }
        let restored = host.focus(anchor);
        tracing::debug!(anchor = ?anchor, restored, "restored focus");
        restored
    }

    /// Tab handling for both trap markers and both key phases.
    pub fn handle_boundary_tab<H>(
        &self,
        boundary: Boundary,
        phase: KeyPhase,
        key: Option<TabKey>,
        blocking: bool,
        host: &mut H,
        refs: &BlockRefs<N>,
    ) -> TabOutcome<N>
    where
        H: Host<Node = N> + ?Sized,
    {
        let trapped = blocking && key.is_some_and(|k| k.shift == boundary.escaping_shift());
        if !trapped {
            return TabOutcome::Ignored;
        }
        let target = match boundary {
            Boundary::Top => refs.blocker,
            Boundary::Bottom => refs.top_focus,
        };
        let Some(target) = target else {
            return TabOutcome::Ignored;
        };
        host.focus(target);
        tracing::debug!(?boundary, ?phase, target = ?target, "redirected tab");
        TabOutcome::Redirected {
            target,
            prevent_default: phase == KeyPhase::Down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};

    struct Fixture {
        doc: Document,
        refs: BlockRefs<NodeId>,
        outside: NodeId,
        inner: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new(20.0);
        let body = doc.body();
        let outside = doc.create_element(body, true).unwrap();
        let root = doc.create_element(body, false).unwrap();
        let top_focus = doc.create_element(root, true).unwrap();
        let inner = doc.create_element(root, true).unwrap();
        let blocker = doc.create_element(root, true).unwrap();
        let helper = doc.create_element(root, false).unwrap();
        let refs = BlockRefs {
            top_focus: Some(top_focus),
            blocker: Some(blocker),
            container: None,
            message_container: None,
            helper: Some(helper),
        };
        Fixture {
            doc,
            refs,
            outside,
            inner,
        }
    }

    #[test]
    fn captures_and_defers_blur_for_focus_inside_region() {
        let mut f = fixture();
        let mut trap = FocusTrap::new();
        let mut queue = TaskQueue::new();
        f.doc.focus(f.inner);
        trap.on_blocking_started(&f.doc, &f.refs, &mut queue);
        assert_eq!(trap.anchor(), Some(f.inner));
        // blur is deferred, focus untouched until the queue runs
        assert_eq!(f.doc.focused(), Some(f.inner));
        assert_eq!(queue.drain(), vec![Deferred::Blur(f.inner)]);
        assert!(trap.run_deferred_blur(&mut f.doc, f.inner));
        assert_eq!(f.doc.focused(), None);
    }

    #[test]
    fn ignores_focus_outside_region_and_body() {
        let mut f = fixture();
        let mut trap = FocusTrap::new();
        let mut queue = TaskQueue::new();
        trap.on_blocking_started(&f.doc, &f.refs, &mut queue);
        assert_eq!(trap.anchor(), None);
        f.doc.focus(f.outside);
        trap.on_blocking_started(&f.doc, &f.refs, &mut queue);
        assert_eq!(trap.anchor(), None);
        assert!(queue.is_empty());
        assert!(!trap.on_blocking_ended(&mut f.doc, &f.refs));
        assert_eq!(f.doc.focused(), Some(f.outside));
    }

    #[test]
    fn unsupported_containment_skips_capture() {
        let mut f = fixture();
        f.doc.set_containment_supported(false);
        let mut trap = FocusTrap::new();
        let mut queue = TaskQueue::new();
        f.doc.focus(f.inner);
        trap.on_blocking_started(&f.doc, &f.refs, &mut queue);
        assert_eq!(trap.anchor(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn stale_deferred_blur_is_noop() {
        let mut f = fixture();
        let mut trap = FocusTrap::new();
        let mut queue = TaskQueue::new();
        f.doc.focus(f.inner);
        trap.on_blocking_started(&f.doc, &f.refs, &mut queue);
        // blocking ends before the tick runs; focus is still on the anchor
        assert!(!trap.on_blocking_ended(&mut f.doc, &f.refs));
        assert_eq!(trap.anchor(), None);
        assert!(!trap.run_deferred_blur(&mut f.doc, f.inner));
        assert_eq!(f.doc.focused(), Some(f.inner));
    }

    #[test]
    fn restores_when_focus_rests_on_top_marker() {
        let mut f = fixture();
        let mut trap = FocusTrap::new();
        let mut queue = TaskQueue::new();
        f.doc.focus(f.inner);
        trap.on_blocking_started(&f.doc, &f.refs, &mut queue);
        f.doc.focus(f.refs.top_focus.unwrap());
        assert!(trap.on_blocking_ended(&mut f.doc, &f.refs));
        assert_eq!(f.doc.focused(), Some(f.inner));
    }

    #[test]
    fn does_not_steal_focus_moved_elsewhere() {
        let mut f = fixture();
        let mut trap = FocusTrap::new();
        let mut queue = TaskQueue::new();
        f.doc.focus(f.inner);
        trap.on_blocking_started(&f.doc, &f.refs, &mut queue);
        f.doc.focus(f.outside);
        assert!(!trap.on_blocking_ended(&mut f.doc, &f.refs));
        assert_eq!(f.doc.focused(), Some(f.outside));
        assert_eq!(trap.anchor(), None);
    }

    #[test]
    fn removed_anchor_is_not_refocused() {
        let mut f = fixture();
        let mut trap = FocusTrap::new();
        let mut queue = TaskQueue::new();
        f.doc.focus(f.inner);
        trap.on_blocking_started(&f.doc, &f.refs, &mut queue);
        f.doc.remove(f.inner).unwrap();
        assert!(!trap.run_deferred_blur(&mut f.doc, f.inner));
        assert!(!trap.on_blocking_ended(&mut f.doc, &f.refs));
        assert_eq!(f.doc.focused(), None);
    }

    /// Host without a body: nothing is active once focus is dropped.
    struct Bodiless {
        focused: Option<u8>,
        focusable: Vec<u8>,
    }

    impl Host for Bodiless {
        type Node = u8;

        fn active_element(&self) -> Option<u8> {
            self.focused
        }

        fn is_body(&self, _node: u8) -> bool {
            false
        }

        fn parent(&self, node: u8) -> Option<u8> {
            (node != 0).then_some(0)
        }

        fn contains(&self, ancestor: u8, node: u8) -> Option<bool> {
            Some(ancestor == node || ancestor == 0)
        }

        fn can_focus(&self, node: u8) -> bool {
            self.focusable.contains(&node)
        }

        fn can_blur(&self, _node: u8) -> bool {
            true
        }

        fn focus(&mut self, node: u8) -> bool {
            let ok = self.can_focus(node);
            if ok {
                self.focused = Some(node);
            }
            ok
        }

        fn blur(&mut self, node: u8) -> bool {
            if self.focused == Some(node) {
                self.focused = None;
            }
            true
        }

        fn bounds(&self, _node: u8) -> Option<crate::geometry::Bounds> {
            None
        }

        fn viewport_height(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn restores_when_nothing_is_active() {
        let mut host = Bodiless {
            focused: Some(2),
            focusable: vec![1, 2, 3],
        };
        let refs = BlockRefs {
            top_focus: Some(1),
            blocker: Some(3),
            container: None,
            message_container: None,
            helper: Some(4),
        };
        let mut trap = FocusTrap::new();
        let mut queue = TaskQueue::new();
        trap.on_blocking_started(&host, &refs, &mut queue);
        assert_eq!(trap.anchor(), Some(2));
        for task in queue.drain() {
            let Deferred::Blur(node) = task;
            assert!(trap.run_deferred_blur(&mut host, node));
        }
        assert_eq!(host.active_element(), None);
        assert!(trap.on_blocking_ended(&mut host, &refs));
        assert_eq!(host.active_element(), Some(2));
    }

    #[test]
    fn boundary_tab_predicates() {
        let mut f = fixture();
        let trap = FocusTrap::new();
        let tab = Some(TabKey { shift: false });
        let shift_tab = Some(TabKey { shift: true });
        let top = f.refs.top_focus.unwrap();
        let blocker = f.refs.blocker.unwrap();

        let out = trap.handle_boundary_tab(
            Boundary::Top,
            KeyPhase::Down,
            tab,
            true,
            &mut f.doc,
            &f.refs,
        );
        assert_eq!(
            out,
            TabOutcome::Redirected {
                target: blocker,
                prevent_default: true
            }
        );
        assert_eq!(f.doc.focused(), Some(blocker));

        let out = trap.handle_boundary_tab(
            Boundary::Bottom,
            KeyPhase::Up,
            shift_tab,
            true,
            &mut f.doc,
            &f.refs,
        );
        assert_eq!(
            out,
            TabOutcome::Redirected {
                target: top,
                prevent_default: false
            }
        );
        assert_eq!(f.doc.focused(), Some(top));

        for (boundary, key, blocking) in [
            (Boundary::Top, shift_tab, true),
            (Boundary::Bottom, tab, true),
            (Boundary::Top, None, true),
            (Boundary::Top, tab, false),
            (Boundary::Bottom, shift_tab, false),
        ] {
            for phase in [KeyPhase::Down, KeyPhase::Up] {
                let out =
                    trap.handle_boundary_tab(boundary, phase, key, blocking, &mut f.doc, &f.refs);
                assert_eq!(out, TabOutcome::Ignored);
                assert!(!out.prevents_default());
            }
        }
        assert_eq!(f.doc.focused(), Some(top));
    }
}
