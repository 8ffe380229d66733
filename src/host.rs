//! Element capability interface used by the blocking controller.
//!
//! The controller never touches a concrete UI tree. It holds opaque node
//! handles and asks a `Host` to focus, blur, measure, and answer containment
//! queries. Every capability is fallible in the soft sense: a host that cannot
//! perform an operation reports it (`false` / `None`) and the caller skips it.

use std::fmt::Debug;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::geometry::Bounds;

pub trait Host {
    type Node: Copy + Eq + Debug;

    /// Element currently holding keyboard focus. Hosts that model a document
    /// body report the body when nothing else is focused.
    fn active_element(&self) -> Option<Self::Node>;

    fn is_body(&self, node: Self::Node) -> bool;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Whether `node` is `ancestor` or one of its descendants. `None` when the
    /// host does not support containment queries.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> Option<bool>;

    fn can_focus(&self, node: Self::Node) -> bool;

    fn can_blur(&self, node: Self::Node) -> bool;

    /// Move focus to `node`. Returns `false` when the node cannot take focus.
    fn focus(&mut self, node: Self::Node) -> bool;

    /// Drop focus from `node`. Returns `false` when the node cannot be blurred.
    fn blur(&mut self, node: Self::Node) -> bool;

    fn bounds(&self, node: Self::Node) -> Option<Bounds>;

    fn viewport_height(&self) -> f64;
}

impl<T: Host + ?Sized> Host for &mut T {
    type Node = T::Node;

    fn active_element(&self) -> Option<Self::Node> {
        (**self).active_element()
    }

    fn is_body(&self, node: Self::Node) -> bool {
        (**self).is_body(node)
    }

    fn parent(&self, node: Self::Node) -> Option<Self::Node> {
        (**self).parent(node)
    }

    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> Option<bool> {
        (**self).contains(ancestor, node)
    }

    fn can_focus(&self, node: Self::Node) -> bool {
        (**self).can_focus(node)
    }

    fn can_blur(&self, node: Self::Node) -> bool {
        (**self).can_blur(node)
    }

    fn focus(&mut self, node: Self::Node) -> bool {
        (**self).focus(node)
    }

    fn blur(&mut self, node: Self::Node) -> bool {
        (**self).blur(node)
    }

    fn bounds(&self, node: Self::Node) -> Option<Bounds> {
        (**self).bounds(node)
    }

    fn viewport_height(&self) -> f64 {
        (**self).viewport_height()
    }
}

/// Element handles the render layer fills in for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRefs<N> {
    /// Focus sentinel rendered before the region's content.
    pub top_focus: Option<N>,
    /// Blocker container rendered after the content; doubles as the bottom
    /// trap boundary.
    pub blocker: Option<N>,
    /// Overlay covering the region; its bounds are the container bounds.
    pub container: Option<N>,
    pub message_container: Option<N>,
    /// Inert child of the region root; its parent is the containment root.
    pub helper: Option<N>,
}

impl<N> Default for BlockRefs<N> {
    fn default() -> Self {
        Self {
            top_focus: None,
            blocker: None,
            container: None,
            message_container: None,
            helper: None,
        }
    }
}

/// Trap marker a key event arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Sentinel placed before the blocked region in tab order.
    Top,
    /// The blocker container placed after the blocked region.
    Bottom,
}

impl Boundary {
    /// Shift state that moves focus out of the region across this boundary.
    pub fn escaping_shift(&self) -> bool {
        match self {
            Boundary::Top => false,
            Boundary::Bottom => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Tab key press as seen by the trap: `None` for any other key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabKey {
    pub shift: bool,
}

impl TabKey {
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Tab => Some(Self {
                shift: key.modifiers.contains(KeyModifiers::SHIFT),
            }),
            // Terminals and the keyboard normalizer report Shift+Tab as BackTab.
            KeyCode::BackTab => Some(Self { shift: true }),
            _ => None,
        }
    }
}
