//! In-memory element tree implementing [`Host`].
//!
//! `Document` is the element host the terminal page uses: a tree of nodes with
//! a focusable flag and a vertical layout in page coordinates, a single
//! focused node, and a vertical scroll position. Bounds are reported relative
//! to the scrolled viewport, the same way a browser reports client rects.

use thiserror::Error;

use crate::geometry::Bounds;
use crate::host::Host;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("node {0} is not attached to the document")]
    Detached(NodeId),
    #[error("node {0} is already attached")]
    AlreadyAttached(NodeId),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    focusable: bool,
    attached: bool,
    top: f64,
    height: f64,
}

impl Node {
    fn new(parent: Option<NodeId>, focusable: bool) -> Self {
        Self {
            parent,
            children: Vec::new(),
            focusable,
            attached: true,
            top: 0.0,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    active: Option<NodeId>,
    scroll_y: f64,
    viewport_height: f64,
    containment: bool,
}

impl Document {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            nodes: vec![Node::new(None, false)],
            body: 0,
            active: None,
            scroll_y: 0.0,
            viewport_height,
            containment: true,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id).ok_or(DomError::UnknownNode(id))
    }

    fn attached(&self, id: NodeId) -> Result<&Node, DomError> {
        let node = self.node(id)?;
        if !node.attached {
            return Err(DomError::Detached(id));
        }
        Ok(node)
    }

    pub fn create_element(&mut self, parent: NodeId, focusable: bool) -> Result<NodeId, DomError> {
        self.attached(parent)?;
        let id = self.nodes.len();
        self.nodes.push(Node::new(Some(parent), focusable));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Insert a new child of `parent` at `index` among its children; an index
    /// past the end appends.
    pub fn create_element_at(
        &mut self,
        parent: NodeId,
        index: usize,
        focusable: bool,
    ) -> Result<NodeId, DomError> {
        self.attached(parent)?;
        let id = self.nodes.len();
        self.nodes.push(Node::new(Some(parent), focusable));
        let children = &mut self.node_mut(parent)?.children;
        let index = index.min(children.len());
        children.insert(index, id);
        Ok(id)
    }

    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .position(|c| *c == child)
    }

    /// Place a node at `top` (page coordinates) with the given height.
    pub fn set_layout(&mut self, id: NodeId, top: f64, height: f64) -> Result<(), DomError> {
        let node = self.node_mut(id)?;
        node.top = top;
        node.height = height.max(0.0);
        Ok(())
    }

    /// Page-coordinate `(top, height)` of an attached node.
    pub fn layout(&self, id: NodeId) -> Option<(f64, f64)> {
        self.attached(id).ok().map(|n| (n.top, n.height))
    }

    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) -> Result<(), DomError> {
        self.node_mut(id)?.focusable = focusable;
        Ok(())
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.attached)
    }

    /// Detach `id` and its subtree. Focus inside the subtree falls back to the
    /// body.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        if id == self.body {
            return Err(DomError::Detached(id));
        }
        self.attached(id)?;
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current)?;
            node.attached = false;
            stack.extend(node.children.iter().copied());
            if self.active == Some(current) {
                self.active = None;
            }
        }
        self.node_mut(id)?.parent = None;
        tracing::trace!(node = id, "removed subtree");
        Ok(())
    }

    /// Re-attach a subtree detached by [`Document::remove`] as a child of
    /// `parent` at `index`; an index past the end appends.
    pub fn insert(&mut self, parent: NodeId, index: usize, id: NodeId) -> Result<(), DomError> {
        self.attached(parent)?;
        if self.node(id)?.attached {
            return Err(DomError::AlreadyAttached(id));
        }
        let children = &mut self.node_mut(parent)?.children;
        let index = index.min(children.len());
        children.insert(index, id);
        self.node_mut(id)?.parent = Some(parent);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current)?;
            node.attached = true;
            stack.extend(node.children.iter().copied());
        }
        tracing::trace!(node = id, parent, "inserted subtree");
        Ok(())
    }

    /// Number of node slots ever allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Raw focused node, without falling back to the body.
    pub fn focused(&self) -> Option<NodeId> {
        self.active
    }

    /// Turn containment queries off to emulate hosts without them.
    pub fn set_containment_supported(&mut self, supported: bool) {
        self.containment = supported;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
        self.scroll_to(self.scroll_y);
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn page_height(&self) -> f64 {
        self.nodes
            .iter()
            .filter(|n| n.attached)
            .map(|n| n.top + n.height)
            .fold(0.0, f64::max)
    }

    fn max_scroll(&self) -> f64 {
        (self.page_height() - self.viewport_height).max(0.0)
    }

    /// Scroll to `y`, clamped to the page. Returns whether the position moved.
    pub fn scroll_to(&mut self, y: f64) -> bool {
        let clamped = y.clamp(0.0, self.max_scroll());
        if clamped == self.scroll_y {
            return false;
        }
        self.scroll_y = clamped;
        true
    }

    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.scroll_to(self.scroll_y + delta)
    }

    /// Attached focusable nodes in document order.
    pub fn tab_order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.body];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.focusable && node.attached {
                order.push(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Default Tab action: move focus to the next (or previous) focusable
    /// node, wrapping around the document.
    pub fn focus_next(&mut self, reverse: bool) -> Option<NodeId> {
        let order = self.tab_order();
        if order.is_empty() {
            return None;
        }
        let position = self
            .active
            .and_then(|active| order.iter().position(|id| *id == active));
        let next = match (position, reverse) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
        };
        self.active = Some(order[next]);
        self.active
    }
}

impl Host for Document {
    type Node = NodeId;

    fn active_element(&self) -> Option<NodeId> {
        Some(self.active.unwrap_or(self.body))
    }

    fn is_body(&self, node: NodeId) -> bool {
        node == self.body
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> Option<bool> {
        if !self.containment {
            return None;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Some(true);
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        Some(false)
    }

    fn can_focus(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.attached && n.focusable)
    }

    fn can_blur(&self, node: NodeId) -> bool {
        self.is_attached(node)
    }

    fn focus(&mut self, node: NodeId) -> bool {
        if !self.can_focus(node) {
            return false;
        }
        self.active = Some(node);
        true
    }

    fn blur(&mut self, node: NodeId) -> bool {
        if !self.can_blur(node) {
            return false;
        }
        if self.active == Some(node) {
            self.active = None;
        }
        true
    }

    fn bounds(&self, node: NodeId) -> Option<Bounds> {
        let (top, height) = self.layout(node)?;
        Some(Bounds::new(top - self.scroll_y, height))
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_region() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new(10.0);
        let body = doc.body();
        let outside = doc.create_element(body, true).unwrap();
        let region = doc.create_element(body, false).unwrap();
        let inner = doc.create_element(region, true).unwrap();
        (doc, outside, region, inner)
    }

    #[test]
    fn active_element_falls_back_to_body() {
        let (mut doc, outside, _, _) = doc_with_region();
        assert_eq!(doc.active_element(), Some(doc.body()));
        assert!(doc.focus(outside));
        assert_eq!(doc.active_element(), Some(outside));
        assert!(doc.blur(outside));
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn contains_walks_ancestors() {
        let (mut doc, outside, region, inner) = doc_with_region();
        assert_eq!(doc.contains(region, inner), Some(true));
        assert_eq!(doc.contains(region, region), Some(true));
        assert_eq!(doc.contains(region, outside), Some(false));
        doc.set_containment_supported(false);
        assert_eq!(doc.contains(region, inner), None);
    }

    #[test]
    fn removing_focused_subtree_drops_focus() {
        let (mut doc, _, region, inner) = doc_with_region();
        assert!(doc.focus(inner));
        doc.remove(region).unwrap();
        assert_eq!(doc.focused(), None);
        assert!(!doc.can_focus(inner));
        assert!(!doc.can_blur(inner));
        assert!(!doc.focus(inner));
        assert_eq!(doc.create_element(inner, true), Err(DomError::Detached(inner)));
        assert_eq!(doc.remove(doc.body()), Err(DomError::Detached(0)));
    }

    #[test]
    fn focus_next_wraps_in_document_order() {
        let (mut doc, outside, _, inner) = doc_with_region();
        assert_eq!(doc.tab_order(), vec![outside, inner]);
        assert_eq!(doc.focus_next(false), Some(outside));
        assert_eq!(doc.focus_next(false), Some(inner));
        assert_eq!(doc.focus_next(false), Some(outside));
        assert_eq!(doc.focus_next(true), Some(inner));
    }

    #[test]
    fn bounds_follow_scroll_and_clamp() {
        let (mut doc, outside, region, _) = doc_with_region();
        doc.set_layout(outside, 0.0, 4.0).unwrap();
        doc.set_layout(region, 8.0, 20.0).unwrap();
        assert_eq!(doc.page_height(), 28.0);
        assert!(doc.scroll_by(12.0));
        assert_eq!(doc.bounds(region), Some(Bounds::new(-4.0, 20.0)));
        assert!(doc.scroll_by(100.0));
        assert_eq!(doc.scroll_y(), 18.0);
        assert!(!doc.scroll_by(1.0));
        assert!(doc.scroll_to(-5.0));
        assert_eq!(doc.scroll_y(), 0.0);
    }

    #[test]
    fn create_element_at_controls_sibling_order() {
        let (mut doc, outside, region, inner) = doc_with_region();
        let first = doc.create_element_at(region, 0, true).unwrap();
        let last = doc.create_element_at(region, 99, true).unwrap();
        assert_eq!(doc.child_index(region, first), Some(0));
        assert_eq!(doc.child_index(region, inner), Some(1));
        assert_eq!(doc.child_index(region, last), Some(2));
        assert_eq!(doc.tab_order(), vec![outside, first, inner, last]);
    }

    #[test]
    fn removed_subtree_can_be_reinserted() {
        let (mut doc, outside, region, inner) = doc_with_region();
        let count = doc.node_count();
        doc.remove(region).unwrap();
        assert_eq!(doc.tab_order(), vec![outside]);
        doc.insert(doc.body(), 0, region).unwrap();
        assert_eq!(doc.tab_order(), vec![inner, outside]);
        assert_eq!(doc.parent(region), Some(doc.body()));
        assert!(doc.focus(inner));
        assert_eq!(
            doc.insert(doc.body(), 0, region),
            Err(DomError::AlreadyAttached(region))
        );
        assert_eq!(doc.node_count(), count);
    }

    #[test]
    fn unfocusable_nodes_leave_tab_order() {
        let (mut doc, outside, _, inner) = doc_with_region();
        doc.set_focusable(inner, false).unwrap();
        assert_eq!(doc.tab_order(), vec![outside]);
        assert!(!doc.focus(inner));
        assert!(doc.can_blur(inner));
    }

    #[test]
    fn unknown_nodes_are_reported() {
        let mut doc = Document::new(10.0);
        assert_eq!(doc.set_layout(42, 0.0, 1.0), Err(DomError::UnknownNode(42)));
        assert_eq!(doc.bounds(42), None);
        assert!(!doc.focus(42));
    }
}
