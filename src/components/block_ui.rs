//! Blocking region component.
//!
//! Mirrors the element structure a blocking overlay needs in the document:
//!
//! ```text
//! root
//! ├── top focus marker        (only while blocking)
//! ├── content nodes ...
//! ├── blocker                 (only while blocking)
//! │   ├── overlay container
//! │   └── message container
//! └── helper
//! ```
//!
//! and keeps the controller's refs pointed at those nodes. Markers are
//! inserted before the controller sees the new props and removed after it
//! has handled them, so focus restoration can still observe the top marker.

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;

use crate::components::loader::{Loader, SpinnerLoader};
use crate::components::message_box::MessageBox;
use crate::components::{Component, ComponentContext};
use crate::config::{BlockProps, DEFAULT_MESSAGE};
use crate::controller::BlockUi;
use crate::dom::{Document, DomError, NodeId};
use crate::focus_trap::TabOutcome;
use crate::host::{BlockRefs, Boundary, KeyPhase};
use crate::scroll::{ListenerId, ScrollBus};
use crate::ui::UiFrame;

/// Trap and overlay nodes. Created once per region and attached only while
/// blocking.
#[derive(Debug, Clone, Copy)]
struct Markers {
    top_focus: NodeId,
    blocker: NodeId,
    container: NodeId,
    message_container: NodeId,
}

#[derive(Debug)]
pub struct BlockUiComponent<C> {
    ui: BlockUi<NodeId>,
    root: NodeId,
    helper: NodeId,
    markers: Markers,
    content: C,
    loader: Box<dyn Loader>,
    message: MessageBox,
    top: f64,
    height: f64,
}

impl<C: Component> BlockUiComponent<C> {
    /// Create the region under `parent`. `build` creates the content nodes
    /// under the region root.
    pub fn mount<F>(
        doc: &mut Document,
        parent: NodeId,
        props: BlockProps,
        build: F,
    ) -> Result<Self, DomError>
    where
        F: FnOnce(&mut Document, NodeId) -> Result<C, DomError>,
    {
        let root = doc.create_element(parent, false)?;
        let content = build(doc, root)?;
        let helper = doc.create_element(root, false)?;
        let top_focus = doc.create_element(root, true)?;
        let blocker = doc.create_element(root, true)?;
        let markers = Markers {
            top_focus,
            blocker,
            container: doc.create_element(blocker, false)?,
            message_container: doc.create_element(blocker, false)?,
        };
        doc.remove(top_focus)?;
        doc.remove(blocker)?;
        let mut message = MessageBox::new(props.message.as_deref().unwrap_or(DEFAULT_MESSAGE));
        message.set_style(crate::theme::message_style());
        message.set_border_style(crate::theme::message_border_style());
        let blocking = props.blocking;
        let mut ui = BlockUi::new(props);
        ui.refs_mut().helper = Some(helper);
        let mut component = Self {
            ui,
            root,
            helper,
            markers,
            content,
            loader: Box::new(SpinnerLoader::new()),
            message,
            top: 0.0,
            height: 0.0,
        };
        if blocking {
            component.mount_markers(doc)?;
        }
        Ok(component)
    }

    pub fn with_loader(mut self, loader: Box<dyn Loader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn props(&self) -> &BlockProps {
        self.ui.props()
    }

    pub fn controller(&self) -> &BlockUi<NodeId> {
        &self.ui
    }

    pub fn refs(&self) -> &BlockRefs<NodeId> {
        self.ui.refs()
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.ui.listener()
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut C {
        &mut self.content
    }

    pub fn message(&self) -> &str {
        self.message.message()
    }

    /// Push new props through the controller. Returns whether the message
    /// moved.
    pub fn set_props(
        &mut self,
        props: BlockProps,
        doc: &mut Document,
        bus: &mut ScrollBus,
    ) -> Result<bool, DomError> {
        let blocking = props.blocking;
        if blocking {
            self.mount_markers(doc)?;
        }
        self.message
            .set_message(props.message.as_deref().unwrap_or(DEFAULT_MESSAGE));
        let moved = self.ui.update(props, doc, bus);
        if blocking {
            self.place_message(doc)?;
        } else {
            self.unmount_markers(doc)?;
        }
        Ok(moved)
    }

    pub fn set_blocking(
        &mut self,
        blocking: bool,
        doc: &mut Document,
        bus: &mut ScrollBus,
    ) -> Result<bool, DomError> {
        let props = self.props().clone().blocking(blocking);
        self.set_props(props, doc, bus)
    }

    pub fn set_keep_in_view(
        &mut self,
        keep_in_view: bool,
        doc: &mut Document,
        bus: &mut ScrollBus,
    ) -> Result<bool, DomError> {
        let props = self.props().clone().keep_in_view(keep_in_view);
        self.set_props(props, doc, bus)
    }

    fn mount_markers(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if self.ui.refs().blocker.is_some() {
            return Ok(());
        }
        let markers = self.markers;
        doc.insert(self.root, 0, markers.top_focus)?;
        let helper_index = doc
            .child_index(self.root, self.helper)
            .ok_or(DomError::Detached(self.helper))?;
        doc.insert(self.root, helper_index, markers.blocker)?;
        let refs = self.ui.refs_mut();
        refs.top_focus = Some(markers.top_focus);
        refs.blocker = Some(markers.blocker);
        refs.container = Some(markers.container);
        refs.message_container = Some(markers.message_container);
        self.apply_layout(doc)
    }

    fn unmount_markers(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let refs = self.ui.refs_mut();
        let top_focus = refs.top_focus.take();
        let blocker = refs.blocker.take();
        refs.container = None;
        refs.message_container = None;
        for node in [top_focus, blocker].into_iter().flatten() {
            doc.remove(node)?;
        }
        Ok(())
    }

    /// Place the region at page row `top` with the given height.
    pub fn layout(&mut self, doc: &mut Document, top: f64, height: f64) -> Result<(), DomError> {
        self.top = top;
        self.height = height;
        self.apply_layout(doc)
    }

    fn apply_layout(&mut self, doc: &mut Document) -> Result<(), DomError> {
        doc.set_layout(self.root, self.top, self.height)?;
        doc.set_layout(self.helper, self.top + self.height, 0.0)?;
        let refs = *self.ui.refs();
        if let Some(top_focus) = refs.top_focus {
            doc.set_layout(top_focus, self.top, 0.0)?;
        }
        for node in [refs.blocker, refs.container].into_iter().flatten() {
            doc.set_layout(node, self.top, self.height)?;
        }
        self.place_message(doc)
    }

    fn message_center(&self) -> f64 {
        self.ui
            .message_top()
            .unwrap_or_default()
            .resolve(self.height)
    }

    fn place_message(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let Some(node) = self.ui.refs().message_container else {
            return Ok(());
        };
        let height = MessageBox::HEIGHT as f64;
        let top = self.top + self.message_center() - height / 2.0;
        doc.set_layout(node, top, height)
    }

    /// Route a key event that arrived while a trap marker holds focus.
    pub fn handle_key(&mut self, key: &KeyEvent, doc: &mut Document) -> TabOutcome<NodeId> {
        let Some(focused) = doc.focused() else {
            return TabOutcome::Ignored;
        };
        let refs = *self.ui.refs();
        let boundary = if refs.top_focus == Some(focused) {
            Boundary::Top
        } else if refs.blocker == Some(focused) {
            Boundary::Bottom
        } else {
            return TabOutcome::Ignored;
        };
        let phase = match key.kind {
            KeyEventKind::Release => KeyPhase::Up,
            KeyEventKind::Press | KeyEventKind::Repeat => KeyPhase::Down,
        };
        self.ui.handle_boundary_tab(boundary, phase, key, doc)
    }

    /// Scroll listener. Returns whether the message moved.
    pub fn handle_scroll(&mut self, doc: &mut Document) -> Result<bool, DomError> {
        let moved = self.ui.handle_scroll(&*doc);
        if moved {
            self.place_message(doc)?;
        }
        Ok(moved)
    }

    pub fn run_deferred(&mut self, doc: &mut Document) {
        self.ui.run_deferred(doc);
    }

    /// Advance the loader animation while blocking.
    pub fn tick(&mut self) {
        if self.ui.blocking() {
            self.loader.tick();
        }
    }

    pub fn unmount(mut self, doc: &mut Document, bus: &mut ScrollBus) -> Result<C, DomError> {
        self.ui.unmount(bus);
        doc.remove(self.root)?;
        Ok(self.content)
    }
}

impl<C: Component> Component for BlockUiComponent<C> {
    /// `area` is the visible slice of the region and `ctx.clip_top()` the
    /// rows scrolled off above it.
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let props = self.ui.props();
        let blocking = props.blocking;
        if props.renders_children() {
            self.content
                .render(frame, area, &ctx.with_busy(blocking || ctx.busy()));
        }
        if !blocking {
            return;
        }
        frame.dim_area(area, crate::theme::overlay_style());
        let region_top = area.y as i32 - ctx.clip_top() as i32;
        let center = region_top + self.message_center().floor() as i32;
        self.message
            .render(frame, self.loader.as_ref(), area.x, area.width, center);
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        if self.ui.blocking() {
            return false;
        }
        self.content.handle_event(event, ctx)
    }
}
