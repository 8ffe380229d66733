//! Shared component rendering context
//!
//! `ComponentContext` carries UI metadata that components may need during
//! rendering and event handling, so the component trait stays stable and
//! components do not rely on ad-hoc parameters.

/// Context passed to `Component` trait methods describing UI state.
///
/// - `focused`: whether focus is inside the component.
/// - `busy`: whether the component sits under an active blocking overlay.
/// - `clip_top`: rows of the component scrolled off above the render area.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentContext {
    focused: bool,
    busy: bool,
    clip_top: u16,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            busy: false,
            clip_top: 0,
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn busy(&self) -> bool {
        self.busy
    }

    pub const fn clip_top(&self) -> u16 {
        self.clip_top
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    pub const fn with_clip_top(mut self, clip_top: u16) -> Self {
        self.clip_top = clip_top;
        self
    }
}
