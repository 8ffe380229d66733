//! Viewport-relative geometry shared by the element host and the viewport
//! tracker.
//!
//! Coordinates are measured in terminal rows from the top edge of the visible
//! viewport. They are signed and fractional: a container scrolled past the top
//! edge has a negative `top`, and half-row offsets fall out of the centering
//! math.

use std::fmt;

/// Vertical extent of an element relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub top: f64,
    pub bottom: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
        }
    }

    pub fn from_edges(top: f64, bottom: f64) -> Self {
        Self {
            top,
            bottom,
            height: bottom - top,
        }
    }

    /// No part of the element is inside `[0, viewport_height]`.
    pub fn is_outside(&self, viewport_height: f64) -> bool {
        self.top > viewport_height || self.bottom < 0.0
    }

    /// The whole element is inside `[0, viewport_height]`.
    pub fn is_within(&self, viewport_height: f64) -> bool {
        self.top >= 0.0 && self.bottom <= viewport_height
    }

    /// Rows of the element currently on screen.
    pub fn visible_extent(&self, viewport_height: f64) -> f64 {
        viewport_height.min(self.bottom) - self.top.max(0.0)
    }
}

/// Vertical position of the busy message's center inside its container.
///
/// `Centered` is the resting value and matches a `top: 50%` style. `Cells`
/// is an absolute offset from the container's top edge, produced while the
/// container is only partly on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ViewportOffset {
    #[default]
    Centered,
    Cells(f64),
}

impl ViewportOffset {
    /// Offset of the message center from the container top, for a container
    /// of the given height.
    pub fn resolve(&self, container_height: f64) -> f64 {
        match self {
            ViewportOffset::Centered => container_height / 2.0,
            ViewportOffset::Cells(v) => *v,
        }
    }
}

impl fmt::Display for ViewportOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewportOffset::Centered => write!(f, "50%"),
            ViewportOffset::Cells(v) => write!(f, "{}", v),
        }
    }
}
