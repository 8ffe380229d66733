use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::config::BlockProps;
use crate::geometry::ViewportOffset;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            style: Style::default(),
        }
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    /// Summarize the overlay state on the left side of the bar.
    pub fn show_block_state(&mut self, props: &BlockProps, top: Option<ViewportOffset>) {
        let mut left = format!(
            "blocking: {}  keep-in-view: {}",
            on_off(props.blocking),
            on_off(props.keep_in_view)
        );
        if let Some(top) = top {
            left.push_str(&format!("  top: {top}"));
        }
        self.left = left;
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &super::ComponentContext) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let y = area.y;
        let x = area.x;
        let width = area.width as usize;
        let style = self.style;
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }

        buffer.set_style(bounds, style);
        let left = truncate_to_width(&self.left, width);
        safe_set_string(buffer, bounds, x, y, &left, style);

        if !self.right.is_empty() {
            let right = truncate_to_width(&self.right, width);
            let right_width = right.chars().count();
            let left_width = left.chars().count();
            if right_width + left_width < width {
                let start_x = x.saturating_add((width - right_width) as u16);
                safe_set_string(buffer, bounds, start_x, y, &right, style);
            }
        }
    }
}
