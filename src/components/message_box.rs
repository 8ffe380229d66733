use ratatui::style::Style;

use crate::components::loader::Loader;
use crate::ui::{UiFrame, truncate_to_width};

/// Bordered box holding the busy message and the loader.
#[derive(Debug, Clone)]
pub struct MessageBox {
    message: String,
    style: Style,
    border_style: Style,
}

impl MessageBox {
    pub const HEIGHT: u16 = 3;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            style: Style::default(),
            border_style: Style::default(),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn set_border_style(&mut self, border_style: Style) {
        self.border_style = border_style;
    }

    /// Box width for the message and loader, clamped to `max_width`.
    pub fn width_for(&self, loader: &dyn Loader, max_width: u16) -> u16 {
        let text = self.message.chars().count() as u16;
        let gap = u16::from(text > 0);
        // borders plus one column of padding on each side
        let wanted = text.saturating_add(gap).saturating_add(loader.width()) + 4;
        wanted.min(max_width)
    }

    /// Draw the box horizontally centered in `x..x + max_width`, with its
    /// middle row on signed screen row `center_row`.
    pub fn render(
        &self,
        frame: &mut UiFrame<'_>,
        loader: &dyn Loader,
        x: u16,
        max_width: u16,
        center_row: i32,
    ) {
        let width = self.width_for(loader, max_width);
        if width < 4 {
            return;
        }
        let left = x.saturating_add((max_width - width) / 2);
        let inner = (width - 2) as usize;
        let top_row = center_row - 1;

        let horizontal = "─".repeat(inner);
        frame.set_line(left, top_row, &format!("┌{}┐", horizontal), self.border_style);
        frame.set_line(
            left,
            top_row + 2,
            &format!("└{}┘", horizontal),
            self.border_style,
        );

        let text_width = inner.saturating_sub(2 + loader.width() as usize + 1);
        let text = truncate_to_width(&self.message, text_width);
        let body = format!(" {:<width$}", text, width = inner - 1);
        frame.set_line(left, center_row, "│", self.border_style);
        frame.set_line(left + 1, center_row, &body, self.style);
        frame.set_line(left + width - 1, center_row, "│", self.border_style);
        let loader_x = (left + width - 2)
            .saturating_sub(loader.width())
            .max(left + 1);
        loader.render(frame, loader_x, center_row, self.style);
    }
}
