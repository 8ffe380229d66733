//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! A scrolled page routinely produces rectangles that start above the top of
//! the terminal or run past its bottom. Writing those straight into the
//! `Buffer` can panic, so every draw call goes through `UiFrame`, which clips
//! to the visible area first. Rows are passed as signed screen rows where a
//! region may be partly scrolled off (`row_rect`).
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Patch `style` onto every visible cell of `area`.
    pub fn dim_area(&mut self, area: Rect, style: Style) {
        let Some(clipped) = self.clip_rect(area) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_style(style);
                }
            }
        }
    }

    /// Write a single line at a signed screen row; rows outside the frame are
    /// skipped.
    pub fn set_line(&mut self, x: u16, row: i32, text: &str, style: Style) {
        let Ok(y) = u16::try_from(row) else {
            return;
        };
        let bounds = self.area;
        safe_set_string(self.buffer, bounds, x, y, text, style);
    }
}

/// Visible part of a band of rows `[top, top + height)` given in signed screen
/// rows, spanning `x..x + width`. `None` when no row is on screen.
pub fn row_rect(x: u16, width: u16, top: i32, height: i32, viewport: Rect) -> Option<Rect> {
    let view_top = viewport.y as i32;
    let view_bottom = view_top + viewport.height as i32;
    let start = top.max(view_top);
    let end = (top + height).min(view_bottom);
    if end <= start || width == 0 {
        return None;
    }
    Some(Rect {
        x,
        y: start as u16,
        width,
        height: (end - start) as u16,
    })
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}
