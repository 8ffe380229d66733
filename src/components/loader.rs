//! Busy indicators drawn next to the blocking message.

use ratatui::style::Style;

use crate::ui::UiFrame;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Replaceable leaf widget shown inside the message box.
pub trait Loader: std::fmt::Debug {
    /// Width in columns the loader needs on its row.
    fn width(&self) -> u16;

    /// Advance one animation frame.
    fn tick(&mut self) {}

    fn render(&self, frame: &mut UiFrame<'_>, x: u16, row: i32, style: Style);
}

#[derive(Debug, Default, Clone)]
pub struct SpinnerLoader {
    frame: usize,
}

impl SpinnerLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(&self) -> &'static str {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }
}

impl Loader for SpinnerLoader {
    fn width(&self) -> u16 {
        1
    }

    fn tick(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    fn render(&self, frame: &mut UiFrame<'_>, x: u16, row: i32, style: Style) {
        frame.set_line(x, row, self.symbol(), style);
    }
}

/// Static text in place of an animation.
#[derive(Debug, Clone)]
pub struct TextLoader {
    text: String,
}

impl TextLoader {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Loader for TextLoader {
    fn width(&self) -> u16 {
        self.text.chars().count() as u16
    }

    fn render(&self, frame: &mut UiFrame<'_>, x: u16, row: i32, style: Style) {
        frame.set_line(x, row, &self.text, style);
    }
}
