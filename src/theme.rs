use ratatui::style::{Color, Modifier, Style};

// Centralized theme styles. Components call these helpers instead of
// hard-coding colors so the palette can change in one place.

pub fn overlay_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM)
}

pub fn message_style() -> Style {
    Style::default().fg(Color::White).bg(Color::Black)
}

pub fn message_border_style() -> Style {
    Style::default().fg(accent()).bg(Color::Black)
}

pub fn accent() -> Color {
    Color::Rgb(200, 100, 0)
}

pub fn status_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Gray)
}

pub fn section_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
