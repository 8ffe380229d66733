use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::components::{Component, ComponentContext};
use crate::dom::{Document, DomError, NodeId};
use crate::ui::UiFrame;

#[derive(Debug, Clone)]
struct Field {
    label: String,
    node: NodeId,
    checked: bool,
}

/// Column of focusable checkbox rows backed by document nodes.
#[derive(Debug)]
pub struct FieldListComponent {
    title: String,
    fields: Vec<Field>,
    focused: Option<NodeId>,
}

impl FieldListComponent {
    pub fn mount<S: AsRef<str>>(
        doc: &mut Document,
        parent: NodeId,
        title: impl Into<String>,
        labels: &[S],
    ) -> Result<Self, DomError> {
        let fields = labels
            .iter()
            .map(|label| -> Result<Field, DomError> {
                Ok(Field {
                    label: label.as_ref().to_string(),
                    node: doc.create_element(parent, true)?,
                    checked: false,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            title: title.into(),
            fields,
            focused: None,
        })
    }

    /// Rows: the title, a blank line, then one field every other row.
    pub fn height(&self) -> u16 {
        2 + (self.fields.len() as u16) * 2
    }

    fn field_row(index: usize) -> u16 {
        2 + index as u16 * 2
    }

    /// Position the field nodes below `top` (page rows).
    pub fn layout(&self, doc: &mut Document, top: f64) -> Result<(), DomError> {
        for (i, field) in self.fields.iter().enumerate() {
            doc.set_layout(field.node, top + Self::field_row(i) as f64, 1.0)?;
        }
        Ok(())
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.fields.iter().map(|f| f.node)
    }

    pub fn set_focused(&mut self, focused: Option<NodeId>) {
        self.focused = focused;
    }

    pub fn is_checked(&self, node: NodeId) -> Option<bool> {
        self.fields.iter().find(|f| f.node == node).map(|f| f.checked)
    }

    fn line(&self, row: u16) -> Option<(String, Style)> {
        if row == 0 {
            return Some((
                self.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        let index = row.checked_sub(2)?;
        if index % 2 != 0 {
            return None;
        }
        let field = self.fields.get((index / 2) as usize)?;
        let mark = if field.checked { "x" } else { " " };
        let style = if self.focused == Some(field.node) {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        Some((format!("[{}] {}", mark, field.label), style))
    }
}

impl Component for FieldListComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = if ctx.busy() {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };
        for offset in 0..area.height {
            let row = ctx.clip_top().saturating_add(offset);
            if let Some((text, style)) = self.line(row) {
                let y = area.y.saturating_add(offset) as i32;
                frame.set_line(area.x.saturating_add(2), y, &text, base.patch(style));
            }
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        if ctx.busy() {
            return false;
        }
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press || key.code != KeyCode::Char(' ') {
            return false;
        }
        let focused = self.focused;
        let Some(field) = self.fields.iter_mut().find(|f| Some(f.node) == focused) else {
            return false;
        };
        field.checked = !field.checked;
        true
    }
}
