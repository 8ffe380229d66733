use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod block_ui;
pub mod field_list;
pub mod loader;
pub mod message_box;
pub mod status_bar;

pub use block_ui::BlockUiComponent;
pub use field_list::FieldListComponent;
pub use loader::{Loader, SpinnerLoader, TextLoader};
pub use message_box::MessageBox;
pub use status_bar::StatusBar;

pub use crate::component_context::ComponentContext;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}
