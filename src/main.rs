use std::io;

use clap::Parser;
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use block_ui::components::{
    BlockUiComponent, Component, ComponentContext, FieldListComponent, StatusBar,
};
use block_ui::config::{DemoCli, DemoConfig};
use block_ui::dom::{Document, NodeId};
use block_ui::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use block_ui::drivers::{InputDriver, OutputDriver};
use block_ui::event_loop::{ControlFlow, EventLoop};
use block_ui::host::Host;
use block_ui::keybindings::{Action, KeyBindings};
use block_ui::scroll::ScrollBus;
use block_ui::theme;
use block_ui::ui::{UiFrame, row_rect};

const INTRO: &str = indoc! {"
    Block UI demo

    The boxed form below is a blocking region. While it is blocked, Tab
    cycles inside it and its fields cannot be edited. When the block lifts,
    focus returns to the field that held it.
"};

const REGION_FIELDS: &[&str] = &[
    "Name",
    "Email",
    "Street",
    "City",
    "Postal code",
    "Country",
    "Phone",
    "Newsletter",
];

fn main() -> io::Result<()> {
    let cli = DemoCli::parse();
    let config = DemoConfig::try_from(&cli).map_err(io::Error::other)?;
    block_ui::tracing_sub::init_default(config.log_file.as_deref())?;

    let (width, height) = crossterm::terminal::size()?;
    let page = Page::new(config.props.clone(), Rect::new(0, 0, width, height))?;
    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    if input.set_key_releases(true)? {
        tracing::debug!("key release reporting enabled");
    }

    let mut app = App { page, output };
    let mut event_loop = EventLoop::new(input, config.tick);
    let result = event_loop.run(
        &mut app,
        |_, app, event| app.page.handle(event),
        |_, app| {
            app.page.settle();
            let App { page, output } = app;
            output.draw(|mut frame| page.render(&mut frame))?;
            Ok(ControlFlow::Continue)
        },
    );
    app.output.exit()?;
    tracing::debug!(blocking = app.page.region.props().blocking, "demo finished");
    result
}

struct App {
    page: Page,
    output: ConsoleOutputDriver,
}

/// The demo page: intro text, a form before the region, the blocking region,
/// a form after it and a key reference. One status row sits below the page.
struct Page {
    doc: Document,
    bus: ScrollBus,
    before: FieldListComponent,
    region: BlockUiComponent<FieldListComponent>,
    after: FieldListComponent,
    filler: NodeId,
    status: StatusBar,
    bindings: KeyBindings,
    help: Vec<String>,
    region_top: u16,
    region_height: u16,
    after_top: u16,
}

impl Page {
    fn new(props: block_ui::config::BlockProps, screen: Rect) -> io::Result<Self> {
        let mut doc = Document::new(screen.height.saturating_sub(1) as f64);
        let body = doc.body();
        let before = FieldListComponent::mount(&mut doc, body, "Before", &["Search", "Filter"])
            .map_err(io::Error::other)?;
        let region = BlockUiComponent::mount(&mut doc, body, props, |doc, root| {
            FieldListComponent::mount(doc, root, "Profile", REGION_FIELDS)
        })
        .map_err(io::Error::other)?;
        let after = FieldListComponent::mount(&mut doc, body, "After", &["Save", "Cancel"])
            .map_err(io::Error::other)?;
        let filler = doc.create_element(body, false).map_err(io::Error::other)?;

        let bindings = KeyBindings::default();
        let mut help = vec!["Keys".to_string(), String::new()];
        help.extend(
            bindings
                .help_entries()
                .into_iter()
                .map(|(action, combos)| format!("{:<10} {}", combos.join(", "), action)),
        );
        help.push(format!("{:<10} Toggle field", "Space"));

        let mut status = StatusBar::new();
        status.set_style(theme::status_style());
        status.set_right("b: block  k: keep in view  Esc: quit");

        let mut page = Self {
            doc,
            bus: ScrollBus::new(),
            before,
            region,
            after,
            filler,
            status,
            bindings,
            help,
            region_top: 0,
            region_height: 0,
            after_top: 0,
        };
        page.layout().map_err(io::Error::other)?;
        Ok(page)
    }

    fn intro_rows() -> u16 {
        INTRO.lines().count() as u16
    }

    /// Assign page rows to every section and mirror them into the document.
    fn layout(&mut self) -> Result<(), block_ui::dom::DomError> {
        let before_top = Self::intro_rows() + 1;
        self.before.layout(&mut self.doc, before_top as f64)?;
        self.region_top = before_top + self.before.height() + 1;
        // one blank row under the form so the message box has room
        self.region_height = self.region.content().height() + 1;
        self.region.layout(
            &mut self.doc,
            self.region_top as f64,
            self.region_height as f64,
        )?;
        self.region
            .content()
            .layout(&mut self.doc, self.region_top as f64)?;
        self.after_top = self.region_top + self.region_height + 1;
        self.after.layout(&mut self.doc, self.after_top as f64)?;
        let end = self.after_top + self.after.height() + 1 + self.help.len() as u16;
        self.doc.set_layout(self.filler, 0.0, end as f64)
    }

    fn handle(&mut self, event: Option<Event>) -> io::Result<ControlFlow> {
        let Some(event) = event else {
            self.region.tick();
            return Ok(ControlFlow::Continue);
        };
        match &event {
            Event::Key(key) => return self.handle_key(key, &event),
            Event::Resize(_, height) => {
                self.doc.set_viewport_height(height.saturating_sub(1) as f64);
                // the viewport bottom moved even when the offset did not
                self.notify_scroll()?;
            }
            _ => {}
        }
        Ok(ControlFlow::Continue)
    }

    fn handle_key(&mut self, key: &KeyEvent, event: &Event) -> io::Result<ControlFlow> {
        let action = self.bindings.action_for_key(key);
        if let Some(action @ (Action::FocusNext | Action::FocusPrev)) = action {
            let outcome = self.region.handle_key(key, &mut self.doc);
            if key.kind != KeyEventKind::Release && !outcome.prevents_default() {
                self.doc.focus_next(action == Action::FocusPrev);
            }
            self.reveal_focused()?;
            return Ok(ControlFlow::Continue);
        }
        if key.kind == KeyEventKind::Release {
            return Ok(ControlFlow::Continue);
        }
        let viewport = self.doc.viewport_height();
        let result = match action {
            Some(Action::Quit) => return Ok(ControlFlow::Quit),
            Some(Action::ToggleBlocking) => {
                let blocking = !self.region.props().blocking;
                self.region
                    .set_blocking(blocking, &mut self.doc, &mut self.bus)
                    .map(|_| ())
            }
            Some(Action::ToggleKeepInView) => {
                let keep = !self.region.props().keep_in_view;
                self.region
                    .set_keep_in_view(keep, &mut self.doc, &mut self.bus)
                    .map(|_| ())
            }
            Some(Action::ToggleRenderChildren) => {
                let props = self.region.props().clone();
                let render_children = !props.render_children;
                self.region
                    .set_props(
                        props.render_children(render_children),
                        &mut self.doc,
                        &mut self.bus,
                    )
                    .map(|_| ())
            }
            Some(Action::ScrollUp) => return self.scroll_by(-1.0),
            Some(Action::ScrollDown) => return self.scroll_by(1.0),
            Some(Action::ScrollPageUp) => return self.scroll_by(-(viewport - 1.0).max(1.0)),
            Some(Action::ScrollPageDown) => return self.scroll_by((viewport - 1.0).max(1.0)),
            Some(Action::ScrollHome) => return self.scroll_by(-self.doc.scroll_y()),
            Some(Action::ScrollEnd) => return self.scroll_by(self.doc.page_height()),
            Some(Action::FocusNext | Action::FocusPrev) | None => {
                let ctx = ComponentContext::default();
                let _ = self.before.handle_event(event, &ctx)
                    || self.region.handle_event(event, &ctx)
                    || self.after.handle_event(event, &ctx);
                Ok(())
            }
        };
        result.map_err(io::Error::other)?;
        Ok(ControlFlow::Continue)
    }

    fn scroll_by(&mut self, delta: f64) -> io::Result<ControlFlow> {
        if self.doc.scroll_by(delta) {
            self.notify_scroll()?;
        }
        Ok(ControlFlow::Continue)
    }

    /// Deliver one scroll event to every subscribed listener.
    fn notify_scroll(&mut self) -> io::Result<()> {
        for id in self.bus.dispatch() {
            if self.region.listener() == Some(id) {
                self.region
                    .handle_scroll(&mut self.doc)
                    .map_err(io::Error::other)?;
            }
        }
        Ok(())
    }

    /// Scroll the focused node into view, like a browser does on focus.
    fn reveal_focused(&mut self) -> io::Result<()> {
        let Some(bounds) = self.doc.focused().and_then(|node| self.doc.bounds(node)) else {
            return Ok(());
        };
        let viewport = self.doc.viewport_height();
        if bounds.top < 0.0 {
            self.scroll_by(bounds.top)?;
        } else if bounds.bottom > viewport {
            self.scroll_by(bounds.bottom - viewport)?;
        }
        Ok(())
    }

    /// Run the tasks handlers deferred and refresh derived state.
    fn settle(&mut self) {
        self.region.run_deferred(&mut self.doc);
        let focused = self.doc.focused();
        self.before.set_focused(focused);
        self.region.content_mut().set_focused(focused);
        self.after.set_focused(focused);
        let top = self.region.controller().message_top();
        self.status.show_block_state(self.region.props(), top);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>) {
        let screen = frame.area();
        if screen.height == 0 {
            return;
        }
        let page_area = Rect {
            height: screen.height - 1,
            ..screen
        };
        let status_area = Rect {
            y: screen.y + screen.height - 1,
            height: 1,
            ..screen
        };
        {
            let mut page = UiFrame::from_parts(page_area, frame.buffer_mut());
            self.render_page(&mut page, page_area);
        }
        self.status
            .render(frame, status_area, &ComponentContext::default());
    }

    fn render_page(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        let scroll = self.doc.scroll_y() as i32;
        let origin = area.y as i32 - scroll;
        let bold = Style::default().add_modifier(Modifier::BOLD);
        for (i, line) in INTRO.lines().enumerate() {
            let style = if i == 0 { bold } else { Style::default() };
            frame.set_line(area.x + 1, origin + i as i32, line, style);
        }

        let before_top = Self::intro_rows() + 1;
        let before_height = self.before.height();
        render_section(&mut self.before, frame, area, origin, before_top, before_height);
        self.render_region_frame(frame, area, origin);
        let (top, height) = (self.region_top, self.region_height);
        render_section(&mut self.region, frame, area, origin, top, height);
        let (top, height) = (self.after_top, self.after.height());
        render_section(&mut self.after, frame, area, origin, top, height);

        let help_top = self.after_top + self.after.height() + 1;
        for (i, line) in self.help.iter().enumerate() {
            let style = if i == 0 { bold } else { Style::default() };
            frame.set_line(area.x + 1, origin + (help_top as usize + i) as i32, line, style);
        }
    }

    /// Left rule marking the region's rows, labelled with its class list.
    fn render_region_frame(&self, frame: &mut UiFrame<'_>, area: Rect, origin: i32) {
        let top = origin + self.region_top as i32;
        let style = theme::section_border_style();
        for row in 0..self.region_height as i32 {
            frame.set_line(area.x, top + row, "│", style);
        }
        let props = self.region.props();
        let mut label = props.classes();
        if props.aria_busy() {
            label.push_str(" [busy]");
        }
        if !label.is_empty() {
            let x = area.x + area.width.saturating_sub(label.len() as u16 + 1);
            frame.set_line(x, top, &label, style);
        }
    }
}

/// Render `section` into the rows it occupies, passing the rows scrolled off
/// above the viewport as the clip.
fn render_section<C: Component>(
    section: &mut C,
    frame: &mut UiFrame<'_>,
    area: Rect,
    origin: i32,
    top: u16,
    height: u16,
) {
    let screen_top = origin + top as i32;
    let Some(visible) = row_rect(
        area.x + 1,
        area.width.saturating_sub(1),
        screen_top,
        height as i32,
        area,
    ) else {
        return;
    };
    let clip_top = (visible.y as i32 - screen_top).max(0) as u16;
    section.render(
        frame,
        visible,
        &ComponentContext::default().with_clip_top(clip_top),
    );
}
