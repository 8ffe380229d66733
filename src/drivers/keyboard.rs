use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Normalizes raw keyboard events: Shift+Tab becomes BackTab, and release
/// events are dropped unless the terminal was asked to report them and the
/// caller wants them (the boundary markers react to key-up as well).
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
    keep_releases: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_releases(keep_releases: bool) -> Self {
        Self {
            esc_down: false,
            keep_releases,
        }
    }

    pub fn keeps_releases(&self) -> bool {
        self.keep_releases
    }

    pub fn set_keep_releases(&mut self, keep: bool) {
        self.keep_releases = keep;
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                    key.code = KeyCode::BackTab;
                    key.modifiers.remove(KeyModifiers::SHIFT);
                }
                match key.kind {
                    KeyEventKind::Release => {
                        if key.code == KeyCode::Esc {
                            self.esc_down = false;
                        }
                        if !self.keep_releases {
                            return None;
                        }
                    }
                    KeyEventKind::Repeat if cfg!(windows) => return None,
                    _ => {}
                }
                // Windows reports a held Esc as a stream of presses.
                if cfg!(windows) && key.kind == KeyEventKind::Press {
                    if key.code == KeyCode::Esc {
                        if self.esc_down {
                            return None;
                        }
                        self.esc_down = true;
                    } else {
                        self.esc_down = false;
                    }
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        let mut key = KeyEvent::new(code, modifiers);
        key.kind = kind;
        Event::Key(key)
    }

    #[test]
    fn tab_with_shift_becomes_backtab() {
        let mut norm = KeyboardNormalizer::new();
        let out = norm
            .normalize(key(KeyCode::Tab, KeyModifiers::SHIFT, KeyEventKind::Press))
            .expect("should return event");
        if let Event::Key(k) = out {
            assert!(matches!(k.code, KeyCode::BackTab));
            assert!(!k.modifiers.contains(KeyModifiers::SHIFT));
        } else {
            panic!("expected key event");
        }
    }

    #[test]
    fn release_dropped_by_default() {
        let mut norm = KeyboardNormalizer::new();
        let out = norm.normalize(key(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert!(out.is_none());
    }

    #[test]
    fn release_kept_when_requested() {
        let mut norm = KeyboardNormalizer::with_releases(true);
        assert!(norm.keeps_releases());
        let out = norm.normalize(key(KeyCode::Tab, KeyModifiers::SHIFT, KeyEventKind::Release));
        match out {
            Some(Event::Key(k)) => {
                assert_eq!(k.code, KeyCode::BackTab);
                assert_eq!(k.kind, KeyEventKind::Release);
            }
            other => panic!("expected release, got {other:?}"),
        }
    }

    #[test]
    fn non_key_events_pass_through() {
        let mut norm = KeyboardNormalizer::new();
        assert!(norm.normalize(Event::Resize(10, 20)).is_some());
    }
}
