use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Filters raw terminal events down to what the key bindings expect.
///
/// Only presses survive (Windows reports releases and repeats too), shifted
/// characters lose the redundant SHIFT flag, and Shift+Tab becomes BackTab.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer;

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.kind != KeyEventKind::Press {
                    return None;
                }
                match key.code {
                    KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                        key.code = KeyCode::BackTab;
                        key.modifiers.remove(KeyModifiers::SHIFT);
                    }
                    KeyCode::Char(_) => key.modifiers.remove(KeyModifiers::SHIFT),
                    _ => {}
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}
