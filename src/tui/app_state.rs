use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One checkbox row, bound to a 1-based candidate index.
#[derive(Debug, Clone)]
pub struct ChooserRow {
    pub index: usize,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Focus {
    List,
    Selected,
    Queue,
    Exec,
}

impl Focus {
    pub(super) fn next(self) -> Self {
        match self {
            Focus::List => Focus::Selected,
            Focus::Selected => Focus::Queue,
            Focus::Queue => Focus::Exec,
            Focus::Exec => Focus::List,
        }
    }

    pub(super) fn previous(self) -> Self {
        match self {
            Focus::List => Focus::Exec,
            Focus::Selected => Focus::List,
            Focus::Queue => Focus::Selected,
            Focus::Exec => Focus::Queue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TextField {
    Selected,
    Exec,
}

/// Everything the chooser reacts to. Raw terminal input arrives as `Key`,
/// `ScrollUp`/`ScrollDown` or `Resize`; widgets answer a key with
/// `CheckboxToggled` or `TextEdited`, which go through the same dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ChooserEvent {
    Key(KeyEvent),
    ScrollUp,
    ScrollDown,
    Resize(u16, u16),
    CheckboxToggled { index: usize, new_state: bool },
    TextEdited(TextField),
}

/// How a focused widget dealt with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum KeyOutcome {
    Ignored,
    Consumed,
    Emit(ChooserEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Exit {
    Done,
    Cancelled,
}

/// Single-line editable text with a char-based cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct LineEdit {
    pub(super) text: String,
    pub(super) cursor: usize,
}

impl LineEdit {
    pub(super) fn new(text: &str) -> Self {
        LineEdit {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    /// Replace the whole contents and park the cursor at the end.
    pub(super) fn set_text(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.text = text;
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Apply an editing key. Returns `None` if the key is not an editing key,
    /// otherwise whether the text changed.
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> Option<bool> {
        let len = self.text.chars().count();
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let at = self.byte_offset(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
                Some(true)
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return Some(false);
                }
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
                Some(true)
            }
            KeyCode::Delete => {
                if self.cursor >= len {
                    return Some(false);
                }
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
                Some(true)
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Some(false)
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(len);
                Some(false)
            }
            KeyCode::Home => {
                self.cursor = 0;
                Some(false)
            }
            KeyCode::End => {
                self.cursor = len;
                Some(false)
            }
            _ => None,
        }
    }
}
