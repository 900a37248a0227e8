use super::app_state::{ChooserEvent, ChooserRow, Exit, Focus, KeyOutcome, LineEdit, TextField};
use crate::selection::{ChooserOutcome, SelectionModel};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(super) fn prepare_rows(candidates: &[String]) -> Vec<ChooserRow> {
    candidates
        .iter()
        .enumerate()
        .map(|(pos, path)| ChooserRow {
            index: pos + 1,
            label: path.clone(),
        })
        .collect()
}

pub struct ChooserApp {
    pub(super) title: String,
    pub(super) candidates: Vec<String>,
    pub(super) rows: Vec<ChooserRow>,
    pub(super) model: SelectionModel,
    /// Free-text view of the selection. Checkbox changes rewrite it; typing
    /// into it does not touch the checkboxes.
    pub(super) selected_text: LineEdit,
    pub(super) exec_text: LineEdit,
    pub(super) focus: Focus,
    pub(super) current_row: usize,
    pub(super) scroll_offset: usize,
    pub(super) list_viewport_height: usize,
    pub(super) exit: Option<Exit>,
}

impl ChooserApp {
    pub fn new(title: &str, candidates: &[String], enqueue: bool, exec_cmd: &str) -> Self {
        ChooserApp {
            title: title.to_string(),
            candidates: candidates.to_vec(),
            rows: prepare_rows(candidates),
            model: SelectionModel::new(candidates.len(), enqueue, None),
            selected_text: LineEdit::default(),
            exec_text: LineEdit::new(exec_cmd),
            focus: Focus::List,
            current_row: 0,
            scroll_offset: 0,
            list_viewport_height: 0, // set by ui_renderer
            exit: None,
        }
    }

    pub(super) fn is_finished(&self) -> bool {
        self.exit.is_some()
    }

    pub(super) fn handle_event(&mut self, event: ChooserEvent) {
        match event {
            ChooserEvent::Key(key) => match self.offer_key_to_focused(key) {
                KeyOutcome::Consumed => {}
                KeyOutcome::Emit(follow_up) => self.handle_event(follow_up),
                KeyOutcome::Ignored => self.handle_unconsumed_key(key),
            },
            ChooserEvent::ScrollUp => self.move_focus_clamped(-1),
            ChooserEvent::ScrollDown => self.move_focus_clamped(1),
            ChooserEvent::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                self.ensure_selection_is_visible_in_viewport();
            }
            ChooserEvent::CheckboxToggled { index, new_state } => {
                if self.model.toggle(index, new_state) {
                    self.selected_text.set_text(self.model.render_as_text());
                }
            }
            ChooserEvent::TextEdited(TextField::Selected) => {
                log::debug!("selection text edited: {:?}", self.selected_text.text);
            }
            ChooserEvent::TextEdited(TextField::Exec) => {}
        }
    }

    fn offer_key_to_focused(&mut self, key: KeyEvent) -> KeyOutcome {
        match self.focus {
            Focus::List => self.list_key(key),
            Focus::Queue => match key.code {
                KeyCode::Char(' ') => {
                    self.toggle_enqueue();
                    KeyOutcome::Consumed
                }
                _ => KeyOutcome::Ignored,
            },
            Focus::Selected => edit_outcome(
                self.selected_text.handle_key(key),
                TextField::Selected,
            ),
            Focus::Exec => edit_outcome(self.exec_text.handle_key(key), TextField::Exec),
        }
    }

    fn list_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_focus_clamped(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_focus_clamped(-1),
            KeyCode::PageDown => self.move_focus_clamped(self.page_size()),
            KeyCode::PageUp => self.move_focus_clamped(-self.page_size()),
            KeyCode::Home => self.jump_to_top(),
            KeyCode::End => self.jump_to_bottom(),
            KeyCode::Char(' ') => match self.rows.get(self.current_row) {
                Some(row) => {
                    return KeyOutcome::Emit(ChooserEvent::CheckboxToggled {
                        index: row.index,
                        new_state: !self.model.is_selected(row.index),
                    });
                }
                None => return KeyOutcome::Ignored,
            },
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Consumed
    }

    fn handle_unconsumed_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.exit = Some(Exit::Cancelled);
            }
            KeyCode::Esc => {
                // Uncommitted typing in the selection field is dropped.
                self.selected_text.set_text(self.model.render_as_text());
                self.exit = Some(Exit::Done);
            }
            KeyCode::Enter => {
                if let Some(index) = self.rows.get(self.current_row).map(|row| row.index) {
                    self.handle_event(ChooserEvent::CheckboxToggled {
                        index,
                        new_state: true,
                    });
                }
                self.exit = Some(Exit::Done);
            }
            KeyCode::Char('q') | KeyCode::Char('Q')
                if !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.toggle_enqueue();
            }
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Down => self.move_focus_clamped(1),
            KeyCode::Up => self.move_focus_clamped(-1),
            _ => {}
        }
    }

    pub(super) fn toggle_enqueue(&mut self) {
        self.model.enqueue = !self.model.enqueue;
    }

    fn page_size(&self) -> isize {
        self.list_viewport_height.max(1) as isize
    }

    pub(super) fn move_focus_clamped(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.current_row = self.current_row.saturating_add_signed(delta).min(last);
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn jump_to_top(&mut self) {
        self.current_row = 0;
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn jump_to_bottom(&mut self) {
        self.current_row = self.rows.len().saturating_sub(1);
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn ensure_selection_is_visible_in_viewport(&mut self) {
        if self.rows.is_empty() || self.list_viewport_height == 0 {
            self.scroll_offset = 0;
            return;
        }
        let list_height = self.list_viewport_height;
        if self.current_row < self.scroll_offset {
            self.scroll_offset = self.current_row;
        } else if self.current_row >= self.scroll_offset + list_height {
            self.scroll_offset = self.current_row + 1 - list_height;
        }

        let num_rows = self.rows.len();
        if num_rows <= list_height {
            self.scroll_offset = 0;
        } else {
            self.scroll_offset = self.scroll_offset.min(num_rows - list_height);
        }
    }

    /// Build the caller-facing result.
    ///
    /// The selection comes from the text field, so direct edits made before
    /// Enter count. Entries that do not name a candidate are logged and
    /// skipped; a `q` in the text switches on enqueue mode.
    pub fn outcome(&self) -> ChooserOutcome {
        let override_command = Some(self.exec_text.text.clone());
        if self.exit == Some(Exit::Cancelled) {
            return ChooserOutcome {
                paths: Vec::new(),
                enqueue: self.model.enqueue,
                override_command: SelectionModel::new(0, false, override_command)
                    .override_command,
            };
        }

        let mut result = SelectionModel::new(
            self.candidates.len(),
            self.model.enqueue,
            override_command,
        );
        let text = result.apply_queue_hint(&self.selected_text.text);
        for diagnostic in result.replace_from_text(&text) {
            log::warn!("{} (of {})", diagnostic, self.candidates.len());
        }
        result.into_outcome(&self.candidates)
    }
}

fn edit_outcome(edit: Option<bool>, field: TextField) -> KeyOutcome {
    match edit {
        None => KeyOutcome::Ignored,
        Some(false) => KeyOutcome::Consumed,
        Some(true) => KeyOutcome::Emit(ChooserEvent::TextEdited(field)),
    }
}
