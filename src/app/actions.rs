//! Prompt input state for folio.
//!
//! Contains the [ActionContext] struct, tracking which prompt is open and the text typed into it.
//! Prompts are the open-file prompt (the picker), the new-file prompt and the rename prompt.

/// Describes the current mode for action handling/input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ActionMode {
    Normal,
    Input { mode: InputMode, prompt: String },
}

/// Enumerates the available prompts.
///
/// * `OpenLocator` - Path or `file://` / `content://` URI to open.
/// * `NewFile` - Path of a new, empty document.
/// * `Rename` - New display name for the open document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputMode {
    OpenLocator,
    NewFile,
    Rename,
}

/// Tracks the current prompt and its input buffer and cursor (a byte offset).
pub(crate) struct ActionContext {
    mode: ActionMode,
    input_buffer: String,
    input_cursor_pos: usize,
}

impl ActionContext {
    pub(crate) fn mode(&self) -> &ActionMode {
        &self.mode
    }

    pub(crate) fn input_mode(&self) -> Option<InputMode> {
        match self.mode {
            ActionMode::Input { mode, .. } => Some(mode),
            ActionMode::Normal => None,
        }
    }

    pub(crate) fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub(crate) fn input_cursor_pos(&self) -> usize {
        self.input_cursor_pos
    }

    pub(crate) fn is_input_mode(&self) -> bool {
        matches!(self.mode, ActionMode::Input { .. })
    }

    pub(crate) fn enter_mode(&mut self, mode: InputMode, prompt: impl Into<String>, initial: String) {
        self.mode = ActionMode::Input {
            mode,
            prompt: prompt.into(),
        };
        self.input_buffer = initial;
        self.input_cursor_pos = self.input_buffer.len();
    }

    /// Leaves the prompt and returns what was typed.
    pub(crate) fn exit_mode(&mut self) -> String {
        self.mode = ActionMode::Normal;
        self.input_cursor_pos = 0;
        std::mem::take(&mut self.input_buffer)
    }

    pub(crate) fn action_move_cursor_left(&mut self) {
        if let Some((prev, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_cursor_pos = prev;
        }
    }

    pub(crate) fn action_move_cursor_right(&mut self) {
        if let Some(c) = self.input_buffer[self.input_cursor_pos..].chars().next() {
            self.input_cursor_pos += c.len_utf8();
        }
    }

    pub(crate) fn action_insert_at_cursor(&mut self, ch: char) {
        self.input_buffer.insert(self.input_cursor_pos, ch);
        self.input_cursor_pos += ch.len_utf8();
    }

    /// Deletes the character before the cursor.
    pub(crate) fn action_backspace_at_cursor(&mut self) {
        if let Some((prev, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_buffer.remove(prev);
            self.input_cursor_pos = prev;
        }
    }

    /// Deletes the character under the cursor.
    pub(crate) fn action_delete_at_cursor(&mut self) {
        if self.input_cursor_pos < self.input_buffer.len() {
            self.input_buffer.remove(self.input_cursor_pos);
        }
    }

    pub(crate) fn action_cursor_home(&mut self) {
        self.input_cursor_pos = 0;
    }

    pub(crate) fn action_cursor_end(&mut self) {
        self.input_cursor_pos = self.input_buffer.len();
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            mode: ActionMode::Normal,
            input_buffer: String::new(),
            input_cursor_pos: 0,
        }
    }
}
