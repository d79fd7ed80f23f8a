//! Input action handler methods for folio.
//!
//! This module implements [AppState] methods that process key events: prompts (open, new file,
//! rename), dialog answers, main menu actions and editor actions.

use crate::app::actions::InputMode;
use crate::app::keymap::{Action, EditorAction, MenuAction, SystemAction};
use crate::app::state::{AppState, KeypressResult, Screen};
use crate::core::locator::Locator;
use crate::core::mode::LongLineChoice;
use crate::core::share::ShareTarget;
use crate::ui::overlays::Overlay;
use crate::utils::{expand_home_path, format_file_size, get_unused_path};

use crossterm::event::{KeyCode::*, KeyEvent};
use std::fs::OpenOptions;

/// AppState input and action handlers
impl<'a> AppState<'a> {
    /// Entry point for a key press.
    ///
    /// Order: the open prompt, then the topmost dialog, then the bound actions of the current
    /// screen, then (in the editor) the text surface.
    pub(crate) fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if self.actions.is_input_mode() {
            return self.handle_input_mode(key);
        }

        if self.overlays.top_blocking().is_some() {
            return self.handle_overlay_key(key);
        }

        match self.screen {
            Screen::Menu => match self.keymap.lookup_menu(key) {
                Some(action) => self.dispatch(action),
                None if key.code == Esc && self.pending_open().is_some() => {
                    self.go_back();
                    self.push_message("Open cancelled".into());
                    KeypressResult::Consumed
                }
                None => KeypressResult::Continue,
            },
            Screen::Editor(_) => match self.keymap.lookup_editor(key) {
                Some(action) => self.dispatch(action),
                None => {
                    self.confirm_discard = false;
                    let page = self.page_height;
                    if self.editor_mut().is_some_and(|e| e.handle_key(key, page)) {
                        KeypressResult::Consumed
                    } else {
                        KeypressResult::Continue
                    }
                }
            },
        }
    }

    fn dispatch(&mut self, action: Action) -> KeypressResult {
        let discard_pending = self.confirm_discard;
        self.confirm_discard = false;

        match action {
            Action::Menu(menu_act) => self.handle_menu_action(menu_act),
            Action::Editor(editor_act) => self.handle_editor_action(editor_act, discard_pending),
            Action::System(SystemAction::Quit) => {
                if self.ask_discard(discard_pending) {
                    KeypressResult::Quit
                } else {
                    KeypressResult::Consumed
                }
            }
            Action::System(SystemAction::KeyBindHelp) => {
                self.overlays.push(Overlay::KeybindHelp {
                    lines: self.keymap.describe(),
                });
                KeypressResult::Consumed
            }
        }
    }

    /// Returns true when it is fine to drop the open document. Unsaved edits need the same
    /// key twice in a row.
    fn ask_discard(&mut self, already_asked: bool) -> bool {
        let dirty = self.editor().is_some_and(|e| e.is_dirty());
        if !dirty || already_asked {
            return true;
        }
        self.confirm_discard = true;
        self.push_message("Unsaved changes. Press again to discard them".into());
        false
    }

    // Prompts

    /// Handles key events while a prompt is open.
    /// Returns a [KeypressResult] indicating how the key event was handled.
    pub(super) fn handle_input_mode(&mut self, key: KeyEvent) -> KeypressResult {
        let Some(mode) = self.actions.input_mode() else {
            return KeypressResult::Continue;
        };

        match key.code {
            Enter => {
                let text = self.actions.exit_mode();
                match mode {
                    InputMode::OpenLocator => self.open_from_prompt(&text),
                    InputMode::NewFile => self.create_file(&text),
                    InputMode::Rename => self.rename_document(&text),
                }
            }
            Esc => {
                self.actions.exit_mode();
            }
            Left => self.actions.action_move_cursor_left(),
            Right => self.actions.action_move_cursor_right(),
            Home => self.actions.action_cursor_home(),
            End => self.actions.action_cursor_end(),
            Backspace => self.actions.action_backspace_at_cursor(),
            Delete => self.actions.action_delete_at_cursor(),
            Char(c) => self.actions.action_insert_at_cursor(c),
            _ => return KeypressResult::Continue,
        }
        KeypressResult::Consumed
    }

    fn open_from_prompt(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if text.starts_with('~') {
            let path = expand_home_path(text);
            self.request_open(Locator::File(path));
        } else {
            self.request_open_external(text, None);
        }
    }

    /// Creates an empty file at the typed path (or the next free name) and opens it.
    fn create_file(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let expanded = expand_home_path(text);
        let locator = match Locator::parse(&expanded.to_string_lossy()) {
            Ok(loc) => loc,
            Err(e) => {
                self.push_message(format!("{}: {}", e.category(), text));
                return;
            }
        };
        let Some(path) = locator.as_path() else {
            self.push_message("New files can only be created on disk".into());
            return;
        };

        let path = get_unused_path(path);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                log::info!("created {}", path.display());
                self.request_open(Locator::File(path));
            }
            Err(e) => {
                log::warn!("could not create {}: {}", path.display(), e);
                self.push_message(format!("Could not create file: {e}"));
            }
        }
    }

    fn rename_document(&mut self, name: &str) {
        let loader = std::sync::Arc::clone(&self.loader);
        let Some(editor) = self.editor_mut() else {
            return;
        };
        let result = loader.rename(editor.session_mut(), name);
        let new_name = editor.session().display_name().to_string();
        match result {
            Ok(()) => {
                self.refresh_menu();
                self.push_message(format!("Renamed to {new_name}"));
            }
            Err(e) => {
                log::warn!("{}", e);
                self.push_message(format!("Renamed to {new_name}, but {e}"));
            }
        }
    }

    /// Prompt title for rename, with the document details.
    fn rename_prompt(&self) -> String {
        let Some(editor) = self.editor() else {
            return "Rename".into();
        };
        let session = editor.session();
        let metrics = session.metrics();
        format!(
            "Rename ({}, {}, {} lines, longest {})",
            session.mime_type().unwrap_or("Unknown"),
            format_file_size(session.size()),
            metrics.line_count,
            metrics.max_line_length,
        )
    }

    // Dialogs

    /// Answers the topmost dialog.
    pub(super) fn handle_overlay_key(&mut self, key: KeyEvent) -> KeypressResult {
        let Some(top) = self.overlays.top_blocking().cloned() else {
            return KeypressResult::Continue;
        };

        match top {
            Overlay::LargeFile { .. } => {
                if matches!(key.code, Enter | Esc | Char('o') | Char(' ')) {
                    self.overlays.pop_blocking();
                }
            }

            Overlay::LongLineWarning { .. } => {
                let choice = match key.code {
                    Char('e') | Enter => LongLineChoice::EditAnyway,
                    Char('v') | Esc => LongLineChoice::ViewOnly,
                    _ => return KeypressResult::Consumed,
                };
                self.overlays.pop_blocking();
                if let Some(editor) = self.editor_mut() {
                    editor.resolve_long_line(choice);
                }
            }

            Overlay::LoadFailed { locator, .. } => match key.code {
                Char('r') => {
                    self.overlays.pop_blocking();
                    let initial = match locator.as_path() {
                        Some(path) => path.display().to_string(),
                        None => locator.to_string(),
                    };
                    self.actions
                        .enter_mode(InputMode::OpenLocator, "Re-pick file", initial);
                }
                Char('d') => {
                    self.overlays.pop_blocking();
                    if let Err(e) = self.recents().remove(&locator.to_string()) {
                        log::warn!("{}", e);
                        self.push_message(format!("{}: {}", e.category(), e));
                    }
                    self.refresh_menu();
                }
                Esc | Enter => {
                    self.overlays.pop_blocking();
                }
                _ => {}
            },

            Overlay::KeybindHelp { .. } => {
                self.overlays.pop_blocking();
            }

            Overlay::Message { .. } => return KeypressResult::Continue,
        }
        KeypressResult::Consumed
    }

    // Menu

    fn handle_menu_action(&mut self, action: MenuAction) -> KeypressResult {
        match action {
            MenuAction::GoUp => self.menu.select_prev(),
            MenuAction::GoDown => self.menu.select_next(),
            MenuAction::OpenRecent => {
                if let Some(entry) = self.menu.selected_entry() {
                    let locator = entry.locator().to_string();
                    self.request_open_external(&locator, None);
                }
            }
            MenuAction::OpenFile => {
                self.actions
                    .enter_mode(InputMode::OpenLocator, "Open file", String::new());
            }
            MenuAction::NewFile => {
                self.actions
                    .enter_mode(InputMode::NewFile, "New file", String::new());
            }
            MenuAction::RemoveRecent => {
                let Some(locator) = self.menu.selected_entry().map(|e| e.locator().to_string())
                else {
                    return KeypressResult::Consumed;
                };
                if let Err(e) = self.recents().remove(&locator) {
                    log::warn!("{}", e);
                    self.push_message(format!("{}: {}", e.category(), e));
                }
                self.refresh_menu();
            }
            MenuAction::ClearRecents => {
                if let Err(e) = self.recents().clear() {
                    log::warn!("{}", e);
                    self.push_message(format!("{}: {}", e.category(), e));
                }
                self.refresh_menu();
            }
        }
        KeypressResult::Consumed
    }

    // Editor

    fn handle_editor_action(
        &mut self,
        action: EditorAction,
        discard_pending: bool,
    ) -> KeypressResult {
        match action {
            EditorAction::Save => self.request_save(),
            EditorAction::Rename => {
                let prompt = self.rename_prompt();
                let current = self
                    .editor()
                    .map(|e| e.session().display_name().to_string())
                    .unwrap_or_default();
                self.actions.enter_mode(InputMode::Rename, prompt, current);
            }
            EditorAction::Share => self.share_document(),
            EditorAction::NextWindow | EditorAction::PreviousWindow => {
                let forward = action == EditorAction::NextWindow;
                if let Some(editor) = self.editor_mut()
                    && !editor.page_window(forward)
                    && editor.window_size().is_none()
                {
                    self.push_message("Paging is only available for windowed documents".into());
                }
            }
            EditorAction::Back => {
                if self.ask_discard(discard_pending) {
                    self.go_back();
                }
            }
        }
        KeypressResult::Consumed
    }

    fn share_document(&mut self) {
        let share = self.config.share();
        if !share.is_configured() {
            self.push_message("No share command configured in [share]".into());
            return;
        }
        let target = share.target();

        let Some(editor) = self.editor_mut() else {
            return;
        };
        let content = match editor.text_for_save() {
            Some(text) => text,
            None => editor.session().text().to_string(),
        };
        let title = editor.session().display_name().to_string();

        match target.share(&content, &title) {
            Ok(()) => self.push_message(format!("Shared {title}")),
            Err(e) => {
                log::warn!("{}", e);
                self.push_message(e.to_string());
            }
        }
    }
}
