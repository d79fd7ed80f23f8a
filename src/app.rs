//! Application layer for folio.
//!
//! - [state]: [AppState], the session context passed to the terminal loop and the renderer.
//! - [handlers]: key handling for prompts, dialogs, the main menu and the editor.
//! - [editor]: the editor screen and its surfaces (full buffer, windowed buffer, viewer).
//! - [menu]: the recent files list on the main menu.
//! - [actions]: prompt input state.
//! - [keymap]: configured keys to actions.

pub(crate) mod actions;
pub(crate) mod editor;
pub(crate) mod handlers;
pub(crate) mod keymap;
pub(crate) mod menu;
pub(crate) mod state;

pub(crate) use editor::{Surface, TextBuffer, Viewer};
pub(crate) use state::{AppState, KeypressResult, Screen};
