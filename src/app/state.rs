//! Application State and main controller module for folio.
//!
//! [AppState] is the explicit session context passed to the terminal loop and the renderer.
//! It holds:
//! - Configuration and keymap
//! - The current screen: main menu (recent files) or editor (one [EditorState])
//! - Prompt input state and the overlay stack
//! - The worker channels and the ids of the open/save requests still being waited on
//!
//! Worker results are applied in [AppState::tick]. An open result is used only if its id is the
//! one the app is still waiting for; going back to the menu forgets that id so a late result is
//! dropped instead of replacing the screen.

use crate::app::actions::ActionContext;
use crate::app::editor::EditorState;
use crate::app::keymap::Keymap;
use crate::app::menu::MenuState;
use crate::config::Config;
use crate::config::integrations::build_registry;
use crate::core::loader::ContentLoader;
use crate::core::locator::Locator;
use crate::core::mime::accepts_mime;
use crate::core::mode::EditingMode;
use crate::core::recent::RecentFiles;
use crate::core::worker::{WorkerResponse, WorkerTask, Workers};
use crate::ui::overlays::{Overlay, OverlayStack};

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long transient messages stay on screen.
pub(crate) const MESSAGE_DURATION: Duration = Duration::from_secs(4);

/// Result of processing a single keypress.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KeypressResult {
    Continue,
    Consumed,
    Quit,
}

pub(crate) enum Screen {
    Menu,
    Editor(Box<EditorState>),
}

pub(crate) struct AppState<'a> {
    pub(super) config: &'a Config,
    pub(super) keymap: Keymap,

    pub(super) loader: Arc<ContentLoader>,
    pub(super) workers: Workers,

    pub(super) screen: Screen,
    pub(super) menu: MenuState,
    pub(super) actions: ActionContext,
    pub(super) overlays: OverlayStack,

    next_request_id: u64,
    /// Open request whose result is still wanted.
    pub(super) open_request: Option<(u64, Locator)>,
    /// Save request in flight with the editor revision it captured.
    pub(super) save_request: Option<(u64, u64)>,
    /// Set after a first "back" or "quit" with unsaved changes.
    pub(super) confirm_discard: bool,

    pub(super) notification_time: Option<Instant>,
    pub(super) page_height: usize,
}

impl<'a> AppState<'a> {
    /// Builds the app with recent files and the log under `data_dir`.
    pub(crate) fn new(config: &'a Config, data_dir: &Path) -> Self {
        let recents = Arc::new(RecentFiles::in_dir(
            data_dir,
            config.general().max_recent_files(),
        ));
        let loader = Arc::new(ContentLoader::new(
            build_registry(config.providers()),
            recents,
            config.limits().load_limits(),
        ));
        let workers = Workers::spawn(Arc::clone(&loader));

        let mut app = Self {
            config,
            keymap: Keymap::from_keys(config.keys()),
            loader,
            workers,
            screen: Screen::Menu,
            menu: MenuState::default(),
            actions: ActionContext::default(),
            overlays: OverlayStack::new(),
            next_request_id: 0,
            open_request: None,
            save_request: None,
            confirm_discard: false,
            notification_time: None,
            page_height: 20,
        };
        app.refresh_menu();
        app
    }

    // Getters/ accessors

    #[inline]
    pub(crate) fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub(crate) fn screen(&self) -> &Screen {
        &self.screen
    }

    #[inline]
    pub(crate) fn menu(&self) -> &MenuState {
        &self.menu
    }

    #[inline]
    pub(crate) fn actions(&self) -> &ActionContext {
        &self.actions
    }

    #[inline]
    pub(crate) fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }

    #[inline]
    pub(crate) fn recents(&self) -> &RecentFiles {
        self.loader.recents()
    }

    pub(crate) fn editor(&self) -> Option<&EditorState> {
        match &self.screen {
            Screen::Editor(editor) => Some(editor),
            Screen::Menu => None,
        }
    }

    pub(crate) fn editor_mut(&mut self) -> Option<&mut EditorState> {
        match &mut self.screen {
            Screen::Editor(editor) => Some(editor),
            Screen::Menu => None,
        }
    }

    /// The locator being opened, while an open is pending.
    pub(crate) fn pending_open(&self) -> Option<&Locator> {
        self.open_request.as_ref().map(|(_, loc)| loc)
    }

    pub(crate) fn is_saving(&self) -> bool {
        self.save_request.is_some()
    }

    /// Whether to draw the loading indicator.
    pub(crate) fn is_loading(&self) -> bool {
        self.open_request.is_some() || self.save_request.is_some() || self.workers.is_busy()
    }

    /// Rows available to the editor body, set by the renderer for paging keys.
    pub(crate) fn set_page_height(&mut self, height: usize) {
        self.page_height = height.max(1);
    }

    fn next_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    // Requests

    /// Starts loading `locator`. Replaces any open that is still pending.
    pub(crate) fn request_open(&mut self, locator: Locator) {
        let request_id = self.next_request_id();
        log::info!("opening {} (request {})", locator, request_id);
        self.open_request = Some((request_id, locator.clone()));
        if !self.workers.submit(WorkerTask::Open {
            locator,
            request_id,
        }) {
            self.open_request = None;
            self.push_message("Background worker is not running".into());
        }
    }

    /// Opens a locator given as text, as from the command line. A MIME type hint outside the
    /// accepted set makes folio ignore the request.
    pub(crate) fn request_open_external(&mut self, raw: &str, mime: Option<&str>) {
        if let Some(mime) = mime
            && !accepts_mime(mime)
        {
            log::warn!("ignoring open request for {} with type {}", raw, mime);
            self.push_message(format!("Cannot open files of type {mime}"));
            return;
        }
        match Locator::parse(raw) {
            Ok(locator) => self.request_open(locator),
            Err(e) => {
                log::warn!("{}", e);
                self.push_message(format!("{}: {}", e.category(), raw.trim()));
            }
        }
    }

    /// Sends the editor's text to be written.
    pub(crate) fn request_save(&mut self) {
        if self.save_request.is_some() {
            self.push_message("A save is already in progress".into());
            return;
        }
        let request_id = self.next_request_id();
        let Some(editor) = self.editor_mut() else {
            return;
        };
        let Some(content) = editor.text_for_save() else {
            self.push_message("This document is view only and cannot be saved".into());
            return;
        };
        let revision = editor.revision();
        let locator = editor.session().locator().clone();

        if self.workers.submit(WorkerTask::Save {
            locator,
            content,
            request_id,
        }) {
            self.save_request = Some((request_id, revision));
        } else {
            self.push_message("Background worker is not running".into());
        }
    }

    /// Leaves the editor (or abandons a pending open) and returns to the main menu.
    pub(crate) fn go_back(&mut self) {
        if let Some((id, locator)) = self.open_request.take() {
            log::debug!("abandoning open of {} (request {})", locator, id);
        }
        self.screen = Screen::Menu;
        self.save_request = None;
        self.confirm_discard = false;
        self.overlays.retain(|o| matches!(o, Overlay::Message { .. }));
        self.refresh_menu();
    }

    pub(crate) fn refresh_menu(&mut self) {
        let entries = self.loader.recents().list();
        self.menu.set_entries(entries);
    }

    /// Updates state from the clock and the worker.
    ///
    /// Returns whether anything visible changed.
    pub(crate) fn tick(&mut self) -> bool {
        let mut changed = false;

        if let Some(expiry) = self.notification_time
            && Instant::now() >= expiry
        {
            self.notification_time = None;
            self.overlays.retain(|o| !matches!(o, Overlay::Message { .. }));
            changed = true;
        }

        while let Ok(response) = self.workers.response_rx().try_recv() {
            log::trace!("worker answered request {}", response.request_id());
            changed = true;
            self.apply_response(response);
        }

        changed
    }

    pub(crate) fn apply_response(&mut self, response: WorkerResponse) {
        match response {
            WorkerResponse::Opened {
                session,
                request_id,
            } => {
                if self.open_request.as_ref().map(|(id, _)| *id) != Some(request_id) {
                    log::debug!("dropping stale open result {}", request_id);
                    return;
                }
                self.open_request = None;
                self.save_request = None;
                self.confirm_discard = false;

                let editor = EditorState::new(*session, self.config.limits().thresholds());
                let name = editor.session().display_name().to_string();
                self.overlays.retain(|o| matches!(o, Overlay::Message { .. }));
                match editor.mode() {
                    EditingMode::ViewOnly if editor.session().is_large_file() => {
                        self.overlays.push(Overlay::LargeFile {
                            name,
                            preview_lines: self.loader.limits().preview_lines,
                        });
                    }
                    EditingMode::WarnLongLine => {
                        self.overlays.push(Overlay::LongLineWarning {
                            name,
                            max_line_length: editor.session().metrics().max_line_length,
                        });
                    }
                    _ => {}
                }
                self.screen = Screen::Editor(Box::new(editor));
                self.refresh_menu();
            }

            WorkerResponse::OpenFailed {
                locator,
                error,
                request_id,
            } => {
                if self.open_request.as_ref().map(|(id, _)| *id) != Some(request_id) {
                    log::debug!("dropping stale open failure {}", request_id);
                    return;
                }
                self.open_request = None;
                if error.is_load_failure() {
                    self.overlays.push(Overlay::LoadFailed {
                        locator,
                        title: error.category().to_string(),
                        body: error.recovery_hint().to_string(),
                    });
                } else {
                    self.push_message(format!("{}: {}", error.category(), error));
                }
            }

            WorkerResponse::Saved {
                locator,
                content,
                request_id,
            } => {
                let Some((id, revision)) = self.save_request else {
                    return;
                };
                if id != request_id {
                    return;
                }
                self.save_request = None;
                if let Some(editor) = self.editor_mut()
                    && editor.session().locator() == &locator
                {
                    editor.mark_saved(content, revision);
                    let name = editor.session().display_name().to_string();
                    self.push_message(format!("Saved {name}"));
                }
            }

            WorkerResponse::SaveFailed {
                error, request_id, ..
            } => {
                if self.save_request.map(|(id, _)| id) != Some(request_id) {
                    return;
                }
                self.save_request = None;
                self.push_message(format!("{}: {}", error.category(), error.recovery_hint()));
            }
        }
    }

    /// Shows a transient message, replacing a message already on top.
    pub(crate) fn push_message(&mut self, text: String) {
        self.notification_time = Some(Instant::now() + MESSAGE_DURATION);
        if matches!(self.overlays.top(), Some(Overlay::Message { .. })) {
            self.overlays.pop();
        }
        self.overlays.push(Overlay::Message { text });
    }
}

// AppState tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::{Content, FileSession};
    use crate::core::error::Error;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn session(path: PathBuf, text: &str) -> Box<FileSession> {
        Box::new(FileSession::new(
            Locator::File(path),
            "doc.txt".into(),
            None,
            Some(text.len() as u64),
            Content::Full(text.into()),
        ))
    }

    /// Waits for the worker and applies everything it sends.
    fn settle(app: &mut AppState) -> Result<(), Box<dyn std::error::Error>> {
        let response = app
            .workers
            .response_rx()
            .recv_timeout(Duration::from_secs(2))?;
        app.apply_response(response);
        app.tick();
        Ok(())
    }

    #[test]
    fn open_result_for_abandoned_request_is_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::default();
        let data = tempdir()?;
        let mut app = AppState::new(&config, data.path());

        app.open_request = Some((3, Locator::File("/x/a.txt".into())));
        app.go_back();
        app.apply_response(WorkerResponse::Opened {
            session: session("/x/a.txt".into(), "late"),
            request_id: 3,
        });
        assert!(app.editor().is_none());

        app.open_request = Some((5, Locator::File("/x/b.txt".into())));
        app.apply_response(WorkerResponse::Opened {
            session: session("/x/a.txt".into(), "older request"),
            request_id: 4,
        });
        assert!(app.editor().is_none());
        assert!(app.pending_open().is_some());

        app.apply_response(WorkerResponse::Opened {
            session: session("/x/b.txt".into(), "current"),
            request_id: 5,
        });
        assert_eq!(app.editor().map(|e| e.session().text()), Some("current"));
        assert!(app.pending_open().is_none());
        Ok(())
    }

    #[test]
    fn load_failure_offers_recovery() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::default();
        let data = tempdir()?;
        let mut app = AppState::new(&config, data.path());
        let locator = Locator::File("/gone.txt".into());

        app.open_request = Some((1, locator.clone()));
        app.apply_response(WorkerResponse::OpenFailed {
            locator: locator.clone(),
            error: Error::NotFound {
                locator: locator.to_string(),
            },
            request_id: 1,
        });
        match app.overlays().top_blocking() {
            Some(Overlay::LoadFailed { title, .. }) => assert_eq!(title, "File Not Found"),
            other => panic!("expected load failure dialog, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn open_and_save_through_the_worker() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::default();
        let data = tempdir()?;
        let docs = tempdir()?;
        let path = docs.path().join("note.txt");
        fs::write(&path, "hello")?;

        let mut app = AppState::new(&config, data.path());
        app.request_open(Locator::File(path.clone()));
        assert!(app.is_loading());
        settle(&mut app)?;

        assert_eq!(app.menu().entries().len(), 1);
        let editor = app.editor_mut().ok_or("editor should be open")?;
        assert_eq!(editor.mode(), EditingMode::Full);
        editor.handle_key(
            crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Char('!'),
                crossterm::event::KeyModifiers::NONE,
            ),
            10,
        );
        assert!(editor.is_dirty());

        app.request_save();
        assert!(app.is_saving());
        settle(&mut app)?;

        assert!(!app.is_saving());
        assert_eq!(fs::read_to_string(&path)?, "!hello");
        assert!(!app.editor().ok_or("editor should stay open")?.is_dirty());
        Ok(())
    }

    #[test]
    fn rejected_mime_type_is_ignored() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::default();
        let data = tempdir()?;
        let mut app = AppState::new(&config, data.path());

        app.request_open_external("/tmp/photo.png", Some("image/png"));
        assert!(app.pending_open().is_none());
        assert!(matches!(app.overlays().top(), Some(Overlay::Message { .. })));

        app.request_open_external("ftp://host/file.txt", None);
        assert!(app.pending_open().is_none());
        Ok(())
    }

    #[test]
    fn tick_clears_expired_message() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::default();
        let data = tempdir()?;
        let mut app = AppState::new(&config, data.path());
        app.push_message("hi".into());
        app.notification_time = Some(Instant::now() - Duration::from_secs(1));
        assert!(app.tick());
        assert!(app.overlays().is_empty());
        Ok(())
    }

    fn type_char(app: &mut AppState, c: char) {
        if let Some(editor) = app.editor_mut() {
            editor.handle_key(
                crossterm::event::KeyEvent::new(
                    crossterm::event::KeyCode::Char(c),
                    crossterm::event::KeyModifiers::NONE,
                ),
                10,
            );
        }
    }

    #[test]
    fn failed_save_keeps_full_buffer() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::default();
        let data = tempdir()?;
        let docs = tempdir()?;
        let dir = docs.path().join("sub");
        fs::create_dir(&dir)?;
        let path = dir.join("note.txt");
        fs::write(&path, "hello")?;

        let mut app = AppState::new(&config, data.path());
        app.request_open(Locator::File(path.clone()));
        settle(&mut app)?;
        type_char(&mut app, '!');

        fs::remove_dir_all(&dir)?;
        app.request_save();
        settle(&mut app)?;

        assert!(!app.is_saving());
        assert!(matches!(app.overlays().top(), Some(Overlay::Message { .. })));
        let editor = app.editor_mut().ok_or("editor should stay open")?;
        assert!(editor.is_dirty());
        assert_eq!(editor.text_for_save().as_deref(), Some("!hello"));
        Ok(())
    }

    #[test]
    fn failed_save_keeps_windowed_edits() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::default();
        let data = tempdir()?;
        let mut app = AppState::new(&config, data.path());

        let text = (0..1200).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let path = PathBuf::from("/x/big.txt");
        app.open_request = Some((1, Locator::File(path.clone())));
        app.apply_response(WorkerResponse::Opened {
            session: session(path.clone(), &text),
            request_id: 1,
        });
        assert_eq!(app.editor().map(|e| e.mode()), Some(EditingMode::Windowed));
        type_char(&mut app, '>');

        let revision = app.editor().map(|e| e.revision()).ok_or("editor should be open")?;
        app.save_request = Some((2, revision));
        app.apply_response(WorkerResponse::SaveFailed {
            locator: Locator::File(path.clone()),
            error: Error::from_write(
                &path.display().to_string(),
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ),
            request_id: 2,
        });

        assert!(!app.is_saving());
        assert!(matches!(app.overlays().top(), Some(Overlay::Message { .. })));
        let editor = app.editor_mut().ok_or("editor should stay open")?;
        assert!(editor.is_dirty());
        let saved = editor.text_for_save().ok_or("windowed text should be saveable")?;
        assert!(saved.starts_with(">line 0\nline 1\n"));
        assert_eq!(saved.lines().count(), 1200);
        Ok(())
    }
}
