//! Core runtime logic for folio.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [locator], [provider] and [mime]: what a document is and how it is reached.
//! - [loader]: opening (full or preview) and saving documents, see [ContentLoader].
//! - [mode] and [window]: editing-mode selection and the windowed line editor.
//! - [recent]: the persisted recent-files history.
//! - [worker]: background I/O and message passing back into the app state.
//! - [terminal]: terminal setup/teardown and the main crossterm/ratatui event loop.
//! - [share]: handing a document to an external command.

pub mod error;
pub mod loader;
pub mod locator;
pub mod mime;
pub mod mode;
pub mod provider;
pub mod recent;
pub mod share;
pub mod terminal;
pub mod window;
pub mod worker;

pub use error::{Error, Result};
pub use loader::{Content, ContentLoader, FileSession, LoadLimits, is_large_file};
pub use locator::Locator;
pub use mime::{accepts_mime, guess_mime};
pub use mode::{DocumentMetrics, EditingMode, LongLineChoice, ModeThresholds, select_mode};
pub use provider::{ContentProvider, DirectoryProvider, ProviderRegistry};
pub use recent::{RecentFile, RecentFiles};
pub use share::{CommandShare, ShareTarget};
pub use window::LineWindow;
