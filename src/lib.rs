//! Internal library crate for folio.
//!
//! The shipped application is the `folio` binary (`src/main.rs`).
//!
//! This library exists to share code between targets (binary, tests) and to keep modules organized.
//! The [core] module (locators, loading and saving, editing-mode selection, the line window and
//! the recent files store) is what the integration tests use. This API is not considered a
//! library for external use.

pub mod app;
pub mod config;
pub mod core;
pub mod ui;
pub mod utils;
