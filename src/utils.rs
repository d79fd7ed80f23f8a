//! Miscellaneous utility functions for folio.
//!
//! - [cli]: command line parsing, help and config initialization.
//! - [helpers]: home paths, unused file names, the data directory and display formatting.
//! - [logging]: the file logger.

pub mod cli;
pub mod helpers;
pub mod logging;

pub use helpers::{
    clamp_recent_files, expand_home_path, format_file_size, get_home, get_unused_path,
    resolve_data_dir, shorten_home_path, truncate_to_width,
};
