//! Size limits that decide how a document is opened and edited.
//!
//! Every field defaults to the built-in policy constant, so an empty `[limits]` table behaves
//! exactly like no table at all.

use crate::core::loader::{LARGE_FILE_BYTES, LARGE_FILE_PREVIEW_LINES, LoadLimits};
use crate::core::mode::{
    DEFAULT_WINDOW_SIZE, LONG_LINE_CHARS, LONG_LINE_WINDOW_SIZE, ModeThresholds,
    PAGINATION_CHAR_COUNT, PAGINATION_LINE_COUNT,
};

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct Limits {
    large_file_bytes: u64,
    preview_lines: usize,
    long_line_chars: usize,
    pagination_lines: usize,
    pagination_chars: usize,
    window_size: usize,
    long_line_window_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            large_file_bytes: LARGE_FILE_BYTES,
            preview_lines: LARGE_FILE_PREVIEW_LINES,
            long_line_chars: LONG_LINE_CHARS,
            pagination_lines: PAGINATION_LINE_COUNT,
            pagination_chars: PAGINATION_CHAR_COUNT,
            window_size: DEFAULT_WINDOW_SIZE,
            long_line_window_size: LONG_LINE_WINDOW_SIZE,
        }
    }
}

impl Limits {
    pub(crate) fn load_limits(&self) -> LoadLimits {
        LoadLimits {
            large_file_bytes: self.large_file_bytes,
            preview_lines: self.preview_lines.max(1),
        }
    }

    pub(crate) fn thresholds(&self) -> ModeThresholds {
        ModeThresholds {
            long_line_chars: self.long_line_chars,
            pagination_lines: self.pagination_lines,
            pagination_chars: self.pagination_chars,
            window_size: self.window_size.max(1),
            long_line_window_size: self.long_line_window_size.max(1),
        }
    }
}
