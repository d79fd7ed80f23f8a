//! Editing-mode selection.
//!
//! Decides how an opened document is presented: fully editable, editable through a sliding
//! window of lines, read-only, or held behind a long-line warning until the user chooses.

use crate::core::window::split_lines;

/// Lines longer than this trigger the long-line warning.
pub const LONG_LINE_CHARS: usize = 10_000;
/// Documents with more lines than this are edited through a window.
pub const PAGINATION_LINE_COUNT: usize = 1000;
/// Documents with more characters than this are edited through a window.
pub const PAGINATION_CHAR_COUNT: usize = 100_000;
pub const DEFAULT_WINDOW_SIZE: usize = 500;
/// Window size used when the longest line exceeds [LONG_LINE_CHARS].
pub const LONG_LINE_WINDOW_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingMode {
    Full,
    Windowed,
    ViewOnly,
    WarnLongLine,
}

/// The user's answer to the long-line warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongLineChoice {
    #[default]
    Undecided,
    EditAnyway,
    ViewOnly,
}

/// Thresholds driving [select_mode]. Defaults are the policy constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeThresholds {
    pub long_line_chars: usize,
    pub pagination_lines: usize,
    pub pagination_chars: usize,
    pub window_size: usize,
    pub long_line_window_size: usize,
}

impl Default for ModeThresholds {
    fn default() -> Self {
        Self {
            long_line_chars: LONG_LINE_CHARS,
            pagination_lines: PAGINATION_LINE_COUNT,
            pagination_chars: PAGINATION_CHAR_COUNT,
            window_size: DEFAULT_WINDOW_SIZE,
            long_line_window_size: LONG_LINE_WINDOW_SIZE,
        }
    }
}

impl ModeThresholds {
    /// Window size for a document: small when lines are pathologically long.
    pub fn window_size_for(&self, metrics: &DocumentMetrics) -> usize {
        if metrics.max_line_length > self.long_line_chars {
            self.long_line_window_size
        } else {
            self.window_size
        }
    }
}

/// Size measurements of a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentMetrics {
    pub line_count: usize,
    pub total_chars: usize,
    pub max_line_length: usize,
}

impl DocumentMetrics {
    /// Measures `text`. Character counts are in Unicode scalar values; an empty text is one
    /// empty line.
    pub fn measure(text: &str) -> Self {
        let mut line_count = 0;
        let mut max_line_length = 0;
        for line in split_lines(text) {
            line_count += 1;
            max_line_length = max_line_length.max(line.chars().count());
        }
        Self {
            line_count,
            total_chars: text.chars().count(),
            max_line_length,
        }
    }
}

/// Picks the editing mode. First match wins:
///
/// 1. large file -> [EditingMode::ViewOnly] (content is already a preview)
/// 2. a line over the long-line limit -> [EditingMode::WarnLongLine] until the user decides;
///    "view only" resolves to [EditingMode::ViewOnly], "edit anyway" continues with rule 3
/// 3. too many lines or characters -> [EditingMode::Windowed]
/// 4. otherwise [EditingMode::Full]
pub fn select_mode(
    metrics: &DocumentMetrics,
    is_large_file: bool,
    choice: LongLineChoice,
    thresholds: &ModeThresholds,
) -> EditingMode {
    if is_large_file {
        return EditingMode::ViewOnly;
    }

    if metrics.max_line_length > thresholds.long_line_chars {
        match choice {
            LongLineChoice::Undecided => return EditingMode::WarnLongLine,
            LongLineChoice::ViewOnly => return EditingMode::ViewOnly,
            LongLineChoice::EditAnyway => {}
        }
    }

    if metrics.line_count > thresholds.pagination_lines
        || metrics.total_chars > thresholds.pagination_chars
    {
        EditingMode::Windowed
    } else {
        EditingMode::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(line_count: usize, total_chars: usize, max_line_length: usize) -> DocumentMetrics {
        DocumentMetrics {
            line_count,
            total_chars,
            max_line_length,
        }
    }

    #[test]
    fn large_files_are_always_view_only() {
        let t = ModeThresholds::default();
        for m in [
            metrics(1, 1, 1),
            metrics(5000, 10_000_000, 20_000),
            metrics(10, 100, 50_000),
        ] {
            for choice in [
                LongLineChoice::Undecided,
                LongLineChoice::EditAnyway,
                LongLineChoice::ViewOnly,
            ] {
                assert_eq!(select_mode(&m, true, choice, &t), EditingMode::ViewOnly);
            }
        }
    }

    #[test]
    fn long_lines_warn_until_decided() {
        let t = ModeThresholds::default();
        let m = metrics(1, 20_000, 20_000);
        assert_eq!(
            select_mode(&m, false, LongLineChoice::Undecided, &t),
            EditingMode::WarnLongLine
        );
        assert_eq!(
            select_mode(&m, false, LongLineChoice::EditAnyway, &t),
            EditingMode::Full
        );
        assert_eq!(
            select_mode(&m, false, LongLineChoice::ViewOnly, &t),
            EditingMode::ViewOnly
        );
    }

    #[test]
    fn confirmed_long_line_document_can_still_be_windowed() {
        let t = ModeThresholds::default();
        let m = metrics(3, 250_000, 200_000);
        assert_eq!(
            select_mode(&m, false, LongLineChoice::EditAnyway, &t),
            EditingMode::Windowed
        );
        assert_eq!(t.window_size_for(&m), LONG_LINE_WINDOW_SIZE);
    }

    #[test]
    fn pagination_boundaries_are_exclusive() {
        let t = ModeThresholds::default();
        let u = LongLineChoice::Undecided;
        assert_eq!(select_mode(&metrics(1000, 100_000, 100), false, u, &t), EditingMode::Full);
        assert_eq!(select_mode(&metrics(1001, 5000, 10), false, u, &t), EditingMode::Windowed);
        assert_eq!(select_mode(&metrics(10, 100_001, 10_000), false, u, &t), EditingMode::Windowed);
        assert_eq!(select_mode(&metrics(1, 10_000, 10_000), false, u, &t), EditingMode::Full);
    }

    #[test]
    fn measure_counts_lines_chars_and_longest_line() {
        let m = DocumentMetrics::measure("ab\r\nälpha\n\nz");
        assert_eq!(m.line_count, 4);
        assert_eq!(m.max_line_length, 5);
        assert_eq!(m.total_chars, 12);

        let empty = DocumentMetrics::measure("");
        assert_eq!(empty.line_count, 1);
        assert_eq!(empty.max_line_length, 0);

        let trailing = DocumentMetrics::measure("a\n");
        assert_eq!(trailing.line_count, 2);
    }

    #[test]
    fn window_size_defaults() {
        let t = ModeThresholds::default();
        assert_eq!(t.window_size_for(&metrics(2000, 40_000, 50)), DEFAULT_WINDOW_SIZE);
        assert_eq!(t.window_size_for(&metrics(2, 10_001, 10_001)), LONG_LINE_WINDOW_SIZE);
    }
}
