//! Windowed editing over a document's lines.
//!
//! [LineWindow] keeps every line of the document in memory but only exposes a contiguous slice of
//! them for editing. Edits to the slice are merged back with [LineWindow::commit_edit].

/// Splits text into lines on `\n`, dropping a trailing `\r` from each line.
///
/// Unlike [str::lines], a trailing newline yields a final empty line, so
/// `join_lines(split_lines(s))` only loses carriage returns.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

pub fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWindow {
    lines: Vec<String>,
    start: usize,
    size: usize,
}

impl LineWindow {
    /// Creates a window of `size` lines (at least one) positioned at the top.
    pub fn new(lines: Vec<String>, size: usize) -> Self {
        Self {
            lines,
            start: 0,
            size: size.max(1),
        }
    }

    pub fn from_text(text: &str, size: usize) -> Self {
        Self::new(split_lines(text).map(str::to_string).collect(), size)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One past the last visible index: `min(start + size, len)`.
    pub fn end(&self) -> usize {
        (self.start + self.size).min(self.lines.len())
    }

    /// The lines currently inside the window.
    pub fn view(&self) -> &[String] {
        &self.lines[self.start.min(self.end())..self.end()]
    }

    /// The window's lines joined for an edit buffer.
    pub fn view_text(&self) -> String {
        self.view().join("\n")
    }

    pub fn has_next(&self) -> bool {
        self.end() < self.lines.len()
    }

    pub fn has_previous(&self) -> bool {
        self.start > 0
    }

    /// Moves forward one window, clamped so the last window is full when possible:
    /// `start = min(start + size, max(0, len - size))`.
    pub fn next(&mut self) {
        let last_start = self.lines.len().saturating_sub(self.size);
        self.start = (self.start + self.size).min(last_start);
    }

    /// Moves back one window, stopping at the top.
    pub fn previous(&mut self) {
        self.start = self.start.saturating_sub(self.size);
    }

    /// Merges an edited copy of the window back into the document.
    ///
    /// Edited line `i` overwrites document line `start + i` as long as that index exists. The
    /// document never grows or shrinks: lines added past the end of the document are dropped,
    /// and when the edit has fewer lines than the window the remaining window lines are kept.
    /// Returns the number of lines written.
    pub fn commit_edit(&mut self, edited: &str) -> usize {
        let mut written = 0;
        for (i, line) in split_lines(edited).enumerate() {
            let Some(slot) = self.lines.get_mut(self.start + i) else {
                break;
            };
            *slot = line.to_string();
            written += 1;
        }
        written
    }

    /// The whole document joined with `\n`.
    pub fn full_text(&self) -> String {
        join_lines(&self.lines)
    }

    /// "Lines a–b / n" for the status bar.
    pub fn position_label(&self) -> String {
        format!(
            "Lines {}–{} / {}",
            (self.start + 1).min(self.lines.len()),
            self.end(),
            self.lines.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(lines: &[&str], size: usize, start: usize) -> LineWindow {
        let mut w = LineWindow::new(lines.iter().map(|s| s.to_string()).collect(), size);
        w.start = start;
        w
    }

    #[test]
    fn commit_overwrites_the_window_in_place() {
        let mut w = window(&["a", "b", "c", "d", "e"], 2, 2);
        assert_eq!(w.view(), ["c", "d"]);

        assert_eq!(w.commit_edit("X\nY"), 2);
        assert_eq!(w.lines(), ["a", "b", "X", "Y", "e"]);
    }

    #[test]
    fn commit_drops_lines_past_the_document_end() {
        let mut w = window(&["a", "b", "c"], 2, 1);
        w.commit_edit("B\nC\nextra1\nextra2");
        assert_eq!(w.lines(), ["a", "B", "C"]);
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn commit_with_extra_lines_overwrites_following_window() {
        // Lines added inside the window spill into the next window's lines.
        let mut w = window(&["a", "b", "c", "d"], 2, 0);
        w.commit_edit("a\nnew\nb");
        assert_eq!(w.lines(), ["a", "new", "b", "d"]);
    }

    #[test]
    fn commit_with_fewer_lines_keeps_stale_lines() {
        let mut w = window(&["a", "b", "c", "d"], 3, 0);
        w.commit_edit("only");
        assert_eq!(w.lines(), ["only", "b", "c", "d"]);
    }

    #[test]
    fn next_clamps_to_last_full_window() {
        let mut w = window(&["1", "2", "3", "4", "5"], 2, 4);
        w.next();
        assert_eq!(w.start(), 3);

        w.next();
        assert_eq!(w.start(), 3, "at the last window next() is a no-op");
        assert!(!w.has_next());
    }

    #[test]
    fn paging_walks_forward_and_back() {
        let mut w = window(&["1", "2", "3", "4", "5", "6", "7"], 3, 0);
        assert!(!w.has_previous());
        w.next();
        assert_eq!(w.view(), ["4", "5", "6"]);
        w.next();
        assert_eq!(w.start(), 4);
        assert_eq!(w.view(), ["5", "6", "7"]);
        w.previous();
        assert_eq!(w.start(), 1);
        w.previous();
        assert_eq!(w.start(), 0);
        w.previous();
        assert_eq!(w.start(), 0);
    }

    #[test]
    fn short_documents_fit_in_one_window() {
        let mut w = window(&["only"], 500, 0);
        w.next();
        assert_eq!(w.start(), 0);
        assert_eq!(w.view(), ["only"]);
        assert_eq!(w.position_label(), "Lines 1–1 / 1");
    }

    #[test]
    fn split_and_join_preserve_trailing_newline() {
        let w = LineWindow::from_text("a\r\nb\n", 10);
        assert_eq!(w.lines(), ["a", "b", ""]);
        assert_eq!(w.full_text(), "a\nb\n");
    }
}
