//! Editor screen state for folio.
//!
//! [EditorState] owns the open [FileSession] and the surface chosen for it by
//! [select_mode]: a [TextBuffer] over the whole document, a [TextBuffer] over one window of a
//! [LineWindow], or a read-only [Viewer]. A document with an overlong line has no surface until
//! the user answers the long-line warning.

use crate::core::loader::FileSession;
use crate::core::mode::{EditingMode, LongLineChoice, ModeThresholds, select_mode};
use crate::core::window::{LineWindow, join_lines, split_lines};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Byte offset of the `col`-th char in `line`, or the line length.
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

/// A line buffer with a cursor. Columns count chars, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
    scroll: usize,
    dirty: bool,
    revision: u64,
}

impl TextBuffer {
    pub(crate) fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines(text).map(str::to_string).collect(),
            row: 0,
            col: 0,
            scroll: 0,
            dirty: false,
            revision: 0,
        }
    }

    pub(crate) fn text(&self) -> String {
        join_lines(&self.lines)
    }

    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }

    /// (row, col) of the cursor.
    pub(crate) fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub(crate) fn scroll(&self) -> usize {
        self.scroll
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Counts content changes.
    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    fn current_line_mut(&mut self) -> &mut String {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let row = self.row.min(self.lines.len() - 1);
        &mut self.lines[row]
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        let col = self.col;
        let line = self.current_line_mut();
        let at = byte_index(line, col);
        line.insert(at, c);
        self.col += 1;
        self.touch();
    }

    pub(crate) fn insert_newline(&mut self) {
        let col = self.col;
        let line = self.current_line_mut();
        let at = byte_index(line, col);
        let rest = line.split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
        self.touch();
    }

    /// Deletes before the cursor, joining with the previous line at column 0.
    pub(crate) fn backspace(&mut self) {
        if self.col > 0 {
            let col = self.col;
            let line = self.current_line_mut();
            let at = byte_index(line, col - 1);
            line.remove(at);
            self.col -= 1;
            self.touch();
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
            self.touch();
        }
    }

    /// Deletes under the cursor, joining with the next line at the end of a line.
    pub(crate) fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let col = self.col;
            let line = self.current_line_mut();
            let at = byte_index(line, col);
            line.remove(at);
            self.touch();
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            self.touch();
        }
    }

    pub(crate) fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub(crate) fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub(crate) fn move_up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n);
        self.col = self.col.min(self.line_len(self.row));
    }

    pub(crate) fn move_down(&mut self, n: usize) {
        self.row = (self.row + n).min(self.lines.len().saturating_sub(1));
        self.col = self.col.min(self.line_len(self.row));
    }

    pub(crate) fn home(&mut self) {
        self.col = 0;
    }

    pub(crate) fn end(&mut self) {
        self.col = self.line_len(self.row);
    }

    /// Scrolls so the cursor row is inside a viewport of `height` rows.
    pub(crate) fn ensure_visible(&mut self, height: usize) {
        let height = height.max(1);
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }
    }

    /// Applies an editing key. Returns false for keys it does not handle.
    pub(crate) fn handle_key(&mut self, key: KeyEvent, page: usize) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Tab => self.insert_char('\t'),
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_up(1),
            KeyCode::Down => self.move_down(1),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            KeyCode::PageUp => self.move_up(page.max(1)),
            KeyCode::PageDown => self.move_down(page.max(1)),
            _ => return false,
        }
        true
    }
}

/// Read-only, scrollable list of lines.
///
/// Long lines are not wrapped. `col` shifts every line left so the rest of a line can be brought
/// on screen; it never goes past the point where the longest line ends at the right edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Viewer {
    lines: Vec<String>,
    longest: usize,
    scroll: usize,
    col: usize,
    // columns the viewer was last drawn with
    view_width: usize,
}

impl Viewer {
    pub(crate) fn from_text(text: &str) -> Self {
        let lines: Vec<String> = split_lines(text).map(str::to_string).collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Self {
            lines,
            longest,
            scroll: 0,
            col: 0,
            view_width: 80,
        }
    }

    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }

    pub(crate) fn scroll(&self) -> usize {
        self.scroll
    }

    /// First char shown of every line.
    pub(crate) fn col(&self) -> usize {
        self.col
    }

    /// Called by the renderer with the body width.
    pub(crate) fn set_view_width(&mut self, width: usize) {
        self.view_width = width.max(1);
        self.col = self.col.min(self.max_col());
    }

    fn max_col(&self) -> usize {
        self.longest.saturating_sub(self.view_width)
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    fn shift_by(&mut self, delta: isize) {
        self.col = self.col.saturating_add_signed(delta).min(self.max_col());
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, page: usize) -> bool {
        let page = page.max(1) as isize;
        let half_width = (self.view_width / 2).max(1) as isize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(page),
            KeyCode::Char('g') => self.scroll = 0,
            KeyCode::Char('G') => self.scroll = self.lines.len().saturating_sub(1),
            KeyCode::Left | KeyCode::Char('h') => self.shift_by(-1),
            KeyCode::Right | KeyCode::Char('l') => self.shift_by(1),
            KeyCode::Char('H') => self.shift_by(-half_width),
            KeyCode::Char('L') => self.shift_by(half_width),
            KeyCode::Home | KeyCode::Char('0') => self.col = 0,
            KeyCode::End | KeyCode::Char('$') => self.col = self.max_col(),
            _ => return false,
        }
        true
    }
}

#[derive(Debug)]
pub(crate) enum Surface {
    /// Waiting for the long-line decision.
    Pending,
    Full(TextBuffer),
    Windowed {
        window: LineWindow,
        buffer: TextBuffer,
    },
    Viewer(Viewer),
}

/// The editor screen: a session plus the surface presenting it.
#[derive(Debug)]
pub(crate) struct EditorState {
    session: FileSession,
    mode: EditingMode,
    choice: LongLineChoice,
    thresholds: ModeThresholds,
    surface: Surface,
    // edits already merged into the window's lines but not yet saved
    committed_edits: bool,
    revision: u64,
}

impl EditorState {
    pub(crate) fn new(session: FileSession, thresholds: ModeThresholds) -> Self {
        let mut editor = Self {
            session,
            mode: EditingMode::Full,
            choice: LongLineChoice::Undecided,
            thresholds,
            surface: Surface::Pending,
            committed_edits: false,
            revision: 0,
        };
        editor.apply_mode();
        editor
    }

    fn apply_mode(&mut self) {
        self.mode = select_mode(
            self.session.metrics(),
            self.session.is_large_file(),
            self.choice,
            &self.thresholds,
        );
        let text = self.session.text();
        self.surface = match self.mode {
            EditingMode::WarnLongLine => Surface::Pending,
            EditingMode::ViewOnly => Surface::Viewer(Viewer::from_text(text)),
            EditingMode::Full => Surface::Full(TextBuffer::from_text(text)),
            EditingMode::Windowed => {
                let size = self.thresholds.window_size_for(self.session.metrics());
                let window = LineWindow::from_text(text, size);
                let buffer = TextBuffer::from_text(&window.view_text());
                Surface::Windowed { window, buffer }
            }
        };
        log::debug!(
            "{} opened in {:?} mode",
            self.session.display_name(),
            self.mode
        );
    }

    /// Answers the long-line warning. Ignored unless the warning is pending.
    pub(crate) fn resolve_long_line(&mut self, choice: LongLineChoice) {
        if self.mode != EditingMode::WarnLongLine || choice == LongLineChoice::Undecided {
            return;
        }
        self.choice = choice;
        self.apply_mode();
    }

    pub(crate) fn session(&self) -> &FileSession {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut FileSession {
        &mut self.session
    }

    pub(crate) fn mode(&self) -> EditingMode {
        self.mode
    }

    pub(crate) fn surface(&self) -> &Surface {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub(crate) fn window_size(&self) -> Option<usize> {
        match &self.surface {
            Surface::Windowed { window, .. } => Some(window.size()),
            _ => None,
        }
    }

    pub(crate) fn is_dirty(&self) -> bool {
        match &self.surface {
            Surface::Full(buffer) => buffer.is_dirty(),
            Surface::Windowed { buffer, .. } => self.committed_edits || buffer.is_dirty(),
            Surface::Viewer(_) | Surface::Pending => false,
        }
    }

    /// Merges the window buffer into the line array when it has edits.
    fn commit_window(&mut self) {
        if let Surface::Windowed { window, buffer } = &mut self.surface
            && buffer.is_dirty()
        {
            let written = window.commit_edit(&buffer.text());
            log::debug!("merged {} edited lines at {}", written, window.start());
            self.committed_edits = true;
        }
    }

    /// Pages the window forward (`forward`) or back. Edits are merged first so paging never
    /// loses them. Returns false if there is no window or nowhere to go.
    pub(crate) fn page_window(&mut self, forward: bool) -> bool {
        let can_move = match &self.surface {
            Surface::Windowed { window, .. } if forward => window.has_next(),
            Surface::Windowed { window, .. } => window.has_previous(),
            _ => false,
        };
        if !can_move {
            return false;
        }
        self.commit_window();
        if let Surface::Windowed { window, buffer } = &mut self.surface {
            if forward {
                window.next();
            } else {
                window.previous();
            }
            *buffer = TextBuffer::from_text(&window.view_text());
        }
        true
    }

    /// The full text to write, or None when the surface is read-only.
    pub(crate) fn text_for_save(&mut self) -> Option<String> {
        self.commit_window();
        match &mut self.surface {
            Surface::Full(buffer) => Some(buffer.text()),
            Surface::Windowed { window, buffer } => {
                // the merge may have dropped or kept lines, show what will be written
                let view = window.view_text();
                if buffer.text() != view {
                    let (row, col) = buffer.cursor();
                    *buffer = TextBuffer::from_text(&view);
                    buffer.move_down(row);
                    buffer.col = col.min(buffer.line_len(buffer.row));
                }
                Some(window.full_text())
            }
            Surface::Viewer(_) | Surface::Pending => None,
        }
    }

    /// Counts edits made through [EditorState::handle_key].
    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    /// Records a successful save of `content`, taken at `revision`. Edits made after that
    /// revision keep the editor dirty.
    pub(crate) fn mark_saved(&mut self, content: String, revision: u64) {
        if revision == self.revision {
            match &mut self.surface {
                Surface::Full(buffer) | Surface::Windowed { buffer, .. } => buffer.mark_clean(),
                Surface::Viewer(_) | Surface::Pending => {}
            }
            self.committed_edits = false;
        }
        self.session.replace_text(content);
    }

    /// "Lines a–b / n" for windowed editing.
    pub(crate) fn position_label(&self) -> Option<String> {
        match &self.surface {
            Surface::Windowed { window, .. } => Some(window.position_label()),
            _ => None,
        }
    }

    /// Routes a non-bound key to the surface.
    pub(crate) fn handle_key(&mut self, key: KeyEvent, page: usize) -> bool {
        match &mut self.surface {
            Surface::Full(buffer) | Surface::Windowed { buffer, .. } => {
                let before = buffer.revision();
                let handled = buffer.handle_key(key, page);
                if buffer.revision() != before {
                    self.revision += 1;
                }
                handled
            }
            Surface::Viewer(viewer) => viewer.handle_key(key, page),
            Surface::Pending => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::Content;
    use crate::core::locator::Locator;
    use std::path::PathBuf;

    fn session(content: Content) -> FileSession {
        FileSession::new(
            Locator::File(PathBuf::from("/tmp/doc.txt")),
            "doc.txt".into(),
            Some("text/plain".into()),
            None,
            content,
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(buffer: &mut TextBuffer, s: &str) {
        for c in s.chars() {
            buffer.insert_char(c);
        }
    }

    #[test]
    fn buffer_edits_across_lines() {
        let mut b = TextBuffer::from_text("héllo\nworld");
        b.end();
        type_str(&mut b, "!");
        b.insert_newline();
        type_str(&mut b, "new");
        assert_eq!(b.text(), "héllo!\nnew\nworld");

        b.home();
        b.backspace();
        assert_eq!(b.text(), "héllo!new\nworld");
        assert_eq!(b.cursor(), (0, 6));

        b.end();
        b.delete();
        assert_eq!(b.text(), "héllo!newworld");
        assert!(b.is_dirty());
    }

    #[test]
    fn buffer_cursor_clamps_to_line_length() {
        let mut b = TextBuffer::from_text("long line\nab");
        b.end();
        b.move_down(1);
        assert_eq!(b.cursor(), (1, 2));
        b.move_down(10);
        assert_eq!(b.cursor(), (1, 2));
        b.move_up(10);
        assert_eq!(b.cursor(), (0, 2));
    }

    #[test]
    fn buffer_scrolls_to_cursor() {
        let text: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let mut b = TextBuffer::from_text(&text.join("\n"));
        b.move_down(30);
        b.ensure_visible(10);
        assert_eq!(b.scroll(), 21);
        b.move_up(25);
        b.ensure_visible(10);
        assert_eq!(b.scroll(), 5);
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut b = TextBuffer::from_text("");
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(!b.handle_key(ctrl_s, 10));
        assert!(b.handle_key(press(KeyCode::Char('s')), 10));
        assert_eq!(b.text(), "s");
    }

    #[test]
    fn small_document_is_fully_editable() {
        let editor = EditorState::new(
            session(Content::Full("a\nb".into())),
            ModeThresholds::default(),
        );
        assert_eq!(editor.mode(), EditingMode::Full);
        assert!(matches!(editor.surface(), Surface::Full(_)));
    }

    #[test]
    fn preview_is_view_only() {
        let mut editor = EditorState::new(
            session(Content::Preview("a\nb".into())),
            ModeThresholds::default(),
        );
        assert_eq!(editor.mode(), EditingMode::ViewOnly);
        assert_eq!(editor.text_for_save(), None);
        assert!(!editor.handle_key(press(KeyCode::Char('x')), 10));
    }

    #[test]
    fn long_line_waits_for_a_decision() {
        let text = "x".repeat(20_000);
        let mut editor =
            EditorState::new(session(Content::Full(text.clone())), ModeThresholds::default());
        assert_eq!(editor.mode(), EditingMode::WarnLongLine);
        assert!(matches!(editor.surface(), Surface::Pending));
        assert_eq!(editor.text_for_save(), None);

        editor.resolve_long_line(LongLineChoice::EditAnyway);
        assert_eq!(editor.mode(), EditingMode::Full);
        assert_eq!(editor.text_for_save(), Some(text));

        editor.resolve_long_line(LongLineChoice::ViewOnly);
        assert_eq!(editor.mode(), EditingMode::Full, "decision is only taken once");
    }

    #[test]
    fn windowed_paging_keeps_edits() {
        let thresholds = ModeThresholds {
            pagination_lines: 3,
            window_size: 2,
            ..ModeThresholds::default()
        };
        let mut editor = EditorState::new(
            session(Content::Full("a\nb\nc\nd\ne".into())),
            thresholds,
        );
        assert_eq!(editor.mode(), EditingMode::Windowed);
        assert_eq!(editor.window_size(), Some(2));

        assert!(editor.handle_key(press(KeyCode::Delete), 10));
        assert!(editor.handle_key(press(KeyCode::Char('A')), 10));
        assert!(editor.page_window(true));
        assert!(editor.page_window(true));
        assert_eq!(editor.position_label().as_deref(), Some("Lines 4–5 / 5"));
        assert!(!editor.page_window(true));

        assert!(editor.is_dirty());
        assert_eq!(editor.text_for_save().as_deref(), Some("A\nb\nc\nd\ne"));

        let revision = editor.revision();
        editor.mark_saved("A\nb\nc\nd\ne".into(), revision);
        assert!(!editor.is_dirty());
        assert_eq!(editor.session().text(), "A\nb\nc\nd\ne");
    }

    #[test]
    fn windowed_save_drops_lines_past_the_end() {
        let thresholds = ModeThresholds {
            pagination_lines: 2,
            window_size: 2,
            ..ModeThresholds::default()
        };
        let mut editor =
            EditorState::new(session(Content::Full("a\nb\nc".into())), thresholds);
        editor.page_window(true);
        if let Surface::Windowed { buffer, .. } = editor.surface_mut() {
            buffer.end();
            buffer.move_down(1);
            buffer.end();
            buffer.insert_newline();
            type_str(buffer, "extra");
        }
        assert_eq!(editor.text_for_save().as_deref(), Some("a\nb\nc"));
    }

    #[test]
    fn viewer_scrolls_within_bounds() {
        let mut v = Viewer::from_text("1\n2\n3");
        assert!(v.handle_key(press(KeyCode::Char('G')), 10));
        assert_eq!(v.scroll(), 2);
        v.handle_key(press(KeyCode::PageDown), 10);
        assert_eq!(v.scroll(), 2);
        v.handle_key(press(KeyCode::PageUp), 10);
        assert_eq!(v.scroll(), 0);
    }

    #[test]
    fn viewer_shifts_long_lines_horizontally() {
        let mut v = Viewer::from_text(&format!("short\n{}END", "x".repeat(100)));
        v.set_view_width(40);

        v.handle_key(press(KeyCode::Left), 5);
        assert_eq!(v.col(), 0);
        v.handle_key(press(KeyCode::Right), 5);
        assert_eq!(v.col(), 1);
        v.handle_key(press(KeyCode::Char('L')), 5);
        assert_eq!(v.col(), 21);

        v.handle_key(press(KeyCode::End), 5);
        assert_eq!(v.col(), 63);
        v.handle_key(press(KeyCode::Right), 5);
        assert_eq!(v.col(), 63);

        // a wider view pulls the offset back
        v.set_view_width(100);
        assert_eq!(v.col(), 3);
        v.handle_key(press(KeyCode::Home), 5);
        assert_eq!(v.col(), 0);
    }
}
