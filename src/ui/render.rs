//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the terminal loop. It lays out a header,
//! the main menu or editor body and the status bar, then draws the prompt and the overlay stack
//! on top.
//!
//! This module should stay mostly "pure rendering": it reads state and produces widgets. The
//! only writes are the editor scroll position, the viewer width and the page height, which depend
//! on the frame.

use crate::app::{AppState, Screen, Surface, TextBuffer, Viewer};
use crate::core::mode::EditingMode;
use crate::ui::overlays::Overlay;
use crate::ui::widgets::draw;
use crate::utils::{shorten_home_path, truncate_to_width};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthChar;

const ACCENT: Color = Color::Cyan;

/// Renders the whole terminal UI for one frame.
pub(crate) fn render(frame: &mut Frame, app: &mut AppState) {
    let accent_style = Style::default().fg(ACCENT);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());
    let (header, body, status) = (chunks[0], chunks[1], chunks[2]);

    app.set_page_height(body.height as usize);

    match app.screen() {
        Screen::Menu => {
            draw::draw_hint_line(frame, header, &menu_hint(app));
            render_menu(frame, app, body, accent_style);
        }
        Screen::Editor(_) => {
            draw::draw_hint_line(frame, header, &editor_hint(app));
            render_editor(frame, app, body);
        }
    }

    draw::draw_status_line(frame, app, status, accent_style);
    render_overlays(frame, app, accent_style);

    if app.actions().is_input_mode() {
        draw::draw_input_dialog(frame, app, accent_style);
    }
}

fn render_menu(frame: &mut Frame, app: &AppState, area: Rect, accent_style: Style) {
    let menu = app.menu();
    if menu.entries().is_empty() {
        let text = vec![
            Line::raw(""),
            Line::styled("No recent files", accent_style.add_modifier(Modifier::BOLD)),
            Line::raw(""),
            Line::raw("Open a file or create a new one to get started."),
        ];
        frame.render_widget(
            Paragraph::new(text).alignment(ratatui::layout::Alignment::Center),
            area,
        );
        return;
    }

    let width = area.width as usize;
    let items: Vec<ListItem> = menu
        .entries()
        .iter()
        .map(|entry| {
            let location = match crate::core::Locator::parse(entry.locator()) {
                Ok(loc) => match loc.as_path() {
                    Some(path) => shorten_home_path(path),
                    None => loc.to_string(),
                },
                Err(_) => entry.locator().to_string(),
            };
            let when = entry
                .last_used()
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string();
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(entry.name().to_string(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {when}"), Style::default().fg(Color::DarkGray)),
                ]),
                Line::styled(
                    truncate_to_width(&location, width.saturating_sub(2)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let list = List::new(items)
        .highlight_style(accent_style.add_modifier(Modifier::REVERSED))
        .highlight_symbol("▌");
    let mut state = ListState::default();
    state.select(Some(menu.selected_idx()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_editor(frame: &mut Frame, app: &mut AppState, area: Rect) {
    let Some(editor) = app.editor_mut() else {
        return;
    };
    let height = area.height as usize;
    let width = area.width as usize;

    match editor.surface_mut() {
        Surface::Full(buffer) | Surface::Windowed { buffer, .. } => {
            render_buffer(frame, buffer, area, height, width);
        }
        Surface::Viewer(viewer) => render_viewer(frame, viewer, area, height, width),
        Surface::Pending => {}
    }
}

fn render_buffer(frame: &mut Frame, buffer: &mut TextBuffer, area: Rect, height: usize, width: usize) {
    buffer.ensure_visible(height);
    let (row, col) = buffer.cursor();
    // horizontal scroll keeps the cursor column on screen
    let offset = col.saturating_sub(width.saturating_sub(1));

    let lines: Vec<Line> = buffer
        .lines()
        .iter()
        .skip(buffer.scroll())
        .take(height)
        .map(|l| Line::raw(visible_slice(l, offset, width)))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);

    let cursor_x: usize = buffer
        .lines()
        .get(row)
        .map(String::as_str)
        .unwrap_or_default()
        .chars()
        .skip(offset)
        .take(col - offset)
        .map(display_width)
        .sum();
    frame.set_cursor_position((
        area.x + cursor_x.min(width.saturating_sub(1)) as u16,
        area.y + (row - buffer.scroll()) as u16,
    ));
}

fn render_viewer(
    frame: &mut Frame,
    viewer: &mut Viewer,
    area: Rect,
    height: usize,
    width: usize,
) {
    viewer.set_view_width(width);
    let offset = viewer.col();
    let lines: Vec<Line> = viewer
        .lines()
        .iter()
        .skip(viewer.scroll())
        .take(height)
        .map(|l| Line::raw(visible_slice(l, offset, width)))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn display_width(c: char) -> usize {
    if c == '\t' { 1 } else { c.width().unwrap_or(0) }
}

/// The chars of `line` from char `offset` that fit into `width` columns. Tabs show as one space.
fn visible_slice(line: &str, offset: usize, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in line.chars().skip(offset) {
        let w = display_width(c);
        if used + w > width {
            break;
        }
        out.push(if c == '\t' { ' ' } else { c });
        used += w;
    }
    out
}

fn render_overlays(frame: &mut Frame, app: &AppState, accent_style: Style) {
    for overlay in app.overlays().iter() {
        match overlay {
            Overlay::LargeFile {
                name,
                preview_lines,
            } => draw::draw_choice_dialog(
                frame,
                "Large File",
                &format!(
                    "{name} is too large to edit.\nShowing the first {preview_lines} lines, read only."
                ),
                &[("Enter", "OK")],
                accent_style,
            ),
            Overlay::LongLineWarning {
                name,
                max_line_length,
            } => draw::draw_choice_dialog(
                frame,
                "Long Line",
                &format!(
                    "{name} has a line of {max_line_length} characters.\nEditing it may be slow."
                ),
                &[("e", "Edit anyway"), ("v", "View only")],
                accent_style,
            ),
            Overlay::LoadFailed { title, body, .. } => draw::draw_choice_dialog(
                frame,
                title,
                body,
                &[("r", "Re-pick"), ("d", "Remove"), ("Esc", "Close")],
                Style::default().fg(Color::Red),
            ),
            Overlay::KeybindHelp { lines } => draw::draw_keybind_help(frame, lines, accent_style),
            Overlay::Message { text } => draw::draw_message_overlay(frame, accent_style, text),
        }
    }
}

fn menu_hint(app: &AppState) -> String {
    let keys = app.config().keys();
    let first = |list: &[String]| list.first().cloned().unwrap_or_default();
    format!(
        " folio   {} open  {} new  {} remove  {} help  {} quit",
        first(keys.open_file()),
        first(keys.new_file()),
        first(keys.remove_recent()),
        first(keys.keybind_help()),
        first(keys.quit()),
    )
}

fn editor_hint(app: &AppState) -> String {
    let keys = app.config().keys();
    let first = |list: &[String]| list.first().cloned().unwrap_or_default();
    let mut hint = format!(
        " {} save  {} rename  {} share  {} back",
        first(keys.save()),
        first(keys.rename()),
        first(keys.share()),
        first(keys.back()),
    );
    if app.editor().is_some_and(|e| e.mode() == EditingMode::Windowed) {
        hint.push_str(&format!(
            "  {}/{} page",
            first(keys.next_window()),
            first(keys.previous_window())
        ));
    }
    hint
}
