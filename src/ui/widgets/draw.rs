//! Draw functions for the dialogs and bars on top of the screens.
//!
//! Relies on the dialog helpers in [crate::ui::widgets]. Used by [crate::ui::render].

use crate::app::actions::ActionMode;
use crate::app::{AppState, Screen, Surface};
use crate::core::mode::EditingMode;
use crate::ui::widgets::{
    DialogLayout, DialogPosition, DialogSize, DialogStyle, dialog_area, draw_dialog,
};
use crate::utils::{format_file_size, truncate_to_width};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BorderType, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const BORDER: BorderType = BorderType::Rounded;

/// Prompt dialog with a single input field and the terminal cursor placed in it.
pub(crate) fn draw_input_dialog(frame: &mut Frame, app: &AppState, accent_style: Style) {
    let ActionMode::Input { prompt, .. } = app.actions().mode() else {
        return;
    };

    let area = frame.area();
    let size = DialogSize::Small;
    let position = DialogPosition::Center;
    let rect = dialog_area(area, size, position);
    let visible_width = rect.width.saturating_sub(2) as usize;

    let (display_input, cursor_offset) = input_field_view(
        app.actions().input_buffer(),
        app.actions().input_cursor_pos(),
        visible_width,
    );

    let style = DialogStyle::titled(truncate_to_width(prompt, visible_width), accent_style);
    draw_dialog(
        frame,
        DialogLayout {
            area,
            position,
            size,
        },
        BORDER,
        &style,
        display_input,
        Some(Alignment::Left),
    );

    frame.set_cursor_position((rect.x + 1 + cursor_offset as u16, rect.y + 1));
}

/// A dialog asking for one of a few keys, e.g. `[e] Edit anyway`.
pub(crate) fn draw_choice_dialog(
    frame: &mut Frame,
    title: &str,
    body: &str,
    choices: &[(&str, &str)],
    accent_style: Style,
) {
    let area = frame.area();
    let width = (area.width * 60 / 100).max(40);
    let inner = width.saturating_sub(4).max(1) as usize;
    // wrapped body rows, an empty row, the choices row, borders
    let body_rows: usize = body
        .lines()
        .map(|l| l.width().div_ceil(inner).max(1))
        .sum();
    let height = (body_rows + 4) as u16;

    let mut lines: Vec<Line> = body.lines().map(Line::raw).collect();
    lines.push(Line::raw(""));
    let mut spans = Vec::new();
    for (idx, (key, label)) in choices.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            format!("[{key}]"),
            accent_style.add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {label}")));
    }
    lines.push(Line::from(spans));

    draw_dialog(
        frame,
        DialogLayout {
            area,
            position: DialogPosition::Center,
            size: DialogSize::Custom(width, height),
        },
        BORDER,
        &DialogStyle::titled(title, accent_style),
        Text::from(lines),
        Some(Alignment::Center),
    );
}

/// Small notification at the bottom right.
pub(crate) fn draw_message_overlay(frame: &mut Frame, accent_style: Style, text: &str) {
    let area = frame.area();
    let mut max_line_width = 0;
    let mut line_count = 0;
    for line in text.lines() {
        max_line_width = max_line_width.max(line.width());
        line_count += 1;
    }

    let min_width = 27;
    let border_pad = 2;
    let right_pad = 2;
    let width =
        ((max_line_width + right_pad).max(min_width) + border_pad).min(area.width as usize) as u16;
    let height = ((line_count + border_pad).min(area.height as usize)) as u16;

    // keep the status bar visible
    let above_status = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };

    draw_dialog(
        frame,
        DialogLayout {
            area: above_status,
            position: DialogPosition::BottomRight,
            size: DialogSize::Custom(width, height),
        },
        BORDER,
        &DialogStyle::titled("Message", accent_style),
        text,
        Some(Alignment::Left),
    );
}

pub(crate) fn draw_keybind_help(frame: &mut Frame, lines: &[(String, String)], accent_style: Style) {
    let key_width = lines.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    let rows: Vec<Line> = lines
        .iter()
        .map(|(key, label)| {
            Line::from(vec![
                Span::styled(format!("{key:<key_width$}"), accent_style),
                Span::raw("  "),
                Span::raw(label.as_str()),
            ])
        })
        .collect();

    let area = frame.area();
    draw_dialog(
        frame,
        DialogLayout {
            area,
            position: DialogPosition::Center,
            size: DialogSize::Custom(
                (key_width as u16 + 30).max(40),
                rows.len() as u16 + 2,
            ),
        },
        BORDER,
        &DialogStyle::titled("Keybindings", accent_style),
        Text::from(rows),
        Some(Alignment::Left),
    );
}

/// Bottom bar: document name, mode, dirty marker, window position, and I/O activity.
pub(crate) fn draw_status_line(frame: &mut Frame, app: &AppState, area: Rect, accent_style: Style) {
    let bar_style = Style::default().add_modifier(Modifier::REVERSED);
    let mut left = Vec::new();
    let mut right = Vec::new();

    match app.screen() {
        Screen::Menu => {
            left.push("Recent files".to_string());
            if let Some(locator) = app.pending_open() {
                left.push(format!("Opening {}", locator.fallback_name()));
            }
        }
        Screen::Editor(editor) => {
            let session = editor.session();
            let dirty = if editor.is_dirty() { " [+]" } else { "" };
            left.push(format!("{}{}", session.display_name(), dirty));
            left.push(mode_label(editor.mode()).to_string());
            if let Some(label) = editor.position_label() {
                left.push(label);
            }

            match editor.surface() {
                Surface::Full(buffer) => {
                    let (row, col) = buffer.cursor();
                    right.push(format!("Ln {}, Col {}", row + 1, col + 1));
                }
                Surface::Windowed { window, buffer } => {
                    let (row, col) = buffer.cursor();
                    right.push(format!("Ln {}, Col {}", window.start() + row + 1, col + 1));
                }
                Surface::Viewer(viewer) => {
                    right.push(format!(
                        "{}/{}",
                        (viewer.scroll() + 1).min(viewer.lines().len()),
                        viewer.lines().len()
                    ));
                }
                Surface::Pending => {}
            }
            right.push(session.mime_type().unwrap_or("Unknown").to_string());
            right.push(format_file_size(session.size()));
        }
    }

    if app.is_saving() {
        right.insert(0, "Saving…".to_string());
    } else if app.is_loading() {
        right.insert(0, "Loading…".to_string());
    }

    let right_text = format!(" {} ", right.join(" | "));
    let left_width = (area.width as usize).saturating_sub(right_text.width() + 1);
    let left_text = truncate_to_width(&format!(" {}", left.join(" | ")), left_width);

    frame.render_widget(Paragraph::new("").style(bar_style), area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(left_text, bar_style))),
        area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right_text,
            bar_style.patch(accent_style).add_modifier(Modifier::REVERSED),
        )))
        .alignment(Alignment::Right),
        area,
    );
}

fn mode_label(mode: EditingMode) -> &'static str {
    match mode {
        EditingMode::Full => "Edit",
        EditingMode::Windowed => "Windowed",
        EditingMode::ViewOnly => "View only",
        EditingMode::WarnLongLine => "Long line",
    }
}

/// Hint line under the header.
pub(crate) fn draw_hint_line(frame: &mut Frame, area: Rect, hint: &str) {
    let style = Style::default().fg(Color::DarkGray);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            truncate_to_width(hint, area.width as usize),
            style,
        ))),
        area,
    );
}

/// Visible part of an input field and the cursor column inside it.
/// Scrolls so the end of the text stays visible when it does not fit.
fn input_field_view(input_text: &str, cursor_pos: usize, visible_width: usize) -> (&str, usize) {
    let cursor_pos = cursor_pos.min(input_text.len());
    if input_text.width() < visible_width {
        return (input_text, input_text[..cursor_pos].width());
    }

    let mut current_w = 0;
    let mut start = 0;
    for (idx, ch) in input_text.char_indices().rev() {
        current_w += ch.width().unwrap_or(0);
        if current_w >= visible_width {
            start = idx + ch.len_utf8();
            break;
        }
    }

    let cursor_offset = if cursor_pos < start {
        0
    } else {
        input_text[start..cursor_pos].width()
    };
    (&input_text[start..], cursor_offset)
}
