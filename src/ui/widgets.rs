//! Dialog widgets used by the renderer.
//!
//! [dialog_area] places a dialog of a given [DialogSize] at a [DialogPosition] inside an area and
//! [draw_dialog] clears that rectangle and draws the bordered content into it.
//! The draw functions for the individual dialogs live in [draw].

pub(crate) mod draw;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DialogPosition {
    Center,
    BottomRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DialogSize {
    /// A one line input field.
    Small,
    /// Columns and rows.
    Custom(u16, u16),
}

impl DialogSize {
    /// (width, height) for an area, never bigger than the area itself.
    fn resolve(self, area: Rect) -> (u16, u16) {
        let (w, h) = match self {
            DialogSize::Small => (area.width * 60 / 100, 3),
            DialogSize::Custom(w, h) => (w, h),
        };
        (w.max(20).min(area.width), h.max(3).min(area.height))
    }
}

pub(crate) struct DialogStyle {
    pub(crate) border: Borders,
    pub(crate) border_style: Style,
    pub(crate) bg: Style,
    pub(crate) fg: Style,
    pub(crate) title: Option<Span<'static>>,
}

impl DialogStyle {
    /// Bordered dialog with a title in the accent color.
    pub(crate) fn titled(title: impl Into<String>, accent: Style) -> Self {
        DialogStyle {
            border: Borders::ALL,
            border_style: accent,
            bg: Style::default().bg(Color::Reset),
            fg: Style::default().fg(Color::Reset),
            title: Some(Span::styled(format!(" {} ", title.into()), accent)),
        }
    }
}

pub(crate) struct DialogLayout {
    pub(crate) area: Rect,
    pub(crate) position: DialogPosition,
    pub(crate) size: DialogSize,
}

/// Rectangle of a dialog inside `area`.
pub(crate) fn dialog_area(area: Rect, size: DialogSize, position: DialogPosition) -> Rect {
    let (width, height) = size.resolve(area);
    let free_x = area.width.saturating_sub(width);
    let free_y = area.height.saturating_sub(height);

    let (x, y) = match position {
        DialogPosition::Center => (free_x / 2, free_y / 2),
        DialogPosition::BottomRight => (free_x, free_y),
    };

    Rect {
        x: area.x + x,
        y: area.y + y,
        width,
        height,
    }
}

/// Clears the dialog rectangle and draws `content` in a bordered block.
pub(crate) fn draw_dialog<'a, T>(
    frame: &mut Frame,
    layout: DialogLayout,
    border_type: BorderType,
    style: &DialogStyle,
    content: T,
    alignment: Option<Alignment>,
) -> Rect
where
    T: Into<Text<'a>>,
{
    let rect = dialog_area(layout.area, layout.size, layout.position);
    frame.render_widget(Clear, rect);

    let mut block = Block::default()
        .borders(style.border)
        .border_type(border_type)
        .border_style(style.border_style)
        .style(style.bg);
    if let Some(title) = &style.title {
        block = block.title(title.clone());
    }

    let paragraph = Paragraph::new(content)
        .block(block)
        .style(style.fg)
        .alignment(alignment.unwrap_or(Alignment::Left))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, rect);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialogs_stay_inside_the_area() {
        let area = Rect::new(0, 0, 30, 10);
        let rect = dialog_area(area, DialogSize::Custom(80, 40), DialogPosition::Center);
        assert_eq!(rect, area);

        let rect = dialog_area(area, DialogSize::Custom(20, 4), DialogPosition::BottomRight);
        assert_eq!((rect.x, rect.y), (10, 6));

        let rect = dialog_area(area, DialogSize::Custom(20, 4), DialogPosition::Center);
        assert_eq!((rect.x, rect.y), (5, 3));
    }
}
