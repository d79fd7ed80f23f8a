//! Overlay module to stack dialogs on top of the current screen.
//!
//! The topmost overlay receives key input first. Dialogs with choices (long-line warning, load
//! failure) block the screen below until answered; messages expire on their own.

use crate::core::locator::Locator;

use std::slice;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Overlay {
    /// Large file opened as a read-only preview.
    LargeFile { name: String, preview_lines: usize },
    /// A line is too long to edit comfortably: edit anyway or view only.
    LongLineWarning { name: String, max_line_length: usize },
    /// Opening failed: re-pick or remove from the recent files.
    LoadFailed {
        locator: Locator,
        title: String,
        body: String,
    },
    KeybindHelp { lines: Vec<(String, String)> },
    Message { text: String },
}

impl Overlay {
    /// Whether the overlay waits for an answer before the screen below gets keys.
    pub(crate) fn is_blocking(&self) -> bool {
        !matches!(self, Overlay::Message { .. })
    }
}

#[derive(Default)]
pub(crate) struct OverlayStack {
    overlays: Vec<Overlay>,
}

impl OverlayStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    pub(crate) fn pop(&mut self) -> Option<Overlay> {
        self.overlays.pop()
    }

    pub(crate) fn top(&self) -> Option<&Overlay> {
        self.overlays.last()
    }

    /// The topmost overlay that is not a transient message.
    pub(crate) fn top_blocking(&self) -> Option<&Overlay> {
        self.overlays.iter().rev().find(|o| o.is_blocking())
    }

    pub(crate) fn iter(&self) -> slice::Iter<'_, Overlay> {
        self.overlays.iter()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub(crate) fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Overlay) -> bool,
    {
        self.overlays.retain(f);
    }

    /// Removes the topmost blocking overlay.
    pub(crate) fn pop_blocking(&mut self) -> Option<Overlay> {
        let idx = self.overlays.iter().rposition(|o| o.is_blocking())?;
        Some(self.overlays.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_do_not_block() {
        let mut stack = OverlayStack::new();
        stack.push(Overlay::LargeFile {
            name: "big.log".into(),
            preview_lines: 1000,
        });
        stack.push(Overlay::Message {
            text: "saved".into(),
        });

        assert!(matches!(stack.top(), Some(Overlay::Message { .. })));
        assert!(matches!(stack.top_blocking(), Some(Overlay::LargeFile { .. })));

        assert!(matches!(stack.pop_blocking(), Some(Overlay::LargeFile { .. })));
        assert_eq!(stack.top_blocking(), None);
        assert!(!stack.is_empty());
    }
}
