//! Main menu state: the recent files list and its selection.

use crate::core::recent::RecentFile;

#[derive(Debug, Default)]
pub(crate) struct MenuState {
    entries: Vec<RecentFile>,
    selected: usize,
}

impl MenuState {
    pub(crate) fn entries(&self) -> &[RecentFile] {
        &self.entries
    }

    pub(crate) fn selected_idx(&self) -> usize {
        self.selected
    }

    pub(crate) fn selected_entry(&self) -> Option<&RecentFile> {
        self.entries.get(self.selected)
    }

    /// Replaces the list, keeping the selection on the same locator when it is still present.
    pub(crate) fn set_entries(&mut self, entries: Vec<RecentFile>) {
        let keep = self.selected_entry().map(|e| e.locator().to_string());
        self.entries = entries;
        self.selected = keep
            .and_then(|loc| self.entries.iter().position(|e| e.locator() == loc))
            .unwrap_or(0)
            .min(self.entries.len().saturating_sub(1));
    }

    pub(crate) fn select_prev(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + self.entries.len() - 1) % self.entries.len();
        }
    }

    pub(crate) fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(locators: &[&str]) -> Vec<RecentFile> {
        locators.iter().map(|l| RecentFile::new(*l, *l)).collect()
    }

    #[test]
    fn selection_wraps_and_survives_refresh() {
        let mut menu = MenuState::default();
        assert!(menu.selected_entry().is_none());
        menu.select_next();

        menu.set_entries(entries(&["a", "b", "c"]));
        menu.select_prev();
        assert_eq!(menu.selected_entry().map(|e| e.locator()), Some("c"));

        menu.set_entries(entries(&["c", "a"]));
        assert_eq!(menu.selected_idx(), 0);

        menu.select_next();
        menu.set_entries(entries(&["b"]));
        assert_eq!(menu.selected_idx(), 0);
    }
}
