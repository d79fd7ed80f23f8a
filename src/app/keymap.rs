//! Key mapping and action dispatch for folio
//!
//! Maps configured key strings to actions. The main menu and the editor have separate maps:
//! the editor only binds chords that cannot be typed as text, so plain letters always insert.

use crate::config::Keys;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Any bound action in the app.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Action {
    Menu(MenuAction),
    Editor(EditorAction),
    System(SystemAction),
}

/// Main menu actions (recent files list).
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum MenuAction {
    OpenRecent,
    GoUp,
    GoDown,
    OpenFile,
    NewFile,
    RemoveRecent,
    ClearRecents,
}

/// Editor actions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum EditorAction {
    Save,
    Rename,
    Share,
    NextWindow,
    PreviousWindow,
    Back,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum SystemAction {
    Quit,
    KeyBindHelp,
}

/// Key + modifiers as used in keybind/keymap
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub(crate) struct Key {
    pub(crate) code: KeyCode,
    pub(crate) modifiers: KeyModifiers,
}

pub(crate) struct Keymap {
    menu: HashMap<Key, Action>,
    editor: HashMap<Key, Action>,
}

impl Keymap {
    /// Builds both maps from the `[keys]` config.
    #[rustfmt::skip]
    pub(crate) fn from_keys(keys: &Keys) -> Self {
        let mut menu = HashMap::new();
        let mut editor = HashMap::new();

        use MenuAction as M;
        use EditorAction as E;
        use SystemAction as S;

        bind(keys.open_recent(),        Action::Menu(M::OpenRecent),       &mut menu);
        bind(keys.go_up(),              Action::Menu(M::GoUp),             &mut menu);
        bind(keys.go_down(),            Action::Menu(M::GoDown),           &mut menu);
        bind(keys.open_file(),          Action::Menu(M::OpenFile),         &mut menu);
        bind(keys.new_file(),           Action::Menu(M::NewFile),          &mut menu);
        bind(keys.remove_recent(),      Action::Menu(M::RemoveRecent),     &mut menu);
        bind(keys.clear_recents(),      Action::Menu(M::ClearRecents),     &mut menu);
        bind(keys.keybind_help(),       Action::System(S::KeyBindHelp),    &mut menu);
        bind(keys.quit(),               Action::System(S::Quit),           &mut menu);

        bind_chords(keys.save(),            Action::Editor(E::Save),           &mut editor);
        bind_chords(keys.rename(),          Action::Editor(E::Rename),         &mut editor);
        bind_chords(keys.share(),           Action::Editor(E::Share),          &mut editor);
        bind_chords(keys.next_window(),     Action::Editor(E::NextWindow),     &mut editor);
        bind_chords(keys.previous_window(), Action::Editor(E::PreviousWindow), &mut editor);
        bind_chords(keys.back(),            Action::Editor(E::Back),           &mut editor);
        bind_chords(keys.keybind_help(),    Action::System(S::KeyBindHelp),   &mut editor);
        bind_chords(keys.quit(),            Action::System(S::Quit),           &mut editor);

        Keymap { menu, editor }
    }

    pub(crate) fn lookup_menu(&self, key: KeyEvent) -> Option<Action> {
        lookup(&self.menu, key)
    }

    pub(crate) fn lookup_editor(&self, key: KeyEvent) -> Option<Action> {
        lookup(&self.editor, key)
    }

    /// All bindings for the keybind help overlay, as (key, action) labels.
    pub(crate) fn describe(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .menu
            .iter()
            .chain(self.editor.iter())
            .map(|(k, a)| (key_label(k), action_label(*a).to_string()))
            .collect();
        out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        out.dedup();
        out
    }
}

fn lookup(map: &HashMap<Key, Action>, key: KeyEvent) -> Option<Action> {
    let k = Key {
        code: key.code,
        modifiers: key.modifiers,
    };
    if let Some(action) = map.get(&k).copied() {
        return Some(action);
    }

    // Terminals report "C" as Char('C') + SHIFT, configs usually say "Shift+c" or "C".
    if matches!(key.code, KeyCode::Char(_)) && key.modifiers.contains(KeyModifiers::SHIFT) {
        let k2 = Key {
            code: key.code,
            modifiers: key.modifiers - KeyModifiers::SHIFT,
        };
        return map.get(&k2).copied();
    }
    None
}

pub(crate) fn action_label(action: Action) -> &'static str {
    match action {
        Action::Menu(MenuAction::OpenRecent) => "Open selected recent file",
        Action::Menu(MenuAction::GoUp) => "Move up",
        Action::Menu(MenuAction::GoDown) => "Move down",
        Action::Menu(MenuAction::OpenFile) => "Open a file",
        Action::Menu(MenuAction::NewFile) => "Create a new file",
        Action::Menu(MenuAction::RemoveRecent) => "Remove from recent files",
        Action::Menu(MenuAction::ClearRecents) => "Clear recent files",
        Action::Editor(EditorAction::Save) => "Save",
        Action::Editor(EditorAction::Rename) => "Rename / file info",
        Action::Editor(EditorAction::Share) => "Share",
        Action::Editor(EditorAction::NextWindow) => "Next window of lines",
        Action::Editor(EditorAction::PreviousWindow) => "Previous window of lines",
        Action::Editor(EditorAction::Back) => "Back to main menu",
        Action::System(SystemAction::Quit) => "Quit",
        Action::System(SystemAction::KeyBindHelp) => "Show key bindings",
    }
}

fn key_label(key: &Key) -> String {
    let mut out = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        out.push_str("Ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        out.push_str("Alt+");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        out.push_str("Shift+");
    }
    match key.code {
        KeyCode::Char(' ') => out.push_str("Space"),
        KeyCode::Char(c) => out.push(c),
        KeyCode::F(n) => out.push_str(&format!("F{n}")),
        KeyCode::PageUp => out.push_str("PageUp"),
        KeyCode::PageDown => out.push_str("PageDown"),
        other => out.push_str(&format!("{other:?}")),
    }
    out
}

/// Parses a key string such as `"Ctrl+s"`, `"<c-s>"`, `"Shift+c"`, `"F1"` or `"q"`.
pub(crate) fn parse_key(s: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut code: Option<KeyCode> = None;

    let is_bracketed = s.starts_with('<') && s.ends_with('>');
    let mut input = s.trim_start_matches('<').trim_end_matches('>').to_string();

    if is_bracketed && input.contains('-') {
        let parts: Vec<&str> = input.split('-').collect();

        for &prefix in parts.iter().take(parts.len().saturating_sub(1)) {
            match prefix.to_lowercase().as_str() {
                "c" | "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "a" | "m" | "alt" => modifiers |= KeyModifiers::ALT,
                "s" | "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        input = parts.last()?.to_string();
    }

    for part in input.split('+') {
        let p_low = part.to_lowercase();
        match p_low.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,

            "up" => code = Some(KeyCode::Up),
            "down" => code = Some(KeyCode::Down),
            "left" => code = Some(KeyCode::Left),
            "right" => code = Some(KeyCode::Right),
            "enter" => code = Some(KeyCode::Enter),
            "esc" => code = Some(KeyCode::Esc),
            "backspace" | "back" => code = Some(KeyCode::Backspace),
            "delete" | "del" => code = Some(KeyCode::Delete),
            "home" => code = Some(KeyCode::Home),
            "end" => code = Some(KeyCode::End),
            "pageup" | "pgup" => code = Some(KeyCode::PageUp),
            "pagedown" | "pgdn" => code = Some(KeyCode::PageDown),
            "tab" => code = Some(KeyCode::Tab),
            "space" | "spc" => code = Some(KeyCode::Char(' ')),

            _ => {
                if part.chars().count() == 1 {
                    let mut c = part.chars().next()?;
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        c = c.to_ascii_uppercase();
                    }
                    code = Some(KeyCode::Char(c));
                } else if p_low.starts_with('f')
                    && p_low.len() > 1
                    && p_low[1..].chars().all(|c| c.is_ascii_digit())
                {
                    let n = p_low[1..].parse().ok()?;
                    code = Some(KeyCode::F(n));
                } else if part.is_empty() {
                    continue;
                } else {
                    return None;
                }
            }
        }
    }

    // "Shift+c" and "C" name the same key
    if let Some(KeyCode::Char(c)) = code
        && c.is_ascii_uppercase()
    {
        modifiers -= KeyModifiers::SHIFT;
    }

    Some(Key {
        code: code?,
        modifiers,
    })
}

fn bind(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, action);
            }
            None => log::warn!("ignoring unparsable key {:?} for {:?}", k, action),
        }
    }
}

/// Like [bind], but skips keys that would otherwise type text in the editor.
fn bind_chords(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        let Some(key) = parse_key(k) else {
            log::warn!("ignoring unparsable key {:?} for {:?}", k, action);
            continue;
        };
        let types_text = matches!(key.code, KeyCode::Char(_))
            && !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        if !types_text {
            map.insert(key, action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_common_notations() {
        let ctrl_s = Some(Key {
            code: KeyCode::Char('s'),
            modifiers: KeyModifiers::CONTROL,
        });
        assert_eq!(parse_key("Ctrl+s"), ctrl_s);
        assert_eq!(parse_key("<c-s>"), ctrl_s);
        assert_eq!(
            parse_key("Shift+c"),
            Some(Key {
                code: KeyCode::Char('C'),
                modifiers: KeyModifiers::NONE,
            })
        );
        assert_eq!(parse_key("F1").map(|k| k.code), Some(KeyCode::F(1)));
        assert_eq!(parse_key("PageDown").map(|k| k.code), Some(KeyCode::PageDown));
        assert_eq!(parse_key("Ctrl+nonsense"), None);
    }

    #[test]
    fn editor_never_binds_plain_letters() {
        let keymap = Keymap::from_keys(&Keys::default());
        assert_eq!(
            keymap.lookup_editor(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            keymap.lookup_editor(key(KeyCode::Char('?'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            keymap.lookup_editor(key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(Action::System(SystemAction::Quit))
        );
        assert_eq!(
            keymap.lookup_editor(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Action::Editor(EditorAction::Save))
        );
    }

    #[test]
    fn menu_handles_shifted_letters() {
        let keymap = Keymap::from_keys(&Keys::default());
        assert_eq!(
            keymap.lookup_menu(key(KeyCode::Char('C'), KeyModifiers::SHIFT)),
            Some(Action::Menu(MenuAction::ClearRecents))
        );
        assert_eq!(
            keymap.lookup_menu(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::System(SystemAction::Quit))
        );
    }

    #[test]
    fn describe_lists_every_default_binding() {
        let keymap = Keymap::from_keys(&Keys::default());
        let labels = keymap.describe();
        assert!(labels.iter().any(|(k, a)| k == "Ctrl+s" && a == "Save"));
        assert!(labels.iter().any(|(k, a)| k == "o" && a == "Open a file"));
    }
}
