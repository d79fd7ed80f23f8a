//! Input configuration options for folio
//!
//! Key lists for the main menu and the editor, read from the `[keys]` table of `folio.toml`.
//! Plain typing, arrows, Home/End and PageUp/PageDown inside the editor are not configurable.

use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub(crate) struct Keys {
    // main menu
    open_recent: Vec<String>,
    go_up: Vec<String>,
    go_down: Vec<String>,
    open_file: Vec<String>,
    new_file: Vec<String>,
    remove_recent: Vec<String>,
    clear_recents: Vec<String>,
    quit: Vec<String>,
    keybind_help: Vec<String>,

    // editor
    save: Vec<String>,
    rename: Vec<String>,
    share: Vec<String>,
    next_window: Vec<String>,
    previous_window: Vec<String>,
    back: Vec<String>,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub(crate) fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    open_recent,
    go_up,
    go_down,
    open_file,
    new_file,
    remove_recent,
    clear_recents,
    quit,
    keybind_help,
    save,
    rename,
    share,
    next_window,
    previous_window,
    back,
);

impl Default for Keys {
    fn default() -> Self {
        Keys {
            open_recent: vec!["Enter".into()],
            go_up: vec!["k".into(), "Up".into()],
            go_down: vec!["j".into(), "Down".into()],
            open_file: vec!["o".into()],
            new_file: vec!["n".into()],
            remove_recent: vec!["d".into(), "Delete".into()],
            clear_recents: vec!["Shift+c".into()],
            quit: vec!["q".into(), "Ctrl+q".into()],
            keybind_help: vec!["?".into(), "F1".into()],

            save: vec!["Ctrl+s".into()],
            rename: vec!["Ctrl+r".into()],
            share: vec!["Ctrl+e".into()],
            next_window: vec!["Ctrl+n".into(), "Alt+Down".into()],
            previous_window: vec!["Ctrl+p".into(), "Alt+Up".into()],
            back: vec!["Esc".into()],
        }
    }
}
