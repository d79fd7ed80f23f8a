//! Command-line argument parsing and help for folio.
//!
//! This module handles the CLI flags used for config initialization and help, and the
//! external open request `folio [--mime=<type>] <locator>`.
//!
//! When invoked with no args (folio), folio launches the TUI on the main menu.

use crate::config::Config;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CliAction {
    RunApp,
    Open {
        locator: String,
        mime: Option<String>,
    },
    Exit,
}

pub(crate) fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

/// Parses the arguments after the program name. Prints help, version or errors as needed.
pub(crate) fn parse_args(args: &[String]) -> CliAction {
    let config_path = Config::default_path();

    let Some(first) = args.first() else {
        return CliAction::RunApp;
    };

    match first.as_str() {
        "--version" | "-v" => {
            print_version();
            return CliAction::Exit;
        }
        "-h" | "--help" => {
            print_help();
            return CliAction::Exit;
        }
        "--config-help" => {
            print_config_help();
            return CliAction::Exit;
        }
        "--keybinds" | "--keybind" | "--key" => {
            print_keybinds();
            return CliAction::Exit;
        }
        "--init" => {
            if let Err(e) = Config::generate_default(&config_path, true) {
                eprintln!("Error: {}", e);
            }
            return CliAction::Exit;
        }
        "--init-full" => {
            if let Err(e) = Config::generate_default(&config_path, false) {
                eprintln!("Error: {}", e);
            }
            return CliAction::Exit;
        }
        _ => {}
    }

    let mut mime = None;
    let mut locator = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--mime=") {
            mime = Some(value.to_string());
        } else if arg == "--mime" {
            match iter.next() {
                Some(value) => mime = Some(value.clone()),
                None => {
                    eprintln!("Error: --mime needs a value, e.g. --mime=text/plain");
                    return CliAction::Exit;
                }
            }
        } else if arg.starts_with('-') && arg.len() > 1 {
            eprintln!("Unknown argument: {}", arg);
            eprintln!("Try --help for available options");
            return CliAction::Exit;
        } else if locator.is_some() {
            eprintln!("Error: folio opens one file at a time.");
            eprintln!("Usage: folio [--mime=<type>] [LOCATOR]");
            return CliAction::Exit;
        } else if !arg.trim().is_empty() {
            locator = Some(arg.clone());
        }
    }

    match locator {
        Some(locator) => CliAction::Open { locator, mime },
        None if mime.is_some() => {
            eprintln!("Error: --mime needs a file to open");
            CliAction::Exit
        }
        None => CliAction::RunApp,
    }
}

fn print_version() {
    println!("folio {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"folio - A small terminal text editor that stays responsive on large files

USAGE:
  folio [--mime=<type>] [LOCATOR]

LOCATOR:
  A file path, a file:// URI or a content://<authority>/<path> handle.
  Without a locator folio starts on the recent files menu.

OPTIONS:
      --mime=<type>       Type hint for the file. Only text types are opened
      --init              Generate a minimal default configuration
      --init-full         Generate the full configuration with all options
      --config-help       Display all the configuration options
      --keybinds          Display all the default keybinds
  -h, --help              Print help information
  -v, --version           Display the current installed version of folio

ENVIRONMENT:
  FOLIO_CONFIG            Override the default config path
  FOLIO_DATA_DIR          Override where recent files and the log are kept
"#
    );
}

const KEYBINDS_TEXT: &str = r##"
=========================
 Key Bindings
=========================
[keys]
  Main menu:
  open_recent               ["Enter"]
  go_up                     ["k", "Up"]
  go_down                   ["j", "Down"]
  open_file                 ["o"]
  new_file                  ["n"]
  remove_recent             ["d", "Delete"]
  clear_recents             ["Shift+c"]

  Editor:
  save                      ["Ctrl+s"]
  rename                    ["Ctrl+r"]      (also shows the file details)
  share                     ["Ctrl+e"]
  next_window               ["Ctrl+n", "Alt+Down"]
  previous_window           ["Ctrl+p", "Alt+Up"]
  back                      ["Esc"]

  View only (fixed):
  scroll                    Up/Down, j/k, PageUp/PageDown, g/G
  shift lines               Left/Right, h/l (H/L by half a screen)
  line start / end          Home/End, 0/$

  Everywhere:
  quit                      ["q", "Ctrl+q"]
  keybind_help              ["?", "F1"]

  Syntax Reference:
    Modifiers: <c-x> (Ctrl), <m-x>/<a-x> (Alt/Meta), <s-x> (Shift)
    Standard:  ctrl+x, alt+x, shift+x, meta+x
    Special:   " ", "space", "back", "enter", "esc", "tab", "delete", "home", "end",
               "pageup", "pagedown", "up", "down", "left", "right", "f1".."f12"

  Note:
    - In the editor only chords are bound. Plain letters ("q", "?") always type text there.
    - Unsaved changes: press back or quit twice to discard them.
"##;

fn print_keybinds() {
    println!("{}", KEYBINDS_TEXT);
}

fn print_config_help() {
    let help_text = r##"
folio - Full Configuration Guide (folio.toml)

=========================
 General Settings
=========================
[general]
  max_recent_files           Entries kept in the recent files list [default: 5, min: 1, max: 50]
  data_dir                   Where recent_files.json and folio.log live
                             [default: $FOLIO_DATA_DIR, then the platform data dir + /folio]
  log_level                  "off", "error", "warn", "info", "debug" or "trace" [default: "info"]

=========================
 Limits
=========================
[limits]
  large_file_bytes           Files larger than this open as a read-only preview [default: 1048576]
  preview_lines              Lines shown in that preview [default: 1000]
  long_line_chars            Longer lines ask before editing [default: 10000]
  pagination_lines           More lines than this are edited one window at a time [default: 1000]
  pagination_chars           ...as are documents with more characters than this [default: 100000]
  window_size                Lines per window [default: 500]
  long_line_window_size      Lines per window when a line is longer than long_line_chars [default: 15]

=========================
 Share
=========================
[share]
  cmd                        Program receiving the document text on stdin, e.g. "wl-copy"
  args                       Arguments. "{title}" is replaced with the document name,
                             which is also exported as FOLIO_SHARE_TITLE

=========================
 Providers
=========================
[[providers]]                Mount a directory as content://<authority>/<path>
  authority                  Name used in the locator
  root                       Directory to serve ("~" is expanded)
"##;

    println!("{}{}", help_text, KEYBINDS_TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn open_request_with_mime_hint() {
        assert_eq!(parse_args(&[]), CliAction::RunApp);
        assert_eq!(
            parse_args(&args(&["notes.txt"])),
            CliAction::Open {
                locator: "notes.txt".into(),
                mime: None
            }
        );
        assert_eq!(
            parse_args(&args(&["--mime=text/markdown", "file:///tmp/a.md"])),
            CliAction::Open {
                locator: "file:///tmp/a.md".into(),
                mime: Some("text/markdown".into())
            }
        );
        assert_eq!(
            parse_args(&args(&["content://notes/a.txt", "--mime", "text/plain"])),
            CliAction::Open {
                locator: "content://notes/a.txt".into(),
                mime: Some("text/plain".into())
            }
        );
    }

    #[test]
    fn bad_arguments_exit() {
        assert_eq!(parse_args(&args(&["a.txt", "b.txt"])), CliAction::Exit);
        assert_eq!(parse_args(&args(&["--bogus"])), CliAction::Exit);
        assert_eq!(parse_args(&args(&["--mime"])), CliAction::Exit);
        assert_eq!(parse_args(&args(&["--mime=text/plain"])), CliAction::Exit);
    }
}
