//! The main config loading module for folio.
//!
//! Handles loading and deserializing settings from `folio.toml`.
//!
//! Provides the main [Config] struct and the internal [RawConfig] used for parsing. Also writes
//! the default config for `folio --init` and `folio --init-full`.

use crate::config::integrations::{ProviderEntry, Share};
use crate::config::{General, InternalGeneral, Keys, Limits};
use crate::utils::get_home;

use serde::Deserialize;
use std::{fs, io, path::Path, path::PathBuf};

/// Environment variable pointing at an explicit config file.
pub(crate) const CONFIG_ENV: &str = "FOLIO_CONFIG";

/// Raw configuration as read from the toml file.
///
/// Uses owned types and is then converted into the main [Config] struct.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub(crate) struct RawConfig {
    general: General,
    limits: Limits,
    share: Share,
    providers: Vec<ProviderEntry>,
    keys: Keys,
}

/// Main configuration struct for folio.
#[derive(Debug)]
pub(crate) struct Config {
    general: InternalGeneral,
    limits: Limits,
    share: Share,
    providers: Vec<ProviderEntry>,
    keys: Keys,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            limits: raw.limits,
            share: raw.share,
            providers: raw.providers,
            keys: raw.keys,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing or unparsable file falls back to the internal defaults with a note on stderr.
    pub(crate) fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    pub(crate) fn load_from(path: &Path) -> Self {
        if !path.exists() {
            eprintln!(
                "No folio.toml config file found. Using internal defaults. (Tip: run 'folio --init' to generate a config file.)"
            );
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                Self::default()
            }),
            Err(e) => {
                eprintln!("Error reading config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub(crate) fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Config::from)
    }

    // Getters

    #[inline]
    pub(crate) fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub(crate) fn limits(&self) -> &Limits {
        &self.limits
    }

    #[inline]
    pub(crate) fn share(&self) -> &Share {
        &self.share
    }

    #[inline]
    pub(crate) fn providers(&self) -> &[ProviderEntry] {
        &self.providers
    }

    #[inline]
    pub(crate) fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Determine the default configuration file path.
    /// Checks the FOLIO_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/folio/folio.toml,
    pub(crate) fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("folio/folio.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/folio/folio.toml");
        }
        PathBuf::from("folio.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub(crate) fn generate_default(path: &Path, minimal: bool) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {:?}", path),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = if minimal { MINIMAL_TOML } else { FULL_TOML };
        fs::write(path, content)?;
        println!(
            "{} Default config generated at {:?}",
            if minimal { "Minimal" } else { "Full" },
            path
        );
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

const FULL_TOML: &str = r##"# folio.toml - default configuration for folio

# Note:
# Commented values are the internal defaults of folio.
# Run 'folio --config-help' for a description of every option.

[general]
# max_recent_files = 5          # 1..=50
# data_dir = "~/.local/share/folio"
log_level = "info"

# Size limits deciding how a document is opened.
[limits]
# large_file_bytes = 1048576    # larger files open as a read-only preview
# preview_lines = 1000
# long_line_chars = 10000       # longer lines trigger a warning before editing
# pagination_lines = 1000       # more lines than this are edited in windows
# pagination_chars = 100000
# window_size = 500
# long_line_window_size = 15

# Command receiving shared text on stdin. {title} is replaced by the document name,
# which is also exported as FOLIO_SHARE_TITLE.
# [share]
# cmd = "wl-copy"
# args = []

# Mount a directory under content://<authority>/...
# [[providers]]
# authority = "notes"
# root = "~/Notes"

# [keys]
# open_recent = ["Enter"]
# go_up = ["k", "Up"]
# go_down = ["j", "Down"]
# open_file = ["o"]
# new_file = ["n"]
# remove_recent = ["d", "Delete"]
# clear_recents = ["Shift+c"]
# quit = ["q", "Ctrl+q"]
# keybind_help = ["?", "F1"]
# save = ["Ctrl+s"]
# rename = ["Ctrl+r"]
# share = ["Ctrl+e"]
# next_window = ["Ctrl+n", "Alt+Down"]
# previous_window = ["Ctrl+p", "Alt+Up"]
# back = ["Esc"]
"##;

const MINIMAL_TOML: &str = r##"# folio.toml - minimal configuration
# Only a few basic options. The rest uses internal defaults.
# For advanced options, see folio --config-help.

[general]
max_recent_files = 5
log_level = "info"
"##;
