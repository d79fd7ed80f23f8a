//! Helpers for folio.
//!
//! Small utilities shared by the config, app and ui modules:
//! - Home directory handling (`~` expansion and shortening)
//! - Choosing an unused file name for new documents
//! - Resolving the data directory that holds the recent files and the log
//! - Clamping the recent-files capacity
//! - Size and width formatting for the status line and dialogs

use humansize::{DECIMAL, format_size};
use unicode_width::UnicodeWidthChar;

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Lowest accepted `max_recent_files`.
pub const MIN_RECENT_FILES: usize = 1;
/// Highest accepted `max_recent_files`.
pub const MAX_RECENT_FILES_LIMIT: usize = 50;
/// Environment override for the data directory.
pub const DATA_DIR_ENV: &str = "FOLIO_DATA_DIR";

pub fn get_home() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expands a leading `~` to the home directory.
pub fn expand_home_path(path: &str) -> PathBuf {
    if path == "~" {
        return get_home().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path
        .strip_prefix("~/")
        .or_else(|| path.strip_prefix(&format!("~{MAIN_SEPARATOR}")))
        && let Some(home) = get_home()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Shows the home directory as `~` in a path.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let Some(home) = get_home() else {
        return path.display().to_string();
    };
    match path.strip_prefix(&home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~{}{}", MAIN_SEPARATOR, rest.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Finds the next free file name by appending `_1`, `_2`, ... to the stem.
///
/// Example: "notes.txt" -> "notes_1.txt"
pub fn get_unused_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| parent.join(format!("{stem}_{n}{ext}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Clamps the recent-files capacity into `MIN_RECENT_FILES..=MAX_RECENT_FILES_LIMIT`.
pub fn clamp_recent_files(value: usize) -> usize {
    let clamped = value.clamp(MIN_RECENT_FILES, MAX_RECENT_FILES_LIMIT);
    if clamped != value {
        eprintln!(
            "[Warning] max_recent_files={} out of range ({}..={}), clamped to {}",
            value, MIN_RECENT_FILES, MAX_RECENT_FILES_LIMIT, clamped
        );
    }
    clamped
}

/// Where recent files and the log live.
///
/// Checks the config override first, then `FOLIO_DATA_DIR`, then the platform data
/// directory (`~/.local/share/folio` on Linux).
pub fn resolve_data_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return expand_home_path(&dir);
    }
    if let Some(dir) = dirs::data_dir() {
        return dir.join("folio");
    }
    PathBuf::from(".folio")
}

/// Byte size for people, e.g. "1.05 MB". Unknown sizes show as "Unknown".
pub fn format_file_size(size: Option<u64>) -> String {
    match size {
        Some(bytes) => format_size(bytes, DECIMAL),
        None => "Unknown".to_string(),
    }
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Helper utils tests
#[cfg(test)]
mod tests {
    use super::*;

    use std::error;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn unused_path_increments_on_collision() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("notes.txt");
        assert_eq!(get_unused_path(&path), path);

        File::create(&path)?;
        assert_eq!(get_unused_path(&path), dir.path().join("notes_1.txt"));

        File::create(dir.path().join("notes_1.txt"))?;
        assert_eq!(get_unused_path(&path), dir.path().join("notes_2.txt"));
        Ok(())
    }

    #[test]
    fn unused_path_without_extension() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("README");
        File::create(&path)?;
        assert_eq!(get_unused_path(&path), dir.path().join("README_1"));
        Ok(())
    }

    #[test]
    fn recent_files_capacity_is_clamped() {
        assert_eq!(clamp_recent_files(0), MIN_RECENT_FILES);
        assert_eq!(clamp_recent_files(5), 5);
        assert_eq!(clamp_recent_files(10_000), MAX_RECENT_FILES_LIMIT);
    }

    #[test]
    fn configured_data_dir_wins() {
        let dir = PathBuf::from("/tmp/folio-data");
        assert_eq!(resolve_data_dir(Some(&dir)), dir);
    }

    #[test]
    fn home_expansion_and_shortening() {
        let Some(home) = get_home() else {
            return;
        };
        assert_eq!(expand_home_path("~/notes"), home.join("notes"));
        assert_eq!(expand_home_path("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(shorten_home_path(&home), "~");
        assert_eq!(
            shorten_home_path(home.join("a.txt")),
            format!("~{}a.txt", MAIN_SEPARATOR)
        );
    }

    #[test]
    fn sizes_and_widths() {
        assert_eq!(format_file_size(None), "Unknown");
        assert_eq!(format_file_size(Some(0)), "0 B");
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }
}
