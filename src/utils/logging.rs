//! File logging for folio.
//!
//! The terminal belongs to the UI while folio runs, so log records go to `folio.log` in the data
//! directory instead of stderr.

use log::LevelFilter;

use std::path::{Path, PathBuf};
use std::{fs, io};

pub const LOG_FILE_NAME: &str = "folio.log";

/// Parses a `log_level` setting. Unknown values fall back to `info`.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        other => {
            eprintln!("[Warning] unknown log_level {:?}, using \"info\"", other);
            LevelFilter::Info
        }
    }
}

/// Installs the global logger writing to `<data_dir>/folio.log`.
///
/// Returns the log file path. Fails if the directory or file cannot be created or a logger is
/// already installed.
pub fn init_logging(data_dir: &Path, level: LevelFilter) -> io::Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    let path = data_dir.join(LOG_FILE_NAME);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(&path)?)
        .apply()
        .map_err(io::Error::other)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }

    #[test]
    fn file_holds_only_logged_records() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = init_logging(dir.path(), LevelFilter::Info)?;
        assert_eq!(path, dir.path().join(LOG_FILE_NAME));

        log::debug!("below the level");
        log::info!("folio test record");
        log::logger().flush();

        let text = fs::read_to_string(&path)?;
        // other tests may log into the same file while this one runs
        assert!(text.lines().any(|l| l.contains("INFO") && l.ends_with("folio test record")));
        assert!(!text.contains("below the level"));
        assert!(!text.contains("starting"));

        assert!(init_logging(dir.path(), LevelFilter::Info).is_err());
        Ok(())
    }
}
