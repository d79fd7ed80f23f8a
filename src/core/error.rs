//! Error taxonomy for folio's core operations.
//!
//! Load failures ([Error::NotFound], [Error::PermissionDenied], [Error::ReadError]) are recovered
//! by the UI into a "re-pick or remove from recents" choice. Save failures keep the edit buffer
//! so the user can retry. Nothing here is retried automatically.

use std::io;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: {locator}")]
    NotFound { locator: String },

    #[error("permission denied: {locator}")]
    PermissionDenied { locator: String },

    #[error("error reading {locator}: {source}")]
    ReadError {
        locator: String,
        #[source]
        source: io::Error,
    },

    #[error("unsupported locator: {locator}")]
    UnsupportedLocator { locator: String },

    #[error("error writing {locator}: {source}")]
    WriteError {
        locator: String,
        #[source]
        source: io::Error,
    },

    #[error("recent files store: {0}")]
    Store(#[source] io::Error),

    #[error("share failed: {0}")]
    Share(String),
}

impl Error {
    /// Maps an I/O error raised while resolving or reading `locator`.
    pub fn from_read(locator: impl Into<String>, err: io::Error) -> Self {
        let locator = locator.into();
        match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound { locator },
            io::ErrorKind::PermissionDenied => Error::PermissionDenied { locator },
            _ => Error::ReadError {
                locator,
                source: err,
            },
        }
    }

    /// Maps an I/O error raised while writing `locator`.
    pub fn from_write(locator: impl Into<String>, err: io::Error) -> Self {
        let locator = locator.into();
        match err.kind() {
            io::ErrorKind::PermissionDenied => Error::PermissionDenied { locator },
            _ => Error::WriteError {
                locator,
                source: err,
            },
        }
    }

    /// The locator the failure refers to, if any.
    pub fn locator(&self) -> Option<&str> {
        match self {
            Error::NotFound { locator }
            | Error::PermissionDenied { locator }
            | Error::ReadError { locator, .. }
            | Error::UnsupportedLocator { locator }
            | Error::WriteError { locator, .. } => Some(locator),
            Error::Store(_) | Error::Share(_) => None,
        }
    }

    /// Short human readable category, used as a dialog title.
    pub fn category(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "File Not Found",
            Error::PermissionDenied { .. } => "Permission Denied",
            Error::ReadError { .. } => "Error reading file",
            Error::UnsupportedLocator { .. } => "Unsupported Location",
            Error::WriteError { .. } => "Error saving file",
            Error::Store(_) => "Recent Files Unavailable",
            Error::Share(_) => "Share Failed",
        }
    }

    /// What the user can do about it.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => {
                "If the file was moved or renamed please re-pick it. Otherwise, you may remove it from the list."
            }
            Error::PermissionDenied { .. } => {
                "Permission to access this file was denied. Please re-pick the file or remove it from the list."
            }
            Error::ReadError { .. } => {
                "An error occurred while reading the file. Please try re-picking it."
            }
            Error::UnsupportedLocator { .. } => {
                "This location cannot be opened or saved by folio."
            }
            Error::WriteError { .. } => "Your changes are still in the editor. Try saving again.",
            Error::Store(_) => "The list of recent files could not be updated.",
            Error::Share(_) => "Check the [share] command in folio.toml.",
        }
    }

    /// True for failures that should offer "re-pick" / "remove from recents".
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. } | Error::PermissionDenied { .. } | Error::ReadError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds_map_to_distinct_variants() {
        let nf = Error::from_read("file:///a", io::Error::from(io::ErrorKind::NotFound));
        let pd = Error::from_read("file:///a", io::Error::from(io::ErrorKind::PermissionDenied));
        let other = Error::from_read("file:///a", io::Error::other("boom"));

        assert!(matches!(nf, Error::NotFound { .. }));
        assert!(matches!(pd, Error::PermissionDenied { .. }));
        assert!(matches!(other, Error::ReadError { .. }));

        for e in [&nf, &pd, &other] {
            assert!(e.is_load_failure());
            assert_eq!(e.locator(), Some("file:///a"));
        }
        assert_eq!(nf.category(), "File Not Found");
        assert_eq!(pd.category(), "Permission Denied");
        assert_eq!(other.category(), "Error reading file");
    }

    #[test]
    fn write_errors_are_not_load_failures() {
        let w = Error::from_write("file:///a", io::Error::other("disk full"));
        assert!(matches!(w, Error::WriteError { .. }));
        assert!(!w.is_load_failure());
    }
}
