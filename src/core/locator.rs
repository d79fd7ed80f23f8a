//! Locators: the opaque strings folio uses to identify a document.
//!
//! Two schemes are understood:
//! - filesystem paths, written either bare (`notes.txt`, `/tmp/a.md`) or as `file://` URIs
//! - provider handles, `content://<authority>/<path>`, resolved through a [ContentProvider]
//!
//! [Locator]'s `Display` output is the canonical form and is what the recent-files store keys on.
//!
//! [ContentProvider]: crate::core::provider::ContentProvider

use crate::core::error::{Error, Result};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

pub const FILE_SCHEME: &str = "file";
pub const CONTENT_SCHEME: &str = "content";

/// Used when a locator has no usable last segment.
pub const UNTITLED_NAME: &str = "Untitled.txt";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    File(PathBuf),
    Content { authority: String, path: String },
}

impl Locator {
    /// Parses a locator from user input, a recent-files entry or the command line.
    ///
    /// Bare paths are made absolute against the current directory.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let unsupported = || Error::UnsupportedLocator {
            locator: raw.to_string(),
        };

        if trimmed.is_empty() {
            return Err(unsupported());
        }

        if !trimmed.contains("://") {
            let path = std::path::absolute(trimmed).map_err(|_| unsupported())?;
            return Ok(Locator::File(path));
        }

        let url = Url::parse(trimmed).map_err(|_| unsupported())?;
        match url.scheme() {
            FILE_SCHEME => url
                .to_file_path()
                .map(Locator::File)
                .map_err(|_| unsupported()),
            CONTENT_SCHEME => {
                let authority = url.host_str().filter(|h| !h.is_empty()).ok_or_else(unsupported)?;
                let path = percent_decode(url.path()).ok_or_else(unsupported)?;
                Ok(Locator::Content {
                    authority: authority.to_string(),
                    path,
                })
            }
            _ => Err(unsupported()),
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            Locator::File(_) => FILE_SCHEME,
            Locator::Content { .. } => CONTENT_SCHEME,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Locator::File(path) => Some(path),
            Locator::Content { .. } => None,
        }
    }

    /// The last path segment, or [UNTITLED_NAME] if there is none.
    pub fn fallback_name(&self) -> String {
        let last = match self {
            Locator::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            Locator::Content { path, .. } => path
                .rsplit('/')
                .find(|s| !s.is_empty())
                .map(str::to_string),
        };
        last.unwrap_or_else(|| UNTITLED_NAME.to_string())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::File(path) => match Url::from_file_path(path) {
                Ok(url) => write!(f, "{url}"),
                Err(()) => write!(f, "{}", path.display()),
            },
            Locator::Content { authority, path } => {
                match Url::parse(&format!("{CONTENT_SCHEME}://{authority}/")) {
                    Ok(mut url) => {
                        url.set_path(path);
                        write!(f, "{url}")
                    }
                    Err(_) => write!(f, "{CONTENT_SCHEME}://{authority}{path}"),
                }
            }
        }
    }
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Locator::parse(s)
    }
}

/// Decodes `%XX` escapes in a URL path. Returns None for malformed escapes or non UTF-8 output.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
