//! Content loading and saving.
//!
//! [ContentLoader::open] resolves a locator's metadata, classifies it by size, reads either the
//! whole document or a bounded preview, and records it in the recent-files store.
//! [ContentLoader::save] writes a full replacement of the document.

use crate::core::error::{Error, Result};
use crate::core::locator::Locator;
use crate::core::mime::guess_mime;
use crate::core::mode::DocumentMetrics;
use crate::core::provider::{Grant, ProviderRegistry, ResourceMeta, WriteMode};
use crate::core::recent::{RecentFile, RecentFiles};

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::Arc;

/// Files larger than this (in bytes) open as a read-only preview.
pub const LARGE_FILE_BYTES: u64 = 1_048_576;
/// Number of lines read for a large-file preview.
pub const LARGE_FILE_PREVIEW_LINES: usize = 1000;

/// Whether a file of `size` bytes counts as large. Unknown sizes never do.
pub fn is_large_file(size: Option<u64>, threshold: u64) -> bool {
    size.is_some_and(|s| s > threshold)
}

/// Size policy for [ContentLoader::open].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLimits {
    pub large_file_bytes: u64,
    pub preview_lines: usize,
}

impl Default for LoadLimits {
    fn default() -> Self {
        Self {
            large_file_bytes: LARGE_FILE_BYTES,
            preview_lines: LARGE_FILE_PREVIEW_LINES,
        }
    }
}

/// A document's text: all of it, or the head of a large file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Full(String),
    Preview(String),
}

impl Content {
    pub fn text(&self) -> &str {
        match self {
            Content::Full(s) | Content::Preview(s) => s,
        }
    }
}

/// An opened document.
#[derive(Debug, Clone)]
pub struct FileSession {
    locator: Locator,
    display_name: String,
    mime_type: Option<String>,
    size: Option<u64>,
    content: Content,
    metrics: DocumentMetrics,
}

impl FileSession {
    pub fn new(
        locator: Locator,
        display_name: String,
        mime_type: Option<String>,
        size: Option<u64>,
        content: Content,
    ) -> Self {
        let metrics = DocumentMetrics::measure(content.text());
        Self {
            locator,
            display_name,
            mime_type,
            size,
            content,
            metrics,
        }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn text(&self) -> &str {
        self.content.text()
    }

    pub fn metrics(&self) -> &DocumentMetrics {
        &self.metrics
    }

    pub fn is_large_file(&self) -> bool {
        matches!(self.content, Content::Preview(_))
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    /// Replaces the text after a successful save. Previews stay previews.
    pub fn replace_text(&mut self, text: String) {
        self.metrics = DocumentMetrics::measure(&text);
        self.size = Some(text.len() as u64);
        self.content = match self.content {
            Content::Full(_) => Content::Full(text),
            Content::Preview(_) => Content::Preview(text),
        };
    }
}

pub struct ContentLoader {
    providers: ProviderRegistry,
    recents: Arc<RecentFiles>,
    limits: LoadLimits,
}

impl ContentLoader {
    pub fn new(providers: ProviderRegistry, recents: Arc<RecentFiles>, limits: LoadLimits) -> Self {
        Self {
            providers,
            recents,
            limits,
        }
    }

    pub fn recents(&self) -> &Arc<RecentFiles> {
        &self.recents
    }

    pub fn limits(&self) -> &LoadLimits {
        &self.limits
    }

    /// Opens a document.
    ///
    /// Large files (by reported size) are never read in full; only the first
    /// `preview_lines` lines are kept. On success the document is added to the recent files.
    pub fn open(&self, locator: &Locator) -> Result<FileSession> {
        let key = locator.to_string();
        let meta = self.resolve_meta(locator)?;
        let display_name = meta
            .display_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| locator.fallback_name());
        let mime_type = meta
            .mime_type
            .or_else(|| guess_mime(&display_name).map(str::to_string));

        self.take_grant(locator);

        let reader = self.open_reader(locator)?;
        let content = if is_large_file(meta.size, self.limits.large_file_bytes) {
            log::info!(
                "{} is {} bytes, loading a {} line preview",
                key,
                meta.size.unwrap_or_default(),
                self.limits.preview_lines
            );
            Content::Preview(
                read_preview(reader, self.limits.preview_lines)
                    .map_err(|e| Error::from_read(&key, e))?,
            )
        } else {
            Content::Full(read_full(reader).map_err(|e| Error::from_read(&key, e))?)
        };

        if let Err(e) = self.recents.add(RecentFile::new(&display_name, &key)) {
            log::warn!("could not record {} in recent files: {}", key, e);
        }

        log::debug!("opened {} as {:?}", key, display_name);
        Ok(FileSession::new(
            locator.clone(),
            display_name,
            mime_type,
            meta.size,
            content,
        ))
    }

    /// Writes `content` as the full new body of the document.
    pub fn save(&self, locator: &Locator, content: &str) -> Result<()> {
        let key = locator.to_string();
        let mut writer: Box<dyn Write + Send> = match locator {
            Locator::File(path) => {
                Box::new(File::create(path).map_err(|e| Error::from_write(&key, e))?)
            }
            Locator::Content { authority, path } => {
                let provider = self
                    .providers
                    .get(authority)
                    .ok_or_else(|| Error::UnsupportedLocator {
                        locator: key.clone(),
                    })?;
                provider
                    .open_write(path, WriteMode::Truncate)
                    .map_err(|e| Error::from_write(&key, e))?
            }
        };
        writer
            .write_all(content.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| Error::from_write(&key, e))?;
        log::info!("saved {} ({} bytes)", key, content.len());
        Ok(())
    }

    /// Renames the session's display name and its recent-files entry. The document itself is
    /// not moved.
    pub fn rename(&self, session: &mut FileSession, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(());
        }
        session.set_display_name(new_name);
        self.recents.rename(&session.locator().to_string(), new_name)?;
        Ok(())
    }

    fn resolve_meta(&self, locator: &Locator) -> Result<ResourceMeta> {
        let key = locator.to_string();
        match locator {
            Locator::File(path) => {
                let meta = fs::metadata(path).map_err(|e| Error::from_read(&key, e))?;
                Ok(ResourceMeta {
                    display_name: None,
                    size: meta.is_file().then(|| meta.len()),
                    mime_type: None,
                })
            }
            Locator::Content { authority, path } => {
                let provider = self
                    .providers
                    .get(authority)
                    .ok_or(Error::NotFound { locator: key.clone() })?;
                provider.query(path).map_err(|e| Error::from_read(&key, e))
            }
        }
    }

    fn open_reader(&self, locator: &Locator) -> Result<Box<dyn Read + Send>> {
        let key = locator.to_string();
        match locator {
            Locator::File(path) => Ok(Box::new(
                File::open(path).map_err(|e| Error::from_read(&key, e))?,
            )),
            Locator::Content { authority, path } => {
                let provider = self
                    .providers
                    .get(authority)
                    .ok_or(Error::NotFound { locator: key.clone() })?;
                provider
                    .open_read(path)
                    .map_err(|e| Error::from_read(&key, e))
            }
        }
    }

    /// Asks for durable read/write access. Never fails the open.
    fn take_grant(&self, locator: &Locator) {
        let Locator::Content { authority, path } = locator else {
            log::debug!("{} needs no persistable grant", locator);
            return;
        };
        let Some(provider) = self.providers.get(authority) else {
            return;
        };
        match provider.take_persistable_grant(path, Grant::ReadWrite) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::Unsupported => {
                log::debug!("provider {} has no durable grants", authority);
            }
            Err(e) => log::warn!("could not persist access to {}: {}", locator, e),
        }
    }
}

/// Reads everything, replacing invalid UTF-8.
fn read_full(mut reader: impl Read) -> io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads at most `max_lines` lines and joins them with `\n`.
fn read_preview(reader: impl Read, max_lines: usize) -> io::Result<String> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::with_capacity(max_lines.min(4096));
    let mut buf = Vec::new();
    while lines.len() < max_lines {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }
    Ok(lines.join("\n"))
}
