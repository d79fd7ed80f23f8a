//! Provider-mediated document access for `content://` locators.
//!
//! A [ContentProvider] owns an authority and answers metadata queries, reads, truncating writes
//! and durable access grants for paths under it. [DirectoryProvider] is the built-in provider:
//! it mounts a local directory under an authority configured in `folio.toml`.

use crate::core::mime::guess_mime;

use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Metadata a provider can report for a document. Every field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMeta {
    pub display_name: Option<String>,
    pub size: Option<u64>,
    pub mime_type: Option<String>,
}

/// Write modes a provider must understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate the existing document, then write ("wt").
    Truncate,
}

/// Access a grant asks to keep across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grant {
    Read,
    ReadWrite,
}

pub trait ContentProvider: Send + Sync {
    fn authority(&self) -> &str;
    fn query(&self, path: &str) -> io::Result<ResourceMeta>;
    fn open_read(&self, path: &str) -> io::Result<Box<dyn Read + Send>>;
    fn open_write(&self, path: &str, mode: WriteMode) -> io::Result<Box<dyn Write + Send>>;

    /// Persists access to `path` for future sessions.
    ///
    /// Providers without durable grants return [io::ErrorKind::Unsupported].
    fn take_persistable_grant(&self, path: &str, grant: Grant) -> io::Result<()>;
}

/// Mounts a directory under an authority: `content://<authority>/a/b.txt` maps to `<root>/a/b.txt`.
pub struct DirectoryProvider {
    authority: String,
    root: PathBuf,
    grants: Mutex<HashSet<(String, Grant)>>,
}

impl DirectoryProvider {
    pub fn new(authority: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            authority: authority.into(),
            root: root.into(),
            grants: Mutex::new(HashSet::new()),
        }
    }

    pub fn has_grant(&self, path: &str, grant: Grant) -> bool {
        self.grants
            .lock()
            .map(|g| g.contains(&(path.to_string(), grant)))
            .unwrap_or(false)
    }

    /// Resolves a handle path below the root. Anything escaping the root is refused.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let rel = Path::new(path.trim_start_matches('/'));
        let mut out = self.root.clone();
        for comp in rel.components() {
            match comp {
                Component::Normal(part) => out.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        format!("path escapes provider root: {path}"),
                    ));
                }
            }
        }
        Ok(out)
    }
}

impl ContentProvider for DirectoryProvider {
    fn authority(&self) -> &str {
        &self.authority
    }

    fn query(&self, path: &str) -> io::Result<ResourceMeta> {
        let full = self.resolve(path)?;
        let meta = fs::metadata(&full)?;
        let display_name = full
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        let mime_type = display_name
            .as_deref()
            .and_then(guess_mime)
            .map(str::to_string);
        Ok(ResourceMeta {
            display_name,
            size: meta.is_file().then(|| meta.len()),
            mime_type,
        })
    }

    fn open_read(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let full = self.resolve(path)?;
        Ok(Box::new(File::open(full)?))
    }

    fn open_write(&self, path: &str, mode: WriteMode) -> io::Result<Box<dyn Write + Send>> {
        let full = self.resolve(path)?;
        let file = match mode {
            WriteMode::Truncate => OpenOptions::new().write(true).truncate(true).open(full)?,
        };
        Ok(Box::new(file))
    }

    fn take_persistable_grant(&self, path: &str, grant: Grant) -> io::Result<()> {
        self.resolve(path)?;
        let mut grants = self
            .grants
            .lock()
            .map_err(|_| io::Error::other("grant table poisoned"))?;
        grants.insert((path.to_string(), grant));
        Ok(())
    }
}

/// Authority -> provider lookup.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ContentProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider, replacing any previous one for the same authority.
    pub fn register(&mut self, provider: Arc<dyn ContentProvider>) {
        self.providers
            .insert(provider.authority().to_string(), provider);
    }

    pub fn get(&self, authority: &str) -> Option<&Arc<dyn ContentProvider>> {
        self.providers.get(authority)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
