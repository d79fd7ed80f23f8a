//! Recent-files persistence.
//!
//! A bounded, least-recently-used history of opened documents, stored as a small JSON document
//! under folio's data directory. Every mutation runs read -> mutate -> write under the store's
//! lock and the write replaces the file through a rename, so a crash never leaves a partial list.

use crate::core::error::{Error, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default number of entries kept.
pub const MAX_RECENT_FILES: usize = 5;
/// Store namespace, doubles as the file stem.
pub const RECENT_FILES_KEY: &str = "recent_files";

const STORE_VERSION: u32 = 1;

/// One remembered document. Identity is the locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentFile {
    name: String,
    locator: String,
    last_used: DateTime<Utc>,
}

impl RecentFile {
    pub fn new(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            last_used: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn last_used(&self) -> DateTime<Utc> {
        self.last_used
    }
}

#[derive(Serialize, Deserialize)]
struct RecentFilesFile {
    version: u32,
    files: Vec<RecentFile>,
}

/// The persisted recent-files history.
pub struct RecentFiles {
    path: PathBuf,
    capacity: usize,
    lock: Mutex<()>,
}

impl RecentFiles {
    /// Opens (lazily) the store at `<dir>/recent_files.json`.
    pub fn in_dir(dir: &Path, capacity: usize) -> Self {
        Self::at_path(dir.join(format!("{RECENT_FILES_KEY}.json")), capacity)
    }

    pub fn at_path(path: PathBuf, capacity: usize) -> Self {
        Self {
            path,
            capacity: capacity.max(1),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts or refreshes an entry.
    ///
    /// An entry with the same locator is replaced (new name, new timestamp). Otherwise, when the
    /// store is full, the least recently used entry is evicted first.
    pub fn add(&self, mut entry: RecentFile) -> Result<()> {
        self.mutate(|files| {
            entry.last_used = Utc::now();
            files.retain(|f| f.locator != entry.locator);
            while files.len() >= self.capacity {
                let evicted = files.remove(0);
                log::debug!("recent files full, evicting {}", evicted.locator);
            }
            files.push(entry);
            true
        })
    }

    /// Removes the entry for `locator`. Missing entries are not an error.
    pub fn remove(&self, locator: &str) -> Result<()> {
        self.mutate(|files| {
            let before = files.len();
            files.retain(|f| f.locator != locator);
            files.len() != before
        })
    }

    /// Changes the display name of the entry for `locator`, keeping its position and locator.
    /// Returns false when no such entry exists.
    pub fn rename(&self, locator: &str, new_name: &str) -> Result<bool> {
        let mut found = false;
        self.mutate(|files| {
            if let Some(f) = files.iter_mut().find(|f| f.locator == locator) {
                f.name = new_name.to_string();
                found = true;
            }
            found
        })?;
        Ok(found)
    }

    /// Current entries, most recently used first.
    pub fn list(&self) -> Vec<RecentFile> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut files = self.read();
        files.reverse();
        files
    }

    pub fn clear(&self) -> Result<()> {
        self.mutate(|files| {
            files.clear();
            true
        })
    }

    /// Runs one serialized read-modify-write cycle. `f` returns whether anything changed.
    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<RecentFile>) -> bool,
    {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut files = self.read();
        if f(&mut files) {
            self.write(files).map_err(Error::Store)?;
        }
        Ok(())
    }

    /// Loads the on-disk list, oldest first. The file order is the use order; `last_used` is only
    /// shown. Missing or unreadable data counts as empty.
    fn read(&self) -> Vec<RecentFile> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("cannot read {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };
        match serde_json::from_slice::<RecentFilesFile>(&data) {
            Ok(file) if file.version == STORE_VERSION => {
                let mut files = file.files;
                let overflow = files.len().saturating_sub(self.capacity);
                files.drain(..overflow);
                files
            }
            Ok(file) => {
                log::warn!(
                    "ignoring {} with unknown version {}",
                    self.path.display(),
                    file.version
                );
                Vec::new()
            }
            Err(e) => {
                log::warn!("ignoring corrupt {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn write(&self, files: Vec<RecentFile>) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let doc = RecentFilesFile {
            version: STORE_VERSION,
            files,
        };
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer_pretty(&mut file, &doc).map_err(io::Error::other)?;
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn locators(store: &RecentFiles) -> Vec<String> {
        store.list().iter().map(|f| f.locator().to_string()).collect()
    }

    #[test]
    fn eviction_keeps_the_most_recent_entries() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = RecentFiles::in_dir(dir.path(), MAX_RECENT_FILES);

        for i in 0..6 {
            store.add(RecentFile::new(format!("f{i}.txt"), format!("file:///f{i}.txt")))?;
        }

        let list = locators(&store);
        assert_eq!(list.len(), 5);
        assert!(!list.contains(&"file:///f0.txt".to_string()), "oldest must be evicted");
        assert_eq!(list[0], "file:///f5.txt");
        Ok(())
    }

    #[test]
    fn re_adding_refreshes_instead_of_duplicating() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = RecentFiles::in_dir(dir.path(), 3);

        store.add(RecentFile::new("a", "file:///a"))?;
        store.add(RecentFile::new("b", "file:///b"))?;
        store.add(RecentFile::new("c", "file:///c"))?;
        store.add(RecentFile::new("a2", "file:///a"))?;
        store.add(RecentFile::new("d", "file:///d"))?;

        assert_eq!(locators(&store), vec!["file:///d", "file:///a", "file:///c"]);
        assert_eq!(store.list()[1].name(), "a2");
        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = RecentFiles::in_dir(dir.path(), MAX_RECENT_FILES);
        store.add(RecentFile::new("a", "file:///a"))?;

        store.remove("file:///a")?;
        store.remove("file:///a")?;
        store.remove("file:///never-added")?;
        assert!(store.list().is_empty());
        Ok(())
    }

    #[test]
    fn rename_preserves_locator_and_order() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = RecentFiles::in_dir(dir.path(), MAX_RECENT_FILES);
        store.add(RecentFile::new("a", "file:///a"))?;
        store.add(RecentFile::new("b", "file:///b"))?;

        assert!(store.rename("file:///a", "Renamed")?);
        assert!(!store.rename("file:///zzz", "Nope")?);

        let list = store.list();
        assert_eq!(list[1].locator(), "file:///a");
        assert_eq!(list[1].name(), "Renamed");
        assert_eq!(list[0].name(), "b");
        Ok(())
    }

    #[test]
    fn names_with_pipes_survive_persistence() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = RecentFiles::in_dir(dir.path(), MAX_RECENT_FILES);
        store.add(RecentFile::new("a|b.txt", "content://notes/x%7Cy"))?;

        let reopened = RecentFiles::in_dir(dir.path(), MAX_RECENT_FILES);
        let list = reopened.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name(), "a|b.txt");
        assert_eq!(list[0].locator(), "content://notes/x%7Cy");
        Ok(())
    }

    #[test]
    fn corrupt_store_reads_as_empty_and_is_replaced() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = RecentFiles::in_dir(dir.path(), MAX_RECENT_FILES);
        fs::write(store.path(), "{ not json")?;

        assert!(store.list().is_empty());
        store.add(RecentFile::new("a", "file:///a"))?;
        assert_eq!(store.list().len(), 1);
        Ok(())
    }

    #[test]
    fn clear_empties_the_store() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = RecentFiles::in_dir(dir.path(), MAX_RECENT_FILES);
        store.add(RecentFile::new("a", "file:///a"))?;
        store.clear()?;
        assert!(store.list().is_empty());
        assert!(store.path().exists());
        Ok(())
    }

    #[test]
    fn concurrent_adds_never_exceed_capacity() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = std::sync::Arc::new(RecentFiles::in_dir(dir.path(), MAX_RECENT_FILES));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        store
                            .add(RecentFile::new("x", format!("file:///t{t}-{i}")))
                            .expect("add should succeed");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().map_err(|_| "adder thread panicked")?;
        }

        assert_eq!(store.list().len(), MAX_RECENT_FILES);
        Ok(())
    }

    #[test]
    fn file_order_wins_over_timestamps() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = RecentFiles::in_dir(dir.path(), 2);
        // "b" was added last, after the clock stepped back
        fs::write(
            store.path(),
            r#"{"version":1,"files":[
                {"name":"a","locator":"file:///a","last_used":"2030-01-01T00:00:00Z"},
                {"name":"b","locator":"file:///b","last_used":"2020-01-01T00:00:00Z"}
            ]}"#,
        )?;
        assert_eq!(locators(&store), ["file:///b", "file:///a"]);

        store.add(RecentFile::new("c", "file:///c"))?;
        assert_eq!(locators(&store), ["file:///c", "file:///b"]);
        Ok(())
    }
}
