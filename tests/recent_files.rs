use folio_tui::core::{RecentFile, RecentFiles};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn locators(store: &RecentFiles) -> Vec<String> {
    store
        .list()
        .iter()
        .map(|f| f.locator().to_string())
        .collect()
}

#[test]
fn test_six_adds_keep_five_most_recent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = RecentFiles::in_dir(dir.path(), 5);

    for i in 0..6 {
        store.add(RecentFile::new(format!("f{i}.txt"), format!("file:///f{i}.txt")))?;
        assert!(store.list().len() <= 5);
    }

    let list = locators(&store);
    assert_eq!(list.len(), 5);
    assert_eq!(list[0], "file:///f5.txt");
    assert!(!list.contains(&"file:///f0.txt".to_string()));
    Ok(())
}

#[test]
fn test_reopening_refreshes_instead_of_duplicating() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = RecentFiles::in_dir(dir.path(), 3);

    store.add(RecentFile::new("a", "file:///a"))?;
    store.add(RecentFile::new("b", "file:///b"))?;
    store.add(RecentFile::new("c", "file:///c"))?;
    store.add(RecentFile::new("a again", "file:///a"))?;
    store.add(RecentFile::new("d", "file:///d"))?;

    // "b" was the least recently used
    assert_eq!(locators(&store), ["file:///d", "file:///a", "file:///c"]);
    assert_eq!(store.list()[1].name(), "a again");
    Ok(())
}

#[test]
fn test_remove_is_idempotent_and_persisted() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = RecentFiles::in_dir(dir.path(), 5);
    store.add(RecentFile::new("keep|me", "file:///keep"))?;
    store.add(RecentFile::new("drop", "file:///drop"))?;

    store.remove("file:///drop")?;
    store.remove("file:///drop")?;
    store.remove("file:///never-added")?;

    let reopened = RecentFiles::in_dir(dir.path(), 5);
    let list = reopened.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name(), "keep|me");
    assert_eq!(list[0].locator(), "file:///keep");
    Ok(())
}

#[test]
fn test_rename_keeps_locator_and_position() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = RecentFiles::in_dir(dir.path(), 5);
    store.add(RecentFile::new("one", "file:///1"))?;
    store.add(RecentFile::new("two", "file:///2"))?;

    assert!(store.rename("file:///1", "uno")?);
    assert!(!store.rename("file:///3", "tres")?);

    let list = store.list();
    assert_eq!(list[1].name(), "uno");
    assert_eq!(list[1].locator(), "file:///1");
    assert_eq!(list[0].name(), "two");
    Ok(())
}

#[test]
fn test_corrupt_store_starts_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = RecentFiles::in_dir(dir.path(), 5);
    fs::write(store.path(), "name|file:///old\n")?;
    assert!(store.list().is_empty());

    store.add(RecentFile::new("new", "file:///new"))?;
    assert_eq!(locators(&store), ["file:///new"]);

    store.clear()?;
    assert!(RecentFiles::in_dir(dir.path(), 5).list().is_empty());
    Ok(())
}

#[test]
fn test_concurrent_adds_are_not_lost() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = Arc::new(RecentFiles::in_dir(dir.path(), 50));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..5 {
                    let loc = format!("file:///t{t}/{i}");
                    if store.add(RecentFile::new(loc.clone(), loc)).is_err() {
                        return false;
                    }
                }
                true
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().map_err(|_| "writer thread panicked")?);
    }
    assert_eq!(store.list().len(), 40);
    Ok(())
}
