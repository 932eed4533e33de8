//! JSON file backed key/value store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::Result;

/// File name used inside the data directory.
pub const STORE_FILE_NAME: &str = "store.json";

/// Key/value store persisted as a single JSON object on disk.
///
/// Several processes may share one data directory (for example `quotebook
/// watch` next to one-shot commands), so every `set` re-reads the file and
/// only replaces its own key before writing. Writes go through a sibling temp
/// file and a rename so a crash mid-write leaves the previous document intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing entries.
    ///
    /// A missing or empty file is an empty store. A file that is not a JSON
    /// object of strings is copied aside to `store.json.corrupt` and the store
    /// starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = read_entries(&path)?;

        tracing::debug!(
            "Opened key/value store at {} ({} keys)",
            path.display(),
            entries.len()
        );
        Ok(Self { path, entries })
    }

    /// Open `store.json` inside `data_dir`.
    pub fn open_in_dir(data_dir: &Path) -> Result<Self> {
        Self::open(data_dir.join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, serialized)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = read_entries(&self.path)?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        self.entries = entries;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let raw = std::fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    match serde_json::from_str(&raw) {
        Ok(entries) => Ok(entries),
        Err(error) => {
            let backup = corrupt_backup_path(path);
            std::fs::copy(path, &backup)?;
            tracing::warn!(
                "Store at {} is unreadable ({}), starting empty; previous contents kept at {}",
                path.display(),
                error,
                backup.display()
            );
            Ok(BTreeMap::new())
        }
    }
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open_in_dir(dir.path()).unwrap();
        assert_eq!(store.get("quotes").unwrap(), None);
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = JsonFileStore::open_in_dir(dir.path()).unwrap();
            store.set("selectedCategory", "Motivation").unwrap();
        }

        let store = JsonFileStore::open_in_dir(dir.path()).unwrap();
        assert_eq!(
            store.get("selectedCategory").unwrap().as_deref(),
            Some("Motivation")
        );
    }

    #[test]
    fn set_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = JsonFileStore::open_in_dir(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join(STORE_FILE_NAME).exists());
    }

    #[test]
    fn set_keeps_keys_written_by_another_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut long_lived = JsonFileStore::open_in_dir(dir.path()).unwrap();
        long_lived.set("quotes", "[]").unwrap();

        let mut other = JsonFileStore::open_in_dir(dir.path()).unwrap();
        other.set("selectedCategory", "Humor").unwrap();

        long_lived
            .set("quotes", r#"[{"text":"a","category":"X"}]"#)
            .unwrap();
        assert_eq!(
            long_lived.get("selectedCategory").unwrap().as_deref(),
            Some("Humor")
        );

        let reopened = JsonFileStore::open_in_dir(dir.path()).unwrap();
        assert_eq!(
            reopened.get("selectedCategory").unwrap().as_deref(),
            Some("Humor")
        );
        assert_eq!(
            reopened.get("quotes").unwrap().as_deref(),
            Some(r#"[{"text":"a","category":"X"}]"#)
        );
    }

    #[test]
    fn corrupt_document_is_kept_aside_and_store_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("quotes").unwrap(), None);

        let backup = dir.path().join("store.json.corrupt");
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "[1, 2, 3]");

        store.set("k", "v").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }
}
