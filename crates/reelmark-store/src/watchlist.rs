//! Persisted watch list.
//!
//! The list lives in memory behind a `watch` channel and is written to
//! storage as one JSON array after every mutation. Opening the store reads
//! storage once and never writes, so an unreadable document is not
//! overwritten until the user changes the list.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reelmark_api::{ContentItem, ContentKey, MediaType};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Storage key of the watch list document.
pub const WATCH_LIST_KEY: &str = "watchList";

/// A content item snapshot saved at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchListEntry {
    /// Item as it was when added; never re-fetched.
    #[serde(flatten)]
    pub item: ContentItem,
    /// When the item was added. Entries saved without a timestamp get the
    /// time they were loaded.
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl WatchListEntry {
    /// Creates an entry added now.
    #[must_use]
    pub fn new(item: ContentItem) -> Self {
        Self {
            item,
            added_at: Utc::now(),
        }
    }

    /// Identity of the entry.
    #[must_use]
    pub const fn key(&self) -> ContentKey {
        self.item.key()
    }
}

/// Durable storage for the watch list document.
pub trait WatchListStorage {
    /// Reads the stored document, `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn save(&self, document: &str) -> Result<()>;
}

/// Watch list storage in the `SQLite` key/value table.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Wraps an open, migrated connection.
    #[must_use]
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens the database under `dir` (or the default data directory).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        let conn = reelmark_db::open_db(dir)?;
        Ok(Self::new(conn))
    }
}

impl WatchListStorage for SqliteStorage {
    fn load(&self) -> Result<Option<String>> {
        reelmark_db::load_value(&self.conn, WATCH_LIST_KEY)
    }

    fn save(&self, document: &str) -> Result<()> {
        reelmark_db::save_value(&self.conn, WATCH_LIST_KEY, document)
    }
}

/// Deduplicated, persisted watch list.
#[derive(Debug)]
pub struct WatchListStore<S> {
    storage: S,
    tx: watch::Sender<Vec<WatchListEntry>>,
}

impl<S: WatchListStorage> WatchListStore<S> {
    /// Loads the list from `storage`.
    ///
    /// Unreadable or malformed documents are logged and yield an empty
    /// list. Nothing is written.
    pub fn open(storage: S) -> Self {
        let entries = match storage.load() {
            Ok(Some(document)) => parse_document(&document),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "Failed to read watch list, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(entries = entries.len(), "Watch list loaded");

        Self {
            storage,
            tx: watch::Sender::new(entries),
        }
    }

    /// Adds `item` unless an entry with the same key exists.
    ///
    /// Returns `true` if the item was added.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved. The in-memory list
    /// keeps the new entry.
    pub fn add(&self, item: &ContentItem) -> Result<bool> {
        let added = self.tx.send_if_modified(|entries| {
            if entries.iter().any(|e| e.item.is(item.id, item.media_type)) {
                return false;
            }
            entries.push(WatchListEntry::new(item.clone()));
            true
        });
        if added {
            self.persist()?;
        }
        Ok(added)
    }

    /// Removes the entry with the given key.
    ///
    /// Returns `true` if an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved.
    pub fn remove(&self, id: u64, media_type: MediaType) -> Result<bool> {
        let removed = self.tx.send_if_modified(|entries| {
            let before = entries.len();
            entries.retain(|e| !e.item.is(id, media_type));
            entries.len() != before
        });
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Returns `true` if an entry with the given key exists.
    #[must_use]
    pub fn contains(&self, id: u64, media_type: MediaType) -> bool {
        self.tx.borrow().iter().any(|e| e.item.is(id, media_type))
    }

    /// Adds `item` if absent, removes it otherwise.
    ///
    /// Returns `true` if the item is in the list afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved.
    pub fn toggle(&self, item: &ContentItem) -> Result<bool> {
        if self.contains(item.id, item.media_type) {
            self.remove(item.id, item.media_type)?;
            Ok(false)
        } else {
            self.add(item)?;
            Ok(true)
        }
    }

    /// Removes every entry.
    ///
    /// Returns `true` if the list was non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved.
    pub fn clear(&self) -> Result<bool> {
        let cleared = self.tx.send_if_modified(|entries| {
            if entries.is_empty() {
                return false;
            }
            entries.clear();
            true
        });
        if cleared {
            self.persist()?;
        }
        Ok(cleared)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<WatchListEntry> {
        self.tx.borrow().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Subscribes to list changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<WatchListEntry>> {
        self.tx.subscribe()
    }

    /// Underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes the current list to storage.
    fn persist(&self) -> Result<()> {
        let document =
            serde_json::to_string(&*self.tx.borrow()).context("failed to encode watch list")?;
        self.storage
            .save(&document)
            .context("failed to save watch list")?;
        tracing::debug!(bytes = document.len(), "Watch list saved");
        Ok(())
    }
}

/// Decodes a stored document. Malformed input yields an empty list;
/// duplicate keys keep their first entry.
fn parse_document(document: &str) -> Vec<WatchListEntry> {
    let mut entries: Vec<WatchListEntry> = match serde_json::from_str(document) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed watch list, starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert(e.key()));
    entries
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};

    use anyhow::bail;

    use super::*;

    /// In-memory storage. Can be told to fail writes.
    #[derive(Debug, Default)]
    struct MemoryStorage {
        document: Mutex<Option<String>>,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    impl MemoryStorage {
        /// Creates storage that already holds `document`.
        #[must_use]
        fn with_document(document: impl Into<String>) -> Self {
            Self {
                document: Mutex::new(Some(document.into())),
                ..Self::default()
            }
        }

        /// Stored document.
        #[must_use]
        fn document(&self) -> Option<String> {
            self.document
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Makes subsequent writes fail (or succeed again).
        fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Number of successful writes.
        #[must_use]
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl WatchListStorage for MemoryStorage {
        fn load(&self) -> Result<Option<String>> {
            Ok(self.document())
        }

        fn save(&self, document: &str) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                bail!("memory storage is read-only");
            }
            *self
                .document
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(String::from(document));
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn item(id: u64, media_type: MediaType) -> ContentItem {
        ContentItem::new(id, media_type, format!("Item {id}"))
    }

    fn store() -> WatchListStore<MemoryStorage> {
        WatchListStore::open(MemoryStorage::default())
    }

    #[test]
    fn test_add_is_idempotent() {
        // Arrange
        let list = store();

        // Act
        let first = list.add(&item(5, MediaType::Movie)).unwrap();
        let second = list.add(&item(5, MediaType::Movie)).unwrap();

        // Assert
        assert!(first);
        assert!(!second);
        assert_eq!(list.len(), 1);
        assert_eq!(list.storage().writes(), 1);
    }

    #[test]
    fn test_same_id_different_type_are_distinct() {
        // Arrange
        let list = store();

        // Act
        list.add(&item(5, MediaType::Movie)).unwrap();
        list.add(&item(5, MediaType::Tv)).unwrap();

        // Assert
        let keys: Vec<_> = list.entries().iter().map(WatchListEntry::key).collect();
        assert_eq!(
            keys,
            [
                ContentKey::new(5, MediaType::Movie),
                ContentKey::new(5, MediaType::Tv)
            ]
        );
    }

    #[test]
    fn test_contains_follows_add_and_remove() {
        // Arrange
        let list = store();
        let dune = item(438_631, MediaType::Movie);

        // Act & Assert
        list.add(&dune).unwrap();
        assert!(list.contains(438_631, MediaType::Movie));
        assert!(!list.contains(438_631, MediaType::Tv));
        list.remove(438_631, MediaType::Movie).unwrap();
        assert!(!list.contains(438_631, MediaType::Movie));
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        // Arrange
        let list = store();
        list.add(&item(1, MediaType::Movie)).unwrap();

        // Act
        let removed = list.remove(1, MediaType::Tv).unwrap();

        // Assert
        assert!(!removed);
        assert_eq!(list.len(), 1);
        assert_eq!(list.storage().writes(), 1);
    }

    #[test]
    fn test_toggle_and_clear() {
        // Arrange
        let list = store();
        let show = item(7, MediaType::Tv);

        // Act & Assert
        assert!(list.toggle(&show).unwrap());
        assert!(!list.toggle(&show).unwrap());
        assert!(list.toggle(&show).unwrap());
        list.add(&item(8, MediaType::Movie)).unwrap();
        assert!(list.clear().unwrap());
        assert!(!list.clear().unwrap());
        assert!(list.is_empty());
        assert_eq!(list.storage().document().as_deref(), Some("[]"));
    }

    #[test]
    fn test_open_does_not_write() {
        // Arrange
        let storage = MemoryStorage::with_document("not json");

        // Act
        let list = WatchListStore::open(storage);

        // Assert
        assert!(list.is_empty());
        assert_eq!(list.storage().writes(), 0);
        assert_eq!(list.storage().document().as_deref(), Some("not json"));
    }

    #[test]
    fn test_malformed_entries_yield_empty_list() {
        // Arrange
        let storage = MemoryStorage::with_document(r#"[{"id":"five"}]"#);

        // Act
        let list = WatchListStore::open(storage);

        // Assert
        assert!(list.is_empty());
    }

    #[test]
    fn test_loaded_duplicates_keep_first() {
        // Arrange
        let document = r#"[
            {"id":5,"media_type":"movie","title":"First","added_at":"2024-01-01T00:00:00Z"},
            {"id":5,"media_type":"tv","title":"Show"},
            {"id":5,"media_type":"movie","title":"Second"}
        ]"#;

        // Act
        let list = WatchListStore::open(MemoryStorage::with_document(document));

        // Assert
        let entries = list.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].item.title, "First");
        assert_eq!(entries[0].added_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(entries[1].item.media_type, MediaType::Tv);
    }

    #[test]
    fn test_document_is_json_array_of_snapshots() {
        // Arrange
        let list = store();
        let mut dune = item(438_631, MediaType::Movie);
        dune.poster_path = Some(String::from("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"));

        // Act
        list.add(&dune).unwrap();

        // Assert
        let document = list.storage().document().unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        let entry = &value.as_array().unwrap()[0];
        assert_eq!(entry["id"], 438_631);
        assert_eq!(entry["media_type"], "movie");
        assert_eq!(entry["poster_path"], "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg");
        assert!(entry["added_at"].is_string());
    }

    #[test]
    fn test_write_failure_keeps_in_memory_mutation() {
        // Arrange
        let list = store();
        list.storage().set_fail_writes(true);

        // Act
        let result = list.add(&item(1, MediaType::Movie));

        // Assert
        assert!(
            format!("{:#}", result.unwrap_err()).contains("failed to save watch list")
        );
        assert!(list.contains(1, MediaType::Movie));
        assert!(list.storage().document().is_none());
    }

    #[test]
    fn test_subscribers_see_whole_list() {
        // Arrange
        let list = store();
        let mut rx = list.subscribe();

        // Act
        list.add(&item(1, MediaType::Movie)).unwrap();
        list.add(&item(1, MediaType::Movie)).unwrap();

        // Assert
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_sqlite_storage_survives_reopen() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        {
            let list = WatchListStore::open(SqliteStorage::open(Some(dir.path())).unwrap());
            list.add(&item(5, MediaType::Movie)).unwrap();
            list.add(&item(5, MediaType::Tv)).unwrap();
            list.remove(5, MediaType::Movie).unwrap();
        }

        // Act
        let reopened = WatchListStore::open(SqliteStorage::open(Some(dir.path())).unwrap());

        // Assert
        assert_eq!(reopened.len(), 1);
        assert!(reopened.contains(5, MediaType::Tv));
    }
}
