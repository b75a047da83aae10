//! JSON-file-backed history store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{HistoryError, HistoryStore, PlaybackEntry, SearchEntry};
use crate::config::HistoryConfig;

const PLAYBACK_FILE: &str = "history.json";
const SEARCH_FILE: &str = "search_history.json";

/// History kept in two pretty-printed JSON arrays inside one directory.
///
/// The directory is created on first write. A file that fails to parse is
/// deleted and treated as empty.
pub struct JsonHistoryStore {
    dir: PathBuf,
    max_playback: usize,
    max_searches: usize,
    lock: Mutex<()>,
}

impl JsonHistoryStore {
    pub fn new(dir: impl Into<PathBuf>, max_playback: usize, max_searches: usize) -> Self {
        Self {
            dir: dir.into(),
            max_playback,
            max_searches,
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(&config.dir, config.max_playback, config.max_searches)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded data is (), so a poisoned lock carries no broken state.
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn playback_path(&self) -> PathBuf {
        self.dir.join(PLAYBACK_FILE)
    }

    fn search_path(&self) -> PathBuf {
        self.dir.join(SEARCH_FILE)
    }

    fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, HistoryError> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(path)?;
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt history file, discarding");
                if let Err(e) = fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "Failed to delete corrupt history file");
                }
                Ok(Vec::new())
            }
        }
    }

    fn save<T: Serialize>(&self, path: &Path, items: &[T]) -> Result<(), HistoryError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(items)?;

        // Write-then-rename so readers never see a half-written file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;

        debug!(path = %path.display(), items = items.len(), "History saved");
        Ok(())
    }

    fn update_playback<F>(&self, ident: &str, update: F) -> Result<PlaybackEntry, HistoryError>
    where
        F: FnOnce(&mut PlaybackEntry),
    {
        let _guard = self.guard();
        let path = self.playback_path();
        let mut history: Vec<PlaybackEntry> = Self::load(&path)?;

        let entry = history
            .iter_mut()
            .find(|e| e.ident == ident)
            .ok_or_else(|| HistoryError::NotFound(ident.to_string()))?;
        update(entry);
        let updated = entry.clone();

        self.save(&path, &history)?;
        Ok(updated)
    }
}

impl HistoryStore for JsonHistoryStore {
    fn add_playback(&self, entry: PlaybackEntry) -> Result<(), HistoryError> {
        let _guard = self.guard();
        let path = self.playback_path();
        let mut history: Vec<PlaybackEntry> = Self::load(&path)?;

        history.retain(|e| e.ident != entry.ident);
        history.insert(0, entry);
        history.truncate(self.max_playback);

        self.save(&path, &history)
    }

    fn add_search(&self, query: &str) -> Result<(), HistoryError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        let _guard = self.guard();
        let path = self.search_path();
        let mut history: Vec<SearchEntry> = Self::load(&path)?;

        history.retain(|e| e.query != query);
        history.insert(
            0,
            SearchEntry {
                query: query.to_string(),
                searched_at: Utc::now(),
            },
        );
        history.truncate(self.max_searches);

        self.save(&path, &history)
    }

    fn playback(&self) -> Result<Vec<PlaybackEntry>, HistoryError> {
        let _guard = self.guard();
        Self::load(&self.playback_path())
    }

    fn searches(&self) -> Result<Vec<SearchEntry>, HistoryError> {
        let _guard = self.guard();
        Self::load(&self.search_path())
    }

    fn record_progress(
        &self,
        ident: &str,
        position_secs: u64,
    ) -> Result<PlaybackEntry, HistoryError> {
        self.update_playback(ident, |entry| {
            entry.resume_secs = Some(position_secs);
            entry.finished = false;
        })
    }

    fn mark_finished(&self, ident: &str) -> Result<PlaybackEntry, HistoryError> {
        self.update_playback(ident, |entry| {
            entry.resume_secs = None;
            entry.finished = true;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> JsonHistoryStore {
        JsonHistoryStore::new(dir.path().join("data"), 3, 2)
    }

    #[test]
    fn test_empty_when_missing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.playback().unwrap().is_empty());
        assert!(store.searches().unwrap().is_empty());
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_add_playback_dedupes_and_truncates() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        for ident in ["a", "b", "c", "a", "d"] {
            store
                .add_playback(PlaybackEntry::new(ident, format!("{ident}.mkv"), 1))
                .unwrap();
        }

        let idents: Vec<String> = store.playback().unwrap().into_iter().map(|e| e.ident).collect();
        assert_eq!(idents, vec!["d", "a", "c"]);
    }

    #[test]
    fn test_add_search_ignores_blank_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.add_search("Dark").unwrap();
        store.add_search("   ").unwrap();
        store.add_search("Inception").unwrap();
        store.add_search(" Dark ").unwrap();

        let queries: Vec<String> = store.searches().unwrap().into_iter().map(|e| e.query).collect();
        assert_eq!(queries, vec!["Dark", "Inception"]);

        store.add_search("Pelíšky").unwrap();
        let queries: Vec<String> = store.searches().unwrap().into_iter().map(|e| e.query).collect();
        assert_eq!(queries, vec!["Pelíšky", "Dark"]);
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join(PLAYBACK_FILE), "{ not json").unwrap();

        assert!(store.playback().unwrap().is_empty());
        assert!(!store.dir().join(PLAYBACK_FILE).exists());

        store.add_playback(PlaybackEntry::new("a", "a.mkv", 1)).unwrap();
        assert_eq!(store.playback().unwrap().len(), 1);
    }

    #[test]
    fn test_files_are_pretty_json_and_keep_unicode() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .add_playback(
                PlaybackEntry::new("x1", "Perníková věž S01E01.mkv", 5)
                    .with_title(Some("Perníková věž".to_string())),
            )
            .unwrap();

        let raw = fs::read_to_string(store.dir().join(PLAYBACK_FILE)).unwrap();
        assert!(raw.contains("\n  {"));
        assert!(raw.contains("Perníková věž"));
    }

    #[test]
    fn test_resume_progress_then_finish() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.add_playback(PlaybackEntry::new("a", "a.mkv", 1)).unwrap();

        let entry = store.record_progress("a", 754).unwrap();
        assert_eq!(entry.resume_secs, Some(754));
        assert!(!entry.finished);

        let entry = store.mark_finished("a").unwrap();
        assert_eq!(entry.resume_secs, None);
        assert!(entry.finished);

        let entry = store.record_progress("a", 10).unwrap();
        assert!(!entry.finished);
        assert_eq!(store.playback().unwrap()[0].resume_secs, Some(10));
    }

    #[test]
    fn test_progress_for_unknown_ident() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(matches!(
            store.record_progress("missing", 1),
            Err(HistoryError::NotFound(_))
        ));
        assert!(matches!(
            store.mark_finished("missing"),
            Err(HistoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_replaying_keeps_no_stale_resume() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.add_playback(PlaybackEntry::new("a", "a.mkv", 1)).unwrap();
        store.record_progress("a", 300).unwrap();
        store.add_playback(PlaybackEntry::new("b", "b.mkv", 1)).unwrap();
        store.add_playback(PlaybackEntry::new("a", "a.mkv", 1)).unwrap();

        let history = store.playback().unwrap();
        assert_eq!(history[0].ident, "a");
        assert_eq!(history[0].resume_secs, None);
        assert_eq!(history.len(), 2);
    }
}
