use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{info, warn};

use deathwatch_common::DeathwatchError;

/// The set of character names the tracker reports deaths for.
///
/// Names are case-sensitive, exactly as they appear on the kill log page.
/// The poll loop reads the set every cycle while the command listener
/// mutates it from another task, so access goes through an explicit lock.
/// Every successful mutation is rewritten to the backing JSON file; a
/// failed write is logged and the in-memory set stays authoritative until
/// the next successful one.
pub struct WatchListStore {
    path: PathBuf,
    names: RwLock<BTreeSet<String>>,
}

impl WatchListStore {
    /// Load the watch list from `path`, falling back to the built-in
    /// default set when the file is missing or unreadable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let names = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => {
                    let names: BTreeSet<String> = list.into_iter().collect();
                    info!(count = names.len(), path = %path.display(), "Watch list loaded");
                    names
                }
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Watch list file unreadable, using defaults");
                    default_names()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "No watch list file, using defaults");
                default_names()
            }
        };

        Self {
            path,
            names: RwLock::new(names),
        }
    }

    /// Add a name. Returns false when it was already watched. The new set
    /// is persisted before returning.
    pub fn add(&self, name: &str) -> bool {
        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        if !names.insert(name.to_string()) {
            return false;
        }
        self.persist(&names);
        true
    }

    /// Remove a name. Returns false when it was not watched.
    pub fn remove(&self, name: &str) -> bool {
        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        if !names.remove(name) {
            return false;
        }
        self.persist(&names);
        true
    }

    /// Exact-match membership test, used by the per-cycle record filter.
    pub fn contains(&self, name: &str) -> bool {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// Sorted copy of the current names.
    pub fn snapshot(&self) -> Vec<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn persist(&self, names: &BTreeSet<String>) {
        let list: Vec<&String> = names.iter().collect();
        let result = serde_json::to_string_pretty(&list)
            .map_err(|e| DeathwatchError::Persistence(e.to_string()))
            .and_then(|json| {
                fs::write(&self.path, json).map_err(|e| DeathwatchError::Persistence(e.to_string()))
            });
        if let Err(e) = result {
            warn!(error = %e, path = %self.path.display(), "Failed to persist watch list");
        }
    }
}

fn default_names() -> BTreeSet<String> {
    [
        "Agnieszka",
        "Miekka Parowka",
        "Gazowany Kompot",
        "Tapczan'ed",
        "Negocjator",
        "Astma",
        "Mistrz Negocjacji",
        "Jestem Karma",
        "Pan Trezer",
        "Negocjatorka",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> WatchListStore {
        WatchListStore::load(dir.path().join("watched.json"))
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.contains("Agnieszka"));
        assert_eq!(store.snapshot().len(), 10);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watched.json");
        fs::write(&path, "{ not json").unwrap();
        let store = WatchListStore::load(&path);
        assert!(store.contains("Agnieszka"));
    }

    #[test]
    fn add_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watched.json");

        let store = WatchListStore::load(&path);
        assert!(store.add("Legolas"));

        let reloaded = WatchListStore::load(&path);
        assert!(reloaded.contains("Legolas"));
        assert!(reloaded.contains("Agnieszka"));
    }

    #[test]
    fn add_existing_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.add("Agnieszka"));
    }

    #[test]
    fn remove_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watched.json");

        let store = WatchListStore::load(&path);
        assert!(store.remove("Agnieszka"));
        assert!(!store.remove("Agnieszka"));

        let reloaded = WatchListStore::load(&path);
        assert!(!reloaded.contains("Agnieszka"));
    }

    #[test]
    fn membership_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.contains("Agnieszka"));
        assert!(!store.contains("agnieszka"));
    }

    #[test]
    fn snapshot_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.add("Zzz");
        store.add("Aaa");
        let snapshot = store.snapshot();
        let mut sorted = snapshot.clone();
        sorted.sort();
        assert_eq!(snapshot, sorted);
    }
}
