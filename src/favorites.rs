//! Favorites persistence
//!
//! The user's favorite shows are kept as an ordered list keyed by show id and
//! stored as JSON under a single storage key.

use crate::catalog::{ShowId, ShowSummary};
use crate::storage::{Storage, StorageError};
use std::collections::HashSet;

/// Storage key holding the favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Reads and writes the favorites list.
///
/// Writing is refused until the stored list has been loaded once, so an
/// empty in-memory list at startup can never overwrite saved favorites.
pub struct FavoritesStore<S> {
    storage: S,
    loaded: bool,
}

impl<S: Storage> FavoritesStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            loaded: false,
        }
    }

    /// Loads the stored favorites.
    ///
    /// Missing, unreadable or malformed data yields an empty list. Duplicate
    /// ids in stored data keep their first occurrence.
    pub fn load(&mut self) -> Vec<ShowSummary> {
        self.loaded = true;

        let content = match self.storage.get(FAVORITES_KEY) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored favorites, starting empty");
                return Vec::new();
            }
        };

        let stored: Vec<ShowSummary> = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "stored favorites are malformed, starting empty");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        stored
            .into_iter()
            .filter(|show| seen.insert(show.id))
            .collect()
    }

    /// Writes the favorites list to storage.
    ///
    /// Does nothing until `load` has been called.
    pub fn persist(&self, favorites: &[ShowSummary]) -> Result<(), StorageError> {
        if !self.loaded {
            tracing::debug!("favorites not loaded yet, skipping persist");
            return Ok(());
        }

        let content = serde_json::to_string(favorites)?;
        self.storage.set(FAVORITES_KEY, &content)
    }

    /// Returns whether the stored list has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

/// Adds `show` to the favorites, or removes it if a show with the same id
/// is already there.
///
/// The order of the other entries is kept; new entries go to the end.
pub fn toggle(current: &[ShowSummary], show: &ShowSummary) -> Vec<ShowSummary> {
    if is_favorite(current, show.id) {
        current
            .iter()
            .filter(|favorite| favorite.id != show.id)
            .cloned()
            .collect()
    } else {
        let mut next = current.to_vec();
        next.push(show.clone());
        next
    }
}

/// Returns whether a show with `id` is in the favorites.
pub fn is_favorite(favorites: &[ShowSummary], id: ShowId) -> bool {
    favorites.iter().any(|favorite| favorite.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Rating;
    use crate::storage::MemoryStorage;

    fn show(id: ShowId) -> ShowSummary {
        ShowSummary {
            id,
            title: format!("Show {id}"),
            image_url: format!("https://static.tvmaze.com/{id}.jpg"),
            rating: Rating::Score(7.5),
            genres: "Drama".to_string(),
            summary: "<p>Summary</p>".to_string(),
        }
    }

    #[test]
    fn test_toggle_appends_absent_show() {
        let favorites = vec![show(1), show(2)];
        let next = toggle(&favorites, &show(3));

        assert_eq!(next, vec![show(1), show(2), show(3)]);
    }

    #[test]
    fn test_toggle_removes_present_show_keeping_order() {
        let favorites = vec![show(1), show(2), show(3)];
        let next = toggle(&favorites, &show(2));

        assert_eq!(next, vec![show(1), show(3)]);
    }

    #[test]
    fn test_toggle_matches_by_id_only() {
        let favorites = vec![show(1)];
        let mut renamed = show(1);
        renamed.title = "Renamed".to_string();

        assert!(toggle(&favorites, &renamed).is_empty());
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let lists = [vec![], vec![show(1)], vec![show(1), show(2), show(3)]];

        for list in &lists {
            for id in 1..=4 {
                let toggled = toggle(&toggle(list, &show(id)), &show(id));
                if is_favorite(list, id) {
                    // Removed then re-appended at the end
                    assert_eq!(toggled.len(), list.len());
                    assert_eq!(toggled.last().map(|s| s.id), Some(id));
                } else {
                    assert_eq!(&toggled, list);
                }
            }
        }
    }

    #[test]
    fn test_toggle_never_duplicates() {
        let mut favorites = Vec::new();
        for id in [1, 2, 1, 3, 2, 2, 4, 1] {
            favorites = toggle(&favorites, &show(id));
            let mut ids: Vec<_> = favorites.iter().map(|s| s.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), favorites.len());
        }
    }

    #[test]
    fn test_load_absent_is_empty() {
        let mut store = FavoritesStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
        assert!(store.is_loaded());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let storage = MemoryStorage::new();
        storage.set(FAVORITES_KEY, "{not json").unwrap();

        let mut store = FavoritesStore::new(storage);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_persist_then_load() {
        let storage = MemoryStorage::new();
        let mut store = FavoritesStore::new(&storage);
        store.load();
        store.persist(&[show(4), show(2)]).unwrap();

        let mut reopened = FavoritesStore::new(&storage);
        assert_eq!(reopened.load(), vec![show(4), show(2)]);
    }

    #[test]
    fn test_persist_before_load_writes_nothing() {
        let storage = MemoryStorage::new();
        storage.set(FAVORITES_KEY, "[]").unwrap();

        let store = FavoritesStore::new(&storage);
        store.persist(&[show(1)]).unwrap();

        assert_eq!(storage.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_accepts_image_key_and_text_rating() {
        let storage = MemoryStorage::new();
        storage
            .set(
                FAVORITES_KEY,
                r#"[{"id":5,"title":"Old","image":"img.jpg","rating":"N/A","genres":"N/A","summary":"<p>x</p>"}]"#,
            )
            .unwrap();

        let favorites = FavoritesStore::new(&storage).load();

        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].image_url, "img.jpg");
        assert_eq!(favorites[0].rating, Rating::NotAvailable);
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let storage = MemoryStorage::new();
        let stored = serde_json::to_string(&[show(1), show(2), show(1)]).unwrap();
        storage.set(FAVORITES_KEY, &stored).unwrap();

        let favorites = FavoritesStore::new(&storage).load();
        assert_eq!(favorites, vec![show(1), show(2)]);
    }
}
