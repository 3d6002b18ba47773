use crate::sort::{sorted_view, SortDirection, SortKey, SortState};
use crate::storage::{PersistenceAdapter, StorageError};
use chrono::{DateTime, Utc};
use marquee_models::{MovieSummary, WatchlistItem};
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const DEFAULT_STORAGE_KEY: &str = "moviedb-watchlist";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WatchlistStats {
    pub total_movies: usize,
}

/// Owner of the watchlist.
///
/// The in-memory list is authoritative for the running process. Every mutation
/// commits to memory first and then writes the full list under one storage key;
/// a failed write is logged and otherwise ignored. Items keep insertion order
/// and no two share a movie id.
pub struct WatchlistStore<A: PersistenceAdapter> {
    adapter: A,
    key: String,
    items: Vec<WatchlistItem>,
    sort: SortState,
}

impl<A: PersistenceAdapter> WatchlistStore<A> {
    /// Open the store and rehydrate it from `adapter`
    pub async fn open(adapter: A, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = rehydrate(&adapter, &key).await;
        let sort = load_sort_state(&adapter, &sort_key_for(&key)).await;
        info!("Loaded watchlist: {} items", items.len());
        Self { adapter, key, items, sort }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Canonical insertion-ordered items
    pub fn items(&self) -> &[WatchlistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, movie_id: u64) -> bool {
        self.items.iter().any(|item| item.movie.id == movie_id)
    }

    pub fn get(&self, movie_id: u64) -> Option<&WatchlistItem> {
        self.items.iter().find(|item| item.movie.id == movie_id)
    }

    /// Insert `movie` stamped with the current time. Returns `false` if it was already present.
    pub async fn add(&mut self, movie: MovieSummary) -> bool {
        self.add_at(movie, Utc::now()).await
    }

    /// Insert `movie` with an explicit `dateAdded`
    pub async fn add_at(&mut self, movie: MovieSummary, date_added: DateTime<Utc>) -> bool {
        if self.contains(movie.id) {
            debug!("Movie {} already in watchlist", movie.id);
            return false;
        }
        debug!("Adding movie {} ({}) to watchlist", movie.id, movie.title);
        self.items.push(WatchlistItem::new(movie, date_added));
        self.persist().await;
        true
    }

    /// Returns `false` if nothing was removed
    pub async fn remove(&mut self, movie_id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.movie.id != movie_id);
        if self.items.len() == before {
            return false;
        }
        debug!("Removed movie {} from watchlist", movie_id);
        self.persist().await;
        true
    }

    pub async fn toggle(&mut self, movie: MovieSummary) -> ToggleOutcome {
        if self.remove(movie.id).await {
            ToggleOutcome::Removed
        } else {
            self.add(movie).await;
            ToggleOutcome::Added
        }
    }

    /// Remove everything. Returns how many items were dropped.
    pub async fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        self.persist().await;
        info!("Cleared watchlist ({} items)", removed);
        removed
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Items ordered by the current sort preference
    pub fn sorted(&self) -> Vec<WatchlistItem> {
        self.sorted_view(self.sort.sort_by, self.sort.direction)
    }

    pub fn sorted_view(&self, sort_by: SortKey, direction: SortDirection) -> Vec<WatchlistItem> {
        sorted_view(&self.items, sort_by, direction)
    }

    /// Change the sort preference; see [`SortState::next`]. Saved best-effort.
    pub async fn update_sort(&mut self, sort_by: SortKey, direction: Option<SortDirection>) -> SortState {
        self.sort = self.sort.next(sort_by, direction);
        match serde_json::to_vec(&self.sort) {
            Ok(bytes) => {
                if let Err(e) = self.adapter.write(&sort_key_for(&self.key), &bytes).await {
                    warn!("Failed to save watchlist sort preference: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize watchlist sort preference: {}", e),
        }
        self.sort
    }

    pub fn stats(&self) -> WatchlistStats {
        WatchlistStats {
            total_movies: self.items.len(),
        }
    }

    async fn persist(&self) {
        let bytes = match serde_json::to_vec(&self.items) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to serialize watchlist: {}", e);
                return;
            }
        };
        match self.adapter.write(&self.key, &bytes).await {
            Ok(()) => debug!("Saved watchlist: {} items", self.items.len()),
            Err(e) => warn!(
                "Failed to save watchlist: {}. Changes are kept for this session only.",
                e
            ),
        }
    }
}

fn sort_key_for(key: &str) -> String {
    format!("{}-sort", key)
}

/// Read the stored list, keeping only records that are still usable.
///
/// A corrupt payload is erased so it is never read again. An unreadable
/// backend yields an empty list but leaves the stored value alone.
async fn rehydrate<A: PersistenceAdapter>(adapter: &A, key: &str) -> Vec<WatchlistItem> {
    let bytes = match adapter.read(key).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("No stored watchlist under '{}', starting empty", key);
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to read stored watchlist: {}. Starting empty.", e);
            return Vec::new();
        }
    };

    match parse_records(&bytes) {
        Ok(items) => items,
        Err(e) => {
            warn!("{}. Discarding stored watchlist.", e);
            if let Err(rm_err) = adapter.remove(key).await {
                warn!("Failed to delete corrupted watchlist: {}", rm_err);
            }
            Vec::new()
        }
    }
}

fn parse_records(bytes: &[u8]) -> Result<Vec<WatchlistItem>, StorageError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Corrupt(e.to_string()))?;
    let Value::Array(records) = value else {
        return Err(StorageError::Corrupt("stored watchlist is not a list".to_string()));
    };

    let total = records.len();
    let mut seen = HashSet::new();
    let items: Vec<WatchlistItem> = records
        .into_iter()
        .filter(is_well_formed)
        .map(normalize_record)
        .filter_map(|record| match serde_json::from_value::<WatchlistItem>(record) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Dropping unreadable watchlist record: {}", e);
                None
            }
        })
        .filter(|item| seen.insert(item.movie.id))
        .collect();

    if items.len() != total {
        warn!(
            "Some watchlist items were invalid and filtered out ({} of {} kept)",
            items.len(),
            total
        );
    }
    Ok(items)
}

/// Numeric `id`, non-empty `title` and non-empty `dateAdded`
fn is_well_formed(record: &Value) -> bool {
    let non_empty = |field: &str| {
        record
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };
    record.get("id").and_then(Value::as_u64).is_some() && non_empty("title") && non_empty("dateAdded")
}

/// Reset secondary fields of the wrong type so they take their defaults.
///
/// Numeric strings in number fields are read as numbers and non-integer
/// entries are dropped from `genre_ids`.
fn normalize_record(mut record: Value) -> Value {
    let Some(fields) = record.as_object_mut() else {
        return record;
    };

    for name in ["vote_average", "popularity"] {
        let coerced = match fields.get(name) {
            Some(Value::String(text)) => text.trim().parse::<f64>().ok().and_then(Number::from_f64),
            _ => None,
        };
        if let Some(number) = coerced {
            fields.insert(name.to_string(), Value::Number(number));
        }
    }
    if let Some(Value::Array(ids)) = fields.get_mut("genre_ids") {
        ids.retain(|id| id.as_u64().is_some());
    }

    fields.retain(|name, value| match name.as_str() {
        "overview" | "release_date" | "original_language" | "original_title" => value.is_string(),
        "poster_path" | "backdrop_path" => value.is_string() || value.is_null(),
        "vote_average" | "popularity" => value.is_number(),
        "vote_count" => value.is_u64(),
        "genre_ids" => value.is_array(),
        "adult" | "video" => value.is_boolean(),
        _ => true,
    });
    record
}

async fn load_sort_state<A: PersistenceAdapter>(adapter: &A, key: &str) -> SortState {
    match adapter.read(key).await {
        Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            debug!("Ignoring unreadable sort preference: {}", e);
            SortState::default()
        }),
        Ok(None) => SortState::default(),
        Err(e) => {
            debug!("Failed to read sort preference: {}", e);
            SortState::default()
        }
    }
}
