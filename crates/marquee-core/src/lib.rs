pub mod sort;
pub mod storage;
pub mod store;

pub use sort::{sorted_view, SortDirection, SortKey, SortState};
pub use storage::{FileStorage, MemoryStorage, PersistenceAdapter, StorageError};
pub use store::{ToggleOutcome, WatchlistStats, WatchlistStore, DEFAULT_STORAGE_KEY};
