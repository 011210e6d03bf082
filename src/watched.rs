use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::WatchedEntry;
use crate::store::PersistentStore;

const WATCHED_KEY: &str = "watched";

/// Aggregate view of the watched list. Means over an empty collection are 0,
/// never NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub mean_imdb_rating: f32,
    pub mean_user_rating: f32,
    pub mean_runtime_minutes: f32,
}

/// The user's rated-movie collection. Exclusively owns its entries; every
/// mutation writes the whole collection through the store before returning.
#[derive(Debug)]
pub struct WatchedListStore {
    entries: Vec<WatchedEntry>,
    store: PersistentStore,
}

impl WatchedListStore {
    pub fn open(store: PersistentStore) -> Self {
        let entries: Vec<WatchedEntry> = store.read(WATCHED_KEY, Vec::new());
        debug!("Loaded {} watched entries", entries.len());
        Self { entries, store }
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn rating_for(&self, id: &str) -> Option<u8> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.user_rating)
    }

    /// Appends the entry and persists. An id that is already watched is
    /// skipped: the collection holds at most one entry per movie, enforced
    /// here rather than trusted to the caller.
    pub fn add(&mut self, entry: WatchedEntry) -> Result<(), StorageError> {
        if self.contains(&entry.id) {
            warn!("Ignoring duplicate watched entry for {}", entry.id);
            return Ok(());
        }
        self.entries.push(entry);
        self.persist()
    }

    /// Removes the entry with the given id; an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> Result<(), StorageError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return Ok(());
        }
        self.persist()
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary {
            count: self.entries.len(),
            mean_imdb_rating: mean(self.entries.iter().map(|e| e.imdb_rating)),
            mean_user_rating: mean(self.entries.iter().map(|e| f32::from(e.user_rating))),
            mean_runtime_minutes: mean(self.entries.iter().map(|e| e.runtime_minutes as f32)),
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.store.write(WATCHED_KEY, &self.entries)
    }
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, n) = values.fold((0.0f32, 0u32), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}
