//! Per-key memoization over a [`BackingStore`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use intake::{BackingStore, CacheKey};
use tokio::sync::OnceCell;
use tracing::{debug, trace};

type Cells<V> = HashMap<CacheKey, Arc<OnceCell<V>>>;

/// Caches successful backing-store reads, keyed by [`CacheKey`].
///
/// - A cached key is answered without calling the backing store.
/// - An uncached key triggers exactly one backing-store read; a successful
///   value is cached for the lifetime of this instance.
/// - A failed read is never cached: the next `get` for that key reads again.
///
/// There is no eviction, expiry, or invalidation.
///
/// Concurrent `get` calls for the same uncached key are serialised on that
/// key, so the backing store sees at most one read in flight per key. Reads
/// for different keys proceed independently.
pub struct MemoizingLookup<V> {
    store: Arc<dyn BackingStore<V>>,
    cells: Mutex<Cells<V>>,
}

impl<V> MemoizingLookup<V>
where
    V: Clone + Send + Sync,
{
    /// Creates an empty lookup in front of `store`.
    pub fn new(store: Arc<dyn BackingStore<V>>) -> Self {
        Self {
            store,
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the value for `key`, reading through to the backing store on a
    /// cache miss. `None` means the backing store had no value this time.
    ///
    /// Dropping the returned future mid-read leaves the key uncached, exactly
    /// as a failed read does.
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let handle = self.cell_for(key);
        let cell = handle.cell();
        if let Some(value) = cell.get() {
            trace!(%key, "cache hit");
            return Some(value.clone());
        }

        let read = cell
            .get_or_try_init(|| async {
                match self.store.try_read(key).await {
                    Some(value) => {
                        debug!(%key, "backing store read cached");
                        Ok(value)
                    }
                    None => {
                        debug!(%key, "backing store had no value");
                        Err(())
                    }
                }
            })
            .await;

        read.ok().cloned()
    }

    /// Returns `true` if a value for `key` is cached. Never reads the store.
    pub fn is_cached(&self, key: &CacheKey) -> bool {
        self.lock()
            .get(key)
            .is_some_and(|cell| cell.initialized())
    }

    /// Number of cached values. Never reads the store.
    pub fn cached_len(&self) -> usize {
        self.lock().values().filter(|cell| cell.initialized()).count()
    }

    /// Number of uncached keys with a `get` still in progress.
    ///
    /// Drops back to zero once every outstanding `get` has finished, failed,
    /// or been cancelled.
    pub fn pending_len(&self) -> usize {
        self.lock().values().filter(|cell| !cell.initialized()).count()
    }

    fn cell_for<'a>(&'a self, key: &'a CacheKey) -> CellHandle<'a, V> {
        let mut cells = self.lock();
        let cell = Arc::clone(cells.entry(key.clone()).or_default());
        CellHandle {
            lookup: self,
            key,
            cell: Some(cell),
        }
    }
}

impl<V> MemoizingLookup<V> {
    fn lock(&self) -> MutexGuard<'_, Cells<V>> {
        // Entries are inserted whole, so a poisoned map is still consistent.
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A caller's reference to the cell for one key.
///
/// On drop (success, failure, or cancellation of `get`) an empty cell that no
/// other caller holds is removed from the map.
struct CellHandle<'a, V> {
    lookup: &'a MemoizingLookup<V>,
    key: &'a CacheKey,
    cell: Option<Arc<OnceCell<V>>>,
}

impl<V> CellHandle<'_, V> {
    fn cell(&self) -> &OnceCell<V> {
        match &self.cell {
            Some(cell) => cell,
            None => unreachable!("cell is only taken on drop"),
        }
    }
}

impl<V> Drop for CellHandle<'_, V> {
    fn drop(&mut self) {
        let Some(cell) = self.cell.take() else {
            return;
        };
        // Initialised cells are permanent.
        if cell.initialized() {
            return;
        }
        let mut cells = self.lookup.lock();
        let still_mapped = cells
            .get(self.key)
            .is_some_and(|mapped| Arc::ptr_eq(mapped, &cell));
        // One reference held by the map, one by this handle.
        if still_mapped && !cell.initialized() && Arc::strong_count(&cell) == 2 {
            cells.remove(self.key);
        }
        // Released while the lock is held, so the last holder always sees a
        // count of two.
        drop(cell);
    }
}

impl<V> std::fmt::Debug for MemoizingLookup<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells = self.lock();
        let cached = cells.values().filter(|cell| cell.initialized()).count();
        f.debug_struct("MemoizingLookup")
            .field("cached", &cached)
            .field("pending", &(cells.len() - cached))
            .finish_non_exhaustive()
    }
}
