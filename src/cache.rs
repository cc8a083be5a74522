use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keyed cache of list query results for one entity.
///
/// Keys distinguish filtered variants of the same list (for example maintenance
/// records for one unit vs. for the whole fleet). Any mutation of the entity
/// must call [`ListCache::invalidate`], which drops every key at once.
#[derive(Debug)]
pub struct ListCache<K, V> {
    state: RwLock<CacheState<K, V>>,
}

#[derive(Debug)]
struct CacheState<K, V> {
    entries: HashMap<K, Arc<Vec<V>>>,
    // Bumped by every invalidation
    generation: u64,
}

impl<K, V> Default for ListCache<K, V> {
    fn default() -> Self {
        Self { state: RwLock::new(CacheState { entries: HashMap::new(), generation: 0 }) }
    }
}

impl<K, V> ListCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &K) -> Option<Arc<Vec<V>>> {
        self.state.read().await.entries.get(key).cloned()
    }

    pub async fn insert(&self, key: K, values: Vec<V>) -> Arc<Vec<V>> {
        let values = Arc::new(values);
        self.state.write().await.entries.insert(key, Arc::clone(&values));
        values
    }

    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.generation = state.generation.wrapping_add(1);
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Returns the cached list for `key`, or runs `load` and caches its result.
    ///
    /// A result whose load overlapped an [`invalidate`](Self::invalidate) is
    /// returned to the caller but not cached.
    pub async fn get_or_load<F, Fut, E>(&self, key: K, load: F) -> Result<Arc<Vec<V>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Vec<V>, E>>,
    {
        let started_at = {
            let state = self.state.read().await;
            if let Some(hit) = state.entries.get(&key) {
                return Ok(Arc::clone(hit));
            }
            state.generation
        };

        let values = Arc::new(load().await?);

        let mut state = self.state.write().await;
        if state.generation == started_at {
            state.entries.insert(key, Arc::clone(&values));
        }
        Ok(values)
    }
}
