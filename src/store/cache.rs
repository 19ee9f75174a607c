//! Read-through author cache with a write-invalidate contract.
//!
//! Wraps any [`AuthorStore`] to avoid inessential round-trips on the hot read
//! path. Reads fill the cache; every write to a handle drops that handle's
//! entry, so the next read goes back to the store. The cache is advisory only:
//! it may lag the store between a concurrent write and the next invalidation,
//! and the effect of such a stale read is bounded to one post's score.
//!
//! Logical correctness never depends on the cache; increment semantics live in
//! the backing store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::model::Author;
use crate::store::AuthorStore;

pub struct CachedAuthorStore<S> {
    backing: S,
    cache: Mutex<HashMap<String, Author>>,
}

impl<S: AuthorStore> CachedAuthorStore<S> {
    pub fn new(backing: S) -> Self {
        Self {
            backing,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of currently cached entries (diagnostics/tests).
    pub fn cached_len(&self) -> usize {
        self.cache.lock().expect("author cache mutex poisoned").len()
    }

    fn cache_get(&self, handle: &str) -> Option<Author> {
        self.cache
            .lock()
            .expect("author cache mutex poisoned")
            .get(handle)
            .cloned()
    }

    fn cache_put(&self, author: &Author) {
        self.cache
            .lock()
            .expect("author cache mutex poisoned")
            .insert(author.handle.clone(), author.clone());
    }

    fn invalidate(&self, handle: &str) {
        self.cache
            .lock()
            .expect("author cache mutex poisoned")
            .remove(handle);
    }
}

#[async_trait]
impl<S: AuthorStore> AuthorStore for CachedAuthorStore<S> {
    async fn lookup(&self, handle: &str) -> Result<Option<Author>, StoreError> {
        if let Some(hit) = self.cache_get(handle) {
            return Ok(Some(hit));
        }
        let found = self.backing.lookup(handle).await?;
        if let Some(ref author) = found {
            self.cache_put(author);
        }
        Ok(found)
    }

    async fn create(&self, handle: &str, now: DateTime<Utc>) -> Result<Author, StoreError> {
        let author = self.backing.create(handle, now).await?;
        self.cache_put(&author);
        Ok(author)
    }

    async fn apply_post_update(
        &self,
        handle: &str,
        reach: u64,
        mention_count: u64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let res = self
            .backing
            .apply_post_update(handle, reach, mention_count, now)
            .await;
        self.invalidate(handle);
        res
    }

    async fn set_credibility(
        &self,
        handle: &str,
        score: f32,
        risk_delta: u32,
    ) -> Result<(), StoreError> {
        let res = self.backing.set_credibility(handle, score, risk_delta).await;
        self.invalidate(handle);
        res
    }

    async fn set_centrality(&self, handle: &str, centrality: f32) -> Result<(), StoreError> {
        let res = self.backing.set_centrality(handle, centrality).await;
        self.invalidate(handle);
        res
    }

    async fn author_count(&self) -> Result<u64, StoreError> {
        // Counts are read fresh; caching them would skew centrality.
        self.backing.author_count().await
    }

    async fn all_authors(&self) -> Result<Vec<Author>, StoreError> {
        self.backing.all_authors().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryAuthorStore;

    #[tokio::test]
    async fn read_fills_cache() {
        let store = CachedAuthorStore::new(MemoryAuthorStore::new());
        let now = Utc::now();
        store.create("u", now).await.unwrap();
        assert_eq!(store.cached_len(), 1);
        assert!(store.lookup("u").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn write_invalidates_and_next_read_sees_fresh_value() {
        let store = CachedAuthorStore::new(MemoryAuthorStore::new());
        let now = Utc::now();
        store.create("u", now).await.unwrap();

        // Cached copy still carries the neutral prior.
        let cached = store.lookup("u").await.unwrap().unwrap();
        assert!((cached.credibility_score - 0.5).abs() < f32::EPSILON);

        store.set_credibility("u", 0.42, 1).await.unwrap();
        assert_eq!(store.cached_len(), 0, "write must invalidate the entry");

        let fresh = store.lookup("u").await.unwrap().unwrap();
        assert!((fresh.credibility_score - 0.42).abs() < f32::EPSILON);
        assert_eq!(fresh.risk_indicators, 1);
    }

    #[tokio::test]
    async fn miss_on_unknown_handle_is_not_cached() {
        let store = CachedAuthorStore::new(MemoryAuthorStore::new());
        assert!(store.lookup("ghost").await.unwrap().is_none());
        assert_eq!(store.cached_len(), 0);
    }
}
