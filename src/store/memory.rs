//! In-memory store backends.
//!
//! Default backend for the binary and the integration tests. Mutations hold a
//! `Mutex` for the duration of the read-modify-write, which gives the atomic
//! increment semantics the contract asks of real backends.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::model::{Author, Connection, ConnectionKind};
use crate::store::{AuthorStore, ConnectionStore};

#[derive(Debug, Default)]
pub struct MemoryAuthorStore {
    inner: Mutex<HashMap<String, Author>>,
}

impl MemoryAuthorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_author<T>(
        &self,
        handle: &str,
        f: impl FnOnce(&mut Author) -> T,
    ) -> Result<T, StoreError> {
        let mut map = self.inner.lock().expect("author store mutex poisoned");
        let author = map
            .get_mut(handle)
            .ok_or_else(|| StoreError::Internal(format!("unknown author '{handle}'")))?;
        Ok(f(author))
    }
}

#[async_trait]
impl AuthorStore for MemoryAuthorStore {
    async fn lookup(&self, handle: &str) -> Result<Option<Author>, StoreError> {
        let map = self.inner.lock().expect("author store mutex poisoned");
        Ok(map.get(handle).cloned())
    }

    async fn create(&self, handle: &str, now: DateTime<Utc>) -> Result<Author, StoreError> {
        let mut map = self.inner.lock().expect("author store mutex poisoned");
        let author = map
            .entry(handle.to_string())
            .or_insert_with(|| Author::new(handle, now));
        Ok(author.clone())
    }

    async fn apply_post_update(
        &self,
        handle: &str,
        reach: u64,
        mention_count: u64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.with_author(handle, |a| {
            a.total_posts += 1;
            a.total_reach += reach;
            a.total_mentions += mention_count;
            a.last_activity = now;
            a.followers_estimate = a.followers_estimate.max(reach / 10);
        })
    }

    async fn set_credibility(
        &self,
        handle: &str,
        score: f32,
        risk_delta: u32,
    ) -> Result<(), StoreError> {
        self.with_author(handle, |a| {
            a.credibility_score = score.clamp(0.0, 1.0);
            a.risk_indicators += risk_delta;
        })
    }

    async fn set_centrality(&self, handle: &str, centrality: f32) -> Result<(), StoreError> {
        self.with_author(handle, |a| {
            a.network_centrality = centrality;
        })
    }

    async fn author_count(&self) -> Result<u64, StoreError> {
        let map = self.inner.lock().expect("author store mutex poisoned");
        Ok(map.len() as u64)
    }

    async fn all_authors(&self) -> Result<Vec<Author>, StoreError> {
        let map = self.inner.lock().expect("author store mutex poisoned");
        Ok(map.values().cloned().collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryConnectionStore {
    inner: Mutex<HashMap<(String, String, ConnectionKind), Connection>>,
}

impl MemoryConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionStore for MemoryConnectionStore {
    async fn upsert(
        &self,
        source: &str,
        target: &str,
        kind: ConnectionKind,
        weight_delta: f32,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let key = (source.to_string(), target.to_string(), kind);
        let mut map = self.inner.lock().expect("connection store mutex poisoned");
        map.entry(key)
            .and_modify(|c| {
                c.weight += weight_delta;
                c.interaction_count += 1;
                c.last_interaction = now;
            })
            .or_insert_with(|| Connection {
                source: source.to_string(),
                target: target.to_string(),
                kind,
                weight: weight_delta,
                interaction_count: 1,
                first_interaction: now,
                last_interaction: now,
            });
        Ok(())
    }

    async fn outgoing(&self, handle: &str) -> Result<Vec<Connection>, StoreError> {
        let map = self.inner.lock().expect("connection store mutex poisoned");
        Ok(map
            .values()
            .filter(|c| c.source == handle)
            .cloned()
            .collect())
    }

    async fn incoming_count(&self, handle: &str) -> Result<u64, StoreError> {
        let map = self.inner.lock().expect("connection store mutex poisoned");
        Ok(map.values().filter(|c| c.target == handle).count() as u64)
    }

    async fn touching(&self, handle: &str, limit: usize) -> Result<Vec<Connection>, StoreError> {
        let map = self.inner.lock().expect("connection store mutex poisoned");
        Ok(map
            .values()
            .filter(|c| c.source == handle || c.target == handle)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn all_connections(&self) -> Result<Vec<Connection>, StoreError> {
        let map = self.inner.lock().expect("connection store mutex poisoned");
        Ok(map.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::get_or_create;

    #[tokio::test]
    async fn create_is_idempotent() {
        let store = MemoryAuthorStore::new();
        let now = Utc::now();
        let a = store.create("someone", now).await.unwrap();
        let later = now + chrono::Duration::days(3);
        let b = store.create("someone", later).await.unwrap();
        // Second create returns the original record, not a reset one.
        assert_eq!(a.first_seen, b.first_seen);
    }

    #[tokio::test]
    async fn get_or_create_composes_lookup_and_create() {
        let store = MemoryAuthorStore::new();
        let now = Utc::now();
        assert!(store.lookup("fresh").await.unwrap().is_none());
        let a = get_or_create(&store, "fresh", now).await.unwrap();
        assert_eq!(a.total_posts, 0);
        assert!(store.lookup("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn post_update_raises_followers_via_max() {
        let store = MemoryAuthorStore::new();
        let now = Utc::now();
        store.create("u", now).await.unwrap();

        store.apply_post_update("u", 50_000, 4, now).await.unwrap();
        let a = store.lookup("u").await.unwrap().unwrap();
        assert_eq!(a.total_posts, 1);
        assert_eq!(a.total_reach, 50_000);
        assert_eq!(a.total_mentions, 4);
        assert_eq!(a.followers_estimate, 5_000);

        // Lower reach must not lower the followers estimate.
        store.apply_post_update("u", 100, 0, now).await.unwrap();
        let a = store.lookup("u").await.unwrap().unwrap();
        assert_eq!(a.followers_estimate, 5_000);
    }

    #[tokio::test]
    async fn upsert_accumulates_weight_and_count() {
        let store = MemoryConnectionStore::new();
        let now = Utc::now();
        store
            .upsert("a", "b", ConnectionKind::Mentions, 1.0, now)
            .await
            .unwrap();
        store
            .upsert("a", "b", ConnectionKind::Mentions, 1.0, now)
            .await
            .unwrap();

        let out = store.outgoing("a").await.unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0].weight - 2.0).abs() < f32::EPSILON);
        assert_eq!(out[0].interaction_count, 2);
    }

    #[tokio::test]
    async fn kind_is_part_of_edge_identity() {
        let store = MemoryConnectionStore::new();
        let now = Utc::now();
        store
            .upsert("a", "b", ConnectionKind::Mentions, 1.0, now)
            .await
            .unwrap();
        store
            .upsert("a", "b", ConnectionKind::Retweets, 0.5, now)
            .await
            .unwrap();
        assert_eq!(store.outgoing("a").await.unwrap().len(), 2);
        assert_eq!(store.incoming_count("b").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn self_loops_are_stored() {
        let store = MemoryConnectionStore::new();
        let now = Utc::now();
        store
            .upsert("a", "a", ConnectionKind::Mentions, 1.0, now)
            .await
            .unwrap();
        assert_eq!(store.outgoing("a").await.unwrap().len(), 1);
        assert_eq!(store.incoming_count("a").await.unwrap(), 1);
    }
}
