//! Storage contracts for authors and connections.
//!
//! The engine is specified against these traits, not a concrete database.
//! Lookup and creation are deliberately separate operations (no hidden
//! mutation inside a read); callers compose them, typically via
//! [`get_or_create`].
//!
//! Per-record updates are increment-style and expected to be atomic per field
//! at the backend. There is no cross-record transaction: an author update and
//! its connection updates for the same post are eventually, not atomically,
//! consistent.

pub mod cache;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::model::{Author, Connection, ConnectionKind};

pub use cache::CachedAuthorStore;
pub use memory::{MemoryAuthorStore, MemoryConnectionStore};

/// Durable table of author profiles keyed by normalized handle.
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// Read-only lookup; never creates.
    async fn lookup(&self, handle: &str) -> Result<Option<Author>, StoreError>;

    /// Create with neutral defaults. Returns the existing record if the handle
    /// is already present (idempotent under races).
    async fn create(&self, handle: &str, now: DateTime<Utc>) -> Result<Author, StoreError>;

    /// Atomically apply one observed post: `total_posts += 1`,
    /// `total_reach += reach`, `total_mentions += mention_count`,
    /// `last_activity = now`, and raise `followers_estimate` to
    /// `max(current, reach / 10)`.
    async fn apply_post_update(
        &self,
        handle: &str,
        reach: u64,
        mention_count: u64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Set the credibility score and accumulate risk indicators.
    async fn set_credibility(
        &self,
        handle: &str,
        score: f32,
        risk_delta: u32,
    ) -> Result<(), StoreError>;

    /// Persist the latest computed degree centrality.
    async fn set_centrality(&self, handle: &str, centrality: f32) -> Result<(), StoreError>;

    /// Total number of authors, read fresh (used to normalize centrality).
    async fn author_count(&self) -> Result<u64, StoreError>;

    /// Full scan for graph export. Unbounded; acceptable at advisory scale.
    async fn all_authors(&self) -> Result<Vec<Author>, StoreError>;
}

/// Durable table of weighted, typed directed edges between author handles.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Insert or update the edge identified by (source, target, kind): on
    /// update, `weight += weight_delta`, `interaction_count += 1`,
    /// `last_interaction = now`; on insert, `weight = weight_delta`,
    /// `interaction_count = 1`. Callers must ensure both endpoints exist in
    /// the author store first.
    async fn upsert(
        &self,
        source: &str,
        target: &str,
        kind: ConnectionKind,
        weight_delta: f32,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// All edges originating at `handle`.
    async fn outgoing(&self, handle: &str) -> Result<Vec<Connection>, StoreError>;

    /// Count of edges pointing at `handle`.
    async fn incoming_count(&self, handle: &str) -> Result<u64, StoreError>;

    /// Up to `limit` edges touching `handle` as either endpoint.
    async fn touching(&self, handle: &str, limit: usize) -> Result<Vec<Connection>, StoreError>;

    /// Full scan for graph export.
    async fn all_connections(&self) -> Result<Vec<Connection>, StoreError>;
}

/// Lookup-then-create composition over the two-step store contract.
pub async fn get_or_create(
    store: &dyn AuthorStore,
    handle: &str,
    now: DateTime<Utc>,
) -> Result<Author, StoreError> {
    if let Some(author) = store.lookup(handle).await? {
        return Ok(author);
    }
    store.create(handle, now).await
}
