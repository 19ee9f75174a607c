//! Per-author network summary: degree-centrality approximation, reach of the
//! connected neighborhood, and raw connection counts.
//!
//! The clustering coefficient is a documented placeholder fixed at 0.0;
//! consumers of the original wire format expect the field to be present.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::{AuthorStore, ConnectionStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Degree centrality: (out + in) / max(author_count - 1, 1).
    pub centrality: f32,
    /// Placeholder, always 0.0.
    pub clustering: f32,
    /// Sum of followers_estimate over distinct outgoing targets.
    pub network_reach: u64,
    pub connections: u64,
    pub outgoing_connections: u64,
    pub incoming_connections: u64,
}

/// Compute summary metrics for one author.
///
/// The author count is read fresh from the store at call time, so repeated
/// calls under concurrent growth may normalize slightly differently; the
/// metric is advisory.
pub async fn compute_metrics(
    handle: &str,
    authors: &dyn AuthorStore,
    connections: &dyn ConnectionStore,
) -> Result<NetworkMetrics, StoreError> {
    let outgoing = connections.outgoing(handle).await?;
    let incoming = connections.incoming_count(handle).await?;

    let mut seen = HashSet::new();
    let mut network_reach = 0u64;
    for edge in &outgoing {
        if !seen.insert(edge.target.clone()) {
            continue;
        }
        if let Some(target) = authors.lookup(&edge.target).await? {
            network_reach += target.followers_estimate;
        }
    }

    let out_count = outgoing.len() as u64;
    let total = out_count + incoming;
    let author_count = authors.author_count().await?;
    let denom = author_count.saturating_sub(1).max(1) as f32;
    let centrality = if author_count > 1 {
        total as f32 / denom
    } else {
        0.0
    };

    Ok(NetworkMetrics {
        centrality,
        clustering: 0.0,
        network_reach,
        connections: total,
        outgoing_connections: out_count,
        incoming_connections: incoming,
    })
}
