//! Full-graph snapshot for visualization and offline analysis clients.
//!
//! Unbounded scan over both stores; acceptable at advisory scale, no
//! pagination. The connected-components figure is a coarse approximation
//! (touched-node count plus isolated count), not a union-find component count,
//! kept for wire compatibility with existing consumers.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::ConnectionKind;
use crate::store::{AuthorStore, ConnectionStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub credibility_score: f32,
    pub total_posts: u64,
    pub total_reach: u64,
    pub network_centrality: f32,
    pub risk_indicators: u32,
    pub followers_estimate: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f32,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    pub interaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: u64,
    pub total_edges: u64,
    /// edges / (nodes * (nodes - 1)) for nodes > 1, else 0.
    pub density: f32,
    /// Placeholder, always 0.0.
    pub clustering: f32,
    pub connected_components: u64,
    pub isolated_nodes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub statistics: GraphStatistics,
    pub generated_at: DateTime<Utc>,
}

/// Serialize the full graph: every author as a node, every connection as an
/// edge, plus aggregate statistics.
pub async fn export_graph(
    authors: &dyn AuthorStore,
    connections: &dyn ConnectionStore,
) -> Result<GraphExport, StoreError> {
    let nodes: Vec<GraphNode> = authors
        .all_authors()
        .await?
        .into_iter()
        .map(|a| GraphNode {
            id: a.handle,
            credibility_score: a.credibility_score,
            total_posts: a.total_posts,
            total_reach: a.total_reach,
            network_centrality: a.network_centrality,
            risk_indicators: a.risk_indicators,
            followers_estimate: a.followers_estimate,
        })
        .collect();

    let edges: Vec<GraphEdge> = connections
        .all_connections()
        .await?
        .into_iter()
        .map(|c| GraphEdge {
            source: c.source,
            target: c.target,
            weight: c.weight,
            kind: c.kind,
            interaction_count: c.interaction_count,
        })
        .collect();

    let statistics = compute_statistics(&nodes, &edges);
    Ok(GraphExport {
        nodes,
        edges,
        statistics,
        generated_at: Utc::now(),
    })
}

fn compute_statistics(nodes: &[GraphNode], edges: &[GraphEdge]) -> GraphStatistics {
    let total_nodes = nodes.len() as u64;
    let total_edges = edges.len() as u64;

    let density = if total_nodes > 1 {
        let possible = (total_nodes * (total_nodes - 1)) as f32;
        total_edges as f32 / possible
    } else {
        0.0
    };

    let mut touched: HashSet<&str> = HashSet::new();
    for e in edges {
        touched.insert(e.source.as_str());
        touched.insert(e.target.as_str());
    }
    let isolated_nodes = total_nodes.saturating_sub(touched.len() as u64);
    let connected_components = if touched.is_empty() {
        total_nodes
    } else {
        touched.len() as u64 + isolated_nodes
    };

    GraphStatistics {
        total_nodes,
        total_edges,
        density,
        clustering: 0.0,
        connected_components,
        isolated_nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            credibility_score: 0.5,
            total_posts: 0,
            total_reach: 0,
            network_centrality: 0.0,
            risk_indicators: 0,
            followers_estimate: 0,
        }
    }

    fn edge(s: &str, t: &str) -> GraphEdge {
        GraphEdge {
            source: s.to_string(),
            target: t.to_string(),
            weight: 1.0,
            kind: ConnectionKind::Mentions,
            interaction_count: 1,
        }
    }

    #[test]
    fn density_zero_without_edges() {
        let stats = compute_statistics(&[node("a"), node("b")], &[]);
        assert!((stats.density - 0.0).abs() < f32::EPSILON);
        assert_eq!(stats.isolated_nodes, 2);
        assert_eq!(stats.connected_components, 2);
    }

    #[test]
    fn density_one_for_complete_directed_graph() {
        let nodes = vec![node("a"), node("b"), node("c")];
        let mut edges = Vec::new();
        for s in ["a", "b", "c"] {
            for t in ["a", "b", "c"] {
                if s != t {
                    edges.push(edge(s, t));
                }
            }
        }
        let stats = compute_statistics(&nodes, &edges);
        assert!((stats.density - 1.0).abs() < 1e-6);
        assert_eq!(stats.isolated_nodes, 0);
    }

    #[test]
    fn single_node_density_is_zero() {
        let stats = compute_statistics(&[node("only")], &[]);
        assert!((stats.density - 0.0).abs() < f32::EPSILON);
        assert_eq!(stats.connected_components, 1);
    }
}
