//! Core data model: authors, connections, the incoming post event, and the
//! risk-level bands derived from credibility.
//!
//! `Author` and `Connection` are the two persisted entities (owned by the
//! stores); `PostEvent` is ephemeral input consumed once per analysis call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Neutral credibility prior assigned to every newly created author.
pub const NEUTRAL_CREDIBILITY: f32 = 0.5;

/// Durable author profile keyed by normalized handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub handle: String,
    pub total_posts: u64,
    pub total_reach: u64,
    pub total_mentions: u64,
    /// Running trustworthiness estimate in [0,1].
    pub credibility_score: f32,
    /// Accumulated count of discrete risk signals across all posts.
    pub risk_indicators: u32,
    pub first_seen: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// Monotonic non-decreasing; raised via max-update from reach estimates.
    pub followers_estimate: u64,
    /// Last computed degree centrality; refreshed on each analysis.
    pub network_centrality: f32,
}

impl Author {
    /// Fresh author with neutral defaults; identity is the normalized handle.
    pub fn new(handle: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            handle: handle.into(),
            total_posts: 0,
            total_reach: 0,
            total_mentions: 0,
            credibility_score: NEUTRAL_CREDIBILITY,
            risk_indicators: 0,
            first_seen: now,
            last_activity: now,
            followers_estimate: 0,
            network_centrality: 0.0,
        }
    }

    /// Whole days since the author was first seen.
    pub fn account_age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.first_seen).num_days()
    }
}

/// Edge type in the interaction graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Mentions,
    Retweets,
}

/// Directed, typed, weighted edge between two authors.
///
/// Identity is the (source, target, kind) triple; weight and interaction_count
/// only ever grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    pub weight: f32,
    pub interaction_count: u64,
    pub first_interaction: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
}

/// One observed post, as received from upstream collectors.
///
/// Reach and engagement are unsigned so negative values are rejected at the
/// deserialization boundary, before any store mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEvent {
    pub author_handle: String,
    #[serde(default)]
    pub mentions: Vec<String>,
    pub reach_estimate: u64,
    #[serde(default)]
    pub retweet_of: Option<String>,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub content: Option<String>,
    /// Likes / shares / comments counts, when the collector has them.
    #[serde(default)]
    pub engagement: HashMap<String, u64>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// ISO-8601 publication time, informational only.
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn default_platform() -> String {
    "twitter".to_string()
}

impl PostEvent {
    /// Minimal event for tests and internal callers.
    pub fn new(author_handle: impl Into<String>, reach_estimate: u64) -> Self {
        Self {
            author_handle: author_handle.into(),
            mentions: Vec::new(),
            reach_estimate,
            retweet_of: None,
            platform: default_platform(),
            content: None,
            engagement: HashMap::new(),
            hashtags: Vec::new(),
            timestamp: None,
        }
    }
}

/// Advisory risk band derived from a credibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Band mapping: <0.3 critical, <0.5 high, <0.7 medium, else low.
    pub fn from_score(score: f32) -> Self {
        if score < 0.3 {
            RiskLevel::Critical
        } else if score < 0.5 {
            RiskLevel::High
        } else if score < 0.7 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Clamp to [0.0, 1.0].
pub(crate) fn clamp01(x: f32) -> f32 {
    if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}
