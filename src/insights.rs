//! Behavioral insights and risk-pattern assessment.
//!
//! Both derivations are pure functions of the author snapshot (plus the
//! triggering post for the risk assessment) and deliberately independent of
//! the credibility score: they describe posting behavior, not trust.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;
use crate::model::{Author, PostEvent};

/// Single behavioral flag, derived in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorFlag {
    HighActivity,
    UnusualReach,
    MentionHeavy,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInsights {
    /// Posts per day over the account's lifetime.
    pub posting_frequency: f32,
    pub avg_reach_per_post: f32,
    /// Mentions per post.
    pub mention_activity: f32,
    /// "central" above 0.1 centrality, else "peripheral".
    pub network_position: String,
    pub account_age_days: i64,
    pub behavior_flag: BehaviorFlag,
}

/// Derive behavioral insights from the author's lifetime stats.
pub fn derive_insights(author: &Author, now: DateTime<Utc>) -> NetworkInsights {
    let age_days = author.account_age_days(now).max(0);
    let posting_frequency = author.total_posts as f32 / age_days.max(1) as f32;
    let avg_reach_per_post = author.total_reach as f32 / author.total_posts.max(1) as f32;
    let mention_activity = author.total_mentions as f32 / author.total_posts.max(1) as f32;

    // Priority order matters: the first matching flag wins.
    let behavior_flag = if posting_frequency > 5.0 {
        BehaviorFlag::HighActivity
    } else if avg_reach_per_post > author.followers_estimate as f32 {
        BehaviorFlag::UnusualReach
    } else if mention_activity > 3.0 {
        BehaviorFlag::MentionHeavy
    } else {
        BehaviorFlag::Normal
    };

    let network_position = if author.network_centrality > 0.1 {
        "central"
    } else {
        "peripheral"
    };

    NetworkInsights {
        posting_frequency,
        avg_reach_per_post,
        mention_activity,
        network_position: network_position.to_string(),
        account_age_days: age_days,
        behavior_flag,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_score: f32,
    pub risk_factors: Vec<String>,
    pub coordination_likelihood: f32,
    pub bot_probability: f32,
}

/// Assess bot/coordination risk patterns, independent of credibility.
///
/// `centrality` is the freshly computed degree centrality for this analysis
/// (the stored field may lag by one post).
pub fn assess_risk(
    author: &Author,
    post: &PostEvent,
    centrality: f32,
    now: DateTime<Utc>,
    cfg: &RiskConfig,
) -> RiskAssessment {
    let mut risk_factors = Vec::new();
    let mut risk_score = 0.0f32;

    if author.total_posts > cfg.bot_min_posts {
        let days_active = author.account_age_days(now).max(1) as f32;
        if author.total_posts as f32 / days_active > cfg.bot_posts_per_day {
            risk_factors.push("high_posting_frequency".to_string());
            risk_score += cfg.high_frequency_weight;
        }
    }

    if post.mentions.len() > cfg.excessive_mentions_threshold {
        risk_factors.push("excessive_mentions".to_string());
        risk_score += cfg.excessive_mentions_weight;
    }

    if centrality > cfg.hub_centrality_threshold {
        risk_factors.push("network_hub".to_string());
        risk_score += cfg.hub_weight;
    }

    let overall = risk_score.min(1.0);
    RiskAssessment {
        overall_risk_score: overall,
        coordination_likelihood: (risk_factors.len() as f32 * cfg.coordination_per_factor)
            .min(1.0),
        bot_probability: (overall * cfg.bot_probability_factor).min(1.0),
        risk_factors,
    }
}
