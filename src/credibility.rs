//! # Credibility engine
//!
//! Pure, testable update of an author's credibility given one observed post.
//! No I/O; the orchestrator feeds it a snapshot and persists the outcome.
//!
//! The model is a smoothed decay: a single post can only move the score by a
//! bounded fraction (`risk_ratio * decay_factor`), and streaks of clean posting
//! by established authors recover it slowly (`recovery_bonus`). There is no
//! floor; scores approach 0 asymptotically and never go negative.

use chrono::{DateTime, Utc};

use crate::config::CredibilityConfig;
use crate::model::{clamp01, Author, PostEvent, RiskLevel};

/// Outcome of one credibility update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibilityUpdate {
    /// New score in [0,1]; replaces the author's stored score.
    pub score: f32,
    /// Risk indicators contributed by this single post.
    pub risk_delta: u32,
    pub level: RiskLevel,
}

/// Count the discrete risk signals present in one post.
///
/// Signals are independent and additive: amplification (reach far beyond the
/// follower base), mention spam, suspicious phrasing, and young account age.
pub fn count_risk_indicators(
    author: &Author,
    post: &PostEvent,
    now: DateTime<Utc>,
    cfg: &CredibilityConfig,
) -> u32 {
    let mut indicators = 0u32;

    // Reach wildly out of proportion to the follower base suggests
    // artificial amplification.
    if (post.reach_estimate as f32) > (author.followers_estimate as f32) * cfg.amplification_factor
    {
        indicators += 1;
    }

    if post.mentions.len() > cfg.mention_spam_threshold {
        indicators += 1;
    }

    if let Some(content) = &post.content {
        let lower = content.to_lowercase();
        indicators += cfg
            .suspicious_phrases
            .iter()
            .filter(|p| lower.contains(p.to_lowercase().as_str()))
            .count() as u32;
    }

    if author.account_age_days(now) < cfg.new_account_days {
        indicators += 1;
    }

    indicators
}

/// Recompute the credibility score for an author who just posted.
///
/// `author` is the snapshot after the post's stats update, so `total_posts`
/// already includes this post.
pub fn update_credibility(
    author: &Author,
    post: &PostEvent,
    now: DateTime<Utc>,
    cfg: &CredibilityConfig,
) -> CredibilityUpdate {
    let risk_delta = count_risk_indicators(author, post, now, cfg);

    let total_posts = author.total_posts.max(1) as f32;
    let accumulated = author.risk_indicators + risk_delta;
    let risk_ratio = ((accumulated as f32) / total_posts).min(1.0);

    let mut score = author.credibility_score * (1.0 - risk_ratio * cfg.decay_factor);

    // Consistent clean posting by an established author earns the score back.
    if author.total_posts > cfg.recovery_min_posts && risk_delta == 0 {
        score = (score + cfg.recovery_bonus).min(1.0);
    }

    let score = clamp01(score);
    CredibilityUpdate {
        score,
        risk_delta,
        level: RiskLevel::from_score(score),
    }
}
