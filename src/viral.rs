//! # Viral scorer
//!
//! Pure estimate of a single post's viral potential in [0,1]. Additive
//! components, each independently capped, summed and then dampened by the
//! author's credibility: a highly viral post from a low-credibility author is
//! treated as less legitimately viral, not zeroed out.

use crate::config::ViralConfig;
use crate::model::{Author, PostEvent};

/// Compute the viral-potential score.
///
/// `author` is the snapshot after the credibility update for this post.
pub fn viral_score(author: &Author, post: &PostEvent, cfg: &ViralConfig) -> f32 {
    let base = ((post.reach_estimate as f32) / cfg.reach_divisor).min(cfg.reach_cap);
    let mention_boost = ((post.mentions.len() as f32) / cfg.mention_divisor).min(cfg.mention_cap);
    let centrality_bonus = author.network_centrality * cfg.centrality_factor;

    let engagement_factor = if post.engagement.is_empty() {
        0.0
    } else {
        let total: u64 = post.engagement.values().sum();
        ((total as f32) / (post.reach_estimate.max(1) as f32)).min(cfg.engagement_cap)
    };

    let content_risk = match &post.content {
        Some(content) => {
            let lower = content.to_lowercase();
            cfg.sensational_keywords
                .iter()
                .filter(|k| lower.contains(k.to_lowercase().as_str()))
                .count() as f32
                * cfg.keyword_step
        }
        None => 0.0,
    };

    let raw = base + mention_boost + centrality_bonus + engagement_factor + content_risk;
    (raw * author.credibility_score).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn cfg() -> ViralConfig {
        ViralConfig::default()
    }

    fn author_with(credibility: f32, centrality: f32) -> Author {
        let mut a = Author::new("tester", Utc::now());
        a.credibility_score = credibility;
        a.network_centrality = centrality;
        a
    }

    #[test]
    fn monotonic_in_reach_up_to_cap() {
        let a = author_with(1.0, 0.0);
        let mut last = -1.0f32;
        for reach in [0u64, 100, 1_000, 5_000, 10_000, 50_000] {
            let s = viral_score(&a, &PostEvent::new("tester", reach), &cfg());
            assert!(s >= last, "score must not decrease as reach grows");
            last = s;
        }
        // Base component saturates at the cap.
        let capped = viral_score(&a, &PostEvent::new("tester", 10_000_000), &cfg());
        assert!((capped - 0.5).abs() < 1e-6);
    }

    #[test]
    fn credibility_dampens_multiplicatively() {
        let mut post = PostEvent::new("tester", 50_000);
        post.content = Some("BREAKING shocking secret".to_string());
        let full = viral_score(&author_with(1.0, 0.0), &post, &cfg());
        let half = viral_score(&author_with(0.5, 0.0), &post, &cfg());
        assert!((half - full * 0.5).abs() < 1e-6);
    }

    #[test]
    fn bounded_by_credibility_times_component_caps() {
        let mut post = PostEvent::new("tester", u64::MAX / 2);
        post.mentions = (0..100).map(|i| format!("u{i}")).collect();
        post.content = Some(
            "breaking urgent shocking exclusive secret hidden banned censored".to_string(),
        );
        post.engagement.insert("likes".into(), u64::MAX / 2);
        let a = author_with(0.8, 1.0);
        let s = viral_score(&a, &post, &cfg());
        // caps: 0.5 + 0.3 + 0.2 + 0.2 + 8 * 0.05 = 1.6, dampened then capped at 1.0
        assert!(s <= 1.0);
        assert!(s <= 0.8 * 1.6 + 1e-6);
    }

    #[test]
    fn sensational_keywords_add_fixed_step() {
        let a = author_with(1.0, 0.0);
        let mut quiet = PostEvent::new("tester", 0);
        quiet.content = Some("nothing remarkable today".to_string());
        let mut loud = PostEvent::new("tester", 0);
        loud.content = Some("BREAKING: urgent news".to_string());
        let q = viral_score(&a, &quiet, &cfg());
        let l = viral_score(&a, &loud, &cfg());
        assert!((q - 0.0).abs() < 1e-6);
        assert!((l - 0.10).abs() < 1e-6, "two keywords at 0.05 each, got {l}");
    }

    #[test]
    fn engagement_only_counts_when_present() {
        let a = author_with(1.0, 0.0);
        let mut post = PostEvent::new("tester", 1_000);
        let without = viral_score(&a, &post, &cfg());
        post.engagement.insert("likes".into(), 500);
        post.engagement.insert("shares".into(), 100);
        let with = viral_score(&a, &post, &cfg());
        // 600 / 1000 hits the 0.2 engagement cap.
        assert!((with - without - 0.2).abs() < 1e-6);
    }

    #[test]
    fn centrality_bonus_scales_linearly() {
        let post = PostEvent::new("tester", 0);
        let low = viral_score(&author_with(1.0, 0.0), &post, &cfg());
        let high = viral_score(&author_with(1.0, 0.5), &post, &cfg());
        assert!((high - low - 0.1).abs() < 1e-6);
    }
}
