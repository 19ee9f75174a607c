//! # Engine configuration
//!
//! Every scoring constant the engine uses lives here as a tunable field rather
//! than a hard-coded literal, so decay/recovery behavior can be calibrated and
//! tested independently.
//!
//! - Loads from TOML (`config/engine.toml` by default, `ENGINE_CONFIG_PATH` to
//!   override).
//! - Falls back to a built-in `default_seed()` on any read/parse error.
//! - Phrase and keyword lists are part of the config, matched case-insensitively
//!   as substrings.

use serde::Deserialize;
use std::{fs, path::Path};

pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";
pub const ENV_CONFIG_PATH: &str = "ENGINE_CONFIG_PATH";

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub credibility: CredibilityConfig,
    #[serde(default)]
    pub viral: ViralConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

/// Constants driving the per-post credibility update.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredibilityConfig {
    /// Fraction of the risk ratio applied as decay per post.
    pub decay_factor: f32,
    /// Bonus added for a clean post by an established author.
    pub recovery_bonus: f32,
    /// Minimum post count before the recovery bonus applies.
    pub recovery_min_posts: u64,
    /// `reach > followers * amplification_factor` flags artificial amplification.
    pub amplification_factor: f32,
    /// More mentions than this in one post flags spam.
    pub mention_spam_threshold: usize,
    /// Accounts younger than this many days are flagged as risky.
    pub new_account_days: i64,
    /// Suspicious phrases; each case-insensitive substring hit adds one risk indicator.
    pub suspicious_phrases: Vec<String>,
}

impl Default for CredibilityConfig {
    fn default() -> Self {
        Self {
            decay_factor: 0.1,
            recovery_bonus: 0.02,
            recovery_min_posts: 10,
            amplification_factor: 20.0,
            mention_spam_threshold: 10,
            new_account_days: 30,
            suspicious_phrases: [
                "share before",
                "they don't want you",
                "mainstream media",
                "wake up",
                "truth",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Caps and divisors for the additive viral-potential components.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViralConfig {
    pub reach_divisor: f32,
    pub reach_cap: f32,
    pub mention_divisor: f32,
    pub mention_cap: f32,
    pub centrality_factor: f32,
    pub engagement_cap: f32,
    /// Score added per sensational-keyword match.
    pub keyword_step: f32,
    pub sensational_keywords: Vec<String>,
}

impl Default for ViralConfig {
    fn default() -> Self {
        Self {
            reach_divisor: 10_000.0,
            reach_cap: 0.5,
            mention_divisor: 5.0,
            mention_cap: 0.3,
            centrality_factor: 0.2,
            engagement_cap: 0.2,
            keyword_step: 0.05,
            sensational_keywords: [
                "breaking", "urgent", "shocking", "exclusive", "secret", "hidden", "banned",
                "censored",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Thresholds and weights for the behavioral risk assessment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub bot_min_posts: u64,
    pub bot_posts_per_day: f32,
    pub high_frequency_weight: f32,
    pub excessive_mentions_threshold: usize,
    pub excessive_mentions_weight: f32,
    pub hub_centrality_threshold: f32,
    pub hub_weight: f32,
    pub coordination_per_factor: f32,
    pub bot_probability_factor: f32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            bot_min_posts: 20,
            bot_posts_per_day: 10.0,
            high_frequency_weight: 0.2,
            excessive_mentions_threshold: 5,
            excessive_mentions_weight: 0.15,
            hub_centrality_threshold: 0.8,
            hub_weight: 0.1,
            coordination_per_factor: 0.3,
            bot_probability_factor: 0.8,
        }
    }
}

/// Bounded timeouts for outbound dependency calls. On timeout the call is
/// treated as a failure and handled by the degraded-mode policy, not retried.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub store_ms: u64,
    pub news_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            store_ms: 2_000,
            news_ms: 15_000,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl EngineConfig {
    /// Built-in seed matching the documented scoring constants.
    pub fn default_seed() -> Self {
        Self {
            credibility: CredibilityConfig::default(),
            viral: ViralConfig::default(),
            risk: RiskConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    /// Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "bad engine config, using seed");
                Self::default_seed()
            }),
            Err(_) => {
                tracing::debug!(path = %path.display(), "no engine config file, using seed");
                Self::default_seed()
            }
        }
    }

    /// Load from `ENGINE_CONFIG_PATH` or the default path.
    pub fn from_env() -> Self {
        let path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_file(path)
    }
}
