//! Claim verification against news coverage.
//!
//! A claim is cross-referenced two ways: keyword overlap with recent news
//! articles (via a NewsAPI-style search endpoint) and the claim author's
//! network credibility. The combined verification score maps to a coarse
//! verdict; this is advisory context, not fact-checking.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::orchestrator::NetworkAnalysisResult;

/// Weight of news-overlap relevance in the verification score.
const RELEVANCE_WEIGHT: f32 = 0.7;
/// Weight of the author's network credibility.
const CREDIBILITY_WEIGHT: f32 = 0.3;
/// Score assigned when no related coverage exists at all.
const NO_COVERAGE_SCORE: f32 = 0.1;

/// Trimmed article summary kept from a search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub body: String,
    pub url: String,
    pub source: String,
}

/// Overall claim verdict bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCredibility {
    LikelyCredible,
    LikelyFalse,
    Suspicious,
    Uncertain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimVerification {
    pub verification_score: f32,
    pub credibility: ClaimCredibility,
    pub related_articles_found: usize,
    pub viral_potential: f32,
}

/// Thin client for a NewsAPI-style article search endpoint.
pub struct NewsClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsClient {
    /// Build from `NEWS_API_BASE_URL` / `NEWS_API_KEY`; the client still works
    /// without a key (searches just return nothing useful).
    pub fn from_env(timeout_ms: u64) -> Self {
        Self::new(
            std::env::var("NEWS_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.newsapi.ai/v1".to_string()),
            std::env::var("NEWS_API_KEY").ok(),
            timeout_ms,
        )
    }

    pub fn new(base_url: String, api_key: Option<String>, timeout_ms: u64) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url,
            api_key,
        }
    }

    pub fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search related articles. Network or decode failures propagate to the
    /// caller, which treats them per the degraded-mode policy.
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<NewsArticle>> {
        let params = serde_json::json!({
            "query": query,
            "apikey": self.api_key.clone().unwrap_or_default(),
            "articlesCount": max_results,
            "lang": "en",
            "sortBy": "rel",
        });

        let resp = self
            .http
            .get(format!("{}/article/getArticles", self.base_url))
            .query(&params)
            .send()
            .await
            .context("news search request")?
            .error_for_status()
            .context("news search non-2xx")?;

        let data: Value = resp.json().await.context("news search decode")?;
        let hits = data
            .pointer("/articles/results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let articles = hits
            .iter()
            .map(|a| NewsArticle {
                title: str_field(a, "title"),
                body: str_field(a, "body").chars().take(500).collect(),
                url: str_field(a, "url"),
                source: a
                    .pointer("/source/title")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown")
                    .to_string(),
            })
            .collect::<Vec<_>>();
        debug!(query, hits = articles.len(), "news search finished");
        Ok(articles)
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Keywords for news search: stop-word filtered, longer than 3 chars, top 10.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3 && !is_stop_word(w))
        .take(10)
        .map(|w| w.to_string())
        .collect()
}

fn is_stop_word(w: &str) -> bool {
    matches!(
        w,
        "the" | "and" | "but" | "for" | "with" | "that" | "this" | "from" | "have" | "has"
            | "had" | "was" | "were" | "been" | "being" | "does" | "did" | "will" | "would"
            | "should" | "could" | "can" | "may" | "might" | "are" | "is"
    )
}

/// Mean keyword overlap between the claim and each article, in [0,1].
pub fn coverage_relevance(claim_text: &str, articles: &[NewsArticle]) -> f32 {
    if articles.is_empty() {
        return 0.0;
    }
    let claim_words: HashSet<String> = extract_keywords(claim_text).into_iter().collect();
    if claim_words.is_empty() {
        return 0.0;
    }

    let mut acc = 0.0f32;
    for article in articles {
        let article_words: HashSet<String> =
            extract_keywords(&format!("{} {}", article.title, article.body))
                .into_iter()
                .collect();
        let overlap = claim_words.intersection(&article_words).count();
        acc += overlap as f32 / claim_words.len() as f32;
    }
    acc / articles.len() as f32
}

/// Combine coverage relevance with the author's network analysis.
pub fn score_claim(
    claim_text: &str,
    articles: &[NewsArticle],
    analysis: &NetworkAnalysisResult,
) -> ClaimVerification {
    let verification_score = if articles.is_empty() {
        NO_COVERAGE_SCORE
    } else {
        coverage_relevance(claim_text, articles) * RELEVANCE_WEIGHT
            + analysis.source_update.credibility_score * CREDIBILITY_WEIGHT
    };

    let credibility = determine_credibility(verification_score, analysis);
    ClaimVerification {
        verification_score,
        credibility,
        related_articles_found: articles.len(),
        viral_potential: analysis.viral_score,
    }
}

fn determine_credibility(score: f32, analysis: &NetworkAnalysisResult) -> ClaimCredibility {
    let author_cred = analysis.source_update.credibility_score;
    if score > 0.7 && author_cred > 0.6 {
        ClaimCredibility::LikelyCredible
    } else if score < 0.3 || author_cred < 0.4 {
        ClaimCredibility::LikelyFalse
    } else if analysis.risk_assessment.overall_risk_score > 0.6 {
        ClaimCredibility::Suspicious
    } else {
        ClaimCredibility::Uncertain
    }
}
