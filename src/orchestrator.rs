//! # Network analysis orchestrator
//!
//! Stateless coordinator that drives one `PostEvent` through the full
//! pipeline: normalize handle, update author stats, upsert interaction edges,
//! recompute credibility, score viral potential, compute network metrics, and
//! assemble the composite result.
//!
//! Failure policy: validation failures are the only ones that abort. Every
//! store call carries a bounded timeout; a failed or timed-out call is logged
//! with handle and stage, counted, and the pipeline continues with the best
//! available (possibly stale or default) data. Downstream alerting prefers a
//! degraded score over no score.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::credibility::update_credibility;
use crate::error::{AnalysisError, StoreError};
use crate::handle;
use crate::insights::{assess_risk, derive_insights, NetworkInsights, RiskAssessment};
use crate::model::{Author, ConnectionKind, PostEvent, RiskLevel};
use crate::network::{compute_metrics, NetworkMetrics};
use crate::store::{get_or_create, AuthorStore, ConnectionStore};
use crate::viral::viral_score;

/// Edge weight contributed by one mention.
const MENTION_EDGE_WEIGHT: f32 = 1.0;
/// Edge weight contributed by one retweet.
const RETWEET_EDGE_WEIGHT: f32 = 0.5;

/// Cap on network-adjacent author summaries returned per analysis.
const RELATED_CLAIMS_LIMIT: usize = 5;

/// Updated view of the posting author after this analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUpdate {
    pub handle: String,
    pub credibility_score: f32,
    pub risk_level: RiskLevel,
    pub network_metrics: NetworkMetrics,
    pub total_posts: u64,
    pub avg_reach: f32,
}

/// Network-adjacent author summary surfaced for claim-verification context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedClaim {
    pub related_author: String,
    pub connection_strength: f32,
    pub credibility_score: f32,
    pub claim_type: String,
}

/// Composite result of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAnalysisResult {
    pub viral_score: f32,
    pub source_update: SourceUpdate,
    pub network_insights: NetworkInsights,
    pub risk_assessment: RiskAssessment,
    pub related_claims: Vec<RelatedClaim>,
}

/// Stateless pipeline over injected stores. Owns no persistent state; every
/// call works from one `PostEvent` and whatever the stores currently hold.
pub struct NetworkAnalyzer {
    authors: Arc<dyn AuthorStore>,
    connections: Arc<dyn ConnectionStore>,
    config: Arc<EngineConfig>,
}

impl NetworkAnalyzer {
    pub fn new(
        authors: Arc<dyn AuthorStore>,
        connections: Arc<dyn ConnectionStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            authors,
            connections,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one post event end to end.
    pub async fn analyze(&self, post: &PostEvent) -> Result<NetworkAnalysisResult, AnalysisError> {
        // --- NormalizeHandle: the only stage allowed to reject. ---
        if !handle::is_valid_raw(&post.author_handle) {
            return Err(AnalysisError::Validation(format!(
                "author handle '{}' does not match ^@?\\w+$",
                post.author_handle
            )));
        }
        let author_handle = handle::normalize(&post.author_handle);
        if author_handle.is_empty() {
            return Err(AnalysisError::Validation(
                "author handle is empty after normalization".to_string(),
            ));
        }

        // Mentions that normalize to nothing are dropped, not fatal.
        let mentions: Vec<String> = post
            .mentions
            .iter()
            .map(|m| handle::normalize(m))
            .filter(|m| !m.is_empty())
            .collect();
        let retweet_of = post
            .retweet_of
            .as_deref()
            .map(handle::normalize)
            .filter(|h| !h.is_empty());

        let now = Utc::now();
        if let Some(content) = &post.content {
            // Content is never logged raw; the hash is enough to correlate.
            debug!(handle = %author_handle, content_id = %anon_hash(content), "analyzing post");
        }

        // --- UpdateAuthorStats ---
        if let Err(e) = self
            .store_call(get_or_create(self.authors.as_ref(), &author_handle, now))
            .await
        {
            self.note_degraded("ensure_author", &author_handle, &e);
        }
        if let Err(e) = self
            .store_call(self.authors.apply_post_update(
                &author_handle,
                post.reach_estimate,
                mentions.len() as u64,
                now,
            ))
            .await
        {
            self.note_degraded("author_stats", &author_handle, &e);
        }

        // --- UpdateConnections ---
        for target in &mentions {
            self.upsert_edge(&author_handle, target, ConnectionKind::Mentions, MENTION_EDGE_WEIGHT, now)
                .await;
        }
        if let Some(original) = &retweet_of {
            self.upsert_edge(&author_handle, original, ConnectionKind::Retweets, RETWEET_EDGE_WEIGHT, now)
                .await;
        }

        // --- RecomputeCredibility ---
        // Snapshot after the stats update; degraded mode falls back to a
        // neutral default author and proceeds without persistence.
        let mut author = match self.store_call(self.authors.lookup(&author_handle)).await {
            Ok(Some(a)) => a,
            Ok(None) => Author::new(&author_handle, now),
            Err(e) => {
                self.note_degraded("author_snapshot", &author_handle, &e);
                Author::new(&author_handle, now)
            }
        };

        let update = update_credibility(&author, post, now, &self.config.credibility);
        if let Err(e) = self
            .store_call(
                self.authors
                    .set_credibility(&author_handle, update.score, update.risk_delta),
            )
            .await
        {
            self.note_degraded("credibility_write", &author_handle, &e);
        }
        author.credibility_score = update.score;
        author.risk_indicators += update.risk_delta;

        // --- ComputeViralScore ---
        // Uses the stored centrality from the previous analysis; the fresh
        // value lands below and feeds the next post.
        let viral = viral_score(&author, post, &self.config.viral);

        // --- ComputeMetrics ---
        let metrics = match self
            .store_call(compute_metrics(
                &author_handle,
                self.authors.as_ref(),
                self.connections.as_ref(),
            ))
            .await
        {
            Ok(m) => m,
            Err(e) => {
                self.note_degraded("network_metrics", &author_handle, &e);
                NetworkMetrics::default()
            }
        };
        if let Err(e) = self
            .store_call(self.authors.set_centrality(&author_handle, metrics.centrality))
            .await
        {
            self.note_degraded("centrality_write", &author_handle, &e);
        }

        // --- AssembleResult ---
        let insights = derive_insights(&author, now);
        let risk = assess_risk(&author, post, metrics.centrality, now, &self.config.risk);
        let related_claims = self.related_claims(&author_handle).await;

        counter!("network_analyses_total").increment(1);

        Ok(NetworkAnalysisResult {
            viral_score: viral,
            source_update: SourceUpdate {
                handle: author_handle,
                credibility_score: update.score,
                risk_level: update.level,
                network_metrics: metrics,
                total_posts: author.total_posts,
                avg_reach: author.total_reach as f32 / author.total_posts.max(1) as f32,
            },
            network_insights: insights,
            risk_assessment: risk,
            related_claims,
        })
    }

    /// Ensure both endpoints exist, then upsert the edge. Failures degrade.
    async fn upsert_edge(
        &self,
        source: &str,
        target: &str,
        kind: ConnectionKind,
        weight: f32,
        now: DateTime<Utc>,
    ) {
        if let Err(e) = self
            .store_call(get_or_create(self.authors.as_ref(), target, now))
            .await
        {
            self.note_degraded("ensure_target", target, &e);
        }
        if let Err(e) = self
            .store_call(self.connections.upsert(source, target, kind, weight, now))
            .await
        {
            self.note_degraded("connection_upsert", source, &e);
        }
    }

    /// Up to [`RELATED_CLAIMS_LIMIT`] network-adjacent author summaries.
    async fn related_claims(&self, author_handle: &str) -> Vec<RelatedClaim> {
        let edges = match self
            .store_call(self.connections.touching(author_handle, RELATED_CLAIMS_LIMIT))
            .await
        {
            Ok(edges) => edges,
            Err(e) => {
                self.note_degraded("related_claims", author_handle, &e);
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        for edge in edges {
            let related = if edge.source == author_handle {
                edge.target.clone()
            } else {
                edge.source.clone()
            };
            match self.store_call(self.authors.lookup(&related)).await {
                Ok(Some(author)) => out.push(RelatedClaim {
                    related_author: related,
                    connection_strength: edge.weight,
                    credibility_score: author.credibility_score,
                    claim_type: "network_connected".to_string(),
                }),
                Ok(None) => {}
                Err(e) => self.note_degraded("related_author", &related, &e),
            }
        }
        out
    }

    /// Wrap a store future in the configured bounded timeout. Timeouts count
    /// as failures and are not retried within the request.
    async fn store_call<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let ms = self.config.timeouts.store_ms;
        match tokio::time::timeout(Duration::from_millis(ms), fut).await {
            Ok(res) => res,
            Err(_) => Err(StoreError::Timeout(ms)),
        }
    }

    fn note_degraded(&self, stage: &str, handle: &str, err: &StoreError) {
        counter!("store_degraded_total").increment(1);
        warn!(%handle, stage, error = %err, "store operation failed; continuing degraded");
    }
}

/// Short anonymized identifier for post content in logs.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
