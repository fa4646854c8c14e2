//! Response reconciliation
//!
//! The model replies with text that is supposed to be JSON, often wrapped in
//! a Markdown code fence. Parsing is fail-soft: a malformed reply yields
//! `None` and the caller falls back to whatever the cache already holds.

use pulse_core::{OverallAnalysis, Post, PostAnalysis};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AnalysisEnvelope {
    #[serde(default)]
    analyses: Vec<PostAnalysis>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialOverall {
    summary: Option<String>,
    best_posts: Option<Vec<String>>,
    worst_posts: Option<Vec<String>>,
    marketing_health_score: Option<u8>,
    next_post_ideas: Option<Vec<String>>,
    recommendations: Option<Vec<String>>,
}

/// Remove Markdown ```json fencing when the model wrapped its reply in one.
pub fn strip_code_fences(raw: &str) -> String {
    if raw.contains("```json") {
        raw.replace("```json", "").replace("```", "")
    } else {
        raw.to_string()
    }
}

/// Parse a per-post batch reply and keep only analyses whose `postId` matches
/// a post in the batch; ids the model invented are dropped. `None` means the
/// reply was not parseable at all.
pub fn reconcile_post_batch(raw: &str, batch: &[Post]) -> Option<Vec<PostAnalysis>> {
    let cleaned = strip_code_fences(raw);
    let envelope: AnalysisEnvelope = match serde_json::from_str(cleaned.trim()) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("failed to parse post analysis response: {}", e);
            tracing::debug!("raw response: {}", raw);
            return None;
        }
    };

    let (matched, dropped): (Vec<_>, Vec<_>) = envelope
        .analyses
        .into_iter()
        .partition(|analysis| batch.iter().any(|post| post.id == analysis.post_id));
    if !dropped.is_empty() {
        tracing::debug!("dropped {} analyses with unknown post ids", dropped.len());
    }
    Some(matched)
}

/// Parse an aggregate reply, defaulting any missing field so a partially
/// well-formed response still yields a schema-complete result.
pub fn reconcile_overall(raw: &str) -> Option<OverallAnalysis> {
    let cleaned = strip_code_fences(raw);
    let partial: PartialOverall = match serde_json::from_str(cleaned.trim()) {
        Ok(partial) => partial,
        Err(e) => {
            tracing::warn!("failed to parse overall analysis response: {}", e);
            tracing::debug!("raw response: {}", raw);
            return None;
        }
    };

    Some(OverallAnalysis {
        summary: partial
            .summary
            .unwrap_or_else(|| "Analysis completed".to_string()),
        best_posts: partial.best_posts.unwrap_or_default(),
        worst_posts: partial.worst_posts.unwrap_or_default(),
        marketing_health_score: partial.marketing_health_score.unwrap_or(50),
        next_post_ideas: partial.next_post_ideas.unwrap_or_default(),
        recommendations: partial.recommendations.unwrap_or_default(),
    })
}
