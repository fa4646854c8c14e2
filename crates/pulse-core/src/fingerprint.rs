//! Stable fingerprints for cache keys
//!
//! cyrb53-style string hash: deterministic across runs and processes, O(length),
//! and collision-resistant enough for cache invalidation. Not cryptographic.

use crate::model::{Post, PostAnalysis};

/// Hash any string into a fixed-width hexadecimal fingerprint.
pub fn stable_hash(input: &str) -> String {
    let mut h1: u32 = 0xdead_beef ^ input.len() as u32;
    let mut h2: u32 = 0x41c6_ce57 ^ input.len() as u32;
    for ch in input.chars() {
        let code = ch as u32;
        h1 = (h1 ^ code).wrapping_mul(2_654_435_761);
        h2 = (h2 ^ code).wrapping_mul(1_597_334_677);
    }
    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2_246_822_507) ^ (h2 ^ (h2 >> 13)).wrapping_mul(3_266_489_909);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2_246_822_507) ^ (h1 ^ (h1 >> 13)).wrapping_mul(3_266_489_909);
    let combined = (u64::from(h2 & 0x1f_ffff) << 32) | u64::from(h1);
    format!("{combined:016x}")
}

/// Fingerprint over the visible fields of a post, in fixed field order.
///
/// Only the first `truncate_chars` characters of the message participate, so
/// edits past the truncation boundary keep an existing cache entry valid.
pub fn post_fingerprint(post: &Post, truncate_chars: usize) -> String {
    let message: String = post.message.chars().take(truncate_chars).collect();
    let reach = post.reach.map(|r| r.to_string()).unwrap_or_default();
    let input = format!(
        "{}|{}|{}|{}|{}|{}|{}",
        post.id,
        post.created_time.to_rfc3339(),
        post.likes,
        post.comments,
        post.shares,
        reach,
        message,
    );
    stable_hash(&input)
}

/// Fingerprint over a whole selected post set plus its per-post scores, used
/// to key the aggregate-analysis cache.
pub fn overall_fingerprint(posts: &[Post], analyses: &[PostAnalysis]) -> String {
    let descriptor = serde_json::json!({
        "posts": posts
            .iter()
            .map(|p| serde_json::json!({
                "id": p.id,
                "ts": p.created_time.to_rfc3339(),
                "l": p.likes,
                "c": p.comments,
                "s": p.shares,
                "r": p.reach.unwrap_or(0),
            }))
            .collect::<Vec<_>>(),
        "analyses": analyses
            .iter()
            .map(|a| serde_json::json!({
                "id": a.post_id,
                "q": a.quality_score,
                "e": a.engagement_score,
            }))
            .collect::<Vec<_>>(),
    });
    stable_hash(&descriptor.to_string())
}
