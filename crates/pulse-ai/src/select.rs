//! Engagement-ranked post selection

use pulse_core::Post;

/// Rank posts by engagement and truncate to a bounded analysis set.
///
/// Stable sort: posts with equal engagement keep their input order. Messages
/// are cut to `truncate_chars` characters so the prompts and the cache
/// fingerprints see the same text. Always returns at least one post when the
/// input is non-empty.
pub fn select_posts(posts: &[Post], max_posts: usize, truncate_chars: usize) -> Vec<Post> {
    let mut selected: Vec<Post> = posts
        .iter()
        .map(|post| {
            let mut post = post.clone();
            if post.message.chars().count() > truncate_chars {
                post.message = post.message.chars().take(truncate_chars).collect();
            }
            post
        })
        .collect();
    selected.sort_by(|a, b| b.engagement().cmp(&a.engagement()));
    selected.truncate(max_posts.max(1));
    selected
}
