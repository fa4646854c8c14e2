//! Offline heuristic suggestions
//!
//! Rules of thumb derived from the post set alone, for callers without an AI
//! credential. No network, no cache.

use pulse_core::Post;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
}

pub fn heuristic_suggestions(posts: &[Post]) -> Vec<Suggestion> {
    if posts.is_empty() {
        return Vec::new();
    }

    let total: u32 = posts.iter().map(Post::engagement).sum();
    let average = total / posts.len() as u32;
    let any_image = posts.iter().any(Post::has_image);

    let mut suggestions = vec![Suggestion {
        title: "Post More Around Peak Days".to_string(),
        description: "Your engagement spikes on specific days. Schedule more posts around those peaks to maximize reach.".to_string(),
        priority: Priority::High,
        category: "Timing".to_string(),
    }];

    if any_image {
        suggestions.push(Suggestion {
            title: "Leverage Visuals".to_string(),
            description: "Posts with images perform better. Maintain a consistent visual style to reinforce brand recall.".to_string(),
            priority: Priority::High,
            category: "Content".to_string(),
        });
    }

    suggestions.push(Suggestion {
        title: "Target Comments".to_string(),
        description: format!(
            "Average engagement is {}. Prompt users with questions to drive comments and boost ranking.",
            average
        ),
        priority: Priority::Medium,
        category: "Engagement".to_string(),
    });

    suggestions
}
