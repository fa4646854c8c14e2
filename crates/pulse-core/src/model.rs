//! Post records and analysis results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A social-media post as delivered by the upstream fetch layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink_url: Option<String>,
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
    /// Unique impressions, when the upstream API exposes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<u32>,
}

impl Post {
    /// Derived engagement score; never stored.
    pub fn engagement(&self) -> u32 {
        self.likes + self.comments + self.shares
    }

    pub fn has_image(&self) -> bool {
        self.full_picture_url.is_some()
    }
}

/// Per-post insight produced by the AI pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostAnalysis {
    pub post_id: String,
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub content_ideas: Vec<String>,
    /// 1-10
    #[serde(default)]
    pub quality_score: u8,
    /// 1-10
    #[serde(default)]
    pub engagement_score: u8,
}

/// Cross-post marketing assessment derived from the whole selected set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverallAnalysis {
    pub summary: String,
    pub best_posts: Vec<String>,
    pub worst_posts: Vec<String>,
    /// 0-100
    pub marketing_health_score: u8,
    pub next_post_ideas: Vec<String>,
    pub recommendations: Vec<String>,
}

impl OverallAnalysis {
    /// Sentinel result for flows that could not reach the model.
    pub fn placeholder(summary: impl Into<String>, marketing_health_score: u8) -> Self {
        Self {
            summary: summary.into(),
            best_posts: Vec::new(),
            worst_posts: Vec::new(),
            marketing_health_score,
            next_post_ideas: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}
