//! Prompt templates for the analysis requests
//!
//! Post fields are serialized in a fixed order so that identical input
//! produces byte-identical prompts.

use pulse_core::{Post, PostAnalysis};

/// Serialize each post into the stable textual block the prompts embed.
pub fn format_post_block(posts: &[Post]) -> String {
    posts
        .iter()
        .map(|post| {
            let message = if post.message.is_empty() {
                "No message"
            } else {
                post.message.as_str()
            };
            let reach = post
                .reach
                .map(|r| r.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            format!(
                "Post ID: {}\nDate: {}\nMessage: {}\nLikes: {}\nComments: {}\nShares: {}\nReach: {}\nTotal Engagement: {}\nHas Image: {}",
                post.id,
                post.created_time.format("%Y-%m-%d"),
                message,
                post.likes,
                post.comments,
                post.shares,
                reach,
                post.engagement(),
                if post.has_image() { "Yes" } else { "No" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One prompt for a whole batch, requesting structured per-post feedback.
pub fn post_analysis_prompt(posts: &[Post]) -> String {
    format!(
        r#"You are a professional social media marketing consultant. Analyze the following posts and provide detailed insights for each post.

For each post, provide:
1. Problems Found (2-3 specific issues)
2. Suggested Improvements (2-3 actionable improvements)
3. Content Ideas for Next Posts (2-3 ideas based on this post's performance)

Post Data:
{}

Analyze each post individually and provide structured feedback. Focus on:
- Caption quality and engagement
- Hashtag usage and relevance
- Posting timing
- Content type effectiveness
- Audience engagement patterns

Format your response as JSON with this structure:
{{
  "analyses": [
    {{
      "postId": "post_id",
      "problems": ["problem1", "problem2"],
      "improvements": ["improvement1", "improvement2"],
      "contentIdeas": ["idea1", "idea2"],
      "qualityScore": 7,
      "engagementScore": 6
    }}
  ]
}}"#,
        format_post_block(posts)
    )
}

/// The aggregate variant: whole selected set plus the per-post scores.
pub fn overall_analysis_prompt(posts: &[Post], analyses: &[PostAnalysis]) -> String {
    let score_lines = analyses
        .iter()
        .map(|a| {
            format!(
                "Post {}: Quality {}/10, Engagement {}/10",
                a.post_id, a.quality_score, a.engagement_score
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a professional social media marketing consultant. Based on the following post data and individual analyses, provide an overall marketing assessment.

Post Data:
{}

Individual Analyses:
{}

Provide a comprehensive analysis including:
1. Overall Summary (2-3 sentences)
2. Best Performing Posts (top 2-3 post IDs with reasons)
3. Worst Performing Posts (bottom 2-3 post IDs with reasons)
4. Marketing Health Score (1-100)
5. Next Post Ideas (5-7 specific content ideas)
6. Strategic Recommendations (3-5 actionable recommendations)

Format as JSON:
{{
  "summary": "overall summary",
  "bestPosts": ["post_id with reason"],
  "worstPosts": ["post_id with reason"],
  "marketingHealthScore": 75,
  "nextPostIdeas": ["idea1", "idea2"],
  "recommendations": ["rec1", "rec2"]
}}"#,
        format_post_block(posts),
        score_lines
    )
}
