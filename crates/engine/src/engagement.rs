//! Engagement metrics derived from posts.

use api_types::post::Post;

/// Interactions over reach as a percentage with one decimal.
///
/// `shares`, `saved` and `reach` default to 0 and reach is floored at 1, so
/// a post without reach yields `interactions * 100`.
///
/// ```rust
/// # use api_types::post::{MediaType, Post};
/// # let post = Post {
/// #     ig_media_id: "m".into(), ig_user_id: None,
/// #     timestamp: chrono::Utc::now(), media_type: MediaType::Image,
/// #     caption: None, media_url: None, thumbnail_url: None, permalink: None,
/// #     like_count: 10, comments_count: 5, reach: Some(100), views: None,
/// #     shares: None, saved: None, engagement_rate: None,
/// # };
/// assert_eq!(engine::engagement_rate(&post), 15.0);
/// ```
pub fn engagement_rate(post: &Post) -> f64 {
    let interactions = post.like_count
        + post.comments_count
        + post.shares.unwrap_or(0)
        + post.saved.unwrap_or(0);
    let reach = post.reach.unwrap_or(0).max(1);
    ((interactions as f64 / reach as f64) * 1000.0).round() / 10.0
}

/// Totals shown under a posts table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostSummary {
    pub count: usize,
    pub total_likes: u64,
    pub total_comments: u64,
    pub total_reach: u64,
    pub total_views: u64,
    /// Mean of per-post engagement rates, one decimal. 0 when empty.
    pub avg_engagement_rate: f64,
}

impl PostSummary {
    pub fn from_posts<'a, I>(posts: I) -> Self
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut summary = Self::default();
        let mut rate_sum = 0.0;
        for post in posts {
            summary.count += 1;
            summary.total_likes += post.like_count;
            summary.total_comments += post.comments_count;
            summary.total_reach += post.reach.unwrap_or(0);
            summary.total_views += post.views.unwrap_or(0);
            rate_sum += engagement_rate(post);
        }
        if summary.count > 0 {
            summary.avg_engagement_rate = (rate_sum / summary.count as f64 * 10.0).round() / 10.0;
        }
        summary
    }
}
