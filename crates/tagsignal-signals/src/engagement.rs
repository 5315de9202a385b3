//! Engagement scorer: raw counts → bounded virality score.

use tagsignal_core::EngagementWeights;

use crate::math::{clip_unit, ratio};
use crate::types::EngagementBreakdown;

/// Engagements per thousand views that saturate the rate component.
const ENGAGEMENT_RATE_CAP: f64 = 50.0;
/// Retweets per like that saturate the virality component.
const VIRALITY_RATIO_CAP: f64 = 0.5;
/// Likes per view that saturate the like component.
const LIKE_RATIO_CAP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngagementCounts {
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub views: u64,
}

/// Score engagement counts into a virality score in `[0, 1]`.
///
/// Every ratio falls back to 0 on a zero denominator, so all-zero counts
/// yield a score of exactly 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_engagement(
    counts: EngagementCounts,
    weights: &EngagementWeights,
) -> EngagementBreakdown {
    let likes = counts.likes as f64;
    let retweets = counts.retweets as f64;
    let replies = counts.replies as f64;
    let views = counts.views as f64;

    let total_engagement = counts
        .likes
        .saturating_add(counts.retweets)
        .saturating_add(counts.replies);
    let total = total_engagement as f64;

    let engagement_rate = ratio(total, views) * 1000.0;
    let virality_ratio = ratio(retweets, likes);
    let reply_ratio = ratio(replies, total);
    let like_ratio = ratio(likes, views);

    let weighted = weights.engagement_weight * (engagement_rate / ENGAGEMENT_RATE_CAP).min(1.0)
        + weights.retweet_weight * (virality_ratio / VIRALITY_RATIO_CAP).min(1.0)
        + weights.reply_weight * reply_ratio.min(1.0)
        + weights.like_weight * (like_ratio / LIKE_RATIO_CAP).min(1.0);

    EngagementBreakdown {
        total_engagement,
        engagement_rate,
        virality_ratio,
        reply_ratio,
        like_ratio,
        virality_score: clip_unit(ratio(weighted, weights.sum())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(likes: u64, retweets: u64, replies: u64, views: u64) -> EngagementBreakdown {
        score_engagement(
            EngagementCounts {
                likes,
                retweets,
                replies,
                views,
            },
            &EngagementWeights::default(),
        )
    }

    #[test]
    fn zero_engagement_scores_zero() {
        let result = score(0, 0, 0, 0);
        assert_eq!(result.total_engagement, 0);
        assert_eq!(result.engagement_rate, 0.0);
        assert_eq!(result.virality_ratio, 0.0);
        assert_eq!(result.reply_ratio, 0.0);
        assert_eq!(result.like_ratio, 0.0);
        assert_eq!(result.virality_score, 0.0);
    }

    #[test]
    fn high_virality_post() {
        let result = score(100, 50, 10, 5000);
        assert_eq!(result.total_engagement, 160);
        assert!((result.engagement_rate - 32.0).abs() < 1e-9);
        assert!((result.virality_ratio - 0.5).abs() < 1e-12);
        assert!((result.reply_ratio - 0.0625).abs() < 1e-12);
        // (0.3*0.64 + 0.5*1.0 + 0.3*0.0625 + 0.2*0.4) / 1.3
        assert!((result.virality_score - 0.79075 / 1.3).abs() < 1e-9);
        assert!(result.virality_score > 0.5);
    }

    #[test]
    fn low_engagement_post() {
        let result = score(5, 1, 0, 1000);
        assert_eq!(result.total_engagement, 6);
        assert!(result.virality_score < 0.3, "got {}", result.virality_score);
    }

    #[test]
    fn reply_ratio_is_share_of_total_engagement() {
        let result = score(80, 10, 40, 3000);
        assert_eq!(result.total_engagement, 130);
        assert!((result.reply_ratio - 40.0 / 130.0).abs() < 1e-12);
        assert!(result.reply_ratio <= 1.0);
        assert!(result.virality_score > 0.3);
    }

    #[test]
    fn zero_views_do_not_divide() {
        let result = score(10, 5, 2, 0);
        assert_eq!(result.engagement_rate, 0.0);
        assert_eq!(result.like_ratio, 0.0);
        assert!(result.virality_score > 0.0);
    }

    #[test]
    fn zero_likes_keep_virality_ratio_zero() {
        let result = score(0, 25, 0, 1000);
        assert_eq!(result.virality_ratio, 0.0);
    }

    #[test]
    fn saturated_components_cap_at_one() {
        let result = score(1_000_000, 1_000_000, 1_000_000, 1);
        assert!(result.virality_score <= 1.0);
        assert!(result.virality_score > 0.0);
    }

    #[test]
    fn custom_weights_shift_the_score() {
        let retweet_only = EngagementWeights {
            engagement_weight: 0.0,
            retweet_weight: 1.0,
            reply_weight: 0.0,
            like_weight: 0.0,
        };
        let result = score_engagement(
            EngagementCounts {
                likes: 100,
                retweets: 25,
                replies: 0,
                views: 0,
            },
            &retweet_only,
        );
        assert!((result.virality_score - 0.5).abs() < 1e-12);
    }
}
