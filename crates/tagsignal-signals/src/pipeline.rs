//! Batch pipeline orchestration.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tagsignal_core::{EngagementWeights, Item, SignalConfig};

use crate::calculator::calculate_signal;
use crate::confidence::score_confidence;
use crate::engagement::{score_engagement, EngagementCounts};
use crate::market::MarketAggregator;
use crate::tag::TagAggregator;
use crate::types::{ItemSignal, MarketAnalysis, ScoredItem, TagAnalysis};

/// Everything one batch run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    pub total_items: usize,
    /// Items carrying at least one usable tag.
    pub tagged_items: usize,
    pub scored: Vec<ScoredItem>,
    pub tags: BTreeMap<String, TagAnalysis>,
    pub market: MarketAnalysis,
}

/// Score one item: engagement, then confidence, then the directional signal.
#[must_use]
pub fn score_item(item: &Item, weights: &EngagementWeights) -> ItemSignal {
    let engagement = score_engagement(
        EngagementCounts {
            likes: item.likes,
            retweets: item.retweets,
            replies: item.replies,
            views: item.views,
        },
        weights,
    );
    let virality_score = engagement.virality_score;

    let confidence = score_confidence(
        item.finance_term_density,
        &item.top_terms,
        item.sentiment_confidence,
        virality_score,
    );
    let outcome = calculate_signal(item.sentiment_score, virality_score, confidence.confidence);

    ItemSignal {
        item_id: item.id.clone(),
        engagement,
        virality_score,
        confidence: confidence.confidence,
        confidence_components: confidence.components,
        base_signal: outcome.base_signal,
        signal_score: outcome.signal_score,
        signal_label: outcome.signal_label,
        signal_strength: outcome.signal_strength,
        confidence_interval: outcome.confidence_interval,
    }
}

/// Score every item in parallel. Output order follows input order.
#[must_use]
pub fn score_items(items: Vec<Item>, weights: &EngagementWeights) -> Vec<ScoredItem> {
    items
        .into_par_iter()
        .map(|item| {
            let signal = score_item(&item, weights);
            ScoredItem { item, signal }
        })
        .collect()
}

/// Run the full pipeline over one batch.
///
/// 1. Score each item (parallel).
/// 2. Group by tag and analyze each qualifying tag (parallel across tags).
/// 3. Fold the tag analyses into the market view.
///
/// An empty batch yields no tags and the neutral market result.
#[must_use]
pub fn run_batch(items: Vec<Item>, config: &SignalConfig) -> BatchAnalysis {
    let total_items = items.len();
    let scored = score_items(items, &config.engagement);
    let tagged_items = scored
        .iter()
        .filter(|s| !s.item.normalized_tags().is_empty())
        .count();
    tracing::info!(total_items, tagged_items, "scored items");

    let tags = TagAggregator::new(config.tags).analyze(&scored);
    let market = MarketAggregator::new(config.market).aggregate(&tags, total_items);

    BatchAnalysis {
        total_items,
        tagged_items,
        scored,
        tags,
        market,
    }
}
