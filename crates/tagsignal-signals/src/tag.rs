//! Tag aggregator: groups scored items by normalized tag and builds one
//! [`TagAnalysis`] per tag with enough volume.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use tagsignal_core::{TagAggregationConfig, TermScore};

use crate::calculator::{classify, DIRECTIONAL_THRESHOLD};
use crate::math::{clip_signed, count_ratio, mean, mean_of, weighted_mean};
use crate::types::{
    ConfidenceComponents, Consensus, EngagementSummary, LabelShare, ScoredItem,
    SentimentDistribution, SignalDistribution, SignalLabel, TagAnalysis, TimeRange,
};

/// Sentiment magnitude separating bullish/bearish items from neutral ones.
const SENTIMENT_THRESHOLD: f64 = 0.1;
/// Virality above which an item counts as high-engagement.
const HIGH_ENGAGEMENT_THRESHOLD: f64 = 0.5;
const STRONG_CONSENSUS_RATIO: f64 = 0.7;
const CONSENSUS_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct TagAggregator {
    config: TagAggregationConfig,
}

impl TagAggregator {
    #[must_use]
    pub fn new(config: TagAggregationConfig) -> Self {
        Self { config }
    }

    /// Analyze every tag carried by at least `min_item_count` items.
    ///
    /// Items without any usable tag take no part. Tags below the volume floor
    /// are absent from the result rather than zero-valued.
    #[must_use]
    pub fn analyze(&self, items: &[ScoredItem]) -> BTreeMap<String, TagAnalysis> {
        let groups = group_by_tag(items);

        if groups.is_empty() {
            tracing::warn!(items = items.len(), "no tagged items in batch");
            return BTreeMap::new();
        }

        let min_items = self.config.min_item_count;
        let results: BTreeMap<String, TagAnalysis> = groups
            .into_par_iter()
            .filter(|(tag, rows)| {
                let keep = rows.len() >= min_items;
                if !keep {
                    tracing::debug!(
                        tag = tag.as_str(),
                        items = rows.len(),
                        min_items,
                        "skipping tag below minimum item count"
                    );
                }
                keep
            })
            .map(|(tag, rows)| {
                let analysis = self.analyze_group(&tag, &rows);
                (tag, analysis)
            })
            .collect();

        tracing::info!(tags = results.len(), "analyzed tags");
        results
    }

    fn analyze_group(&self, tag: &str, rows: &[&ScoredItem]) -> TagAnalysis {
        let valid: Vec<&ScoredItem> = rows
            .iter()
            .copied()
            .filter(|r| r.signal.confidence >= self.config.min_confidence)
            .collect();

        let (signal_score, signal_label, confidence, consensus) = if valid.is_empty() {
            (0.0, SignalLabel::Hold, 0.0, Consensus::None)
        } else {
            let score = weighted_mean(
                valid
                    .iter()
                    .map(|r| (r.signal.signal_score, r.signal.confidence)),
            );
            let confidence = mean(valid.iter().map(|r| r.signal.confidence));
            let label = match classify(score, confidence).0 {
                SignalLabel::Ignore => SignalLabel::Hold,
                other => other,
            };
            let signals: Vec<f64> = valid.iter().map(|r| r.signal.signal_score).collect();
            (score, label, confidence, consensus_of(&signals))
        };

        TagAnalysis {
            tag: tag.to_string(),
            item_count: rows.len(),
            valid_item_count: valid.len(),
            time_range: time_range(rows),
            signal_score,
            signal_label,
            confidence,
            consensus,
            sentiment_distribution: sentiment_distribution(&valid),
            signal_distribution: signal_distribution(rows),
            engagement_metrics: engagement_summary(rows),
            trending_terms: trending_terms(&valid, self.config.trending_terms_limit),
            confidence_breakdown: confidence_breakdown(&valid),
        }
    }
}

/// Explode items into (tag, item) rows grouped by normalized tag.
fn group_by_tag(items: &[ScoredItem]) -> HashMap<String, Vec<&ScoredItem>> {
    let mut groups: HashMap<String, Vec<&ScoredItem>> = HashMap::new();
    for scored in items {
        for tag in scored.item.normalized_tags() {
            groups.entry(tag).or_default().push(scored);
        }
    }
    groups
}

/// Consensus over directional signals: share above +0.2 vs. below -0.2.
pub(crate) fn consensus_from_ratios(bullish: f64, bearish: f64) -> Consensus {
    if bullish > STRONG_CONSENSUS_RATIO {
        Consensus::StrongBullish
    } else if bullish > CONSENSUS_RATIO {
        Consensus::Bullish
    } else if bearish > STRONG_CONSENSUS_RATIO {
        Consensus::StrongBearish
    } else if bearish > CONSENSUS_RATIO {
        Consensus::Bearish
    } else {
        Consensus::Mixed
    }
}

fn consensus_of(signals: &[f64]) -> Consensus {
    let bullish = signals.iter().filter(|&&s| s > DIRECTIONAL_THRESHOLD).count();
    let bearish = signals
        .iter()
        .filter(|&&s| s < -DIRECTIONAL_THRESHOLD)
        .count();
    consensus_from_ratios(
        count_ratio(bullish, signals.len()),
        count_ratio(bearish, signals.len()),
    )
}

fn sentiment_distribution(valid: &[&ScoredItem]) -> SentimentDistribution {
    let total = valid.len();
    let mut bullish_count = 0;
    let mut bearish_count = 0;
    for r in valid {
        let s = clip_signed(r.item.sentiment_score);
        if s > SENTIMENT_THRESHOLD {
            bullish_count += 1;
        } else if s < -SENTIMENT_THRESHOLD {
            bearish_count += 1;
        }
    }
    let neutral_count = total - bullish_count - bearish_count;

    SentimentDistribution {
        avg_sentiment: mean(valid.iter().map(|r| clip_signed(r.item.sentiment_score))),
        bullish_count,
        bearish_count,
        neutral_count,
        bullish_ratio: count_ratio(bullish_count, total),
        bearish_ratio: count_ratio(bearish_count, total),
        neutral_ratio: count_ratio(neutral_count, total),
    }
}

fn signal_distribution(rows: &[&ScoredItem]) -> SignalDistribution {
    let mut counts: BTreeMap<SignalLabel, usize> = BTreeMap::new();
    for r in rows {
        *counts.entry(r.signal.signal_label).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(label, count)| {
            (
                label,
                LabelShare {
                    count,
                    ratio: count_ratio(count, rows.len()),
                },
            )
        })
        .collect()
}

fn engagement_summary(rows: &[&ScoredItem]) -> EngagementSummary {
    let high_engagement_count = rows
        .iter()
        .filter(|r| r.signal.virality_score > HIGH_ENGAGEMENT_THRESHOLD)
        .count();

    EngagementSummary {
        avg_virality: mean(rows.iter().map(|r| r.signal.virality_score)),
        total_likes: rows.iter().fold(0_u64, |acc, r| acc.saturating_add(r.item.likes)),
        total_retweets: rows
            .iter()
            .fold(0_u64, |acc, r| acc.saturating_add(r.item.retweets)),
        total_replies: rows
            .iter()
            .fold(0_u64, |acc, r| acc.saturating_add(r.item.replies)),
        high_engagement_count,
        high_engagement_ratio: count_ratio(high_engagement_count, rows.len()),
    }
}

/// Average each term's per-item score over the valid rows and keep the best.
///
/// Ties are ordered by term so the output is stable.
fn trending_terms(valid: &[&ScoredItem], limit: usize) -> Vec<TermScore> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for r in valid {
        for t in &r.item.top_terms {
            let entry = sums.entry(t.term.as_str()).or_insert((0.0, 0));
            entry.0 += t.score;
            entry.1 += 1;
        }
    }

    let mut averaged: Vec<TermScore> = sums
        .into_iter()
        .map(|(term, (sum, n))| TermScore::new(term, mean_of(sum, n)))
        .collect();
    averaged.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.term.cmp(&b.term)));
    averaged.truncate(limit);
    averaged
}

fn confidence_breakdown(valid: &[&ScoredItem]) -> ConfidenceComponents {
    ConfidenceComponents {
        content_quality: mean(
            valid
                .iter()
                .map(|r| r.signal.confidence_components.content_quality),
        ),
        sentiment_strength: mean(
            valid
                .iter()
                .map(|r| r.signal.confidence_components.sentiment_strength),
        ),
        social_proof: mean(
            valid
                .iter()
                .map(|r| r.signal.confidence_components.social_proof),
        ),
    }
}

#[allow(clippy::cast_precision_loss)]
fn time_range(rows: &[&ScoredItem]) -> Option<TimeRange> {
    let mut stamps = rows.iter().filter_map(|r| r.item.timestamp);
    let first = stamps.next()?;
    let (earliest, latest) = stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
    let span_hours = (latest - earliest).num_milliseconds() as f64 / 3_600_000.0;
    Some(TimeRange {
        earliest,
        latest,
        span_hours,
    })
}

#[cfg(test)]
#[path = "tag_test.rs"]
mod tests;
