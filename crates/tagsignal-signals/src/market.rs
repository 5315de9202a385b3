//! Market aggregator: volume-weights tag composites into one market signal.

use std::collections::BTreeMap;

use tagsignal_core::MarketAggregationConfig;

use crate::calculator::{DIRECTIONAL_THRESHOLD, STRONG_THRESHOLD};
use crate::math::{clip_signed, clip_unit, count_ratio, population_std, ratio};
use crate::tag::consensus_from_ratios;
use crate::types::{
    LabelShare, MarketAnalysis, MarketLabel, RiskIndicators, RiskLevel,
    SentimentDistribution, SignalDistribution, SignalLabel, TagAnalysis, TagRanking,
};

const LOW_VOLATILITY: f64 = 0.2;
const MODERATE_VOLATILITY: f64 = 0.4;
const HIGH_CONFIDENCE: f64 = 0.7;
const MODERATE_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarketAggregator {
    config: MarketAggregationConfig,
}

impl MarketAggregator {
    #[must_use]
    pub fn new(config: MarketAggregationConfig) -> Self {
        Self { config }
    }

    /// Fold per-tag analyses into one market view.
    ///
    /// Each tag weighs in proportion to its item count. An empty input gives
    /// the neutral `HOLD` result with `NONE` risk levels.
    #[must_use]
    pub fn aggregate(
        &self,
        tags: &BTreeMap<String, TagAnalysis>,
        total_item_count: usize,
    ) -> MarketAnalysis {
        if tags.is_empty() {
            tracing::warn!(total_item_count, "no tag analyses to aggregate");
            return MarketAnalysis::default();
        }

        let analyses: Vec<&TagAnalysis> = tags.values().collect();
        let weights = volume_weights(&analyses);

        let signal_score = clip_signed(
            analyses
                .iter()
                .zip(&weights)
                .map(|(t, w)| t.signal_score * w)
                .sum(),
        );
        let confidence = clip_unit(
            analyses
                .iter()
                .zip(&weights)
                .map(|(t, w)| t.confidence * w)
                .sum(),
        );

        let signals: Vec<f64> = analyses.iter().map(|t| t.signal_score).collect();
        let signal_std = population_std(&signals);

        let bullish_weight: f64 = analyses
            .iter()
            .zip(&weights)
            .filter(|(t, _)| t.signal_score > DIRECTIONAL_THRESHOLD)
            .map(|(_, w)| w)
            .sum();
        let bearish_weight: f64 = analyses
            .iter()
            .zip(&weights)
            .filter(|(t, _)| t.signal_score < -DIRECTIONAL_THRESHOLD)
            .map(|(_, w)| w)
            .sum();

        let signal_distribution = signal_distribution(&analyses, total_item_count);
        let risk_indicators = risk_indicators(
            &analyses,
            &signal_distribution,
            signal_std,
            confidence,
            total_item_count,
        );

        let signal_label = self.label(signal_score, confidence);
        tracing::info!(
            tags = analyses.len(),
            total_item_count,
            signal_score,
            confidence,
            label = %signal_label,
            "aggregated market signal"
        );

        MarketAnalysis {
            signal_label,
            signal_score,
            confidence,
            consensus: consensus_from_ratios(bullish_weight, bearish_weight),
            total_item_count,
            tag_count: analyses.len(),
            signal_std,
            sentiment_distribution: sentiment_distribution(&analyses, total_item_count),
            signal_distribution,
            hashtag_ranking: rank_tags(&analyses),
            risk_indicators,
        }
    }

    fn label(&self, signal: f64, confidence: f64) -> MarketLabel {
        if confidence < self.config.min_confidence {
            MarketLabel::Hold
        } else if signal >= STRONG_THRESHOLD {
            MarketLabel::StrongBullish
        } else if signal > DIRECTIONAL_THRESHOLD {
            MarketLabel::Bullish
        } else if signal <= -STRONG_THRESHOLD {
            MarketLabel::StrongBearish
        } else if signal < -DIRECTIONAL_THRESHOLD {
            MarketLabel::Bearish
        } else {
            MarketLabel::Neutral
        }
    }
}

/// Share of total volume per tag; uniform when no tag carries any items.
#[allow(clippy::cast_precision_loss)]
fn volume_weights(analyses: &[&TagAnalysis]) -> Vec<f64> {
    let total: usize = analyses.iter().map(|t| t.item_count).sum();
    if total == 0 {
        let uniform = 1.0 / analyses.len() as f64;
        return vec![uniform; analyses.len()];
    }
    analyses
        .iter()
        .map(|t| count_ratio(t.item_count, total))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn sentiment_distribution(
    analyses: &[&TagAnalysis],
    total_item_count: usize,
) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();
    let mut weighted_sentiment = 0.0;
    let mut valid_rows = 0_usize;

    for t in analyses {
        let d = &t.sentiment_distribution;
        dist.bullish_count += d.bullish_count;
        dist.bearish_count += d.bearish_count;
        dist.neutral_count += d.neutral_count;
        weighted_sentiment += d.avg_sentiment * t.valid_item_count as f64;
        valid_rows += t.valid_item_count;
    }

    dist.avg_sentiment = ratio(weighted_sentiment, valid_rows as f64);
    dist.bullish_ratio = count_ratio(dist.bullish_count, total_item_count);
    dist.bearish_ratio = count_ratio(dist.bearish_count, total_item_count);
    dist.neutral_ratio = count_ratio(dist.neutral_count, total_item_count);
    dist
}

fn signal_distribution(analyses: &[&TagAnalysis], total_item_count: usize) -> SignalDistribution {
    let mut counts: BTreeMap<SignalLabel, usize> = BTreeMap::new();
    for t in analyses {
        for (label, share) in &t.signal_distribution {
            *counts.entry(*label).or_default() += share.count;
        }
    }
    counts
        .into_iter()
        .map(|(label, count)| {
            (
                label,
                LabelShare {
                    count,
                    ratio: count_ratio(count, total_item_count),
                },
            )
        })
        .collect()
}

/// Rank by `signal_score * confidence` descending, tag name breaking ties.
fn rank_tags(analyses: &[&TagAnalysis]) -> Vec<TagRanking> {
    let mut ranking: Vec<TagRanking> = analyses
        .iter()
        .map(|t| TagRanking {
            rank: 0,
            tag: t.tag.clone(),
            signal_label: t.signal_label,
            signal_score: t.signal_score,
            confidence: t.confidence,
            item_count: t.item_count,
            rank_score: t.signal_score * t.confidence,
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.rank_score
            .total_cmp(&a.rank_score)
            .then_with(|| a.tag.cmp(&b.tag))
    });
    for (i, entry) in ranking.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    ranking
}

fn risk_indicators(
    analyses: &[&TagAnalysis],
    signal_distribution: &SignalDistribution,
    signal_std: f64,
    confidence: f64,
    total_item_count: usize,
) -> RiskIndicators {
    let ignored_items = signal_distribution
        .get(&SignalLabel::Ignore)
        .map_or(0, |share| share.count);
    let low_confidence_items = analyses
        .iter()
        .map(|t| t.item_count.saturating_sub(t.valid_item_count))
        .sum();

    RiskIndicators {
        signal_volatility: signal_std,
        volatility_level: volatility_level(signal_std),
        confidence_level: confidence_level(confidence),
        low_confidence_items,
        low_confidence_ratio: count_ratio(low_confidence_items, total_item_count),
        ignored_items,
        ignored_ratio: count_ratio(ignored_items, total_item_count),
    }
}

fn volatility_level(signal_std: f64) -> RiskLevel {
    if signal_std < LOW_VOLATILITY {
        RiskLevel::Low
    } else if signal_std < MODERATE_VOLATILITY {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

fn confidence_level(confidence: f64) -> RiskLevel {
    if confidence >= HIGH_CONFIDENCE {
        RiskLevel::High
    } else if confidence >= MODERATE_CONFIDENCE {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Consensus;

    const EPS: f64 = 1e-9;

    fn tag(name: &str, item_count: usize, signal_score: f64, confidence: f64) -> TagAnalysis {
        TagAnalysis {
            tag: name.to_string(),
            item_count,
            valid_item_count: item_count,
            signal_score,
            confidence,
            ..TagAnalysis::default()
        }
    }

    fn market(tags: Vec<TagAnalysis>) -> BTreeMap<String, TagAnalysis> {
        tags.into_iter().map(|t| (t.tag.clone(), t)).collect()
    }

    #[test]
    fn empty_input_is_neutral() {
        let result = MarketAggregator::default().aggregate(&BTreeMap::new(), 0);
        assert_eq!(result.signal_label, MarketLabel::Hold);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.consensus, Consensus::None);
        assert!(result.hashtag_ranking.is_empty());
        assert_eq!(result.risk_indicators.volatility_level, RiskLevel::None);
        assert_eq!(result.risk_indicators.confidence_level, RiskLevel::None);
    }

    #[test]
    fn volume_weighted_composite() {
        let tags = market(vec![tag("a", 80, 0.5, 0.6), tag("b", 20, -0.3, 0.4)]);
        let result = MarketAggregator::default().aggregate(&tags, 100);

        assert!((result.signal_score - 0.34).abs() < EPS);
        assert!((result.confidence - 0.56).abs() < EPS);
        assert_eq!(result.signal_label, MarketLabel::Bullish);
        assert_eq!(result.consensus, Consensus::StrongBullish);
        assert_eq!(result.tag_count, 2);
        assert!((result.signal_std - 0.4).abs() < EPS);
        assert_eq!(result.risk_indicators.confidence_level, RiskLevel::Moderate);
    }

    #[test]
    fn single_tag_passes_through() {
        let tags = market(vec![tag("nifty", 30, -0.27, 0.62)]);
        let result = MarketAggregator::default().aggregate(&tags, 30);
        assert!((result.signal_score + 0.27).abs() < EPS);
        assert!((result.confidence - 0.62).abs() < EPS);
        assert_eq!(result.signal_label, MarketLabel::Bearish);
        assert_eq!(result.signal_std, 0.0);
        assert_eq!(result.risk_indicators.volatility_level, RiskLevel::Low);
    }

    #[test]
    fn low_confidence_market_holds() {
        let tags = market(vec![tag("a", 10, 0.9, 0.35)]);
        let result = MarketAggregator::default().aggregate(&tags, 10);
        assert_eq!(result.signal_label, MarketLabel::Hold);
        assert_eq!(result.risk_indicators.confidence_level, RiskLevel::Low);
    }

    #[test]
    fn min_confidence_is_configurable() {
        let tags = market(vec![tag("a", 10, 0.9, 0.35)]);
        let agg = MarketAggregator::new(MarketAggregationConfig {
            min_confidence: 0.3,
        });
        assert_eq!(agg.aggregate(&tags, 10).signal_label, MarketLabel::StrongBullish);
    }

    #[test]
    fn zero_volume_tags_weigh_uniformly() {
        let tags = market(vec![tag("a", 0, 0.6, 0.8), tag("b", 0, 0.2, 0.4)]);
        let result = MarketAggregator::default().aggregate(&tags, 0);
        assert!((result.signal_score - 0.4).abs() < EPS);
        assert!((result.confidence - 0.6).abs() < EPS);
        assert_eq!(result.sentiment_distribution.bullish_ratio, 0.0);
    }

    #[test]
    fn ranking_orders_by_rank_score_then_tag() {
        let tags = market(vec![
            tag("zeta", 10, 0.4, 0.5),
            tag("alpha", 10, 0.4, 0.5),
            tag("mid", 10, 0.9, 0.9),
            tag("neg", 10, -0.6, 0.7),
        ]);
        let ranking = MarketAggregator::default().aggregate(&tags, 40).hashtag_ranking;
        let order: Vec<(&str, usize)> = ranking.iter().map(|r| (r.tag.as_str(), r.rank)).collect();
        assert_eq!(
            order,
            vec![("mid", 1), ("alpha", 2), ("zeta", 3), ("neg", 4)]
        );
        assert!((ranking[0].rank_score - 0.81).abs() < EPS);
    }

    #[test]
    fn distributions_sum_tag_counts() {
        let mut a = tag("a", 6, 0.3, 0.5);
        a.valid_item_count = 4;
        a.sentiment_distribution = SentimentDistribution {
            avg_sentiment: 0.4,
            bullish_count: 3,
            bearish_count: 1,
            neutral_count: 0,
            ..SentimentDistribution::default()
        };
        a.signal_distribution = BTreeMap::from([
            (SignalLabel::Buy, LabelShare { count: 4, ratio: 0.0 }),
            (SignalLabel::Ignore, LabelShare { count: 2, ratio: 0.0 }),
        ]);
        let mut b = tag("b", 4, -0.1, 0.5);
        b.sentiment_distribution = SentimentDistribution {
            avg_sentiment: -0.2,
            bullish_count: 0,
            bearish_count: 2,
            neutral_count: 2,
            ..SentimentDistribution::default()
        };
        b.signal_distribution =
            BTreeMap::from([(SignalLabel::Hold, LabelShare { count: 4, ratio: 0.0 })]);

        let result = MarketAggregator::default().aggregate(&market(vec![a, b]), 10);

        let sentiment = result.sentiment_distribution;
        assert_eq!(sentiment.bullish_count, 3);
        assert_eq!(sentiment.bearish_count, 3);
        assert_eq!(sentiment.neutral_count, 2);
        assert!((sentiment.bearish_ratio - 0.3).abs() < EPS);
        // (0.4*4 + -0.2*4) / 8
        assert!((sentiment.avg_sentiment - 0.1).abs() < EPS);

        assert_eq!(result.signal_distribution[&SignalLabel::Buy].count, 4);
        assert!((result.signal_distribution[&SignalLabel::Hold].ratio - 0.4).abs() < EPS);

        let risk = result.risk_indicators;
        assert_eq!(risk.ignored_items, 2);
        assert!((risk.ignored_ratio - 0.2).abs() < EPS);
        assert_eq!(risk.low_confidence_items, 2);
        assert!((risk.low_confidence_ratio - 0.2).abs() < EPS);
    }

    #[test]
    fn out_of_range_tag_scores_are_clipped() {
        let tags = market(vec![tag("a", 10, 1.8, 1.4), tag("b", 10, 1.2, 1.6)]);
        let result = MarketAggregator::default().aggregate(&tags, 20);
        assert_eq!(result.signal_score, 1.0);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.signal_label, MarketLabel::StrongBullish);

        let tags = market(vec![tag("a", 10, -3.0, -0.5)]);
        let result = MarketAggregator::default().aggregate(&tags, 10);
        assert_eq!(result.signal_score, -1.0);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn bearish_consensus_from_weight() {
        let tags = market(vec![tag("a", 60, -0.4, 0.6), tag("b", 40, 0.15, 0.6)]);
        let result = MarketAggregator::default().aggregate(&tags, 100);
        assert_eq!(result.consensus, Consensus::Bearish);
        // -0.24 + 0.06
        assert_eq!(result.signal_label, MarketLabel::Neutral);
    }
}
