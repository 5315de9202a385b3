//! Per-tag breakdown for a watch list of target tags.

use std::collections::{BTreeMap, BTreeSet};

use tagsignal_core::normalize_tag;
use tagsignal_signals::TagAnalysis;

/// Tags broken down after `analyze` unless `--all-tags` is given.
pub(crate) const DEFAULT_TARGET_TAGS: [&str; 5] =
    ["nifty", "nifty50", "sensex", "banknifty", "intraday"];

const TOP_TERMS_SHOWN: usize = 5;

/// Normalize and de-duplicate the requested target tags.
pub(crate) fn normalize_targets(targets: &[String]) -> BTreeSet<String> {
    targets.iter().filter_map(|t| normalize_tag(t)).collect()
}

/// Analyses for the targets present in `tags`, strongest `|signal_score|`
/// first. Ties break on tag name.
pub(crate) fn select_target_tags<'a>(
    tags: &'a BTreeMap<String, TagAnalysis>,
    targets: &BTreeSet<String>,
) -> Vec<&'a TagAnalysis> {
    let mut found: Vec<&TagAnalysis> = targets.iter().filter_map(|t| tags.get(t)).collect();
    found.sort_by(|a, b| {
        b.signal_score
            .abs()
            .total_cmp(&a.signal_score.abs())
            .then_with(|| a.tag.cmp(&b.tag))
    });
    found
}

pub(crate) fn print_target_tags(tags: &BTreeMap<String, TagAnalysis>, targets: &[String]) {
    let targets = normalize_targets(targets);
    let found = select_target_tags(tags, &targets);

    println!();
    if found.is_empty() {
        println!("no data found for target tags");
        return;
    }
    println!("target tags: found {}/{}", found.len(), targets.len());

    println!(
        "{:<20}{:<14}{:>9}  {:>11}  {:>6}",
        "TAG", "LABEL", "SCORE", "CONFIDENCE", "ITEMS"
    );
    for analysis in &found {
        println!(
            "{:<20}{:<14}{:>+9.3}  {:>10.1}%  {:>6}",
            format!("#{}", analysis.tag),
            analysis.signal_label.to_string(),
            analysis.signal_score,
            analysis.confidence * 100.0,
            analysis.item_count
        );
    }

    for analysis in found {
        print_tag_block(analysis);
    }
}

fn print_tag_block(analysis: &TagAnalysis) {
    println!();
    println!("#{}", analysis.tag);
    println!(
        "  signal: {} ({:+.3})",
        analysis.signal_label, analysis.signal_score
    );
    println!("  confidence: {:.1}%", analysis.confidence * 100.0);
    println!("  consensus: {}", analysis.consensus);
    println!(
        "  items: {} total, {} valid",
        analysis.item_count, analysis.valid_item_count
    );

    let sentiment = &analysis.sentiment_distribution;
    if sentiment.bullish_count + sentiment.bearish_count + sentiment.neutral_count > 0 {
        println!(
            "  sentiment: bullish {} ({:.1}%), bearish {} ({:.1}%), neutral {} ({:.1}%)",
            sentiment.bullish_count,
            sentiment.bullish_ratio * 100.0,
            sentiment.bearish_count,
            sentiment.bearish_ratio * 100.0,
            sentiment.neutral_count,
            sentiment.neutral_ratio * 100.0
        );
    }

    let engagement = &analysis.engagement_metrics;
    if engagement.total_likes > 0 {
        println!(
            "  engagement: {} likes, {} retweets, {} replies",
            engagement.total_likes, engagement.total_retweets, engagement.total_replies
        );
    }

    if !analysis.trending_terms.is_empty() {
        let terms: Vec<&str> = analysis
            .trending_terms
            .iter()
            .take(TOP_TERMS_SHOWN)
            .map(|t| t.term.as_str())
            .collect();
        println!("  trending: {}", terms.join(", "));
    }
}
