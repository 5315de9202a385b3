//! `analyze` command: full pipeline from an items file to a JSON report.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use tagsignal_core::{Item, SignalConfig};
use tagsignal_signals::{build_report, run_batch, RunReport};

use crate::detail;

const RANKING_SHOWN: usize = 5;

/// Read a JSON array of enriched items, keeping at most the first `limit`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON item array.
pub(crate) fn load_items(path: &Path, limit: Option<usize>) -> anyhow::Result<Vec<Item>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read items from {}", path.display()))?;
    let mut items: Vec<Item> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse items in {}", path.display()))?;
    tracing::info!(path = %path.display(), items = items.len(), "loaded items");

    if let Some(limit) = limit.filter(|&n| n < items.len()) {
        items.truncate(limit);
        tracing::info!(limit, "sampling first items");
    }
    Ok(items)
}

/// Run the pipeline and write the report.
///
/// With `output` set the report goes to that file and a console summary is
/// printed, followed by a breakdown of `targets` when given. Otherwise the
/// JSON report alone goes to stdout.
///
/// # Errors
///
/// Returns an error if the items cannot be loaded or the report cannot be
/// serialized or written.
pub(crate) fn run_analyze(
    input: &Path,
    output: Option<&Path>,
    sample: Option<usize>,
    targets: Option<&[String]>,
    config: &SignalConfig,
) -> anyhow::Result<()> {
    let items = load_items(input, sample)?;
    let analysis = run_batch(items, config);
    let report = build_report(analysis, config.tags.min_item_count, Utc::now());
    let json = report.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote report");
            print_summary(&report);
            if let Some(targets) = targets {
                detail::print_target_tags(&report.tags, targets);
            }
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    let market = &report.overall_market;
    let summary = &report.summary;

    println!(
        "items: {} ({} tagged), tags analyzed: {}",
        report.metadata.total_items, report.metadata.tagged_items, summary.total_tags_analyzed
    );
    println!(
        "market: {} score={:.3} confidence={:.3} consensus={}",
        market.signal_label, market.signal_score, market.confidence, market.consensus
    );

    let sentiment = &market.sentiment_distribution;
    println!(
        "sentiment: bullish {} ({:.1}%), bearish {} ({:.1}%), neutral {} ({:.1}%)",
        sentiment.bullish_count,
        sentiment.bullish_ratio * 100.0,
        sentiment.bearish_count,
        sentiment.bearish_ratio * 100.0,
        sentiment.neutral_count,
        sentiment.neutral_ratio * 100.0
    );

    let risk = &market.risk_indicators;
    println!(
        "risk: volatility={} ({:.3}) confidence={} low-confidence items={} ({:.1}%)",
        risk.volatility_level,
        risk.signal_volatility,
        summary.confidence_level,
        risk.low_confidence_items,
        risk.low_confidence_ratio * 100.0
    );

    if !market.hashtag_ranking.is_empty() {
        println!("top tags:");
        for entry in market.hashtag_ranking.iter().take(RANKING_SHOWN) {
            println!(
                "  {}. #{}: {} ({:+.3}, {:.1}%)",
                entry.rank,
                entry.tag,
                entry.signal_label,
                entry.signal_score,
                entry.confidence * 100.0
            );
        }
    }

    if let Some(bull) = &summary.strongest_bullish_tag {
        println!("strongest bullish: #{} ({:.3})", bull.tag, bull.score);
    }
    if let Some(bear) = &summary.strongest_bearish_tag {
        println!("strongest bearish: #{} ({:.3})", bear.tag, bear.score);
    }
    println!("{}", summary.recommendation);
}
