//! `rank` command: tag ranking table.

use std::path::Path;

use tagsignal_core::SignalConfig;
use tagsignal_signals::run_batch;

use crate::analyze::load_items;

/// Print the top `limit` tags by `signal_score * confidence`.
///
/// # Errors
///
/// Returns an error if the items cannot be loaded.
pub(crate) fn run_rank(input: &Path, limit: usize, config: &SignalConfig) -> anyhow::Result<()> {
    let items = load_items(input, None)?;
    let analysis = run_batch(items, config);
    let ranking = &analysis.market.hashtag_ranking;

    if ranking.is_empty() {
        println!(
            "no tags with at least {} items; try --min-items",
            config.tags.min_item_count
        );
        return Ok(());
    }

    println!(
        "{:<6}{:<25}{:<14}{:<10}{:<12}{:<8}RANK SCORE",
        "RANK", "TAG", "LABEL", "SCORE", "CONFIDENCE", "ITEMS"
    );
    for entry in ranking.iter().take(limit) {
        println!(
            "{:<6}{:<25}{:<14}{:<10.3}{:<12.3}{:<8}{:.3}",
            entry.rank,
            entry.tag,
            entry.signal_label.to_string(),
            entry.signal_score,
            entry.confidence,
            entry.item_count,
            entry.rank_score
        );
    }

    Ok(())
}
