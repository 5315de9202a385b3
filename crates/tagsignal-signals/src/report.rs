//! Serializable run report with a human-facing summary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculator::DIRECTIONAL_THRESHOLD;
use crate::error::SignalError;
use crate::pipeline::BatchAnalysis;
use crate::types::{MarketAnalysis, MarketLabel, RiskLevel, TagAnalysis};

const LOW_CONFIDENCE_WARNING: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketDirection {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub total_items: usize,
    pub tagged_items: usize,
    pub min_item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagExtreme {
    pub tag: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub market_direction: MarketDirection,
    pub confidence_level: RiskLevel,
    pub strongest_bullish_tag: Option<TagExtreme>,
    pub strongest_bearish_tag: Option<TagExtreme>,
    pub total_tags_analyzed: usize,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub metadata: ReportMetadata,
    pub overall_market: MarketAnalysis,
    pub tags: BTreeMap<String, TagAnalysis>,
    pub summary: ReportSummary,
}

impl RunReport {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SignalError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the report for a finished batch.
#[must_use]
pub fn build_report(
    analysis: BatchAnalysis,
    min_item_count: usize,
    generated_at: DateTime<Utc>,
) -> RunReport {
    let summary = summarize(&analysis.market, &analysis.tags);
    RunReport {
        metadata: ReportMetadata {
            generated_at,
            version: env!("CARGO_PKG_VERSION").to_string(),
            total_items: analysis.total_items,
            tagged_items: analysis.tagged_items,
            min_item_count,
        },
        overall_market: analysis.market,
        tags: analysis.tags,
        summary,
    }
}

fn summarize(market: &MarketAnalysis, tags: &BTreeMap<String, TagAnalysis>) -> ReportSummary {
    let market_direction = if market.signal_score > DIRECTIONAL_THRESHOLD {
        MarketDirection::Bullish
    } else if market.signal_score < -DIRECTIONAL_THRESHOLD {
        MarketDirection::Bearish
    } else {
        MarketDirection::Neutral
    };

    // BTreeMap order keeps the first tag on ties.
    let strongest_bullish_tag = tags
        .values()
        .filter(|t| t.signal_score > DIRECTIONAL_THRESHOLD)
        .fold(None::<&TagAnalysis>, |best, t| match best {
            Some(b) if b.signal_score >= t.signal_score => Some(b),
            _ => Some(t),
        })
        .map(extreme);
    let strongest_bearish_tag = tags
        .values()
        .filter(|t| t.signal_score < -DIRECTIONAL_THRESHOLD)
        .fold(None::<&TagAnalysis>, |best, t| match best {
            Some(b) if b.signal_score <= t.signal_score => Some(b),
            _ => Some(t),
        })
        .map(extreme);

    ReportSummary {
        market_direction,
        confidence_level: market.risk_indicators.confidence_level,
        strongest_bullish_tag,
        strongest_bearish_tag,
        total_tags_analyzed: tags.len(),
        recommendation: recommendation(market),
    }
}

fn extreme(tag: &TagAnalysis) -> TagExtreme {
    TagExtreme {
        tag: tag.tag.clone(),
        score: tag.signal_score,
    }
}

fn recommendation(market: &MarketAnalysis) -> String {
    let mut text = match market.signal_label {
        MarketLabel::StrongBullish => "Strong buy signal detected. Consider long positions.",
        MarketLabel::Bullish => "Moderate buy signal. Enter with caution.",
        MarketLabel::Neutral => "Market shows no clear direction. Hold positions.",
        MarketLabel::Bearish => "Moderate sell signal. Consider reducing positions.",
        MarketLabel::StrongBearish => {
            "Strong sell signal detected. Consider short positions or exit."
        }
        MarketLabel::Hold => "Insufficient confidence for trading action. Monitor the market.",
    }
    .to_string();

    if market.confidence < LOW_CONFIDENCE_WARNING {
        text.push_str(" Low confidence - signal reliability is questionable.");
    }
    if market.risk_indicators.volatility_level == RiskLevel::High {
        text.push_str(" High volatility detected - expect significant disagreement in signals.");
    }
    text
}
