use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tagsignal_core::{Item, TermScore};

/// Item- and tag-level trading label.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalLabel {
    StrongBuy,
    Buy,
    #[default]
    Hold,
    Sell,
    StrongSell,
    Ignore,
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalLabel::StrongBuy => write!(f, "STRONG_BUY"),
            SignalLabel::Buy => write!(f, "BUY"),
            SignalLabel::Hold => write!(f, "HOLD"),
            SignalLabel::Sell => write!(f, "SELL"),
            SignalLabel::StrongSell => write!(f, "STRONG_SELL"),
            SignalLabel::Ignore => write!(f, "IGNORE"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStrength {
    #[default]
    None,
    Weak,
    Moderate,
    Strong,
}

/// Agreement among a group's directional signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Consensus {
    StrongBullish,
    Bullish,
    Mixed,
    Bearish,
    StrongBearish,
    #[default]
    None,
}

impl std::fmt::Display for Consensus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Consensus::StrongBullish => write!(f, "STRONG_BULLISH"),
            Consensus::Bullish => write!(f, "BULLISH"),
            Consensus::Mixed => write!(f, "MIXED"),
            Consensus::Bearish => write!(f, "BEARISH"),
            Consensus::StrongBearish => write!(f, "STRONG_BEARISH"),
            Consensus::None => write!(f, "NONE"),
        }
    }
}

/// Market-wide label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketLabel {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
    #[default]
    Hold,
}

impl std::fmt::Display for MarketLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketLabel::StrongBullish => write!(f, "STRONG_BULLISH"),
            MarketLabel::Bullish => write!(f, "BULLISH"),
            MarketLabel::Neutral => write!(f, "NEUTRAL"),
            MarketLabel::Bearish => write!(f, "BEARISH"),
            MarketLabel::StrongBearish => write!(f, "STRONG_BEARISH"),
            MarketLabel::Hold => write!(f, "HOLD"),
        }
    }
}

/// Shared bucket for volatility and confidence risk levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    #[default]
    None,
    Low,
    Moderate,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::None => write!(f, "NONE"),
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Moderate => write!(f, "MODERATE"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Raw ratios behind a virality score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementBreakdown {
    pub total_engagement: u64,
    /// Engagements per thousand views.
    pub engagement_rate: f64,
    /// Retweets per like.
    pub virality_ratio: f64,
    /// Replies as a share of total engagement.
    pub reply_ratio: f64,
    /// Likes per view.
    pub like_ratio: f64,
    pub virality_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceComponents {
    pub content_quality: f64,
    pub sentiment_strength: f64,
    pub social_proof: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Derived, per-item signal record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSignal {
    pub item_id: String,
    pub engagement: EngagementBreakdown,
    pub virality_score: f64,
    pub confidence: f64,
    pub confidence_components: ConfidenceComponents,
    pub base_signal: f64,
    pub signal_score: f64,
    pub signal_label: SignalLabel,
    pub signal_strength: SignalStrength,
    pub confidence_interval: ConfidenceInterval,
}

/// An item paired with the signal computed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: Item,
    pub signal: ItemSignal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub avg_sentiment: f64,
    pub bullish_count: usize,
    pub bearish_count: usize,
    pub neutral_count: usize,
    pub bullish_ratio: f64,
    pub bearish_ratio: f64,
    pub neutral_ratio: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelShare {
    pub count: usize,
    pub ratio: f64,
}

/// Label → share. Only labels that occur are present.
pub type SignalDistribution = BTreeMap<SignalLabel, LabelShare>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementSummary {
    pub avg_virality: f64,
    pub total_likes: u64,
    pub total_retweets: u64,
    pub total_replies: u64,
    pub high_engagement_count: usize,
    pub high_engagement_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
    pub span_hours: f64,
}

/// Aggregate over every item carrying one tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagAnalysis {
    pub tag: String,
    pub item_count: usize,
    pub valid_item_count: usize,
    pub time_range: Option<TimeRange>,
    pub signal_score: f64,
    pub signal_label: SignalLabel,
    pub confidence: f64,
    pub consensus: Consensus,
    pub sentiment_distribution: SentimentDistribution,
    pub signal_distribution: SignalDistribution,
    pub engagement_metrics: EngagementSummary,
    pub trending_terms: Vec<TermScore>,
    pub confidence_breakdown: ConfidenceComponents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRanking {
    pub rank: usize,
    pub tag: String,
    pub signal_label: SignalLabel,
    pub signal_score: f64,
    pub confidence: f64,
    pub item_count: usize,
    pub rank_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskIndicators {
    pub signal_volatility: f64,
    pub volatility_level: RiskLevel,
    pub confidence_level: RiskLevel,
    pub low_confidence_items: usize,
    pub low_confidence_ratio: f64,
    pub ignored_items: usize,
    pub ignored_ratio: f64,
}

/// Single market-wide aggregate for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub signal_label: MarketLabel,
    pub signal_score: f64,
    pub confidence: f64,
    pub consensus: Consensus,
    pub total_item_count: usize,
    pub tag_count: usize,
    pub signal_std: f64,
    pub sentiment_distribution: SentimentDistribution,
    pub signal_distribution: SignalDistribution,
    pub hashtag_ranking: Vec<TagRanking>,
    pub risk_indicators: RiskIndicators,
}
