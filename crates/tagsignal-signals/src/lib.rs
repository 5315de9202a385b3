//! Signal scoring and aggregation for tagged social-media items.
//!
//! Each item is scored for engagement, confidence and a directional signal.
//! Items are then grouped by tag into per-tag composites, and those are
//! volume-weighted into one market view with risk indicators and a tag
//! ranking. Every formula is total: ratios guard zero denominators and all
//! bounded scores are clipped.

pub mod calculator;
pub mod confidence;
pub mod engagement;
pub mod error;
pub mod features;
pub mod market;
pub mod pipeline;
pub mod report;
pub mod tag;
pub mod types;

mod math;

pub use calculator::{calculate_signal, classify, SignalOutcome};
pub use confidence::{content_quality, score_confidence, ConfidenceScore};
pub use engagement::{score_engagement, EngagementCounts};
pub use error::SignalError;
pub use features::{
    enrich_posts, FittedLexicon, LexicalFeatures, LexicalVectorizer, SentimentModel,
    SentimentReading,
};
pub use market::MarketAggregator;
pub use pipeline::{run_batch, score_item, score_items, BatchAnalysis};
pub use report::{
    build_report, MarketDirection, ReportMetadata, ReportSummary, RunReport, TagExtreme,
};
pub use tag::TagAggregator;
pub use types::{
    ConfidenceComponents, ConfidenceInterval, Consensus, EngagementBreakdown, EngagementSummary,
    ItemSignal, LabelShare, MarketAnalysis, MarketLabel, RiskIndicators, RiskLevel, ScoredItem,
    SentimentDistribution, SignalDistribution, SignalLabel, SignalStrength, TagAnalysis,
    TagRanking, TimeRange,
};
