//! Shared data model and configuration for the tag signal pipeline.
//!
//! Items arrive here already enriched by the sentiment and lexical
//! collaborators; the scoring and aggregation logic lives in
//! `tagsignal-signals`.

pub mod app_config;
pub mod config;
pub mod items;
pub mod signal_config;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, resolve_signal_config};
pub use items::{normalize_tag, Item, RawPost, TermScore, TopTerms, MAX_TOP_TERMS};
pub use signal_config::{
    load_signal_config, EngagementWeights, MarketAggregationConfig, SignalConfig,
    TagAggregationConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read signal config {path}: {source}")]
    SignalConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse signal config: {0}")]
    SignalConfigParse(#[from] serde_yaml::Error),

    #[error("invalid signal config field {field}: {reason}")]
    InvalidSignalConfig { field: String, reason: String },
}
