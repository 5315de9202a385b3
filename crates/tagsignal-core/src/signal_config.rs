//! Weights and thresholds consumed by the scoring and aggregation stages.
//!
//! Every field has a default, so a YAML file only needs to name what it
//! changes:
//!
//! ```yaml
//! tags:
//!   min_item_count: 5
//! market:
//!   min_confidence: 0.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::items::MAX_TOP_TERMS;
use crate::ConfigError;

/// Relative weights of the four normalized engagement components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementWeights {
    /// Weight of engagement per thousand views.
    pub engagement_weight: f64,
    /// Weight of the retweet-to-like ratio.
    pub retweet_weight: f64,
    /// Weight of the reply share of total engagement.
    pub reply_weight: f64,
    /// Weight of likes per view.
    pub like_weight: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            engagement_weight: 0.3,
            retweet_weight: 0.5,
            reply_weight: 0.3,
            like_weight: 0.2,
        }
    }
}

impl EngagementWeights {
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.engagement_weight + self.retweet_weight + self.reply_weight + self.like_weight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagAggregationConfig {
    /// Tags with fewer (item, tag) rows than this emit no analysis.
    pub min_item_count: usize,
    /// Rows below this confidence are excluded from the composite signal.
    pub min_confidence: f64,
    /// Number of trending terms kept per tag.
    pub trending_terms_limit: usize,
}

impl Default for TagAggregationConfig {
    fn default() -> Self {
        Self {
            min_item_count: 20,
            min_confidence: 0.3,
            trending_terms_limit: MAX_TOP_TERMS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketAggregationConfig {
    /// Aggregate confidence below this labels the market `HOLD`.
    pub min_confidence: f64,
}

impl Default for MarketAggregationConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub engagement: EngagementWeights,
    pub tags: TagAggregationConfig,
    pub market: MarketAggregationConfig,
}

impl SignalConfig {
    /// Check that weights and thresholds are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSignalConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("engagement.engagement_weight", self.engagement.engagement_weight),
            ("engagement.retweet_weight", self.engagement.retweet_weight),
            ("engagement.reply_weight", self.engagement.reply_weight),
            ("engagement.like_weight", self.engagement.like_weight),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("must be a finite value >= 0, got {value}")));
            }
        }
        if self.engagement.sum() <= 0.0 {
            return Err(invalid("engagement", "weights must not all be zero".to_string()));
        }

        check_unit("tags.min_confidence", self.tags.min_confidence)?;
        check_unit("market.min_confidence", self.market.min_confidence)?;

        if self.tags.trending_terms_limit == 0 || self.tags.trending_terms_limit > MAX_TOP_TERMS {
            return Err(invalid(
                "tags.trending_terms_limit",
                format!(
                    "must be between 1 and {MAX_TOP_TERMS}, got {}",
                    self.tags.trending_terms_limit
                ),
            ));
        }

        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

fn invalid(field: &str, reason: String) -> ConfigError {
    ConfigError::InvalidSignalConfig {
        field: field.to_string(),
        reason,
    }
}

/// Load and validate a [`SignalConfig`] from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_signal_config(path: &Path) -> Result<SignalConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SignalConfigIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: SignalConfig = serde_yaml::from_str(&content)?;
    config.validate()?;

    Ok(config)
}
