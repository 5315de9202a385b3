//! Confidence scorer combining content quality, sentiment strength and
//! social proof.

use tagsignal_core::TopTerms;

use crate::math::clip_unit;
use crate::types::ConfidenceComponents;

/// Promotional vocabulary. Any hit cuts content quality to 30%.
pub(crate) const SPAM_TERMS: &[&str] = &[
    "join",
    "telegram",
    "dm",
    "subscribe",
    "link",
    "whatsapp",
    "channel",
    "click",
    "follow",
    "free",
];

/// Chart-analysis vocabulary. A hit boosts content quality by 30%.
pub(crate) const TECHNICAL_TERMS: &[&str] = &[
    "breakout",
    "breakdown",
    "support",
    "resistance",
    "target",
    "stop loss",
    "levels",
    "rsi",
    "macd",
    "analysis",
    "chart",
    "pattern",
];

const QUALITY_WEIGHT: f64 = 0.40;
const SENTIMENT_WEIGHT: f64 = 0.30;
const SOCIAL_WEIGHT: f64 = 0.30;

const SPAM_PENALTY: f64 = 0.3;
const TECHNICAL_BOOST: f64 = 1.3;
const DENSITY_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfidenceScore {
    pub confidence: f64,
    pub components: ConfidenceComponents,
}

/// Content quality from finance-term density and the item's top terms.
///
/// Spam terms take precedence over technical terms.
#[must_use]
pub fn content_quality(finance_term_density: f64, top_terms: &TopTerms) -> f64 {
    let quality = (clip_unit(finance_term_density) * DENSITY_SCALE).min(1.0);

    if top_terms.contains_any(SPAM_TERMS) {
        quality * SPAM_PENALTY
    } else if top_terms.contains_any(TECHNICAL_TERMS) {
        (quality * TECHNICAL_BOOST).min(1.0)
    } else {
        quality
    }
}

/// Score confidence in `[0, 1]` along with its three weighted inputs.
#[must_use]
pub fn score_confidence(
    finance_term_density: f64,
    top_terms: &TopTerms,
    sentiment_confidence: f64,
    virality_score: f64,
) -> ConfidenceScore {
    let components = ConfidenceComponents {
        content_quality: content_quality(finance_term_density, top_terms),
        sentiment_strength: clip_unit(sentiment_confidence),
        social_proof: clip_unit(virality_score),
    };

    let confidence = clip_unit(
        components.content_quality * QUALITY_WEIGHT
            + components.sentiment_strength * SENTIMENT_WEIGHT
            + components.social_proof * SOCIAL_WEIGHT,
    );

    ConfidenceScore {
        confidence,
        components,
    }
}

#[cfg(test)]
mod tests {
    use tagsignal_core::TermScore;

    use super::*;

    fn terms(words: &[&str]) -> TopTerms {
        TopTerms::new(words.iter().map(|w| TermScore::new(*w, 0.5)))
    }

    #[test]
    fn density_scales_and_saturates() {
        assert!((content_quality(0.05, &TopTerms::default()) - 0.5).abs() < 1e-12);
        assert_eq!(content_quality(0.2, &TopTerms::default()), 1.0);
    }

    #[test]
    fn spam_terms_penalize_quality() {
        let q = content_quality(0.05, &terms(&["nifty", "telegram"]));
        assert!((q - 0.15).abs() < 1e-12);
    }

    #[test]
    fn technical_terms_boost_quality() {
        let q = content_quality(0.05, &terms(&["breakout", "nifty"]));
        assert!((q - 0.65).abs() < 1e-12);
    }

    #[test]
    fn technical_boost_is_capped() {
        assert_eq!(content_quality(0.09, &terms(&["rsi"])), 1.0);
    }

    #[test]
    fn spam_wins_over_technical() {
        let q = content_quality(0.05, &terms(&["breakout", "join"]));
        assert!((q - 0.15).abs() < 1e-12);
    }

    #[test]
    fn multi_word_technical_term_matches() {
        let q = content_quality(0.05, &terms(&["Stop Loss"]));
        assert!((q - 0.65).abs() < 1e-12);
    }

    #[test]
    fn confidence_weights_components() {
        let score = score_confidence(0.05, &TopTerms::default(), 0.8, 0.6);
        // 0.5*0.4 + 0.8*0.3 + 0.6*0.3
        assert!((score.confidence - 0.62).abs() < 1e-12);
        assert!((score.components.content_quality - 0.5).abs() < 1e-12);
        assert!((score.components.sentiment_strength - 0.8).abs() < 1e-12);
        assert!((score.components.social_proof - 0.6).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_inputs_are_clipped() {
        let score = score_confidence(4.0, &TopTerms::default(), 1.5, -0.2);
        assert!((score.confidence - 0.7).abs() < 1e-12);
        assert_eq!(score.components.social_proof, 0.0);
    }

    #[test]
    fn empty_inputs_give_zero_confidence() {
        let score = score_confidence(0.0, &TopTerms::default(), 0.0, 0.0);
        assert_eq!(score.confidence, 0.0);
    }
}
