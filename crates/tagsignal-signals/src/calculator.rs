//! Per-item directional signal, label and confidence interval.

use crate::math::{clip_signed, clip_unit};
use crate::types::{ConfidenceInterval, SignalLabel, SignalStrength};

/// Below this confidence an item is `IGNORE` whatever its signal.
pub const IGNORE_CONFIDENCE: f64 = 0.3;
/// Magnitude at or above which a signal is `STRONG_*`.
pub const STRONG_THRESHOLD: f64 = 0.5;
/// Magnitude above which a signal is directional.
pub const DIRECTIONAL_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignalOutcome {
    pub base_signal: f64,
    pub signal_score: f64,
    pub signal_label: SignalLabel,
    pub signal_strength: SignalStrength,
    pub confidence_interval: ConfidenceInterval,
}

/// Combine sentiment and virality into a confidence-dampened signal.
///
/// Virality scales sentiment by `0.5..=1.0`, so it amplifies but never flips
/// the direction. The interval half-width is `(1 - confidence) / 2`.
#[must_use]
pub fn calculate_signal(
    sentiment_score: f64,
    virality_score: f64,
    confidence: f64,
) -> SignalOutcome {
    let sentiment = clip_signed(sentiment_score);
    let virality = clip_unit(virality_score);
    let confidence = clip_unit(confidence);

    let base_signal = clip_signed(sentiment * (0.5 + virality * 0.5));
    let signal_score = clip_signed(base_signal * confidence);
    let (signal_label, signal_strength) = classify(signal_score, confidence);

    let width = (1.0 - confidence) * 0.5;
    let confidence_interval = ConfidenceInterval {
        lower: clip_signed(signal_score - width),
        upper: clip_signed(signal_score + width),
    };

    SignalOutcome {
        base_signal,
        signal_score,
        signal_label,
        signal_strength,
        confidence_interval,
    }
}

/// Map a signal and its confidence onto a label and strength.
#[must_use]
pub fn classify(signal: f64, confidence: f64) -> (SignalLabel, SignalStrength) {
    if confidence < IGNORE_CONFIDENCE {
        (SignalLabel::Ignore, SignalStrength::None)
    } else if signal.abs() < DIRECTIONAL_THRESHOLD {
        (SignalLabel::Hold, SignalStrength::Weak)
    } else if signal >= STRONG_THRESHOLD {
        (SignalLabel::StrongBuy, SignalStrength::Strong)
    } else if signal > DIRECTIONAL_THRESHOLD {
        (SignalLabel::Buy, SignalStrength::Moderate)
    } else if signal <= -STRONG_THRESHOLD {
        (SignalLabel::StrongSell, SignalStrength::Strong)
    } else if signal < -DIRECTIONAL_THRESHOLD {
        (SignalLabel::Sell, SignalStrength::Moderate)
    } else {
        (SignalLabel::Hold, SignalStrength::Weak)
    }
}
