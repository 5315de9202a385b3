//! Total numeric helpers shared by the scorers and aggregators.
//!
//! Every function here is defined for all inputs: NaN collapses to 0 and
//! empty or zero-weight denominators yield 0.

/// Clip to `[0, 1]`.
pub(crate) fn clip_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Clip to `[-1, 1]`.
pub(crate) fn clip_signed(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(-1.0, 1.0)
    }
}

/// `num / den`, or 0 when `den` is zero.
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn count_ratio(num: usize, den: usize) -> f64 {
    ratio(num as f64, den as f64)
}

/// Mean from a running `sum` over `n` values; 0 when `n` is 0.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean_of(sum: f64, n: usize) -> f64 {
    ratio(sum, n as f64)
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0_usize), |(s, n), v| (s + v, n + 1));
    ratio(sum, n as f64)
}

/// Weighted mean of `(value, weight)` pairs; 0 when the weights sum to 0.
pub(crate) fn weighted_mean(pairs: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let (num, den) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(num, den), (v, w)| (num + v * w, den + w));
    ratio(num, den)
}

/// Population standard deviation (divides by `n`).
#[allow(clippy::cast_precision_loss)]
pub(crate) fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values.iter().copied());
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
