//! Numerically stable primitives for log-domain scoring.

/// Stable log(sum(exp(values))).
///
/// Returns NEG_INFINITY for empty input or all -inf inputs.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NEG_INFINITY;
    }
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    let mut sum = 0.0;
    for v in values {
        sum += (*v - max).exp();
    }
    max + sum.ln()
}

/// Tempered softmax expressed in percent.
///
/// `out[i] = 100 * exp(s_i / t) / sum_j exp(s_j / t)`, with every exponent
/// shifted by the largest scaled score so large scores cannot overflow or
/// cancel. Output order matches input order.
///
/// Returns all zeros when the distribution is undefined (non-positive or
/// non-finite temperature, NaN scores, or every score at -inf).
pub fn softmax_percent(scores: &[f64], temperature: f64) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    if !(temperature.is_finite() && temperature > 0.0) {
        return vec![0.0; scores.len()];
    }
    let scaled: Vec<f64> = scores.iter().map(|s| s / temperature).collect();
    if scaled.iter().any(|z| z.is_nan()) {
        return vec![0.0; scores.len()];
    }
    let max = scaled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![0.0; scores.len()];
    }
    let weights: Vec<f64> = scaled.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| 100.0 * w / sum).collect()
}
