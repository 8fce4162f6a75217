//! Shared statistics helpers for RSSI sample windows.
//!
//! These operate on small in-memory slices (a history ring at most), so the
//! simple two-pass formulations are fine; nothing here needs an online
//! algorithm.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance. Returns 0.0 for fewer than 2 samples.
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|v| (v - m).powi(2)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation. Returns 0.0 for fewer than 2 samples.
pub fn std_deviation(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Median of the samples. Returns 0.0 for an empty slice.
///
/// Even-length inputs return the mean of the two middle values.
pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Minimum value. Returns 0.0 for an empty slice.
pub fn min(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Maximum value. Returns 0.0 for an empty slice.
pub fn max(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
