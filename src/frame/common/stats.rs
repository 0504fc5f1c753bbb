//! Order statistics over pooled pixel values.

use crate::frame::common::error::{FrameError, Result};

/// Sorts in place with NaNs placed last.
pub fn sort_values(values: &mut [f64]) {
    values.sort_unstable_by(|a, b| a.total_cmp(b));
}

/// Smaller of two values; NaN if either is NaN.
pub fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Larger of two values; NaN if either is NaN.
pub fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Median of already sorted values, averaging the two central values when
/// the count is even.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some(0.5 * (sorted[mid - 1] + sorted[mid]))
    }
}

/// Linearly interpolated percentile of sorted values, `pcent` in [0, 100].
pub fn percentile_sorted(sorted: &[f64], pcent: f64) -> Result<Option<f64>> {
    if !(0.0..=100.0).contains(&pcent) {
        return Err(FrameError::InvalidPercentile(pcent));
    }
    let n = sorted.len();
    if n == 0 {
        return Ok(None);
    }
    let rank = pcent / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    if lo == hi {
        return Ok(Some(sorted[lo]));
    }
    Ok(Some(sorted[lo] + frac * (sorted[hi] - sorted[lo])))
}
