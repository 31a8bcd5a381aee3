//! Small numeric helpers shared by the scoring routines.

/// Lower bound of every risk score.
pub const MIN_SCORE: f64 = 0.0;
/// Upper bound of every risk score.
pub const MAX_SCORE: f64 = 100.0;

/// Clamp a raw score into `[MIN_SCORE, MAX_SCORE]`.
#[inline]
pub(crate) fn clamp_score(raw: f64) -> f64 {
    debug_assert!(raw.is_finite());
    raw.max(MIN_SCORE).min(MAX_SCORE)
}

/// True if `val` is finite and lies within the closed interval `[low, high]`.
#[inline]
pub(crate) fn in_closed_range(val: f64, low: f64, high: f64) -> bool {
    val.is_finite() && val >= low && val <= high
}

/// Arithmetic mean of a non-empty iterator, `None` if it is empty.
pub(crate) fn mean<I: IntoIterator<Item = f64>>(vals: I) -> Option<f64> {
    let (sum, count) = vals
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), val| (sum + val, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
