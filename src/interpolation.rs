//! Linear interpolation used by response curves.

/// Interpolate linearly between `(x0, y0)` and `(x1, y1)` at `target_x`.
///
/// Does not clamp, so values of `target_x` outside `[x0, x1]` extrapolate.
#[inline]
pub fn linear_interp(target_x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    debug_assert!((x1 - x0).abs() > ::std::f64::EPSILON);

    y0 + (target_x - x0) * (y1 - y0) / (x1 - x0)
}
