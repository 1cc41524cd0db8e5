//! small math helpers
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}

/// Generate `n` evenly spaced values across `[start, stop]` (both ends included).
///
/// For `n <= 1` a single value (`start`) is returned.
#[must_use]
pub fn evenly_spaced(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![start];
    }
    let step = (stop - start) / usize_to_f64(n - 1);
    (0..n).map(|i| start + usize_to_f64(i) * step).collect()
}
