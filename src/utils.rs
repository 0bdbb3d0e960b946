//! Small shared scalar statistics used across the crate.
//!
//! These helpers operate on plain `&[f64]` slices and assume the caller has
//! already validated finiteness and length at the module boundary; they do
//! not re-check. Population (biased) variance is used throughout, matching
//! the convention of the yield-spread and RMSE-vs-σ diagnostics.

/// Arithmetic mean of a slice. Returns 0.0 for an empty slice.
#[inline]
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance around the sample mean. Returns 0.0 for slices with
/// fewer than two elements.
#[inline]
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|v| (v - m).powi(2)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation. Returns 0.0 for slices with fewer than two
/// elements.
#[inline]
pub fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Pearson correlation coefficient between two equal-length series.
///
/// Returns 0.0 when either series is degenerate (fewer than two points or
/// zero variance), so callers can treat "no signal" and "no data" uniformly.
#[inline]
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}
