//! Request-level data-quality checks applied before fitting.
//!
//! Purpose
//! -------
//! Centralize the reusable observation-series checks that flag weak inputs
//! *before* any curve is fitted: short series, limited yield variation,
//! agronomically extreme rates, too few distinct rate levels, and a high
//! share of IQR-fence yield outliers. The checks never fail a request on
//! their own — they produce a structured report that the analysis layer
//! attaches to its response so degradation stays visible.
//!
//! Conventions
//! -----------
//! - `issues` are conditions that make a fit unreliable enough that the
//!   report's `is_acceptable` flag goes false; `warnings` are advisory.
//! - Quartiles use linear interpolation between order statistics; the
//!   outlier fences are the usual `q1 − 1.5·IQR` / `q3 + 1.5·IQR`.

use crate::response::core::data::{MIN_OBSERVATIONS, Nutrient};

/// Yield spread below this is flagged as limited variation.
pub const MIN_YIELD_SPREAD: f64 = 10.0;

/// Application rates above this are flagged as agronomically extreme.
pub const EXTREME_RATE: f64 = 500.0;

/// Minimum count of distinct rate levels for a meaningful response shape.
pub const MIN_DISTINCT_RATES: usize = 3;

/// Outlier share (fraction of points) above which a warning is raised.
pub const MAX_OUTLIER_SHARE: f64 = 0.2;

/// Structured outcome of the pre-fit checks for one nutrient series.
#[derive(Debug, Clone, PartialEq)]
pub struct DataQualityReport {
    pub nutrient: Nutrient,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub outlier_count: usize,
    pub distinct_rates: usize,
}

impl DataQualityReport {
    /// True when no hard issues were found (warnings may still be present).
    pub fn is_acceptable(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Run all pre-fit checks on one nutrient's `(rate, yield)` series.
pub fn assess_series(nutrient: Nutrient, series: &[(f64, f64)]) -> DataQualityReport {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    if series.len() < MIN_OBSERVATIONS {
        issues.push(format!(
            "{nutrient}: only {} observations, at least {MIN_OBSERVATIONS} required",
            series.len()
        ));
    }

    let yields: Vec<f64> = series.iter().map(|(_, y)| *y).collect();
    let rates: Vec<f64> = series.iter().map(|(r, _)| *r).collect();

    if let (Some(min_y), Some(max_y)) = (min_of(&yields), max_of(&yields)) {
        if max_y - min_y < MIN_YIELD_SPREAD {
            warnings.push(format!(
                "{nutrient}: limited yield variation ({:.1} units spread)",
                max_y - min_y
            ));
        }
    }

    if rates.iter().any(|r| *r > EXTREME_RATE) {
        warnings.push(format!(
            "{nutrient}: application rates above {EXTREME_RATE} observed, verify units"
        ));
    }

    let distinct_rates = count_distinct(&rates);
    if !rates.is_empty() && distinct_rates < MIN_DISTINCT_RATES {
        warnings.push(format!(
            "{nutrient}: only {distinct_rates} distinct rate levels, response shape is weakly identified"
        ));
    }

    let outlier_count = iqr_outlier_count(&yields);
    if !yields.is_empty()
        && (outlier_count as f64) > MAX_OUTLIER_SHARE * yields.len() as f64
    {
        warnings.push(format!(
            "{nutrient}: {outlier_count} of {} yields fall outside the 1.5-IQR fences",
            yields.len()
        ));
    }

    DataQualityReport { nutrient, issues, warnings, outlier_count, distinct_rates }
}

/// Count yields outside the `[q1 − 1.5·IQR, q3 + 1.5·IQR]` fences.
fn iqr_outlier_count(values: &[f64]) -> usize {
    if values.len() < 4 {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("yields validated finite"));
    let q1 = percentile(&sorted, 0.25);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lo = q1 - 1.5 * iqr;
    let hi = q3 + 1.5 * iqr;
    values.iter().filter(|v| **v < lo || **v > hi).count()
}

/// Linear-interpolation percentile of an ascending-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = p * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = idx - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

fn count_distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("rates validated finite"));
    sorted.dedup();
    sorted.len()
}

fn min_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
