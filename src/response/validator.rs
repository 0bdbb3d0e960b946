//! Fit-quality scoring for fitted response curves.
//!
//! Scores a curve against the observations it was fitted on (or any other
//! series) and produces a structured validation: hard issues, advisory
//! warnings, the standard error metrics, and a single blended quality score
//! `0.6·R² + 0.4·(1 − rmse/σ)` clamped to `[0, 1]`. A zero-variance series
//! contributes nothing through the RMSE term rather than dividing by zero.

use crate::response::core::curve::ResponseCurve;
use crate::response::core::metrics::{mae, mse, r_squared, rmse};
use crate::utils::std_dev;

/// R² below this is a hard issue.
pub const R2_ISSUE_THRESHOLD: f64 = 0.5;

/// R² below this (but above the issue threshold) is a warning.
pub const R2_WARNING_THRESHOLD: f64 = 0.7;

/// The standard goodness-of-fit metrics, computed fresh from the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitMetrics {
    pub r_squared: f64,
    pub rmse: f64,
    pub mae: f64,
    pub mse: f64,
}

/// Structured outcome of validating one fitted curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelValidation {
    pub is_valid: bool,
    pub quality_score: f64,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub metrics: FitMetrics,
}

/// Validate a curve against its own source points.
pub fn validate_curve(curve: &ResponseCurve) -> ModelValidation {
    validate_against(curve, &curve.source_points)
}

/// Validate a curve against an arbitrary `(rate, yield)` series.
///
/// Rules:
/// - R² < 0.5 ⇒ issue; R² ∈ [0.5, 0.7) ⇒ warning.
/// - RMSE greater than the standard deviation of the actual yields ⇒
///   warning (the fit explains less than a mean-only model would).
pub fn validate_against(curve: &ResponseCurve, series: &[(f64, f64)]) -> ModelValidation {
    let actual: Vec<f64> = series.iter().map(|(_, y)| *y).collect();
    let predicted: Vec<f64> = series.iter().map(|(x, _)| curve.predict(*x)).collect();

    let metrics = FitMetrics {
        r_squared: r_squared(&actual, &predicted),
        rmse: rmse(&actual, &predicted),
        mae: mae(&actual, &predicted),
        mse: mse(&actual, &predicted),
    };

    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    if metrics.r_squared < R2_ISSUE_THRESHOLD {
        issues.push(format!(
            "{}: R² = {:.3} explains less than half the yield variance",
            curve.nutrient, metrics.r_squared
        ));
    } else if metrics.r_squared < R2_WARNING_THRESHOLD {
        warnings.push(format!(
            "{}: moderate fit quality (R² = {:.3})",
            curve.nutrient, metrics.r_squared
        ));
    }

    let sigma = std_dev(&actual);
    if sigma > 0.0 && metrics.rmse > sigma {
        warnings.push(format!(
            "{}: RMSE {:.2} exceeds the yield standard deviation {:.2}",
            curve.nutrient, metrics.rmse, sigma
        ));
    }

    let rmse_term = if sigma > 0.0 { 1.0 - metrics.rmse / sigma } else { 0.0 };
    let quality_score = (0.6 * metrics.r_squared + 0.4 * rmse_term).clamp(0.0, 1.0);

    ModelValidation { is_valid: issues.is_empty(), quality_score, issues, warnings, metrics }
}
