//! Prediction bands around a fitted response curve.
//!
//! Purpose
//! -------
//! Produce t-distribution prediction intervals for a fitted curve: a
//! constant standard error `rmse·√(1 + 1/n)` scaled by the two-sided
//! Student-t quantile at `n − 1` degrees of freedom, evaluated at
//! [`CONFIDENCE_SAMPLES`] rates across the configured grid. Predicted
//! values and both bounds are clamped at zero — a reported band never dips
//! below zero yield.
//!
//! Conventions
//! -----------
//! - `confidence_level` is the two-sided coverage (e.g. 0.95); the quantile
//!   used is `t_{1 − (1−level)/2, n−1}`.
//! - Errors use the dedicated [`DiagnosticsError`] type, which also
//!   integrates with `anyhow::Error` via `From` for distribution-backend
//!   failures.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::economics::RateGrid;
use crate::response::core::curve::ResponseCurve;

/// Number of sample points in a prediction band.
pub const CONFIDENCE_SAMPLES: usize = 100;

/// Unified error type for diagnostic routines.
///
/// Covers degenerate sample sizes, invalid confidence levels, and generic
/// passthrough errors from the distribution backend.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticsError {
    /// At least two observations are needed for a t-quantile (df ≥ 1).
    TooFewObservations {
        n: usize,
    },

    /// Confidence level must lie strictly inside (0, 1).
    InvalidConfidenceLevel {
        value: f64,
    },

    // ---- Anyhow catchall ----
    Anyhow(String),
}

pub type DiagnosticsResult<T> = Result<T, DiagnosticsError>;

impl From<anyhow::Error> for DiagnosticsError {
    fn from(err: anyhow::Error) -> Self {
        DiagnosticsError::Anyhow(err.to_string())
    }
}

impl std::error::Error for DiagnosticsError {}

impl std::fmt::Display for DiagnosticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticsError::TooFewObservations { n } => {
                write!(f, "Diagnostics Error: {n} observations are too few for a prediction band")
            }
            DiagnosticsError::InvalidConfidenceLevel { value } => {
                write!(
                    f,
                    "Diagnostics Error: confidence level {value} must lie strictly inside (0, 1)"
                )
            }
            DiagnosticsError::Anyhow(msg) => write!(f, "Diagnostics Error: {msg}"),
        }
    }
}

/// One point of a prediction band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub rate: f64,
    pub predicted_yield: f64,
    pub lower: f64,
    pub upper: f64,
    pub margin: f64,
}

/// Compute the prediction band for a fitted curve.
///
/// # Arguments
/// - `curve`: the fitted curve; its `rmse` parameterizes the band width.
/// - `n_observations`: number of source observations behind the fit;
///   `n − 1` is the t-distribution's degrees of freedom.
/// - `confidence_level`: two-sided coverage in (0, 1).
/// - `grid`: supplies the rate range to sample (the band uses its own
///   fixed [`CONFIDENCE_SAMPLES`] resolution).
///
/// # Errors
/// - [`DiagnosticsError::TooFewObservations`] when `n_observations < 2`.
/// - [`DiagnosticsError::InvalidConfidenceLevel`] outside (0, 1).
pub fn intervals(
    curve: &ResponseCurve, n_observations: usize, confidence_level: f64, grid: &RateGrid,
) -> DiagnosticsResult<Vec<ConfidenceInterval>> {
    if n_observations < 2 {
        return Err(DiagnosticsError::TooFewObservations { n: n_observations });
    }
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(DiagnosticsError::InvalidConfidenceLevel { value: confidence_level });
    }

    let df = (n_observations - 1) as f64;
    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| DiagnosticsError::from(anyhow::anyhow!(e)))?;
    let upper_tail = 1.0 - (1.0 - confidence_level) / 2.0;
    let t_quantile = t_dist.inverse_cdf(upper_tail);

    let n = n_observations as f64;
    let std_error = curve.rmse * (1.0 + 1.0 / n).sqrt();
    let margin = t_quantile * std_error;

    let step = grid.max_rate / (CONFIDENCE_SAMPLES - 1) as f64;
    let band = (0..CONFIDENCE_SAMPLES)
        .map(|i| {
            let rate = step * i as f64;
            let predicted = curve.predict_clamped(rate);
            ConfidenceInterval {
                rate,
                predicted_yield: predicted,
                lower: (predicted - margin).max(0.0),
                upper: (predicted + margin).max(0.0),
                margin,
            }
        })
        .collect();
    Ok(band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::core::curve::ModelKind;
    use crate::response::core::data::Nutrient;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover band geometry (ordering, symmetry, clamping), the
    // widening effect of higher confidence levels, and input validation.
    // -------------------------------------------------------------------------

    fn test_curve(rmse: f64) -> ResponseCurve {
        ResponseCurve {
            nutrient: Nutrient::Nitrogen,
            kind: ModelKind::LinearPlateau,
            parameters: vec![120.0, 0.6, 150.0],
            r_squared: 0.95,
            rmse,
            mse: rmse * rmse,
            source_points: vec![(0.0, 120.0), (50.0, 150.0), (100.0, 180.0)],
            predicted_curve: Vec::new(),
        }
    }

    #[test]
    fn band_brackets_the_prediction_and_never_goes_negative() {
        let curve = test_curve(8.0);
        let grid = RateGrid::default();

        let band = intervals(&curve, 5, 0.95, &grid).expect("band should compute");

        assert_eq!(band.len(), CONFIDENCE_SAMPLES);
        for point in &band {
            assert!(point.lower >= 0.0);
            assert!(point.lower <= point.predicted_yield);
            assert!(point.predicted_yield <= point.upper);
            assert!(point.margin > 0.0);
        }
        // Constant margin: t · rmse · √(1 + 1/n) with n = 5, df = 4.
        let expected_se = 8.0 * (1.0 + 0.2_f64).sqrt();
        let ratio = band[0].margin / expected_se;
        // t quantile for 95% / df 4 is ≈ 2.776.
        assert!((ratio - 2.776).abs() < 0.01, "t quantile ≈ {ratio}");
    }

    #[test]
    fn higher_confidence_widens_the_band() {
        let curve = test_curve(5.0);
        let grid = RateGrid::default();

        let band_90 = intervals(&curve, 6, 0.90, &grid).unwrap();
        let band_99 = intervals(&curve, 6, 0.99, &grid).unwrap();

        assert!(band_99[0].margin > band_90[0].margin);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        let curve = test_curve(5.0);
        let grid = RateGrid::default();

        assert!(matches!(
            intervals(&curve, 1, 0.95, &grid),
            Err(DiagnosticsError::TooFewObservations { n: 1 })
        ));
        assert!(matches!(
            intervals(&curve, 5, 1.0, &grid),
            Err(DiagnosticsError::InvalidConfidenceLevel { .. })
        ));
        assert!(matches!(
            intervals(&curve, 5, 0.0, &grid),
            Err(DiagnosticsError::InvalidConfidenceLevel { .. })
        ));
    }
}
