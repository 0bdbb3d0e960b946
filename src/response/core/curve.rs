//! Fitted response-curve value types and their deterministic predictions.
//!
//! Purpose
//! -------
//! Define the four response-model families ([`ModelKind`]), the immutable
//! fitted-curve value type ([`ResponseCurve`]), and the prediction rule that
//! maps `(kind, parameters, rate)` to a yield. A curve is created once per
//! nutrient per analysis and never mutated; a new analysis produces a new
//! curve.
//!
//! Key behaviors
//! -------------
//! - Evaluate each model family at an arbitrary rate via
//!   [`ModelKind::predict`].
//! - Sample the fitted curve over `[0, 1.2 × max observed rate]` at
//!   [`CURVE_SAMPLES`] points, clamping predictions at zero, so serialized
//!   reports carry a plot-ready trace.
//!
//! Invariants & assumptions
//! ------------------------
//! - `kind` and `parameters` jointly reproduce `predicted_curve`
//!   deterministically: re-sampling a curve yields identical points.
//! - `r_squared ∈ [0, 1]`; `rmse` and `mse` are non-negative.
//! - Sampled predictions are clamped at zero — a reported curve never dips
//!   below zero yield even where the raw polynomial would.
//!
//! Conventions
//! -----------
//! - Parameter vectors are ordered exactly as documented per family:
//!   Mitscherlich–Baule `[A, b, c]`, quadratic plateau `[a, b, c]`, linear
//!   plateau `[a, b, x_p]`, exponential `[a, b, c]`.
//! - The quadratic-plateau family caps at its vertex value only when the
//!   curvature is negative; a non-concave fit degrades to the plain
//!   quadratic.

use crate::response::core::data::Nutrient;

/// Number of sample points in a reported [`ResponseCurve::predicted_curve`].
pub const CURVE_SAMPLES: usize = 100;

/// Sampling extends this factor beyond the maximum observed rate.
pub const CURVE_RANGE_FACTOR: f64 = 1.2;

/// The four candidate response-model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelKind {
    /// `y = A·(1 − e^(−b·(x + c)))` — classic diminishing returns,
    /// asymptotic to `A`.
    MitscherlichBaule,
    /// `y = a + b·x + c·x²`, capped at the vertex value past `−b/(2c)`.
    QuadraticPlateau,
    /// `y = a + b·min(x, x_p)` — linear rise, flat plateau; `x_p` is fitted.
    LinearPlateau,
    /// `y = a·(1 − e^(−b·x)) + c` — fast initial rise with vertical offset.
    Exponential,
}

impl ModelKind {
    /// All families, in the fixed order the fitter attempts them.
    pub fn all() -> [ModelKind; 4] {
        [
            ModelKind::MitscherlichBaule,
            ModelKind::QuadraticPlateau,
            ModelKind::LinearPlateau,
            ModelKind::Exponential,
        ]
    }

    /// Number of fitted parameters for this family.
    pub fn param_count(&self) -> usize {
        3
    }

    /// Snake-case name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::MitscherlichBaule => "mitscherlich_baule",
            ModelKind::QuadraticPlateau => "quadratic_plateau",
            ModelKind::LinearPlateau => "linear_plateau",
            ModelKind::Exponential => "exponential",
        }
    }

    /// Evaluate the family at rate `x` with the given parameter vector.
    ///
    /// The prediction is the raw model value; negative values are possible
    /// for some parameter combinations and are clamped only where results
    /// are *reported* (sampled curves, confidence bands, optimizer yields).
    pub fn predict(&self, params: &[f64], x: f64) -> f64 {
        match self {
            ModelKind::MitscherlichBaule => {
                let (cap, rate_const, shift) = (params[0], params[1], params[2]);
                cap * (1.0 - (-rate_const * (x + shift)).exp())
            }
            ModelKind::QuadraticPlateau => {
                let (a, b, c) = (params[0], params[1], params[2]);
                if c < 0.0 {
                    let vertex = -b / (2.0 * c);
                    let x_eff = x.min(vertex);
                    a + b * x_eff + c * x_eff * x_eff
                } else {
                    a + b * x + c * x * x
                }
            }
            ModelKind::LinearPlateau => {
                let (a, b, x_p) = (params[0], params[1], params[2]);
                a + b * x.min(x_p)
            }
            ModelKind::Exponential => {
                let (a, b, c) = (params[0], params[1], params[2]);
                a * (1.0 - (-b * x).exp()) + c
            }
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable fitted response curve for one nutrient.
///
/// Fields
/// ------
/// - `nutrient`: the nutrient this curve models.
/// - `kind` / `parameters`: the selected family and its fitted parameters.
/// - `r_squared`, `rmse`, `mse`: fit quality on the source points.
/// - `source_points`: the `(rate, yield)` observations the fit used.
/// - `predicted_curve`: [`CURVE_SAMPLES`] `(rate, yield)` samples over
///   `[0, 1.2 × max observed rate]`, clamped at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCurve {
    pub nutrient: Nutrient,
    pub kind: ModelKind,
    pub parameters: Vec<f64>,
    pub r_squared: f64,
    pub rmse: f64,
    pub mse: f64,
    pub source_points: Vec<(f64, f64)>,
    pub predicted_curve: Vec<(f64, f64)>,
}

impl ResponseCurve {
    /// Predict the yield at an arbitrary rate from the fitted parameters.
    pub fn predict(&self, rate: f64) -> f64 {
        self.kind.predict(&self.parameters, rate)
    }

    /// Predict the yield at `rate`, clamped at zero for reporting paths.
    pub fn predict_clamped(&self, rate: f64) -> f64 {
        self.predict(rate).max(0.0)
    }

    /// Largest observed rate among the source points.
    pub fn max_observed_rate(&self) -> f64 {
        self.source_points.iter().map(|(r, _)| *r).fold(0.0, f64::max)
    }

    /// Sample `(rate, max(0, predict(rate)))` pairs over
    /// `[0, CURVE_RANGE_FACTOR × max observed rate]`.
    ///
    /// Used at construction time to populate `predicted_curve`; re-invoking
    /// it reproduces the stored trace exactly.
    pub fn sample_curve(kind: ModelKind, params: &[f64], max_rate: f64) -> Vec<(f64, f64)> {
        let upper = CURVE_RANGE_FACTOR * max_rate;
        let step = if CURVE_SAMPLES > 1 { upper / (CURVE_SAMPLES - 1) as f64 } else { 0.0 };
        (0..CURVE_SAMPLES)
            .map(|i| {
                let x = step * i as f64;
                (x, kind.predict(params, x).max(0.0))
            })
            .collect()
    }
}
