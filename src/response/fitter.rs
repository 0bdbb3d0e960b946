//! response::fitter — nonlinear response-curve fitting and model selection.
//!
//! Purpose
//! -------
//! Fit all four response-model families to one nutrient's `(rate, yield)`
//! series by bounded nonlinear least squares and select the family with the
//! highest coefficient of determination. This is the entry point that turns
//! raw historical observations into the immutable [`ResponseCurve`] consumed
//! by the economics, validation, confidence, and goal-optimization layers.
//!
//! Key behaviors
//! -------------
//! - Extract and validate the per-nutrient series (≥ 3 points, finite,
//!   non-negative) before any numerical work.
//! - For each family, minimize the sum of squared residuals with the
//!   bounded Nelder–Mead backend, multi-started from the family's
//!   data-driven initial guesses.
//! - Score each successful fit by clamped R², keep every attempt for the
//!   model-comparison report, and select the best family.
//! - Surface `FitError::AllModelsFailed` only when every family fails;
//!   a single family failing is recorded in the attempt list and skipped.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fitting is deterministic: a fixed observation set always selects the
//!   same family and reproduces the same parameters, because the simplex
//!   backend is deterministic and guesses depend only on the data.
//! - The selected curve's `r_squared ∈ [0, 1]` and its sampled trace is
//!   non-negative.
//! - Ties in R² resolve to the earlier family in [`ModelKind::all`] order.
//!
//! Downstream usage
//! ----------------
//! - `analysis::analyze` calls [`fit`] once per observed nutrient and
//!   aggregates the per-family attempts into its model-comparison table.
//! - `optimization::goal` consumes the fitted curves (or externally
//!   supplied ones) through the same [`ResponseCurve`] abstraction.
//!
//! Testing notes
//! -------------
//! - Unit tests fit synthetic series generated from each family and assert
//!   the recovered curve predicts well (high R²) rather than asserting
//!   exact parameter recovery, which bounded least squares does not
//!   guarantee for correlated parameterizations.

use ndarray::Array1;

use crate::optimization::solvers::{BoxBounds, SolverOptions, nelder_mead::minimize_simplex};
use crate::response::core::curve::{ModelKind, ResponseCurve};
use crate::response::core::data::{NutrientObservation, Nutrient, extract_series};
use crate::response::core::metrics::{mse, r_squared, rmse};
use crate::response::errors::{FitError, FitResult};
use crate::response::models::{bounds, initial_guesses};

/// Configuration for one fitting run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitOptions {
    pub solver: SolverOptions,
}

/// One family's fitting attempt, kept for the model-comparison report.
///
/// `r_squared` is `None` when the family failed to fit at every initial
/// guess.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAttempt {
    pub kind: ModelKind,
    pub r_squared: Option<f64>,
}

/// Outcome of a fitting run: the selected curve plus every attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub curve: ResponseCurve,
    pub attempts: Vec<ModelAttempt>,
}

/// Fit a response curve for one nutrient from raw observations.
///
/// Extracts the `(rate, yield)` series for `nutrient` (observations without
/// a rate for it are ignored), validates the hard preconditions, and
/// delegates to [`fit_series`].
///
/// # Errors
/// - [`FitError::InsufficientData`] when fewer than 3 observations carry a
///   rate for `nutrient`.
/// - [`FitError::NonFiniteObservation`] / [`FitError::NegativeObservation`]
///   for invalid values.
/// - [`FitError::AllModelsFailed`] when no family produces a fit.
pub fn fit(
    nutrient: Nutrient, observations: &[NutrientObservation], options: &FitOptions,
) -> FitResult<FitReport> {
    let series = extract_series(observations, nutrient)?;
    fit_series(nutrient, &series, options)
}

/// Fit a response curve from an already-extracted series.
///
/// The series must satisfy the preconditions enforced by
/// [`extract_series`]; this function re-checks only the length so that
/// callers constructing series directly still get a structured error.
pub fn fit_series(
    nutrient: Nutrient, series: &[(f64, f64)], options: &FitOptions,
) -> FitResult<FitReport> {
    if series.len() < crate::response::core::data::MIN_OBSERVATIONS {
        return Err(FitError::InsufficientData {
            nutrient,
            needed: crate::response::core::data::MIN_OBSERVATIONS,
            actual: series.len(),
        });
    }

    let actual: Vec<f64> = series.iter().map(|(_, y)| *y).collect();
    let max_rate = series.iter().map(|(r, _)| *r).fold(0.0, f64::max);

    let mut attempts = Vec::with_capacity(4);
    let mut best: Option<(ModelKind, Array1<f64>, f64, f64)> = None;

    for kind in ModelKind::all() {
        match fit_family(kind, series, options) {
            Some(params) => {
                let p = params.as_slice().expect("contiguous parameter vector");
                let predicted: Vec<f64> =
                    series.iter().map(|(x, _)| kind.predict(p, *x)).collect();
                let r2 = r_squared(&actual, &predicted);
                let err = rmse(&actual, &predicted);
                attempts.push(ModelAttempt { kind, r_squared: Some(r2) });
                // Highest R² wins; exact ties (e.g. the constant-yield floor
                // at 0) resolve to the lower-RMSE family.
                let replace = match &best {
                    Some((_, _, best_r2, best_err)) => {
                        r2 > *best_r2 || (r2 == *best_r2 && err < *best_err)
                    }
                    None => true,
                };
                if replace {
                    best = Some((kind, params, r2, err));
                }
            }
            None => attempts.push(ModelAttempt { kind, r_squared: None }),
        }
    }

    let (kind, params, r2, _) = best.ok_or(FitError::AllModelsFailed { nutrient })?;
    let params_slice = params.as_slice().expect("contiguous parameter vector").to_vec();
    let predicted: Vec<f64> =
        series.iter().map(|(x, _)| kind.predict(&params_slice, *x)).collect();

    let curve = ResponseCurve {
        nutrient,
        kind,
        parameters: params_slice.clone(),
        r_squared: r2,
        rmse: rmse(&actual, &predicted),
        mse: mse(&actual, &predicted),
        source_points: series.to_vec(),
        predicted_curve: ResponseCurve::sample_curve(kind, &params_slice, max_rate),
    };
    Ok(FitReport { curve, attempts })
}

/// Least-squares fit of one family: multi-start bounded Nelder–Mead on the
/// sum of squared residuals. Returns the best parameter vector found, or
/// `None` when every start fails.
fn fit_family(
    kind: ModelKind, series: &[(f64, f64)], options: &FitOptions,
) -> Option<Array1<f64>> {
    let family_bounds = bounds(kind, series);
    let box_bounds = BoxBounds::new(&[
        (family_bounds.lower[0], family_bounds.upper[0]),
        (family_bounds.lower[1], family_bounds.upper[1]),
        (family_bounds.lower[2], family_bounds.upper[2]),
    ]);
    let sse = |params: &Array1<f64>| -> f64 {
        let p = params.as_slice().expect("contiguous parameter vector");
        series.iter().map(|(x, y)| (y - kind.predict(p, *x)).powi(2)).sum()
    };

    let mut best: Option<(Array1<f64>, f64)> = None;
    for guess in initial_guesses(kind, series) {
        let outcome = match minimize_simplex(&sse, &guess, &box_bounds, &options.solver) {
            Ok(outcome) => outcome,
            Err(_) => continue,
        };
        let replace = match &best {
            Some((_, best_value)) => outcome.value < *best_value,
            None => true,
        };
        if replace {
            best = Some((outcome.x, outcome.value));
        }
    }
    best.map(|(params, _)| params)
}
