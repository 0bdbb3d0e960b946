//! Fitting metadata for the four response-model families.
//!
//! Purpose
//! -------
//! Keep everything the fitter needs to know *about* a family — parameter
//! bounds and data-driven initial guesses — separate from the prediction
//! rule itself (which lives on [`ModelKind`]). Bounds follow the classic
//! agronomic parameterizations; guesses are seeded from the observed series
//! so the simplex starts in the right basin.
//!
//! Conventions
//! -----------
//! - Every family has exactly three parameters; bounds are inclusive and
//!   the solver projects candidates into them before evaluation.
//! - The quadratic family is seeded by an ordinary-least-squares solve of
//!   the plain quadratic via 3×3 normal equations; a singular design
//!   (fewer than three distinct rates) falls back to a generic guess.
//! - Guesses are returned already projected into bounds; multiple guesses
//!   per family give the fitter cheap multi-start coverage.

use nalgebra::{Matrix3, Vector3};
use ndarray::Array1;

use crate::response::core::curve::ModelKind;

/// Inclusive per-parameter box bounds for one family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamBounds {
    pub lower: [f64; 3],
    pub upper: [f64; 3],
}

impl ParamBounds {
    /// Project a parameter vector into the bounds, coordinate-wise.
    pub fn project(&self, params: &Array1<f64>) -> Array1<f64> {
        Array1::from_iter(
            params
                .iter()
                .enumerate()
                .map(|(i, v)| v.clamp(self.lower[i], self.upper[i])),
        )
    }
}

/// Parameter bounds for a family, given the observed series.
///
/// Only the linear-plateau family is data-dependent: its breakpoint is
/// bounded by the maximum observed rate (a plateau beyond the data is not
/// identifiable).
pub fn bounds(kind: ModelKind, series: &[(f64, f64)]) -> ParamBounds {
    let max_rate = series.iter().map(|(r, _)| *r).fold(0.0, f64::max).max(1.0);
    match kind {
        ModelKind::MitscherlichBaule => ParamBounds {
            lower: [0.0, 0.0, 0.0],
            upper: [1000.0, 1000.0, 1000.0],
        },
        ModelKind::QuadraticPlateau => ParamBounds {
            lower: [0.0, 0.0, -10.0],
            upper: [1000.0, 100.0, 0.0],
        },
        ModelKind::LinearPlateau => ParamBounds {
            lower: [0.0, 0.0, 0.0],
            upper: [1000.0, 100.0, max_rate],
        },
        ModelKind::Exponential => ParamBounds {
            lower: [0.0, 0.0, 0.0],
            upper: [1000.0, 10.0, 1000.0],
        },
    }
}

/// Data-driven initial guesses for a family, projected into bounds.
///
/// Returns at least one guess per family; two where a second basin is
/// plausible (steep vs. shallow rate constants, early vs. late plateau).
pub fn initial_guesses(kind: ModelKind, series: &[(f64, f64)]) -> Vec<Array1<f64>> {
    let b = bounds(kind, series);
    let min_y = series.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let max_y = series.iter().map(|(_, y)| *y).fold(0.0, f64::max);
    let max_rate = series.iter().map(|(r, _)| *r).fold(0.0, f64::max).max(1.0);

    let raw: Vec<[f64; 3]> = match kind {
        ModelKind::MitscherlichBaule => vec![
            [max_y.max(1.0), 0.01, 1.0],
            [max_y.max(1.0) * 1.2, 0.05, 1.0],
        ],
        ModelKind::QuadraticPlateau => {
            let fallback = [min_y.max(0.0), 1.0, -0.01];
            match quadratic_ols_seed(series) {
                Some(seed) => vec![seed, fallback],
                None => vec![fallback],
            }
        }
        ModelKind::LinearPlateau => {
            let slope = if max_rate > 0.0 { ((max_y - min_y) / max_rate).max(0.0) } else { 0.0 };
            vec![
                [min_y.max(0.0), slope.max(0.1), 0.75 * max_rate],
                [min_y.max(0.0), slope.max(0.1), 0.5 * max_rate],
            ]
        }
        ModelKind::Exponential => vec![
            [(max_y - min_y).max(1.0), 0.02, min_y.max(0.0)],
            [(max_y - min_y).max(1.0), 0.08, min_y.max(0.0)],
        ],
    };

    raw.into_iter().map(|g| b.project(&Array1::from(g.to_vec()))).collect()
}

/// Ordinary-least-squares seed for the quadratic family.
///
/// Solves the 3×3 normal equations of `y = a + b·x + c·x²` directly.
/// Returns `None` when the design is singular (e.g. fewer than three
/// distinct rates), letting the caller fall back to a generic guess.
fn quadratic_ols_seed(series: &[(f64, f64)]) -> Option<[f64; 3]> {
    let n = series.len() as f64;
    let (mut sx, mut sx2, mut sx3, mut sx4) = (0.0, 0.0, 0.0, 0.0);
    let (mut sy, mut sxy, mut sx2y) = (0.0, 0.0, 0.0);
    for (x, y) in series {
        let x2 = x * x;
        sx += x;
        sx2 += x2;
        sx3 += x2 * x;
        sx4 += x2 * x2;
        sy += y;
        sxy += x * y;
        sx2y += x2 * y;
    }
    let design = Matrix3::new(n, sx, sx2, sx, sx2, sx3, sx2, sx3, sx4);
    let rhs = Vector3::new(sy, sxy, sx2y);
    let solution = design.lu().solve(&rhs)?;
    let seed = [solution[0], solution[1], solution[2]];
    if seed.iter().all(|v| v.is_finite()) { Some(seed) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover bound projection, the OLS quadratic seed on exactly
    // quadratic data, and the shape of the guess sets. Fit quality on real
    // series is exercised by the fitter tests.
    // -------------------------------------------------------------------------

    #[test]
    fn project_clamps_each_coordinate() {
        let b = ParamBounds { lower: [0.0, 0.0, -1.0], upper: [10.0, 5.0, 0.0] };
        let p = Array1::from(vec![-3.0, 7.0, -0.5]);

        let projected = b.project(&p);

        assert_eq!(projected.as_slice().unwrap(), &[0.0, 5.0, -0.5]);
    }

    #[test]
    fn quadratic_seed_recovers_exact_quadratic_coefficients() {
        // y = 100 + 2x − 0.01x², sampled without noise.
        let series: Vec<(f64, f64)> =
            [0.0, 40.0, 80.0, 120.0, 160.0]
                .iter()
                .map(|&x| (x, 100.0 + 2.0 * x - 0.01 * x * x))
                .collect();

        let seed = quadratic_ols_seed(&series).expect("well-posed design");

        assert!((seed[0] - 100.0).abs() < 1e-6);
        assert!((seed[1] - 2.0).abs() < 1e-8);
        assert!((seed[2] + 0.01).abs() < 1e-10);
    }

    #[test]
    fn degenerate_design_returns_no_seed() {
        // A single repeated rate makes the normal equations singular.
        let series = vec![(50.0, 100.0), (50.0, 110.0), (50.0, 120.0)];
        assert!(quadratic_ols_seed(&series).is_none());
    }

    #[test]
    fn guesses_respect_bounds_for_every_family() {
        let series = vec![(0.0, 120.0), (50.0, 150.0), (100.0, 180.0), (200.0, 210.0)];
        for kind in ModelKind::all() {
            let b = bounds(kind, &series);
            for guess in initial_guesses(kind, &series) {
                for (i, v) in guess.iter().enumerate() {
                    assert!(
                        (b.lower[i]..=b.upper[i]).contains(v),
                        "{kind}: guess coordinate {i} = {v} out of bounds"
                    );
                }
            }
        }
    }
}
