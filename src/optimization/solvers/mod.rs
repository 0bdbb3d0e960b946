//! solvers — shared numeric types and the three search backends.
//!
//! Purpose
//! -------
//! Centralize the decision-vector type, box bounds, solver options, and the
//! common [`SolverOutcome`] shape so the goal-optimization methods and the
//! curve fitter can stay agnostic of the backend in use. Three backends are
//! provided:
//! - [`nelder_mead`]: bounded derivative-free simplex minimization (argmin),
//! - [`lbfgs`]: gradient-based minimization with finite-difference
//!   gradients (argmin L-BFGS + More–Thuente line search),
//! - [`differential_evolution`]: seeded global population search.
//!
//! Invariants & assumptions
//! ------------------------
//! - All decision vectors are `ndarray::Array1<f64>`.
//! - Bounds are enforced by projection inside the objective wrappers, so
//!   the backends themselves remain unconstrained minimizers.
//! - Objectives are plain `Fn(&Point) -> f64` closures; non-finite values
//!   surface as [`OptError::NonFiniteCost`](crate::optimization::errors::OptError).
//!
//! Conventions
//! -----------
//! - Every backend *minimizes*; callers negate for maximization.
//! - `SolverOutcome::converged` is `false` only when the backend stopped
//!   without a terminating status; callers decide whether to fall back and
//!   must surface a warning when they do.

pub mod differential_evolution;
pub mod lbfgs;
pub mod nelder_mead;

use ndarray::Array1;

use crate::optimization::errors::{OptError, OptResult};

/// Decision/parameter vector used by every backend.
pub type Point = Array1<f64>;

/// Default iteration cap shared by the iterative backends.
pub const DEFAULT_MAX_ITERS: u64 = 300;

/// Default simplex standard-deviation tolerance.
pub const DEFAULT_SD_TOLERANCE: f64 = 1e-8;

/// Inclusive box bounds over a decision vector.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxBounds {
    pub lower: Point,
    pub upper: Point,
}

impl BoxBounds {
    /// Build bounds from per-coordinate `(lower, upper)` pairs.
    pub fn new(pairs: &[(f64, f64)]) -> Self {
        Self {
            lower: Array1::from_iter(pairs.iter().map(|(lo, _)| *lo)),
            upper: Array1::from_iter(pairs.iter().map(|(_, hi)| *hi)),
        }
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Project a point into the box, coordinate-wise.
    pub fn project(&self, point: &Point) -> Point {
        Array1::from_iter(
            point
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .map(|(v, (lo, hi))| v.clamp(*lo, *hi)),
        )
    }

    /// Width of the box in each coordinate.
    pub fn span(&self) -> Point {
        &self.upper - &self.lower
    }
}

/// Backend-agnostic solver configuration.
///
/// - `max_iters`: hard cap on iterations/generations.
/// - `sd_tolerance`: simplex spread tolerance (Nelder–Mead only).
/// - `verbose`: if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints an init line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub max_iters: u64,
    pub sd_tolerance: f64,
    pub verbose: bool,
}

impl SolverOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - `OptError::InvalidMaxIter` if `max_iters == 0`.
    pub fn new(max_iters: u64, sd_tolerance: f64, verbose: bool) -> OptResult<Self> {
        if max_iters == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { max_iters, sd_tolerance, verbose })
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { max_iters: DEFAULT_MAX_ITERS, sd_tolerance: DEFAULT_SD_TOLERANCE, verbose: false }
    }
}

/// Canonical result returned by every backend.
///
/// - `x`: best (already bound-projected) point found.
/// - `value`: objective value at `x`.
/// - `converged`: `true` if the backend reported a terminating status.
/// - `status`: human-readable termination status string.
/// - `iterations`: iterations/generations performed.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub x: Point,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
}
