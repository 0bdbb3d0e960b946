//! Gradient-based minimization with finite-difference gradients.
//!
//! Wires an `argmin` L-BFGS solver with a More–Thuente line search to a
//! bound-projecting cost wrapper. Objectives here carry their constraints
//! as penalty terms (goal programming), so the solver itself runs
//! unconstrained; bounds are enforced by projection inside the cost and on
//! the returned point. Gradients come from central finite differences with
//! a forward-difference fallback when the central stencil produces a
//! non-finite entry.

use argmin::core::{CostFunction, Error, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use finitediff::FiniteDiff;

use crate::optimization::{
    errors::{OptError, OptResult},
    solvers::{BoxBounds, Point, SolverOptions, SolverOutcome},
};

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Gradient-norm tolerance used for termination.
pub const DEFAULT_TOL_GRAD: f64 = 1e-6;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Point, Point, f64>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Point, Point, f64>;

struct PenalizedProblem<'a, F> {
    objective: &'a F,
    bounds: &'a BoxBounds,
}

impl<'a, F> PenalizedProblem<'a, F>
where
    F: Fn(&Point) -> f64,
{
    fn eval(&self, param: &Point) -> f64 {
        (self.objective)(&self.bounds.project(param))
    }
}

impl<'a, F> CostFunction for PenalizedProblem<'a, F>
where
    F: Fn(&Point) -> f64,
{
    type Param = Point;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.eval(param);
        if !value.is_finite() {
            return Err((OptError::NonFiniteCost { value }).into());
        }
        Ok(value)
    }
}

impl<'a, F> Gradient for PenalizedProblem<'a, F>
where
    F: Fn(&Point) -> f64,
{
    type Param = Point;
    type Gradient = Point;

    /// Central-difference gradient of the projected cost, with a one-shot
    /// forward-difference retry when the central stencil is non-finite
    /// (e.g. at a projection kink on the box boundary).
    fn gradient(&self, param: &Self::Param) -> Result<Self::Gradient, Error> {
        let cost_func = |theta: &Point| -> f64 { self.eval(theta) };
        let grad = param.central_diff(&cost_func);
        if grad.iter().all(|g| g.is_finite()) {
            return Ok(grad);
        }
        let grad = param.forward_diff(&cost_func);
        match grad.iter().find(|g| !g.is_finite()) {
            Some(bad) => Err((OptError::NonFiniteCost { value: *bad }).into()),
            None => Ok(grad),
        }
    }
}

/// Build the L-BFGS solver with the default gradient tolerance.
fn build_solver() -> OptResult<LbfgsMoreThuente> {
    let linesearch = MoreThuenteLineSearch::new();
    LBFGS::new(linesearch, DEFAULT_LBFGS_MEM)
        .with_tolerance_grad(DEFAULT_TOL_GRAD)
        .map_err(OptError::from)
}

/// Minimize a penalized objective via L-BFGS with finite-difference
/// gradients.
///
/// # Arguments
/// - `objective`: scalar objective with soft-penalty constraints baked in;
///   evaluated only at bound-projected points.
/// - `x0`: seed point; projected into the box before the run.
/// - `bounds`: per-coordinate box the result must respect.
/// - `opts`: iteration cap and verbosity.
///
/// # Returns
/// A [`SolverOutcome`] whose `x` is projected into the box.
///
/// # Errors
/// - Propagates `argmin` runtime errors (line-search failures included) via
///   `From<argmin::core::Error>`; callers decide whether to retry with a
///   derivative-free backend or fall back, and must surface a warning when
///   they do.
pub fn minimize_penalized<F>(
    objective: &F, x0: &Point, bounds: &BoxBounds, opts: &SolverOptions,
) -> OptResult<SolverOutcome>
where
    F: Fn(&Point) -> f64,
{
    let seed = bounds.project(x0);
    let problem = PenalizedProblem { objective, bounds };
    let solver = build_solver()?;

    let mut optimizer = Executor::new(problem, solver);
    let seed_param = seed.clone();
    optimizer =
        optimizer.configure(|state| state.param(seed_param).max_iters(opts.max_iters));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    #[cfg(not(feature = "obs_slog"))]
    if opts.verbose {
        eprintln!("lbfgs: seed = {seed:?}");
    }

    let mut result = optimizer.run().map_err(OptError::from)?.state().clone();
    let iterations = result.get_iter() as usize;
    let value = result.get_best_cost();
    let termination = result.get_termination_status().clone();
    let best = result.take_best_param().unwrap_or(seed);

    let status;
    let converged = match termination {
        argmin::core::TerminationStatus::NotTerminated => {
            status = "Not terminated".to_string();
            false
        }
        other => {
            status = format!("{other:?}");
            true
        }
    };

    Ok(SolverOutcome { x: bounds.project(&best), value, converged, status, iterations })
}
