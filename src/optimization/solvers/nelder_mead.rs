//! Bounded Nelder–Mead simplex minimization over a closure objective.
//!
//! The backend wires an `argmin` Nelder–Mead solver to a bound-projecting
//! cost wrapper: candidates are clamped into the box before evaluation, so
//! the simplex may wander outside but every evaluated point is feasible and
//! the returned best point is re-projected. The initial simplex is the seed
//! plus one vertex per coordinate, offset by 5% of the box span.

use argmin::core::{CostFunction, Error, Executor, State};
use argmin::solver::neldermead::NelderMead;

use crate::optimization::{
    errors::{OptError, OptResult},
    solvers::{BoxBounds, Point, SolverOptions, SolverOutcome},
};

/// Fraction of the box span used to offset the initial simplex vertices.
const SIMPLEX_STEP: f64 = 0.05;

struct BoundedProblem<'a, F> {
    objective: &'a F,
    bounds: &'a BoxBounds,
}

impl<'a, F> CostFunction for BoundedProblem<'a, F>
where
    F: Fn(&Point) -> f64,
{
    type Param = Point;
    type Output = f64;

    /// Evaluate the objective at the bound-projected candidate.
    ///
    /// # Errors
    /// Returns `OptError::NonFiniteCost` when the objective produces a NaN
    /// or infinite value.
    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        let value = (self.objective)(&self.bounds.project(param));
        if !value.is_finite() {
            return Err((OptError::NonFiniteCost { value }).into());
        }
        Ok(value)
    }
}

/// Minimize `objective` over the box via Nelder–Mead.
///
/// # Arguments
/// - `objective`: scalar objective; evaluated only at projected points.
/// - `x0`: seed point; projected into the box before the simplex is built.
/// - `bounds`: per-coordinate box the result must respect.
/// - `opts`: iteration cap, simplex tolerance, verbosity.
///
/// # Returns
/// A [`SolverOutcome`] whose `x` is projected into the box.
///
/// # Errors
/// - Propagates any `argmin` runtime error via `From<argmin::core::Error>`.
/// - `OptError::NonFiniteCost` if the objective is non-finite at any
///   evaluated candidate.
pub fn minimize_simplex<F>(
    objective: &F, x0: &Point, bounds: &BoxBounds, opts: &SolverOptions,
) -> OptResult<SolverOutcome>
where
    F: Fn(&Point) -> f64,
{
    let seed = bounds.project(x0);
    let problem = BoundedProblem { objective, bounds };

    let simplex = build_simplex(&seed, bounds);
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(opts.sd_tolerance)
        .map_err(OptError::from)?;

    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.max_iters(opts.max_iters));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    #[cfg(not(feature = "obs_slog"))]
    if opts.verbose {
        eprintln!("nelder-mead: seed = {seed:?}");
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

/// Build the seed simplex: `x0` plus one offset vertex per coordinate.
///
/// Offsets move 5% of the box span along each axis, flipping direction when
/// the offset would leave the box, so the simplex is never degenerate for a
/// box with positive span.
fn build_simplex(seed: &Point, bounds: &BoxBounds) -> Vec<Point> {
    let span = bounds.span();
    let mut vertices = vec![seed.clone()];
    for i in 0..seed.len() {
        let step = (SIMPLEX_STEP * span[i]).max(1e-3);
        let mut vertex = seed.clone();
        if vertex[i] + step <= bounds.upper[i] {
            vertex[i] += step;
        } else {
            vertex[i] -= step;
        }
        vertices.push(vertex);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover convergence on a smooth convex objective, bound
    // respect when the unconstrained optimum is outside the box, and the
    // simplex construction at a boundary seed.
    // -------------------------------------------------------------------------

    #[test]
    fn converges_to_an_interior_quadratic_minimum() {
        // Minimum at (3, 1), well inside the box.
        let objective =
            |p: &Point| (p[0] - 3.0).powi(2) + 2.0 * (p[1] - 1.0).powi(2);
        let bounds = BoxBounds::new(&[(0.0, 10.0), (0.0, 10.0)]);
        let x0 = Array1::from(vec![8.0, 8.0]);

        let outcome = minimize_simplex(&objective, &x0, &bounds, &SolverOptions::default())
            .expect("simplex should run");

        assert!(outcome.converged, "status: {}", outcome.status);
        assert!((outcome.x[0] - 3.0).abs() < 1e-3, "x0 = {}", outcome.x[0]);
        assert!((outcome.x[1] - 1.0).abs() < 1e-3, "x1 = {}", outcome.x[1]);
    }

    #[test]
    fn result_is_projected_when_the_optimum_lies_outside_the_box() {
        // Unconstrained minimum at x = −5; the box floor is 0.
        let objective = |p: &Point| (p[0] + 5.0).powi(2);
        let bounds = BoxBounds::new(&[(0.0, 10.0)]);
        let x0 = Array1::from(vec![4.0]);

        let outcome = minimize_simplex(&objective, &x0, &bounds, &SolverOptions::default())
            .expect("simplex should run");

        assert!(outcome.x[0] >= 0.0);
        assert!(outcome.x[0] < 0.5, "projected optimum should sit at the floor");
    }

    #[test]
    fn simplex_flips_direction_at_the_upper_bound() {
        let bounds = BoxBounds::new(&[(0.0, 10.0)]);
        let seed = Array1::from(vec![10.0]);

        let simplex = build_simplex(&seed, &bounds);

        assert_eq!(simplex.len(), 2);
        assert!(simplex[1][0] < 10.0, "offset vertex must step back inside");
    }
}
