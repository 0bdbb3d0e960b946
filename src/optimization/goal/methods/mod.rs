//! The five per-scenario search strategies.
//!
//! Each method maps one scenario to an `(N, P, K)` rate vector within the
//! constraint box, using the backend that suits its objective shape:
//! gradient-based for goal programming, simplex for the multi-criteria
//! blend, and differential evolution for the global/stochastic searches.
//! A method that cannot converge falls back to the clamped seed point and
//! records a structured warning instead of failing the request.

pub mod genetic;
pub mod goal_programming;
pub mod multi_criteria;
pub mod robust;
pub mod stochastic;

use rand::rngs::StdRng;

use crate::optimization::errors::OptResult;
use crate::optimization::goal::objective::EconomicView;
use crate::optimization::goal::types::{
    OptimizationMethod, OptimizationRequest, OptimizationScenario,
};
use crate::optimization::solvers::{BoxBounds, Point, SolverOptions};

/// Historical default starting rates `(N, P, K)` for the seeded methods.
pub const DEFAULT_SEED_RATES: [f64; 3] = [100.0, 50.0, 75.0];

/// A method's raw result: the chosen rates plus any solver warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodOutcome {
    pub rates: Point,
    pub warnings: Vec<String>,
}

/// The constraint box over the decision vector.
pub fn constraint_bounds(request: &OptimizationRequest) -> BoxBounds {
    let caps = request.constraints.caps();
    BoxBounds::new(&[(0.0, caps[0]), (0.0, caps[1]), (0.0, caps[2])])
}

/// The clamped default seed point.
pub fn seed_point(bounds: &BoxBounds) -> Point {
    bounds.project(&Point::from(DEFAULT_SEED_RATES.to_vec()))
}

/// Solver options derived from the request's iteration cap.
pub fn solver_options(request: &OptimizationRequest) -> SolverOptions {
    SolverOptions { max_iters: request.options.max_iterations as u64, ..Default::default() }
}

/// Dispatch one scenario to the configured method.
pub fn run_method(
    request: &OptimizationRequest, scenario: &OptimizationScenario, view: &EconomicView<'_>,
    rng: &mut StdRng,
) -> OptResult<MethodOutcome> {
    match request.method {
        OptimizationMethod::GoalProgramming => {
            goal_programming::solve(request, scenario, view)
        }
        OptimizationMethod::MultiCriteria => multi_criteria::solve(request, scenario, view),
        OptimizationMethod::RobustOptimization => robust::solve(request, view, rng),
        OptimizationMethod::Stochastic => stochastic::solve(request, view, rng),
        OptimizationMethod::GeneticAlgorithm => genetic::solve(request, view, rng),
    }
}
