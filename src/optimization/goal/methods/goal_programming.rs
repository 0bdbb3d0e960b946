//! Goal programming: minimize the deviation from the yield goal with a
//! soft budget penalty.
//!
//! The objective is `|E[yield] − goal| + 0.1·max(0, cost − budget)`,
//! minimized by the gradient backend from the historical seed rates.
//! The absolute-value kink means the line search can fail close to a
//! perfectly attainable goal; the escalation path is explicit:
//! L-BFGS → derivative-free simplex retry → seed fallback, with a
//! structured warning recorded at each downgrade. The returned rates are
//! budget-repaired so the hard form of the constraint holds.

use crate::optimization::errors::OptResult;
use crate::optimization::goal::methods::{MethodOutcome, constraint_bounds, seed_point, solver_options};
use crate::optimization::goal::objective::EconomicView;
use crate::optimization::goal::types::{OptimizationRequest, OptimizationScenario};
use crate::optimization::solvers::{Point, lbfgs::minimize_penalized, nelder_mead::minimize_simplex};

/// Weight of the soft budget penalty in the objective.
pub const BUDGET_PENALTY_WEIGHT: f64 = 0.1;

pub fn solve(
    request: &OptimizationRequest, scenario: &OptimizationScenario, view: &EconomicView<'_>,
) -> OptResult<MethodOutcome> {
    let bounds = constraint_bounds(request);
    let seed = seed_point(&bounds);
    let opts = solver_options(request);
    let budget = request.constraints.budget_limit;
    let goal = scenario.yield_goal;

    let objective = |rates: &Point| -> f64 {
        let deviation = (view.expected_yield(rates) - goal).abs();
        let overrun = (view.cost(rates) - budget).max(0.0);
        deviation + BUDGET_PENALTY_WEIGHT * overrun
    };

    let mut warnings = Vec::new();
    let rates = match minimize_penalized(&objective, &seed, &bounds, &opts) {
        Ok(outcome) if outcome.converged => outcome.x,
        Ok(outcome) => {
            warnings.push(format!(
                "goal programming: gradient solver stopped without terminating ({}); retrying with simplex",
                outcome.status
            ));
            simplex_retry(&objective, &seed, request, &mut warnings)
        }
        Err(err) => {
            warnings.push(format!(
                "goal programming: gradient solver failed ({err}); retrying with simplex"
            ));
            simplex_retry(&objective, &seed, request, &mut warnings)
        }
    };

    Ok(MethodOutcome { rates: view.repair_budget(&rates, budget), warnings })
}

/// Derivative-free retry; falls back to the seed with a warning when the
/// simplex fails too.
fn simplex_retry<F>(
    objective: &F, seed: &Point, request: &OptimizationRequest, warnings: &mut Vec<String>,
) -> Point
where
    F: Fn(&Point) -> f64,
{
    let bounds = constraint_bounds(request);
    let opts = solver_options(request);
    match minimize_simplex(objective, seed, &bounds, &opts) {
        Ok(outcome) => outcome.x,
        Err(err) => {
            warnings.push(format!(
                "goal programming: simplex retry failed ({err}); falling back to the initial rates"
            ));
            seed.clone()
        }
    }
}
