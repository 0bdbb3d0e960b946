//! Multi-criteria weighting: minimize a blend of normalized criteria.
//!
//! The three criteria are `−yield/goal`, `−profit/(goal·crop_price)`, and
//! `cost/budget` — each dimensionless so the weights compare like with
//! like. Pure objectives (maximize yield/profit, minimize cost) put all
//! weight on their criterion; the risk-averse and balanced objectives use
//! the fixed 0.4/0.4/0.2 blend. Solved with the derivative-free simplex
//! backend from the historical seed rates.

use crate::optimization::errors::OptResult;
use crate::optimization::goal::methods::{MethodOutcome, constraint_bounds, seed_point, solver_options};
use crate::optimization::goal::objective::EconomicView;
use crate::optimization::goal::types::{
    OptimizationObjective, OptimizationRequest, OptimizationScenario,
};
use crate::optimization::solvers::{Point, nelder_mead::minimize_simplex};

/// Criterion weights `(yield, profit, cost)` for an objective.
pub fn criterion_weights(objective: OptimizationObjective) -> [f64; 3] {
    match objective {
        OptimizationObjective::MaximizeYield => [1.0, 0.0, 0.0],
        OptimizationObjective::MaximizeProfit => [0.0, 1.0, 0.0],
        OptimizationObjective::MinimizeCost => [0.0, 0.0, 1.0],
        OptimizationObjective::MinimizeRisk | OptimizationObjective::Balanced => [0.4, 0.4, 0.2],
    }
}

pub fn solve(
    request: &OptimizationRequest, scenario: &OptimizationScenario, view: &EconomicView<'_>,
) -> OptResult<MethodOutcome> {
    let bounds = constraint_bounds(request);
    let seed = seed_point(&bounds);
    let opts = solver_options(request);
    let weights = criterion_weights(request.objective);
    let goal = scenario.yield_goal;
    let budget = request.constraints.budget_limit;
    let profit_scale = goal * view.crop_price;

    let objective = |rates: &Point| -> f64 {
        let yield_term = -view.expected_yield(rates) / goal;
        let profit_term = -view.profit(rates) / profit_scale;
        let cost_term = view.cost(rates) / budget;
        weights[0] * yield_term + weights[1] * profit_term + weights[2] * cost_term
    };

    let mut warnings = Vec::new();
    let rates = match minimize_simplex(&objective, &seed, &bounds, &opts) {
        Ok(outcome) => outcome.x,
        Err(err) => {
            warnings.push(format!(
                "multi-criteria: simplex solver failed ({err}); falling back to the initial rates"
            ));
            seed.clone()
        }
    };

    Ok(MethodOutcome { rates, warnings })
}
