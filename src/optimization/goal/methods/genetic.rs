//! Genetic-algorithm-style search: expected profit with soft penalties.
//!
//! A global population search (differential evolution) maximizing expected
//! profit, with explicit *linear* penalties for budget and rate-cap
//! violations instead of hard constraints — the soft-constraint fallback
//! for when the feasible region is uncertain. The search box already
//! enforces the caps, so the cap penalty only matters if callers widen the
//! box; the budget penalty is active whenever a candidate overspends.
//! Returned rates are budget-repaired so the hard form of the budget
//! holds on the result.

use rand::rngs::StdRng;

use crate::optimization::errors::OptResult;
use crate::optimization::goal::methods::{MethodOutcome, constraint_bounds};
use crate::optimization::goal::objective::EconomicView;
use crate::optimization::goal::types::OptimizationRequest;
use crate::optimization::solvers::{
    Point, differential_evolution::{DifferentialEvolution, minimize_de},
};

/// Linear penalty per unit of budget overrun or cap violation.
pub const VIOLATION_PENALTY: f64 = 10.0;

pub fn solve(
    request: &OptimizationRequest, view: &EconomicView<'_>, rng: &mut StdRng,
) -> OptResult<MethodOutcome> {
    let bounds = constraint_bounds(request);
    let budget = request.constraints.budget_limit;
    let caps = request.constraints.caps();

    let objective = |rates: &Point| -> f64 {
        let profit = view.profit(rates);
        let overrun = (view.cost(rates) - budget).max(0.0);
        let cap_violation: f64 = (0..3).map(|i| (rates[i] - caps[i]).max(0.0)).sum();
        -profit + VIOLATION_PENALTY * (overrun + cap_violation)
    };

    let config = DifferentialEvolution {
        population: request.options.population,
        generations: request.options.max_iterations,
        ..Default::default()
    };
    let outcome = minimize_de(&objective, &bounds, &config, rng)?;

    Ok(MethodOutcome {
        rates: view.repair_budget(&outcome.x, budget),
        warnings: Vec::new(),
    })
}
