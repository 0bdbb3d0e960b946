//! goal — fertilizer-strategy search under yield goals and budgets.
//!
//! Purpose
//! -------
//! Given fitted response curves, prices, per-nutrient rate caps, a budget,
//! and a list of weighted economic/weather scenarios, search for the
//! `(N, P, K)` application rates that best satisfy the configured
//! objective under the configured method, then reduce the per-scenario
//! results to one recommended strategy plus an aggregate risk assessment.
//!
//! Key behaviors
//! -------------
//! - Validate the whole request before any solver work (fail fast with
//!   specific errors).
//! - Optimize each scenario independently through one of five methods
//!   (goal programming, multi-criteria weighting, robust optimization,
//!   stochastic search, genetic-algorithm-style search), all over the same
//!   bounded decision vector.
//! - Post-process each scenario into probabilities, risk metrics, and
//!   sensitivity deltas; aggregate across scenarios by probability weight.
//! - Carry solver degradations as structured warnings on the outcomes and
//!   response — a non-converging solver falls back to its seed rates but
//!   never silently.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every returned strategy respects the per-nutrient caps, and the
//!   goal-programming/genetic strategies respect the budget exactly
//!   (post-search repair).
//! - A fixed `OptimizerOptions::seed` makes the full response
//!   reproducible, including the stochastic methods.
//! - Scenarios are processed in request order against one RNG stream, so
//!   reordering scenarios changes stochastic draws — callers comparing
//!   runs should keep scenario order stable.
//!
//! Downstream usage
//! ----------------
//! - Service layers call [`optimize`] once per request; the call is
//!   synchronous and CPU-bound (Monte-Carlo and evolutionary loops), so
//!   async callers should run it on a blocking worker pool.

pub mod aggregate;
pub mod methods;
pub mod objective;
pub mod scenario;
pub mod types;
pub mod validation;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::optimization::errors::OptResult;
use crate::optimization::goal::objective::EconomicView;

pub use types::{
    FertilizerStrategy, OptimizationConstraints, OptimizationMethod, OptimizationObjective,
    OptimizationRequest, OptimizationResponse, OptimizationScenario, OptimizerOptions,
    RiskAssessment, RiskLevel, ScenarioKind, ScenarioOutcome,
};

/// Run the full strategy search for one request.
///
/// # Errors
/// - Request-validation errors ([`crate::optimization::errors::OptError`])
///   before any optimization runs.
/// - Solver backend errors that survive the per-method fallback paths
///   (differential-evolution configuration errors, non-finite objectives).
pub fn optimize(request: &OptimizationRequest) -> OptResult<OptimizationResponse> {
    validation::validate_request(request)?;

    let mut rng = StdRng::seed_from_u64(request.options.seed);
    let mut outcomes = Vec::with_capacity(request.scenarios.len());
    let mut warnings = Vec::new();

    for scenario in &request.scenarios {
        let view = EconomicView::resolve(request, scenario);
        let method_outcome = methods::run_method(request, scenario, &view, &mut rng)?;
        warnings.extend(method_outcome.warnings.iter().cloned());
        outcomes.push(scenario::assess(scenario, method_outcome, &view));
    }

    let best_idx = aggregate::select_best(&outcomes);
    let risk = aggregate::assess_risk(&outcomes);
    let recommendations = aggregate::recommendations(&outcomes[best_idx], &risk, request);

    Ok(OptimizationResponse {
        best_strategy: outcomes[best_idx].strategy.clone(),
        best_scenario: outcomes[best_idx].scenario.kind,
        outcomes,
        risk,
        recommendations,
        warnings,
    })
}
