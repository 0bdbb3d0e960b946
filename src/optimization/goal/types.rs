//! goal::types — request, scenario, strategy, and result types for the
//! fertilizer-strategy search.
//!
//! Purpose
//! -------
//! Define the full vocabulary of the goal optimizer: what the caller asks
//! for (objective, method, constraints, scenarios, curves, prices,
//! options) and what comes back (per-scenario outcomes, the selected
//! strategy, a risk assessment, recommendations, warnings). All types are
//! plain immutable values; the optimizer never mutates a request.
//!
//! Conventions
//! -----------
//! - The decision vector is always `(nitrogen, phosphorus, potassium)`
//!   application rates, bounded by [`OptimizationConstraints`].
//! - Scenario probability weights conceptually sum toward 1.0 across a
//!   request; this is the caller's responsibility and is not enforced.
//! - Micronutrient rates ride along on [`FertilizerStrategy`] as an opaque
//!   map; the optimizer neither sets nor interprets them.
//! - Maps use `BTreeMap` so every derived report iterates automatically.

use std::collections::BTreeMap;

use crate::optimization::errors::{OptError, OptResult};
use crate::response::core::data::Nutrient;
use crate::response::core::curve::ResponseCurve;

/// What the search should prioritize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationObjective {
    MaximizeProfit,
    MinimizeCost,
    MaximizeYield,
    MinimizeRisk,
    /// Fixed 0.4/0.4/0.2 blend of yield, profit, and cost criteria.
    Balanced,
}

/// Which search strategy to run per scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationMethod {
    /// Minimize deviation from the yield goal plus a soft budget penalty
    /// (gradient-based).
    GoalProgramming,
    /// Minimize an objective-weighted blend of normalized criteria
    /// (simplex).
    MultiCriteria,
    /// Hedge against yield uncertainty by optimizing mean profit over
    /// perturbed draws (differential evolution).
    RobustOptimization,
    /// Maximize a Sharpe-like risk-adjusted return over Monte-Carlo draws
    /// (differential evolution).
    Stochastic,
    /// Maximize expected profit with linear soft penalties for constraint
    /// violations (differential evolution).
    GeneticAlgorithm,
}

/// Scenario flavor, carried through to reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    Baseline,
    Optimistic,
    Pessimistic,
    StressTest,
}

/// Hard box constraints on the decision vector plus the budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationConstraints {
    pub max_nitrogen_rate: f64,
    pub max_phosphorus_rate: f64,
    pub max_potassium_rate: f64,
    pub budget_limit: f64,
}

impl OptimizationConstraints {
    /// Per-nutrient caps in decision-vector order.
    pub fn caps(&self) -> [f64; 3] {
        [self.max_nitrogen_rate, self.max_phosphorus_rate, self.max_potassium_rate]
    }
}

impl Default for OptimizationConstraints {
    fn default() -> Self {
        Self {
            max_nitrogen_rate: 200.0,
            max_phosphorus_rate: 100.0,
            max_potassium_rate: 150.0,
            budget_limit: 500.0,
        }
    }
}

/// One economic/weather scenario to optimize under.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationScenario {
    pub kind: ScenarioKind,
    pub yield_goal: f64,
    /// Per-nutrient fertilizer prices overriding the request-level prices
    /// for this scenario; absent nutrients fall back to the request.
    pub price_scenario: BTreeMap<Nutrient, f64>,
    /// Caller's qualitative risk appetite in [0, 1]; carried into reports.
    pub risk_tolerance: f64,
    /// Weight of this scenario in cross-scenario aggregation, in (0, 1].
    pub probability_weight: f64,
}

/// The optimizer's decision variables plus the derived cost.
#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerStrategy {
    pub nitrogen_rate: f64,
    pub phosphorus_rate: f64,
    pub potassium_rate: f64,
    pub micronutrient_rates: BTreeMap<String, f64>,
    pub total_cost: f64,
}

impl FertilizerStrategy {
    /// Rates in decision-vector order.
    pub fn rates(&self) -> [f64; 3] {
        [self.nitrogen_rate, self.phosphorus_rate, self.potassium_rate]
    }
}

/// Solver tuning and reproducibility knobs.
///
/// - `seed`: RNG seed for the stochastic methods; fixed seeds reproduce
///   results exactly. Injected rather than hardcoded so non-determinism is
///   an explicit caller choice.
/// - `max_iterations`: cap for the gradient/simplex backends and the
///   generation count for differential evolution.
/// - `population`: differential-evolution population size.
/// - `mc_draws`: Monte-Carlo draws for the stochastic method.
/// - `perturbations`: perturbed draws for robust optimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerOptions {
    pub seed: u64,
    pub max_iterations: usize,
    pub population: usize,
    pub mc_draws: usize,
    pub perturbations: usize,
}

impl OptimizerOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - `OptError::InvalidMaxIter` when `max_iterations == 0`.
    /// - `OptError::InvalidPopulation` when `population < 4`.
    /// - `OptError::InvalidDrawCount` when `mc_draws == 0` or
    ///   `perturbations == 0`.
    pub fn new(
        seed: u64, max_iterations: usize, population: usize, mc_draws: usize,
        perturbations: usize,
    ) -> OptResult<Self> {
        if max_iterations == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        if population < 4 {
            return Err(OptError::InvalidPopulation {
                population,
                reason: "Differential evolution needs at least four members.",
            });
        }
        if mc_draws == 0 {
            return Err(OptError::InvalidDrawCount {
                draws: mc_draws,
                reason: "At least one Monte-Carlo draw is required.",
            });
        }
        if perturbations == 0 {
            return Err(OptError::InvalidDrawCount {
                draws: perturbations,
                reason: "At least one perturbed draw is required.",
            });
        }
        Ok(Self { seed, max_iterations, population, mc_draws, perturbations })
    }
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self { seed: 42, max_iterations: 100, population: 30, mc_draws: 1000, perturbations: 100 }
    }
}

/// A full strategy-search request.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRequest {
    pub crop: String,
    pub objective: OptimizationObjective,
    pub method: OptimizationMethod,
    pub constraints: OptimizationConstraints,
    pub scenarios: Vec<OptimizationScenario>,
    /// One fitted curve per nutrient; at least one required.
    pub curves: Vec<ResponseCurve>,
    pub crop_price: f64,
    /// Request-level fertilizer prices; scenarios may override per
    /// nutrient.
    pub fertilizer_prices: BTreeMap<Nutrient, f64>,
    pub options: OptimizerOptions,
}

/// One scenario's optimization outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub scenario: OptimizationScenario,
    pub strategy: FertilizerStrategy,
    pub expected_yield: f64,
    /// P(yield ≥ goal) under the 15%-CV normal yield model.
    pub yield_probability: f64,
    pub expected_profit: f64,
    /// P(profit > 0) under the 20%-CV normal profit model.
    pub profit_probability: f64,
    pub risk_metrics: BTreeMap<String, f64>,
    /// Profit deltas under ±10% price moves.
    pub sensitivity: BTreeMap<String, f64>,
    /// Structured solver degradations (e.g. fallback on non-convergence).
    pub warnings: Vec<String>,
}

/// Overall risk tier of the recommended strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Probability-weighted cross-scenario risk summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub weighted_yield_probability: f64,
    pub weighted_profit_probability: f64,
    pub notes: Vec<String>,
}

/// The full response: per-scenario outcomes reduced to one recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResponse {
    pub outcomes: Vec<ScenarioOutcome>,
    pub best_strategy: FertilizerStrategy,
    /// Scenario kind the best strategy came from.
    pub best_scenario: ScenarioKind,
    pub risk: RiskAssessment,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimizer_options_are_validated() {
        assert!(OptimizerOptions::new(1, 100, 30, 1000, 100).is_ok());
        assert!(matches!(
            OptimizerOptions::new(1, 0, 30, 1000, 100),
            Err(OptError::InvalidMaxIter { .. })
        ));
        assert!(matches!(
            OptimizerOptions::new(1, 100, 3, 1000, 100),
            Err(OptError::InvalidPopulation { .. })
        ));
        assert!(matches!(
            OptimizerOptions::new(1, 100, 30, 0, 100),
            Err(OptError::InvalidDrawCount { .. })
        ));
    }

    #[test]
    fn default_seed_matches_the_historical_constant() {
        // Reproducibility default carried over from the original system;
        // callers override it to make runs explicitly non-deterministic.
        assert_eq!(OptimizerOptions::default().seed, 42);
    }

    #[test]
    fn strategy_rates_are_in_decision_vector_order() {
        let strategy = FertilizerStrategy {
            nitrogen_rate: 1.0,
            phosphorus_rate: 2.0,
            potassium_rate: 3.0,
            micronutrient_rates: BTreeMap::new(),
            total_cost: 0.0,
        };
        assert_eq!(strategy.rates(), [1.0, 2.0, 3.0]);
    }
}
