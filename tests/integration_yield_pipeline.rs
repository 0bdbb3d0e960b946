//! Integration tests for the yield-response analysis and optimization
//! pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path: from raw observations, through curve
//!   fitting and model selection, to economic thresholds, confidence
//!   bands, and fertilizer-strategy optimization.
//! - Exercise the canonical corn scenario (diminishing returns from 120
//!   to 210 yield units over rates 0–200) rather than toy edge cases
//!   only.
//!
//! Coverage
//! --------
//! - `analysis::analyze`:
//!   - full-report assembly, fit quality, economic ordering, band
//!     non-negativity, determinism across repeated calls.
//! - `optimization::goal::optimize`:
//!   - budget respect under a tight budget for the repairing methods,
//!   - exact probability-weighted scenario aggregation,
//!   - whole-response reproducibility under a fixed seed.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of individual numeric helpers (metrics,
//!   solvers, quality checks) — covered by unit tests in their modules.
//! - Service-layer concerns (serialization, HTTP, caching) — outside the
//!   crate boundary.

use std::collections::BTreeMap;

use yield_response::analysis::{AnalysisOptions, EconomicParams, analyze};
use yield_response::optimization::goal::{
    OptimizationConstraints, OptimizationMethod, OptimizationObjective, OptimizationRequest,
    OptimizationScenario, OptimizerOptions, ScenarioKind, optimize,
};
use yield_response::response::core::data::{Nutrient, NutrientObservation};

/// The canonical diminishing-returns nitrogen series for corn.
fn corn_observations() -> Vec<NutrientObservation> {
    [(0.0, 120.0), (50.0, 150.0), (100.0, 180.0), (150.0, 200.0), (200.0, 210.0)]
        .iter()
        .map(|(rate, yield_val)| {
            NutrientObservation::single(Nutrient::Nitrogen, *rate, *yield_val, 2023)
        })
        .collect()
}

fn corn_params() -> EconomicParams {
    let mut map = BTreeMap::new();
    map.insert("nitrogen_price_per_unit".to_string(), 0.5);
    map.insert("crop_price_per_unit".to_string(), 5.0);
    EconomicParams::from_key_map(&map).expect("well-formed parameter map")
}

fn scenario(kind: ScenarioKind, goal: f64, weight: f64) -> OptimizationScenario {
    OptimizationScenario {
        kind,
        yield_goal: goal,
        price_scenario: BTreeMap::new(),
        risk_tolerance: 0.5,
        probability_weight: weight,
    }
}

/// Build an optimization request around the fitted corn nitrogen curve.
fn corn_request(method: OptimizationMethod, budget: f64) -> OptimizationRequest {
    let report = analyze(
        &corn_observations(),
        "corn",
        &corn_params(),
        &AnalysisOptions::default(),
    )
    .expect("corn analysis should succeed");
    let curve = report.nutrient_curves[&Nutrient::Nitrogen].clone();

    let mut prices = BTreeMap::new();
    prices.insert(Nutrient::Nitrogen, 0.5);
    prices.insert(Nutrient::Phosphorus, 0.6);
    prices.insert(Nutrient::Potassium, 0.45);

    OptimizationRequest {
        crop: "corn".to_string(),
        objective: OptimizationObjective::Balanced,
        method,
        constraints: OptimizationConstraints { budget_limit: budget, ..Default::default() },
        scenarios: vec![
            scenario(ScenarioKind::Baseline, 190.0, 0.5),
            scenario(ScenarioKind::Optimistic, 210.0, 0.3),
            scenario(ScenarioKind::Pessimistic, 170.0, 0.2),
        ],
        curves: vec![curve],
        crop_price: 5.0,
        fertilizer_prices: prices,
        options: OptimizerOptions { max_iterations: 80, mc_draws: 300, ..Default::default() },
    }
}

#[test]
// Purpose
// -------
// The canonical corn scenario end to end: at least one model family fits
// with R² > 0.9, the economic optimum is interior to the rate grid, and
// the profitability bounds bracket it.
fn corn_analysis_fits_well_and_orders_economic_rates() {
    // Arrange
    let observations = corn_observations();

    // Act
    let report = analyze(&observations, "corn", &corn_params(), &AnalysisOptions::default())
        .expect("analysis should succeed");

    // Assert: fit quality.
    let curve = &report.nutrient_curves[&Nutrient::Nitrogen];
    assert!(curve.r_squared > 0.9, "selected {} with R² = {}", curve.kind, curve.r_squared);
    assert!(curve.r_squared <= 1.0);
    assert!(
        report.model_comparison[&Nutrient::Nitrogen]
            .iter()
            .any(|attempt| attempt.r_squared.map_or(false, |r2| r2 > 0.9)),
        "at least one family must explain > 90% of variance"
    );

    // Assert: sampled curve is non-negative and 100 points long.
    assert_eq!(curve.predicted_curve.len(), 100);
    assert!(curve.predicted_curve.iter().all(|(_, y)| *y >= 0.0));

    // Assert: economic ordering. The profit function is concave with an
    // interior maximum, so the bounds must bracket the optimum.
    let rates = &report.optimal_rates[&Nutrient::Nitrogen];
    let bounds = &report.thresholds[&Nutrient::Nitrogen];
    assert!(rates.economic_optimal_rate > 0.0);
    assert!(rates.economic_optimal_rate < 300.0, "optimum must be interior to the grid");
    let min_p = bounds.minimum_profitable_rate.expect("rate 0 is already profitable");
    let max_p = bounds.maximum_profitable_rate.expect("profitability persists on the grid");
    assert!(min_p <= rates.economic_optimal_rate);
    assert!(rates.economic_optimal_rate <= max_p);
    assert!(rates.profit_at_optimal > 0.0);

    // Assert: confidence band is non-negative and brackets predictions.
    let band = &report.confidence_intervals[&Nutrient::Nitrogen];
    assert_eq!(band.len(), 100);
    for point in band {
        assert!(point.lower >= 0.0);
        assert!(point.lower <= point.predicted_yield && point.predicted_yield <= point.upper);
    }

    // Assert: validation agrees the fit is usable.
    let validation = &report.validations[&Nutrient::Nitrogen];
    assert!(validation.is_valid, "issues: {:?}", validation.issues);
    assert!(validation.quality_score > 0.7);
}

#[test]
// Purpose
// -------
// Determinism: repeated analyses of the same observations produce
// identical reports (model selection, parameters, bands).
fn repeated_analyses_are_identical() {
    let observations = corn_observations();
    let options = AnalysisOptions::default();

    let first = analyze(&observations, "corn", &corn_params(), &options).unwrap();
    let second = analyze(&observations, "corn", &corn_params(), &options).unwrap();

    assert_eq!(first, second);
}

#[test]
// Purpose
// -------
// Budget respect, as asserted against the source system: with
// budget_limit = 10.0 the optimized total cost must not exceed 10.0 for
// the goal-programming and genetic methods.
fn tight_budget_is_respected_by_the_repairing_methods() {
    for method in [OptimizationMethod::GoalProgramming, OptimizationMethod::GeneticAlgorithm] {
        // Arrange
        let request = corn_request(method, 10.0);

        // Act
        let response = optimize(&request).expect("optimization should run");

        // Assert
        for outcome in &response.outcomes {
            assert!(
                outcome.strategy.total_cost <= 10.0,
                "{method:?}: total cost {} exceeds the budget",
                outcome.strategy.total_cost
            );
        }
        assert!(response.best_strategy.total_cost <= 10.0);
    }
}

#[test]
// Purpose
// -------
// Scenario aggregation: with weights 0.5/0.3/0.2 the weighted yield and
// profit probabilities must equal Σ wᵢ·pᵢ exactly.
fn weighted_scenario_aggregation_is_exact() {
    // Arrange
    let request = corn_request(OptimizationMethod::GoalProgramming, 500.0);

    // Act
    let response = optimize(&request).expect("optimization should run");

    // Assert
    assert_eq!(response.outcomes.len(), 3);
    let expected_yield_p: f64 = response
        .outcomes
        .iter()
        .map(|o| o.scenario.probability_weight * o.yield_probability)
        .sum();
    let expected_profit_p: f64 = response
        .outcomes
        .iter()
        .map(|o| o.scenario.probability_weight * o.profit_probability)
        .sum();
    assert_eq!(response.risk.weighted_yield_probability, expected_yield_p);
    assert_eq!(response.risk.weighted_profit_probability, expected_profit_p);

    // Non-negativity of optimizer outputs.
    for outcome in &response.outcomes {
        assert!(outcome.expected_yield >= 0.0);
        assert!(outcome.strategy.total_cost >= 0.0);
        assert!(outcome.strategy.nitrogen_rate >= 0.0);
        assert!(outcome.strategy.phosphorus_rate >= 0.0);
        assert!(outcome.strategy.potassium_rate >= 0.0);
        assert!((0.0..=1.0).contains(&outcome.yield_probability));
        assert!((0.0..=1.0).contains(&outcome.profit_probability));
    }
}

#[test]
// Purpose
// -------
// Idempotence of the stochastic paths: identical requests with the same
// seed produce identical responses.
fn stochastic_methods_reproduce_under_a_fixed_seed() {
    for method in [
        OptimizationMethod::RobustOptimization,
        OptimizationMethod::Stochastic,
        OptimizationMethod::GeneticAlgorithm,
    ] {
        let request = corn_request(method, 500.0);
        let first = optimize(&request).expect("first run");
        let second = optimize(&request).expect("second run");
        assert_eq!(first, second, "{method:?} must reproduce under the default seed");
    }
}

#[test]
// Purpose
// -------
// Fewer than three observations for a nutrient must surface as a hard
// error from the analysis entry point, never a silent empty curve.
fn insufficient_observations_fail_the_analysis() {
    let observations = vec![
        NutrientObservation::single(Nutrient::Nitrogen, 0.0, 120.0, 2023),
        NutrientObservation::single(Nutrient::Nitrogen, 100.0, 180.0, 2023),
    ];

    let result = analyze(&observations, "corn", &corn_params(), &AnalysisOptions::default());

    assert!(result.is_err(), "two observations must not produce a curve");
}
