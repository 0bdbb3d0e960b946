//! Fail-fast request validation for the goal optimizer.
//!
//! Every check runs before any solver work so malformed requests never
//! consume optimization time. Checks return structured [`OptError`]s and
//! never panic on user input.

use crate::optimization::errors::{OptError, OptResult};
use crate::optimization::goal::types::{OptimizationRequest, OptimizerOptions};

/// Validate a full request.
///
/// # Rules
/// - At least one scenario and at least one response curve.
/// - `crop_price` finite and strictly positive.
/// - Every scenario: `yield_goal` finite and > 0, `probability_weight`
///   in (0, 1].
/// - Constraints: budget finite and > 0, every rate cap finite and ≥ 0.
/// - Every curve's nutrient must resolve a positive fertilizer price from
///   the request-level map (scenario overrides are checked where present).
/// - Optimizer options satisfy the same rules as
///   [`OptimizerOptions::new`].
///
/// # Errors
/// The first violated rule is returned as its specific [`OptError`]
/// variant; nothing is accumulated.
pub fn validate_request(request: &OptimizationRequest) -> OptResult<()> {
    if request.scenarios.is_empty() {
        return Err(OptError::NoScenarios);
    }
    if request.curves.is_empty() {
        return Err(OptError::NoResponseCurves);
    }
    if !request.crop_price.is_finite() || request.crop_price <= 0.0 {
        return Err(OptError::InvalidCropPrice { value: request.crop_price });
    }

    for (index, scenario) in request.scenarios.iter().enumerate() {
        if !scenario.yield_goal.is_finite() || scenario.yield_goal <= 0.0 {
            return Err(OptError::InvalidYieldGoal {
                scenario_index: index,
                value: scenario.yield_goal,
            });
        }
        let weight = scenario.probability_weight;
        if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
            return Err(OptError::InvalidProbabilityWeight {
                scenario_index: index,
                value: weight,
            });
        }
        for (nutrient, price) in &scenario.price_scenario {
            if !price.is_finite() || *price <= 0.0 {
                return Err(OptError::MissingFertilizerPrice { nutrient: nutrient.as_str() });
            }
        }
    }

    let constraints = &request.constraints;
    if !constraints.budget_limit.is_finite() || constraints.budget_limit <= 0.0 {
        return Err(OptError::InvalidBudget { value: constraints.budget_limit });
    }
    for (nutrient, cap) in
        ["nitrogen", "phosphorus", "potassium"].into_iter().zip(constraints.caps())
    {
        if !cap.is_finite() || cap < 0.0 {
            return Err(OptError::InvalidRateCap { nutrient, value: cap });
        }
    }

    for curve in &request.curves {
        let price = request.fertilizer_prices.get(&curve.nutrient);
        match price {
            Some(p) if p.is_finite() && *p > 0.0 => {}
            _ => {
                return Err(OptError::MissingFertilizerPrice {
                    nutrient: curve.nutrient.as_str(),
                });
            }
        }
    }

    // Options built via struct literals bypass `OptimizerOptions::new`,
    // so the same rules are re-checked here.
    let options = &request.options;
    OptimizerOptions::new(
        options.seed,
        options.max_iterations,
        options.population,
        options.mc_draws,
        options.perturbations,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::goal::types::*;
    use crate::response::core::curve::{ModelKind, ResponseCurve};
    use crate::response::core::data::Nutrient;
    use std::collections::BTreeMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // One valid baseline request, then one mutation per rule, asserting the
    // specific error variant each rule produces.
    // -------------------------------------------------------------------------

    fn curve() -> ResponseCurve {
        ResponseCurve {
            nutrient: Nutrient::Nitrogen,
            kind: ModelKind::LinearPlateau,
            parameters: vec![100.0, 0.5, 150.0],
            r_squared: 0.95,
            rmse: 4.0,
            mse: 16.0,
            source_points: vec![(0.0, 100.0), (100.0, 150.0), (200.0, 175.0)],
            predicted_curve: Vec::new(),
        }
    }

    fn valid_request() -> OptimizationRequest {
        let mut prices = BTreeMap::new();
        prices.insert(Nutrient::Nitrogen, 0.5);
        OptimizationRequest {
            crop: "corn".to_string(),
            objective: OptimizationObjective::MaximizeProfit,
            method: OptimizationMethod::GoalProgramming,
            constraints: OptimizationConstraints::default(),
            scenarios: vec![OptimizationScenario {
                kind: ScenarioKind::Baseline,
                yield_goal: 180.0,
                price_scenario: BTreeMap::new(),
                risk_tolerance: 0.5,
                probability_weight: 1.0,
            }],
            curves: vec![curve()],
            crop_price: 5.0,
            fertilizer_prices: prices,
            options: OptimizerOptions::default(),
        }
    }

    #[test]
    fn a_well_formed_request_validates() {
        assert!(validate_request(&valid_request()).is_ok());
    }

    #[test]
    fn each_rule_produces_its_specific_error() {
        let mut no_scenarios = valid_request();
        no_scenarios.scenarios.clear();
        assert!(matches!(validate_request(&no_scenarios), Err(OptError::NoScenarios)));

        let mut no_curves = valid_request();
        no_curves.curves.clear();
        assert!(matches!(validate_request(&no_curves), Err(OptError::NoResponseCurves)));

        let mut bad_price = valid_request();
        bad_price.crop_price = 0.0;
        assert!(matches!(
            validate_request(&bad_price),
            Err(OptError::InvalidCropPrice { .. })
        ));

        let mut bad_goal = valid_request();
        bad_goal.scenarios[0].yield_goal = -10.0;
        assert!(matches!(
            validate_request(&bad_goal),
            Err(OptError::InvalidYieldGoal { scenario_index: 0, .. })
        ));

        let mut bad_weight = valid_request();
        bad_weight.scenarios[0].probability_weight = 1.5;
        assert!(matches!(
            validate_request(&bad_weight),
            Err(OptError::InvalidProbabilityWeight { scenario_index: 0, .. })
        ));

        let mut bad_budget = valid_request();
        bad_budget.constraints.budget_limit = f64::NAN;
        assert!(matches!(validate_request(&bad_budget), Err(OptError::InvalidBudget { .. })));

        let mut bad_cap = valid_request();
        bad_cap.constraints.max_phosphorus_rate = -1.0;
        assert!(matches!(
            validate_request(&bad_cap),
            Err(OptError::InvalidRateCap { nutrient: "phosphorus", .. })
        ));

        let mut missing_price = valid_request();
        missing_price.fertilizer_prices.clear();
        assert!(matches!(
            validate_request(&missing_price),
            Err(OptError::MissingFertilizerPrice { nutrient: "nitrogen" })
        ));
    }
}
