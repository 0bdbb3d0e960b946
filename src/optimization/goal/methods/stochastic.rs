//! Stochastic optimization: maximize Monte-Carlo risk-adjusted return.
//!
//! For each candidate rate vector the profit distribution is simulated
//! from joint yield and price uncertainty (yield ~ N(base, 15% CV),
//! crop price ~ N(base, 20% CV)) and scored by a Sharpe-like ratio
//! `mean / std` — a candidate with high but wildly uncertain profit loses
//! to a slightly poorer, steadier one. The draw panel is sampled once per
//! solve from the caller-seeded RNG, keeping the objective deterministic
//! during the differential-evolution search.

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use statrs::distribution::Normal;

use crate::optimization::errors::OptResult;
use crate::optimization::goal::methods::{MethodOutcome, constraint_bounds};
use crate::optimization::goal::objective::EconomicView;
use crate::optimization::goal::types::OptimizationRequest;
use crate::optimization::solvers::{
    Point, differential_evolution::{DifferentialEvolution, minimize_de},
};

/// Coefficient of variation of the simulated yields.
pub const YIELD_CV: f64 = 0.15;

/// Coefficient of variation of the simulated crop prices.
pub const PRICE_CV: f64 = 0.20;

/// Guard against a zero-variance profit panel.
const STD_FLOOR: f64 = 1e-9;

pub fn solve(
    request: &OptimizationRequest, view: &EconomicView<'_>, rng: &mut StdRng,
) -> OptResult<MethodOutcome> {
    let bounds = constraint_bounds(request);

    // One multiplicative (yield, price) pair per draw, fixed for the run.
    let yield_noise = Normal::new(1.0, YIELD_CV).expect("positive standard deviation");
    let price_noise = Normal::new(1.0, PRICE_CV).expect("positive standard deviation");
    let panel: Vec<(f64, f64)> = (0..request.options.mc_draws)
        .map(|_| (yield_noise.sample(rng).max(0.0), price_noise.sample(rng).max(0.0)))
        .collect();

    let objective = |rates: &Point| -> f64 {
        let base_yield = view.expected_yield(rates);
        let cost = view.cost(rates);
        let n = panel.len() as f64;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for (yield_mult, price_mult) in &panel {
            let profit = base_yield * yield_mult * view.crop_price * price_mult - cost;
            sum += profit;
            sum_sq += profit * profit;
        }
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        let sharpe = mean / variance.sqrt().max(STD_FLOOR);
        -sharpe
    };

    let config = DifferentialEvolution {
        population: request.options.population,
        generations: request.options.max_iterations,
        ..Default::default()
    };
    let outcome = minimize_de(&objective, &bounds, &config, rng)?;

    Ok(MethodOutcome { rates: outcome.x, warnings: Vec::new() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::goal::types::*;
    use crate::response::core::curve::{ModelKind, ResponseCurve};
    use crate::response::core::data::Nutrient;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Behavioral checks only: the ratio objective has no closed-form
    // optimum, so the tests assert reproducibility under a fixed seed and
    // that unproductive nutrients are not funded.
    // -------------------------------------------------------------------------

    fn request() -> OptimizationRequest {
        let curve = ResponseCurve {
            nutrient: Nutrient::Nitrogen,
            kind: ModelKind::QuadraticPlateau,
            parameters: vec![100.0, 2.0, -0.01],
            r_squared: 1.0,
            rmse: 0.0,
            mse: 0.0,
            source_points: vec![(0.0, 100.0), (100.0, 200.0), (200.0, 200.0)],
            predicted_curve: Vec::new(),
        };
        let mut prices = BTreeMap::new();
        prices.insert(Nutrient::Nitrogen, 1.0);
        prices.insert(Nutrient::Phosphorus, 0.6);
        prices.insert(Nutrient::Potassium, 0.45);
        OptimizationRequest {
            crop: "corn".to_string(),
            objective: OptimizationObjective::MinimizeRisk,
            method: OptimizationMethod::Stochastic,
            constraints: OptimizationConstraints::default(),
            scenarios: Vec::new(),
            curves: vec![curve],
            crop_price: 5.0,
            fertilizer_prices: prices,
            options: OptimizerOptions {
                max_iterations: 50,
                mc_draws: 400,
                ..Default::default()
            },
        }
    }

    fn scenario() -> OptimizationScenario {
        OptimizationScenario {
            kind: ScenarioKind::Baseline,
            yield_goal: 180.0,
            price_scenario: BTreeMap::new(),
            risk_tolerance: 0.5,
            probability_weight: 1.0,
        }
    }

    #[test]
    fn fixed_seeds_reproduce_the_answer() {
        let request = request();
        let view = EconomicView::resolve(&request, &scenario());

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let out_a = solve(&request, &view, &mut rng_a).unwrap();
        let out_b = solve(&request, &view, &mut rng_b).unwrap();

        assert_eq!(out_a, out_b);
    }

    #[test]
    fn ratio_scoring_favors_the_low_input_strategy() {
        let request = request();
        let view = EconomicView::resolve(&request, &scenario());
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = solve(&request, &view, &mut rng).expect("method should run");

        // Profit volatility is proportional to yield while cost is certain,
        // so mean/std is maximized near zero input: every rate collapses.
        assert!(outcome.rates[0] < 10.0, "N = {}", outcome.rates[0]);
        assert!(outcome.rates[1] < 10.0, "P = {}", outcome.rates[1]);
        assert!(outcome.rates[2] < 10.0, "K = {}", outcome.rates[2]);
    }
}
