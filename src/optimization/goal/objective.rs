//! Shared economic primitives the five methods optimize over.
//!
//! Purpose
//! -------
//! Resolve one scenario's economics (curves + effective prices) into a
//! single view with the three primitives every method needs: expected
//! yield, strategy cost, and expected profit over the `(N, P, K)` decision
//! vector. Also hosts strategy construction and the budget repair step.
//!
//! Conventions
//! -----------
//! - Expected yield combines the curve set as the mean zero-rate baseline
//!   plus each nutrient's marginal gain `predict(rᵢ) − predict(0)`. This
//!   is monotone in every rate, reduces to `predict(r)` for a single
//!   curve, and avoids double-counting the baseline that a plain mean of
//!   predictions would introduce.
//! - Nutrients without a fitted curve contribute cost but no yield gain,
//!   so optimizers naturally drive their rates toward zero.
//! - Prices resolve scenario-first, then request-level; validation has
//!   already guaranteed a positive price for every curve nutrient.

use crate::optimization::goal::types::{
    FertilizerStrategy, OptimizationRequest, OptimizationScenario,
};
use crate::optimization::solvers::Point;
use crate::response::core::curve::ResponseCurve;
use crate::response::core::data::Nutrient;

/// One scenario's resolved economics.
pub struct EconomicView<'a> {
    pub curves: &'a [ResponseCurve],
    pub crop_price: f64,
    /// Effective fertilizer prices in `(N, P, K)` order.
    pub prices: [f64; 3],
}

impl<'a> EconomicView<'a> {
    /// Resolve the effective view for one scenario of a request.
    pub fn resolve(request: &'a OptimizationRequest, scenario: &OptimizationScenario) -> Self {
        let price_for = |nutrient: Nutrient| -> f64 {
            scenario
                .price_scenario
                .get(&nutrient)
                .or_else(|| request.fertilizer_prices.get(&nutrient))
                .copied()
                .unwrap_or(0.0)
        };
        Self {
            curves: &request.curves,
            crop_price: request.crop_price,
            prices: [
                price_for(Nutrient::Nitrogen),
                price_for(Nutrient::Phosphorus),
                price_for(Nutrient::Potassium),
            ],
        }
    }

    /// Expected yield for a rate vector: mean zero-rate baseline across
    /// the curve set plus per-nutrient marginal gains, floored at zero.
    pub fn expected_yield(&self, rates: &Point) -> f64 {
        if self.curves.is_empty() {
            return 0.0;
        }
        let mut baseline = 0.0;
        let mut gains = 0.0;
        for curve in self.curves {
            let at_zero = curve.predict_clamped(0.0);
            baseline += at_zero;
            let rate = rates[rate_index(curve.nutrient)];
            gains += curve.predict_clamped(rate) - at_zero;
        }
        (baseline / self.curves.len() as f64 + gains).max(0.0)
    }

    /// Total fertilizer cost `Σ rateᵢ · priceᵢ`.
    pub fn cost(&self, rates: &Point) -> f64 {
        (0..3).map(|i| rates[i] * self.prices[i]).sum()
    }

    /// Expected profit `yield · crop_price − cost`.
    pub fn profit(&self, rates: &Point) -> f64 {
        self.expected_yield(rates) * self.crop_price - self.cost(rates)
    }

    /// Materialize a rate vector into a strategy with its derived cost.
    pub fn strategy(&self, rates: &Point) -> FertilizerStrategy {
        FertilizerStrategy {
            nitrogen_rate: rates[0],
            phosphorus_rate: rates[1],
            potassium_rate: rates[2],
            micronutrient_rates: Default::default(),
            total_cost: self.cost(rates),
        }
    }

    /// Proportionally scale rates down so cost fits the budget exactly.
    ///
    /// The optimizers treat the budget as a soft penalty during search;
    /// this repair makes the hard form of the constraint hold on the
    /// returned strategy. Within-budget vectors pass through unchanged.
    /// The scale factor is shaved by a few ulps so rounding in the cost
    /// recomputation cannot push the result back over the budget.
    pub fn repair_budget(&self, rates: &Point, budget: f64) -> Point {
        let cost = self.cost(rates);
        if cost <= budget || cost <= 0.0 {
            return rates.clone();
        }
        let scale = (budget / cost) * (1.0 - 4.0 * f64::EPSILON);
        rates * scale
    }
}

/// Decision-vector index of a nutrient.
pub fn rate_index(nutrient: Nutrient) -> usize {
    match nutrient {
        Nutrient::Nitrogen => 0,
        Nutrient::Phosphorus => 1,
        Nutrient::Potassium => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::goal::types::*;
    use crate::response::core::curve::ModelKind;
    use ndarray::Array1;
    use std::collections::BTreeMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests pin the expected-yield combination rule, price
    // resolution order, and the budget repair arithmetic on curves with
    // trivially predictable values.
    // -------------------------------------------------------------------------

    fn linear_curve(nutrient: Nutrient, base: f64, slope: f64) -> ResponseCurve {
        ResponseCurve {
            nutrient,
            kind: ModelKind::LinearPlateau,
            parameters: vec![base, slope, 1000.0],
            r_squared: 1.0,
            rmse: 0.0,
            mse: 0.0,
            source_points: vec![(0.0, base), (100.0, base + slope * 100.0), (200.0, base + slope * 200.0)],
            predicted_curve: Vec::new(),
        }
    }

    fn request_with(curves: Vec<ResponseCurve>) -> OptimizationRequest {
        let mut prices = BTreeMap::new();
        prices.insert(Nutrient::Nitrogen, 0.5);
        prices.insert(Nutrient::Phosphorus, 0.6);
        prices.insert(Nutrient::Potassium, 0.45);
        OptimizationRequest {
            crop: "corn".to_string(),
            objective: OptimizationObjective::MaximizeProfit,
            method: OptimizationMethod::GoalProgramming,
            constraints: OptimizationConstraints::default(),
            scenarios: Vec::new(),
            curves,
            crop_price: 5.0,
            fertilizer_prices: prices,
            options: OptimizerOptions::default(),
        }
    }

    fn scenario() -> OptimizationScenario {
        OptimizationScenario {
            kind: ScenarioKind::Baseline,
            yield_goal: 200.0,
            price_scenario: BTreeMap::new(),
            risk_tolerance: 0.5,
            probability_weight: 1.0,
        }
    }

    #[test]
    // Purpose
    // -------
    // Two linear curves with bases 100/120 and slopes 0.5/0.2: baseline is
    // the mean (110) and gains add per applied rate.
    fn expected_yield_is_baseline_plus_marginal_gains() {
        let request = request_with(vec![
            linear_curve(Nutrient::Nitrogen, 100.0, 0.5),
            linear_curve(Nutrient::Phosphorus, 120.0, 0.2),
        ]);
        let view = EconomicView::resolve(&request, &scenario());

        let rates = Array1::from(vec![100.0, 50.0, 0.0]);
        let expected = view.expected_yield(&rates);

        // 110 + 0.5·100 + 0.2·50 = 170.
        assert!((expected - 170.0).abs() < 1e-9, "expected = {expected}");
    }

    #[test]
    fn single_curve_reduces_to_its_own_prediction() {
        let request = request_with(vec![linear_curve(Nutrient::Nitrogen, 100.0, 0.5)]);
        let view = EconomicView::resolve(&request, &scenario());

        let rates = Array1::from(vec![80.0, 0.0, 0.0]);
        assert!((view.expected_yield(&rates) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_prices_override_request_prices() {
        let request = request_with(vec![linear_curve(Nutrient::Nitrogen, 100.0, 0.5)]);
        let mut scenario = scenario();
        scenario.price_scenario.insert(Nutrient::Nitrogen, 2.0);
        let view = EconomicView::resolve(&request, &scenario);

        let rates = Array1::from(vec![10.0, 10.0, 10.0]);
        // N at the scenario price 2.0, P/K at request prices 0.6/0.45.
        assert!((view.cost(&rates) - (20.0 + 6.0 + 4.5)).abs() < 1e-9);
    }

    #[test]
    fn budget_repair_scales_proportionally_and_preserves_feasible_vectors() {
        let request = request_with(vec![linear_curve(Nutrient::Nitrogen, 100.0, 0.5)]);
        let view = EconomicView::resolve(&request, &scenario());

        let over = Array1::from(vec![100.0, 50.0, 75.0]);
        let cost = view.cost(&over);
        assert!(cost > 10.0);

        let repaired = view.repair_budget(&over, 10.0);
        assert!((view.cost(&repaired) - 10.0).abs() < 1e-9);
        // Proportions preserved.
        assert!((repaired[0] / repaired[1] - 2.0).abs() < 1e-9);

        let within = Array1::from(vec![1.0, 1.0, 1.0]);
        assert_eq!(view.repair_budget(&within, 10.0), within);
    }
}
