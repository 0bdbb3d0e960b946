//! Per-scenario post-processing: probabilities, risk metrics, sensitivity.
//!
//! Purpose
//! -------
//! Turn a method's raw rate vector into a full [`ScenarioOutcome`]:
//! expected yield and profit from the scenario's economic view, success
//! probabilities under the fixed-CV normal uncertainty models, tail-risk
//! metrics, and profit sensitivity to ±10% price moves.
//!
//! Conventions
//! -----------
//! - Yield uncertainty: `σ_y = 0.15 · E[yield]`; the goal probability is
//!   `1 − Φ(goal; E[yield], σ_y)`.
//! - Profit uncertainty: `σ_p = 0.2 · |E[profit]|`; the profitability
//!   probability is `1 − Φ(0; E[profit], σ_p)`. With a profit-proportional
//!   σ this saturates near 1 for any clearly positive profit — preserved
//!   deliberately for behavioral parity.
//! - Degenerate σ (zero expectation) degrades to the step function, with
//!   0.5 exactly at the threshold.
//! - Risk metrics: 95% value-at-risk `profit − 1.96σ_p`, a 97.5%-style
//!   conditional VaR `profit − 2.33σ_p`, and the naive Sharpe
//!   `profit / σ_p`.

use std::collections::BTreeMap;

use statrs::distribution::{ContinuousCDF, Normal};

use crate::optimization::goal::methods::MethodOutcome;
use crate::optimization::goal::objective::EconomicView;
use crate::optimization::goal::types::{OptimizationScenario, ScenarioOutcome};

/// Coefficient of variation of the yield uncertainty model.
pub const YIELD_UNCERTAINTY_CV: f64 = 0.15;

/// Coefficient of variation of the profit uncertainty model.
pub const PROFIT_UNCERTAINTY_CV: f64 = 0.20;

/// z-quantile for the 95% value-at-risk.
pub const VAR_95_Z: f64 = 1.96;

/// z-quantile for the 97.5%-style conditional value-at-risk.
pub const CVAR_Z: f64 = 2.33;

/// Upper-tail probability `P(X > threshold)` for `X ~ N(mean, sigma)`,
/// degrading to a step function when `sigma` is zero.
fn exceedance_probability(mean: f64, sigma: f64, threshold: f64) -> f64 {
    if sigma <= f64::EPSILON {
        return if mean > threshold {
            1.0
        } else if mean < threshold {
            0.0
        } else {
            0.5
        };
    }
    let normal = Normal::new(mean, sigma).expect("sigma checked positive");
    1.0 - normal.cdf(threshold)
}

/// Build the full outcome for one scenario from a method's rates.
pub fn assess(
    scenario: &OptimizationScenario, method: MethodOutcome, view: &EconomicView<'_>,
) -> ScenarioOutcome {
    let rates = &method.rates;
    let strategy = view.strategy(rates);

    let expected_yield = view.expected_yield(rates);
    let sigma_yield = YIELD_UNCERTAINTY_CV * expected_yield;
    let yield_probability =
        exceedance_probability(expected_yield, sigma_yield, scenario.yield_goal);

    let expected_profit = expected_yield * view.crop_price - strategy.total_cost;
    let sigma_profit = PROFIT_UNCERTAINTY_CV * expected_profit.abs();
    let profit_probability = exceedance_probability(expected_profit, sigma_profit, 0.0);

    let mut risk_metrics = BTreeMap::new();
    risk_metrics.insert("value_at_risk_95".to_string(), expected_profit - VAR_95_Z * sigma_profit);
    risk_metrics.insert(
        "conditional_value_at_risk_975".to_string(),
        expected_profit - CVAR_Z * sigma_profit,
    );
    risk_metrics.insert(
        "sharpe_ratio".to_string(),
        if sigma_profit > 0.0 { expected_profit / sigma_profit } else { 0.0 },
    );
    risk_metrics.insert("yield_volatility".to_string(), sigma_yield);
    risk_metrics.insert("profit_volatility".to_string(), sigma_profit);

    let revenue = expected_yield * view.crop_price;
    let mut sensitivity = BTreeMap::new();
    sensitivity.insert("crop_price_up_10pct".to_string(), 0.1 * revenue);
    sensitivity.insert("crop_price_down_10pct".to_string(), -0.1 * revenue);
    sensitivity.insert("fertilizer_cost_up_10pct".to_string(), -0.1 * strategy.total_cost);
    sensitivity.insert("fertilizer_cost_down_10pct".to_string(), 0.1 * strategy.total_cost);

    ScenarioOutcome {
        scenario: scenario.clone(),
        strategy,
        expected_yield,
        yield_probability,
        expected_profit,
        profit_probability,
        risk_metrics,
        sensitivity,
        warnings: method.warnings,
    }
}
