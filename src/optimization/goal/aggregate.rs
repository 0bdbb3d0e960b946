//! Cross-scenario reduction: best strategy, risk tiers, recommendations.
//!
//! Purpose
//! -------
//! Reduce the per-scenario outcomes to a single recommended strategy and
//! an aggregate risk assessment:
//! - the best strategy maximizes
//!   `0.4·P(yield) + 0.4·P(profit) + 0.2·(1 − σ_yield/50)`;
//! - the overall risk level classifies the scenario-probability-weighted
//!   average of the yield and profit probabilities at the 0.8/0.6/0.4
//!   tier thresholds;
//! - recommendations render the selected strategy and risk posture as
//!   caller-facing text.
//!
//! Conventions
//! -----------
//! - Weighted averages use the scenarios' probability weights as given
//!   (callers own making them sum toward 1.0), so the reported values are
//!   exactly `Σ wᵢ·pᵢ`.
//! - Score ties resolve to the earlier scenario, keeping the reduction
//!   deterministic.

use crate::optimization::goal::types::{
    OptimizationRequest, RiskAssessment, RiskLevel, ScenarioOutcome,
};

/// Weight of each term in the best-strategy score.
pub const SCORE_WEIGHTS: [f64; 3] = [0.4, 0.4, 0.2];

/// Yield-volatility scale (in yield units) in the score's stability term.
pub const VOLATILITY_SCALE: f64 = 50.0;

/// Risk-tier thresholds on the combined weighted probability.
pub const TIER_THRESHOLDS: [f64; 3] = [0.8, 0.6, 0.4];

/// Best-strategy score of one outcome.
pub fn strategy_score(outcome: &ScenarioOutcome) -> f64 {
    let sigma_yield = outcome.risk_metrics.get("yield_volatility").copied().unwrap_or(0.0);
    SCORE_WEIGHTS[0] * outcome.yield_probability
        + SCORE_WEIGHTS[1] * outcome.profit_probability
        + SCORE_WEIGHTS[2] * (1.0 - sigma_yield / VOLATILITY_SCALE)
}

/// Index of the best outcome (ties resolve to the earlier scenario).
pub fn select_best(outcomes: &[ScenarioOutcome]) -> usize {
    let mut best_idx = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, outcome) in outcomes.iter().enumerate() {
        let score = strategy_score(outcome);
        if score > best_score {
            best_score = score;
            best_idx = i;
        }
    }
    best_idx
}

/// Probability-weighted risk assessment across all outcomes.
pub fn assess_risk(outcomes: &[ScenarioOutcome]) -> RiskAssessment {
    let weighted_yield_probability: f64 = outcomes
        .iter()
        .map(|o| o.scenario.probability_weight * o.yield_probability)
        .sum();
    let weighted_profit_probability: f64 = outcomes
        .iter()
        .map(|o| o.scenario.probability_weight * o.profit_probability)
        .sum();

    let combined = 0.5 * (weighted_yield_probability + weighted_profit_probability);
    let level = if combined >= TIER_THRESHOLDS[0] {
        RiskLevel::Low
    } else if combined >= TIER_THRESHOLDS[1] {
        RiskLevel::Medium
    } else if combined >= TIER_THRESHOLDS[2] {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    };

    let notes = vec![
        format!("weighted yield-goal probability: {weighted_yield_probability:.3}"),
        format!("weighted profitability probability: {weighted_profit_probability:.3}"),
        format!("{} scenarios aggregated", outcomes.len()),
    ];

    RiskAssessment { level, weighted_yield_probability, weighted_profit_probability, notes }
}

/// Caller-facing recommendation text for the selected strategy.
pub fn recommendations(
    best: &ScenarioOutcome, risk: &RiskAssessment, request: &OptimizationRequest,
) -> Vec<String> {
    let strategy = &best.strategy;
    let mut lines = vec![format!(
        "Apply N {:.1} / P {:.1} / K {:.1} rate units (total cost {:.2}) for an expected yield of {:.1}.",
        strategy.nitrogen_rate,
        strategy.phosphorus_rate,
        strategy.potassium_rate,
        strategy.total_cost,
        best.expected_yield,
    )];

    let utilization = strategy.total_cost / request.constraints.budget_limit;
    if utilization > 0.9 {
        lines.push(format!(
            "Budget utilization is {:.0}% — consider raising the budget if the yield goal is firm.",
            100.0 * utilization
        ));
    }

    match risk.level {
        RiskLevel::Low => {
            lines.push("Risk posture is low; the plan is robust to moderate price and weather variation.".to_string());
        }
        RiskLevel::Medium => {
            lines.push("Risk posture is medium; re-run the analysis if prices move materially.".to_string());
        }
        RiskLevel::High => {
            lines.push("Risk posture is high; the yield goal is ambitious for these curves and prices.".to_string());
        }
        RiskLevel::Critical => {
            lines.push("Risk posture is critical; the goal is unlikely to be met — revisit the goal or the budget.".to_string());
        }
    }

    if best.expected_yield < best.scenario.yield_goal {
        lines.push(format!(
            "Expected yield {:.1} falls short of the {:.1} goal under the selected constraints.",
            best.expected_yield, best.scenario.yield_goal
        ));
    }

    lines
}
