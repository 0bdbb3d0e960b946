//! Robust optimization: hedge against yield uncertainty.
//!
//! Rather than optimizing a single point estimate, this method maximizes
//! the *mean* profit across a fixed panel of yield-perturbed draws
//! (multiplicative noise ~ N(0, 10%)), searched globally by differential
//! evolution. The panel is drawn once per solve from the caller-seeded
//! RNG — a sample-average approximation — so the objective is
//! deterministic during the search and the whole method reproduces under
//! a fixed seed.

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

/// Coefficient of variation of the yield perturbations.
pub const YIELD_NOISE_CV: f64 = 0.10;

pub fn solve(
    request: &OptimizationRequest, view: &EconomicView<'_>, rng: &mut StdRng,
) -> OptResult<MethodOutcome> {
    let bounds = constraint_bounds(request);

    // Fixed perturbation panel: one multiplicative factor per draw.
    let noise = Normal::new(0.0, YIELD_NOISE_CV).expect("positive standard deviation");
    let factors: Vec<f64> =
        (0..request.options.perturbations).map(|_| 1.0 + noise.sample(rng)).collect();

    let objective = |rates: &Point| -> f64 {
        let base_yield = view.expected_yield(rates);
        let cost = view.cost(rates);
        let mean_profit = factors
            .iter()
            .map(|f| (base_yield * f).max(0.0) * view.crop_price - cost)
            .sum::<f64>()
            / factors.len() as f64;
        -mean_profit
    };

    let config = DifferentialEvolution {
        population: request.options.population,
        generations: request.options.max_iterations,
        ..Default::default()
    };
    let outcome = minimize_de(&objective, &bounds, &config, rng)?;

    Ok(MethodOutcome { rates: outcome.x, warnings: Vec::new() })
}
