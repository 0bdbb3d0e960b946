//! interaction — pairwise nutrient synergy/antagonism estimation.
//!
//! Purpose
//! -------
//! Estimate, for every unordered nutrient pair, whether the pair acts
//! synergistically or antagonistically on yield, from the correlation of
//! each nutrient's application rates with observed yields.
//!
//! Key behaviors
//! -------------
//! - Filter to observations carrying rates for both nutrients; fewer than
//!   [`MIN_JOINT_OBSERVATIONS`] joint records yields strength 0 (no claim).
//! - Compute the interaction strength as the mean of the two Pearson
//!   rate-vs-yield correlations minus the fixed [`STRENGTH_BASELINE`].
//! - Compare against the crop profile's prior expectation and report the
//!   deviation.
//!
//! Invariants & assumptions
//! ------------------------
//! - `strength ∈ [−1, 1]` after clamping.
//! - The estimator is a deliberate approximation, **not** an interaction
//!   ANOVA: it does not control for confounding from simultaneously varied
//!   rates. The formula is preserved exactly for behavioral parity with
//!   the established reports; a response-surface interaction term would be
//!   materially different and should not be substituted silently.
//!
//! Downstream usage
//! ----------------
//! - `analysis::analyze` runs this over all observed nutrients and attaches
//!   the effects to the response report.

use crate::config::CropProfile;
use crate::response::core::data::{Nutrient, NutrientObservation, paired_series};
use crate::utils::pearson;

/// Fixed baseline subtracted from the mean correlation.
pub const STRENGTH_BASELINE: f64 = 0.1;

/// Minimum joint observations required before any claim is made.
pub const MIN_JOINT_OBSERVATIONS: usize = 3;

/// |strength| above this is highly significant.
pub const HIGH_SIGNIFICANCE: f64 = 0.15;

/// |strength| above this (but below the high bar) is moderately significant.
pub const MODERATE_SIGNIFICANCE: f64 = 0.05;

/// Direction of an estimated pairwise effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Synergistic,
    Antagonistic,
    /// No claim: zero strength (including the short-data case).
    Additive,
}

/// Coarse strength tier of an estimated effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Significance {
    Low,
    Moderate,
    High,
}

/// Estimated pairwise interaction between two nutrients.
///
/// Derived data, recomputed per analysis; `deviation` is the estimated
/// strength minus the crop profile's prior expectation for the pair.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionEffect {
    pub nutrient_a: Nutrient,
    pub nutrient_b: Nutrient,
    pub strength: f64,
    pub kind: InteractionKind,
    pub significance: Significance,
    pub expected_strength: f64,
    pub deviation: f64,
}

/// Estimate interaction effects for every unordered pair in `nutrients`.
pub fn analyze(
    observations: &[NutrientObservation], nutrients: &[Nutrient], crop: &CropProfile,
) -> Vec<InteractionEffect> {
    let mut effects = Vec::new();
    for i in 0..nutrients.len() {
        for j in (i + 1)..nutrients.len() {
            effects.push(analyze_pair(observations, nutrients[i], nutrients[j], crop));
        }
    }
    effects
}

/// Estimate the effect for one unordered pair.
fn analyze_pair(
    observations: &[NutrientObservation], a: Nutrient, b: Nutrient, crop: &CropProfile,
) -> InteractionEffect {
    let joint = paired_series(observations, a, b);
    let expected_strength = crop.interaction_prior(a, b);

    let strength = if joint.len() < MIN_JOINT_OBSERVATIONS {
        0.0
    } else {
        let rates_a: Vec<f64> = joint.iter().map(|(ra, _, _)| *ra).collect();
        let rates_b: Vec<f64> = joint.iter().map(|(_, rb, _)| *rb).collect();
        let yields: Vec<f64> = joint.iter().map(|(_, _, y)| *y).collect();
        let mean_corr = 0.5 * (pearson(&rates_a, &yields) + pearson(&rates_b, &yields));
        (mean_corr - STRENGTH_BASELINE).clamp(-1.0, 1.0)
    };

    let kind = if strength > 0.0 {
        InteractionKind::Synergistic
    } else if strength < 0.0 {
        InteractionKind::Antagonistic
    } else {
        InteractionKind::Additive
    };
    let significance = if strength.abs() > HIGH_SIGNIFICANCE {
        Significance::High
    } else if strength.abs() > MODERATE_SIGNIFICANCE {
        Significance::Moderate
    } else {
        Significance::Low
    };

    InteractionEffect {
        nutrient_a: a,
        nutrient_b: b,
        strength,
        kind,
        significance,
        expected_strength,
        deviation: strength - expected_strength,
    }
}
