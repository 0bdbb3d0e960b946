//! economics — profit-driven rate analysis over a fitted response curve.
//!
//! Purpose
//! -------
//! Derive the economically meaningful application rates from a fitted
//! [`ResponseCurve`] and a `(fertilizer_price, crop_price)` pair: the
//! profit-maximizing rate, the maximum-yield rate, the rate hitting 95% of
//! the crop's typical maximum yield, the marginal break-even rate, and the
//! profitable-rate bounds.
//!
//! Key behaviors
//! -------------
//! - All searches run over a dense rate grid ([`RateGrid`], default 1000
//!   samples over `[0, 300]`) rather than closed form, so every model
//!   family is handled uniformly regardless of shape.
//! - Marginals use a forward finite difference with Δ = 1.0 rate unit;
//!   break-even is the first ascending grid point where marginal revenue
//!   matches marginal cost within [`BREAK_EVEN_TOLERANCE`].
//! - Profitability bounds scan forward/backward for the first/last grid
//!   point with strictly positive profit.
//!
//! Invariants & assumptions
//! ------------------------
//! - Predicted yields are clamped at zero before pricing, so profits and
//!   reported yields never reflect negative production.
//! - For a strictly concave profit function, the reported rates satisfy
//!   `minimum_profitable ≤ economic_optimal ≤ maximum_profitable` whenever
//!   all three exist.
//! - The grid upper bound is configuration, not a constant: callers
//!   needing rates beyond 300 units extend [`RateGrid::max_rate`] instead
//!   of editing search code.
//!
//! Downstream usage
//! ----------------
//! - `analysis::analyze` computes one [`OptimalRateAnalysis`] and one
//!   [`EconomicThreshold`] per fitted nutrient curve.

use crate::config::CropProfile;
use crate::response::core::curve::ResponseCurve;
use crate::response::core::data::Nutrient;

/// Tolerance for matching marginal revenue to marginal cost.
pub const BREAK_EVEN_TOLERANCE: f64 = 0.01;

/// Forward-difference step (in rate units) for marginal yield.
pub const MARGINAL_DELTA: f64 = 1.0;

/// Fraction of the crop's typical maximum yield targeted by
/// `target_yield_rate`.
pub const TARGET_YIELD_FRACTION: f64 = 0.95;

/// Result alias for economic computations.
pub type EconResult<T> = Result<T, EconError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EconError {
    /// Prices must be finite and strictly positive.
    InvalidPrice {
        which: &'static str,
        value: f64,
    },

    /// The rate grid must span a positive range with at least two samples.
    InvalidGrid {
        reason: &'static str,
    },
}

impl std::error::Error for EconError {}

impl std::fmt::Display for EconError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EconError::InvalidPrice { which, value } => {
                write!(f, "Invalid {which} price {value}: must be finite and > 0")
            }
            EconError::InvalidGrid { reason } => write!(f, "Invalid rate grid: {reason}"),
        }
    }
}

/// Dense search grid over application rates.
///
/// The source system hardcoded `[0, 300]` with 1000 samples in several
/// places; here the bound is explicit configuration with that default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateGrid {
    pub max_rate: f64,
    pub samples: usize,
}

impl RateGrid {
    /// Construct a validated grid.
    ///
    /// # Errors
    /// - `EconError::InvalidGrid` for a non-positive/non-finite range or
    ///   fewer than two samples.
    pub fn new(max_rate: f64, samples: usize) -> EconResult<Self> {
        if !max_rate.is_finite() || max_rate <= 0.0 {
            return Err(EconError::InvalidGrid { reason: "max_rate must be finite and > 0" });
        }
        if samples < 2 {
            return Err(EconError::InvalidGrid { reason: "at least two samples are required" });
        }
        Ok(Self { max_rate, samples })
    }

    /// Evenly spaced rates from 0 to `max_rate` inclusive.
    pub fn points(&self) -> Vec<f64> {
        let step = self.max_rate / (self.samples - 1) as f64;
        (0..self.samples).map(|i| step * i as f64).collect()
    }
}

impl Default for RateGrid {
    fn default() -> Self {
        Self { max_rate: 300.0, samples: 1000 }
    }
}

/// Per-nutrient optimal-rate summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalRateAnalysis {
    pub nutrient: Nutrient,
    /// Rate maximizing `yield·crop_price − rate·fertilizer_price`.
    pub economic_optimal_rate: f64,
    /// Rate maximizing predicted yield.
    pub max_yield_rate: f64,
    /// Rate whose predicted yield is closest to 95% of the crop's typical
    /// maximum yield.
    pub target_yield_rate: f64,
    pub yield_at_optimal: f64,
    pub profit_at_optimal: f64,
}

/// Per-nutrient break-even and profitability bounds.
///
/// Each field is `None` when the condition is never met on the grid (e.g.
/// no profitable rate exists at the given prices).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomicThreshold {
    pub nutrient: Nutrient,
    pub break_even_rate: Option<f64>,
    pub minimum_profitable_rate: Option<f64>,
    pub maximum_profitable_rate: Option<f64>,
}

fn validate_prices(fertilizer_price: f64, crop_price: f64) -> EconResult<()> {
    if !fertilizer_price.is_finite() || fertilizer_price <= 0.0 {
        return Err(EconError::InvalidPrice { which: "fertilizer", value: fertilizer_price });
    }
    if !crop_price.is_finite() || crop_price <= 0.0 {
        return Err(EconError::InvalidPrice { which: "crop", value: crop_price });
    }
    Ok(())
}

#[inline]
fn profit_at(curve: &ResponseCurve, rate: f64, fertilizer_price: f64, crop_price: f64) -> f64 {
    curve.predict_clamped(rate) * crop_price - rate * fertilizer_price
}

/// Grid search for the optimal-rate summary of one curve.
///
/// # Errors
/// - `EconError::InvalidPrice` for non-positive prices.
pub fn optimal_rates(
    curve: &ResponseCurve, fertilizer_price: f64, crop_price: f64, profile: &CropProfile,
    grid: &RateGrid,
) -> EconResult<OptimalRateAnalysis> {
    validate_prices(fertilizer_price, crop_price)?;
    let points = grid.points();
    let target_yield = TARGET_YIELD_FRACTION * profile.typical_max_yield;

    let mut best_profit = f64::NEG_INFINITY;
    let mut economic_optimal_rate = 0.0;
    let mut best_yield = f64::NEG_INFINITY;
    let mut max_yield_rate = 0.0;
    let mut best_target_gap = f64::INFINITY;
    let mut target_yield_rate = 0.0;

    for rate in &points {
        let predicted = curve.predict_clamped(*rate);
        let profit = predicted * crop_price - rate * fertilizer_price;
        if profit > best_profit {
            best_profit = profit;
            economic_optimal_rate = *rate;
        }
        if predicted > best_yield {
            best_yield = predicted;
            max_yield_rate = *rate;
        }
        let gap = (predicted - target_yield).abs();
        if gap < best_target_gap {
            best_target_gap = gap;
            target_yield_rate = *rate;
        }
    }

    Ok(OptimalRateAnalysis {
        nutrient: curve.nutrient,
        economic_optimal_rate,
        max_yield_rate,
        target_yield_rate,
        yield_at_optimal: curve.predict_clamped(economic_optimal_rate),
        profit_at_optimal: best_profit,
    })
}

/// Grid search for break-even and profitability bounds of one curve.
///
/// # Errors
/// - `EconError::InvalidPrice` for non-positive prices.
pub fn thresholds(
    curve: &ResponseCurve, fertilizer_price: f64, crop_price: f64, grid: &RateGrid,
) -> EconResult<EconomicThreshold> {
    validate_prices(fertilizer_price, crop_price)?;
    let points = grid.points();

    // First ascending rate where marginal revenue ≈ marginal cost.
    let break_even_rate = points.iter().copied().find(|rate| {
        let marginal_yield =
            (curve.predict_clamped(rate + MARGINAL_DELTA) - curve.predict_clamped(*rate))
                / MARGINAL_DELTA;
        let marginal_revenue = marginal_yield * crop_price;
        (marginal_revenue - fertilizer_price).abs() <= BREAK_EVEN_TOLERANCE
    });

    let minimum_profitable_rate = points
        .iter()
        .copied()
        .find(|rate| profit_at(curve, *rate, fertilizer_price, crop_price) > 0.0);
    let maximum_profitable_rate = points
        .iter()
        .rev()
        .copied()
        .find(|rate| profit_at(curve, *rate, fertilizer_price, crop_price) > 0.0);

    Ok(EconomicThreshold {
        nutrient: curve.nutrient,
        break_even_rate,
        minimum_profitable_rate,
        maximum_profitable_rate,
    })
}
