//! Observation data carriers — nutrients, historical records, series extraction.
//!
//! Purpose
//! -------
//! Define the immutable input types the modeling pipeline reads: the
//! [`Nutrient`] key, the caller-owned [`NutrientObservation`] record, and
//! the extraction of a per-nutrient `(rate, yield)` series from a list of
//! observations.
//!
//! Invariants & assumptions
//! ------------------------
//! - Observations are immutable once recorded; the crate only reads slices
//!   of them and never takes ownership.
//! - `nutrient_rates` is a `BTreeMap` so iteration order — and therefore
//!   every derived report — is deterministic across runs.
//! - Finiteness/non-negativity of rates and yields is validated at the
//!   fitter boundary ([`extract_series`] callers), not on construction, so
//!   callers can build observations infallibly from request payloads.
//!
//! Downstream usage
//! ----------------
//! - The fitter consumes [`extract_series`] output for one nutrient at a
//!   time; the interaction analyzer pairs series for two nutrients at once
//!   via [`paired_series`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::response::errors::{FitError, FitResult};

/// Minimum number of observations required to fit any response curve.
pub const MIN_OBSERVATIONS: usize = 3;

/// Macronutrient identifier used as the key of every per-nutrient map.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names as well
/// as the single-letter symbols (`"n"`, `"p"`, `"k"`). Unknown names return
/// a descriptive error string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    /// Lowercase name used in price-map keys (`"{nutrient}_price_per_unit"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "nitrogen",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::Potassium => "potassium",
        }
    }

    /// All supported nutrients, in map-key order.
    pub fn all() -> [Nutrient; 3] {
        [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium]
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nutrient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nitrogen" | "n" => Ok(Nutrient::Nitrogen),
            "phosphorus" | "p" => Ok(Nutrient::Phosphorus),
            "potassium" | "k" => Ok(Nutrient::Potassium),
            other => Err(format!(
                "unknown nutrient '{other}', expected nitrogen, phosphorus, or potassium"
            )),
        }
    }
}

/// One historical field record: applied rates per nutrient, observed yield,
/// and the season it was recorded in. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientObservation {
    /// Application rate per nutrient; absent keys mean the nutrient was not
    /// recorded for this observation (not that the rate was zero).
    pub nutrient_rates: BTreeMap<Nutrient, f64>,
    /// Observed yield per unit area.
    pub yield_per_area: f64,
    /// Season/year the record was taken.
    pub year: i32,
}

impl NutrientObservation {
    pub fn new(nutrient_rates: BTreeMap<Nutrient, f64>, yield_per_area: f64, year: i32) -> Self {
        Self { nutrient_rates, yield_per_area, year }
    }

    /// Convenience constructor for a single-nutrient record.
    pub fn single(nutrient: Nutrient, rate: f64, yield_per_area: f64, year: i32) -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(nutrient, rate);
        Self { nutrient_rates: rates, yield_per_area, year }
    }
}

/// Extract the validated `(rate, yield)` series for one nutrient.
///
/// Only observations carrying a rate for `nutrient` contribute. The series
/// is checked for the fitter's hard preconditions:
/// - at least [`MIN_OBSERVATIONS`] points,
/// - all rates and yields finite,
/// - all rates and yields non-negative.
///
/// # Errors
/// - [`FitError::InsufficientData`] when fewer than [`MIN_OBSERVATIONS`]
///   observations carry a rate for `nutrient`.
/// - [`FitError::NonFiniteObservation`] / [`FitError::NegativeObservation`]
///   on the first offending value, indexed into the extracted series.
pub fn extract_series(
    observations: &[NutrientObservation], nutrient: Nutrient,
) -> FitResult<Vec<(f64, f64)>> {
    let series: Vec<(f64, f64)> = observations
        .iter()
        .filter_map(|obs| obs.nutrient_rates.get(&nutrient).map(|r| (*r, obs.yield_per_area)))
        .collect();

    if series.len() < MIN_OBSERVATIONS {
        return Err(FitError::InsufficientData {
            nutrient,
            needed: MIN_OBSERVATIONS,
            actual: series.len(),
        });
    }
    for (i, (rate, yield_val)) in series.iter().enumerate() {
        for value in [*rate, *yield_val] {
            if !value.is_finite() {
                return Err(FitError::NonFiniteObservation { nutrient, index: i, value });
            }
            if value < 0.0 {
                return Err(FitError::NegativeObservation { nutrient, index: i, value });
            }
        }
    }
    Ok(series)
}

/// Extract the joint `(rate_a, rate_b, yield)` triples for a nutrient pair.
///
/// Only observations carrying rates for **both** nutrients contribute. No
/// minimum length is enforced here; the interaction analyzer treats short
/// joint series as "no claim" rather than an error.
pub fn paired_series(
    observations: &[NutrientObservation], a: Nutrient, b: Nutrient,
) -> Vec<(f64, f64, f64)> {
    observations
        .iter()
        .filter_map(|obs| {
            match (obs.nutrient_rates.get(&a), obs.nutrient_rates.get(&b)) {
                (Some(ra), Some(rb)) => Some((*ra, *rb, obs.yield_per_area)),
                _ => None,
            }
        })
        .collect()
}

/// All nutrients that appear in at least one observation, in key order.
pub fn observed_nutrients(observations: &[NutrientObservation]) -> Vec<Nutrient> {
    Nutrient::all()
        .into_iter()
        .filter(|n| observations.iter().any(|obs| obs.nutrient_rates.contains_key(n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Series extraction filtering and its hard preconditions (length,
    //   finiteness, non-negativity).
    // - Joint-pair extraction requiring both rates to be present.
    // - Nutrient parsing, including symbols and the error branch.
    //
    // They intentionally DO NOT cover fitting behavior on the extracted
    // series; that belongs to the fitter tests.
    // -------------------------------------------------------------------------

    fn obs(n_rate: Option<f64>, p_rate: Option<f64>, yield_val: f64) -> NutrientObservation {
        let mut rates = BTreeMap::new();
        if let Some(r) = n_rate {
            rates.insert(Nutrient::Nitrogen, r);
        }
        if let Some(r) = p_rate {
            rates.insert(Nutrient::Phosphorus, r);
        }
        NutrientObservation::new(rates, yield_val, 2023)
    }

    #[test]
    fn extract_series_filters_to_the_requested_nutrient() {
        let observations = vec![
            obs(Some(0.0), Some(20.0), 120.0),
            obs(Some(50.0), None, 150.0),
            obs(None, Some(40.0), 160.0),
            obs(Some(100.0), Some(60.0), 180.0),
        ];

        let series = extract_series(&observations, Nutrient::Nitrogen)
            .expect("three nitrogen observations should extract");

        assert_eq!(series, vec![(0.0, 120.0), (50.0, 150.0), (100.0, 180.0)]);
    }

    #[test]
    fn extract_series_rejects_short_nonfinite_and_negative_input() {
        // Too few points for phosphorus (only two carry a P rate).
        let short = vec![obs(None, Some(1.0), 10.0), obs(None, Some(2.0), 11.0)];
        match extract_series(&short, Nutrient::Phosphorus) {
            Err(FitError::InsufficientData { needed: 3, actual: 2, .. }) => {}
            other => panic!("expected InsufficientData, got {:?}", other),
        }

        let nonfinite =
            vec![obs(Some(0.0), None, 10.0), obs(Some(f64::NAN), None, 11.0), obs(Some(2.0), None, 12.0)];
        assert!(matches!(
            extract_series(&nonfinite, Nutrient::Nitrogen),
            Err(FitError::NonFiniteObservation { index: 1, .. })
        ));

        let negative =
            vec![obs(Some(0.0), None, 10.0), obs(Some(1.0), None, -3.0), obs(Some(2.0), None, 12.0)];
        assert!(matches!(
            extract_series(&negative, Nutrient::Nitrogen),
            Err(FitError::NegativeObservation { index: 1, .. })
        ));
    }

    #[test]
    fn paired_series_requires_both_rates() {
        let observations = vec![
            obs(Some(10.0), Some(20.0), 100.0),
            obs(Some(30.0), None, 110.0),
            obs(Some(50.0), Some(60.0), 120.0),
        ];

        let joint = paired_series(&observations, Nutrient::Nitrogen, Nutrient::Phosphorus);

        assert_eq!(joint, vec![(10.0, 20.0, 100.0), (50.0, 60.0, 120.0)]);
    }

    #[test]
    fn nutrient_parsing_accepts_names_and_symbols() {
        assert_eq!("Nitrogen".parse::<Nutrient>().unwrap(), Nutrient::Nitrogen);
        assert_eq!("k".parse::<Nutrient>().unwrap(), Nutrient::Potassium);
        assert!("boron".parse::<Nutrient>().is_err());
    }
}
