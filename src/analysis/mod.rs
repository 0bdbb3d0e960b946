//! analysis — full yield-response report orchestration.
//!
//! Purpose
//! -------
//! Drive the whole modeling pipeline for one request: per-nutrient data
//! quality checks, curve fitting with model selection, interaction
//! analysis, economic rate derivation, fit validation, and prediction
//! bands — assembled into one [`YieldResponseAnalysis`] value the service
//! layer can serialize.
//!
//! Key behaviors
//! -------------
//! - Hard preconditions (insufficient/invalid observations, missing or
//!   non-positive prices) fail the request before any fitting runs.
//! - Partial-failure semantics for fitting: a nutrient whose four model
//!   families all fail is *omitted* from `nutrient_curves` and reported in
//!   `warnings`; the other nutrients proceed. One degenerate nutrient
//!   never blocks the analysis.
//! - Data-quality findings ride along per nutrient so degradation is
//!   visible without hard failure.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every map in the report is keyed by [`Nutrient`] (`BTreeMap`), so
//!   iteration — and therefore serialization — is deterministic.
//! - `optimal_rates`, `thresholds`, `validations`, and
//!   `confidence_intervals` carry entries exactly for the nutrients in
//!   `nutrient_curves`; `model_comparison` and `data_quality` cover every
//!   attempted nutrient.
//!
//! Downstream usage
//! ----------------
//! - HTTP handlers call [`analyze`] once per request with caller-owned
//!   observations and a price map keyed `"{nutrient}_price_per_unit"` /
//!   `"crop_price_per_unit"` (see [`EconomicParams::from_key_map`]).

use std::collections::BTreeMap;

use crate::config::{CropProfile, lookup_crop};
use crate::economics::{
    EconError, EconResult, EconomicThreshold, OptimalRateAnalysis, RateGrid, optimal_rates,
    thresholds,
};
use crate::interaction::{InteractionEffect, analyze as analyze_interactions};
use crate::response::confidence::{ConfidenceInterval, DiagnosticsError, intervals};
use crate::response::core::curve::ResponseCurve;
use crate::response::core::data::{
    Nutrient, NutrientObservation, extract_series, observed_nutrients,
};
use crate::response::core::quality::{DataQualityReport, assess_series};
use crate::response::errors::FitError;
use crate::response::fitter::{FitOptions, ModelAttempt, fit_series};
use crate::response::validator::{ModelValidation, validate_curve};

/// Unified error type for the analysis entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No observation carries a rate for any supported nutrient.
    NoObservations,

    /// A required economic parameter key is absent.
    MissingParameter {
        key: String,
    },

    /// Hard fitting precondition violated (insufficient/invalid data).
    Fit(FitError),

    /// Price or grid validation failed.
    Econ(EconError),

    /// Confidence-band computation failed.
    Diagnostics(DiagnosticsError),
}

impl std::error::Error for AnalysisError {}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::NoObservations => {
                write!(f, "No observation carries a rate for any supported nutrient")
            }
            AnalysisError::MissingParameter { key } => {
                write!(f, "Missing economic parameter '{key}'")
            }
            AnalysisError::Fit(err) => write!(f, "{err}"),
            AnalysisError::Econ(err) => write!(f, "{err}"),
            AnalysisError::Diagnostics(err) => write!(f, "{err}"),
        }
    }
}

impl From<FitError> for AnalysisError {
    fn from(err: FitError) -> Self {
        AnalysisError::Fit(err)
    }
}

impl From<EconError> for AnalysisError {
    fn from(err: EconError) -> Self {
        AnalysisError::Econ(err)
    }
}

impl From<DiagnosticsError> for AnalysisError {
    fn from(err: DiagnosticsError) -> Self {
        AnalysisError::Diagnostics(err)
    }
}

/// Economic inputs for an analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct EconomicParams {
    pub crop_price: f64,
    pub fertilizer_prices: BTreeMap<Nutrient, f64>,
}

impl EconomicParams {
    /// Parse the wire-level parameter map keyed
    /// `"{nutrient}_price_per_unit"` and `"crop_price_per_unit"`.
    ///
    /// # Errors
    /// - [`AnalysisError::MissingParameter`] when the crop price key is
    ///   absent. Nutrient prices are optional here; their presence is
    ///   enforced per analyzed nutrient by [`analyze`].
    pub fn from_key_map(map: &BTreeMap<String, f64>) -> Result<Self, AnalysisError> {
        let crop_price = *map
            .get("crop_price_per_unit")
            .ok_or_else(|| AnalysisError::MissingParameter {
                key: "crop_price_per_unit".to_string(),
            })?;
        let mut fertilizer_prices = BTreeMap::new();
        for nutrient in Nutrient::all() {
            let key = format!("{}_price_per_unit", nutrient.as_str());
            if let Some(price) = map.get(&key) {
                fertilizer_prices.insert(nutrient, *price);
            }
        }
        Ok(Self { crop_price, fertilizer_prices })
    }

    fn price_for(&self, nutrient: Nutrient) -> EconResult<f64> {
        match self.fertilizer_prices.get(&nutrient) {
            Some(price) if price.is_finite() && *price > 0.0 => Ok(*price),
            Some(price) => {
                Err(EconError::InvalidPrice { which: nutrient.as_str(), value: *price })
            }
            None => Err(EconError::InvalidPrice { which: nutrient.as_str(), value: f64::NAN }),
        }
    }
}

/// Configuration for one analysis request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub grid: RateGrid,
    pub confidence_level: f64,
    pub fit: FitOptions,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { grid: RateGrid::default(), confidence_level: 0.95, fit: FitOptions::default() }
    }
}

/// The assembled per-request report.
#[derive(Debug, Clone, PartialEq)]
pub struct YieldResponseAnalysis {
    pub crop: String,
    pub nutrient_curves: BTreeMap<Nutrient, ResponseCurve>,
    pub interactions: Vec<InteractionEffect>,
    pub optimal_rates: BTreeMap<Nutrient, OptimalRateAnalysis>,
    pub thresholds: BTreeMap<Nutrient, EconomicThreshold>,
    pub validations: BTreeMap<Nutrient, ModelValidation>,
    /// R² per attempted model family, per nutrient.
    pub model_comparison: BTreeMap<Nutrient, Vec<ModelAttempt>>,
    pub confidence_intervals: BTreeMap<Nutrient, Vec<ConfidenceInterval>>,
    pub data_quality: BTreeMap<Nutrient, DataQualityReport>,
    pub warnings: Vec<String>,
}

/// Run the full analysis for one request.
///
/// # Errors
/// - [`AnalysisError::NoObservations`] when nothing is analyzable.
/// - [`AnalysisError::Fit`] for hard data preconditions (< 3 observations
///   for a nutrient, non-finite or negative values).
/// - [`AnalysisError::Econ`] for missing/non-positive prices.
/// - [`AnalysisError::Diagnostics`] for confidence-band failures.
///
/// Per-nutrient *fitting* failure (all four families) is not an error:
/// the nutrient is omitted and a warning is recorded.
pub fn analyze(
    observations: &[NutrientObservation], crop: &str, params: &EconomicParams,
    options: &AnalysisOptions,
) -> Result<YieldResponseAnalysis, AnalysisError> {
    let nutrients = observed_nutrients(observations);
    if nutrients.is_empty() {
        return Err(AnalysisError::NoObservations);
    }
    let profile: &CropProfile = lookup_crop(crop);

    let mut report = YieldResponseAnalysis {
        crop: crop.to_string(),
        nutrient_curves: BTreeMap::new(),
        interactions: Vec::new(),
        optimal_rates: BTreeMap::new(),
        thresholds: BTreeMap::new(),
        validations: BTreeMap::new(),
        model_comparison: BTreeMap::new(),
        confidence_intervals: BTreeMap::new(),
        data_quality: BTreeMap::new(),
        warnings: Vec::new(),
    };

    for nutrient in &nutrients {
        let series = extract_series(observations, *nutrient)?;
        let quality = assess_series(*nutrient, &series);
        report.warnings.extend(quality.warnings.iter().cloned());
        report.data_quality.insert(*nutrient, quality);

        let fit_report = match fit_series(*nutrient, &series, &options.fit) {
            Ok(fit_report) => fit_report,
            Err(FitError::AllModelsFailed { .. }) => {
                report.warnings.push(format!(
                    "{nutrient}: no response-curve family could be fitted; nutrient omitted from the report"
                ));
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        report.model_comparison.insert(*nutrient, fit_report.attempts);

        let curve = fit_report.curve;
        let fertilizer_price = params.price_for(*nutrient)?;
        report.optimal_rates.insert(
            *nutrient,
            optimal_rates(&curve, fertilizer_price, params.crop_price, profile, &options.grid)?,
        );
        report.thresholds.insert(
            *nutrient,
            thresholds(&curve, fertilizer_price, params.crop_price, &options.grid)?,
        );
        report.validations.insert(*nutrient, validate_curve(&curve));
        report.confidence_intervals.insert(
            *nutrient,
            intervals(&curve, series.len(), options.confidence_level, &options.grid)?,
        );
        report.nutrient_curves.insert(*nutrient, curve);
    }

    report.interactions = analyze_interactions(observations, &nutrients, profile);

    for validation in report.validations.values() {
        report.warnings.extend(validation.issues.iter().cloned());
        report.warnings.extend(validation.warnings.iter().cloned());
    }

    Ok(report)
}
