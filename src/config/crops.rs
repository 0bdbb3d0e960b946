//! Per-crop reference constants.
//!
//! Centralises the fixed agronomic values used throughout the crate.
//! Yields are in the caller's yield-per-area units; interaction priors are
//! dimensionless correlation-scale magnitudes.

use crate::response::core::data::Nutrient;

/// Reference profile for one crop.
///
/// Fields
/// ------
/// - `name`: lookup key, lowercase.
/// - `typical_max_yield`: agronomic ceiling used for target-yield searches
///   (the 95%-of-maximum rate), distinct from any fitted asymptote.
/// - `baseline_yield`: typical zero-input yield, used as a sanity anchor in
///   reporting.
/// - `interaction_priors`: expected pairwise interaction strength for
///   unordered nutrient pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropProfile {
    pub name: &'static str,
    pub typical_max_yield: f64,
    pub baseline_yield: f64,
    pub interaction_priors: &'static [(Nutrient, Nutrient, f64)],
}

impl CropProfile {
    /// Prior interaction strength for an unordered nutrient pair.
    ///
    /// Returns 0.0 when the pair has no tabulated prior.
    pub fn interaction_prior(&self, a: Nutrient, b: Nutrient) -> f64 {
        self.interaction_priors
            .iter()
            .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
            .map(|(_, _, s)| *s)
            .unwrap_or(0.0)
    }
}

const CORN_PRIORS: &[(Nutrient, Nutrient, f64)] = &[
    (Nutrient::Nitrogen, Nutrient::Phosphorus, 0.15),
    (Nutrient::Nitrogen, Nutrient::Potassium, 0.10),
    (Nutrient::Phosphorus, Nutrient::Potassium, 0.05),
];

const WHEAT_PRIORS: &[(Nutrient, Nutrient, f64)] = &[
    (Nutrient::Nitrogen, Nutrient::Phosphorus, 0.12),
    (Nutrient::Nitrogen, Nutrient::Potassium, 0.08),
    (Nutrient::Phosphorus, Nutrient::Potassium, 0.04),
];

// Soybean fixes much of its own nitrogen, so N-pair priors sit low.
const SOYBEAN_PRIORS: &[(Nutrient, Nutrient, f64)] = &[
    (Nutrient::Nitrogen, Nutrient::Phosphorus, 0.05),
    (Nutrient::Nitrogen, Nutrient::Potassium, 0.03),
    (Nutrient::Phosphorus, Nutrient::Potassium, 0.08),
];

const BARLEY_PRIORS: &[(Nutrient, Nutrient, f64)] = &[
    (Nutrient::Nitrogen, Nutrient::Phosphorus, 0.10),
    (Nutrient::Nitrogen, Nutrient::Potassium, 0.07),
    (Nutrient::Phosphorus, Nutrient::Potassium, 0.04),
];

const GENERIC_PRIORS: &[(Nutrient, Nutrient, f64)] = &[
    (Nutrient::Nitrogen, Nutrient::Phosphorus, 0.10),
    (Nutrient::Nitrogen, Nutrient::Potassium, 0.05),
    (Nutrient::Phosphorus, Nutrient::Potassium, 0.05),
];

/// Fallback profile for crops absent from [`CROP_PROFILES`].
pub const DEFAULT_PROFILE: CropProfile = CropProfile {
    name: "generic",
    typical_max_yield: 200.0,
    baseline_yield: 80.0,
    interaction_priors: GENERIC_PRIORS,
};

/// The tabulated crop profiles, in lookup order.
pub const CROP_PROFILES: &[CropProfile] = &[
    CropProfile {
        name: "corn",
        typical_max_yield: 250.0,
        baseline_yield: 110.0,
        interaction_priors: CORN_PRIORS,
    },
    CropProfile {
        name: "wheat",
        typical_max_yield: 120.0,
        baseline_yield: 50.0,
        interaction_priors: WHEAT_PRIORS,
    },
    CropProfile {
        name: "soybean",
        typical_max_yield: 80.0,
        baseline_yield: 35.0,
        interaction_priors: SOYBEAN_PRIORS,
    },
    CropProfile {
        name: "barley",
        typical_max_yield: 100.0,
        baseline_yield: 45.0,
        interaction_priors: BARLEY_PRIORS,
    },
];

/// Resolve a crop profile by name, case-insensitively.
///
/// Unknown crops return [`DEFAULT_PROFILE`] so downstream stages run with
/// generic priors instead of failing the request.
pub fn lookup_crop(name: &str) -> &'static CropProfile {
    let key = name.trim().to_lowercase();
    CROP_PROFILES.iter().find(|p| p.name == key).unwrap_or(&DEFAULT_PROFILE)
}
