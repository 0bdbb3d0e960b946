//! Static agronomic reference configuration.
//!
//! Purpose
//! -------
//! Hold the per-crop reference data that the numerical modules consume as
//! lookup tables: typical maximum yield, baseline (zero-input) yield, and
//! prior expectations for pairwise nutrient interaction strength. Keeping
//! these in one tagged-data table means adding a crop touches this module
//! only, never the algorithm code.
//!
//! Conventions
//! -----------
//! - Crop keys are matched case-insensitively; unknown crops resolve to
//!   [`crops::DEFAULT_PROFILE`] rather than erroring, so analysis of a new
//!   crop degrades to generic priors instead of failing.
//! - Interaction priors are stored for unordered pairs; lookups are
//!   symmetric in the two nutrients.

pub mod crops;

pub use crops::{CropProfile, DEFAULT_PROFILE, lookup_crop};
