use argmin::core::Error;

use crate::response::core::data::Nutrient;

/// Crate-wide result alias for curve-fitting operations.
pub type FitResult<T> = Result<T, FitError>;

#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    // ---- Input data ----
    /// Fewer observations than the minimum needed to fit a curve.
    InsufficientData {
        nutrient: Nutrient,
        needed: usize,
        actual: usize,
    },

    /// An observation carried a NaN or infinite rate/yield.
    NonFiniteObservation {
        nutrient: Nutrient,
        index: usize,
        value: f64,
    },

    /// Rates and yields must be non-negative.
    NegativeObservation {
        nutrient: Nutrient,
        index: usize,
        value: f64,
    },

    // ---- Fitting ----
    /// Every candidate model family failed to fit for this nutrient.
    AllModelsFailed {
        nutrient: Nutrient,
    },

    /// The underlying simplex solver reported an error.
    SolverFailure {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for FitError {}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input data ----
            FitError::InsufficientData { nutrient, needed, actual } => {
                write!(
                    f,
                    "Insufficient data for {nutrient}: need at least {needed} observations, got {actual}"
                )
            }
            FitError::NonFiniteObservation { nutrient, index, value } => {
                write!(f, "Non-finite observation for {nutrient} at index {index}: {value}")
            }
            FitError::NegativeObservation { nutrient, index, value } => {
                write!(
                    f,
                    "Negative observation for {nutrient} at index {index}: {value}, rates and yields must be non-negative"
                )
            }

            // ---- Fitting ----
            FitError::AllModelsFailed { nutrient } => {
                write!(f, "All response-curve models failed to fit for {nutrient}")
            }
            FitError::SolverFailure { text } => {
                write!(f, "Curve-fit solver failure: {text}")
            }

            // ---- Fallback ----
            FitError::UnknownError => write!(f, "Unknown curve-fitting error"),
        }
    }
}

impl From<Error> for FitError {
    fn from(err: Error) -> Self {
        FitError::SolverFailure { text: err.to_string() }
    }
}
