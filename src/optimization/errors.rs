use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Request validation ----
    /// At least one optimization scenario must be supplied.
    NoScenarios,

    /// At least one fitted response curve must be supplied.
    NoResponseCurves,

    /// Crop price must be finite and strictly positive.
    InvalidCropPrice {
        value: f64,
    },

    /// Scenario yield goals must be finite and strictly positive.
    InvalidYieldGoal {
        scenario_index: usize,
        value: f64,
    },

    /// Scenario probability weights must lie in (0, 1].
    InvalidProbabilityWeight {
        scenario_index: usize,
        value: f64,
    },

    /// Budget limit must be finite and strictly positive.
    InvalidBudget {
        value: f64,
    },

    /// Per-nutrient rate caps must be finite and non-negative.
    InvalidRateCap {
        nutrient: &'static str,
        value: f64,
    },

    /// A response curve's nutrient has no resolvable positive price.
    MissingFertilizerPrice {
        nutrient: &'static str,
    },

    // ---- Options ----
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },

    /// Population size must support a differential-evolution step.
    InvalidPopulation {
        population: usize,
        reason: &'static str,
    },

    /// Monte-Carlo draw count must be positive.
    InvalidDrawCount {
        draws: usize,
        reason: &'static str,
    },

    // ---- Objective evaluation ----
    /// Objective returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Request validation ----
            OptError::NoScenarios => {
                write!(f, "At least one optimization scenario is required")
            }
            OptError::NoResponseCurves => {
                write!(f, "At least one response curve is required")
            }
            OptError::InvalidCropPrice { value } => {
                write!(f, "Invalid crop price {value}: must be finite and > 0")
            }
            OptError::InvalidYieldGoal { scenario_index, value } => {
                write!(
                    f,
                    "Invalid yield goal {value} in scenario {scenario_index}: must be finite and > 0"
                )
            }
            OptError::InvalidProbabilityWeight { scenario_index, value } => {
                write!(
                    f,
                    "Invalid probability weight {value} in scenario {scenario_index}: must lie in (0, 1]"
                )
            }
            OptError::InvalidBudget { value } => {
                write!(f, "Invalid budget limit {value}: must be finite and > 0")
            }
            OptError::InvalidRateCap { nutrient, value } => {
                write!(f, "Invalid {nutrient} rate cap {value}: must be finite and non-negative")
            }
            OptError::MissingFertilizerPrice { nutrient } => {
                write!(f, "No positive fertilizer price resolvable for {nutrient}")
            }

            // ---- Options ----
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidPopulation { population, reason } => {
                write!(f, "Invalid population size {population}: {reason}")
            }
            OptError::InvalidDrawCount { draws, reason } => {
                write!(f, "Invalid Monte-Carlo draw count {draws}: {reason}")
            }

            // ---- Objective evaluation ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite objective value: {value}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Fallback ----
            OptError::UnknownError => write!(f, "Unknown error"),
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                other => OptError::BackendError { text: other.to_string() },
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}
