//! Error types for uncertainty structure construction and mutation.
//!
//! Every failure mode has a named variant. Out-of-support CDF queries are
//! not errors: they clamp to `0.0`/`1.0`.

use thiserror::Error;

/// Errors raised while building or reconfiguring an uncertainty structure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UncertaintyError {
    /// The lower bound of a range exceeds its upper bound.
    #[error("invalid range: minimum {minimum} exceeds maximum {maximum}")]
    InvalidRange { minimum: f64, maximum: f64 },

    /// A stratum count below one was requested.
    #[error("invalid stratum count {0}: at least one stratum is required")]
    InvalidStrata(usize),

    /// No values were supplied to fit a density estimate.
    #[error("cannot fit a density estimate to an empty sample")]
    EmptyInput,

    /// Weights and values have different lengths.
    #[error("length mismatch: {values} values but {weights} weights")]
    MismatchedLength { values: usize, weights: usize },

    /// `draw_sample` was called with an index past the last stratum.
    #[error("stratum index {index} out of range for {count} strata")]
    OutOfRange { index: usize, count: usize },

    /// A NaN or infinite number was found where a finite one is required.
    #[error("non-finite {context}: {value}")]
    NonFinite { context: &'static str, value: f64 },

    /// Weights are negative or sum to zero.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// Dempster-Shafer masses are negative or do not sum to one.
    #[error("invalid mass assignment: {0}")]
    InvalidMass(String),

    /// A tuning parameter is outside its admissible domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for uncertainty structure operations.
pub type Result<T> = std::result::Result<T, UncertaintyError>;

/// Returns `Err(NonFinite)` for the first non-finite entry of `data`.
pub(crate) fn ensure_finite(data: &[f64], context: &'static str) -> Result<()> {
    match data.iter().find(|x| !x.is_finite()) {
        Some(&value) => Err(UncertaintyError::NonFinite { context, value }),
        None => Ok(()),
    }
}
