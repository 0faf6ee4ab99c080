//! Error types for the sarima-forecast library.

use crate::models::sarima::SarimaOrder;
use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during model selection and forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Non-finite observation in the input series.
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    /// The model fitter failed for a reason other than invalid parameters.
    #[error("model fitter failed for {order}: {source}")]
    FitterFailure {
        order: SarimaOrder,
        source: Box<ForecastError>,
    },

    /// Every configuration in the search grid failed to fit.
    #[error("no viable model: all {evaluated} candidate configurations failed to fit")]
    NoViableModel { evaluated: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

/// Outcome of a single failed fit at the model-fitter boundary.
///
/// `InvalidParameters` is an expected grid miss (the configuration is not
/// estimable for this series). Anything else is `Unexpected` and aborts the
/// search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// The configuration cannot be estimated for the given series.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Any other failure inside the fitter.
    #[error(transparent)]
    Unexpected(#[from] ForecastError),
}

impl FitError {
    /// Shorthand for an invalid-parameters miss.
    pub fn invalid(reason: impl Into<String>) -> Self {
        FitError::InvalidParameters(reason.into())
    }
}
