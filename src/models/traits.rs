//! The model-fitter capability consumed by the grid search.

use crate::core::Forecast;
use crate::error::{FitError, Result};
use crate::models::sarima::SarimaOrder;

/// A model estimated for one fixed configuration.
pub trait FittedModel {
    /// Akaike Information Criterion of the fit (lower is better).
    fn aic(&self) -> f64;

    /// Point forecasts for the next `steps` observations, in chronological
    /// order.
    fn forecast(&self, steps: usize) -> Result<Forecast>;
}

/// Estimates a [`FittedModel`] for a series and a SARIMA configuration.
///
/// Implementations must tag configurations that cannot be estimated for the
/// series as [`FitError::InvalidParameters`]; every other failure is a
/// defect and should surface as [`FitError::Unexpected`].
pub trait ModelFitter {
    /// The fitted-model handle produced by a successful fit.
    type Model: FittedModel;

    /// Fit one configuration. Must not mutate shared state.
    fn fit(
        &self,
        series: &[f64],
        order: SarimaOrder,
    ) -> std::result::Result<Self::Model, FitError>;
}

impl<F: ModelFitter + ?Sized> ModelFitter for &F {
    type Model = F::Model;

    fn fit(
        &self,
        series: &[f64],
        order: SarimaOrder,
    ) -> std::result::Result<Self::Model, FitError> {
        (**self).fit(series, order)
    }
}
