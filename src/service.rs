//! Forecasting on top of the SARIMA grid search.

use tracing::{debug, warn};

use crate::error::{ForecastError, Result};
use crate::models::sarima::{FixedOrders, GridSearch, SarimaFitter, SearchOutcome, SearchSpace};
use crate::models::{FittedModel, ModelFitter};

/// Selects the best SARIMA configuration for a series and forecasts with it.
///
/// # Example
/// ```
/// use sarima_forecast::models::sarima::SearchSpace;
/// use sarima_forecast::service::ForecastService;
///
/// let series: Vec<f64> = (0..72)
///     .map(|i| {
///         let t = i as f64;
///         100.0 + t + 10.0 * (t * std::f64::consts::PI / 6.0).sin() + (t * 1.3).cos()
///     })
///     .collect();
///
/// let service = ForecastService::sarima().with_search_space(SearchSpace::single(1, 1, 1, 1));
/// let predictions = service.forecast(&series, 6).unwrap();
/// assert_eq!(predictions.len(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct ForecastService<F> {
    search: GridSearch<F>,
}

impl ForecastService<SarimaFitter> {
    /// Service backed by the conditional-sum-of-squares SARIMA fitter.
    pub fn sarima() -> Self {
        Self::new(SarimaFitter::new())
    }
}

impl Default for ForecastService<SarimaFitter> {
    fn default() -> Self {
        Self::sarima()
    }
}

impl<F: ModelFitter> ForecastService<F> {
    /// Service over the default search space and fixed orders.
    pub fn new(fitter: F) -> Self {
        Self {
            search: GridSearch::new(fitter),
        }
    }

    /// Replace the search space.
    pub fn with_search_space(mut self, space: SearchSpace) -> Self {
        self.search = self.search.with_search_space(space);
        self
    }

    /// Replace the fixed differencing orders and period.
    pub fn with_fixed_orders(mut self, fixed: FixedOrders) -> Self {
        self.search = self.search.with_fixed_orders(fixed);
        self
    }

    /// The underlying grid search.
    pub fn search(&self) -> &GridSearch<F> {
        &self.search
    }

    /// Forecast `horizon` steps past the end of `series`.
    ///
    /// Fails with [`ForecastError::NoViableModel`] when no configuration of the
    /// grid could be fitted; there is no fallback model.
    pub fn forecast(&self, series: &[f64], horizon: usize) -> Result<Vec<f64>> {
        self.forecast_with_outcome(series, horizon)
            .map(|(predictions, _)| predictions)
    }

    /// Like [`ForecastService::forecast`], also returning the search trace.
    pub fn forecast_with_outcome(
        &self,
        series: &[f64],
        horizon: usize,
    ) -> Result<(Vec<f64>, SearchOutcome<F::Model>)> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be positive".to_string(),
            ));
        }

        let outcome = self.search.run(series)?;
        let Some(model) = outcome.best_model() else {
            warn!(evaluated = outcome.evaluated(), "no viable model for series");
            return Err(ForecastError::NoViableModel {
                evaluated: outcome.evaluated(),
            });
        };

        let predictions = model.forecast(horizon)?.into_point();
        if predictions.len() != horizon {
            return Err(ForecastError::DimensionMismatch {
                expected: horizon,
                got: predictions.len(),
            });
        }

        debug!(
            order = ?outcome.best_order(),
            horizon,
            "forecast produced"
        );
        Ok((predictions, outcome))
    }
}
