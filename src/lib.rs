//! # sarima-forecast
//!
//! Seasonal ARIMA model selection and forecasting.
//!
//! The crate enumerates a grid of SARIMA orders, fits each candidate,
//! keeps the one with the lowest AIC and forecasts with it. Candidates that
//! cannot be estimated are logged and skipped; any other fitter failure
//! aborts the search. An HTTP front end (see [`api`]) exposes the service
//! as a single `/calculate` endpoint.

pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod service;
pub mod utils;

pub use error::{FitError, ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, Series};
    pub use crate::error::{FitError, ForecastError, Result};
    pub use crate::models::sarima::{
        select_best, FixedOrders, GridSearch, SarimaFitter, SarimaOrder, SearchOutcome,
        SearchSpace,
    };
    pub use crate::models::{FittedModel, ModelFitter};
    pub use crate::service::ForecastService;
}
