//! Forecasting models and the model-fitter capability.

mod traits;

pub mod sarima;

pub use traits::{FittedModel, ModelFitter};
