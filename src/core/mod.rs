//! Core data structures for series and forecasts.

mod forecast;
mod series;

pub use forecast::Forecast;
pub use series::{train_length, Series, TRAIN_FRACTION};
