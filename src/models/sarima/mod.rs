//! Seasonal ARIMA models and exhaustive order selection.
//!
//! This module provides:
//! - [`SarimaOrder`] configurations and the [`SearchSpace`] grid they come from
//! - [`SarimaFitter`], a conditional-sum-of-squares estimator
//! - [`select_best`] / [`GridSearch`] for AIC-based selection over the grid

mod diff;
mod grid_search;
mod model;
mod order;
mod polynomial;

pub use diff::{difference, differencing_operator, integrate, seasonal_difference};
pub use grid_search::{
    evaluate_orders, select_best, CandidateResult, CandidateStatus, GridSearch, SearchOutcome,
};
pub use model::{SarimaCoefficients, SarimaFitter, SarimaModel};
pub use order::{FixedOrders, SarimaOrder, SearchSpace};
pub use polynomial::{is_invertible, is_stationary};
