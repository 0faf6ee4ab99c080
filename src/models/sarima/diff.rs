//! Differencing utilities for SARIMA models.

use super::polynomial::{lag_polynomial, multiply};

/// Apply differencing to a time series.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Differencing order (number of times to difference)
///
/// # Returns
/// The differenced series, `d` observations shorter.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing to a time series.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Seasonal differencing order
/// * `period` - Seasonal period
///
/// # Returns
/// The seasonally differenced series, `d * period` observations shorter.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }

    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            return Vec::new();
        }
        result = result[period..]
            .iter()
            .zip(&result)
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Coefficients of `(1 - B)^d (1 - B^period)^cap_d`, constant term first.
pub fn differencing_operator(d: usize, cap_d: usize, period: usize) -> Vec<f64> {
    let mut operator = vec![1.0];
    for _ in 0..d {
        operator = multiply(&operator, &lag_polynomial(&[1.0], 1, -1.0));
    }
    if period > 0 {
        for _ in 0..cap_d {
            operator = multiply(&operator, &lag_polynomial(&[1.0], period, -1.0));
        }
    }
    operator
}

/// Undo differencing for values that continue `history`.
///
/// `differenced[h]` is the differenced value at position `history.len() + h`.
/// Each level is rebuilt as `y_t = w_t - Σ_{k≥1} δ_k y_{t-k}` where `δ` is
/// the differencing `operator`. `history` must be at least as long as the
/// operator's highest lag.
pub fn integrate(differenced: &[f64], history: &[f64], operator: &[f64]) -> Vec<f64> {
    let mut extended = history.to_vec();
    extended.reserve(differenced.len());

    for &w in differenced {
        let t = extended.len();
        let carried: f64 = operator
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(k, _)| k <= t)
            .map(|(k, delta)| delta * extended[t - k])
            .sum();
        extended.push(w - carried);
    }

    extended.split_off(history.len())
}
