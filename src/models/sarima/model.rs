//! SARIMA estimation by conditional sum of squares.

use tracing::trace;

use super::diff::{difference, differencing_operator, integrate, seasonal_difference};
use super::polynomial::{
    ar_operator, is_invertible, is_stationary, ma_operator, multiply, psi_weights,
};
use super::SarimaOrder;
use crate::core::Forecast;
use crate::error::{FitError, ForecastError, Result};
use crate::models::{FittedModel, ModelFitter};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::{mean, quantile_normal, sum_of_squares};

/// Bound on every AR and MA coefficient during estimation.
const COEFFICIENT_BOUND: f64 = 0.99;

/// Estimated coefficients of a multiplicative SARIMA model.
#[derive(Debug, Clone, PartialEq)]
pub struct SarimaCoefficients {
    /// Mean of the differenced series; zero unless the model is undifferenced.
    pub intercept: f64,
    /// Non-seasonal AR coefficients φ.
    pub ar: Vec<f64>,
    /// Seasonal AR coefficients Φ.
    pub seasonal_ar: Vec<f64>,
    /// Non-seasonal MA coefficients θ.
    pub ma: Vec<f64>,
    /// Seasonal MA coefficients Θ.
    pub seasonal_ma: Vec<f64>,
}

impl SarimaCoefficients {
    /// Unpack an optimizer parameter vector laid out as
    /// `[intercept?, φ.., Φ.., θ.., Θ..]`.
    fn unpack(params: &[f64], order: &SarimaOrder, has_intercept: bool) -> Self {
        let (intercept, rest) = if has_intercept {
            (params[0], &params[1..])
        } else {
            (0.0, params)
        };
        let (ar, rest) = rest.split_at(order.p);
        let (seasonal_ar, rest) = rest.split_at(order.cap_p);
        let (ma, seasonal_ma) = rest.split_at(order.q);
        Self {
            intercept,
            ar: ar.to_vec(),
            seasonal_ar: seasonal_ar.to_vec(),
            ma: ma.to_vec(),
            seasonal_ma: seasonal_ma.to_vec(),
        }
    }

    /// Starting point for the optimizer: small, decaying coefficients.
    fn initial_params(order: &SarimaOrder, intercept: Option<f64>) -> Vec<f64> {
        let decaying = |n: usize| (0..n).map(|i| 0.1 / (i + 1) as f64);
        intercept
            .into_iter()
            .chain(decaying(order.p))
            .chain(decaying(order.cap_p))
            .chain(decaying(order.q))
            .chain(decaying(order.cap_q))
            .collect()
    }

    fn is_stationary(&self) -> bool {
        is_stationary(&self.ar) && is_stationary(&self.seasonal_ar)
    }

    fn is_invertible(&self) -> bool {
        is_invertible(&self.ma) && is_invertible(&self.seasonal_ma)
    }
}

/// Residuals of `ar(B)(w_t - μ) = ma(B) e_t`, conditioned on pre-sample
/// values sitting at the mean and pre-sample shocks at zero.
fn conditional_residuals(w: &[f64], mu: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let mut residuals = vec![0.0; w.len()];
    for t in 0..w.len() {
        let mut e: f64 = ar
            .iter()
            .take(t + 1)
            .enumerate()
            .map(|(k, c)| c * (w[t - k] - mu))
            .sum();
        for k in 1..ma.len().min(t + 1) {
            e -= ma[k] * residuals[t - k];
        }
        residuals[t] = e;
    }
    residuals
}

/// Fits [`SarimaModel`]s by minimising the conditional sum of squares.
#[derive(Debug, Clone, Default)]
pub struct SarimaFitter {
    optimizer: NelderMeadConfig,
}

impl SarimaFitter {
    /// Create a fitter with the default optimizer settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fitter with custom optimizer settings.
    pub fn with_optimizer(optimizer: NelderMeadConfig) -> Self {
        Self { optimizer }
    }

    /// Optimizer settings.
    pub fn optimizer(&self) -> &NelderMeadConfig {
        &self.optimizer
    }

    /// Minimum number of observations needed to estimate `order`: the
    /// differenced series must outnumber the estimated parameters.
    pub fn min_observations(order: &SarimaOrder) -> usize {
        let has_intercept = order.d + order.cap_d == 0;
        let params = order.num_coefficients() + usize::from(has_intercept) + 1;
        order.differencing_lag() + params + 1
    }
}

impl ModelFitter for SarimaFitter {
    type Model = SarimaModel;

    fn fit(
        &self,
        series: &[f64],
        order: SarimaOrder,
    ) -> std::result::Result<SarimaModel, FitError> {
        if let Some(index) = series.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::NonFiniteValue { index }.into());
        }
        if order.s == 0 && order.has_seasonal_terms() {
            return Err(ForecastError::InvalidParameter(format!(
                "{order}: seasonal terms require a period of at least 1"
            ))
            .into());
        }

        let needed = Self::min_observations(&order);
        if series.len() < needed {
            return Err(FitError::invalid(format!(
                "{order} needs at least {needed} observations, got {}",
                series.len()
            )));
        }

        let w = seasonal_difference(&difference(series, order.d), order.cap_d, order.s);
        let has_intercept = order.d + order.cap_d == 0;

        let mut bounds = Vec::with_capacity(order.num_coefficients() + 1);
        if has_intercept {
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        bounds.extend(
            std::iter::repeat((-COEFFICIENT_BOUND, COEFFICIENT_BOUND))
                .take(order.num_coefficients()),
        );
        let initial = SarimaCoefficients::initial_params(&order, has_intercept.then(|| mean(&w)));

        let css = |params: &[f64]| {
            let coefs = SarimaCoefficients::unpack(params, &order, has_intercept);
            if !coefs.is_stationary() || !coefs.is_invertible() {
                return f64::INFINITY;
            }
            let ar = ar_operator(&coefs.ar, &coefs.seasonal_ar, order.s);
            let ma = ma_operator(&coefs.ma, &coefs.seasonal_ma, order.s);
            sum_of_squares(&conditional_residuals(&w, coefs.intercept, &ar, &ma))
        };

        let coefficients = if initial.is_empty() {
            SarimaCoefficients::unpack(&[], &order, false)
        } else {
            let result = nelder_mead(css, &initial, Some(&bounds), &self.optimizer);
            trace!(
                %order,
                iterations = result.iterations,
                converged = result.converged,
                css = result.optimal_value,
                "optimizer finished"
            );
            SarimaCoefficients::unpack(&result.optimal_point, &order, has_intercept)
        };

        if !coefficients.is_stationary() {
            return Err(FitError::invalid(format!("{order}: non-stationary AR polynomial")));
        }
        if !coefficients.is_invertible() {
            return Err(FitError::invalid(format!("{order}: non-invertible MA polynomial")));
        }

        SarimaModel::from_estimate(order, coefficients, series, w)
    }
}

/// A fitted SARIMA(p, d, q)(P, D, Q)\[s\] model.
#[derive(Debug, Clone)]
pub struct SarimaModel {
    order: SarimaOrder,
    coefficients: SarimaCoefficients,
    /// Expanded AR operator, constant term first.
    ar_operator: Vec<f64>,
    /// Expanded MA operator, constant term first.
    ma_operator: Vec<f64>,
    /// Differencing operator, constant term first.
    diff_operator: Vec<f64>,
    /// Original observations.
    history: Vec<f64>,
    /// Differenced observations.
    differenced: Vec<f64>,
    /// Conditional residuals on the differenced scale.
    residuals: Vec<f64>,
    /// In-sample one-step predictions on the original scale.
    fitted: Vec<f64>,
    sigma2: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    n_eff: usize,
}

impl SarimaModel {
    fn from_estimate(
        order: SarimaOrder,
        coefficients: SarimaCoefficients,
        series: &[f64],
        differenced: Vec<f64>,
    ) -> std::result::Result<Self, FitError> {
        let ar = ar_operator(&coefficients.ar, &coefficients.seasonal_ar, order.s);
        let ma = ma_operator(&coefficients.ma, &coefficients.seasonal_ma, order.s);
        let residuals = conditional_residuals(&differenced, coefficients.intercept, &ar, &ma);

        let n_eff = differenced.len();
        let sigma2 = sum_of_squares(&residuals) / n_eff as f64;
        if !sigma2.is_finite() || sigma2 <= 0.0 {
            return Err(FitError::invalid(format!(
                "{order}: degenerate residual variance {sigma2}"
            )));
        }

        let has_intercept = order.d + order.cap_d == 0;
        let k = (order.num_coefficients() + usize::from(has_intercept) + 1) as f64;
        let n = n_eff as f64;
        let log_likelihood = -0.5 * n * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0);
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * n.ln();

        let lag = order.differencing_lag();
        let mut fitted = vec![f64::NAN; series.len()];
        for (j, e) in residuals.iter().enumerate() {
            fitted[j + lag] = series[j + lag] - e;
        }

        Ok(Self {
            order,
            coefficients,
            ar_operator: ar,
            ma_operator: ma,
            diff_operator: differencing_operator(order.d, order.cap_d, order.s),
            history: series.to_vec(),
            differenced,
            residuals,
            fitted,
            sigma2,
            log_likelihood,
            aic,
            bic,
            n_eff,
        })
    }

    /// Configuration this model was fitted with.
    pub fn order(&self) -> SarimaOrder {
        self.order
    }

    /// Estimated coefficients.
    pub fn coefficients(&self) -> &SarimaCoefficients {
        &self.coefficients
    }

    /// Residual variance.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Gaussian conditional log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Bayesian Information Criterion.
    pub fn bic(&self) -> f64 {
        self.bic
    }

    /// Number of residuals entering the likelihood.
    pub fn effective_observations(&self) -> usize {
        self.n_eff
    }

    /// In-sample one-step predictions on the original scale. Positions
    /// consumed by differencing are NaN.
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// Conditional residuals on the differenced scale.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Forecast the differenced series `steps` ahead with future shocks at zero.
    fn forecast_differenced(&self, steps: usize) -> Vec<f64> {
        let mu = self.coefficients.intercept;
        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();

        for _ in 0..steps {
            let t = w.len();
            let mut pred = mu;
            for (k, c) in self.ar_operator.iter().enumerate().skip(1) {
                if k <= t {
                    pred -= c * (w[t - k] - mu);
                }
            }
            for (k, m) in self.ma_operator.iter().enumerate().skip(1) {
                if k <= t {
                    pred += m * e[t - k];
                }
            }
            w.push(pred);
            e.push(0.0);
        }

        w.split_off(self.differenced.len())
    }

    /// Point forecasts with normal prediction intervals at `level`.
    pub fn forecast_with_intervals(&self, steps: usize, level: f64) -> Result<Forecast> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval level must lie in (0, 1), got {level}"
            )));
        }
        let point = self.forecast(steps)?.into_point();

        let z = quantile_normal((1.0 + level) / 2.0);
        let psi = psi_weights(
            &multiply(&self.ar_operator, &self.diff_operator),
            &self.ma_operator,
            steps,
        );

        let mut cumulative = 0.0;
        let mut lower = Vec::with_capacity(steps);
        let mut upper = Vec::with_capacity(steps);
        for (pred, weight) in point.iter().zip(&psi) {
            cumulative += weight * weight;
            let half_width = z * (self.sigma2 * cumulative).sqrt();
            lower.push(pred - half_width);
            upper.push(pred + half_width);
        }

        Ok(Forecast::from_values_with_intervals(point, lower, upper))
    }
}

impl FittedModel for SarimaModel {
    fn aic(&self) -> f64 {
        self.aic
    }

    fn forecast(&self, steps: usize) -> Result<Forecast> {
        if steps == 0 {
            return Ok(Forecast::new());
        }
        let w = self.forecast_differenced(steps);
        let values = integrate(&w, &self.history, &self.diff_operator);
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::ComputationError(format!(
                "{}: non-finite forecast at step {}",
                self.order,
                index + 1
            )));
        }
        Ok(Forecast::from_values(values))
    }
}
