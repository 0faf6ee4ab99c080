//! Exhaustive SARIMA order selection by AIC.

use tracing::{debug, info, warn};

use super::order::{FixedOrders, SarimaOrder, SearchSpace};
use crate::core::train_length;
use crate::error::{FitError, ForecastError, Result};
use crate::models::{FittedModel, ModelFitter};

/// What happened when one configuration was fitted.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateStatus {
    /// The fit succeeded with this AIC.
    Fitted { aic: f64 },
    /// The configuration could not be estimated for the series.
    Failed { reason: String },
}

/// One configuration and its fit status.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    pub order: SarimaOrder,
    pub status: CandidateStatus,
}

impl CandidateResult {
    /// AIC of a successful fit.
    pub fn aic(&self) -> Option<f64> {
        match self.status {
            CandidateStatus::Fitted { aic } => Some(aic),
            CandidateStatus::Failed { .. } => None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.status, CandidateStatus::Fitted { .. })
    }
}

/// The winning candidate of a search.
#[derive(Debug, Clone)]
struct BestModel<M> {
    order: SarimaOrder,
    aic: f64,
    model: M,
}

/// Everything one search produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome<M> {
    candidates: Vec<CandidateResult>,
    scores: Vec<(SarimaOrder, f64)>,
    best: Option<BestModel<M>>,
    train_length: usize,
}

impl<M> SearchOutcome<M> {
    fn new(capacity: usize, train_length: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(capacity),
            scores: Vec::with_capacity(capacity),
            best: None,
            train_length,
        }
    }

    fn record_failure(&mut self, order: SarimaOrder, reason: String) {
        self.candidates.push(CandidateResult {
            order,
            status: CandidateStatus::Failed { reason },
        });
    }

    fn record_fit(&mut self, order: SarimaOrder, aic: f64, model: M) {
        self.candidates.push(CandidateResult {
            order,
            status: CandidateStatus::Fitted { aic },
        });
        self.scores.push((order, aic));

        // Strict comparison: on ties the earlier candidate stays.
        let improves = self.best.as_ref().map_or(aic < f64::INFINITY, |b| aic < b.aic);
        if improves {
            self.best = Some(BestModel { order, aic, model });
        }
    }

    /// Every candidate, in enumeration order.
    pub fn candidates(&self) -> &[CandidateResult] {
        &self.candidates
    }

    /// (configuration, AIC) of every successful candidate, in enumeration order.
    pub fn scores(&self) -> &[(SarimaOrder, f64)] {
        &self.scores
    }

    /// Successful scores sorted by AIC, ties in enumeration order.
    pub fn ranked(&self) -> Vec<(SarimaOrder, f64)> {
        let mut ranked = self.scores.clone();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
    }

    /// Candidates that failed to fit.
    pub fn failures(&self) -> impl Iterator<Item = &CandidateResult> {
        self.candidates.iter().filter(|c| !c.is_fitted())
    }

    /// Number of configurations evaluated.
    pub fn evaluated(&self) -> usize {
        self.candidates.len()
    }

    /// Number of successful fits.
    pub fn succeeded(&self) -> usize {
        self.scores.len()
    }

    /// Best fitted model, if any configuration succeeded.
    pub fn best_model(&self) -> Option<&M> {
        self.best.as_ref().map(|b| &b.model)
    }

    /// AIC of the best model.
    pub fn best_aic(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.aic)
    }

    /// Configuration of the best model.
    pub fn best_order(&self) -> Option<SarimaOrder> {
        self.best.as_ref().map(|b| b.order)
    }

    /// Training length of the 80/20 split of the searched series.
    ///
    /// Informational only: candidates are scored on the full series.
    pub fn train_length(&self) -> usize {
        self.train_length
    }
}

/// Fit every configuration of `space` (paired with `fixed`) and keep the
/// lowest-AIC model.
///
/// Configurations the fitter tags as invalid are recorded and skipped. Any
/// other fitter error stops the search and is returned as
/// [`ForecastError::FitterFailure`]. A search in which nothing fits is not an
/// error: the outcome simply has no best model.
pub fn select_best<F: ModelFitter>(
    fitter: &F,
    series: &[f64],
    space: &SearchSpace,
    fixed: FixedOrders,
) -> Result<SearchOutcome<F::Model>> {
    space.validate()?;
    evaluate_orders(fitter, series, &space.orders(fixed))
}

/// Fit an explicit, ordered list of configurations.
///
/// Candidates are fitted strictly in list order; the first of several equal
/// scores wins.
pub fn evaluate_orders<F: ModelFitter>(
    fitter: &F,
    series: &[f64],
    orders: &[SarimaOrder],
) -> Result<SearchOutcome<F::Model>> {
    if series.len() < 2 {
        return Err(ForecastError::InsufficientData {
            needed: 2,
            got: series.len(),
        });
    }

    let mut outcome = SearchOutcome::new(orders.len(), train_length(series.len()));
    debug!(
        candidates = orders.len(),
        observations = series.len(),
        train_length = outcome.train_length,
        "starting grid search"
    );

    for &order in orders {
        match fitter.fit(series, order) {
            Ok(model) => {
                let aic = model.aic();
                if aic.is_finite() {
                    debug!(%order, aic, "candidate fitted");
                    outcome.record_fit(order, aic, model);
                } else {
                    warn!(%order, aic, "candidate produced a non-finite AIC");
                    outcome.record_failure(order, format!("non-finite AIC {aic}"));
                }
            }
            Err(FitError::InvalidParameters(reason)) => {
                warn!(%order, %reason, "wrong parameters");
                outcome.record_failure(order, reason);
            }
            Err(FitError::Unexpected(source)) => {
                return Err(ForecastError::FitterFailure {
                    order,
                    source: Box::new(source),
                });
            }
        }
    }

    match &outcome.best {
        Some(best) => info!(
            order = %best.order,
            aic = best.aic,
            fitted = outcome.succeeded(),
            evaluated = outcome.evaluated(),
            "selected model"
        ),
        None => warn!(evaluated = outcome.evaluated(), "no configuration could be fitted"),
    }

    Ok(outcome)
}

/// Configured grid search over SARIMA orders.
#[derive(Debug, Clone)]
pub struct GridSearch<F> {
    fitter: F,
    space: SearchSpace,
    fixed: FixedOrders,
}

impl<F: ModelFitter> GridSearch<F> {
    /// Search the default space with the default fixed orders.
    pub fn new(fitter: F) -> Self {
        Self {
            fitter,
            space: SearchSpace::default(),
            fixed: FixedOrders::default(),
        }
    }

    /// Replace the search space.
    pub fn with_search_space(mut self, space: SearchSpace) -> Self {
        self.space = space;
        self
    }

    /// Replace the fixed differencing orders and period.
    pub fn with_fixed_orders(mut self, fixed: FixedOrders) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn fitter(&self) -> &F {
        &self.fitter
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn fixed_orders(&self) -> FixedOrders {
        self.fixed
    }

    /// Run the search on `series`.
    pub fn run(&self, series: &[f64]) -> Result<SearchOutcome<F::Model>> {
        select_best(&self.fitter, series, &self.space, self.fixed)
    }
}
