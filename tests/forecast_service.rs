//! End-to-end tests for the forecast service and its HTTP payload handling.

use approx::assert_relative_eq;
use sarima_forecast::api::{handle_payload, ApiError};
use sarima_forecast::prelude::*;
use serde_json::json;

/// Monthly series with trend, yearly seasonality and a little wiggle.
fn monthly(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let season = 25.0 * (2.0 * std::f64::consts::PI * t / 12.0).sin();
            200.0 + 1.5 * t + season + 3.0 * (1.7 * t).sin()
        })
        .collect()
}

struct Damped {
    aic: f64,
    level: f64,
    step: f64,
}

impl FittedModel for Damped {
    fn aic(&self) -> f64 {
        self.aic
    }

    fn forecast(&self, steps: usize) -> Result<Forecast> {
        Ok(Forecast::from_values(
            (1..=steps).map(|h| self.level + self.step * h as f64).collect(),
        ))
    }
}

/// Deterministic stand-in: score depends on the order and the series mean.
struct Deterministic;

impl ModelFitter for Deterministic {
    type Model = Damped;

    fn fit(&self, series: &[f64], order: SarimaOrder) -> std::result::Result<Damped, FitError> {
        if order.p + order.q > 6 {
            return Err(FitError::invalid("too many coefficients"));
        }
        let level = series.iter().sum::<f64>() / series.len() as f64;
        let aic = ((order.p * 7 + order.q * 3 + order.cap_p * 5 + order.cap_q) % 11) as f64;
        Ok(Damped {
            aic,
            level,
            step: order.q as f64,
        })
    }
}

#[test]
fn monthly_series_forecast_is_deterministic() {
    let series = monthly(24);
    let service = ForecastService::new(Deterministic);

    let first = service.forecast(&series, 6).unwrap();
    let second = service.forecast(&series, 6).unwrap();

    assert_eq!(first.len(), 6);
    assert_eq!(first, second);
}

#[test]
fn forecast_comes_from_the_selected_model() {
    let series = monthly(24);
    let service = ForecastService::new(Deterministic);
    let (predictions, outcome) = service.forecast_with_outcome(&series, 6).unwrap();

    // (p*7 + q*3 + P*5 + Q) % 11 == 0 first at p=1, q=1, P=2, Q=2.
    assert_eq!(outcome.best_order(), Some(SarimaOrder::new(1, 1, 1, 2, 1, 2, 12)));
    assert_eq!(outcome.best_aic(), Some(0.0));

    let mean = series.iter().sum::<f64>() / 24.0;
    for (h, value) in predictions.iter().enumerate() {
        assert_relative_eq!(*value, mean + (h + 1) as f64, epsilon = 1e-9);
    }
}

#[test]
fn invalid_configurations_are_skipped() {
    let service = ForecastService::new(Deterministic);
    let (_, outcome) = service.forecast_with_outcome(&monthly(24), 1).unwrap();

    // p + q > 6 only for (3,4), (4,3), (4,4), each with 4 seasonal pairs.
    assert_eq!(outcome.evaluated(), 64);
    assert_eq!(outcome.failures().count(), 12);
    assert_eq!(outcome.succeeded(), 52);
}

#[test]
fn split_is_reported_but_not_used() {
    let service = ForecastService::new(Deterministic);
    let (_, outcome) = service.forecast_with_outcome(&monthly(24), 1).unwrap();
    assert_eq!(outcome.train_length(), 18);
}

#[test]
fn sarima_forecasts_two_years_of_data() {
    let series = monthly(24);
    let service = ForecastService::sarima();
    let (predictions, outcome) = service.forecast_with_outcome(&series, 6).unwrap();

    assert_eq!(predictions.len(), 6);
    assert!(predictions.iter().all(|v| v.is_finite()));
    assert_eq!(outcome.evaluated(), 64);
    // The largest configurations have more parameters than differenced points.
    assert!(outcome.succeeded() > 0);
    assert!(outcome.failures().count() > 0);

    assert_eq!(service.forecast(&series, 6).unwrap(), predictions);
}

#[test]
fn sarima_rejects_series_too_short_for_any_configuration() {
    let service = ForecastService::sarima();
    let err = service.forecast(&monthly(18), 6).unwrap_err();
    assert_eq!(err, ForecastError::NoViableModel { evaluated: 64 });
}

#[test]
fn sarima_forecasts_eight_years_of_data() {
    let series = monthly(96);
    let service = ForecastService::sarima().with_search_space(SearchSpace::single(1, 1, 1, 1));

    let first = service.forecast(&series, 6).unwrap();
    let second = service.forecast(&series, 6).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);

    let last = *series.last().unwrap();
    for value in &first {
        assert!(value.is_finite());
        assert!((value - last).abs() < 100.0, "forecast {value} drifted from {last}");
    }
}

#[test]
fn sarima_selection_prefers_lower_aic() {
    let series = monthly(96);
    let space = SearchSpace::default()
        .with_non_seasonal(1..=2, 1..=1)
        .with_seasonal(1..=1, 1..=1);
    let outcome =
        select_best(&SarimaFitter::new(), &series, &space, FixedOrders::default()).unwrap();

    assert_eq!(outcome.evaluated(), 2);
    let best = outcome.best_aic().unwrap();
    assert!(outcome.scores().iter().all(|(_, aic)| best <= *aic));
}

#[test]
fn payload_round_trip() {
    let service = ForecastService::new(Deterministic);
    let series = monthly(24);
    let payload = json!([6, &series]);

    let predictions = handle_payload(&service, &payload).unwrap();
    let direct = service.forecast(&series, 6).unwrap();
    assert_eq!(predictions.len(), direct.len());
    for (via_json, expected) in predictions.iter().zip(&direct) {
        assert_relative_eq!(*via_json, *expected, max_relative = 1e-12);
    }
}

#[test]
fn payload_errors_are_classified() {
    let service = ForecastService::sarima();

    let bad = handle_payload(&service, &json!([6])).unwrap_err();
    assert!(matches!(bad, ApiError::InvalidRequest(_)));

    let unfit = handle_payload(&service, &json!([6, monthly(16)])).unwrap_err();
    assert_eq!(
        unfit,
        ApiError::Forecast(ForecastError::NoViableModel { evaluated: 64 })
    );
}
