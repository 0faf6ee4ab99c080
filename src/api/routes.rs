//! Route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{info, warn};

use super::{ApiError, ForecastRequest};
use crate::models::sarima::SarimaFitter;
use crate::models::ModelFitter;
use crate::service::ForecastService;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ForecastService<SarimaFitter>>,
}

impl AppState {
    pub fn new(service: ForecastService<SarimaFitter>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ForecastService::sarima())
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(liveness))
        .route("/calculate", get(calculate).post(calculate))
        .with_state(state)
}

/// Liveness check.
pub async fn liveness() -> Json<Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `[horizon, series]` in, forecast array out.
///
/// The grid search is CPU bound, so it runs on the blocking pool.
pub async fn calculate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<f64>>, ApiError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid(format!("body is not valid JSON: {e}")))?;

    let service = Arc::clone(&state.service);
    let predictions = tokio::task::spawn_blocking(move || handle_payload(&service, &payload))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(predictions))
}

/// Validate a payload and run the forecast synchronously.
pub fn handle_payload<F: ModelFitter>(
    service: &ForecastService<F>,
    payload: &Value,
) -> Result<Vec<f64>, ApiError> {
    let request = ForecastRequest::from_payload(payload).inspect_err(|e| {
        warn!(error = %e, "rejected payload");
    })?;

    info!(
        observations = request.series.len(),
        horizon = request.horizon,
        "forecast requested"
    );
    let predictions = service.forecast(request.series.values(), request.horizon)?;
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Forecast;
    use crate::error::{FitError, ForecastError, Result as CoreResult};
    use crate::models::sarima::{SarimaOrder, SearchSpace};
    use crate::models::FittedModel;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::json;

    struct Flat(f64);

    impl FittedModel for Flat {
        fn aic(&self) -> f64 {
            self.0
        }

        fn forecast(&self, steps: usize) -> CoreResult<Forecast> {
            Ok(Forecast::from_values(vec![self.0; steps]))
        }
    }

    struct ByP;

    impl ModelFitter for ByP {
        type Model = Flat;

        fn fit(&self, _series: &[f64], order: SarimaOrder) -> std::result::Result<Flat, FitError> {
            Ok(Flat(order.p as f64))
        }
    }

    struct Broken;

    impl ModelFitter for Broken {
        type Model = Flat;

        fn fit(&self, _series: &[f64], _order: SarimaOrder) -> std::result::Result<Flat, FitError> {
            Err(FitError::invalid("singular"))
        }
    }

    #[test]
    fn payload_runs_forecast() {
        let service = ForecastService::new(ByP);
        let out = handle_payload(&service, &json!([3, [1, 2, 3, 4]])).unwrap();
        assert_eq!(out, vec![1.0; 3]);
    }

    #[test]
    fn invalid_payload_never_reaches_fitter() {
        let service = ForecastService::new(Broken);
        let err = handle_payload(&service, &json!([0, [1, 2]])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn no_viable_model_maps_to_unprocessable() {
        let service =
            ForecastService::new(Broken).with_search_space(SearchSpace::single(1, 1, 1, 1));
        let err = handle_payload(&service, &json!([2, [1, 2, 3]])).unwrap_err();
        assert_eq!(err, ApiError::Forecast(ForecastError::NoViableModel { evaluated: 1 }));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let response = calculate(State(AppState::default()), Bytes::from_static(b"[6, [1, 2"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn short_series_is_unprocessable() {
        // Too short for any seasonal configuration.
        let body = Bytes::from(json!([2, [1, 2, 3, 4, 5, 6]]).to_string());
        let response = calculate(State(AppState::default()), body)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn liveness_reports_alive() {
        let Json(body) = liveness().await;
        assert_eq!(body["status"], "alive");
    }
}
