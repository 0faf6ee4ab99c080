//! Validation of the `[horizon, series]` request payload.

use serde_json::Value;

use super::ApiError;
use crate::core::Series;

/// A validated forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub horizon: usize,
    pub series: Series,
}

impl ForecastRequest {
    /// Minimum number of observations accepted at the boundary.
    pub const MIN_OBSERVATIONS: usize = 2;
    /// Largest horizon accepted at the boundary.
    pub const MAX_HORIZON: usize = 10_000;

    /// Parse `[horizon, [x1, x2, ...]]`.
    ///
    /// The horizon must be a positive integer; series elements may be any
    /// JSON numbers and are coerced to `f64`.
    pub fn from_payload(payload: &Value) -> Result<Self, ApiError> {
        let items = payload
            .as_array()
            .ok_or_else(|| ApiError::invalid("payload must be a JSON array [horizon, series]"))?;
        let [horizon, series] = items.as_slice() else {
            return Err(ApiError::invalid(format!(
                "payload must have exactly 2 elements, got {}",
                items.len()
            )));
        };

        let horizon = parse_horizon(horizon)?;
        let series = parse_series(series)?;
        Ok(Self { horizon, series })
    }
}

impl TryFrom<&Value> for ForecastRequest {
    type Error = ApiError;

    fn try_from(payload: &Value) -> Result<Self, Self::Error> {
        Self::from_payload(payload)
    }
}

fn parse_horizon(value: &Value) -> Result<usize, ApiError> {
    let max = ForecastRequest::MAX_HORIZON;
    match value.as_u64() {
        Some(0) => Err(ApiError::invalid("horizon must be a positive integer, got 0")),
        Some(h) if h > max as u64 => Err(ApiError::invalid(format!(
            "horizon must be at most {max}, got {h}"
        ))),
        Some(h) => Ok(h as usize),
        None => Err(ApiError::invalid(format!(
            "horizon must be a positive integer, got {value}"
        ))),
    }
}

fn parse_series(value: &Value) -> Result<Series, ApiError> {
    let items = value
        .as_array()
        .ok_or_else(|| ApiError::invalid("series must be an array of numbers"))?;

    let values = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_f64().ok_or_else(|| {
                ApiError::invalid(format!("series[{i}] is not a number: {item}"))
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    if values.len() < ForecastRequest::MIN_OBSERVATIONS {
        return Err(ApiError::invalid(format!(
            "series must contain at least {} observations, got {}",
            ForecastRequest::MIN_OBSERVATIONS,
            values.len()
        )));
    }

    Series::try_new(values).map_err(|e| ApiError::invalid(e.to_string()))
}
