use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::response::{ApiError, DataResponse};
use crate::state::AppState;
use crate::weather::dto::{CurrentWeather, ForecastQuery, ForecastWeather, LatLongRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weathers", post(current_by_coordinates))
        .route("/weathers/:location_name", get(current_by_location))
        .route("/weathers/:location_name/forecast", get(forecast_by_location))
}

#[instrument(skip(state, payload))]
pub async fn current_by_coordinates(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Json(payload): Json<LatLongRequest>,
) -> Result<Json<DataResponse<CurrentWeather>>, ApiError> {
    let query = format!("{},{}", payload.latitude, payload.longtitude);
    info!(%query, "current weather by coordinates requested");
    let weather = state.weather.current(&query).await?;
    Ok(DataResponse::ok(weather))
}

#[instrument(skip(state))]
pub async fn current_by_location(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(location_name): Path<String>,
) -> Result<Json<DataResponse<CurrentWeather>>, ApiError> {
    info!(%location_name, "current weather requested");
    let weather = state.weather.current(&location_name).await?;
    Ok(DataResponse::ok(weather))
}

#[instrument(skip(state))]
pub async fn forecast_by_location(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(location_name): Path<String>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<DataResponse<ForecastWeather>>, ApiError> {
    info!(%location_name, days = params.days, "forecast requested");
    let weather = state.weather.forecast(&location_name, params.days).await?;
    Ok(DataResponse::ok(weather))
}
