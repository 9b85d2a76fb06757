use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::response::ApiError;
use crate::weather::dto::{CurrentWeather, ForecastWeather, UpstreamErrorBody};

/// The provider caps forecasts at ten days; larger requests are clamped,
/// not rejected.
pub const MAX_FORECAST_DAYS: u32 = 10;

#[derive(Debug, Error)]
pub enum WeatherApiError {
    /// The provider rejected the query (unknown location, bad key, ...).
    #[error("{message}")]
    Upstream { code: i64, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl From<WeatherApiError> for ApiError {
    fn from(err: WeatherApiError) -> Self {
        match err {
            WeatherApiError::Upstream { message, .. } => ApiError::NotFound(message),
            WeatherApiError::Transport(e) => ApiError::Internal(e.into()),
        }
    }
}

#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn current(&self, query: &str) -> Result<CurrentWeather, WeatherApiError>;
    async fn forecast(&self, query: &str, days: u32) -> Result<ForecastWeather, WeatherApiError>;
}

#[derive(Clone)]
pub struct WeatherApiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiClient {
    pub fn new(cfg: &WeatherConfig) -> Self {
        Self {
            http: Client::new(),
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WeatherApiError> {
        let url = format!("{}/{}", self.base_url, path);
        let res = self.http.get(&url).query(query).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body: UpstreamErrorBody = res.json().await?;
            debug!(%status, code = body.error.code, "provider rejected query");
            return Err(WeatherApiError::Upstream {
                code: body.error.code,
                message: body.error.message,
            });
        }

        Ok(res.json().await?)
    }
}

pub fn clamp_forecast_days(days: u32) -> u32 {
    days.min(MAX_FORECAST_DAYS)
}

#[async_trait]
impl WeatherApi for WeatherApiClient {
    async fn current(&self, query: &str) -> Result<CurrentWeather, WeatherApiError> {
        self.get_json(
            "current.json",
            &[("key", self.api_key.as_str()), ("q", query), ("aqi", "no")],
        )
        .await
    }

    async fn forecast(&self, query: &str, days: u32) -> Result<ForecastWeather, WeatherApiError> {
        let days = clamp_forecast_days(days).to_string();
        self.get_json(
            "forecast.json",
            &[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ],
        )
        .await
    }
}
