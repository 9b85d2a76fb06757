use serde::{Deserialize, Serialize};

/// Body for current-weather lookup by coordinates.
/// Field names follow the wire contract.
#[derive(Debug, Deserialize)]
pub struct LatLongRequest {
    pub latitude: f64,
    pub longtitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    #[serde(default = "default_forecast_days")]
    pub days: u32,
}

fn default_forecast_days() -> u32 {
    2
}

// Upstream payloads are relayed to the caller as-is, so the structs below
// serialize back to the same field names they were parsed from.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub tz_id: String,
    pub localtime: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub code: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Current {
    pub last_updated: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub is_day: i64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub humidity: i64,
    pub cloud: i64,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub vis_km: f64,
    pub uv: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location: Location,
    pub current: Current,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub avgtemp_c: f64,
    pub maxwind_kph: f64,
    pub totalprecip_mm: f64,
    pub avghumidity: f64,
    pub daily_chance_of_rain: i64,
    pub condition: Condition,
    pub uv: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moon_phase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub date_epoch: i64,
    pub day: Day,
    pub astro: Astro,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastWeather {
    pub location: Location,
    pub current: Current,
    pub forecast: Forecast,
}

/// Error body the provider returns on non-success responses.
#[derive(Debug, Deserialize)]
pub struct UpstreamErrorBody {
    pub error: UpstreamError,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamError {
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_days_defaults_to_two() {
        let q: ForecastQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.days, 2);
    }

    #[test]
    fn lat_long_request_uses_wire_names() {
        let body: LatLongRequest =
            serde_json::from_str(r#"{"latitude": 51.52, "longtitude": -0.11}"#).unwrap();
        assert_eq!(body.latitude, 51.52);
        assert_eq!(body.longtitude, -0.11);
    }

    #[test]
    fn upstream_error_body_parses() {
        let body: UpstreamErrorBody = serde_json::from_str(
            r#"{"error":{"code":1006,"message":"No matching location found."}}"#,
        )
        .unwrap();
        assert_eq!(body.error.code, 1006);
        assert_eq!(body.error.message, "No matching location found.");
    }
}
