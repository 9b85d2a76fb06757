use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expire_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub weather: WeatherConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "skycast".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "skycast-users".into()),
            expire_hours: std::env::var("JWT_EXPIRE_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(3),
        };
        let weather = WeatherConfig {
            api_key: std::env::var("WEATHER_API_KEY")?,
            base_url: std::env::var("WEATHER_API_BASE_URL")
                .unwrap_or_else(|_| "http://api.weatherapi.com/v1".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            weather,
        })
    }
}
