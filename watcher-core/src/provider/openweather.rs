use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{City, Coordinates, StageError, WeatherReport};

use super::{ConditionsResolver, CoordinateResolver};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// OpenWeather current-weather API, used for both stage 2 (lookup by name)
/// and stage 3 (lookup by coordinates).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(anyhow!("OpenWeather API key must not be empty"));
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        })
    }

    /// Point the client at another host, e.g. a proxy or a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_weather<T: DeserializeOwned>(
        &self,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }

    async fn locate(&self, city: &str) -> Result<Coordinates> {
        let parsed: OwLocateResponse =
            self.fetch_weather(&[("q", city.to_string())], "city lookup").await?;

        Coordinates::new(parsed.coord.lat, parsed.coord.lon)
            .context("OpenWeather returned out-of-range coordinates")
    }

    async fn current_at(&self, coordinates: &Coordinates) -> Result<WeatherReport> {
        let parsed: OwCurrentResponse = self
            .fetch_weather(
                &[
                    ("lat", coordinates.latitude().to_string()),
                    ("lon", coordinates.longitude().to_string()),
                ],
                "current weather",
            )
            .await?;

        let weather = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenWeather response contained no weather entries"))?;

        let sys = parsed.sys.unwrap_or_default();

        Ok(WeatherReport {
            location_name: parsed.name,
            country: sys.country.filter(|c| !c.is_empty()),
            coordinates: *coordinates,
            temperature_c: parsed.main.temp,
            temp_min_c: parsed.main.temp_min,
            temp_max_c: parsed.main.temp_max,
            description: weather.description,
            icon: weather.icon,
            wind_speed_mps: parsed.wind.map(|w| w.speed).unwrap_or_default(),
            sunrise: sys.sunrise.and_then(unix_to_utc),
            sunset: sys.sunset.and_then(unix_to_utc),
            observation_time: parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwLocateResponse {
    coord: OwCoord,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
}

#[async_trait]
impl CoordinateResolver for OpenWeatherClient {
    async fn resolve_coordinates(&self, city: &City) -> Result<Coordinates, StageError> {
        let name = city.require_non_empty()?;
        self.locate(name).await.map_err(StageError::CoordinateResolution)
    }
}

#[async_trait]
impl ConditionsResolver for OpenWeatherClient {
    async fn resolve_conditions(
        &self,
        coordinates: &Coordinates,
    ) -> Result<WeatherReport, StageError> {
        self.current_at(coordinates).await.map_err(StageError::WeatherResolution)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
