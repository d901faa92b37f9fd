use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    model::{WeatherRequest, WeatherSnapshot},
    provider::truncate_body,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    precipitation_probability_max: Vec<Option<i32>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    current: OmCurrent,
    daily: OmDaily,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherSnapshot> {
        let url = format!("{}/v1/forecast", self.base_url);

        tracing::info!(
            latitude = request.latitude,
            longitude = request.longitude,
            "fetching current weather"
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", request.latitude.to_string()),
                ("longitude", request.longitude.to_string()),
                ("current", "temperature_2m,weather_code".to_string()),
                ("daily", "precipitation_probability_max".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmForecastResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo forecast JSON")?;

        // Open-Meteo sends `null` for days without a forecast value.
        let precipitation = parsed.daily.precipitation_probability_max.first().copied().flatten();
        if precipitation.is_none() {
            tracing::warn!("Open-Meteo response has no precipitation probability for today");
        }

        Ok(WeatherSnapshot {
            latitude: parsed.latitude.unwrap_or(request.latitude),
            longitude: parsed.longitude.unwrap_or(request.longitude),
            temperature_c: parsed.current.temperature_2m,
            weather_code: parsed.current.weather_code,
            precipitation_probability_pct: precipitation,
        })
    }
}
