use crate::{
    Config, TranslationRequest, TranslationResponse, WeatherRequest, WeatherSnapshot,
    provider::{mymemory::MyMemoryProvider, openmeteo::OpenMeteoProvider},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod mymemory;
pub mod openmeteo;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, request: &WeatherRequest) -> anyhow::Result<WeatherSnapshot>;
}

#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    async fn translate(&self, request: &TranslationRequest) -> anyhow::Result<TranslationResponse>;
}

/// Construct the weather provider from config.
pub fn weather_provider_from_config(config: &Config) -> OpenMeteoProvider {
    OpenMeteoProvider::new(config.weather.base_url.clone())
}

/// Construct the translation provider from config.
pub fn translation_provider_from_config(config: &Config) -> MyMemoryProvider {
    MyMemoryProvider::new(config.translation.base_url.clone())
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn providers_use_configured_urls() {
        let mut cfg = Config::default();
        cfg.weather.base_url = "http://localhost:1".into();
        cfg.translation.base_url = "http://localhost:2".into();

        assert_eq!(weather_provider_from_config(&cfg).base_url(), "http://localhost:1");
        assert_eq!(translation_provider_from_config(&cfg).base_url(), "http://localhost:2");
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
