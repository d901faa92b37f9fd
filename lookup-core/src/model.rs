use serde::{Deserialize, Serialize};

/// Soft limit shown next to the source text box. Never enforced.
pub const SOURCE_TEXT_SOFT_LIMIT: usize = 500;

/// A selectable city. `name` is the display label, e.g. "Paris, France".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    pub fn request(&self) -> WeatherRequest {
        WeatherRequest { latitude: self.latitude, longitude: self.longitude }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions for one set of coordinates, held only until rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub weather_code: i32,
    /// Today's maximum; `None` when the forecast has no value for today.
    pub precipitation_probability_pct: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub source_text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    /// Value of the `langpair` query parameter, e.g. `en|es`.
    pub fn langpair(&self) -> String {
        format!("{}|{}", self.source_lang, self.target_lang)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub translated_text: String,
}

/// Source/target language codes as picked in the two selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into() }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
    }

    pub fn request(&self, text: &str) -> TranslationRequest {
        TranslationRequest {
            source_text: text.to_string(),
            source_lang: self.source.clone(),
            target_lang: self.target.clone(),
        }
    }
}
