//! Text shown to the user for weather and translation results.

use crate::{
    icons::{IconLookup, IconTable},
    model::{SOURCE_TEXT_SOFT_LIMIT, WeatherSnapshot},
};

pub const TRANSLATION_ERROR_PLACEHOLDER: &str = "Translation error. Please try again.";

/// Shown in place of the rain chance when the forecast has none for today.
pub const UNKNOWN_RAIN_CHANCE: &str = "--%";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherOutcome {
    Complete,
    /// Rendered without an icon.
    Partial { missing_icon_code: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub temperature: String,
    pub rain_chance: String,
    pub icon: Option<String>,
    pub outcome: WeatherOutcome,
}

impl WeatherView {
    pub fn render(snapshot: &WeatherSnapshot, icons: &IconTable, hour: u32) -> Self {
        let lookup = icons.resolve(snapshot.weather_code, hour);
        let outcome = match &lookup {
            IconLookup::Found { .. } => WeatherOutcome::Complete,
            IconLookup::Missing { code, .. } => WeatherOutcome::Partial { missing_icon_code: *code },
        };

        Self {
            temperature: format_temperature(snapshot.temperature_c),
            rain_chance: format_rain_chance(snapshot.precipitation_probability_pct),
            icon: lookup.image().map(str::to_owned),
            outcome,
        }
    }
}

/// Whole degrees print without a fraction: `18°C`, `18.4°C`.
pub fn format_temperature(celsius: f64) -> String {
    // Adding positive zero turns -0.0 into 0.0.
    let celsius = celsius + 0.0;
    format!("{celsius}°C")
}

pub fn format_rain_chance(percent: Option<i32>) -> String {
    match percent {
        Some(percent) => format!("{percent}%"),
        None => UNKNOWN_RAIN_CHANCE.to_string(),
    }
}

/// `"<chars>/500"`, display only.
pub fn char_counter(text: &str) -> String {
    format!("{}/{}", text.chars().count(), SOURCE_TEXT_SOFT_LIMIT)
}
