//! Weather code to icon resolution.
//!
//! The table is a JSON object keyed by weather-code string:
//!
//! ```json
//! { "0": { "day": { "image": "clear-day.png" }, "night": { "image": "clear-night.png" } } }
//! ```

use chrono::{Local, Timelike};
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};
use thiserror::Error;

const DAY_START_HOUR: u32 = 6;
const NIGHT_START_HOUR: u32 = 18;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("failed to read icon table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse icon table: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconVariant {
    Day,
    Night,
}

impl IconVariant {
    pub fn for_hour(hour: u32) -> Self {
        if is_daytime(hour) { Self::Day } else { Self::Night }
    }
}

/// Day is `[06:00, 18:00)`.
pub fn is_daytime(hour: u32) -> bool {
    (DAY_START_HOUR..NIGHT_START_HOUR).contains(&hour)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconLookup {
    Found { variant: IconVariant, image: String },
    Missing { code: i32, variant: IconVariant },
}

impl IconLookup {
    pub fn image(&self) -> Option<&str> {
        match self {
            IconLookup::Found { image, .. } => Some(image),
            IconLookup::Missing { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct IconImage {
    image: String,
}

#[derive(Debug, Clone, Deserialize)]
struct IconEntry {
    day: Option<IconImage>,
    night: Option<IconImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct IconTable {
    entries: HashMap<String, IconEntry>,
}

impl IconTable {
    pub fn from_json(json: &str) -> Result<Self, IconError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, IconError> {
        let json = fs::read_to_string(path).map_err(|source| IconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, code: i32, hour: u32) -> IconLookup {
        let variant = IconVariant::for_hour(hour);
        let image = self.entries.get(&code.to_string()).and_then(|entry| match variant {
            IconVariant::Day => entry.day.as_ref(),
            IconVariant::Night => entry.night.as_ref(),
        });

        match image {
            Some(icon) => IconLookup::Found { variant, image: icon.image.clone() },
            None => {
                tracing::warn!(code, ?variant, "weather icon not found");
                IconLookup::Missing { code, variant }
            }
        }
    }

    /// Resolves against the local wall-clock hour.
    pub fn resolve_now(&self, code: i32) -> IconLookup {
        self.resolve(code, Local::now().hour())
    }
}
