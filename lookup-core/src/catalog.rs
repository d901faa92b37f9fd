//! Static city list loaded once at startup.
//!
//! Rows are comma separated with the header skipped. Fields used:
//! `name@0`, `latitude@2`, `longitude@3`, `country@4`.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

use crate::model::City;

const NAME_COL: usize = 0;
const LAT_COL: usize = 2;
const LON_COL: usize = 3;
const COUNTRY_COL: usize = 4;
const MIN_COLUMNS: usize = 5;

/// What to do with a row that cannot be turned into a [`City`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Drop the row and keep loading.
    #[default]
    Skip,
    /// Fail the whole load.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {reason}")]
pub struct RowError {
    /// 1-based line number in the source text.
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read city list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed city row at {0}")]
    MalformedRow(RowError),

    #[error("city list contains no usable rows")]
    Empty,
}

/// Result of a load: the usable cities plus the rows that were dropped.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub catalog: CityCatalog,
    pub skipped: Vec<RowError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityCatalog {
    cities: Vec<City>,
}

impl CityCatalog {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    pub fn load(path: &Path, policy: MalformedRowPolicy) -> Result<CatalogLoad, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let loaded = Self::parse_str(&text, policy)?;
        tracing::info!(
            path = %path.display(),
            cities = loaded.catalog.len(),
            skipped = loaded.skipped.len(),
            "loaded city list"
        );
        Ok(loaded)
    }

    pub fn parse_str(text: &str, policy: MalformedRowPolicy) -> Result<CatalogLoad, CatalogError> {
        let mut cities = Vec::new();
        let mut skipped = Vec::new();

        for (idx, raw) in text.lines().enumerate().skip(1) {
            if raw.trim().is_empty() {
                continue;
            }

            match parse_row(raw) {
                Ok(city) => cities.push(city),
                Err(reason) => {
                    let err = RowError { line: idx + 1, reason };
                    match policy {
                        MalformedRowPolicy::Reject => return Err(CatalogError::MalformedRow(err)),
                        MalformedRowPolicy::Skip => {
                            tracing::warn!(line = err.line, reason = %err.reason, "skipping city row");
                            skipped.push(err);
                        }
                    }
                }
            }
        }

        if cities.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(CatalogLoad { catalog: Self { cities }, skipped })
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// The city shown on startup.
    pub fn first(&self) -> Option<&City> {
        self.cities.first()
    }

    /// Exact label lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.name == name)
    }
}

/// Splits a row on commas outside double quotes. Quotes are stripped and
/// fields trimmed.
pub fn split_fields(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in row.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

fn parse_row(row: &str) -> Result<City, String> {
    let fields = split_fields(row);
    if fields.len() < MIN_COLUMNS {
        return Err(format!(
            "expected at least {MIN_COLUMNS} columns, found {}",
            fields.len()
        ));
    }

    let latitude = parse_coordinate(&fields[LAT_COL], "latitude")?;
    let longitude = parse_coordinate(&fields[LON_COL], "longitude")?;

    Ok(City {
        name: format!("{}, {}", fields[NAME_COL], fields[COUNTRY_COL]),
        latitude,
        longitude,
    })
}

fn parse_coordinate(value: &str, what: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid {what} '{value}'")),
    }
}
