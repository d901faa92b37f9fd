//! Core library for the `lookup` CLI.
//!
//! This crate defines:
//! - The city list, search-as-you-type suggestions and weather icon table
//! - Weather and translation providers (Open-Meteo, MyMemory)
//! - Debouncing and latest-wins sequencing of requests
//! - Per-feature session state and configuration
//!
//! It is used by `lookup-cli`, but can also be reused by other front ends.

pub mod catalog;
pub mod config;
pub mod debounce;
pub mod icons;
pub mod model;
pub mod provider;
pub mod render;
pub mod search;
pub mod sequence;
pub mod session;

pub use catalog::{CatalogError, CatalogLoad, CityCatalog, MalformedRowPolicy};
pub use config::Config;
pub use debounce::Debouncer;
pub use icons::{IconLookup, IconTable};
pub use model::{
    City, LanguagePair, TranslationRequest, TranslationResponse, WeatherRequest, WeatherSnapshot,
};
pub use provider::{TranslationProvider, WeatherProvider};
pub use render::{TRANSLATION_ERROR_PLACEHOLDER, WeatherView};
pub use search::suggest;
pub use sequence::{RequestSequencer, Ticket};
pub use session::{Applied, TranslatorSession, WeatherSession};
