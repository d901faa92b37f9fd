//! Search-as-you-type over the city list.

use crate::{
    catalog::CityCatalog,
    model::{City, WeatherRequest},
};

pub const MAX_SUGGESTIONS: usize = 5;

/// Cities whose label contains `query` (case-insensitive), in list order,
/// at most [`MAX_SUGGESTIONS`]. An empty query yields nothing.
pub fn suggest<'a>(cities: &'a [City], query: &str) -> Vec<&'a City> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    cities
        .iter()
        .filter(|city| city.name.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// State behind the search box and its suggestion dropdown.
#[derive(Debug, Clone, Default)]
pub struct CitySearch {
    input: String,
    suggestions: Vec<City>,
    visible: bool,
}

impl CitySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Suggestions currently shown; empty while hidden.
    pub fn suggestions(&self) -> &[City] {
        if self.visible { self.suggestions.as_slice() } else { &[] }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn on_input(&mut self, catalog: &CityCatalog, text: &str) -> &[City] {
        self.input = text.to_string();
        self.suggestions = suggest(catalog.cities(), text).into_iter().cloned().collect();
        self.visible = !self.suggestions.is_empty();
        self.suggestions()
    }

    /// Picks the suggestion at `index`. Returns the coordinates to fetch.
    pub fn select(&mut self, index: usize) -> Option<WeatherRequest> {
        if !self.visible {
            return None;
        }
        let city = self.suggestions.get(index)?.clone();
        Some(self.select_city(&city))
    }

    pub fn select_city(&mut self, city: &City) -> WeatherRequest {
        self.input = city.name.clone();
        self.dismiss();
        city.request()
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
        self.suggestions.clear();
    }
}
