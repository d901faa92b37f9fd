use inquire::{
    CustomUserError,
    autocompletion::{Autocomplete, Replacement},
};
use lookup_core::{CityCatalog, search::CitySearch};

/// Feeds the prompt's live suggestions from the city list.
#[derive(Debug, Clone)]
pub struct CityCompleter {
    catalog: CityCatalog,
    search: CitySearch,
}

impl CityCompleter {
    pub fn new(catalog: CityCatalog) -> Self {
        Self { catalog, search: CitySearch::new() }
    }
}

impl Autocomplete for CityCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self
            .search
            .on_input(&self.catalog, input)
            .iter()
            .map(|city| city.name.clone())
            .collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}
