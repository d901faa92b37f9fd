use anyhow::Result;
use chrono::{Local, Timelike};
use std::sync::Arc;

use crate::{
    catalog::CityCatalog,
    icons::IconTable,
    model::{City, WeatherRequest, WeatherSnapshot},
    provider::WeatherProvider,
    render::WeatherView,
    search::CitySearch,
    sequence::{RequestSequencer, Ticket},
};

use super::Applied;

/// A selection that still needs its weather fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingWeather {
    pub ticket: Ticket,
    pub request: WeatherRequest,
}

#[derive(Debug)]
pub struct WeatherSession<P> {
    catalog: CityCatalog,
    search: CitySearch,
    icons: IconTable,
    provider: Arc<P>,
    sequencer: RequestSequencer,
    view: Option<WeatherView>,
}

impl<P: WeatherProvider> WeatherSession<P> {
    pub fn new(catalog: CityCatalog, icons: IconTable, provider: P) -> Self {
        Self {
            catalog,
            search: CitySearch::new(),
            icons,
            provider: Arc::new(provider),
            sequencer: RequestSequencer::new(),
            view: None,
        }
    }

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    pub fn search(&self) -> &CitySearch {
        &self.search
    }

    pub fn provider(&self) -> Arc<P> {
        Arc::clone(&self.provider)
    }

    /// Last rendered weather, if any.
    pub fn view(&self) -> Option<&WeatherView> {
        self.view.as_ref()
    }

    /// Feeds the search box; returns the visible suggestions.
    pub fn input(&mut self, text: &str) -> &[City] {
        self.search.on_input(&self.catalog, text)
    }

    pub fn dismiss(&mut self) {
        self.search.dismiss();
    }

    pub fn select(&mut self, index: usize) -> Option<PendingWeather> {
        let request = self.search.select(index)?;
        Some(self.issue(request))
    }

    /// Selects the first city of the list, as done on startup.
    pub fn select_default(&mut self) -> Option<PendingWeather> {
        let city = self.catalog.first()?.clone();
        Some(self.select_city(&city))
    }

    pub fn select_city(&mut self, city: &City) -> PendingWeather {
        let request = self.search.select_city(city);
        self.issue(request)
    }

    pub async fn fetch(&self, pending: PendingWeather) -> (Ticket, Result<WeatherSnapshot>) {
        let result = self.provider.get_weather(&pending.request).await;
        (pending.ticket, result)
    }

    /// Renders `result` unless a newer selection has been made. Failures are
    /// logged and leave the previous view in place.
    pub fn apply(&mut self, ticket: Ticket, result: Result<WeatherSnapshot>, hour: u32) -> Applied {
        if !self.sequencer.is_current(ticket) {
            tracing::debug!(ticket = ticket.get(), "dropping stale weather response");
            return Applied::Stale;
        }

        match result {
            Ok(snapshot) => {
                self.view = Some(WeatherView::render(&snapshot, &self.icons, hour));
                Applied::Updated
            }
            Err(err) => {
                tracing::error!("weather fetch failed: {err:#}");
                Applied::Failed
            }
        }
    }

    pub fn apply_now(&mut self, ticket: Ticket, result: Result<WeatherSnapshot>) -> Applied {
        self.apply(ticket, result, Local::now().hour())
    }

    fn issue(&self, request: WeatherRequest) -> PendingWeather {
        PendingWeather { ticket: self.sequencer.issue(), request }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::WeatherOutcome;
    use anyhow::anyhow;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedProvider;

    #[async_trait]
    impl WeatherProvider for FixedProvider {
        async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherSnapshot> {
            Ok(snapshot(request.latitude, 10.0))
        }
    }

    fn snapshot(latitude: f64, temperature_c: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            latitude,
            longitude: 0.0,
            temperature_c,
            weather_code: 0,
            precipitation_probability_pct: Some(5),
        }
    }

    fn session() -> WeatherSession<FixedProvider> {
        let catalog = CityCatalog::new(vec![
            City { name: "Oslo, Norway".into(), latitude: 59.91, longitude: 10.75 },
            City { name: "Paris, France".into(), latitude: 48.85, longitude: 2.35 },
        ]);
        let icons = IconTable::from_json(
            r#"{"0": {"day": {"image": "sun.png"}, "night": {"image": "moon.png"}}}"#,
        )
        .unwrap();
        WeatherSession::new(catalog, icons, FixedProvider)
    }

    #[test]
    fn default_selection_uses_first_city() {
        let mut s = session();
        let pending = s.select_default().unwrap();
        assert_eq!(pending.request.latitude, 59.91);
        assert_eq!(s.search().input(), "Oslo, Norway");
    }

    #[test]
    fn select_requires_visible_suggestion() {
        let mut s = session();
        assert!(s.select(0).is_none());

        assert_eq!(s.input("paris").len(), 1);
        let pending = s.select(0).unwrap();
        assert_eq!(pending.request, WeatherRequest { latitude: 48.85, longitude: 2.35 });
        assert!(s.search().suggestions().is_empty());
    }

    #[test]
    fn stale_response_does_not_overwrite_newer_one() {
        let mut s = session();
        s.input("oslo");
        let first = s.select(0).unwrap();
        s.input("paris");
        let second = s.select(0).unwrap();

        assert_eq!(s.apply(second.ticket, Ok(snapshot(48.85, 18.0)), 12), Applied::Updated);
        assert_eq!(s.apply(first.ticket, Ok(snapshot(59.91, -2.0)), 12), Applied::Stale);
        assert_eq!(s.view().unwrap().temperature, "18°C");
    }

    #[test]
    fn failure_keeps_previous_view() {
        let mut s = session();
        let first = s.select_default().unwrap();
        s.apply(first.ticket, Ok(snapshot(59.91, 3.0)), 12);

        let second = s.select_default().unwrap();
        assert_eq!(s.apply(second.ticket, Err(anyhow!("offline")), 12), Applied::Failed);
        assert_eq!(s.view().unwrap().temperature, "3°C");
    }

    #[test]
    fn night_hour_picks_night_icon() {
        let mut s = session();
        let pending = s.select_default().unwrap();
        s.apply(pending.ticket, Ok(snapshot(59.91, 3.0)), 23);
        let view = s.view().unwrap();
        assert_eq!(view.icon.as_deref(), Some("moon.png"));
        assert_eq!(view.outcome, WeatherOutcome::Complete);
    }

    #[tokio::test]
    async fn fetch_returns_ticket_with_result() {
        let mut s = session();
        let pending = s.select_default().unwrap();
        let (ticket, result) = s.fetch(pending).await;
        assert_eq!(ticket, pending.ticket);
        assert_eq!(s.apply(ticket, result, 10), Applied::Updated);
        assert_eq!(s.view().unwrap().temperature, "10°C");
    }
}
