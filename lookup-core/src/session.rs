//! Application state for the two features. Each session owns everything its
//! feature reads and writes; there is no shared global state.

pub mod translator;
pub mod weather;

pub use translator::{TranslationJob, TranslatorSession};
pub use weather::{PendingWeather, WeatherSession};

/// What happened when a response was handed back to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The response was rendered.
    Updated,
    /// A newer request was issued since; the response was dropped.
    Stale,
    /// The request failed; the session shows its fallback.
    Failed,
}
