use anyhow::Result;
use std::sync::Arc;

use crate::{
    model::{LanguagePair, TranslationRequest, TranslationResponse},
    provider::TranslationProvider,
    render::{TRANSLATION_ERROR_PLACEHOLDER, char_counter},
    sequence::{RequestSequencer, Ticket},
};

use super::Applied;

/// A request tagged for latest-wins application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub ticket: Ticket,
    pub request: TranslationRequest,
}

impl TranslationJob {
    pub async fn run<P>(self, provider: &P) -> (Ticket, Result<TranslationResponse>)
    where
        P: TranslationProvider + ?Sized,
    {
        let result = provider.translate(&self.request).await;
        (self.ticket, result)
    }
}

/// Source text, language selectors and the output field.
///
/// Edits return the request they imply; the caller decides whether to
/// debounce it (typing) or send it straight away (selector changes, swap).
#[derive(Debug)]
pub struct TranslatorSession<P> {
    pair: LanguagePair,
    text: String,
    output: String,
    provider: Arc<P>,
    sequencer: RequestSequencer,
}

impl<P: TranslationProvider> TranslatorSession<P> {
    pub fn new(pair: LanguagePair, provider: P) -> Self {
        Self {
            pair,
            text: String::new(),
            output: String::new(),
            provider: Arc::new(provider),
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn counter(&self) -> String {
        char_counter(&self.text)
    }

    pub fn provider(&self) -> Arc<P> {
        Arc::clone(&self.provider)
    }

    pub fn request(&self) -> TranslationRequest {
        self.pair.request(&self.text)
    }

    pub fn set_text(&mut self, text: &str) -> TranslationRequest {
        self.text = text.to_string();
        self.request()
    }

    pub fn set_source(&mut self, lang: &str) -> TranslationRequest {
        self.pair.source = lang.to_string();
        self.request()
    }

    pub fn set_target(&mut self, lang: &str) -> TranslationRequest {
        self.pair.target = lang.to_string();
        self.request()
    }

    /// Swaps the languages. A real translation in the output moves into the
    /// input, and the old input becomes the output.
    pub fn swap(&mut self) -> TranslationRequest {
        self.pair.swap();
        if !self.output.is_empty() && self.output != TRANSLATION_ERROR_PLACEHOLDER {
            std::mem::swap(&mut self.text, &mut self.output);
        }
        self.request()
    }

    /// Tags `request` as the newest one in flight.
    pub fn begin(&self, request: TranslationRequest) -> TranslationJob {
        TranslationJob { ticket: self.sequencer.issue(), request }
    }

    pub async fn translate(&self, job: TranslationJob) -> (Ticket, Result<TranslationResponse>) {
        job.run(self.provider.as_ref()).await
    }

    /// Writes the result into the output unless a newer job has started.
    /// Errors show the fixed placeholder.
    pub fn apply(&mut self, ticket: Ticket, result: Result<TranslationResponse>) -> Applied {
        if !self.sequencer.is_current(ticket) {
            tracing::debug!(ticket = ticket.get(), "dropping stale translation");
            return Applied::Stale;
        }

        match result {
            Ok(response) => {
                self.output = response.translated_text;
                Applied::Updated
            }
            Err(err) => {
                tracing::error!("translation failed: {err:#}");
                self.output = TRANSLATION_ERROR_PLACEHOLDER.to_string();
                Applied::Failed
            }
        }
    }
}
