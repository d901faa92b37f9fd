use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    model::{TranslationRequest, TranslationResponse},
    provider::truncate_body,
};

use super::TranslationProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.mymemory.translated.net";

#[derive(Debug, Clone)]
pub struct MyMemoryProvider {
    base_url: String,
    http: Client,
}

impl MyMemoryProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MmResponseData {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MmResponse {
    response_data: MmResponseData,
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse> {
        if request.source_text.is_empty() {
            return Ok(TranslationResponse { translated_text: String::new() });
        }

        let url = format!("{}/get", self.base_url);
        let langpair = request.langpair();

        tracing::info!(%langpair, chars = request.source_text.chars().count(), "translating text");

        let res = self
            .http
            .get(&url)
            .query(&[("q", request.source_text.as_str()), ("langpair", langpair.as_str())])
            .send()
            .await
            .context("Failed to send request to MyMemory")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read MyMemory response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "MyMemory request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: MmResponse =
            serde_json::from_str(&body).context("Failed to parse MyMemory JSON")?;

        Ok(TranslationResponse { translated_text: parsed.response_data.translated_text })
    }
}
