use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::interface::{TranslateInterface, TranslateRequest, Translation};
use crate::error::TranslateError;

/// Google Cloud Translation v2 client
#[derive(Debug, Clone)]
pub struct GoogleTranslateClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GoogleTranslateBody<'a> {
    q: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslateResponse {
    data: GoogleTranslateData,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslateData {
    translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTranslation {
    translated_text: String,
    detected_source_language: Option<String>,
}

impl GoogleTranslateClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        info!("Initialized GoogleTranslateClient: endpoint={}", endpoint);
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    fn query_params<'a>(&'a self, request: &TranslateRequest) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("key", self.api_key.as_str()),
            ("target", request.target.code()),
        ];
        if let Some(source) = request.source {
            params.push(("source", source.code()));
        }
        params
    }
}

#[async_trait]
impl TranslateInterface for GoogleTranslateClient {
    async fn translate(&self, request: &TranslateRequest) -> Result<Translation, TranslateError> {
        debug!(
            "Sending translation request: chars={}, source={:?}, target={}",
            request.text.chars().count(),
            request.source,
            request.target
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&self.query_params(request))
            .json(&GoogleTranslateBody {
                q: &request.text,
                format: "text",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: GoogleTranslateResponse = serde_json::from_str(&body)
            .map_err(|e| TranslateError::Malformed(format!("{}: {}", e, body)))?;

        let first = parsed
            .data
            .translations
            .into_iter()
            .next()
            .ok_or(TranslateError::NoTranslations)?;

        debug!(
            "Translation received: detected_source={:?}",
            first.detected_source_language
        );

        Ok(Translation {
            translated_text: first.translated_text,
            detected_source_language: first.detected_source_language,
        })
    }

    fn provider(&self) -> &'static str {
        "google"
    }
}
