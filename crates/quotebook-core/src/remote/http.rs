//! reqwest-backed remote collection client.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::{records_to_quotes, RemoteCollection};
use crate::error::{Error, Result};
use crate::models::Quote;
use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

/// Longest slice of an error body quoted back in a `Network` error.
const ERROR_BODY_PREVIEW_CHARS: usize = 180;

/// Remote collection reachable over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpRemoteCollection {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemoteCollection {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteCollection for HttpRemoteCollection {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Network(parse_api_error(status, &body)));
        }

        let body = response.text().await?;
        let payload: Value = serde_json::from_str(&body).map_err(|error| {
            Error::Network(format!("remote returned invalid JSON: {error}"))
        })?;
        let Value::Array(records) = payload else {
            return Err(Error::Network(
                "remote did not return a JSON array".to_string(),
            ));
        };

        tracing::debug!("Fetched {} remote records", records.len());
        records_to_quotes(records)
    }

    async fn push_quotes(&self, quotes: &[Quote]) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(quotes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Network(parse_api_error(status, &body)));
        }

        tracing::debug!("Posted {} quotes to remote", quotes.len());
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<RemoteErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body
        .trim()
        .chars()
        .take(ERROR_BODY_PREVIEW_CHARS)
        .collect::<String>();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_endpoint(raw: String) -> Result<String> {
    let endpoint = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::Config("remote URL must not be empty".to_string()))?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(
            "remote URL must include http:// or https://".to_string(),
        ))
    }
}
