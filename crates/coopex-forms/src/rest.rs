//! REST backend
//!
//! [`RestClient`] talks to the cooperative API: `GET {base}/{endpoint}`
//! lists records, `POST` creates, `PUT {base}/{endpoint}/{key}` updates.

use crate::config::ApiConfig;
use crate::error::SourceError;
use crate::source::{OptionSource, RecordStore};
use async_trait::async_trait;
use coopex_record::{Record, Value};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// HTTP implementation of [`OptionSource`] and [`RecordStore`]
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base: Url,
}

impl RestClient {
    /// Create client from API settings
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| SourceError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::request("<client>", e))?;
        Ok(Self { client, base })
    }

    /// Base URL endpoints are appended to
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of `endpoint`, optionally followed by a key segment
    ///
    /// # Errors
    /// Returns error if the base URL cannot take path segments
    pub fn url(&self, endpoint: &str, key: Option<&Value>) -> Result<Url, SourceError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| SourceError::InvalidUrl(self.base.to_string()))?;
            segments.pop_if_empty().push(endpoint);
            if let Some(key) = key {
                segments.push(&key.to_string());
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, SourceError> {
        let response = request
            .send()
            .await
            .map_err(|e| SourceError::request(endpoint, e))?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(SourceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            })
        }
    }

    async fn write(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
        record: &Record,
    ) -> Result<Record, SourceError> {
        let response = self.send(endpoint, request.json(record)).await?;
        let stored = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|json| Record::from_value(json).ok());
        if stored.is_none() {
            tracing::debug!(endpoint, "write response has no record body, echoing payload");
        }
        Ok(stored.unwrap_or_else(|| record.clone()))
    }
}

#[async_trait]
impl OptionSource for RestClient {
    async fn fetch_all(&self, endpoint: &str) -> Result<Vec<Record>, SourceError> {
        let url = self.url(endpoint, None)?;
        tracing::debug!(%url, "fetching options");
        let response = self.send(endpoint, self.client.get(url)).await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SourceError::request(endpoint, e))?;
        Record::list_from_value(json).map_err(|source| SourceError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RecordStore for RestClient {
    async fn create(&self, endpoint: &str, record: &Record) -> Result<Record, SourceError> {
        let url = self.url(endpoint, None)?;
        self.write(endpoint, self.client.post(url), record).await
    }

    async fn update(
        &self,
        endpoint: &str,
        _key_field: &str,
        key: &Value,
        record: &Record,
    ) -> Result<Record, SourceError> {
        let url = self.url(endpoint, Some(key))?;
        self.write(endpoint, self.client.put(url), record).await
    }

    async fn exists(&self, endpoint: &str, _key_field: &str, key: &Value) -> Result<bool, SourceError> {
        let url = self.url(endpoint, Some(key))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::request(endpoint, e))?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(SourceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}
