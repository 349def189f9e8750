//! Reqwest-backed loader for external `$ref` targets.
//!
//! Targets may be served as JSON or YAML. Only `http` and `https` URLs are
//! fetched; every other scheme is refused.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use super::body_preview;
use crate::domain::ports::{ReferenceSource, ReferenceSourceError};

/// Reference source issuing GET requests through a shared reqwest client.
#[derive(Clone)]
pub struct ReqwestReferenceSource {
    client: Client,
}

impl ReqwestReferenceSource {
    /// Build a source whose fetches give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn load(&self, url: &Url) -> Result<Value, ReferenceSourceError> {
        let unreachable =
            |err: reqwest::Error| ReferenceSourceError::unreachable(url.as_str(), err.to_string());

        let response = self
            .client
            .get(url.clone())
            .header(
                reqwest::header::ACCEPT,
                "application/json, application/yaml;q=0.9, */*;q=0.5",
            )
            .send()
            .await
            .map_err(unreachable)?;
        let status = response.status();
        let body = response.bytes().await.map_err(unreachable)?;
        if !status.is_success() {
            return Err(ReferenceSourceError::unreachable(
                url.as_str(),
                format!("status {}: {}", status.as_u16(), body_preview(body.as_ref())),
            ));
        }
        debug!(%url, bytes = body.len(), "reference target loaded");
        parse_document(url, body.as_ref())
    }
}

#[async_trait]
impl ReferenceSource for ReqwestReferenceSource {
    async fn fetch(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Value, ReferenceSourceError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ReferenceSourceError::refused(url.as_str()));
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ReferenceSourceError::cancelled()),
            result = self.load(url) => result,
        }
    }
}

/// Parse a fetched body as JSON, falling back to YAML.
fn parse_document(url: &Url, body: &[u8]) -> Result<Value, ReferenceSourceError> {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        return Ok(value);
    }
    serde_yaml::from_slice::<Value>(body)
        .map_err(|err| ReferenceSourceError::decode(url.as_str(), err.to_string()))
}
