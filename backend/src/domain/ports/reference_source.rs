//! Driven port for loading documents targeted by external `$ref` values.
//!
//! The dereferencer resolves pointers itself; this port only turns an
//! absolute document URL into parsed JSON.

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while loading an external reference target.
    pub enum ReferenceSourceError {
        /// The document could not be reached.
        Unreachable { url: String, message: String } =>
            "reference target {url} unreachable: {message}",
        /// The target answered but was not JSON or YAML.
        Decode { url: String, message: String } =>
            "reference target {url} could not be parsed: {message}",
        /// The source refuses to load documents from this location.
        Refused { url: String } => "loading reference target {url} is not permitted",
        /// The caller cancelled the load.
        Cancelled => "reference loading was cancelled",
    }
}

/// Port for fetching external documents during dereferencing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Fetch and parse the document at `url`.
    ///
    /// Implementations should return [`ReferenceSourceError::Cancelled`]
    /// promptly once `cancel` fires.
    async fn fetch(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Value, ReferenceSourceError>;
}

/// Fixture implementation that refuses every fetch.
///
/// Suitable when only same-document references should resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureReferenceSource;

#[async_trait]
impl ReferenceSource for FixtureReferenceSource {
    async fn fetch(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Value, ReferenceSourceError> {
        if cancel.is_cancelled() {
            return Err(ReferenceSourceError::cancelled());
        }
        Err(ReferenceSourceError::refused(url.as_str()))
    }
}
