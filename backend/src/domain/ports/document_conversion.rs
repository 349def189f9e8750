//! Driving port for the conversion endpoints.
//!
//! Inbound adapters call this port instead of the pipeline stages so they can
//! be tested against a mock and stay unaware of reference loading.

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::domain::Error;
use crate::domain::openapi::{FlattenedApi, SynthesisRequest, SynthesizedDocument};

/// Port converting OpenAPI documents to and from the flattened shape.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentConversion: Send + Sync {
    /// Validate, dereference, extract and flatten a document.
    async fn convert(
        &self,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<FlattenedApi, Error>;

    /// Build a single-operation document from example payloads.
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedDocument, Error>;
}
