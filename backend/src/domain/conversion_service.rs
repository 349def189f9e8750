//! Conversion domain service.
//!
//! Runs the pipeline stages in order and translates every stage failure into
//! the domain [`Error`] at this boundary.

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::domain::Error;
use crate::domain::openapi::{
    DEFAULT_MAX_DEPTH, Dereferencer, FlattenedApi, PipelineError, SynthesisRequest,
    SynthesizedDocument, extract, flatten, synthesize, validate,
};
use crate::domain::ports::DocumentConversion;

/// Pipeline-backed implementation of [`DocumentConversion`].
#[derive(Clone)]
pub struct ConversionService {
    dereferencer: Dereferencer,
    synthesis_max_depth: usize,
}

impl ConversionService {
    /// Create a service resolving references with `dereferencer`.
    pub fn new(dereferencer: Dereferencer) -> Self {
        Self {
            dereferencer,
            synthesis_max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the nesting bound used when inferring example schemas.
    #[must_use]
    pub fn with_synthesis_max_depth(mut self, max_depth: usize) -> Self {
        self.synthesis_max_depth = max_depth;
        self
    }

    async fn run_conversion(
        &self,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<FlattenedApi, PipelineError> {
        if is_empty_body(&document) {
            return Err(PipelineError::validation("No data provided", None));
        }

        let report = validate(&document);
        if !report.valid {
            let first = report.first_message().unwrap_or_default().to_owned();
            let errors = serde_json::to_value(&report.errors)
                .map_err(|err| PipelineError::Unexpected(err.to_string()))?;
            return Err(PipelineError::validation(
                "Invalid OpenAPI schema",
                Some(json!({ "message": first, "errors": errors })),
            ));
        }

        let resolved = self.dereferencer.dereference(document, cancel).await?;
        let extracted = extract(&resolved)?;
        Ok(flatten(extracted)?)
    }
}

#[async_trait]
impl DocumentConversion for ConversionService {
    async fn convert(
        &self,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<FlattenedApi, Error> {
        self.run_conversion(document, cancel)
            .await
            .map_err(into_domain_error)
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedDocument, Error> {
        synthesize(request, self.synthesis_max_depth)
            .map_err(|err| into_domain_error(err.into()))
    }
}

fn is_empty_body(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn into_domain_error(err: PipelineError) -> Error {
    match &err {
        PipelineError::Unexpected(message) => error!(%message, "conversion failed unexpectedly"),
        PipelineError::Usage(cause) => error!(%cause, "conversion pipeline misused"),
        other => debug!(error = %other, "conversion rejected"),
    }
    err.into()
}

#[cfg(test)]
#[path = "conversion_service_tests.rs"]
mod tests;
