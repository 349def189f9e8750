//! OpenAPI transformation pipeline.
//!
//! Two independent flows share this module:
//!
//! - document conversion: [`validate`] → [`Dereferencer::dereference`] →
//!   [`extract`] → [`flatten`];
//! - shape synthesis: [`infer_schema`] → [`synthesize`].
//!
//! Every stage works on `serde_json::Value` trees in document order and keeps
//! no state between calls.

mod dereference;
mod error;
mod extraction;
mod flatten;
mod pointer;
mod synthesis;
mod validation;

pub use dereference::{
    DEFAULT_MAX_EXPANDED_NODES, DEFAULT_MAX_EXTERNAL_DOCUMENTS, DEFAULT_MAX_REFERENCE_DEPTH,
    DereferenceError, Dereferencer,
};
pub use error::PipelineError;
pub use extraction::{
    ExtractedOperation, ExtractedPath, ExtractionError, OperationSummary, ParameterSummary,
    ResponseDescriptor, extract,
};
pub use flatten::{FlattenError, FlattenedApi, flatten};
pub use synthesis::{
    DEFAULT_MAX_DEPTH, DocumentInfo, InferredSchema, ItemSchema, JsonType, MediaTypeSchema,
    PropertySchema, SynthesisError, SynthesisRequest, SynthesizedDocument, SynthesizedOperation,
    SynthesizedPathItem, SynthesizedRequestBody, SynthesizedResponse, infer_schema, synthesize,
};
pub use validation::{ValidationDefect, ValidationReport, validate};

/// Operation keys of an OpenAPI 3.0 path item.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

pub(crate) fn is_http_method(key: &str) -> bool {
    HTTP_METHODS.contains(&key)
}
