//! Per-operation metadata extraction from a dereferenced document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::is_http_method;

/// The document declares no paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("Invalid schema: No paths found")]
    NoPaths,
}

/// One response kept in an [`OperationSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDescriptor {
    pub code: String,
    /// Media type map of the response; `{}` when absent.
    pub content: Value,
    /// Response description; empty when absent.
    pub description: String,
}

/// Parameter projected to the attributes clients consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl ParameterSummary {
    fn project(parameter: &Value) -> Self {
        Self {
            name: string_field(parameter, "name"),
            location: string_field(parameter, "in"),
            required: parameter.get("required").and_then(Value::as_bool),
            description: string_field(parameter, "description"),
            schema: parameter.get("schema").cloned(),
        }
    }
}

/// Normalised view of one operation.
///
/// `output` holds the 2xx responses and `error_responses` the 4xx and 5xx
/// responses, both in document order. Other status codes, including
/// `default`, are not represented.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub output: Vec<ResponseDescriptor>,
    /// Request body media type map; `{}` when the operation takes no body.
    pub input: Value,
    pub parameters: Vec<ParameterSummary>,
    pub error_responses: Vec<ResponseDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OperationSummary {
    fn from_operation(operation: &Value) -> Self {
        let empty = Map::new();
        let responses = operation
            .get("responses")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        Self {
            output: descriptors(responses, |code| code.starts_with('2')),
            input: operation
                .get("requestBody")
                .and_then(|body| body.get("content"))
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            parameters: operation
                .get("parameters")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(ParameterSummary::project).collect())
                .unwrap_or_default(),
            error_responses: descriptors(responses, |code| {
                code.starts_with('4') || code.starts_with('5')
            }),
            operation_id: string_field(operation, "operationId"),
            summary: string_field(operation, "summary"),
            description: string_field(operation, "description"),
        }
    }
}

/// An operation found under a path, keyed by its lowercase method.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedOperation {
    pub method: String,
    pub summary: OperationSummary,
}

/// All operations found under one path template.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPath {
    pub path: String,
    pub operations: Vec<ExtractedOperation>,
}

/// Walk every path and method of a dereferenced document.
///
/// Each declared method key is normalised to lowercase and the operation is
/// looked up under that lowercase key. A key whose lowercase form is not
/// present is skipped with a warning; the remaining methods are still
/// extracted. Keys that are not HTTP methods (`parameters`, `summary`,
/// extensions) are ignored.
///
/// # Examples
/// ```
/// use schemaforge::domain::openapi::extract;
/// use serde_json::json;
///
/// let document = json!({
///     "paths": {"/widgets": {"get": {"responses": {
///         "200": {"description": "ok"},
///         "301": {"description": "moved"}
///     }}}}
/// });
/// let extracted = extract(&document).expect("one path");
/// let get = &extracted[0].operations[0];
/// assert_eq!(get.method, "get");
/// assert_eq!(get.summary.output.len(), 1);
/// assert!(get.summary.error_responses.is_empty());
/// ```
pub fn extract(document: &Value) -> Result<Vec<ExtractedPath>, ExtractionError> {
    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .filter(|paths| !paths.is_empty())
        .ok_or(ExtractionError::NoPaths)?;

    Ok(paths
        .iter()
        .map(|(path, item)| ExtractedPath {
            path: path.clone(),
            operations: extract_operations(path, item),
        })
        .collect())
}

fn extract_operations(path: &str, item: &Value) -> Vec<ExtractedOperation> {
    let Some(item) = item.as_object() else {
        warn!(path, "path item is not an object; skipping");
        return Vec::new();
    };

    let mut operations: Vec<ExtractedOperation> = Vec::new();
    for declared in item.keys() {
        let method = declared.to_ascii_lowercase();
        if !is_http_method(&method) {
            continue;
        }
        let Some(operation) = item.get(&method).filter(|op| op.is_object()) else {
            warn!(path, method = %method, "Method {method} not found for path {path}");
            continue;
        };
        if operations.iter().any(|existing| existing.method == method) {
            warn!(path, method = %method, declared = %declared, "duplicate method key; skipping");
            continue;
        }
        operations.push(ExtractedOperation {
            summary: OperationSummary::from_operation(operation),
            method,
        });
    }
    operations
}

fn descriptors(
    responses: &Map<String, Value>,
    keep: impl Fn(&str) -> bool,
) -> Vec<ResponseDescriptor> {
    responses
        .iter()
        .filter(|(code, _)| keep(code.as_str()))
        .map(|(code, response)| ResponseDescriptor {
            code: code.clone(),
            content: response
                .get("content")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            description: string_field(response, "description").unwrap_or_default(),
        })
        .collect()
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}
