//! Shape inference from example payloads and single-operation document
//! assembly.
//!
//! Every key of an example object becomes a required property carrying a
//! placeholder description and the example value itself. Array item types are
//! sampled from the first element only, so heterogeneous arrays report the
//! type of whatever comes first.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default bound on object nesting inside an example payload.
pub const DEFAULT_MAX_DEPTH: usize = 32;

const EXAMPLE_PATH: &str = "/example-endpoint";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Reasons synthesis rejects a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("No data provided: {field} is missing")]
    Missing { field: &'static str },
    #[error("No data provided: {field} has no keys")]
    Empty { field: &'static str },
    #[error("{field} must be a JSON object")]
    NotAnObject { field: &'static str },
    #[error("example nesting exceeds the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },
}

/// JSON type names emitted in inferred schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Object,
    Array,
    String,
    Number,
    Boolean,
}

impl JsonType {
    /// Runtime type of an example value. `null` reports as `object`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null | Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
        }
    }
}

/// Item type of an array property; empty when the example array was empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSchema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<JsonType>,
}

/// Schema of one example property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub description: String,
    pub example: Value,
    #[serde(rename = "type")]
    pub kind: JsonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemSchema>,
    /// Nested object properties. Nested objects carry no `required` list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, PropertySchema>>,
}

/// Object schema inferred from an example payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferredSchema {
    #[serde(rename = "type")]
    pub kind: JsonType,
    pub properties: IndexMap<String, PropertySchema>,
    /// Every property name, in example order.
    pub required: Vec<String>,
}

/// Infer an object schema from an example object.
///
/// # Errors
/// Returns [`SynthesisError::DepthExceeded`] when objects are nested more than
/// `max_depth` levels deep, counting `example` itself as the first level.
///
/// # Examples
/// ```
/// use schemaforge::domain::openapi::{JsonType, infer_schema};
/// use serde_json::json;
///
/// let example = json!({"tags": ["a", "b"]});
/// let schema = infer_schema(example.as_object().expect("object"), 8).expect("shallow");
/// let tags = &schema.properties["tags"];
/// assert_eq!(tags.kind, JsonType::Array);
/// assert_eq!(tags.items.as_ref().and_then(|i| i.kind), Some(JsonType::String));
/// ```
pub fn infer_schema(
    example: &Map<String, Value>,
    max_depth: usize,
) -> Result<InferredSchema, SynthesisError> {
    let properties = infer_properties(example, 1, max_depth)?;
    Ok(InferredSchema {
        kind: JsonType::Object,
        required: properties.keys().cloned().collect(),
        properties,
    })
}

fn infer_properties(
    object: &Map<String, Value>,
    depth: usize,
    max_depth: usize,
) -> Result<IndexMap<String, PropertySchema>, SynthesisError> {
    if depth > max_depth {
        return Err(SynthesisError::DepthExceeded { max_depth });
    }
    object
        .iter()
        .map(|(key, value)| {
            infer_property(key, value, depth, max_depth).map(|schema| (key.clone(), schema))
        })
        .collect()
}

fn infer_property(
    key: &str,
    value: &Value,
    depth: usize,
    max_depth: usize,
) -> Result<PropertySchema, SynthesisError> {
    let (items, properties) = match value {
        Value::Array(elements) => (
            Some(ItemSchema {
                kind: elements.first().map(JsonType::of),
            }),
            None,
        ),
        Value::Object(nested) => (None, Some(infer_properties(nested, depth + 1, max_depth)?)),
        _ => (None, None),
    };
    Ok(PropertySchema {
        description: format!("Description for {key}"),
        example: value.clone(),
        kind: JsonType::of(value),
        items,
        properties,
    })
}

/// Example payloads for [`synthesize`], as posted by clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    #[serde(default)]
    pub input: Option<Value>,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub parameters: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: String,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaTypeSchema {
    pub schema: InferredSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedRequestBody {
    pub description: String,
    pub content: IndexMap<String, MediaTypeSchema>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedResponse {
    pub description: String,
    pub content: IndexMap<String, MediaTypeSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedOperation {
    pub summary: String,
    pub description: String,
    /// Caller-supplied parameters, passed through untouched.
    pub parameters: Vec<Value>,
    pub request_body: SynthesizedRequestBody,
    pub responses: IndexMap<String, SynthesizedResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedPathItem {
    pub post: SynthesizedOperation,
}

/// Single-operation OpenAPI 3.0 document built by [`synthesize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedDocument {
    pub openapi: String,
    pub info: DocumentInfo,
    pub paths: IndexMap<String, SynthesizedPathItem>,
}

/// Build a `POST /example-endpoint` document from example payloads.
///
/// The inferred input schema becomes the JSON request body and the inferred
/// output schema the only `200` response. The result depends on nothing but
/// the request, so identical requests yield identical documents.
pub fn synthesize(
    request: SynthesisRequest,
    max_depth: usize,
) -> Result<SynthesizedDocument, SynthesisError> {
    let input = required_object(request.input.as_ref(), "input")?;
    let output = required_object(request.output.as_ref(), "output")?;
    let parameters = request
        .parameters
        .ok_or(SynthesisError::Missing { field: "parameters" })?;

    let input_schema = infer_schema(input, max_depth)?;
    let output_schema = infer_schema(output, max_depth)?;

    let operation = SynthesizedOperation {
        summary: "Example endpoint".to_owned(),
        description: "This is an example endpoint".to_owned(),
        parameters,
        request_body: SynthesizedRequestBody {
            description: "Input payload".to_owned(),
            content: json_content(input_schema),
            required: true,
        },
        responses: IndexMap::from([(
            "200".to_owned(),
            SynthesizedResponse {
                description: "Successful response".to_owned(),
                content: json_content(output_schema),
            },
        )]),
    };

    Ok(SynthesizedDocument {
        openapi: "3.0.0".to_owned(),
        info: DocumentInfo {
            title: "API Documentation".to_owned(),
            version: "1.0.0".to_owned(),
            description: "Automatically generated OpenAPI 3.0 schema".to_owned(),
        },
        paths: IndexMap::from([(
            EXAMPLE_PATH.to_owned(),
            SynthesizedPathItem { post: operation },
        )]),
    })
}

fn required_object<'v>(
    value: Option<&'v Value>,
    field: &'static str,
) -> Result<&'v Map<String, Value>, SynthesisError> {
    match value {
        None | Some(Value::Null) => Err(SynthesisError::Missing { field }),
        Some(Value::Object(map)) if map.is_empty() => Err(SynthesisError::Empty { field }),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(SynthesisError::NotAnObject { field }),
    }
}

fn json_content(schema: InferredSchema) -> IndexMap<String, MediaTypeSchema> {
    IndexMap::from([(JSON_MEDIA_TYPE.to_owned(), MediaTypeSchema { schema })])
}
