//! Structural and referential validation of OpenAPI 3.0 documents.
//!
//! Checks run in three passes over the untyped tree: the document shape,
//! conformity with the typed `openapiv3` model, and `$ref` integrity. Each
//! defect names a JSON pointer into the document and the matching location in
//! the OpenAPI 3.0 meta-schema. Validation never fails; problems are always
//! reported through [`ValidationReport`].

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::{is_http_method, pointer};

const PARAMETER_LOCATIONS: [&str; 4] = ["query", "path", "header", "cookie"];
const PATH_ITEM_FIELDS: [&str; 5] = ["$ref", "summary", "description", "servers", "parameters"];
const OPENAPI_VERSION_PATTERN: &str = r"^3\.0\.\d+(-.+)?$";
const STATUS_CODE_PATTERN: &str = r"^([1-5](\d{2}|XX)|default)$";

/// One problem found in a candidate document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDefect {
    /// Human-readable description of the problem.
    pub message: String,
    /// JSON pointer to the offending node in the document.
    pub path: String,
    /// Location of the violated rule in the OpenAPI 3.0 meta-schema.
    pub schema_path: String,
    /// Rule-specific context such as the missing property name.
    pub details: Value,
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationDefect>,
}

impl ValidationReport {
    fn from_defects(errors: Vec<ValidationDefect>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Message of the first defect, if any.
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|defect| defect.message.as_str())
    }
}

/// Validate a candidate OpenAPI 3.0 document.
///
/// A document without `paths` passes validation; emptiness is reported later
/// by extraction so callers can tell "not an OpenAPI document" apart from
/// "an API with no operations".
///
/// # Examples
/// ```
/// use schemaforge::domain::openapi::validate;
/// use serde_json::json;
///
/// let report = validate(&json!({
///     "openapi": "3.0.0",
///     "info": {"title": "Pets", "version": "1"},
///     "paths": {}
/// }));
/// assert!(report.valid);
///
/// let report = validate(&json!("not a document"));
/// assert_eq!(report.errors.len(), 1);
/// assert!(report.errors[0].path.is_empty());
/// ```
pub fn validate(document: &Value) -> ValidationReport {
    let Some(root) = document.as_object() else {
        return ValidationReport::from_defects(vec![ValidationDefect {
            message: "document must be a JSON object".to_owned(),
            path: String::new(),
            schema_path: String::new(),
            details: json!({}),
        }]);
    };

    let mut checker = Checker::default();
    checker.check_root(root);
    if checker.defects.is_empty() {
        checker.check_typed(document);
    }
    checker.check_references(document, document, "");
    ValidationReport::from_defects(checker.defects)
}

#[derive(Default)]
struct Checker {
    defects: Vec<ValidationDefect>,
}

impl Checker {
    fn push(
        &mut self,
        message: impl Into<String>,
        path: impl Into<String>,
        schema_path: impl Into<String>,
        details: Value,
    ) {
        self.defects.push(ValidationDefect {
            message: message.into(),
            path: path.into(),
            schema_path: schema_path.into(),
            details,
        });
    }

    fn require<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        key: &str,
        path: &str,
        definition: &str,
    ) -> Option<&'v Value> {
        let value = object.get(key);
        if value.is_none() {
            self.push(
                format!("must have required property '{key}'"),
                path,
                format!("{definition}/required"),
                json!({ "missingProperty": key }),
            );
        }
        value
    }

    fn expect_object<'v>(
        &mut self,
        value: &'v Value,
        path: &str,
        schema_path: &str,
    ) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.push(
                "must be object",
                path,
                format!("{schema_path}/type"),
                json!({ "type": "object" }),
            );
        }
        object
    }

    fn expect_string<'v>(
        &mut self,
        value: &'v Value,
        path: &str,
        schema_path: &str,
    ) -> Option<&'v str> {
        let text = value.as_str();
        if text.is_none() {
            self.push(
                "must be string",
                path,
                format!("{schema_path}/type"),
                json!({ "type": "string" }),
            );
        }
        text
    }

    fn check_root(&mut self, root: &Map<String, Value>) {
        if let Some(version) = self.require(root, "openapi", "", "#") {
            let version = self.expect_string(version, "/openapi", "#/properties/openapi");
            if version.is_some_and(|v| !is_openapi_30(v)) {
                self.push(
                    format!("must match pattern \"{OPENAPI_VERSION_PATTERN}\""),
                    "/openapi",
                    "#/properties/openapi/pattern",
                    json!({ "pattern": OPENAPI_VERSION_PATTERN }),
                );
            }
        }
        if let Some(info) = self.require(root, "info", "", "#") {
            self.check_info(info);
        }
        if let Some(paths) = root.get("paths") {
            self.check_paths(paths);
        }
    }

    fn check_info(&mut self, info: &Value) {
        let Some(info) = self.expect_object(info, "/info", "#/properties/info") else {
            return;
        };
        for key in ["title", "version"] {
            if let Some(value) = self.require(info, key, "/info", "#/definitions/Info") {
                self.expect_string(
                    value,
                    &pointer::join("/info", key),
                    &format!("#/definitions/Info/properties/{key}"),
                );
            }
        }
    }

    fn check_paths(&mut self, paths: &Value) {
        let Some(paths) = self.expect_object(paths, "/paths", "#/properties/paths") else {
            return;
        };
        for (template, item) in paths {
            if template.starts_with("x-") {
                continue;
            }
            let path = pointer::join("/paths", template);
            if !template.starts_with('/') {
                self.push(
                    "path templates must start with \"/\"",
                    path,
                    "#/definitions/Paths/patternProperties",
                    json!({ "pathTemplate": template }),
                );
                continue;
            }
            self.check_path_item(item, &path);
        }
    }

    fn check_path_item(&mut self, item: &Value, path: &str) {
        let Some(item) = self.expect_object(item, path, "#/definitions/PathItem") else {
            return;
        };
        for (key, value) in item {
            let field = key.as_str();
            if is_http_method(field) {
                self.check_operation(value, &pointer::join(path, field));
            } else if field == "parameters" {
                self.check_parameters(value, &pointer::join(path, field));
            } else if !PATH_ITEM_FIELDS.contains(&field) && !field.starts_with("x-") {
                self.push(
                    "must NOT have additional properties",
                    path,
                    "#/definitions/PathItem/additionalProperties",
                    json!({ "additionalProperty": key }),
                );
            }
        }
    }

    fn check_operation(&mut self, value: &Value, path: &str) {
        let Some(operation) = self.expect_object(value, path, "#/definitions/Operation") else {
            return;
        };
        if let Some(responses) =
            self.require(operation, "responses", path, "#/definitions/Operation")
        {
            self.check_responses(responses, &pointer::join(path, "responses"));
        }
        if let Some(parameters) = operation.get("parameters") {
            self.check_parameters(parameters, &pointer::join(path, "parameters"));
        }
        if let Some(body) = operation.get("requestBody") {
            self.check_request_body(body, &pointer::join(path, "requestBody"));
        }
    }

    fn check_responses(&mut self, value: &Value, path: &str) {
        let Some(responses) = self.expect_object(value, path, "#/definitions/Responses") else {
            return;
        };
        if responses.is_empty() {
            self.push(
                "must NOT have fewer than 1 properties",
                path,
                "#/definitions/Responses/minProperties",
                json!({ "limit": 1 }),
            );
        }
        for (code, response) in responses {
            if code.starts_with("x-") {
                continue;
            }
            let response_path = pointer::join(path, code);
            if !is_status_code(code) {
                self.push(
                    format!("must match pattern \"{STATUS_CODE_PATTERN}\""),
                    response_path,
                    "#/definitions/Responses/patternProperties",
                    json!({ "statusCode": code }),
                );
                continue;
            }
            if is_reference(response) {
                continue;
            }
            let Some(response) =
                self.expect_object(response, &response_path, "#/definitions/Response")
            else {
                continue;
            };
            if let Some(description) =
                self.require(response, "description", &response_path, "#/definitions/Response")
            {
                self.expect_string(
                    description,
                    &pointer::join(&response_path, "description"),
                    "#/definitions/Response/properties/description",
                );
            }
        }
    }

    fn check_parameters(&mut self, value: &Value, path: &str) {
        let Some(parameters) = value.as_array() else {
            self.push(
                "must be array",
                path,
                "#/definitions/Operation/properties/parameters/type",
                json!({ "type": "array" }),
            );
            return;
        };
        for (index, parameter) in parameters.iter().enumerate() {
            if is_reference(parameter) {
                continue;
            }
            let parameter_path = pointer::join(path, &index.to_string());
            let Some(parameter) =
                self.expect_object(parameter, &parameter_path, "#/definitions/Parameter")
            else {
                continue;
            };
            if let Some(name) =
                self.require(parameter, "name", &parameter_path, "#/definitions/Parameter")
            {
                self.expect_string(
                    name,
                    &pointer::join(&parameter_path, "name"),
                    "#/definitions/Parameter/properties/name",
                );
            }
            let location = self
                .require(parameter, "in", &parameter_path, "#/definitions/Parameter")
                .and_then(|value| {
                    self.expect_string(
                        value,
                        &pointer::join(&parameter_path, "in"),
                        "#/definitions/Parameter/properties/in",
                    )
                });
            match location {
                Some(location) if !PARAMETER_LOCATIONS.contains(&location) => self.push(
                    "must be equal to one of the allowed values",
                    pointer::join(&parameter_path, "in"),
                    "#/definitions/Parameter/properties/in/enum",
                    json!({ "allowedValues": PARAMETER_LOCATIONS }),
                ),
                Some("path") if parameter.get("required") != Some(&Value::Bool(true)) => self.push(
                    "path parameters must set \"required\": true",
                    pointer::join(&parameter_path, "required"),
                    "#/definitions/PathParameter/properties/required/enum",
                    json!({ "allowedValues": [true] }),
                ),
                _ => {}
            }
        }
    }

    fn check_request_body(&mut self, value: &Value, path: &str) {
        if is_reference(value) {
            return;
        }
        let Some(body) = self.expect_object(value, path, "#/definitions/RequestBody") else {
            return;
        };
        if let Some(content) = self.require(body, "content", path, "#/definitions/RequestBody") {
            self.expect_object(
                content,
                &pointer::join(path, "content"),
                "#/definitions/RequestBody/properties/content",
            );
        }
    }

    /// Deserialise into the typed model to catch everything the shape checks
    /// do not cover, such as malformed schema objects.
    fn check_typed(&mut self, document: &Value) {
        let mut candidate = document.clone();
        if let Value::Object(map) = &mut candidate {
            map.entry("paths").or_insert_with(|| json!({}));
        }
        if let Err(error) = serde_json::from_value::<openapiv3::OpenAPI>(candidate) {
            self.push(
                format!("document does not conform to OpenAPI 3.0: {error}"),
                "",
                "#",
                json!({}),
            );
        }
    }

    fn check_references(&mut self, root: &Value, node: &Value, path: &str) {
        match node {
            Value::Object(map) => {
                for (key, child) in map {
                    let child_path = pointer::join(path, key);
                    match (key.as_str(), child) {
                        ("$ref", Value::String(reference)) => {
                            self.check_reference(root, reference, child_path);
                        }
                        _ => self.check_references(root, child, &child_path),
                    }
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.check_references(root, child, &pointer::join(path, &index.to_string()));
                }
            }
            _ => {}
        }
    }

    fn check_reference(&mut self, root: &Value, reference: &str, path: String) {
        let (document, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        if document.is_empty() {
            if pointer::resolve(root, fragment).is_none() {
                self.push(
                    format!("can't resolve reference {reference}"),
                    path,
                    "#/definitions/Reference/properties/$ref",
                    json!({ "ref": reference }),
                );
            }
        } else if !fragment.is_empty() && !fragment.starts_with('/') {
            self.push(
                format!("reference {reference} has an invalid JSON pointer fragment"),
                path,
                "#/definitions/Reference/properties/$ref/format",
                json!({ "ref": reference }),
            );
        }
    }
}

fn is_reference(value: &Value) -> bool {
    value.get("$ref").is_some_and(Value::is_string)
}

fn is_openapi_30(version: &str) -> bool {
    let Some(rest) = version.strip_prefix("3.0.") else {
        return false;
    };
    let (patch, suffix) = match rest.split_once('-') {
        Some((patch, suffix)) => (patch, Some(suffix)),
        None => (rest, None),
    };
    !patch.is_empty()
        && patch.bytes().all(|b| b.is_ascii_digit())
        && suffix.is_none_or(|s| !s.is_empty())
}

fn is_status_code(code: &str) -> bool {
    if code == "default" {
        return true;
    }
    let Some((class, tail)) = code.split_at_checked(1) else {
        return false;
    };
    code.len() == 3
        && matches!(class, "1" | "2" | "3" | "4" | "5")
        && (tail == "XX" || tail.bytes().all(|b| b.is_ascii_digit()))
}
