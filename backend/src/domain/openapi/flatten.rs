//! Reshape extracted operations into a path → METHOD lookup table.

use indexmap::IndexMap;

use super::{ExtractedPath, OperationSummary};

/// Path template → uppercase method → summary, in document order.
pub type FlattenedApi = IndexMap<String, IndexMap<String, OperationSummary>>;

/// The extraction result handed to [`flatten`] was not produced by a single
/// [`extract`](super::extract) call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlattenError {
    #[error("path {path} appears more than once in the extraction result")]
    DuplicatePath { path: String },
    #[error("operation {method} {path} appears more than once in the extraction result")]
    DuplicateOperation { path: String, method: String },
}

/// Index extracted operations by path and uppercase method.
///
/// Summaries are moved across untouched.
///
/// # Examples
/// ```
/// use schemaforge::domain::openapi::{extract, flatten};
/// use serde_json::json;
///
/// let document = json!({"paths": {"/widgets": {"get": {"responses": {}}}}});
/// let flattened = flatten(extract(&document).expect("extracts")).expect("flattens");
/// assert!(flattened["/widgets"].contains_key("GET"));
/// ```
pub fn flatten(extracted: Vec<ExtractedPath>) -> Result<FlattenedApi, FlattenError> {
    let mut flattened = FlattenedApi::with_capacity(extracted.len());
    for ExtractedPath { path, operations } in extracted {
        if flattened.contains_key(&path) {
            return Err(FlattenError::DuplicatePath { path });
        }
        let mut methods = IndexMap::with_capacity(operations.len());
        for operation in operations {
            let method = operation.method.to_ascii_uppercase();
            if methods.contains_key(&method) {
                return Err(FlattenError::DuplicateOperation { path, method });
            }
            methods.insert(method, operation.summary);
        }
        flattened.insert(path, methods);
    }
    Ok(flattened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::openapi::{ExtractedOperation, ResponseDescriptor, extract};
    use rstest::rstest;
    use serde_json::json;

    fn operation(method: &str) -> ExtractedOperation {
        ExtractedOperation {
            method: method.to_owned(),
            summary: OperationSummary {
                input: json!({}),
                ..OperationSummary::default()
            },
        }
    }

    #[rstest]
    fn widgets_document_flattens_to_the_expected_shape() {
        let document = json!({
            "openapi": "3.0.0",
            "paths": {"/widgets": {"get": {"responses": {
                "200": {"description": "ok", "content": {}},
                "404": {"description": "missing", "content": {}}
            }}}}
        });
        let flattened = flatten(extract(&document).expect("extracts")).expect("flattens");

        let get = &flattened["/widgets"]["GET"];
        assert_eq!(
            get.output,
            vec![ResponseDescriptor {
                code: "200".to_owned(),
                content: json!({}),
                description: "ok".to_owned(),
            }]
        );
        assert_eq!(
            serde_json::to_value(&flattened).expect("serialises"),
            json!({"/widgets": {"GET": {
                "output": [{"code": "200", "content": {}, "description": "ok"}],
                "input": {},
                "parameters": [],
                "errorResponses": [{"code": "404", "content": {}, "description": "missing"}]
            }}})
        );
    }

    #[rstest]
    fn one_entry_per_path_and_method() {
        let document = json!({"paths": {
            "/a": {"get": {"responses": {}}, "post": {"responses": {}}},
            "/b": {"delete": {"responses": {}}}
        }});
        let flattened = flatten(extract(&document).expect("extracts")).expect("flattens");

        let pairs: Vec<(String, String)> = flattened
            .iter()
            .flat_map(|(path, methods)| {
                methods
                    .keys()
                    .map(move |method| (path.clone(), method.clone()))
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("/a".to_owned(), "GET".to_owned()),
                ("/a".to_owned(), "POST".to_owned()),
                ("/b".to_owned(), "DELETE".to_owned()),
            ]
        );
    }

    #[rstest]
    fn duplicate_paths_are_misuse() {
        let extracted = vec![
            ExtractedPath {
                path: "/a".to_owned(),
                operations: vec![operation("get")],
            },
            ExtractedPath {
                path: "/a".to_owned(),
                operations: vec![operation("put")],
            },
        ];
        assert_eq!(
            flatten(extracted),
            Err(FlattenError::DuplicatePath {
                path: "/a".to_owned()
            })
        );
    }

    #[rstest]
    fn duplicate_methods_are_misuse() {
        let extracted = vec![ExtractedPath {
            path: "/a".to_owned(),
            operations: vec![operation("get"), operation("GET")],
        }];
        assert_eq!(
            flatten(extracted),
            Err(FlattenError::DuplicateOperation {
                path: "/a".to_owned(),
                method: "GET".to_owned()
            })
        );
    }

    #[rstest]
    fn paths_without_operations_are_kept() {
        let extracted = vec![ExtractedPath {
            path: "/idle".to_owned(),
            operations: Vec::new(),
        }];
        let flattened = flatten(extracted).expect("flattens");
        assert!(flattened["/idle"].is_empty());
    }
}
