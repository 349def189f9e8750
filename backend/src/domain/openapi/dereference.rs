//! Reference resolution for OpenAPI documents.
//!
//! Dereferencing runs in two phases. The async phase walks the document and
//! every external document it reaches, loading each one once through a
//! [`ReferenceSource`]. The sync phase then rebuilds the tree with every
//! `$ref` node replaced by its target. A reference object's sibling keys are
//! discarded, matching OpenAPI 3.0 semantics.
//!
//! Cycles are detected with the set of references currently being expanded,
//! keyed by absolute identity (document URL plus fragment), so a schema that
//! eventually contains itself fails instead of recursing forever.
//!
//! Acyclic documents are bounded too. The sync phase tracks how deep the
//! rebuilt tree has grown, counting each nested container and each followed
//! reference, and how many nodes it has emitted. The async phase caps how many
//! distinct external documents one call may load.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use super::pointer;
use crate::domain::ports::{ReferenceSource, ReferenceSourceError};

/// Default bound on how many references may be expanded inside one another.
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 64;

/// Default bound on the nesting of the resolved tree.
pub const DEFAULT_MAX_NESTING: usize = 256;

/// Default bound on the number of nodes in the resolved tree.
pub const DEFAULT_MAX_EXPANDED_NODES: usize = 1_000_000;

/// Default bound on distinct external documents loaded per call.
pub const DEFAULT_MAX_EXTERNAL_DOCUMENTS: usize = 32;

/// Reasons dereferencing can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DereferenceError {
    /// The reference points at a location that does not exist.
    #[error("can't resolve reference {reference}")]
    Missing { reference: String },
    /// Expanding the reference would require expanding itself.
    #[error("reference {reference} is circular")]
    Cycle { reference: String },
    /// Too many references are nested inside one another, or the resolved
    /// tree nests deeper than allowed.
    #[error("reference nesting exceeds the maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },
    /// The resolved tree would hold more nodes than allowed.
    #[error("resolved document exceeds {max_nodes} nodes")]
    TooLarge { max_nodes: usize },
    /// The document reaches more external documents than allowed.
    #[error("references reach more than {max_documents} external documents")]
    TooManyDocuments { max_documents: usize },
    /// The reference is not a usable URI.
    #[error("reference {reference} is invalid: {message}")]
    InvalidReference { reference: String, message: String },
    /// An external document could not be loaded.
    #[error("failed to load {url}: {message}")]
    Fetch { url: String, message: String },
    /// The caller cancelled resolution.
    #[error("reference resolution was cancelled")]
    Cancelled,
}

/// Resolves every `$ref` in a document.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use schemaforge::domain::openapi::Dereferencer;
/// use schemaforge::domain::ports::FixtureReferenceSource;
/// use serde_json::json;
/// use tokio_util::sync::CancellationToken;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let dereferencer = Dereferencer::new(Arc::new(FixtureReferenceSource));
/// let document = json!({
///     "a": {"$ref": "#/b"},
///     "b": {"type": "string"}
/// });
/// let resolved = dereferencer
///     .dereference(document, &CancellationToken::new())
///     .await
///     .expect("local references resolve");
/// assert_eq!(resolved["a"], json!({"type": "string"}));
/// # });
/// ```
#[derive(Clone)]
pub struct Dereferencer {
    source: Arc<dyn ReferenceSource>,
    max_depth: usize,
    max_nesting: usize,
    max_nodes: usize,
    max_documents: usize,
}

impl Dereferencer {
    /// Create a dereferencer loading external documents through `source`.
    pub fn new(source: Arc<dyn ReferenceSource>) -> Self {
        Self {
            source,
            max_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            max_nesting: DEFAULT_MAX_NESTING,
            max_nodes: DEFAULT_MAX_EXPANDED_NODES,
            max_documents: DEFAULT_MAX_EXTERNAL_DOCUMENTS,
        }
    }

    /// Override the nesting bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Override the nesting bound of the resolved tree.
    #[must_use]
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Override the node budget of the resolved tree.
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Override the external document cap.
    #[must_use]
    pub fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.max_documents = max_documents;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    pub fn max_documents(&self) -> usize {
        self.max_documents
    }

    /// Return `document` with every reference replaced by its target.
    ///
    /// Documents without references are returned unchanged. On error no
    /// partially resolved tree is returned.
    pub async fn dereference(
        &self,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<Value, DereferenceError> {
        if cancel.is_cancelled() {
            return Err(DereferenceError::Cancelled);
        }
        let mut references = Vec::new();
        collect_references(&document, &mut references);
        if references.is_empty() {
            return Ok(document);
        }

        let documents = self.load_external(&document, cancel).await?;
        let mut resolver = Resolver {
            root: &document,
            documents: &documents,
            in_progress: HashSet::new(),
            max_depth: self.max_depth,
            max_nesting: self.max_nesting,
            max_nodes: self.max_nodes,
            expanded: 0,
        };
        resolver.resolve(&document, None, 0)
    }

    async fn load_external(
        &self,
        root: &Value,
        cancel: &CancellationToken,
    ) -> Result<HashMap<Url, Value>, DereferenceError> {
        let mut documents = HashMap::new();
        let mut pending: VecDeque<Url> = external_documents(root, None)?.into();

        while let Some(url) = pending.pop_front() {
            if documents.contains_key(&url) {
                continue;
            }
            if documents.len() >= self.max_documents {
                return Err(DereferenceError::TooManyDocuments {
                    max_documents: self.max_documents,
                });
            }
            if cancel.is_cancelled() {
                return Err(DereferenceError::Cancelled);
            }
            debug!(url = %url, "loading external reference target");
            let fetched = self
                .source
                .fetch(&url, cancel)
                .await
                .map_err(|err| match err {
                    ReferenceSourceError::Cancelled => DereferenceError::Cancelled,
                    other => DereferenceError::Fetch {
                        url: url.to_string(),
                        message: other.to_string(),
                    },
                })?;
            pending.extend(external_documents(&fetched, Some(&url))?);
            documents.insert(url, fetched);
        }
        Ok(documents)
    }
}

/// Absolute identity of a reference target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Target {
    /// `None` addresses the document being dereferenced.
    document: Option<Url>,
    fragment: String,
}

impl Target {
    fn locate(reference: &str, base: Option<&Url>) -> Result<Self, DereferenceError> {
        let (location, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        let document = if location.is_empty() {
            base.cloned()
        } else {
            let parsed = match base {
                Some(base) => base.join(location),
                None => Url::parse(location),
            };
            let mut url = parsed.map_err(|err| DereferenceError::InvalidReference {
                reference: reference.to_owned(),
                message: err.to_string(),
            })?;
            url.set_fragment(None);
            Some(url)
        };
        Ok(Self {
            document,
            fragment: fragment.to_owned(),
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(url) => write!(f, "{url}#{}", self.fragment),
            None => write!(f, "#{}", self.fragment),
        }
    }
}

fn collect_references<'v>(node: &'v Value, out: &mut Vec<&'v str>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                out.push(reference);
                return;
            }
            for child in map.values() {
                collect_references(child, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_references(child, out);
            }
        }
        _ => {}
    }
}

/// External documents referenced from `node`, which lives at `base`.
fn external_documents(node: &Value, base: Option<&Url>) -> Result<Vec<Url>, DereferenceError> {
    let mut references = Vec::new();
    collect_references(node, &mut references);
    let mut urls = Vec::new();
    for reference in references {
        if let Some(url) = Target::locate(reference, base)?.document {
            if Some(&url) != base && !urls.contains(&url) {
                urls.push(url);
            }
        }
    }
    Ok(urls)
}

struct Resolver<'a> {
    root: &'a Value,
    documents: &'a HashMap<Url, Value>,
    in_progress: HashSet<Target>,
    max_depth: usize,
    max_nesting: usize,
    max_nodes: usize,
    expanded: usize,
}

impl<'a> Resolver<'a> {
    /// Rebuild `node`, which sits `depth` levels below the root of the output.
    fn resolve(
        &mut self,
        node: &'a Value,
        base: Option<&Url>,
        depth: usize,
    ) -> Result<Value, DereferenceError> {
        if depth > self.max_nesting {
            return Err(DereferenceError::DepthExceeded {
                max_depth: self.max_nesting,
            });
        }
        match node {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    return self.follow(reference, base, depth);
                }
                self.count_node()?;
                let mut resolved = Map::with_capacity(map.len());
                for (key, child) in map {
                    resolved.insert(key.clone(), self.resolve(child, base, depth + 1)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => {
                self.count_node()?;
                items
                    .iter()
                    .map(|child| self.resolve(child, base, depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            other => {
                self.count_node()?;
                Ok(other.clone())
            }
        }
    }

    fn count_node(&mut self) -> Result<(), DereferenceError> {
        self.expanded += 1;
        if self.expanded > self.max_nodes {
            return Err(DereferenceError::TooLarge {
                max_nodes: self.max_nodes,
            });
        }
        Ok(())
    }

    fn follow(
        &mut self,
        reference: &str,
        base: Option<&Url>,
        depth: usize,
    ) -> Result<Value, DereferenceError> {
        let target = Target::locate(reference, base)?;
        if self.in_progress.contains(&target) {
            return Err(DereferenceError::Cycle {
                reference: target.to_string(),
            });
        }
        if self.in_progress.len() >= self.max_depth {
            return Err(DereferenceError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }

        let root: &'a Value = self.root;
        let documents: &'a HashMap<Url, Value> = self.documents;
        let document = match &target.document {
            None => Some(root),
            Some(url) => documents.get(url),
        };
        let value = document
            .and_then(|document| pointer::resolve(document, &target.fragment))
            .ok_or_else(|| DereferenceError::Missing {
                reference: target.to_string(),
            })?;

        self.in_progress.insert(target.clone());
        let resolved = self.resolve(value, target.document.as_ref(), depth + 1);
        self.in_progress.remove(&target);
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FixtureReferenceSource, MockReferenceSource};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn local_only() -> Dereferencer {
        Dereferencer::new(Arc::new(FixtureReferenceSource))
    }

    fn contains_reference(node: &Value) -> bool {
        let mut references = Vec::new();
        collect_references(node, &mut references);
        !references.is_empty()
    }

    #[rstest]
    fn builders_override_the_default_bounds(local_only: Dereferencer) {
        assert_eq!(local_only.max_depth(), DEFAULT_MAX_REFERENCE_DEPTH);
        assert_eq!(local_only.max_nodes(), DEFAULT_MAX_EXPANDED_NODES);
        assert_eq!(local_only.max_documents(), DEFAULT_MAX_EXTERNAL_DOCUMENTS);

        let tuned = local_only
            .with_max_depth(4)
            .with_max_nodes(100)
            .with_max_documents(2);
        assert_eq!(
            (tuned.max_depth(), tuned.max_nodes(), tuned.max_documents()),
            (4, 100, 2)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn documents_without_references_are_unchanged(local_only: Dereferencer) {
        let document = json!({
            "openapi": "3.0.0",
            "paths": {"/a": {"get": {"responses": {"200": {"description": "ok"}}}}}
        });
        let resolved = local_only
            .dereference(document.clone(), &CancellationToken::new())
            .await
            .expect("nothing to resolve");
        assert_eq!(resolved, document);
    }

    #[rstest]
    #[tokio::test]
    async fn replaces_nested_local_references(local_only: Dereferencer) {
        let document = json!({
            "paths": {"/pets": {"get": {"responses": {
                "200": {"$ref": "#/components/responses/Pets"}
            }}}},
            "components": {
                "responses": {"Pets": {
                    "description": "pets",
                    "content": {"application/json": {
                        "schema": {"$ref": "#/components/schemas/Pet"}
                    }}
                }},
                "schemas": {"Pet": {"type": "object"}}
            }
        });
        let resolved = local_only
            .dereference(document, &CancellationToken::new())
            .await
            .expect("resolves");
        assert!(!contains_reference(&resolved));
        assert_eq!(
            resolved["paths"]["/pets"]["get"]["responses"]["200"]["content"]["application/json"]
                ["schema"],
            json!({"type": "object"})
        );
    }

    #[rstest]
    #[tokio::test]
    async fn sibling_keys_of_references_are_dropped(local_only: Dereferencer) {
        let document = json!({
            "a": {"$ref": "#/b", "description": "ignored"},
            "b": {"type": "integer"}
        });
        let resolved = local_only
            .dereference(document, &CancellationToken::new())
            .await
            .expect("resolves");
        assert_eq!(resolved["a"], json!({"type": "integer"}));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_targets_fail(local_only: Dereferencer) {
        let document = json!({"a": {"$ref": "#/components/schemas/Gone"}});
        let err = local_only
            .dereference(document, &CancellationToken::new())
            .await
            .expect_err("missing target");
        assert_eq!(
            err,
            DereferenceError::Missing {
                reference: "#/components/schemas/Gone".to_owned()
            }
        );
    }

    #[rstest]
    #[case(json!({"Node": {"properties": {"next": {"$ref": "#/Node"}}},
                  "root": {"$ref": "#/Node"}}))]
    #[case(json!({"a": {"$ref": "#"}}))]
    #[case(json!({"a": {"$ref": "#/b"}, "b": {"$ref": "#/a"}}))]
    #[tokio::test]
    async fn cycles_fail(local_only: Dereferencer, #[case] document: Value) {
        let err = local_only
            .dereference(document, &CancellationToken::new())
            .await
            .expect_err("cyclic");
        assert!(matches!(err, DereferenceError::Cycle { .. }), "got {err:?}");
    }

    #[rstest]
    #[tokio::test]
    async fn long_reference_chains_hit_the_depth_cap(local_only: Dereferencer) {
        let document = json!({
            "start": {"$ref": "#/a"},
            "a": {"$ref": "#/b"},
            "b": {"$ref": "#/c"},
            "c": {"type": "string"}
        });
        let err = local_only
            .with_max_depth(2)
            .dereference(document, &CancellationToken::new())
            .await
            .expect_err("too deep");
        assert_eq!(err, DereferenceError::DepthExceeded { max_depth: 2 });
    }

    fn nested(levels: usize, leaf: Value) -> Value {
        (0..levels).fold(leaf, |inner, _| json!({"child": inner}))
    }

    fn deep_reference_chain(links: usize, levels: usize) -> Value {
        let mut defs = Map::new();
        for index in 0..links {
            let leaf = if index + 1 == links {
                json!({"type": "string"})
            } else {
                json!({"$ref": format!("#/x-defs/d{}", index + 1)})
            };
            defs.insert(format!("d{index}"), nested(levels, leaf));
        }
        json!({
            "openapi": "3.0.0",
            "info": {"title": "deep", "version": "1"},
            "paths": {},
            "x-defs": defs,
            "root": {"$ref": "#/x-defs/d0"}
        })
    }

    #[rstest]
    fn deeply_nested_reference_targets_fail_without_exhausting_the_stack() {
        let document = deep_reference_chain(60, 120);
        let outcome = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .expect("runtime");
                runtime.block_on(
                    Dereferencer::new(Arc::new(FixtureReferenceSource))
                        .dereference(document, &CancellationToken::new()),
                )
            })
            .expect("spawn")
            .join()
            .expect("resolver thread completes");
        assert_eq!(
            outcome,
            Err(DereferenceError::DepthExceeded {
                max_depth: DEFAULT_MAX_NESTING
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn nesting_counts_containers_and_followed_references(local_only: Dereferencer) {
        let document = json!({"a": {"$ref": "#/b"}, "b": {"c": {"d": 1}}});
        let resolved = local_only
            .clone()
            .with_max_nesting(4)
            .dereference(document.clone(), &CancellationToken::new())
            .await
            .expect("fits");
        assert_eq!(resolved["a"], json!({"c": {"d": 1}}));

        let err = local_only
            .with_max_nesting(3)
            .dereference(document, &CancellationToken::new())
            .await
            .expect_err("too deep");
        assert_eq!(err, DereferenceError::DepthExceeded { max_depth: 3 });
    }

    fn doubling_schemas(levels: usize) -> Value {
        let mut schemas = Map::new();
        schemas.insert("S0".to_owned(), json!({"type": "string"}));
        for level in 1..=levels {
            let below = format!("#/components/schemas/S{}", level - 1);
            schemas.insert(
                format!("S{level}"),
                json!({"type": "object", "properties": {
                    "a": {"$ref": below},
                    "b": {"$ref": below}
                }}),
            );
        }
        json!({
            "openapi": "3.0.0",
            "info": {"title": "dag", "version": "1"},
            "paths": {},
            "components": {"schemas": schemas}
        })
    }

    #[rstest]
    #[tokio::test]
    async fn shared_targets_that_double_per_level_exhaust_the_node_budget(
        local_only: Dereferencer,
    ) {
        let err = local_only
            .dereference(doubling_schemas(24), &CancellationToken::new())
            .await
            .expect_err("exponential expansion");
        assert_eq!(
            err,
            DereferenceError::TooLarge {
                max_nodes: DEFAULT_MAX_EXPANDED_NODES
            }
        );
    }

    #[rstest]
    #[case(4, false)]
    #[case(5, true)]
    #[tokio::test]
    async fn the_node_budget_counts_every_emitted_node(
        local_only: Dereferencer,
        #[case] max_nodes: usize,
        #[case] accepted: bool,
    ) {
        let document = json!({"a": {"$ref": "#/b"}, "b": {"type": "string"}});
        let result = local_only
            .with_max_nodes(max_nodes)
            .dereference(document, &CancellationToken::new())
            .await;
        if accepted {
            assert!(result.is_ok(), "got {result:?}");
        } else {
            assert_eq!(result, Err(DereferenceError::TooLarge { max_nodes }));
        }
    }

    #[rstest]
    #[tokio::test]
    async fn relative_references_need_a_base(local_only: Dereferencer) {
        let document = json!({"a": {"$ref": "pet.json#/Pet"}});
        let err = local_only
            .dereference(document, &CancellationToken::new())
            .await
            .expect_err("no base");
        assert!(matches!(err, DereferenceError::InvalidReference { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn refused_external_documents_fail_to_load(local_only: Dereferencer) {
        let document = json!({"a": {"$ref": "https://schemas.example.test/pet.json#/Pet"}});
        let err = local_only
            .dereference(document, &CancellationToken::new())
            .await
            .expect_err("fixture refuses");
        assert!(matches!(err, DereferenceError::Fetch { .. }));
    }

    #[tokio::test]
    async fn loads_each_external_document_once() {
        let mut source = MockReferenceSource::new();
        source
            .expect_fetch()
            .withf(|url, _| url.as_str() == "https://schemas.example.test/pet.json")
            .times(1)
            .returning(|_, _| {
                Ok(json!({
                    "Pet": {"type": "object", "properties": {
                        "id": {"$ref": "common.json#/Id"},
                        "tag": {"$ref": "#/Tag"}
                    }},
                    "Tag": {"type": "string"}
                }))
            });
        source
            .expect_fetch()
            .withf(|url, _| url.as_str() == "https://schemas.example.test/common.json")
            .times(1)
            .returning(|_, _| Ok(json!({"Id": {"type": "integer"}})));

        let document = json!({
            "a": {"$ref": "https://schemas.example.test/pet.json#/Pet"},
            "b": {"$ref": "https://schemas.example.test/pet.json#/Tag"}
        });
        let resolved = Dereferencer::new(Arc::new(source))
            .dereference(document, &CancellationToken::new())
            .await
            .expect("resolves");
        assert_eq!(
            resolved,
            json!({
                "a": {"type": "object", "properties": {
                    "id": {"type": "integer"},
                    "tag": {"type": "string"}
                }},
                "b": {"type": "string"}
            })
        );
    }

    #[tokio::test]
    async fn external_documents_beyond_the_cap_are_not_fetched() {
        let mut source = MockReferenceSource::new();
        source.expect_fetch().times(3).returning(|url, _| {
            let index: usize = url
                .path()
                .trim_start_matches("/doc")
                .trim_end_matches(".json")
                .parse()
                .unwrap_or_default();
            Ok(json!({"next": {"$ref": format!("doc{}.json#/next", index + 1)}}))
        });

        let document = json!({"a": {"$ref": "https://schemas.example.test/doc0.json#/next"}});
        let err = Dereferencer::new(Arc::new(source))
            .with_max_documents(3)
            .dereference(document, &CancellationToken::new())
            .await
            .expect_err("too many documents");
        assert_eq!(err, DereferenceError::TooManyDocuments { max_documents: 3 });
    }

    #[tokio::test]
    async fn cancellation_stops_before_fetching() {
        let mut source = MockReferenceSource::new();
        source.expect_fetch().never();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let document = json!({"a": {"$ref": "https://schemas.example.test/pet.json"}});
        let err = Dereferencer::new(Arc::new(source))
            .dereference(document, &cancel)
            .await
            .expect_err("cancelled");
        assert_eq!(err, DereferenceError::Cancelled);
    }

    #[tokio::test]
    async fn source_cancellation_is_reported_as_cancellation() {
        let mut source = MockReferenceSource::new();
        source
            .expect_fetch()
            .returning(|_, _| Err(ReferenceSourceError::cancelled()));

        let document = json!({"a": {"$ref": "https://schemas.example.test/pet.json"}});
        let err = Dereferencer::new(Arc::new(source))
            .dereference(document, &CancellationToken::new())
            .await
            .expect_err("cancelled");
        assert_eq!(err, DereferenceError::Cancelled);
    }
}
