//! JSKOS output.
//!
//! The graph is compacted into JSON-LD node objects with the bundled JSKOS
//! context (`resources/jskos-context.json`): property IRIs become context
//! terms or `prefix:local` names, language-tagged literals are grouped into
//! language maps and RDF collections are folded into arrays. The context
//! itself is then replaced by a reference to the published JSKOS context.
//!
//! JSON objects are written with sorted keys.

use std::collections::HashMap;
use std::io::Write;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{Result, SkosError};
use crate::skos::namespaces::{self, rdf, xsd};
use crate::skos::rdf::{GraphIndex, RdfNode, SkosGraph};

use super::ordered_subjects;

/// URL of the published JSKOS context, written as `@context`.
pub const JSKOS_CONTEXT_URL: &str = "https://gbv.github.io/jskos/context.json";

const BUNDLED_CONTEXT: &str = include_str!("../../resources/jskos-context.json");

/// How a term groups its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    /// One value as a scalar, several as an array
    None,
    /// Always an array
    Set,
    /// Language map with one string per language
    Language,
    /// Language map with an array per language
    LanguageSet,
    /// RDF collection as an array
    List,
}

/// A context term bound to a property IRI.
#[derive(Debug, Clone)]
struct TermDefinition {
    term: String,
    /// `@id` or an expanded datatype IRI
    coerce: Option<String>,
    container: Container,
}

/// A parsed JSON-LD context, reduced to what compaction needs.
#[derive(Debug, Clone)]
pub struct JskosContext {
    /// Namespace IRI and prefix, longest IRI first
    prefixes: Vec<(String, String)>,
    /// Property IRI to term
    terms: HashMap<String, TermDefinition>,
    id_key: String,
    type_key: String,
    type_container: Container,
}

fn context_error(message: impl Into<String>) -> SkosError {
    SkosError::Context(message.into())
}

fn parse_container(value: Option<&Value>) -> Result<Container> {
    let keywords: Vec<&str> = match value {
        None => return Ok(Container::None),
        Some(Value::String(keyword)) => vec![keyword.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(other) => return Err(context_error(format!("invalid @container: {other}"))),
    };
    let has = |keyword: &str| keywords.contains(&keyword);
    Ok(if has("@list") {
        Container::List
    } else if has("@language") && has("@set") {
        Container::LanguageSet
    } else if has("@language") {
        Container::Language
    } else if has("@set") {
        Container::Set
    } else {
        Container::None
    })
}

impl JskosContext {
    /// The context shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`SkosError::Context`] if the bundled file is not a valid
    /// context.
    pub fn bundled() -> Result<Self> {
        let document: Value =
            serde_json::from_str(BUNDLED_CONTEXT).map_err(|e| context_error(e.to_string()))?;
        Self::from_document(&document)
    }

    /// Parse a context document (`{"@context": {...}}`).
    ///
    /// Only what is needed for compaction is read: prefixes, keyword
    /// aliases for `@id` and `@type`, and term definitions with `@id`,
    /// `@type` and `@container`.
    ///
    /// # Errors
    ///
    /// Returns [`SkosError::Context`] if the document has no `@context`
    /// object or a term definition is malformed.
    pub fn from_document(document: &Value) -> Result<Self> {
        let entries = document
            .get("@context")
            .and_then(Value::as_object)
            .ok_or_else(|| context_error("missing @context object"))?;

        let mut prefixes: Vec<(String, String)> = entries
            .iter()
            .filter_map(|(key, value)| {
                let iri = value.as_str()?;
                (iri.ends_with('/') || iri.ends_with('#')).then(|| (iri.to_string(), key.clone()))
            })
            .collect();
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.1.cmp(&b.1)));

        let mut context = Self {
            prefixes,
            terms: HashMap::new(),
            id_key: "@id".to_string(),
            type_key: "@type".to_string(),
            type_container: Container::None,
        };

        for (key, value) in entries {
            match value {
                Value::String(target) if target == "@id" => context.id_key = key.clone(),
                Value::String(target) if target == "@type" => context.type_key = key.clone(),
                Value::String(target) if target.ends_with('/') || target.ends_with('#') => {},
                Value::String(target) => {
                    let iri = context.expand(target);
                    context.terms.insert(
                        iri,
                        TermDefinition {
                            term: key.clone(),
                            coerce: None,
                            container: Container::None,
                        },
                    );
                },
                Value::Object(definition) => {
                    let id = definition
                        .get("@id")
                        .and_then(Value::as_str)
                        .ok_or_else(|| context_error(format!("term {key} has no @id")))?;
                    let container = parse_container(definition.get("@container"))?;
                    if id == "@type" {
                        context.type_key = key.clone();
                        context.type_container = container;
                        continue;
                    }
                    let coerce = definition
                        .get("@type")
                        .and_then(Value::as_str)
                        .map(|t| if t == "@id" { t.to_string() } else { context.expand(t) });
                    context.terms.insert(
                        context.expand(id),
                        TermDefinition {
                            term: key.clone(),
                            coerce,
                            container,
                        },
                    );
                },
                other => return Err(context_error(format!("invalid definition for {key}: {other}"))),
            }
        }
        Ok(context)
    }

    /// Expand a `prefix:local` name.
    fn expand(&self, value: &str) -> String {
        if let Some((prefix, local)) = value.split_once(':') {
            if let Some((iri, _)) = self.prefixes.iter().find(|(_, name)| name == prefix) {
                return format!("{iri}{local}");
            }
        }
        value.to_string()
    }

    /// Compact an IRI: a context term if one is bound to it, else
    /// `prefix:local` with the longest matching namespace, else the IRI.
    #[must_use]
    pub fn compact_iri(&self, iri: &str) -> String {
        if let Some(definition) = self.terms.get(iri) {
            return definition.term.clone();
        }
        for (namespace, prefix) in &self.prefixes {
            if let Some(local) = iri.strip_prefix(namespace.as_str()) {
                return format!("{prefix}:{local}");
            }
        }
        iri.to_string()
    }
}

/// Compacts the nodes of one graph.
struct Compactor<'a> {
    index: GraphIndex<'a>,
    context: &'a JskosContext,
    rdf_type: String,
}

fn collapse(mut values: Vec<Value>, always_array: bool) -> Value {
    if values.len() == 1 && !always_array {
        values.remove(0)
    } else {
        Value::Array(values)
    }
}

impl<'a> Compactor<'a> {
    fn new(graph: &'a SkosGraph, context: &'a JskosContext) -> Self {
        Self {
            index: graph.index(),
            context,
            rdf_type: namespaces::iri(namespaces::RDF, rdf::TYPE),
        }
    }

    fn node_object(&self, subject: &RdfNode, depth: usize) -> Value {
        let mut object = Map::new();
        if let RdfNode::Uri(iri) = subject {
            object.insert(self.context.id_key.clone(), Value::String(iri.clone()));
        }

        let mut grouped: IndexMap<&str, Vec<&RdfNode>> = IndexMap::new();
        for triple in self.index.triples_for(subject) {
            grouped
                .entry(triple.predicate.as_str())
                .or_default()
                .push(&triple.object);
        }

        for (predicate, objects) in grouped {
            if predicate == self.rdf_type {
                let types = objects
                    .iter()
                    .map(|node| match node {
                        RdfNode::Uri(iri) => Value::String(self.context.compact_iri(iri)),
                        other => self.value(other, None, depth),
                    })
                    .collect();
                object.insert(
                    self.context.type_key.clone(),
                    collapse(types, self.context.type_container == Container::Set),
                );
                continue;
            }

            let (key, value) = match self.context.terms.get(predicate) {
                Some(definition) => (definition.term.clone(), self.term_value(definition, &objects, depth)),
                None => {
                    let values = objects.iter().map(|node| self.value(node, None, depth)).collect();
                    (self.context.compact_iri(predicate), collapse(values, false))
                },
            };
            object.insert(key, value);
        }
        Value::Object(object)
    }

    fn term_value(&self, definition: &TermDefinition, objects: &[&RdfNode], depth: usize) -> Value {
        let coerce = definition.coerce.as_deref();
        match definition.container {
            Container::Language | Container::LanguageSet => {
                let mut by_language: IndexMap<String, Vec<Value>> = IndexMap::new();
                for node in objects {
                    let (language, value) = match node {
                        RdfNode::Literal {
                            value,
                            language: Some(language),
                            ..
                        } => (language.clone(), Value::String(value.clone())),
                        other => ("@none".to_string(), self.value(other, coerce, depth)),
                    };
                    by_language.entry(language).or_default().push(value);
                }
                let always_array = definition.container == Container::LanguageSet;
                Value::Object(
                    by_language
                        .into_iter()
                        .map(|(language, values)| (language, collapse(values, always_array)))
                        .collect(),
                )
            },
            Container::List => {
                let lists: Vec<Value> = objects
                    .iter()
                    .map(|node| match self.index.list_items(node) {
                        Some(items) => Value::Array(
                            items
                                .into_iter()
                                .map(|item| self.value(item, coerce, depth))
                                .collect(),
                        ),
                        None => self.value(node, coerce, depth),
                    })
                    .collect();
                collapse(lists, false)
            },
            Container::Set | Container::None => {
                let values = objects
                    .iter()
                    .map(|node| self.value(node, coerce, depth))
                    .collect();
                collapse(values, definition.container == Container::Set)
            },
        }
    }

    /// A single object value.
    fn value(&self, node: &RdfNode, coerce: Option<&str>, depth: usize) -> Value {
        match node {
            RdfNode::Uri(iri) if coerce == Some("@id") => Value::String(iri.clone()),
            RdfNode::Uri(iri) => {
                let mut reference = Map::new();
                reference.insert(self.context.id_key.clone(), Value::String(iri.clone()));
                Value::Object(reference)
            },
            RdfNode::BlankNode(_) => {
                if let Some(items) = self.index.list_items(node) {
                    let items = items
                        .into_iter()
                        .map(|item| self.value(item, coerce, depth))
                        .collect();
                    let mut list = Map::new();
                    list.insert("@list".to_string(), Value::Array(items));
                    Value::Object(list)
                } else if depth < MAX_EMBED_DEPTH {
                    self.node_object(node, depth + 1)
                } else {
                    Value::Object(Map::new())
                }
            },
            RdfNode::Literal {
                value,
                language,
                datatype,
            } => match (language, datatype) {
                (None, None) => Value::String(value.clone()),
                (None, Some(datatype)) if coerce == Some(datatype.as_str()) => {
                    native_value(value, datatype)
                },
                (Some(language), _) => {
                    let mut literal = Map::new();
                    literal.insert("@value".to_string(), Value::String(value.clone()));
                    literal.insert("@language".to_string(), Value::String(language.clone()));
                    Value::Object(literal)
                },
                (None, Some(datatype)) => {
                    let mut literal = Map::new();
                    literal.insert("@value".to_string(), Value::String(value.clone()));
                    literal.insert(
                        "@type".to_string(),
                        Value::String(self.context.compact_iri(datatype)),
                    );
                    Value::Object(literal)
                },
            },
        }
    }
}

/// Blank nodes nest this deep at most.
const MAX_EMBED_DEPTH: usize = 16;

/// Plain JSON for a literal whose datatype the context already declares.
fn native_value(value: &str, datatype: &str) -> Value {
    if datatype == namespaces::iri(namespaces::XSD, xsd::BOOLEAN) {
        match value {
            "true" | "1" => return Value::Bool(true),
            "false" | "0" => return Value::Bool(false),
            _ => {},
        }
    }
    Value::String(value.to_string())
}

/// Compact the graph into top-level JSKOS node objects, in collation order.
///
/// Blank nodes are embedded in the node that refers to them. Each node
/// carries `@context` set to [`JSKOS_CONTEXT_URL`].
#[must_use]
pub fn to_jskos_nodes(graph: &SkosGraph, context: &JskosContext) -> Vec<Value> {
    let compactor = Compactor::new(graph, context);
    ordered_subjects(&compactor.index)
        .into_iter()
        .map(|subject| {
            let mut node = compactor.node_object(subject, 0);
            if let Value::Object(map) = &mut node {
                map.insert(
                    "@context".to_string(),
                    Value::String(JSKOS_CONTEXT_URL.to_string()),
                );
            }
            node
        })
        .collect()
}

/// Build the single JSKOS document for a graph.
///
/// One node is returned as-is; several are wrapped in `@graph`.
///
/// # Errors
///
/// Returns [`SkosError::Context`] if the bundled context is invalid.
pub fn to_jskos_document(graph: &SkosGraph) -> Result<Value> {
    let context = JskosContext::bundled()?;
    let mut nodes = to_jskos_nodes(graph, &context);
    if nodes.len() == 1 {
        return Ok(nodes.remove(0));
    }
    for node in &mut nodes {
        if let Value::Object(map) = node {
            map.remove("@context");
        }
    }
    let mut document = Map::new();
    document.insert(
        "@context".to_string(),
        Value::String(JSKOS_CONTEXT_URL.to_string()),
    );
    document.insert("@graph".to_string(), Value::Array(nodes));
    Ok(Value::Object(document))
}

fn json_error(error: &serde_json::Error) -> SkosError {
    SkosError::Serialization(error.to_string())
}

/// Write the graph as one pretty-printed JSKOS document.
///
/// # Errors
///
/// Returns an error if the context is invalid or writing fails.
pub fn write_jskos<W: Write>(graph: &SkosGraph, mut writer: W) -> Result<()> {
    let document = to_jskos_document(graph)?;
    serde_json::to_writer_pretty(&mut writer, &document).map_err(|e| json_error(&e))?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write the graph as line-delimited JSKOS, one concept per line.
///
/// # Errors
///
/// Returns an error if the context is invalid or writing fails.
pub fn write_ndjson<W: Write>(graph: &SkosGraph, mut writer: W) -> Result<()> {
    let context = JskosContext::bundled()?;
    for node in to_jskos_nodes(graph, &context) {
        serde_json::to_writer(&mut writer, &node).map_err(|e| json_error(&e))?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skos::build_list;
    use crate::skos::namespaces::{DCTERMS, MADS, OWL, RDF, SKOS, WD, XSD};
    use serde_json::json;

    fn concept_graph() -> SkosGraph {
        let mut graph = SkosGraph::new();
        let subject = RdfNode::uri("http://dewey.info/class/512/e23/");
        graph.add(subject.clone(), format!("{RDF}type"), RdfNode::uri(format!("{SKOS}Concept")));
        graph.add(
            subject.clone(),
            format!("{SKOS}topConceptOf"),
            RdfNode::uri("http://dewey.info/scheme/edition/e23/"),
        );
        graph.add(
            subject.clone(),
            format!("{DCTERMS}created"),
            RdfNode::typed_literal("2009-12-03", format!("{XSD}date")),
        );
        graph.add(subject.clone(), format!("{SKOS}notation"), RdfNode::literal("512"));
        graph.add(
            subject.clone(),
            format!("{SKOS}prefLabel"),
            RdfNode::literal_with_lang("Algebra", "en"),
        );
        graph.add(
            subject.clone(),
            format!("{SKOS}altLabel"),
            RdfNode::literal_with_lang("Equations", "en"),
        );
        graph.add(
            subject.clone(),
            format!("{OWL}deprecated"),
            RdfNode::typed_literal("true", format!("{XSD}boolean")),
        );
        graph.add(
            subject,
            format!("{WD}including"),
            RdfNode::literal_with_lang("Including cookbooks", "en"),
        );
        graph
    }

    #[test]
    fn test_bundled_context() {
        let context = JskosContext::bundled().unwrap();
        assert_eq!(context.id_key, "uri");
        assert_eq!(context.type_key, "type");
        assert_eq!(context.compact_iri(&format!("{SKOS}prefLabel")), "prefLabel");
        assert_eq!(context.compact_iri(&format!("{WD}including")), "wd:including");
        assert_eq!(
            context.compact_iri("http://example.org/other"),
            "http://example.org/other"
        );
    }

    #[test]
    fn test_context_errors() {
        assert!(matches!(
            JskosContext::from_document(&json!({})),
            Err(SkosError::Context(_))
        ));
        assert!(matches!(
            JskosContext::from_document(&json!({"@context": {"x": {"@type": "@id"}}})),
            Err(SkosError::Context(_))
        ));
    }

    #[test]
    fn test_single_concept_document() {
        let document = to_jskos_document(&concept_graph()).unwrap();
        assert_eq!(
            document,
            json!({
                "@context": JSKOS_CONTEXT_URL,
                "uri": "http://dewey.info/class/512/e23/",
                "type": ["skos:Concept"],
                "topConceptOf": ["http://dewey.info/scheme/edition/e23/"],
                "created": "2009-12-03",
                "notation": ["512"],
                "prefLabel": {"en": "Algebra"},
                "altLabel": {"en": ["Equations"]},
                "deprecated": true,
                "wd:including": {"@value": "Including cookbooks", "@language": "en"}
            })
        );
    }

    #[test]
    fn test_component_list_folded() {
        let mut graph = SkosGraph::new();
        let subject = RdfNode::uri("http://dewey.info/class/641.509/e23/");
        let head = build_list(
            &mut graph,
            ["http://dewey.info/class/641.5/e23/", "http://dewey.info/class/1--09/e23/"],
            |uri| Some(RdfNode::uri(uri)),
        );
        graph.add(subject, format!("{MADS}componentList"), head);

        let context = JskosContext::bundled().unwrap();
        let nodes = to_jskos_nodes(&graph, &context);
        assert_eq!(nodes.len(), 1);
        assert_eq!(
            nodes[0]["memberList"],
            json!([
                "http://dewey.info/class/641.5/e23/",
                "http://dewey.info/class/1--09/e23/"
            ])
        );
    }

    #[test]
    fn test_multiple_concepts_use_graph() {
        let mut graph = concept_graph();
        graph.add(
            RdfNode::uri("http://dewey.info/class/1--09/e23/"),
            format!("{SKOS}notation"),
            RdfNode::literal("T1--09"),
        );
        let document = to_jskos_document(&graph).unwrap();
        assert_eq!(document["@context"], json!(JSKOS_CONTEXT_URL));
        let nodes = document["@graph"].as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["notation"], json!(["512"]));
        assert!(nodes[0].get("@context").is_none());
    }

    #[test]
    fn test_write_ndjson() {
        let mut graph = concept_graph();
        graph.add(
            RdfNode::uri("http://dewey.info/class/1--09/e23/"),
            format!("{SKOS}notation"),
            RdfNode::literal("T1--09"),
        );
        let mut out = Vec::new();
        write_ndjson(&graph, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let node: Value = serde_json::from_str(line).unwrap();
            assert_eq!(node["@context"], json!(JSKOS_CONTEXT_URL));
        }
    }

    #[test]
    fn test_write_jskos_sorted_keys() {
        let mut out = Vec::new();
        write_jskos(&concept_graph(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let context_at = text.find("\"@context\"").unwrap();
        let uri_at = text.find("\"uri\"").unwrap();
        let alt_at = text.find("\"altLabel\"").unwrap();
        assert!(context_at < alt_at);
        assert!(alt_at < uri_at);
        assert!(text.starts_with("{\n  "));
    }
}
