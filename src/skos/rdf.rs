//! In-memory RDF graph for the converted concepts.
//!
//! The graph is append-only: statements are added in the order the builder
//! produces them and are never removed or rewritten. Conversion to `oxrdf`
//! terms happens only when the graph is serialized.

use std::collections::HashSet;

use indexmap::IndexMap;
use oxrdf::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term, Triple};

use crate::error::{Result, SkosError};

use super::namespaces::{self, rdf};

/// One statement of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdfTriple {
    /// Concept IRI or list cell
    pub subject: RdfNode,
    /// Property IRI
    pub predicate: String,
    /// Value
    pub object: RdfNode,
}

impl RdfTriple {
    /// A statement from its parts.
    #[must_use]
    pub fn new(subject: RdfNode, predicate: impl Into<String>, object: RdfNode) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// A subject or object term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfNode {
    /// IRI
    Uri(String),
    /// Blank node; the label is local to one graph
    BlankNode(String),
    /// Literal; a language tag takes precedence over a datatype
    Literal {
        /// Lexical form
        value: String,
        /// BCP 47 tag such as `en` or `nb`
        language: Option<String>,
        /// Datatype IRI
        datatype: Option<String>,
    },
}

impl RdfNode {
    /// A named node.
    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// A blank node with the given label.
    #[must_use]
    pub fn blank(id: impl Into<String>) -> Self {
        Self::BlankNode(id.into())
    }

    /// A plain string literal.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// A language-tagged string.
    #[must_use]
    pub fn literal_with_lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: Some(lang.into()),
            datatype: None,
        }
    }

    /// A literal with a datatype, such as `xsd:date`.
    #[must_use]
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    /// Creates a term of a vocabulary namespace.
    #[must_use]
    pub fn term(namespace: &str, local: &str) -> Self {
        Self::Uri(namespaces::iri(namespace, local))
    }

    /// The `rdf:nil` node closing a collection.
    #[must_use]
    pub fn nil() -> Self {
        Self::term(namespaces::RDF, rdf::NIL)
    }

    /// True for named nodes.
    #[must_use]
    pub const fn is_uri(&self) -> bool {
        matches!(self, Self::Uri(..))
    }

    /// True for blank nodes.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::BlankNode(..))
    }

    /// True for literals.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// The IRI of a named node.
    #[must_use]
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(uri) => Some(uri),
            _ => None,
        }
    }
}

/// All statements of one conversion run.
#[derive(Debug, Clone, Default)]
pub struct SkosGraph {
    triples: Vec<RdfTriple>,
    next_blank: usize,
}

impl SkosGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement.
    pub fn add_triple(&mut self, triple: RdfTriple) {
        self.triples.push(triple);
    }

    /// Append a statement from its parts.
    pub fn add(&mut self, subject: RdfNode, predicate: impl Into<String>, object: RdfNode) {
        self.triples.push(RdfTriple::new(subject, predicate, object));
    }

    /// A fresh blank node: `b1`, `b2`, and so on.
    pub fn new_blank_node(&mut self) -> RdfNode {
        self.next_blank += 1;
        RdfNode::BlankNode(format!("b{}", self.next_blank))
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// True if nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// All statements, in insertion order.
    pub fn triples(&self) -> impl Iterator<Item = &RdfTriple> {
        self.triples.iter()
    }

    /// Group the statements by subject for lookups.
    #[must_use]
    pub fn index(&self) -> GraphIndex<'_> {
        GraphIndex::new(self)
    }
}

/// Statements grouped by subject, plus the set of nodes used as objects.
///
/// Built in one pass over the graph so that per-subject lookups during
/// serialization do not rescan every statement.
#[derive(Debug)]
pub struct GraphIndex<'a> {
    by_subject: IndexMap<&'a RdfNode, Vec<&'a RdfTriple>>,
    referenced: HashSet<&'a RdfNode>,
}

impl<'a> GraphIndex<'a> {
    /// Index a graph.
    #[must_use]
    pub fn new(graph: &'a SkosGraph) -> Self {
        let mut by_subject: IndexMap<&'a RdfNode, Vec<&'a RdfTriple>> = IndexMap::new();
        let mut referenced = HashSet::new();
        for triple in &graph.triples {
            by_subject.entry(&triple.subject).or_default().push(triple);
            referenced.insert(&triple.object);
        }
        Self {
            by_subject,
            referenced,
        }
    }

    /// Distinct subjects, in order of first appearance.
    pub fn subjects(&self) -> impl Iterator<Item = &'a RdfNode> + '_ {
        self.by_subject.keys().copied()
    }

    /// Statements of a subject, in insertion order.
    #[must_use]
    pub fn triples_for(&self, subject: &RdfNode) -> &[&'a RdfTriple] {
        match self.by_subject.get(subject) {
            Some(triples) => triples,
            None => &[],
        }
    }

    /// Objects of a subject and predicate, in insertion order.
    pub fn objects<'s>(&'s self, subject: &RdfNode, predicate: &'s str) -> impl Iterator<Item = &'a RdfNode> + 's {
        self.triples_for(subject)
            .iter()
            .copied()
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// True if the node is the object of some statement.
    #[must_use]
    pub fn is_referenced(&self, node: &RdfNode) -> bool {
        self.referenced.contains(node)
    }

    /// Items of the RDF collection starting at `head`.
    ///
    /// Returns `None` if `head` is not a well-formed collection: every node
    /// must be a blank node with exactly one `rdf:first` and one `rdf:rest`,
    /// and the chain must end in `rdf:nil` without cycles.
    #[must_use]
    pub fn list_items(&self, head: &'a RdfNode) -> Option<Vec<&'a RdfNode>> {
        let first = namespaces::iri(namespaces::RDF, rdf::FIRST);
        let rest = namespaces::iri(namespaces::RDF, rdf::REST);
        let nil = RdfNode::nil();

        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut node = head;
        while *node != nil {
            if !node.is_blank() || !seen.insert(node) {
                return None;
            }
            let mut firsts = self.objects(node, &first);
            let mut rests = self.objects(node, &rest);
            match (firsts.next(), firsts.next(), rests.next(), rests.next()) {
                (Some(item), None, Some(next), None) => {
                    items.push(item);
                    node = next;
                },
                _ => return None,
            }
        }
        Some(items)
    }
}

fn invalid(message: String) -> SkosError {
    SkosError::Serialization(message)
}

fn named_node(iri: &str) -> Result<NamedNode> {
    NamedNode::new(iri).map_err(|e| invalid(format!("Invalid IRI <{iri}>: {e}")))
}

fn blank_node(id: &str) -> Result<BlankNode> {
    BlankNode::new(id).map_err(|e| invalid(format!("Invalid blank node _:{id}: {e}")))
}

fn literal(value: &str, language: Option<&str>, datatype: Option<&str>) -> Result<Literal> {
    match (language, datatype) {
        (Some(lang), _) => Literal::new_language_tagged_literal(value, lang)
            .map_err(|e| invalid(format!("Invalid language tag {lang:?}: {e}"))),
        (None, Some(datatype)) => Ok(Literal::new_typed_literal(value, named_node(datatype)?)),
        (None, None) => Ok(Literal::new_simple_literal(value)),
    }
}

/// Converts a statement to an `oxrdf` triple for serialization.
///
/// # Errors
///
/// Returns [`SkosError::Serialization`] for an invalid IRI, blank node
/// identifier or language tag, or for a literal in subject position.
pub fn to_oxrdf_triple(triple: &RdfTriple) -> Result<Triple> {
    let subject: NamedOrBlankNode = match &triple.subject {
        RdfNode::Uri(iri) => named_node(iri)?.into(),
        RdfNode::BlankNode(id) => blank_node(id)?.into(),
        RdfNode::Literal { value, .. } => {
            return Err(invalid(format!("Literal {value:?} in subject position")));
        },
    };
    let object: Term = match &triple.object {
        RdfNode::Uri(iri) => named_node(iri)?.into(),
        RdfNode::BlankNode(id) => blank_node(id)?.into(),
        RdfNode::Literal {
            value,
            language,
            datatype,
        } => literal(value, language.as_deref(), datatype.as_deref())?.into(),
    };
    Ok(Triple::new(subject, named_node(&triple.predicate)?, object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skos::namespaces::{skos, RDF, SKOS};

    #[test]
    fn test_rdf_node_construction() {
        assert!(RdfNode::uri("http://example.org/foo").is_uri());
        assert!(RdfNode::blank("b1").is_blank());
        assert!(RdfNode::literal("hello").is_literal());
        assert!(RdfNode::literal_with_lang("hei", "nb").is_literal());
        assert_eq!(
            RdfNode::term(SKOS, skos::CONCEPT).as_uri(),
            Some("http://www.w3.org/2004/02/skos/core#Concept")
        );
    }

    #[test]
    fn test_graph_operations() {
        let mut graph = SkosGraph::new();
        assert!(graph.is_empty());

        let subject = RdfNode::uri("http://example.org/512");
        graph.add(
            subject.clone(),
            format!("{RDF}type"),
            RdfNode::term(SKOS, skos::CONCEPT),
        );
        graph.add(
            subject.clone(),
            format!("{SKOS}prefLabel"),
            RdfNode::literal_with_lang("Algebra", "en"),
        );

        assert_eq!(graph.len(), 2);
        let index = graph.index();
        assert_eq!(index.subjects().count(), 1);
        assert_eq!(index.triples_for(&subject).len(), 2);
        assert!(index.triples_for(&RdfNode::uri("http://example.org/other")).is_empty());
        assert_eq!(
            index.objects(&subject, &format!("{SKOS}prefLabel")).next(),
            Some(&RdfNode::literal_with_lang("Algebra", "en"))
        );
        assert!(index.is_referenced(&RdfNode::term(SKOS, skos::CONCEPT)));
        assert!(!index.is_referenced(&subject));
    }

    #[test]
    fn test_blank_node_ids() {
        let mut graph = SkosGraph::new();
        assert_eq!(graph.new_blank_node(), RdfNode::blank("b1"));
        assert_eq!(graph.new_blank_node(), RdfNode::blank("b2"));
    }

    #[test]
    fn test_list_items() {
        let mut graph = SkosGraph::new();
        let first = format!("{RDF}first");
        let rest = format!("{RDF}rest");
        let b1 = graph.new_blank_node();
        let b2 = graph.new_blank_node();
        graph.add(b1.clone(), first.clone(), RdfNode::uri("http://example.org/a"));
        graph.add(b1.clone(), rest.clone(), b2.clone());
        graph.add(b2.clone(), first, RdfNode::uri("http://example.org/b"));
        graph.add(b2, rest, RdfNode::nil());

        let items = graph.index().list_items(&b1).unwrap();
        assert_eq!(
            items,
            vec![
                &RdfNode::uri("http://example.org/a"),
                &RdfNode::uri("http://example.org/b")
            ]
        );
        assert_eq!(graph.index().list_items(&RdfNode::nil()), Some(vec![]));
    }

    #[test]
    fn test_list_items_rejects_cycle() {
        let mut graph = SkosGraph::new();
        let b1 = graph.new_blank_node();
        graph.add(b1.clone(), format!("{RDF}first"), RdfNode::literal("x"));
        graph.add(b1.clone(), format!("{RDF}rest"), b1.clone());
        assert!(graph.index().list_items(&b1).is_none());
    }

    #[test]
    fn test_to_oxrdf_triple() {
        let triple = RdfTriple::new(
            RdfNode::uri("http://example.org/512"),
            format!("{SKOS}notation"),
            RdfNode::literal("512"),
        );
        let converted = to_oxrdf_triple(&triple).unwrap();
        assert_eq!(converted.predicate.as_str(), format!("{SKOS}notation"));

        let bad = RdfTriple::new(
            RdfNode::literal("x"),
            format!("{SKOS}notation"),
            RdfNode::literal("512"),
        );
        assert!(matches!(
            to_oxrdf_triple(&bad),
            Err(SkosError::Serialization(_))
        ));
    }
}
