//! Turtle output.
//!
//! Statements are handed to the `oxrdfio` Turtle serializer grouped by
//! subject: named subjects in collation order, each followed by the blank
//! nodes it references (depth-first), so component lists stay next to the
//! concept that owns them.

use std::collections::HashSet;
use std::io::Write;

use oxrdfio::{RdfFormat, RdfSerializer};

use crate::error::{Result, SkosError};
use crate::skos::namespaces::PREFIXES;
use crate::skos::rdf::{to_oxrdf_triple, GraphIndex, RdfNode, RdfTriple, SkosGraph};

use super::ordered_subjects;

/// Triples in output order.
#[must_use]
pub fn ordered_triples(graph: &SkosGraph) -> Vec<&RdfTriple> {
    let index = graph.index();
    let mut visited: HashSet<&RdfNode> = HashSet::new();
    let mut ordered = Vec::with_capacity(graph.len());
    for subject in ordered_subjects(&index) {
        push_subject(&index, subject, &mut visited, &mut ordered);
    }
    ordered
}

fn push_subject<'a>(
    index: &GraphIndex<'a>,
    subject: &'a RdfNode,
    visited: &mut HashSet<&'a RdfNode>,
    ordered: &mut Vec<&'a RdfTriple>,
) {
    if !visited.insert(subject) {
        return;
    }
    let triples = index.triples_for(subject);
    ordered.extend_from_slice(triples);
    for &triple in triples {
        if triple.object.is_blank() {
            push_subject(index, &triple.object, visited, ordered);
        }
    }
}

fn io_error(error: impl std::fmt::Display) -> SkosError {
    SkosError::Serialization(error.to_string())
}

/// Write the graph as Turtle.
///
/// # Errors
///
/// Returns [`SkosError::Serialization`] if a term is not valid RDF and
/// [`SkosError::IoError`] if writing fails.
pub fn write_turtle<W: Write>(graph: &SkosGraph, writer: W) -> Result<()> {
    let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
    for (prefix, namespace) in PREFIXES {
        serializer = serializer
            .with_prefix(*prefix, *namespace)
            .map_err(io_error)?;
    }
    let mut serializer = serializer.for_writer(writer);

    for triple in ordered_triples(graph) {
        let ox_triple = to_oxrdf_triple(triple)?;
        serializer.serialize_triple(&ox_triple)?;
    }
    serializer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexSet;
    use crate::skos::build_list;
    use crate::skos::namespaces::{RDF, SKOS};

    fn concept(graph: &mut SkosGraph, uri: &str, notation: &str) -> RdfNode {
        let subject = RdfNode::uri(uri);
        graph.add(
            subject.clone(),
            format!("{RDF}type"),
            RdfNode::uri(format!("{SKOS}Concept")),
        );
        graph.add(
            subject.clone(),
            format!("{SKOS}notation"),
            RdfNode::literal(notation),
        );
        subject
    }

    #[test]
    fn test_ordered_by_notation() {
        let mut graph = SkosGraph::new();
        concept(&mut graph, "http://example.org/t1", "T1--0901");
        concept(&mut graph, "http://example.org/c512", "512");
        concept(&mut graph, "http://example.org/c004", "004");

        let subjects: Vec<&RdfNode> = ordered_triples(&graph)
            .into_iter()
            .map(|t| &t.subject)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        assert_eq!(
            subjects,
            vec![
                &RdfNode::uri("http://example.org/c004"),
                &RdfNode::uri("http://example.org/c512"),
                &RdfNode::uri("http://example.org/t1"),
            ]
        );
    }

    #[test]
    fn test_blank_nodes_follow_owner() {
        let mut graph = SkosGraph::new();
        let late = concept(&mut graph, "http://example.org/late", "999");
        let head = build_list(&mut graph, ["http://example.org/a", "http://example.org/b"], |s| {
            Some(RdfNode::uri(s))
        });
        graph.add(late, "http://www.loc.gov/mads/rdf/v1#componentList", head);
        concept(&mut graph, "http://example.org/early", "001");

        let ordered = ordered_triples(&graph);
        assert_eq!(ordered.len(), graph.len());
        assert_eq!(ordered[0].subject, RdfNode::uri("http://example.org/early"));
        let tail: Vec<&RdfNode> = ordered[5..].iter().map(|t| &t.subject).collect();
        assert_eq!(
            tail,
            vec![
                &RdfNode::blank("b1"),
                &RdfNode::blank("b1"),
                &RdfNode::blank("b2"),
                &RdfNode::blank("b2"),
            ]
        );
    }

    #[test]
    fn test_large_graph_keeps_subjects_contiguous() {
        let mut graph = SkosGraph::new();
        for i in (0..2_000).rev() {
            let subject = concept(&mut graph, &format!("http://example.org/c{i}"), &format!("{i:04}"));
            let head = build_list(&mut graph, [format!("http://example.org/c{}", i / 2)], |s| {
                Some(RdfNode::uri(s))
            });
            graph.add(subject, "http://www.loc.gov/mads/rdf/v1#componentList", head);
        }

        let ordered = ordered_triples(&graph);
        assert_eq!(ordered.len(), graph.len());

        let mut runs: Vec<&RdfNode> = Vec::new();
        for triple in &ordered {
            if runs.last() != Some(&&triple.subject) {
                runs.push(&triple.subject);
            }
        }
        let distinct: IndexSet<&RdfNode> = runs.iter().copied().collect();
        assert_eq!(runs.len(), distinct.len());
        assert_eq!(ordered[0].subject, RdfNode::uri("http://example.org/c0"));
        assert!(ordered[3].subject.is_blank());
    }

    #[test]
    fn test_write_turtle() {
        let mut graph = SkosGraph::new();
        let subject = concept(&mut graph, "http://dewey.info/class/512/e23/", "512");
        graph.add(
            subject,
            format!("{SKOS}prefLabel"),
            RdfNode::literal_with_lang("Algebra", "en"),
        );

        let mut out = Vec::new();
        write_turtle(&graph, &mut out).unwrap();
        let turtle = String::from_utf8(out).unwrap();
        assert!(turtle.contains("@prefix skos: <http://www.w3.org/2004/02/skos/core#>"));
        assert!(turtle.contains("<http://dewey.info/class/512/e23/>"));
        assert!(turtle.contains("skos:Concept"));
        assert!(turtle.contains("\"Algebra\"@en"));
    }
}
