//! SKOS graph construction from normalized records.
//!
//! [`SkosGraphBuilder::add_record`] appends the statements for one concept;
//! [`build_list`] builds the RDF collections used for synthesized number
//! components.

use crate::classification::{NormalizedRecord, RecordType};
use crate::config::ConversionConfig;

use super::namespaces::{self, dcterms, mads, owl, rdf, skos, xsd};
use super::rdf::{RdfNode, SkosGraph};

/// Prefix of table notations in the output.
pub const TABLE_NOTATION_PREFIX: &str = "T";

/// Append an RDF collection of `items` to the graph and return its head.
///
/// Items are mapped to nodes first; items whose mapping returns `None` are
/// left out. Each remaining item gets one blank node with `rdf:first`
/// pointing at the item and `rdf:rest` at the next node. The last node's
/// `rdf:rest` is `rdf:nil`. An empty list is `rdf:nil` itself, with no
/// statements added.
///
/// # Examples
///
/// ```ignore
/// use marc2skos::skos::{build_list, RdfNode, SkosGraph};
///
/// let mut graph = SkosGraph::new();
/// let head = build_list(&mut graph, ["a", "b"], |s| Some(RdfNode::literal(s)));
/// assert_eq!(head, RdfNode::blank("b1"));
/// assert_eq!(graph.len(), 4);
/// ```
pub fn build_list<I, F>(graph: &mut SkosGraph, items: I, mut map: F) -> RdfNode
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Option<RdfNode>,
{
    let nodes: Vec<RdfNode> = items.into_iter().filter_map(&mut map).collect();
    let first = namespaces::iri(namespaces::RDF, rdf::FIRST);
    let rest = namespaces::iri(namespaces::RDF, rdf::REST);

    let mut head = RdfNode::nil();
    let mut previous: Option<RdfNode> = None;
    for node in nodes {
        let cell = graph.new_blank_node();
        match previous.take() {
            Some(prev) => graph.add(prev, rest.as_str(), cell.clone()),
            None => head = cell.clone(),
        }
        graph.add(cell.clone(), first.as_str(), node);
        previous = Some(cell);
    }
    if let Some(last) = previous {
        graph.add(last, rest, RdfNode::nil());
    }
    head
}

/// Adds concepts to a [`SkosGraph`].
#[derive(Debug, Clone, Copy)]
pub struct SkosGraphBuilder<'a> {
    config: &'a ConversionConfig,
}

impl<'a> SkosGraphBuilder<'a> {
    /// Creates a builder; the configuration decides which optional parts of
    /// a record are written.
    #[must_use]
    pub const fn new(config: &'a ConversionConfig) -> Self {
        Self { config }
    }

    /// Append the statements describing one record.
    ///
    /// Records without a URI contribute nothing. `component_uri` resolves
    /// a component number to a concept URI; components it cannot resolve
    /// are left out of the component list.
    pub fn add_record<F>(&self, graph: &mut SkosGraph, record: &NormalizedRecord, component_uri: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(uri) = record.uri.as_deref() else {
            return;
        };
        let subject = RdfNode::uri(uri);
        let lang = record.lang.as_str();
        let term = |ns: &str, local: &str| namespaces::iri(ns, local);

        graph.add(
            subject.clone(),
            term(namespaces::RDF, rdf::TYPE),
            RdfNode::term(namespaces::SKOS, skos::CONCEPT),
        );

        let membership = if record.is_top_concept {
            skos::TOP_CONCEPT_OF
        } else {
            skos::IN_SCHEME
        };
        for scheme in &record.scheme_uris {
            graph.add(
                subject.clone(),
                term(namespaces::SKOS, membership),
                RdfNode::uri(scheme),
            );
        }

        let date_type = term(namespaces::XSD, xsd::DATE);
        for (local, date) in [
            (dcterms::CREATED, record.created),
            (dcterms::MODIFIED, record.modified),
        ] {
            if let Some(date) = date {
                graph.add(
                    subject.clone(),
                    term(namespaces::DCTERMS, local),
                    RdfNode::typed_literal(date.format("%Y-%m-%d").to_string(), date_type.as_str()),
                );
            }
        }

        if let Some(notation) = record.notation.as_deref() {
            let notation = match record.record_type {
                RecordType::Table => format!("{TABLE_NOTATION_PREFIX}{notation}"),
                RecordType::Classification => notation.to_string(),
            };
            graph.add(
                subject.clone(),
                term(namespaces::SKOS, skos::NOTATION),
                RdfNode::literal(notation),
            );
        }

        if let Some(label) = record.pref_label.as_deref() {
            graph.add(
                subject.clone(),
                term(namespaces::SKOS, skos::PREF_LABEL),
                RdfNode::literal_with_lang(label, lang),
            );
        }

        if self.config.include_index_terms {
            for label in &record.alt_labels {
                graph.add(
                    subject.clone(),
                    term(namespaces::SKOS, skos::ALT_LABEL),
                    RdfNode::literal_with_lang(label, lang),
                );
            }
        }

        for parent in &record.broader {
            graph.add(
                subject.clone(),
                term(namespaces::SKOS, skos::BROADER),
                RdfNode::uri(parent),
            );
        }

        if self.config.include_notes {
            let notes = [
                (skos::DEFINITION, &record.definition),
                (skos::EDITORIAL_NOTE, &record.editorial_note),
                (skos::SCOPE_NOTE, &record.scope_note),
                (skos::HISTORY_NOTE, &record.history_note),
            ];
            for (local, values) in notes {
                for note in values {
                    graph.add(
                        subject.clone(),
                        term(namespaces::SKOS, local),
                        RdfNode::literal_with_lang(note, lang),
                    );
                }
            }
        }

        if record.deprecated {
            graph.add(
                subject.clone(),
                term(namespaces::OWL, owl::DEPRECATED),
                RdfNode::typed_literal("true", term(namespaces::XSD, xsd::BOOLEAN)),
            );
        }

        if self.config.include_components && !record.components.is_empty() {
            let head = build_list(graph, &record.components, |component| {
                let resolved = component_uri(component.as_str());
                if resolved.is_none() {
                    tracing::debug!(%component, record = %uri, "no URI for component");
                }
                resolved.map(RdfNode::uri)
            });
            if head != RdfNode::nil() {
                graph.add(subject.clone(), term(namespaces::MADS, mads::COMPONENT_LIST), head);
            }
        }

        for (key, value) in &record.extras {
            graph.add(
                subject.clone(),
                term(namespaces::WD, key.as_str()),
                RdfNode::literal_with_lang(value, lang),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skos::namespaces::{MADS, RDF, SKOS};
    use chrono::NaiveDate;

    fn algebra() -> NormalizedRecord {
        NormalizedRecord {
            uri: Some("http://dewey.info/class/512/e23/".into()),
            notation: Some("512".into()),
            scheme_uris: vec!["http://dewey.info/scheme/edition/e23/".into()],
            is_top_concept: true,
            pref_label: Some("Algebra".into()),
            lang: "en".into(),
            public: true,
            ..NormalizedRecord::default()
        }
    }

    fn count(graph: &SkosGraph, predicate: &str) -> usize {
        graph.triples().filter(|t| t.predicate == predicate).count()
    }

    fn component(number: &str) -> Option<String> {
        Some(format!("http://example.org/{number}"))
    }

    // ============================================================================
    // build_list
    // ============================================================================

    #[test]
    fn test_build_list_order() {
        let mut graph = SkosGraph::new();
        let head = build_list(&mut graph, ["X", "Y", "Z"], |s| Some(RdfNode::literal(s)));

        let items = graph.index().list_items(&head).unwrap();
        assert_eq!(
            items,
            vec![
                &RdfNode::literal("X"),
                &RdfNode::literal("Y"),
                &RdfNode::literal("Z")
            ]
        );
        assert_eq!(graph.len(), 6);
        assert_eq!(count(&graph, &format!("{RDF}first")), 3);
    }

    #[test]
    fn test_build_list_single_item() {
        let mut graph = SkosGraph::new();
        let head = build_list(&mut graph, ["X"], |s| Some(RdfNode::literal(s)));
        assert!(head.is_blank());
        assert_eq!(graph.len(), 2);
        assert_eq!(
            graph.index().objects(&head, &format!("{RDF}rest")).next(),
            Some(&RdfNode::nil())
        );
    }

    #[test]
    fn test_build_list_empty_and_skipped() {
        let mut graph = SkosGraph::new();
        let head = build_list(&mut graph, Vec::<&str>::new(), |s| Some(RdfNode::literal(s)));
        assert_eq!(head, RdfNode::nil());
        assert!(graph.is_empty());

        let head = build_list(&mut graph, ["X", "skip", "Z"], |s| {
            (s != "skip").then(|| RdfNode::literal(s))
        });
        let items = graph.index().list_items(&head).unwrap();
        assert_eq!(items.len(), 2);
    }

    // ============================================================================
    // add_record
    // ============================================================================

    #[test]
    fn test_minimal_concept() {
        let config = ConversionConfig::default();
        let mut graph = SkosGraph::new();
        SkosGraphBuilder::new(&config).add_record(&mut graph, &algebra(), component);

        assert_eq!(graph.len(), 4);
        assert_eq!(count(&graph, &format!("{RDF}type")), 1);
        assert_eq!(count(&graph, &format!("{SKOS}topConceptOf")), 1);
        assert_eq!(count(&graph, &format!("{SKOS}inScheme")), 0);
        let subject = RdfNode::uri("http://dewey.info/class/512/e23/");
        assert_eq!(
            graph.index().objects(&subject, &format!("{SKOS}notation")).next(),
            Some(&RdfNode::literal("512"))
        );
        assert_eq!(
            graph.index().objects(&subject, &format!("{SKOS}prefLabel")).next(),
            Some(&RdfNode::literal_with_lang("Algebra", "en"))
        );
    }

    #[test]
    fn test_record_without_uri_adds_nothing() {
        let config = ConversionConfig::default();
        let mut graph = SkosGraph::new();
        let record = NormalizedRecord {
            uri: None,
            ..algebra()
        };
        SkosGraphBuilder::new(&config).add_record(&mut graph, &record, component);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_table_notation_prefix() {
        let config = ConversionConfig::default();
        let mut graph = SkosGraph::new();
        let record = NormalizedRecord {
            uri: Some("http://dewey.info/class/1--0901/e23/".into()),
            record_type: RecordType::Table,
            notation: Some("1--0901".into()),
            is_top_concept: false,
            broader: vec!["http://dewey.info/class/1--09/e23/".into()],
            ..algebra()
        };
        SkosGraphBuilder::new(&config).add_record(&mut graph, &record, component);

        let subject = RdfNode::uri("http://dewey.info/class/1--0901/e23/");
        assert_eq!(
            graph.index().objects(&subject, &format!("{SKOS}notation")).next(),
            Some(&RdfNode::literal("T1--0901"))
        );
        assert_eq!(count(&graph, &format!("{SKOS}inScheme")), 1);
        assert_eq!(count(&graph, &format!("{SKOS}broader")), 1);
    }

    #[test]
    fn test_dates_and_deprecation() {
        let config = ConversionConfig::default();
        let mut graph = SkosGraph::new();
        let record = NormalizedRecord {
            created: NaiveDate::from_ymd_opt(2009, 12, 3),
            deprecated: true,
            ..algebra()
        };
        SkosGraphBuilder::new(&config).add_record(&mut graph, &record, component);

        let subject = RdfNode::uri("http://dewey.info/class/512/e23/");
        assert_eq!(
            graph
                .index()
                .objects(&subject, "http://purl.org/dc/terms/created")
                .next(),
            Some(&RdfNode::typed_literal(
                "2009-12-03",
                "http://www.w3.org/2001/XMLSchema#date"
            ))
        );
        assert_eq!(
            graph
                .index()
                .objects(&subject, "http://www.w3.org/2002/07/owl#deprecated")
                .next(),
            Some(&RdfNode::typed_literal(
                "true",
                "http://www.w3.org/2001/XMLSchema#boolean"
            ))
        );
    }

    #[test]
    fn test_optional_parts_follow_config() {
        let record = NormalizedRecord {
            alt_labels: vec!["Cooking".into()],
            scope_note: vec!["Home cooking".into()],
            components: vec!["641.5".into(), "1--09".into()],
            ..algebra()
        };

        let mut graph = SkosGraph::new();
        let config = ConversionConfig::default();
        SkosGraphBuilder::new(&config).add_record(&mut graph, &record, component);
        assert_eq!(count(&graph, &format!("{SKOS}altLabel")), 0);
        assert_eq!(count(&graph, &format!("{SKOS}scopeNote")), 0);
        assert_eq!(count(&graph, &format!("{MADS}componentList")), 0);

        let mut graph = SkosGraph::new();
        let config = ConversionConfig::new()
            .with_index_terms(true)
            .with_notes(true)
            .with_components(true);
        SkosGraphBuilder::new(&config).add_record(&mut graph, &record, component);
        assert_eq!(count(&graph, &format!("{SKOS}altLabel")), 1);
        assert_eq!(count(&graph, &format!("{SKOS}scopeNote")), 1);

        let subject = RdfNode::uri("http://dewey.info/class/512/e23/");
        let head = graph
            .index()
            .objects(&subject, &format!("{MADS}componentList"))
            .next()
            .cloned()
            .unwrap();
        let items = graph.index().list_items(&head).unwrap();
        assert_eq!(
            items,
            vec![
                &RdfNode::uri("http://example.org/641.5"),
                &RdfNode::uri("http://example.org/1--09")
            ]
        );
    }

    #[test]
    fn test_unresolvable_components_leave_no_list() {
        let record = NormalizedRecord {
            components: vec!["641.5".into()],
            ..algebra()
        };
        let config = ConversionConfig::new().with_components(true);
        let mut graph = SkosGraph::new();
        SkosGraphBuilder::new(&config).add_record(&mut graph, &record, |_| None);
        assert_eq!(count(&graph, &format!("{MADS}componentList")), 0);
        assert!(graph.triples().all(|t| !t.subject.is_blank()));
    }

    #[test]
    fn test_extras() {
        let mut record = algebra();
        record
            .extras
            .insert("including".into(), "Including cookbooks".into());
        let config = ConversionConfig::default();
        let mut graph = SkosGraph::new();
        SkosGraphBuilder::new(&config).add_record(&mut graph, &record, component);
        assert_eq!(
            count(&graph, "http://data.ub.uio.no/webdewey-terms#including"),
            1
        );
    }
}
