//! Namespace definitions for the SKOS output vocabulary.
//!
//! Concepts are described with SKOS, dates with DCMI terms, deprecation with
//! OWL and synthesized number components with MADS/RDF. WebDewey specific
//! annotations live in their own namespace.

/// RDF namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// SKOS namespace.
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";

/// DCMI Metadata Terms namespace.
pub const DCTERMS: &str = "http://purl.org/dc/terms/";

/// OWL namespace.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";

/// MADS/RDF namespace (Metadata Authority Description Schema).
pub const MADS: &str = "http://www.loc.gov/mads/rdf/v1#";

/// WebDewey terms namespace.
pub const WD: &str = "http://data.ub.uio.no/webdewey-terms#";

/// XML Schema namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Prefixes bound in Turtle output, in declaration order.
pub const PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("skos", SKOS),
    ("dcterms", DCTERMS),
    ("owl", OWL),
    ("mads", MADS),
    ("wd", WD),
    ("xsd", XSD),
];

/// Full IRI of a term in a namespace.
#[must_use]
pub fn iri(namespace: &str, local: &str) -> String {
    format!("{namespace}{local}")
}

/// RDF vocabulary local names.
pub mod rdf {
    /// type - class membership.
    pub const TYPE: &str = "type";
    /// first - head of a collection.
    pub const FIRST: &str = "first";
    /// rest - tail of a collection.
    pub const REST: &str = "rest";
    /// nil - the empty collection.
    pub const NIL: &str = "nil";
}

/// SKOS vocabulary local names.
pub mod skos {
    /// Concept class.
    pub const CONCEPT: &str = "Concept";
    /// inScheme - scheme membership.
    pub const IN_SCHEME: &str = "inScheme";
    /// `topConceptOf` - scheme membership of a top concept.
    pub const TOP_CONCEPT_OF: &str = "topConceptOf";
    /// notation - classification number.
    pub const NOTATION: &str = "notation";
    /// `prefLabel` - caption.
    pub const PREF_LABEL: &str = "prefLabel";
    /// `altLabel` - index term.
    pub const ALT_LABEL: &str = "altLabel";
    /// broader - parent concept.
    pub const BROADER: &str = "broader";
    /// definition.
    pub const DEFINITION: &str = "definition";
    /// `editorialNote`.
    pub const EDITORIAL_NOTE: &str = "editorialNote";
    /// `scopeNote`.
    pub const SCOPE_NOTE: &str = "scopeNote";
    /// `historyNote`.
    pub const HISTORY_NOTE: &str = "historyNote";
}

/// DCMI terms local names.
pub mod dcterms {
    /// created - date entered on file.
    pub const CREATED: &str = "created";
    /// modified - date of latest transaction.
    pub const MODIFIED: &str = "modified";
}

/// OWL local names.
pub mod owl {
    /// deprecated - the number is no longer in use.
    pub const DEPRECATED: &str = "deprecated";
}

/// MADS/RDF local names.
pub mod mads {
    /// `componentList` - ordered components of a synthesized number.
    pub const COMPONENT_LIST: &str = "componentList";
}

/// XML Schema datatype local names.
pub mod xsd {
    /// date.
    pub const DATE: &str = "date";
    /// boolean.
    pub const BOOLEAN: &str = "boolean";
}
