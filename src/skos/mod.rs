//! SKOS graph model and construction.
//!
//! - `namespaces`: vocabulary namespaces and local names
//! - `rdf`: the append-only triple store ([`SkosGraph`])
//! - `builder`: statements for one concept ([`SkosGraphBuilder`]) and RDF
//!   collections ([`build_list`])

pub mod builder;
pub mod namespaces;
pub mod rdf;

pub use builder::{build_list, SkosGraphBuilder, TABLE_NOTATION_PREFIX};
pub use rdf::{GraphIndex, RdfNode, RdfTriple, SkosGraph};
