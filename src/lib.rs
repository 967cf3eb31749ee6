#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # marc2skos: MARC 21 Classification to SKOS
//!
//! Converts MARC 21 Classification records, serialized as MARCXML, into SKOS
//! concepts written as Turtle, JSKOS or line-delimited JSKOS.
//!
//! ## Quick Start
//!
//! ```ignore
//! use marc2skos::{ConversionConfig, Converter, OutputFormat};
//! use marc2skos::output::write_graph;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConversionConfig::new()
//!     .with_notes(true)
//!     .with_components(true);
//! let outcome = Converter::new(config).convert_path("ddc23.xml")?;
//!
//! let mut turtle = Vec::new();
//! write_graph(&outcome.graph, OutputFormat::Turtle, &mut turtle)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`marcxml`]: Streaming MARCXML reader
//! - [`record`]: Raw record structures (`RawRecord`, `Field`, `Subfield`)
//! - [`field_access`]: Tag-based read access to a record
//! - [`leader`]: Leader positions of classification records
//! - [`classification`]: Record validation and normalization
//! - [`language`]: MARC language codes to language tags
//! - [`uri`]: Concept and scheme URI resolution
//! - [`skos`]: SKOS graph model and construction
//! - [`pipeline`]: Conversion driver
//! - [`output`]: Turtle and JSKOS serialization
//! - [`config`]: Conversion options
//! - [`error`]: Error types and result type

pub mod classification;
pub mod config;
pub mod error;
pub mod field_access;
pub mod language;
pub mod leader;
pub mod marcxml;
pub mod output;
pub mod pipeline;
/// Raw MARC record structures (`RawRecord`, `Field`, `Subfield`)
pub mod record;
pub mod skos;
pub mod uri;

pub use classification::{ClassificationNormalizer, NormalizedRecord, RecordType};
pub use config::{ConversionConfig, OutputFormat};
pub use error::{Result, SkosError};
pub use field_access::FieldAccessor;
pub use leader::ClassificationLeader;
pub use marcxml::MarcXmlStream;
pub use pipeline::{ConversionOutcome, ConversionStats, Converter, RecordOutcome};
pub use record::{Field, FieldBuilder, RawRecord, RawRecordBuilder, Subfield};
pub use skos::{build_list, GraphIndex, RdfNode, RdfTriple, SkosGraph, SkosGraphBuilder};
pub use uri::{UriRequest, UriResolver, UriStrategy};
