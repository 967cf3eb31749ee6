//! Conversion driver.
//!
//! [`Converter`] consumes a stream of raw records and accumulates one
//! [`SkosGraph`]. Each record is normalized, resolved and gated for
//! visibility before it reaches the graph builder. Record-level failures
//! are logged and counted here and nowhere else; document-level failures
//! end the run.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::classification::ClassificationNormalizer;
use crate::config::ConversionConfig;
use crate::error::Result;
use crate::field_access::FieldAccessor;
use crate::marcxml::MarcXmlStream;
use crate::record::RawRecord;
use crate::skos::{SkosGraph, SkosGraphBuilder};
use crate::uri::UriResolver;

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Statements were added to the graph
    Converted,
    /// No URI could be resolved
    Unresolved,
    /// Suppressed by a 153 `$9` marker
    Hidden,
}

/// Counters for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Records read from the input
    pub read: usize,
    /// Records added to the graph
    pub converted: usize,
    /// Records rejected as invalid
    pub invalid: usize,
    /// Records skipped for lack of a URI
    pub unresolved: usize,
    /// Records skipped as not public
    pub hidden: usize,
}

impl ConversionStats {
    fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Converted => self.converted += 1,
            RecordOutcome::Unresolved => self.unresolved += 1,
            RecordOutcome::Hidden => self.hidden += 1,
        }
    }
}

/// The result of a run: the graph and what went into it.
#[derive(Debug, Clone, Default)]
pub struct ConversionOutcome {
    /// All statements of the run
    pub graph: SkosGraph,
    /// Record counters
    pub stats: ConversionStats,
}

/// Converts MARC 21 Classification records to a SKOS graph.
///
/// # Examples
///
/// ```ignore
/// use marc2skos::{ConversionConfig, Converter};
///
/// let converter = Converter::new(ConversionConfig::new().with_notes(true));
/// let outcome = converter.convert_path("ddc23.xml")?;
/// println!("{} concepts", outcome.stats.converted);
/// ```
#[derive(Debug)]
pub struct Converter {
    config: ConversionConfig,
    resolver: UriResolver,
}

impl Converter {
    /// Creates a converter; the URI resolver chain is built from the
    /// configuration once.
    #[must_use]
    pub fn new(config: ConversionConfig) -> Self {
        let resolver = UriResolver::from_config(&config);
        Self { config, resolver }
    }

    /// The configuration of this converter.
    #[must_use]
    pub const fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert one record into `graph`.
    ///
    /// # Errors
    ///
    /// Returns a record-level error ([`crate::SkosError::InvalidRecord`],
    /// [`crate::SkosError::InvalidLeader`]) if the record is not a usable
    /// classification record. The graph is unchanged in that case.
    pub fn process_record<R: FieldAccessor + ?Sized>(
        &self,
        graph: &mut SkosGraph,
        record: &R,
    ) -> Result<RecordOutcome> {
        let normalized = ClassificationNormalizer::new(&self.config, &self.resolver).normalize(record)?;

        if normalized.uri.is_none() {
            tracing::debug!(
                notation = normalized.notation.as_deref().unwrap_or_default(),
                "Ignoring record because: No known concept scheme detected, and no manual URI template given"
            );
            return Ok(RecordOutcome::Unresolved);
        }
        if !normalized.is_public() {
            tracing::debug!(uri = normalized.uri.as_deref().unwrap_or_default(), "Ignoring non-public record");
            return Ok(RecordOutcome::Hidden);
        }

        SkosGraphBuilder::new(&self.config).add_record(graph, &normalized, |component| {
            self.resolver.concept_uri(&normalized.uri_request(component))
        });
        Ok(RecordOutcome::Converted)
    }

    /// Convert a sequence of records.
    ///
    /// Record-level errors are logged at debug level and counted; any other
    /// error ends the run.
    ///
    /// # Errors
    ///
    /// Returns the first document-level error, such as malformed XML.
    pub fn convert_records<I>(&self, records: I) -> Result<ConversionOutcome>
    where
        I: IntoIterator<Item = Result<RawRecord>>,
    {
        let mut outcome = ConversionOutcome::default();
        for record in records {
            let record = record?;
            outcome.stats.read += 1;
            match self.process_record(&mut outcome.graph, &record) {
                Ok(result) => outcome.stats.record(result),
                Err(e) if e.is_record_level() => {
                    tracing::debug!("Ignoring record {}: {}", outcome.stats.read, e);
                    outcome.stats.invalid += 1;
                },
                Err(e) => return Err(e),
            }
        }

        let stats = &outcome.stats;
        tracing::info!(
            read = stats.read,
            converted = stats.converted,
            invalid = stats.invalid,
            unresolved = stats.unresolved,
            hidden = stats.hidden,
            triples = outcome.graph.len(),
            "Conversion finished"
        );
        Ok(outcome)
    }

    /// Convert a MARCXML document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SkosError::Xml`] if the document is malformed.
    pub fn convert_reader<R: BufRead>(&self, reader: R) -> Result<ConversionOutcome> {
        self.convert_records(MarcXmlStream::new(reader))
    }

    /// Convert a MARCXML file, or standard input for `-`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be opened or is malformed.
    pub fn convert_path(&self, path: impl AsRef<Path>) -> Result<ConversionOutcome> {
        let path = path.as_ref();
        tracing::info!("Parsing: {}", path.display());
        self.convert_reader(open_input(path)?)
    }
}

/// Open an input for reading; `-` is standard input and `.gz` files are
/// decompressed.
///
/// # Errors
///
/// Returns [`crate::SkosError::IoError`] if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(path)?;
    let is_gzip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    Ok(if is_gzip {
        Box::new(BufReader::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Box::new(BufReader::new(file))
    })
}
