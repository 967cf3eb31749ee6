//! Serialization of the finished graph.
//!
//! - `collation`: sort keys for classification numbers
//! - `turtle`: Turtle via `oxrdfio`
//! - `jskos`: JSKOS (JSON-LD) documents and line-delimited JSKOS

pub mod collation;
pub mod jskos;
pub mod turtle;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::skos::namespaces::{self, skos};
use crate::skos::rdf::{GraphIndex, RdfNode, SkosGraph};

pub use jskos::{write_jskos, write_ndjson, JskosContext, JSKOS_CONTEXT_URL};
pub use turtle::write_turtle;

/// Where serialized output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Standard output
    Stdout,
    /// A file, created (or truncated) only when there is something to write
    File(PathBuf),
}

impl OutputTarget {
    /// Target for a command line argument; absent or `-` means stdout.
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Self::Stdout,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    fn open(&self) -> Result<Box<dyn Write>> {
        Ok(match self {
            Self::Stdout => Box::new(BufWriter::new(io::stdout().lock())),
            Self::File(path) => Box::new(BufWriter::new(File::create(path)?)),
        })
    }
}

/// Named subjects in collation order, then blank nodes no statement
/// refers to.
pub(crate) fn ordered_subjects<'a>(index: &GraphIndex<'a>) -> Vec<&'a RdfNode> {
    let notation = namespaces::iri(namespaces::SKOS, skos::NOTATION);

    let mut named: Vec<(String, &'a str, &'a RdfNode)> = index
        .subjects()
        .filter_map(|subject| {
            let iri = subject.as_uri()?;
            let value = index.objects(subject, &notation).find_map(|object| match object {
                RdfNode::Literal { value, .. } => Some(value.as_str()),
                _ => None,
            });
            Some((collation::subject_sort_key(iri, value), iri, subject))
        })
        .collect();
    named.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));

    let unreferenced = index
        .subjects()
        .filter(|subject| subject.is_blank() && !index.is_referenced(subject));

    named
        .into_iter()
        .map(|(_, _, subject)| subject)
        .chain(unreferenced)
        .collect()
}

/// Serialize the graph in the given format.
///
/// # Errors
///
/// Returns an error if the graph cannot be serialized or written.
pub fn write_graph<W: Write>(graph: &SkosGraph, format: OutputFormat, writer: W) -> Result<()> {
    match format {
        OutputFormat::Turtle => write_turtle(graph, writer),
        OutputFormat::Jskos => write_jskos(graph, writer),
        OutputFormat::Ndjson => write_ndjson(graph, writer),
    }
}

/// Write the graph to its target.
///
/// An empty graph is not written: a warning is logged, no file is created
/// and `false` is returned.
///
/// # Errors
///
/// Returns an error if the target cannot be opened or the graph cannot be
/// serialized.
pub fn write_output(graph: &SkosGraph, format: OutputFormat, target: &OutputTarget) -> Result<bool> {
    if graph.is_empty() {
        tracing::warn!("RDF result is empty!");
        return Ok(false);
    }

    let mut writer = target.open()?;
    write_graph(graph, format, &mut writer)?;
    writer.flush()?;

    if let OutputTarget::File(path) = target {
        tracing::info!("Wrote {}: {}", format, path.display());
    }
    Ok(true)
}
