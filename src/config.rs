//! Configuration options for classification to SKOS conversion.
//!
//! This module provides the [`ConversionConfig`] struct which controls how
//! records are identified and which optional parts of a record are converted,
//! and the [`OutputFormat`] selecting how the resulting graph is written.

use std::fmt;
use std::str::FromStr;

use crate::error::SkosError;

/// Marker in 153 `$9` that hides a record from the published output.
pub const DEFAULT_SUPPRESSION_MARKER: &str = "ess=nsx";

/// Output format for the converted graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Turtle (text/turtle), subjects ordered by classification number
    #[default]
    Turtle,
    /// A single JSKOS (JSON-LD) document
    Jskos,
    /// One JSKOS object per line
    Ndjson,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Turtle => write!(f, "turtle"),
            Self::Jskos => write!(f, "jskos"),
            Self::Ndjson => write!(f, "ndjson"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SkosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "turtle" => Ok(Self::Turtle),
            "jskos" => Ok(Self::Jskos),
            "ndjson" => Ok(Self::Ndjson),
            other => Err(SkosError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Configuration for classification to SKOS conversion.
///
/// # Examples
///
/// ```ignore
/// use marc2skos::ConversionConfig;
///
/// let config = ConversionConfig::new()
///     .with_base_uri("http://example.org/class/{object}")
///     .with_scheme_uri("http://example.org/scheme")
///     .with_notes(true);
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConversionConfig {
    // === URI Generation ===
    /// URI template for concepts.
    ///
    /// `{object}` is replaced by the classification number and `{edition}`
    /// by the edition from 084 `$c`. When `None`, the concept scheme is
    /// detected from 084 `$a`.
    pub base_uri: Option<String>,

    /// Concept scheme for all records, overriding the detected scheme.
    pub scheme_uri: Option<String>,

    /// Concept scheme for table records. `{edition}` is replaced by the
    /// record's edition.
    pub table_scheme_uri: Option<String>,

    // === Content ===
    /// Include index terms (7XX) as `skos:altLabel`.
    pub include_index_terms: bool,

    /// Include notes (253, 353, 680, 683-685).
    pub include_notes: bool,

    /// Include synthesized number components (765) as `mads:componentList`.
    pub include_components: bool,

    /// 153 `$9` values that mark a record as not public.
    pub suppression_markers: Vec<String>,

    // === Output Control ===
    /// Output format for serialization.
    pub output_format: OutputFormat,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            scheme_uri: None,
            table_scheme_uri: None,
            include_index_terms: false,
            include_notes: false,
            include_components: false,
            suppression_markers: vec![DEFAULT_SUPPRESSION_MARKER.to_string()],
            output_format: OutputFormat::default(),
        }
    }
}

impl ConversionConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the concept URI template.
    #[must_use]
    pub fn with_base_uri(mut self, template: impl Into<String>) -> Self {
        self.base_uri = Some(template.into());
        self
    }

    /// Sets the concept scheme used for every record.
    #[must_use]
    pub fn with_scheme_uri(mut self, uri: impl Into<String>) -> Self {
        self.scheme_uri = Some(uri.into());
        self
    }

    /// Sets the concept scheme template for table records.
    #[must_use]
    pub fn with_table_scheme_uri(mut self, template: impl Into<String>) -> Self {
        self.table_scheme_uri = Some(template.into());
        self
    }

    /// Enables index terms.
    #[must_use]
    pub const fn with_index_terms(mut self, enabled: bool) -> Self {
        self.include_index_terms = enabled;
        self
    }

    /// Enables notes.
    #[must_use]
    pub const fn with_notes(mut self, enabled: bool) -> Self {
        self.include_notes = enabled;
        self
    }

    /// Enables synthesized number components.
    #[must_use]
    pub const fn with_components(mut self, enabled: bool) -> Self {
        self.include_components = enabled;
        self
    }

    /// Replaces the suppression markers.
    #[must_use]
    pub fn with_suppression_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suppression_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the output format.
    #[must_use]
    pub const fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}
