//! Error types for MARC to SKOS conversion.
//!
//! This module provides the [`SkosError`] type for all conversion operations
//! and the [`Result`] convenience type.
//!
//! Errors fall into two groups. Record-level errors ([`SkosError::InvalidRecord`],
//! [`SkosError::InvalidLeader`]) reject a single record and are caught by the
//! pipeline; everything else aborts the run.

use thiserror::Error;

/// Error type for all conversion operations.
#[derive(Error, Debug)]
pub enum SkosError {
    /// The record is not a usable MARC 21 Classification record.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The record leader is missing or too short.
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// The input document is not well-formed XML.
    #[error("XML error at byte {position}: {message}")]
    Xml {
        /// Byte offset in the input where the reader stopped.
        position: usize,
        /// Description from the XML reader.
        message: String,
    },

    /// The requested output format is not supported.
    #[error("Output format not supported: {0}")]
    UnsupportedFormat(String),

    /// The graph could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The bundled JSON-LD context could not be read.
    #[error("Invalid JSON-LD context: {0}")]
    Context(String),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SkosError {
    /// Returns true if this error only concerns the current record.
    ///
    /// Record-level errors are logged and the record skipped; all other
    /// errors end the run.
    #[must_use]
    pub const fn is_record_level(&self) -> bool {
        matches!(self, Self::InvalidRecord(_) | Self::InvalidLeader(_))
    }
}

/// Convenience type alias for [`std::result::Result`] with [`SkosError`].
pub type Result<T> = std::result::Result<T, SkosError>;
