//! Raw MARC record structures as read from MARCXML.
//!
//! This module provides the record types produced by the stream reader:
//! - [`RawRecord`]: One `<record>` element: leader, control fields, data fields
//! - [`Field`]: A data field (010+) with indicators and subfields
//! - [`Subfield`]: A coded data element within a field
//!
//! A [`RawRecord`] is deliberately loose: the leader is optional and nothing
//! is validated. Validation happens when the record is normalized.
//!
//! # Examples
//!
//! ```ignore
//! use marc2skos::record::{Field, RawRecord};
//!
//! let record = RawRecord::builder()
//!     .leader("00000nw  a2200000n  4500")
//!     .control_field("008", "160419aaaaaaaa")
//!     .field(
//!         Field::builder("153", ' ', ' ')
//!             .subfield('a', "512")
//!             .subfield('j', "Algebra")
//!             .build(),
//!     )
//!     .build();
//! ```

use indexmap::IndexMap;
use smallvec::SmallVec;

/// One MARC record as found in the input document.
///
/// Data fields are kept in document order, since several classification
/// fields (notes, index terms, components) are order sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Leader text, exactly as found (not padded or validated)
    pub leader: Option<String>,
    /// Control fields (000-009) - tag -> value, preserves insertion order
    pub control_fields: IndexMap<String, String>,
    /// Data fields (010+) in document order
    pub fields: Vec<Field>,
}

/// A data field in a MARC record (fields 010 and higher)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field tag (3 characters)
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl RawRecord {
    /// Create an empty record without a leader
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for fluently constructing records
    #[must_use]
    pub fn builder() -> RawRecordBuilder {
        RawRecordBuilder {
            record: Self::new(),
        }
    }

    /// Set the leader text
    pub fn set_leader(&mut self, leader: impl Into<String>) {
        self.leader = Some(leader.into());
    }

    /// Add a control field (000-009). A repeated tag keeps the last value.
    pub fn add_control_field(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.control_fields.insert(tag.into(), value.into());
    }

    /// Get a control field value
    #[must_use]
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields.get(tag).map(String::as_str)
    }

    /// Add a data field
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Returns true if the record has neither leader nor fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leader.is_none() && self.control_fields.is_empty() && self.fields.is_empty()
    }
}

impl Field {
    /// Create a new field without subfields
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        Field {
            tag: tag.into(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for fluently constructing fields
    #[must_use]
    pub fn builder(tag: impl Into<String>, indicator1: char, indicator2: char) -> FieldBuilder {
        FieldBuilder {
            field: Field::new(tag, indicator1, indicator2),
        }
    }

    /// Add a subfield
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield {
            code,
            value: value.into(),
        });
    }

    /// Get the first value of a subfield
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.value.as_str())
    }

    /// Iterate over all values of a subfield code, in order
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |s| s.code == code)
            .map(|s| s.value.as_str())
    }
}

/// Builder for [`RawRecord`]
#[derive(Debug)]
pub struct RawRecordBuilder {
    record: RawRecord,
}

impl RawRecordBuilder {
    /// Set the leader text
    #[must_use]
    pub fn leader(mut self, leader: impl Into<String>) -> Self {
        self.record.set_leader(leader);
        self
    }

    /// Add a control field
    #[must_use]
    pub fn control_field(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.record.add_control_field(tag, value);
        self
    }

    /// Add a data field
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.add_field(field);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> RawRecord {
        self.record
    }
}

/// Builder for [`Field`]
#[derive(Debug)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Add a subfield
    #[must_use]
    pub fn subfield(mut self, code: char, value: impl Into<String>) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}
