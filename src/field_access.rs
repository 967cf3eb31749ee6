//! Tag-based field access over a single record.
//!
//! This module defines the [`FieldAccessor`] trait, the only way the
//! normalizer reads a record. Lookups are by tag and optional subfield code;
//! a missing field is `None` or an empty list, never an error.

use crate::record::{Field, RawRecord};

/// Read-only, tag-based view over one MARC record.
///
/// Implementors supply the leader, control fields and data fields by tag;
/// [`first_value`](FieldAccessor::first_value) and
/// [`all_values`](FieldAccessor::all_values) are derived from those.
///
/// # Examples
///
/// ```ignore
/// use marc2skos::{FieldAccessor, RawRecord, Field};
///
/// let record = RawRecord::builder()
///     .field(Field::builder("040", ' ', ' ').subfield('b', "nob").build())
///     .build();
///
/// assert_eq!(record.first_value("040", Some('b')), Some("nob"));
/// assert_eq!(record.first_value("084", Some('a')), None);
/// ```
pub trait FieldAccessor {
    /// The leader text, if the record has one.
    fn leader(&self) -> Option<&str>;

    /// The value of a control field (000-009).
    fn control_value(&self, tag: &str) -> Option<&str>;

    /// All data fields with the given tag, in document order.
    fn fields<'s>(&'s self, tag: &str) -> Box<dyn Iterator<Item = &'s Field> + 's>;

    /// First value for a tag.
    ///
    /// With `code = None`, a control field value is returned if present,
    /// otherwise the first subfield of the first matching data field.
    fn first_value<'s>(&'s self, tag: &str, code: Option<char>) -> Option<&'s str> {
        if code.is_none() {
            if let Some(value) = self.control_value(tag) {
                return Some(value);
            }
        }
        self.fields(tag)
            .flat_map(|field| field.subfields.iter())
            .find(|subfield| code.map_or(true, |c| subfield.code == c))
            .map(|subfield| subfield.value.as_str())
    }

    /// Every value for a tag (and subfield code), in document order.
    fn all_values<'s>(&'s self, tag: &str, code: Option<char>) -> Vec<&'s str> {
        if code.is_none() {
            if let Some(value) = self.control_value(tag) {
                return vec![value];
            }
        }
        self.fields(tag)
            .flat_map(|field| field.subfields.iter())
            .filter(|subfield| code.map_or(true, |c| subfield.code == c))
            .map(|subfield| subfield.value.as_str())
            .collect()
    }
}

impl FieldAccessor for RawRecord {
    fn leader(&self) -> Option<&str> {
        self.leader.as_deref()
    }

    fn control_value(&self, tag: &str) -> Option<&str> {
        self.get_control_field(tag)
    }

    fn fields<'s>(&'s self, tag: &str) -> Box<dyn Iterator<Item = &'s Field> + 's> {
        let tag = tag.to_string();
        Box::new(self.fields.iter().filter(move |field| field.tag == tag))
    }
}
