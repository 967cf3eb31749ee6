//! Sort keys for classification numbers.
//!
//! Turtle output lists concepts in classification order rather than IRI
//! order. Table numbers (`1--0901`, `T1--0901`) sort as `T{table}--{number}`,
//! schedule numbers (`512.1`) as `A{number}`, so every schedule concept comes
//! before every table concept. Anything else sorts by its IRI.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TABLE_NOTATION: Regex =
        Regex::new(r"^T?([0-9A-Z-]+)--([0-9.;:-]+)$").expect("valid table notation pattern");
    static ref SCHEDULE_NOTATION: Regex =
        Regex::new(r"^([0-9.;:-]+)$").expect("valid schedule notation pattern");
    static ref TABLE_PATH: Regex =
        Regex::new(r"/([0-9A-Z-]+)--([0-9.;:-]+)/e").expect("valid table path pattern");
    static ref SCHEDULE_PATH: Regex =
        Regex::new(r"/([0-9.;:-]+)/e").expect("valid schedule path pattern");
}

fn table_key(table: &str, number: &str) -> String {
    format!("T{table}--{number}")
}

fn schedule_key(number: &str) -> String {
    format!("A{number}")
}

/// Collation key of a notation, or `None` if it is not a classification
/// number.
///
/// # Examples
///
/// ```ignore
/// use marc2skos::output::collation::notation_sort_key;
///
/// assert_eq!(notation_sort_key("512").as_deref(), Some("A512"));
/// assert_eq!(notation_sort_key("512--1").as_deref(), Some("T512--1"));
/// assert_eq!(notation_sort_key("T1--0901").as_deref(), Some("T1--0901"));
/// assert_eq!(notation_sort_key("Algebra"), None);
/// ```
#[must_use]
pub fn notation_sort_key(notation: &str) -> Option<String> {
    let notation = notation.trim();
    if let Some(caps) = TABLE_NOTATION.captures(notation) {
        return Some(table_key(&caps[1], &caps[2]));
    }
    SCHEDULE_NOTATION
        .captures(notation)
        .map(|caps| schedule_key(&caps[1]))
}

/// Collation key of an IRI whose path carries the number (`/512/e23/`).
fn iri_sort_key(iri: &str) -> Option<String> {
    if let Some(caps) = TABLE_PATH.captures(iri) {
        return Some(table_key(&caps[1], &caps[2]));
    }
    SCHEDULE_PATH.captures(iri).map(|caps| schedule_key(&caps[1]))
}

/// Collation key of a subject: its notation if it has one, else a number
/// found in its IRI, else the IRI itself.
#[must_use]
pub fn subject_sort_key(iri: &str, notation: Option<&str>) -> String {
    notation
        .and_then(notation_sort_key)
        .or_else(|| iri_sort_key(iri))
        .unwrap_or_else(|| iri.to_string())
}
