//! MARC 21 Classification record normalization.
//!
//! This module turns a raw record into a [`NormalizedRecord`]: the flat set
//! of attributes the SKOS graph builder needs. It is the only place that
//! knows which MARC fields carry what.
//!
//! # Field mapping
//!
//! | Field | Attribute |
//! |-------|-----------|
//! | Leader/05 | deprecated (`d`, `s`, `x`) |
//! | Leader/06 | must be `w` |
//! | 005 | modified |
//! | 008/00-05 | created |
//! | 008/06 | record type (`b` = table) |
//! | 040 `$b` | language |
//! | 084 `$a`, `$c` | scheme code, edition |
//! | 153 | notation, caption, broader, visibility |
//! | 253, 353, 683, 684 | editorial notes |
//! | 680 | scope notes, definitions, WebDewey extras |
//! | 685 | history notes |
//! | 7XX | index terms |
//! | 765 | synthesized number components |

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexSet;
use unicode_normalization::UnicodeNormalization;

use crate::config::ConversionConfig;
use crate::error::Result;
use crate::field_access::FieldAccessor;
use crate::language::record_language;
use crate::leader::ClassificationLeader;
use crate::record::Field;
use crate::uri::{UriRequest, UriResolver};

/// Tags of the index term fields (7XX).
pub const INDEX_TERM_TAGS: &[&str] = &[
    "700", "710", "711", "730", "748", "750", "751", "753", "754",
];

/// Subfield codes that carry control data rather than display text.
const CONTROL_SUBFIELDS: &[char] = &['0', '2', '5', '6', '8', '9'];

/// Subdivision codes of index terms, joined with `--`.
const SUBDIVISION_SUBFIELDS: &[char] = &['v', 'x', 'y', 'z'];

/// Separator between a table number and the number within the table.
pub const TABLE_SEPARATOR: &str = "--";

/// Kind of classification record (008/06).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordType {
    /// a - Schedule record
    #[default]
    Classification,
    /// b - Table record
    Table,
}

/// A classification record reduced to what goes into the SKOS graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedRecord {
    /// Concept URI; `None` means the record cannot be published
    pub uri: Option<String>,
    /// Schedule or table record
    pub record_type: RecordType,
    /// Classification number (`table--number` for table records)
    pub notation: Option<String>,
    /// Concept scheme memberships
    pub scheme_uris: Vec<String>,
    /// True when no broader concept was resolved
    pub is_top_concept: bool,
    /// Caption (153 `$j`)
    pub pref_label: Option<String>,
    /// Language tag for all literals of the record
    pub lang: String,
    /// Index terms (7XX)
    pub alt_labels: Vec<String>,
    /// Parent concept URIs
    pub broader: Vec<String>,
    /// Definitions (680 with `ess=ndf`)
    pub definition: Vec<String>,
    /// Editorial notes (253, 353, 683, 684)
    pub editorial_note: Vec<String>,
    /// Scope notes (680)
    pub scope_note: Vec<String>,
    /// History notes (685)
    pub history_note: Vec<String>,
    /// Deleted number
    pub deprecated: bool,
    /// Synthesized number components (765), in order
    pub components: Vec<String>,
    /// WebDewey annotations keyed by property local name
    pub extras: BTreeMap<String, String>,
    /// Date entered on file (008/00-05)
    pub created: Option<NaiveDate>,
    /// Date of latest transaction (005)
    pub modified: Option<NaiveDate>,
    /// Cleared when 153 `$9` carries a suppression marker
    pub public: bool,
    /// Scheme code from 084 `$a`
    pub scheme_code: Option<String>,
    /// Edition from 084 `$c`
    pub edition: Option<String>,
}

impl NormalizedRecord {
    /// Returns true if the record may be published.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.public
    }

    /// A URI request for another number in this record's scheme.
    #[must_use]
    pub fn uri_request<'a>(&'a self, object: &'a str) -> UriRequest<'a> {
        UriRequest::new(object).with_context(self.scheme_code.as_deref(), self.edition.as_deref())
    }
}

/// One hierarchy entry of a 153 field (`$e`, optional `$f`).
#[derive(Debug, Clone, PartialEq, Eq)]
struct HierarchyEntry {
    table: Option<String>,
    start: String,
    end: Option<String>,
}

/// Parsed 153 field.
#[derive(Debug, Default)]
struct Heading {
    table: Option<String>,
    number: Option<String>,
    end: Option<String>,
    hierarchy: Vec<HierarchyEntry>,
    captions: Vec<String>,
    markers: Vec<String>,
}

impl Heading {
    fn parse(field: &Field) -> Self {
        let mut heading = Heading::default();
        let mut current_table: Option<String> = None;

        for subfield in &field.subfields {
            let value = subfield.value.trim();
            if value.is_empty() {
                continue;
            }
            match subfield.code {
                'z' => {
                    if heading.number.is_none() {
                        heading.table = Some(value.to_string());
                    }
                    current_table = Some(value.to_string());
                },
                'a' if heading.number.is_none() => heading.number = Some(value.to_string()),
                'c' if heading.number.is_some() && heading.hierarchy.is_empty() => {
                    heading.end.get_or_insert_with(|| value.to_string());
                },
                'e' => heading.hierarchy.push(HierarchyEntry {
                    table: current_table.clone(),
                    start: value.to_string(),
                    end: None,
                }),
                'f' => {
                    if let Some(entry) = heading.hierarchy.last_mut() {
                        entry.end.get_or_insert_with(|| value.to_string());
                    }
                },
                'j' => heading.captions.push(clean_text(value)),
                '9' => heading.markers.push(value.to_string()),
                _ => {},
            }
        }
        heading
    }

    fn notation(&self) -> Option<String> {
        self.number
            .as_deref()
            .map(|number| format_number(self.table.as_deref(), number, self.end.as_deref()))
    }

    /// The direct parent: the last hierarchy entry.
    fn parent(&self) -> Option<String> {
        self.hierarchy.last().map(|entry| {
            format_number(entry.table.as_deref(), &entry.start, entry.end.as_deref())
        })
    }
}

/// Build a classification number from its parts.
///
/// Spans are written `start-end`; table numbers are prefixed with the table
/// identification and `--`.
///
/// # Examples
///
/// ```ignore
/// use marc2skos::classification::format_number;
///
/// assert_eq!(format_number(None, "512", None), "512");
/// assert_eq!(format_number(None, "512.1", Some("512.9")), "512.1-512.9");
/// assert_eq!(format_number(Some("1"), "0901", None), "1--0901");
/// ```
#[must_use]
pub fn format_number(table: Option<&str>, start: &str, end: Option<&str>) -> String {
    let number = match end {
        Some(end) => format!("{start}-{end}"),
        None => start.to_string(),
    };
    match table {
        Some(table) => format!("{table}{TABLE_SEPARATOR}{number}"),
        None => number,
    }
}

/// Trim and NFC-normalize a text value.
fn clean_text(value: &str) -> String {
    value.trim().nfc().collect()
}

/// Display text of a note field: all non-control subfields, space separated.
fn note_text(field: &Field) -> Option<String> {
    let parts: Vec<String> = field
        .subfields
        .iter()
        .filter(|s| !CONTROL_SUBFIELDS.contains(&s.code))
        .map(|s| clean_text(&s.value))
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Index term text: main subfields joined with spaces, subdivisions with `--`.
fn index_term(field: &Field) -> Option<String> {
    let mut main: Vec<String> = Vec::new();
    let mut subdivisions: Vec<String> = Vec::new();

    for subfield in &field.subfields {
        if CONTROL_SUBFIELDS.contains(&subfield.code) || subfield.code == 'w' {
            continue;
        }
        let value = clean_text(&subfield.value);
        if value.is_empty() {
            continue;
        }
        if SUBDIVISION_SUBFIELDS.contains(&subfield.code) {
            subdivisions.push(value);
        } else {
            main.push(value);
        }
    }

    if main.is_empty() {
        return None;
    }
    let mut term = main.join(" ");
    for subdivision in subdivisions {
        term.push_str(TABLE_SEPARATOR);
        term.push_str(&subdivision);
    }
    Some(term)
}

/// Component numbers of a 765 field, in subfield order.
///
/// `$b` (base number) is taken as-is; `$t` (digits from a table) is
/// qualified by the most recent `$z` (table identification).
fn component_numbers(field: &Field) -> Vec<String> {
    let mut components = Vec::new();
    let mut table: Option<&str> = None;

    for subfield in &field.subfields {
        let value = subfield.value.trim();
        if value.is_empty() {
            continue;
        }
        match subfield.code {
            'b' => components.push(value.to_string()),
            'z' => table = Some(value),
            't' => components.push(format_number(table, value, None)),
            _ => {},
        }
    }
    components
}

/// Where a 680 note goes, from its `$9 ess=` code.
enum NoteTarget {
    Definition,
    Scope,
    Extra(&'static str),
}

fn classify_680(field: &Field) -> NoteTarget {
    let code = field
        .subfields_by_code('9')
        .find_map(|value| value.trim().strip_prefix("ess="));
    match code {
        Some("ndf") => NoteTarget::Definition,
        Some("nch") => NoteTarget::Extra("classHere"),
        Some("nin") => NoteTarget::Extra("including"),
        Some("nvn") => NoteTarget::Extra("variantName"),
        _ => NoteTarget::Scope,
    }
}

/// Date entered on file, 008/00-05 (`yymmdd`).
fn parse_created(f008: &str) -> Option<NaiveDate> {
    let date: String = f008.chars().take(6).collect();
    NaiveDate::parse_from_str(&date, "%y%m%d").ok()
}

/// Date of latest transaction, 005 (`yyyymmddhhmmss.f`).
fn parse_modified(f005: &str) -> Option<NaiveDate> {
    let date: String = f005.trim().chars().take(8).collect();
    NaiveDate::parse_from_str(&date, "%Y%m%d").ok()
}

/// Converts raw records into [`NormalizedRecord`]s.
///
/// Holds the run-wide configuration and URI resolver; one instance is
/// reused for every record of a run.
#[derive(Debug)]
pub struct ClassificationNormalizer<'a> {
    config: &'a ConversionConfig,
    resolver: &'a UriResolver,
}

impl<'a> ClassificationNormalizer<'a> {
    /// Creates a normalizer.
    #[must_use]
    pub const fn new(config: &'a ConversionConfig, resolver: &'a UriResolver) -> Self {
        Self { config, resolver }
    }

    /// Validate and normalize one record.
    ///
    /// Missing fields give empty or absent attributes; only the leader can
    /// make a record invalid. An unresolvable URI is not an error: the
    /// returned record has `uri == None`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SkosError::InvalidLeader`] if the leader is missing
    /// or shorter than 7 characters, and [`crate::SkosError::InvalidRecord`]
    /// if leader/06 is not `w`.
    pub fn normalize<R: FieldAccessor + ?Sized>(&self, record: &R) -> Result<NormalizedRecord> {
        let leader = ClassificationLeader::from_record_leader(record.leader())?;

        let mut normalized = NormalizedRecord {
            deprecated: leader.is_deleted(),
            public: true,
            lang: record_language(record.first_value("040", Some('b'))),
            ..NormalizedRecord::default()
        };

        let f008 = record.control_value("008");
        normalized.created = f008.and_then(parse_created);
        normalized.modified = record.control_value("005").and_then(parse_modified);

        normalized.scheme_code = record
            .first_value("084", Some('a'))
            .map(|code| code.trim().to_ascii_lowercase())
            .filter(|code| !code.is_empty());
        normalized.edition = record
            .first_value("084", Some('c'))
            .and_then(|edition| edition.split('/').next())
            .map(str::trim)
            .filter(|edition| !edition.is_empty())
            .map(String::from);

        let heading = record.fields("153").next().map(Heading::parse);
        normalized.record_type = match f008.and_then(|f| f.chars().nth(6)) {
            Some('b') => RecordType::Table,
            Some(_) => RecordType::Classification,
            None if heading.as_ref().is_some_and(|h| h.table.is_some()) => RecordType::Table,
            None => RecordType::Classification,
        };

        if let Some(heading) = &heading {
            self.apply_heading(&mut normalized, heading);
        } else {
            normalized.is_top_concept = true;
        }

        if self.config.include_index_terms {
            normalized.alt_labels = Self::index_terms(record);
        }
        self.collect_notes(&mut normalized, record);
        if self.config.include_components {
            normalized.components = record.fields("765").flat_map(component_numbers).collect();
        }

        normalized.scheme_uris = self
            .resolver
            .scheme_uris(
                normalized.record_type,
                normalized.scheme_code.as_deref(),
                normalized.edition.as_deref(),
            )
            .into_iter()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        normalized.uri = normalized.notation.as_deref().and_then(|notation| {
            self.resolver
                .concept_uri(&normalized.uri_request(notation))
        });

        Ok(normalized)
    }

    fn apply_heading(&self, normalized: &mut NormalizedRecord, heading: &Heading) {
        normalized.notation = heading.notation();
        normalized.pref_label = heading.captions.first().cloned();

        if let Some(parent) = heading.parent() {
            let uri = self.resolver.concept_uri(&normalized.uri_request(&parent));
            match uri {
                Some(uri) => normalized.broader.push(uri),
                None => tracing::debug!(%parent, "no URI for broader concept"),
            }
        }
        normalized.is_top_concept = normalized.broader.is_empty();

        normalized.public = !heading
            .markers
            .iter()
            .any(|marker| self.config.suppression_markers.iter().any(|m| m == marker));
    }

    fn index_terms<R: FieldAccessor + ?Sized>(record: &R) -> Vec<String> {
        let terms: IndexSet<String> = INDEX_TERM_TAGS
            .iter()
            .flat_map(|tag| record.fields(tag))
            .filter_map(index_term)
            .collect();
        terms.into_iter().collect()
    }

    fn collect_notes<R: FieldAccessor + ?Sized>(&self, normalized: &mut NormalizedRecord, record: &R) {
        for field in record.fields("680") {
            let Some(text) = note_text(field) else {
                continue;
            };
            match classify_680(field) {
                NoteTarget::Definition => normalized.definition.push(text),
                NoteTarget::Scope => normalized.scope_note.push(text),
                NoteTarget::Extra(key) => {
                    normalized
                        .extras
                        .entry(key.to_string())
                        .and_modify(|existing| {
                            existing.push_str("; ");
                            existing.push_str(&text);
                        })
                        .or_insert(text);
                },
            }
        }

        for tag in ["253", "353", "683", "684"] {
            normalized
                .editorial_note
                .extend(record.fields(tag).filter_map(note_text));
        }
        normalized
            .history_note
            .extend(record.fields("685").filter_map(note_text));

        if !self.config.include_notes {
            normalized.definition.clear();
            normalized.scope_note.clear();
            normalized.editorial_note.clear();
            normalized.history_note.clear();
        }
    }
}
