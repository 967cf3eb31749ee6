//! Streaming MARCXML reader.
//!
//! [`MarcXmlStream`] walks a MARCXML document with a `quick_xml` event
//! reader and yields one [`RawRecord`] per `record` element, so memory use
//! stays bounded by the largest record rather than the document.
//!
//! Records are recognized in the MARCXML namespace
//! (<https://www.loc.gov/standards/marcxml/>) in both default-namespace
//! (`<record xmlns="...">`) and prefix-namespace (`<marc:record>`) form.
//! Records without any namespace are accepted too; records in another
//! namespace are skipped.
//!
//! # Examples
//!
//! ```ignore
//! use marc2skos::MarcXmlStream;
//!
//! let xml = r#"<collection xmlns="http://www.loc.gov/MARC21/slim">
//!   <record><leader>00000nw  a2200000n  4500</leader></record>
//! </collection>"#;
//!
//! for record in MarcXmlStream::new(xml.as_bytes()) {
//!     println!("{:?}", record?.leader);
//! }
//! ```

use std::io::BufRead;
use std::time::Instant;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::{Result, SkosError};
use crate::record::{Field, RawRecord};

/// The MARCXML namespace URI.
pub const MARCXML_NS: &str = "http://www.loc.gov/MARC21/slim";

/// Number of records between progress log lines.
pub const PROGRESS_INTERVAL: usize = 500;

/// Where character data inside a record goes.
enum TextTarget {
    None,
    Leader,
    Control(String),
    Subfield(char),
}

/// Outcome of one event outside a record.
enum Step {
    Record,
    EmptyRecord,
    Open,
    Close,
    Leaf,
    Eof,
    Skip,
    Error(String),
}

/// Iterator over the records of a MARCXML document.
///
/// Yields `Err(SkosError::Xml)` once if the document is malformed and then
/// ends. A document that ends before its root element is closed, or that
/// has no root element at all, is malformed. Record content is not
/// validated here.
pub struct MarcXmlStream<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    count: usize,
    /// Elements opened and not yet closed, outside records
    depth: usize,
    root_seen: bool,
    started: Instant,
    finished: bool,
}

impl<R: BufRead> std::fmt::Debug for MarcXmlStream<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarcXmlStream")
            .field("count", &self.count)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<R: BufRead> MarcXmlStream<R> {
    /// Creates a stream over a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: NsReader::from_reader(reader),
            buf: Vec::new(),
            count: 0,
            depth: 0,
            root_seen: false,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Number of records read so far.
    #[must_use]
    pub const fn records_read(&self) -> usize {
        self.count
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>> {
        loop {
            self.buf.clear();
            let step = match self.reader.read_resolved_event_into(&mut self.buf) {
                Ok((ns, Event::Start(e))) if is_marc_record(&ns, &e) => Step::Record,
                Ok((ns, Event::Empty(e))) if is_marc_record(&ns, &e) => Step::EmptyRecord,
                Ok((_, Event::Start(_))) => Step::Open,
                Ok((_, Event::End(_))) => Step::Close,
                Ok((_, Event::Empty(_))) => Step::Leaf,
                Ok((_, Event::Eof)) => Step::Eof,
                Ok(_) => Step::Skip,
                Err(e) => Step::Error(e.to_string()),
            };
            match step {
                Step::Record => {
                    self.root_seen = true;
                    return read_record(&mut self.reader, &mut self.buf).map(Some);
                },
                Step::EmptyRecord => {
                    self.root_seen = true;
                    return Ok(Some(RawRecord::new()));
                },
                Step::Open => {
                    self.root_seen = true;
                    self.depth += 1;
                },
                Step::Close => self.depth = self.depth.saturating_sub(1),
                Step::Leaf => self.root_seen = true,
                Step::Eof if !self.root_seen => return Err(self.error("no root element")),
                Step::Eof if self.depth > 0 => {
                    let message = format!("unexpected end of input: {} unclosed element(s)", self.depth);
                    return Err(self.error(message));
                },
                Step::Eof => return Ok(None),
                Step::Skip => {},
                Step::Error(message) => return Err(self.error(message)),
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> SkosError {
        SkosError::Xml {
            position: self.reader.buffer_position(),
            message: message.into(),
        }
    }

    fn log_progress(&self) {
        if self.count % PROGRESS_INTERVAL == 0 {
            #[allow(clippy::cast_precision_loss)]
            let rate = self.count as f64 / self.started.elapsed().as_secs_f64().max(f64::EPSILON);
            tracing::info!("Read {} records ({:.0} recs/sec)", self.count, rate);
        }
    }
}

impl<R: BufRead> Iterator for MarcXmlStream<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => {
                self.count += 1;
                self.log_progress();
                Some(Ok(record))
            },
            Ok(None) => {
                self.finished = true;
                None
            },
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            },
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for MarcXmlStream<R> {}

fn is_marc_record(ns: &ResolveResult<'_>, element: &BytesStart<'_>) -> bool {
    if element.local_name().as_ref() != b"record" {
        return false;
    }
    match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == MARCXML_NS.as_bytes(),
        ResolveResult::Unbound => true,
        ResolveResult::Unknown(_) => false,
    }
}

fn xml_error<R>(reader: &NsReader<R>, error: &quick_xml::Error) -> SkosError {
    SkosError::Xml {
        position: reader.buffer_position(),
        message: error.to_string(),
    }
}

/// Value of an attribute, unescaped.
fn attribute<R>(reader: &NsReader<R>, element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| xml_error(reader, &e.into()))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr.unescape_value().map_err(|e| xml_error(reader, &e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn first_char(value: Option<&str>) -> Option<char> {
    value.and_then(|v| v.chars().next())
}

fn data_field<R>(reader: &NsReader<R>, element: &BytesStart<'_>) -> Result<Field> {
    let tag = attribute(reader, element, b"tag")?.unwrap_or_default();
    let ind1 = first_char(attribute(reader, element, b"ind1")?.as_deref()).unwrap_or(' ');
    let ind2 = first_char(attribute(reader, element, b"ind2")?.as_deref()).unwrap_or(' ');
    Ok(Field::new(tag, ind1, ind2))
}

/// Read the content of a `record` element whose start tag was just
/// consumed, up to and including its end tag.
fn read_record<R: BufRead>(reader: &mut NsReader<R>, buf: &mut Vec<u8>) -> Result<RawRecord> {
    let mut record = RawRecord::new();
    let mut field: Option<Field> = None;
    let mut target = TextTarget::None;
    let mut text = String::new();

    loop {
        buf.clear();
        let event = reader
            .read_event_into(buf)
            .map_err(|e| xml_error(reader, &e))?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"leader" => {
                    target = TextTarget::Leader;
                    text.clear();
                },
                b"controlfield" => {
                    let tag = attribute(reader, &e, b"tag")?.unwrap_or_default();
                    target = TextTarget::Control(tag);
                    text.clear();
                },
                b"datafield" => field = Some(data_field(reader, &e)?),
                b"subfield" => {
                    target = match first_char(attribute(reader, &e, b"code")?.as_deref()) {
                        Some(code) => TextTarget::Subfield(code),
                        None => TextTarget::None,
                    };
                    text.clear();
                },
                _ => {},
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"leader" => record.set_leader(""),
                b"controlfield" => {
                    let tag = attribute(reader, &e, b"tag")?.unwrap_or_default();
                    record.add_control_field(tag, "");
                },
                b"datafield" => record.add_field(data_field(reader, &e)?),
                b"subfield" => {
                    let code = first_char(attribute(reader, &e, b"code")?.as_deref());
                    if let (Some(code), Some(field)) = (code, field.as_mut()) {
                        field.add_subfield(code, "");
                    }
                },
                _ => {},
            },
            Event::Text(e) => {
                if !matches!(target, TextTarget::None) {
                    let unescaped = e.unescape().map_err(|err| xml_error(reader, &err))?;
                    text.push_str(&unescaped);
                }
            },
            Event::CData(e) => {
                if !matches!(target, TextTarget::None) {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"leader" | b"controlfield" | b"subfield" => {
                    match std::mem::replace(&mut target, TextTarget::None) {
                        TextTarget::Leader => record.set_leader(std::mem::take(&mut text)),
                        TextTarget::Control(tag) => {
                            record.add_control_field(tag, std::mem::take(&mut text));
                        },
                        TextTarget::Subfield(code) => {
                            if let Some(field) = field.as_mut() {
                                field.add_subfield(code, std::mem::take(&mut text));
                            }
                        },
                        TextTarget::None => {},
                    }
                },
                b"datafield" => {
                    if let Some(field) = field.take() {
                        record.add_field(field);
                    }
                },
                b"record" => return Ok(record),
                _ => {},
            },
            Event::Eof => {
                return Err(SkosError::Xml {
                    position: reader.buffer_position(),
                    message: "unexpected end of input inside record".into(),
                });
            },
            _ => {},
        }
    }
}
