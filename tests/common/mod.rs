//! Common test helpers: a small MARCXML fixture builder.

#![allow(dead_code)]

use marc2skos::{ConversionConfig, ConversionOutcome, Converter};

/// Leader of a new classification record.
pub const CLASSIFICATION_LEADER: &str = "00000nw  a2200000n  4500";

/// Leader of an authority record (leader/06 = 'z').
pub const AUTHORITY_LEADER: &str = "00000nz  a2200000n  4500";

/// One `<record>` element under construction.
#[derive(Debug, Clone, Default)]
pub struct XmlRecord {
    leader: Option<String>,
    controls: Vec<(String, String)>,
    fields: Vec<(String, Vec<(char, String)>)>,
}

impl XmlRecord {
    /// A record with a classification leader and nothing else.
    pub fn classification() -> Self {
        Self::default().leader(CLASSIFICATION_LEADER)
    }

    pub fn leader(mut self, leader: &str) -> Self {
        self.leader = Some(leader.to_string());
        self
    }

    pub fn control(mut self, tag: &str, value: &str) -> Self {
        self.controls.push((tag.to_string(), value.to_string()));
        self
    }

    pub fn field(mut self, tag: &str, subfields: &[(char, &str)]) -> Self {
        self.fields.push((
            tag.to_string(),
            subfields
                .iter()
                .map(|(code, value)| (*code, (*value).to_string()))
                .collect(),
        ));
        self
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from("  <record>\n");
        if let Some(leader) = &self.leader {
            xml.push_str(&format!("    <leader>{}</leader>\n", escape(leader)));
        }
        for (tag, value) in &self.controls {
            xml.push_str(&format!(
                "    <controlfield tag=\"{tag}\">{}</controlfield>\n",
                escape(value)
            ));
        }
        for (tag, subfields) in &self.fields {
            xml.push_str(&format!("    <datafield tag=\"{tag}\" ind1=\" \" ind2=\" \">\n"));
            for (code, value) in subfields {
                xml.push_str(&format!(
                    "      <subfield code=\"{code}\">{}</subfield>\n",
                    escape(value)
                ));
            }
            xml.push_str("    </datafield>\n");
        }
        xml.push_str("  </record>\n");
        xml
    }
}

/// Escape text for XML element content.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wrap records in a namespaced `<collection>`.
pub fn collection(records: &[XmlRecord]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<collection xmlns=\"http://www.loc.gov/MARC21/slim\">\n",
    );
    for record in records {
        xml.push_str(&record.to_xml());
    }
    xml.push_str("</collection>\n");
    xml
}

/// A DDC 23 schedule record (English) with a caption.
pub fn ddc_record(number: &str, caption: &str) -> XmlRecord {
    XmlRecord::classification()
        .control("008", "091203aaaaaaaa")
        .field("040", &[('a', "OCoLC"), ('b', "eng")])
        .field("084", &[('a', "ddc"), ('c', "23")])
        .field("153", &[('a', number), ('j', caption)])
}

/// A DDC 23 table record.
pub fn ddc_table_record(table: &str, number: &str, caption: &str) -> XmlRecord {
    XmlRecord::classification()
        .control("008", "091203baaaaaaa")
        .field("040", &[('a', "OCoLC"), ('b', "eng")])
        .field("084", &[('a', "ddc"), ('c', "23")])
        .field("153", &[('z', table), ('a', number), ('j', caption)])
}

/// Convert a MARCXML string.
pub fn convert(xml: &str, config: ConversionConfig) -> ConversionOutcome {
    Converter::new(config)
        .convert_reader(xml.as_bytes())
        .expect("conversion failed")
}

/// Number of statements with the given predicate.
pub fn count_predicate(outcome: &ConversionOutcome, predicate: &str) -> usize {
    outcome
        .graph
        .triples()
        .filter(|t| t.predicate == predicate)
        .count()
}

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const SKOS_NOTATION: &str = "http://www.w3.org/2004/02/skos/core#notation";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
pub const SKOS_TOP_CONCEPT_OF: &str = "http://www.w3.org/2004/02/skos/core#topConceptOf";
pub const MADS_COMPONENT_LIST: &str = "http://www.loc.gov/mads/rdf/v1#componentList";
