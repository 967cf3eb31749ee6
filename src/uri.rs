//! Concept and scheme URI resolution.
//!
//! A record's URI is resolved by a chain of [`UriStrategy`] implementations,
//! tried in order until one produces a URI:
//!
//! 1. [`TemplateStrategy`]: an explicit template from the configuration
//! 2. [`RegistryStrategy`]: the built-in [`SchemeRegistry`], keyed by the
//!    scheme code in 084 `$a`
//!
//! Templates use two placeholders: `{object}` for the classification number
//! and `{edition}` for the edition from 084 `$c`. A template that needs a
//! value the record does not have produces no URI.
//!
//! # Examples
//!
//! ```ignore
//! use marc2skos::uri::{UriRequest, UriResolver};
//! use marc2skos::ConversionConfig;
//!
//! let resolver = UriResolver::from_config(&ConversionConfig::default());
//! let request = UriRequest::new("512").with_scheme("ddc", Some("23"));
//! assert_eq!(
//!     resolver.concept_uri(&request).as_deref(),
//!     Some("http://dewey.info/class/512/e23/")
//! );
//! ```

use std::fmt;

use crate::classification::RecordType;
use crate::config::ConversionConfig;

/// Placeholder for the classification number in URI templates.
pub const OBJECT_PLACEHOLDER: &str = "{object}";

/// Placeholder for the scheme edition in URI templates.
pub const EDITION_PLACEHOLDER: &str = "{edition}";

/// What to resolve: a classification number plus the scheme context of the
/// record it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriRequest<'a> {
    /// Classification number (table numbers as `table--number`)
    pub object: &'a str,
    /// Scheme code from 084 `$a`, lower-cased
    pub scheme_code: Option<&'a str>,
    /// Edition from 084 `$c`
    pub edition: Option<&'a str>,
}

impl<'a> UriRequest<'a> {
    /// Creates a request without scheme context.
    #[must_use]
    pub const fn new(object: &'a str) -> Self {
        Self {
            object,
            scheme_code: None,
            edition: None,
        }
    }

    /// Adds the scheme code and edition.
    #[must_use]
    pub const fn with_scheme(mut self, scheme_code: &'a str, edition: Option<&'a str>) -> Self {
        self.scheme_code = Some(scheme_code);
        self.edition = edition;
        self
    }

    /// Adds an optional scheme code and edition.
    #[must_use]
    pub const fn with_context(
        mut self,
        scheme_code: Option<&'a str>,
        edition: Option<&'a str>,
    ) -> Self {
        self.scheme_code = scheme_code;
        self.edition = edition;
        self
    }
}

/// One way of turning a classification number into a concept URI.
pub trait UriStrategy: fmt::Debug {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// The concept URI, or `None` if this strategy does not apply.
    fn concept_uri(&self, request: &UriRequest<'_>) -> Option<String>;
}

/// Resolves URIs from an explicit, configured template.
#[derive(Debug, Clone)]
pub struct TemplateStrategy {
    template: String,
}

impl TemplateStrategy {
    /// Creates a strategy for the given template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl UriStrategy for TemplateStrategy {
    fn name(&self) -> &'static str {
        "template"
    }

    fn concept_uri(&self, request: &UriRequest<'_>) -> Option<String> {
        expand_template(&self.template, Some(request.object), request.edition)
    }
}

/// A classification scheme the converter knows how to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownScheme {
    /// Code as found in 084 `$a` (lower case)
    pub code: &'static str,
    /// Template for concept URIs
    pub concept_template: &'static str,
    /// Template for the concept scheme URI
    pub scheme_template: &'static str,
}

/// Built-in schemes, matched against 084 `$a`.
pub const KNOWN_SCHEMES: &[KnownScheme] = &[
    KnownScheme {
        code: "ddc",
        concept_template: "http://dewey.info/class/{object}/e{edition}/",
        scheme_template: "http://dewey.info/scheme/edition/e{edition}/",
    },
    KnownScheme {
        code: "udc",
        concept_template: "http://udcdata.info/{object}",
        scheme_template: "http://udcdata.info/udc-schema",
    },
    KnownScheme {
        code: "bkl",
        concept_template: "http://uri.gbv.de/terminology/bk/{object}",
        scheme_template: "http://uri.gbv.de/terminology/bk/",
    },
];

/// Lookup table of known classification schemes.
#[derive(Debug, Clone)]
pub struct SchemeRegistry {
    schemes: Vec<KnownScheme>,
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SchemeRegistry {
    /// The registry of [`KNOWN_SCHEMES`].
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            schemes: KNOWN_SCHEMES.to_vec(),
        }
    }

    /// Registers an additional scheme; later registrations win.
    pub fn register(&mut self, scheme: KnownScheme) {
        self.schemes.insert(0, scheme);
    }

    /// Finds a scheme by code, ignoring case.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<&KnownScheme> {
        let code = code.trim();
        self.schemes
            .iter()
            .find(|scheme| scheme.code.eq_ignore_ascii_case(code))
    }
}

/// Resolves URIs by detecting the scheme from the record's 084 field.
#[derive(Debug, Clone, Default)]
pub struct RegistryStrategy {
    registry: SchemeRegistry,
}

impl RegistryStrategy {
    /// Creates a strategy backed by the given registry.
    #[must_use]
    pub const fn new(registry: SchemeRegistry) -> Self {
        Self { registry }
    }
}

impl UriStrategy for RegistryStrategy {
    fn name(&self) -> &'static str {
        "scheme registry"
    }

    fn concept_uri(&self, request: &UriRequest<'_>) -> Option<String> {
        let scheme = self.registry.lookup(request.scheme_code?)?;
        expand_template(scheme.concept_template, Some(request.object), request.edition)
    }
}

/// Ordered chain of URI strategies plus the scheme URI policy.
#[derive(Debug)]
pub struct UriResolver {
    strategies: Vec<Box<dyn UriStrategy>>,
    registry: SchemeRegistry,
    scheme_uri: Option<String>,
    table_scheme_uri: Option<String>,
}

impl UriResolver {
    /// Builds the resolver chain from the configuration.
    ///
    /// A configured `base_uri` takes precedence over scheme detection.
    #[must_use]
    pub fn from_config(config: &ConversionConfig) -> Self {
        let registry = SchemeRegistry::builtin();
        let mut strategies: Vec<Box<dyn UriStrategy>> = Vec::new();
        if let Some(template) = &config.base_uri {
            strategies.push(Box::new(TemplateStrategy::new(template.clone())));
        }
        strategies.push(Box::new(RegistryStrategy::new(registry.clone())));

        Self {
            strategies,
            registry,
            scheme_uri: config.scheme_uri.clone(),
            table_scheme_uri: config.table_scheme_uri.clone(),
        }
    }

    /// Resolves a concept URI; the first strategy that matches wins.
    #[must_use]
    pub fn concept_uri(&self, request: &UriRequest<'_>) -> Option<String> {
        self.strategies.iter().find_map(|strategy| {
            let uri = strategy.concept_uri(request);
            if let Some(uri) = &uri {
                tracing::trace!(strategy = strategy.name(), %uri, "resolved concept URI");
            }
            uri
        })
    }

    /// The concept scheme(s) a record belongs to.
    ///
    /// Classification records belong to the configured scheme, or to the
    /// scheme detected from 084. Table records belong to the table scheme
    /// (when configured), else to that same main scheme. At most one URI is
    /// returned either way.
    #[must_use]
    pub fn scheme_uris(
        &self,
        record_type: RecordType,
        scheme_code: Option<&str>,
        edition: Option<&str>,
    ) -> Vec<String> {
        let main = || {
            match &self.scheme_uri {
                Some(template) => expand_template(template, None, edition),
                None => scheme_code
                    .and_then(|code| self.registry.lookup(code))
                    .and_then(|scheme| expand_template(scheme.scheme_template, None, edition)),
            }
        };

        let uri = match record_type {
            RecordType::Classification => main(),
            RecordType::Table => self
                .table_scheme_uri
                .as_deref()
                .and_then(|template| expand_template(template, None, edition))
                .or_else(main),
        };
        uri.into_iter().collect()
    }
}

/// Fill in a URI template.
///
/// Returns `None` when the template contains a placeholder whose value is
/// missing. The object is escaped for use inside an IRI.
#[must_use]
pub fn expand_template(template: &str, object: Option<&str>, edition: Option<&str>) -> Option<String> {
    let mut uri = template.to_string();
    if uri.contains(OBJECT_PLACEHOLDER) {
        uri = uri.replace(OBJECT_PLACEHOLDER, &escape_iri_component(object?));
    }
    if uri.contains(EDITION_PLACEHOLDER) {
        uri = uri.replace(EDITION_PLACEHOLDER, &escape_iri_component(edition?));
    }
    Some(uri)
}

/// Percent-encode characters that may not appear in an IRI.
#[must_use]
pub fn escape_iri_component(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.trim().chars() {
        match ch {
            ' ' | '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`' => {
                escaped.push_str(&format!("%{:02X}", u32::from(ch)));
            },
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    escaped.push_str(&format!("%{byte:02X}"));
                }
            },
            c => escaped.push(c),
        }
    }
    escaped
}
