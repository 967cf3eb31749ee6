//! MARC language codes to RDF language tags.
//!
//! MARC 21 uses three-letter bibliographic codes (ISO 639-2/B) in 040 `$b`.
//! RDF literals want the shortest BCP 47 tag, which for these languages is
//! the two-letter ISO 639-1 code.

/// Language tag used when a record does not declare its cataloging language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Convert a MARC language code to a BCP 47 language tag.
///
/// Codes without a two-letter equivalent in the table are returned
/// lower-cased, which is still a valid BCP 47 primary subtag.
///
/// # Examples
///
/// ```ignore
/// use marc2skos::language::marc_to_bcp47;
///
/// assert_eq!(marc_to_bcp47("nob"), "nb");
/// assert_eq!(marc_to_bcp47("GER"), "de");
/// assert_eq!(marc_to_bcp47("haw"), "haw");
/// ```
#[must_use]
pub fn marc_to_bcp47(code: &str) -> String {
    let code = code.trim().to_ascii_lowercase();
    let tag = match code.as_str() {
        "eng" => "en",
        "nor" => "no",
        "nob" => "nb",
        "nno" => "nn",
        "swe" => "sv",
        "dan" => "da",
        "fin" => "fi",
        "ice" | "isl" => "is",
        "ger" | "deu" => "de",
        "dut" | "nld" => "nl",
        "fre" | "fra" => "fr",
        "ita" => "it",
        "spa" => "es",
        "por" => "pt",
        "cat" => "ca",
        "rus" => "ru",
        "pol" => "pl",
        "cze" | "ces" => "cs",
        "hun" => "hu",
        "gre" | "ell" => "el",
        "heb" => "he",
        "ara" => "ar",
        "per" | "fas" => "fa",
        "tur" => "tr",
        "chi" | "zho" => "zh",
        "jpn" => "ja",
        "kor" => "ko",
        "vie" => "vi",
        "ind" => "id",
        "lit" => "lt",
        "lav" => "lv",
        "est" => "et",
        "ukr" => "uk",
        _ => return code,
    };
    tag.to_string()
}

/// Resolve the language tag of a record from its 040 `$b` value.
///
/// Falls back to [`DEFAULT_LANGUAGE`] when the value is absent or blank.
#[must_use]
pub fn record_language(code: Option<&str>) -> String {
    match code.map(str::trim) {
        Some(code) if !code.is_empty() => marc_to_bcp47(code),
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(marc_to_bcp47("eng"), "en");
        assert_eq!(marc_to_bcp47("nob"), "nb");
        assert_eq!(marc_to_bcp47("ger"), "de");
        assert_eq!(marc_to_bcp47("fre"), "fr");
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(marc_to_bcp47(" SWE "), "sv");
    }

    #[test]
    fn test_unknown_code_kept() {
        assert_eq!(marc_to_bcp47("haw"), "haw");
    }

    #[test]
    fn test_record_language_default() {
        assert_eq!(record_language(None), "en");
        assert_eq!(record_language(Some("  ")), "en");
        assert_eq!(record_language(Some("nno")), "nn");
    }
}
