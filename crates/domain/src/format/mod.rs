//! USPS-style address normalization: uppercase, punctuation stripping,
//! whole-word abbreviation substitution, and whitespace collapsing.
//!
//! Every function here is pure and total over arbitrary string input; a line
//! of nothing but whitespace or punctuation normalizes to an empty string
//! rather than an error.

use crate::model::{AddressRecord, FormattedAddress};

/// USPS Publication 28 street suffix abbreviations handled by the formatter.
const STREET_SUFFIXES: &[(&str, &str)] = &[
    ("ALLEY", "ALY"),
    ("AVENUE", "AVE"),
    ("BOULEVARD", "BLVD"),
    ("CIRCLE", "CIR"),
    ("COURT", "CT"),
    ("DRIVE", "DR"),
    ("EXPRESSWAY", "EXPY"),
    ("HIGHWAY", "HWY"),
    ("LANE", "LN"),
    ("PARKWAY", "PKWY"),
    ("PLACE", "PL"),
    ("PLAZA", "PLZ"),
    ("ROAD", "RD"),
    ("SQUARE", "SQ"),
    ("STREET", "ST"),
    ("TERRACE", "TER"),
    ("TRAIL", "TRL"),
    ("WAY", "WAY"),
];

const DIRECTIONALS: &[(&str, &str)] = &[
    ("NORTH", "N"),
    ("SOUTH", "S"),
    ("EAST", "E"),
    ("WEST", "W"),
    ("NORTHEAST", "NE"),
    ("NORTHWEST", "NW"),
    ("SOUTHEAST", "SE"),
    ("SOUTHWEST", "SW"),
];

const UNIT_DESIGNATORS: &[(&str, &str)] = &[
    ("APARTMENT", "APT"),
    ("BUILDING", "BLDG"),
    ("FLOOR", "FL"),
    ("ROOM", "RM"),
    ("SUITE", "STE"),
    ("UNIT", "UNIT"),
];

/// Punctuation removed outright (not replaced with spaces).
fn is_stripped_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | ';' | ':' | '!' | '?')
}

/// Word characters for boundary matching: a table key only substitutes when
/// it forms a maximal run of these, so STREETER never loses its STREET.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Uppercases and strips punctuation; shared by address lines and the
/// name/city/state fields that skip abbreviation passes.
fn scrub(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .filter(|c| !is_stripped_punctuation(*c))
        .collect()
}

/// Replaces every whole-word occurrence of a table key with its abbreviation.
fn replace_whole_words(text: &str, table: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    for c in text.chars() {
        if is_word_char(c) {
            word.push(c);
        } else {
            flush_word(&mut out, &mut word, table);
            out.push(c);
        }
    }
    flush_word(&mut out, &mut word, table);
    out
}

fn flush_word(out: &mut String, word: &mut String, table: &[(&str, &str)]) {
    if word.is_empty() {
        return;
    }
    match table.iter().find(|(full, _)| full == word) {
        Some((_, abbrev)) => out.push_str(abbrev),
        None => out.push_str(word),
    }
    word.clear();
}

/// Formats a single address line according to USPS conventions.
///
/// Idempotent: no abbreviation produced here is itself a table key (WAY and
/// UNIT map to themselves), so a second pass is a no-op.
pub fn normalize_line(line: &str) -> String {
    if line.trim().is_empty() {
        return String::new();
    }

    let mut formatted = scrub(line);
    for table in [STREET_SUFFIXES, DIRECTIONALS, UNIT_DESIGNATORS] {
        formatted = replace_whole_words(&formatted, table);
    }

    formatted.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps only digits and hyphens, so `62704-1234!` stays a valid ZIP+4.
pub fn sanitize_zip(zip: &str) -> String {
    zip.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Produces the envelope projection of a full record. Name, city, and state
/// are scrubbed but never abbreviated; only the street lines receive the
/// suffix/directional/unit passes.
pub fn normalize_address(address: &AddressRecord) -> FormattedAddress {
    let city = scrub(&address.city);
    let state = scrub(&address.state);
    let zip = sanitize_zip(&address.zip_code);

    let city_state_zip = [city.as_str(), state.as_str(), zip.as_str()]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    FormattedAddress {
        name: scrub(&address.name),
        line1: normalize_line(&address.line1),
        line2: address
            .line2
            .as_deref()
            .map(normalize_line)
            .unwrap_or_default(),
        city_state_zip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line1: &str, line2: Option<&str>, zip: &str) -> AddressRecord {
        AddressRecord {
            name: "Jane Q. Doe".into(),
            line1: line1.into(),
            line2: line2.map(Into::into),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: zip.into(),
        }
    }

    #[test]
    fn abbreviates_suffix_and_unit() {
        assert_eq!(
            normalize_line("123 Main Street, Apt 4B"),
            "123 MAIN ST APT 4B"
        );
    }

    #[test]
    fn abbreviates_directional_and_suffix() {
        assert_eq!(normalize_line("North Elm Boulevard"), "N ELM BLVD");
    }

    #[test]
    fn respects_word_boundaries() {
        assert_eq!(normalize_line("Streeter Avenue"), "STREETER AVE");
        assert_eq!(normalize_line("Apartments on Westway"), "APARTMENTS ON WESTWAY");
    }

    #[test]
    fn replaces_every_occurrence_in_a_line() {
        assert_eq!(
            normalize_line("Street to Street via Avenue"),
            "ST TO ST VIA AVE"
        );
    }

    #[test]
    fn collapses_whitespace_and_strips_punctuation() {
        assert_eq!(normalize_line("  500   Oak  Drive ;  "), "500 OAK DR");
        assert_eq!(normalize_line(" .,;:!? "), "");
        assert_eq!(normalize_line("   "), "");
    }

    #[test]
    fn normalize_line_is_idempotent() {
        for input in [
            "123 Main Street, Apt 4B",
            "North Elm Boulevard",
            "Streeter Avenue",
            "  500   Oak  Drive ;  ",
            "Suite 9, Building C, Northwest Plaza",
        ] {
            let once = normalize_line(input);
            assert_eq!(normalize_line(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn sanitizes_zip_to_digits_and_hyphen() {
        let formatted = normalize_address(&record("1 Elm St", None, "62704-1234!"));
        assert_eq!(formatted.city_state_zip, "SPRINGFIELD IL 62704-1234");
    }

    #[test]
    fn name_city_state_skip_abbreviation_tables() {
        let mut rec = record("1 North Street", None, "62704");
        rec.name = "North Street Bakery, Inc.".into();
        rec.city = "West Haven".into();
        let formatted = normalize_address(&rec);
        assert_eq!(formatted.name, "NORTH STREET BAKERY INC");
        assert_eq!(formatted.line1, "1 N ST");
        assert_eq!(formatted.city_state_zip, "WEST HAVEN IL 62704");
    }

    #[test]
    fn missing_line2_becomes_empty_string() {
        let formatted = normalize_address(&record("1 Elm St", None, "62704"));
        assert_eq!(formatted.line2, "");
        let formatted = normalize_address(&record("1 Elm St", Some("Suite 200"), "62704"));
        assert_eq!(formatted.line2, "STE 200");
    }
}
