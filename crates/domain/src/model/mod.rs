//! Address value types exchanged between the API surface and the gateway.

use serde::{Deserialize, Serialize};

/// A postal address as submitted by the caller. All fields are free-form
/// text at input time; `is_complete` gates what may be sent for validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl AddressRecord {
    /// Required fields for validation: everything except `line2`, non-empty
    /// after trimming.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of the required fields that are empty or whitespace-only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (field, value) in [
            ("name", &self.name),
            ("line1", &self.line1),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
        ] {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }
        missing
    }

    pub fn line2(&self) -> &str {
        self.line2.as_deref().unwrap_or("")
    }
}

/// Read-only projection of an [`AddressRecord`] formatted for envelope
/// printing. Produced fresh on every normalization call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedAddress {
    pub name: String,
    pub line1: String,
    pub line2: String,
    pub city_state_zip: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AddressRecord {
        AddressRecord {
            name: "Jane Doe".into(),
            line1: "123 Main Street".into(),
            line2: None,
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62704".into(),
        }
    }

    #[test]
    fn complete_record_passes_without_line2() {
        assert!(record().is_complete());
    }

    #[test]
    fn whitespace_only_fields_are_missing() {
        let mut rec = record();
        rec.city = "   ".into();
        rec.zip_code = String::new();
        assert!(!rec.is_complete());
        assert_eq!(rec.missing_fields(), vec!["city", "zipCode"]);
    }

    #[test]
    fn deserializes_camel_case_payload() {
        let rec: AddressRecord = serde_json::from_str(
            r#"{"name":"Jane","line1":"1 Elm St","city":"Springfield","state":"IL","zipCode":"62704"}"#,
        )
        .unwrap();
        assert_eq!(rec.zip_code, "62704");
        assert_eq!(rec.line2(), "");
    }
}
