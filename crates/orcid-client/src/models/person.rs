//! Person model and the profile-document decoder.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A researcher's public profile.
///
/// Never partially constructed: decoding fails atomically when the mandatory
/// given names are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// ORCID iD, a 16-digit hyphen-grouped identifier. Immutable once
    /// assigned by the registry.
    pub orcid: String,

    /// Given names; the only name component the registry guarantees.
    pub given_names: String,

    /// Family name, when public.
    #[serde(default)]
    pub family_name: Option<String>,

    /// Preferred display name, distinct from the legal name.
    #[serde(default)]
    pub credit_name: Option<String>,

    /// Free-text biography.
    #[serde(default)]
    pub biography: Option<String>,
}

impl Person {
    /// Decode a `{orcid}/person` response body.
    ///
    /// The payload nests optional strings as `{"value": ...} | null` rather
    /// than `<string> | null`, and does not echo the iD back, so the caller
    /// supplies it from request context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeserializationFailed`] when the body is not valid
    /// JSON or `name.given-names.value` is absent.
    pub fn from_profile_document(body: &str, orcid: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(body)
            .map_err(|e| Error::deserialization_with("person payload is not valid JSON", e))?;

        let name = doc.get("name");
        let given_names = name
            .and_then(|name| nested_value(name, "given-names"))
            .ok_or_else(|| {
                Error::deserialization("missing required field name.given-names.value")
            })?;
        let family_name = name.and_then(|name| nested_value(name, "family-name"));
        let credit_name = name.and_then(|name| nested_value(name, "credit-name"));
        let biography = nested_value(&doc, "biography");

        Ok(Self { orcid: orcid.to_string(), given_names, family_name, credit_name, biography })
    }

    /// Name to show in user interfaces: the credit name when the researcher
    /// set one, otherwise given plus family names.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(credit_name) = &self.credit_name {
            return credit_name.clone();
        }
        match &self.family_name {
            Some(family_name) => format!("{} {}", self.given_names, family_name),
            None => self.given_names.clone(),
        }
    }

    /// Check if the profile carries a biography.
    #[must_use]
    pub const fn has_biography(&self) -> bool {
        self.biography.is_some()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.orcid)
    }
}

/// Read `field.value` under the registry's null-tolerant wrapper rule: the
/// field must be a non-null object carrying a string `value`.
fn nested_value(parent: &Value, field: &str) -> Option<String> {
    parent.get(field)?.as_object()?.get("value")?.as_str().map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORCID: &str = "0000-0001-8564-3504";

    #[test]
    fn test_decode_full_profile() {
        let body = r#"{
            "name": {
                "given-names": {"value": "mark"},
                "family-name": {"value": "Jensen"},
                "credit-name": {"value": "MJ"},
                "visibility": "PUBLIC"
            },
            "biography": {"value": "Researcher at large"}
        }"#;

        let person = Person::from_profile_document(body, ORCID).unwrap();
        assert_eq!(person.orcid, ORCID);
        assert_eq!(person.given_names, "mark");
        assert_eq!(person.family_name.as_deref(), Some("Jensen"));
        assert_eq!(person.credit_name.as_deref(), Some("MJ"));
        assert_eq!(person.biography.as_deref(), Some("Researcher at large"));
    }

    #[test]
    fn test_decode_null_wrappers_are_absent_not_errors() {
        let body = r#"{
            "name": {
                "given-names": {"value": "mark"},
                "family-name": null,
                "credit-name": {"value": "MJ"}
            },
            "biography": null
        }"#;

        let person = Person::from_profile_document(body, ORCID).unwrap();
        assert_eq!(person.given_names, "mark");
        assert!(person.family_name.is_none());
        assert_eq!(person.credit_name.as_deref(), Some("MJ"));
        assert!(person.biography.is_none());
        assert!(!person.has_biography());
    }

    #[test]
    fn test_decode_missing_given_names_fails() {
        let body = r#"{"name": {"family-name": {"value": "Jensen"}}}"#;

        let err = Person::from_profile_document(body, ORCID).unwrap_err();
        assert!(err.is_deserialization());
        assert!(err.to_string().contains("given-names"));
    }

    #[test]
    fn test_decode_missing_name_section_fails() {
        let err = Person::from_profile_document("{}", ORCID).unwrap_err();
        assert!(err.is_deserialization());
    }

    #[test]
    fn test_decode_given_names_null_value_fails() {
        let body = r#"{"name": {"given-names": {"value": null}}}"#;

        let err = Person::from_profile_document(body, ORCID).unwrap_err();
        assert!(err.is_deserialization());
    }

    #[test]
    fn test_decode_biography_object_without_value_is_absent() {
        let body = r#"{
            "name": {"given-names": {"value": "mark"}},
            "biography": {"visibility": "PUBLIC"}
        }"#;

        let person = Person::from_profile_document(body, ORCID).unwrap();
        assert!(person.biography.is_none());
    }

    #[test]
    fn test_decode_malformed_json_fails() {
        let err = Person::from_profile_document("{ truncated", ORCID).unwrap_err();
        assert!(err.is_deserialization());
    }

    #[test]
    fn test_display_name_prefers_credit_name() {
        let body = r#"{
            "name": {
                "given-names": {"value": "mark"},
                "family-name": {"value": "Jensen"},
                "credit-name": {"value": "MJ"}
            }
        }"#;
        let person = Person::from_profile_document(body, ORCID).unwrap();
        assert_eq!(person.display_name(), "MJ");
    }

    #[test]
    fn test_display_name_falls_back_to_given_and_family() {
        let body = r#"{
            "name": {
                "given-names": {"value": "mark"},
                "family-name": {"value": "Jensen"}
            }
        }"#;
        let person = Person::from_profile_document(body, ORCID).unwrap();
        assert_eq!(person.display_name(), "mark Jensen");
        assert_eq!(person.to_string(), format!("mark Jensen ({ORCID})"));
    }
}
