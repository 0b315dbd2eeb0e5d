//! Search result models for the two name-search endpoints.

use serde::Deserialize;

use super::Person;

/// Identifier block attached to every plain search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct OrcidIdentifier {
    /// Full record URI, e.g. `https://sandbox.orcid.org/0000-0002-7614-2895`.
    #[serde(default)]
    pub uri: Option<String>,

    /// The bare iD. Drives the follow-up detail fetch, so a hit without one
    /// is unusable and fails element decode.
    pub path: String,

    /// Registry host the iD lives on.
    #[serde(default)]
    pub host: Option<String>,
}

/// One hit from the plain `search` endpoint.
///
/// Carries only the identifier; profile data requires one detail fetch per
/// hit. Ephemeral, never returned to callers.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// The identifier of the matched record.
    #[serde(rename = "orcid-identifier")]
    pub orcid_identifier: OrcidIdentifier,
}

/// One hit from the `expanded-search` endpoint, carrying names inline.
///
/// Denormalized: no biography, and the name fields are plain strings rather
/// than the profile document's value wrappers.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpandedSearchHit {
    /// The matched record's iD.
    #[serde(rename = "orcid-id")]
    pub orcid_id: String,

    /// Given names.
    #[serde(rename = "given-names")]
    pub given_names: String,

    /// Family name, when public. Plural in this payload, unlike the profile
    /// document's `family-name`.
    #[serde(rename = "family-names", default)]
    pub family_names: Option<String>,

    /// Preferred display name.
    #[serde(rename = "credit-name", default)]
    pub credit_name: Option<String>,
}

impl ExpandedSearchHit {
    /// Convert into a [`Person`]; the expanded payload never carries a
    /// biography.
    #[must_use]
    pub fn into_person(self) -> Person {
        Person {
            orcid: self.orcid_id,
            given_names: self.given_names,
            family_name: self.family_names,
            credit_name: self.credit_name,
            biography: None,
        }
    }
}
