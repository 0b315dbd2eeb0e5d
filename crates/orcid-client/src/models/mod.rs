//! Data models for ORCID API entities.
//!
//! Wire structs use `#[serde(rename = "...")]` for ORCID's kebab-case field
//! names and `#[serde(default)]` for optional fields. The profile document
//! itself nests optional strings as `{"value": ...} | null` wrappers and is
//! decoded by hand in [`person`].

mod person;
mod search;

pub use person::Person;
pub use search::{ExpandedSearchHit, OrcidIdentifier, SearchHit};
