//! Property-based tests for the profile-document decoder.

use proptest::prelude::*;
use serde_json::json;

use orcid_client::Person;

/// Wrap an optional string the way the registry does: a value object when
/// present, an explicit null when not.
fn wrapped(value: &Option<String>) -> serde_json::Value {
    match value {
        Some(value) => json!({"value": value}),
        None => serde_json::Value::Null,
    }
}

proptest! {
    /// Decoding never panics, whatever the body looks like.
    #[test]
    fn decode_arbitrary_text_never_panics(body in ".{0,256}") {
        let _ = Person::from_profile_document(&body, "0000-0001-8564-3504");
    }

    /// Optional fields come out present-or-absent exactly matching the
    /// presence of their nested wrapper objects.
    #[test]
    fn decode_presence_mirrors_wrapper_presence(
        given in "[A-Za-z ]{1,40}",
        family in proptest::option::of("[A-Za-z ]{1,40}"),
        credit in proptest::option::of("[A-Za-z ]{1,40}"),
        biography in proptest::option::of("[A-Za-z0-9 .,]{0,200}"),
    ) {
        let body = json!({
            "name": {
                "given-names": {"value": given},
                "family-name": wrapped(&family),
                "credit-name": wrapped(&credit)
            },
            "biography": wrapped(&biography)
        })
        .to_string();

        let person = Person::from_profile_document(&body, "0000-0001-8564-3504").unwrap();
        prop_assert_eq!(&person.given_names, &given);
        prop_assert_eq!(&person.family_name, &family);
        prop_assert_eq!(&person.credit_name, &credit);
        prop_assert_eq!(&person.biography, &biography);
    }

    /// A document without given names always fails, whatever else is set.
    #[test]
    fn decode_without_given_names_always_fails(
        family in proptest::option::of("[A-Za-z ]{1,40}"),
        biography in proptest::option::of("[A-Za-z ]{0,100}"),
    ) {
        let body = json!({
            "name": {"family-name": wrapped(&family)},
            "biography": wrapped(&biography)
        })
        .to_string();

        let err = Person::from_profile_document(&body, "0000-0001-8564-3504").unwrap_err();
        prop_assert!(err.is_deserialization());
    }
}
