//! Property-based tests using proptest
//!
//! Random inputs for the validated value types and the generated SQL.

use proptest::prelude::*;

use specimen_forms::application::validation::validate_label;
use specimen_forms::entities::RegistryTables;
use specimen_forms::infrastructure::persistence::QueryBuilder;
use specimen_forms::value_objects::{ContainerId, SchemaVersion, SpecimenLabel, SqlIdentifier};

use test_fixtures::schema;

/// Strategy for generating valid SQL identifiers
fn identifier_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,62}".prop_map(|s| s.to_string())
}

/// Strategy for generating printable specimen labels
fn label_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 '\";_-]{0,40}[A-Za-z0-9]".prop_map(|s| s.to_string())
}

proptest! {
    /// Valid identifiers are accepted, lowercased and quoted exactly once
    #[test]
    fn test_identifier_normalization(raw in identifier_strategy()) {
        let ident = SqlIdentifier::new(raw.clone()).unwrap();

        prop_assert_eq!(ident.as_str(), raw.to_ascii_lowercase());
        prop_assert_eq!(ident.quoted(), format!("\"{}\"", raw.to_ascii_lowercase()));
    }

    /// Anything containing a character outside [A-Za-z0-9_] is rejected
    #[test]
    fn test_identifier_rejects_injection(
        prefix in "[a-z]{1,10}",
        bad in prop::sample::select(vec![" ", "\"", "'", ";", "-", "(", ")", "."]),
        suffix in "[a-z]{0,10}",
    ) {
        let raw = format!("{}{}{}", prefix, bad, suffix);
        prop_assert!(SqlIdentifier::new(raw).is_err());
    }

    /// Identifiers longer than 63 characters are rejected
    #[test]
    fn test_identifier_length_limit(raw in "[a-z]{64,100}") {
        prop_assert!(SqlIdentifier::new(raw).is_err());
    }

    /// Printable labels survive validation unchanged
    #[test]
    fn test_label_preserved(raw in label_strategy()) {
        let label = validate_label(Some(&raw)).unwrap().unwrap();
        prop_assert_eq!(label.as_str(), raw.as_str());
    }

    /// Labels containing control characters are rejected
    #[test]
    fn test_label_rejects_control_chars(
        head in "[A-Z0-9]{1,10}",
        ctrl in prop::sample::select(vec!['\n', '\r', '\t', '\0']),
    ) {
        let raw = format!("{}{}", head, ctrl);
        prop_assert!(SpecimenLabel::new(raw).is_err());
    }

    /// Only positive container ids are accepted
    #[test]
    fn test_container_id_sign(value in any::<i64>()) {
        prop_assert_eq!(ContainerId::new(value).is_ok(), value > 0);
    }

    /// Versions made of allowed characters round-trip through Display
    #[test]
    fn test_schema_version_display(raw in "[A-Za-z0-9_.-]{1,64}") {
        let version = SchemaVersion::new(raw.clone()).unwrap();
        prop_assert_eq!(version.to_string(), raw);
    }

    /// Labels never reach the SQL text; the filter is always a bind parameter
    #[test]
    fn test_label_never_inlined(raw in "[A-Za-z0-9]{12,20}") {
        let sql = QueryBuilder::specimen_forms(&schema("v1"), true);
        prop_assert!(!sql.contains(&raw));
        prop_assert!(sql.contains("$4"));
    }

    /// Renaming a mapped column changes only that identifier in the query
    #[test]
    fn test_mapped_column_substitution(column in "zz_[a-z]{4,12}") {
        let base = schema("v1");
        let mut renamed = base.clone();
        renamed.custom_field.storage_tube_column = SqlIdentifier::new(column.clone()).unwrap();

        let original = QueryBuilder::specimen_forms(&base, false)
            .replace("\"de_at_storage_tube\"", "\"X\"");
        let changed = QueryBuilder::specimen_forms(&renamed, false)
            .replace(&format!("\"{}\"", column), "\"X\"");
        prop_assert_eq!(original, changed);
    }
}

#[test]
fn test_container_query_binds_container() {
    let sql = QueryBuilder::container_exists(&RegistryTables::default());
    assert!(sql.ends_with("= $1)"));
}
