//! Tests for YAML loader module

use super::*;
use crate::bootstrap::bootstrap_manifest;
use crate::builtin::list_builtin_schemas;
use crate::config::RegistryManifest;
use crate::error::Error;
use crate::forms::{FieldType, FormState, OptionsRefKind};
use crate::registry::CapabilityRegistries;
use std::sync::Arc;

fn registries() -> Arc<CapabilityRegistries> {
    bootstrap_manifest(&RegistryManifest::default()).unwrap()
}

// ============================================================================
// Basic Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_schema() {
    let yaml = r#"
name: minimal
groups:
  - name: MAIN
fields:
  - id: label
    title: Label
    group: MAIN
"#;

    let schema = load_schema_from_str(yaml, &registries()).unwrap();
    assert_eq!(schema.name(), "minimal");
    assert_eq!(schema.fields().len(), 1);

    let field = schema.field("label").unwrap();
    assert_eq!(field.field_type, FieldType::TextBox);
    assert!(field.options_ref.is_none());
    assert!(!field.required);
    assert_eq!(schema.group("MAIN").unwrap().fields, vec!["label"]);
}

#[test]
fn test_load_options_ref_value_alias() {
    let yaml = r#"
name: aliased
groups:
  - name: MAIN
fields:
  - id: location
    title: Location
    type: DROP_DOWN
    group: MAIN
    options_ref:
      type: STATIC
      value: BQ_LOCATIONS
"#;

    let schema = load_schema_from_str(yaml, &registries()).unwrap();
    let options_ref = schema.field("location").unwrap().options_ref.as_ref().unwrap();
    assert_eq!(options_ref.kind, OptionsRefKind::Static);
    assert_eq!(options_ref.key, "BQ_LOCATIONS");
}

#[test]
fn test_parse_definition_keeps_description() {
    let yaml = r#"
name: described
description: Where records go
"#;

    let def = parse_definition(yaml).unwrap();
    assert_eq!(def.description.as_deref(), Some("Where records go"));
    assert!(def.groups.is_empty());

    let schema = load_schema_from_str(yaml, &registries()).unwrap();
    assert_eq!(schema.description(), Some("Where records go"));

    let json = serde_json::to_value(&schema).unwrap();
    assert_eq!(json["description"], "Where records go");
}

#[test]
fn test_schema_without_description_omits_it() {
    let schema = load_schema_from_str("name: plain", &registries()).unwrap();
    assert!(schema.description().is_none());

    let json = serde_json::to_value(&schema).unwrap();
    assert!(json.get("description").is_none());
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_load_rejects_cycle() {
    let yaml = r#"
name: cyclic
groups:
  - name: A
    activation: {dependencies: [b]}
  - name: B
    activation: {dependencies: [a]}
fields:
  - {id: a, title: A, group: A}
  - {id: b, title: B, group: B}
"#;

    let err = load_schema_from_str(yaml, &registries()).unwrap_err();
    match err {
        Error::SchemaCycle { schema, chain } => {
            assert_eq!(schema, "cyclic");
            assert_eq!(chain, vec!["A", "B", "A"]);
        }
        other => panic!("expected SchemaCycle, got {other:?}"),
    }
}

#[test]
fn test_load_rejects_unbound_ref() {
    let yaml = r#"
name: unbound
groups:
  - name: MAIN
fields:
  - id: list
    title: List
    type: DROP_DOWN
    group: MAIN
    options_ref: {type: DYNAMIC, key: SENDGRID_LISTS}
"#;

    let err = load_schema_from_str(yaml, &registries()).unwrap_err();
    assert!(matches!(
        err,
        Error::UnresolvableOptionsRef { ref key, .. } if key == "SENDGRID_LISTS"
    ));
}

#[test]
fn test_load_invalid_yaml() {
    let err = load_schema_from_str("name: [unterminated", &registries()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse schema YAML"));
}

#[test]
fn test_load_unknown_field_type() {
    let yaml = r#"
name: bad
groups: [{name: MAIN}]
fields:
  - {id: x, title: X, group: MAIN, type: SLIDER}
"#;

    assert!(load_schema_from_str(yaml, &registries()).is_err());
}

// ============================================================================
// Built-in & File Tests
// ============================================================================

#[test]
fn test_every_builtin_schema_validates() {
    let registries = registries();
    for name in list_builtin_schemas() {
        let schema = load_schema(name, &registries)
            .unwrap_or_else(|e| panic!("built-in schema {name} failed: {e}"));
        assert_eq!(schema.name(), name);
    }
}

#[test]
fn test_builtin_generic_object_radio_group() {
    let schema = load_schema("generic_object_radio_group", &registries()).unwrap();

    assert_eq!(schema.active_fields(&FormState::new()), vec!["object"]);

    let state = FormState::new().with("object", "CONTACT");
    assert_eq!(schema.active_fields(&state), vec!["object", "mode"]);
}

#[test]
fn test_load_schema_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.yaml");
    std::fs::write(
        &path,
        "name: custom\ngroups: [{name: MAIN}]\nfields: [{id: note, title: Note, group: MAIN, type: TEXT_AREA}]\n",
    )
    .unwrap();

    let schema = load_schema(&path, &registries()).unwrap();
    assert_eq!(schema.name(), "custom");
    assert_eq!(schema.field("note").unwrap().field_type, FieldType::TextArea);
}

#[test]
fn test_load_schema_missing_file_lists_builtins() {
    let err = load_schema("no_such_schema", &registries()).unwrap_err();
    match err {
        Error::FileNotFound { path } => assert!(path.contains("generic_object_radio_group")),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}
