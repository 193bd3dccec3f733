//! Built-in form schemas and registry manifest embedded in the binary
//!
//! Lets users pass `--schema generic_object_radio_group` instead of a file
//! path, and run without a `--manifest`.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Default registry manifest
pub const DEFAULT_MANIFEST: &str = include_str!("../manifests/default.yaml");

/// Built-in schema YAML declarations
pub static BUILTIN_SCHEMAS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // App sync
    m.insert(
        "generic_object_radio_group",
        include_str!("../schemas/generic_object_radio_group.yaml"),
    );
    m.insert(
        "object_with_sub_resource",
        include_str!("../schemas/object_with_sub_resource.yaml"),
    );

    // Warehouses
    m.insert(
        "bigquery_dataset",
        include_str!("../schemas/bigquery_dataset.yaml"),
    );

    m
});

/// Get a built-in schema by name
pub fn get_builtin_schema(name: &str) -> Option<&'static str> {
    BUILTIN_SCHEMAS.get(name).copied()
}

/// Check if a name refers to a built-in schema
pub fn is_builtin_schema(name: &str) -> bool {
    BUILTIN_SCHEMAS.contains_key(name)
}

/// List all built-in schema names, sorted
pub fn list_builtin_schemas() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTIN_SCHEMAS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_builtin_schemas() {
        assert_eq!(
            list_builtin_schemas(),
            vec![
                "bigquery_dataset",
                "generic_object_radio_group",
                "object_with_sub_resource"
            ]
        );
    }

    #[test]
    fn test_get_builtin_schema() {
        let yaml = get_builtin_schema("generic_object_radio_group").unwrap();
        assert!(yaml.contains("name: generic_object_radio_group"));
        assert!(is_builtin_schema("bigquery_dataset"));
        assert!(get_builtin_schema("stripe").is_none());
    }

    #[test]
    fn test_default_manifest_parses() {
        let manifest = crate::config::load_manifest_from_str(DEFAULT_MANIFEST).unwrap();
        assert!(!manifest.apps.is_empty());
        assert_eq!(manifest.warehouses.len(), 4);
        assert_eq!(manifest.jdbc_dialects.len(), 3);
    }
}
