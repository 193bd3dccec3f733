//! YAML parser for form definitions
//!
//! Supports both built-in schemas (by name) and custom YAML files (by path).

use crate::builtin;
use crate::error::{Error, Result};
use crate::forms::FormSchema;
use crate::loader::types::FormDefinition;
use crate::registry::CapabilityRegistries;
use std::fs;
use std::path::Path;
use tracing::info;

/// Load and validate a schema from a built-in name or file path
///
/// A bare name with no path separators and no YAML extension is looked up
/// among the built-in schemas first.
///
/// # Examples
///
/// ```ignore
/// let schema = load_schema("generic_object_radio_group", &registries)?;
/// let schema = load_schema("./forms/custom.yaml", &registries)?;
/// ```
pub fn load_schema(
    path: impl AsRef<Path>,
    registries: &CapabilityRegistries,
) -> Result<FormSchema> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = builtin::get_builtin_schema(&path_str) {
            return load_schema_from_str(yaml, registries);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: format!(
                    "{} (built-in schemas: {})",
                    path.display(),
                    builtin::list_builtin_schemas().join(", ")
                ),
            }
        } else {
            Error::config(format!(
                "Failed to read schema file '{}': {e}",
                path.display()
            ))
        }
    })?;
    load_schema_from_str(&content, registries)
}

/// Parse a form definition without validating it
pub fn parse_definition(yaml: &str) -> Result<FormDefinition> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse schema YAML: {e}")))
}

/// Load and validate a schema from a YAML string
pub fn load_schema_from_str(yaml: &str, registries: &CapabilityRegistries) -> Result<FormSchema> {
    let schema = parse_definition(yaml)?.into_schema(registries)?;
    info!(
        schema = schema.name(),
        fields = schema.fields().len(),
        groups = schema.groups().len(),
        "Loaded form schema"
    );
    Ok(schema)
}
