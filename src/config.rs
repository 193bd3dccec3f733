//! Registry manifest configuration
//!
//! This module contains the structures used to declare, in YAML, which
//! catalog-backed connectors, SQL dialects and option lists a process
//! registers at startup.

use crate::error::{Error, Result};
use crate::fetchers::HttpOptionsConfig;
use crate::forms::FormOption;
use crate::types::{AppSyncMode, ExternalAppType, JdbcConnectionType, WarehouseType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

// ============================================================================
// Top-Level Manifest
// ============================================================================

/// Complete registry manifest loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryManifest {
    /// Catalog-backed app connectors
    #[serde(default)]
    pub apps: Vec<AppCatalog>,

    /// Catalog-backed warehouse connectors
    #[serde(default)]
    pub warehouses: Vec<WarehouseCatalog>,

    /// SQL dialect helpers
    #[serde(default)]
    pub jdbc_dialects: Vec<JdbcDialect>,

    /// Static option lists by reference key
    #[serde(default)]
    pub static_options: BTreeMap<String, Vec<FormOption>>,

    /// HTTP option fetchers by reference key
    #[serde(default)]
    pub http_options: BTreeMap<String, HttpOptionsConfig>,
}

// ============================================================================
// Apps
// ============================================================================

/// An app whose objects and sync modes are declared up front
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCatalog {
    /// App type (registry key)
    #[serde(rename = "type")]
    pub app_type: ExternalAppType,

    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,

    /// Config keys a connection check requires
    #[serde(default)]
    pub required_config: Vec<String>,

    /// Objects records can be synced into
    #[serde(default)]
    pub objects: Vec<ObjectCatalog>,
}

/// One object of a catalog-backed app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectCatalog {
    /// Object identifier
    pub name: String,

    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,

    /// Supported sync modes
    #[serde(default = "default_sync_modes")]
    pub sync_modes: Vec<AppSyncMode>,

    /// Sub-resources (e.g., lists) of this object
    #[serde(default)]
    pub sub_resources: Vec<SubResourceCatalog>,
}

fn default_sync_modes() -> Vec<AppSyncMode> {
    AppSyncMode::ALL.to_vec()
}

impl ObjectCatalog {
    /// Title, falling back to the name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// A sub-resource of an object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubResourceCatalog {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
}

// ============================================================================
// Warehouses & Dialects
// ============================================================================

/// A warehouse whose connection check only verifies config keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseCatalog {
    /// Warehouse type (registry key)
    #[serde(rename = "type")]
    pub warehouse_type: WarehouseType,

    /// Config keys a connection check requires
    #[serde(default)]
    pub required_config: Vec<String>,
}

/// Identifier quoting rules for one SQL dialect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JdbcDialect {
    /// Dialect (registry key)
    #[serde(rename = "type")]
    pub connection_type: JdbcConnectionType,

    /// Identifier quote character
    #[serde(default = "default_quote")]
    pub quote: char,

    /// Fold unquoted identifiers to upper case
    #[serde(default)]
    pub uppercase_identifiers: bool,
}

fn default_quote() -> char {
    '"'
}

// ============================================================================
// Loading
// ============================================================================

/// Load a manifest from a YAML file
pub fn load_manifest(path: impl AsRef<Path>) -> Result<RegistryManifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read manifest '{}': {e}",
                path.display()
            ))
        }
    })?;
    load_manifest_from_str(&content)
}

/// Load a manifest from a YAML string
pub fn load_manifest_from_str(yaml: &str) -> Result<RegistryManifest> {
    let manifest: RegistryManifest = serde_yaml::from_str(yaml)?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

/// Validate what the registries cannot: per-app object lists
///
/// Duplicate registry keys are left to the registries themselves.
fn validate_manifest(manifest: &RegistryManifest) -> Result<()> {
    for app in &manifest.apps {
        let mut seen = HashSet::new();
        for object in &app.objects {
            if object.name.trim().is_empty() {
                return Err(Error::config(format!(
                    "App {} has an object with an empty name",
                    app.app_type
                )));
            }
            if !seen.insert(object.name.as_str()) {
                return Err(Error::config(format!(
                    "App {} declares object '{}' twice",
                    app.app_type, object.name
                )));
            }
            if object.sync_modes.is_empty() {
                return Err(Error::config(format!(
                    "Object '{}' of app {} has no sync modes",
                    object.name, app.app_type
                )));
            }
        }
    }

    for (key, options) in &manifest.static_options {
        if options.is_empty() {
            return Err(Error::config(format!("Static options '{key}' are empty")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_manifest_defaults() {
        let yaml = r#"
apps:
  - type: INTERCOM
    objects:
      - name: CONTACT
      - name: COMPANY
        sync_modes: [UPSERT]
jdbc_dialects:
  - type: SNOWFLAKE
    uppercase_identifiers: true
"#;

        let manifest = load_manifest_from_str(yaml).unwrap();
        let app = &manifest.apps[0];
        assert_eq!(app.app_type, ExternalAppType::Intercom);
        assert_eq!(app.objects[0].sync_modes, AppSyncMode::ALL.to_vec());
        assert_eq!(app.objects[1].sync_modes, vec![AppSyncMode::Upsert]);
        assert_eq!(app.objects[0].display_title(), "CONTACT");

        let dialect = &manifest.jdbc_dialects[0];
        assert_eq!(dialect.quote, '"');
        assert!(dialect.uppercase_identifiers);
    }

    #[test]
    fn test_duplicate_object_rejected() {
        let yaml = r#"
apps:
  - type: HUBSPOT
    objects:
      - name: CONTACT
      - name: CONTACT
"#;
        let err = load_manifest_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("declares object 'CONTACT' twice"));
    }

    #[test]
    fn test_empty_sync_modes_rejected() {
        let yaml = r#"
apps:
  - type: HUBSPOT
    objects:
      - name: DEAL
        sync_modes: []
"#;
        assert!(load_manifest_from_str(yaml).is_err());
    }

    #[test]
    fn test_unknown_app_type_rejected() {
        let yaml = r#"
apps:
  - type: MYSPACE
"#;
        assert!(matches!(
            load_manifest_from_str(yaml),
            Err(Error::YamlParse(_))
        ));
    }

    #[test]
    fn test_load_manifest_missing_file() {
        let err = load_manifest("/nonexistent/manifest.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_load_manifest_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.yaml");
        std::fs::write(
            &path,
            "warehouses:\n  - type: POSTGRES\n    required_config: [host]\n",
        )
        .unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.warehouses[0].warehouse_type, WarehouseType::Postgres);
        assert_eq!(manifest.warehouses[0].required_config, vec!["host"]);
    }
}
