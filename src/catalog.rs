//! Catalog-backed capability implementations
//!
//! Connectors whose metadata comes from the registry manifest rather than
//! from a live API. Their connection checks only verify that the required
//! config keys are present.

use crate::config::{AppCatalog, JdbcDialect, WarehouseCatalog};
use crate::connector::{
    AppObject, CheckResult, ExternalAppConnector, JdbcQueryHelper, StaticOptionsFetcher,
    WarehouseConnector,
};
use crate::error::{Error, Result};
use crate::forms::{is_empty_value, FormOption};
use crate::types::{AppSyncMode, ExternalAppType, JdbcConnectionType, WarehouseType};
use async_trait::async_trait;
use serde_json::Value;

/// Required keys absent (or empty) in `config`
fn missing_keys<'a>(config: &Value, required: &'a [String]) -> Vec<&'a str> {
    required
        .iter()
        .filter(|key| config.get(key.as_str()).map_or(true, is_empty_value))
        .map(String::as_str)
        .collect()
}

fn check_required(config: &Value, required: &[String]) -> CheckResult {
    let missing = missing_keys(config, required);
    if missing.is_empty() {
        CheckResult::success()
    } else {
        CheckResult::failure(format!("Missing config: {}", missing.join(", ")))
    }
}

// ============================================================================
// App Connector
// ============================================================================

/// App connector described by an `AppCatalog`
#[derive(Debug, Clone)]
pub struct CatalogAppConnector {
    catalog: AppCatalog,
}

impl CatalogAppConnector {
    pub fn new(catalog: AppCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &AppCatalog {
        &self.catalog
    }

    fn object(&self, name: &str) -> Result<&crate::config::ObjectCatalog> {
        self.catalog
            .objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| {
                Error::config(format!(
                    "Unknown object '{name}' for app {}",
                    self.catalog.app_type
                ))
            })
    }
}

#[async_trait]
impl ExternalAppConnector for CatalogAppConnector {
    fn app_type(&self) -> ExternalAppType {
        self.catalog.app_type
    }

    async fn check(&self, config: &Value) -> Result<CheckResult> {
        Ok(check_required(config, &self.catalog.required_config))
    }

    async fn list_objects(&self, _config: &Value) -> Result<Vec<AppObject>> {
        Ok(self
            .catalog
            .objects
            .iter()
            .map(|o| AppObject::new(&o.name, o.display_title()))
            .collect())
    }

    async fn sync_modes(&self, _config: &Value, object: &str) -> Result<Vec<AppSyncMode>> {
        Ok(self.object(object)?.sync_modes.clone())
    }

    async fn sub_resources(&self, _config: &Value, object: &str) -> Result<Vec<AppObject>> {
        Ok(self
            .object(object)?
            .sub_resources
            .iter()
            .map(|r| AppObject::new(&r.name, r.title.as_deref().unwrap_or(&r.name)))
            .collect())
    }
}

// ============================================================================
// Warehouse Connector
// ============================================================================

/// Warehouse connector described by a `WarehouseCatalog`
#[derive(Debug, Clone)]
pub struct CatalogWarehouseConnector {
    catalog: WarehouseCatalog,
}

impl CatalogWarehouseConnector {
    pub fn new(catalog: WarehouseCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl WarehouseConnector for CatalogWarehouseConnector {
    fn warehouse_type(&self) -> WarehouseType {
        self.catalog.warehouse_type
    }

    async fn check(&self, config: &Value) -> Result<CheckResult> {
        Ok(check_required(config, &self.catalog.required_config))
    }
}

// ============================================================================
// Query Helper
// ============================================================================

/// Query helper driven by a `JdbcDialect`
#[derive(Debug, Clone)]
pub struct DialectQueryHelper {
    dialect: JdbcDialect,
}

impl DialectQueryHelper {
    pub fn new(dialect: JdbcDialect) -> Self {
        Self { dialect }
    }
}

impl JdbcQueryHelper for DialectQueryHelper {
    fn connection_type(&self) -> JdbcConnectionType {
        self.dialect.connection_type
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        let quote = self.dialect.quote;
        let ident = if self.dialect.uppercase_identifiers {
            identifier.to_uppercase()
        } else {
            identifier.to_string()
        };
        let escaped = ident.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }
}

// ============================================================================
// Static Options
// ============================================================================

/// A fixed option list declared in the manifest
#[derive(Debug, Clone)]
pub struct StaticOptionList {
    options: Vec<FormOption>,
}

impl StaticOptionList {
    pub fn new(options: Vec<FormOption>) -> Self {
        Self { options }
    }
}

impl StaticOptionsFetcher for StaticOptionList {
    fn options(&self) -> Vec<FormOption> {
        self.options.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ObjectCatalog, SubResourceCatalog};
    use serde_json::json;

    fn mailchimp() -> CatalogAppConnector {
        CatalogAppConnector::new(AppCatalog {
            app_type: ExternalAppType::Mailchimp,
            title: None,
            required_config: vec!["api_key".to_string()],
            objects: vec![ObjectCatalog {
                name: "AUDIENCE".to_string(),
                title: Some("Audience".to_string()),
                sync_modes: vec![AppSyncMode::Upsert],
                sub_resources: vec![SubResourceCatalog {
                    name: "newsletter".to_string(),
                    title: None,
                }],
            }],
        })
    }

    #[tokio::test]
    async fn test_check_required_config() {
        let connector = mailchimp();

        let ok = connector.check(&json!({"api_key": "k"})).await.unwrap();
        assert!(ok.success);

        let missing = connector.check(&json!({"api_key": ""})).await.unwrap();
        assert!(!missing.success);
        assert_eq!(missing.message.as_deref(), Some("Missing config: api_key"));
    }

    #[tokio::test]
    async fn test_objects_and_modes() {
        let connector = mailchimp();
        let config = json!({});

        let objects = connector.list_objects(&config).await.unwrap();
        assert_eq!(objects, vec![AppObject::new("AUDIENCE", "Audience")]);

        let modes = connector.sync_modes(&config, "AUDIENCE").await.unwrap();
        assert_eq!(modes, vec![AppSyncMode::Upsert]);

        let subs = connector.sub_resources(&config, "AUDIENCE").await.unwrap();
        assert_eq!(subs, vec![AppObject::new("newsletter", "newsletter")]);

        assert!(connector.sync_modes(&config, "CAMPAIGN").await.is_err());
    }

    #[test]
    fn test_quote_identifier() {
        let postgres = DialectQueryHelper::new(JdbcDialect {
            connection_type: JdbcConnectionType::Postgres,
            quote: '"',
            uppercase_identifiers: false,
        });
        assert_eq!(postgres.quote_identifier("users"), "\"users\"");
        assert_eq!(postgres.quote_identifier("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(postgres.limit_clause(10), "LIMIT 10");

        let snowflake = DialectQueryHelper::new(JdbcDialect {
            connection_type: JdbcConnectionType::Snowflake,
            quote: '"',
            uppercase_identifiers: true,
        });
        assert_eq!(snowflake.quote_identifier("users"), "\"USERS\"");
    }
}
