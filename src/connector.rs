//! Capability interfaces
//!
//! Defines the traits that collaborators implement and the registries
//! dispatch to: warehouse and app connectors, JDBC query helpers,
//! per-object data sinks, and static/dynamic option fetchers.

use crate::error::{Error, Result};
use crate::forms::{FormOption, FormState};
use crate::registry::CapabilityRegistries;
use crate::types::{
    AppSyncMode, ExternalAppType, IntercomObject, JdbcConnectionType, WarehouseType,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// App Objects
// ============================================================================

/// An object (or sub-resource) exposed by an external app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppObject {
    /// Object identifier (e.g., "CONTACT")
    pub name: String,

    /// Human-readable title
    pub title: String,
}

impl AppObject {
    /// Create a new app object
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }
}

impl From<AppObject> for FormOption {
    fn from(object: AppObject) -> Self {
        FormOption::new(object.name, object.title)
    }
}

// ============================================================================
// Connector Traits
// ============================================================================

/// Connects to a data warehouse
#[async_trait]
pub trait WarehouseConnector: Send + Sync {
    /// Warehouse this connector talks to
    fn warehouse_type(&self) -> WarehouseType;

    /// Tests if credentials and configuration are valid
    async fn check(&self, config: &Value) -> Result<CheckResult>;
}

/// Syncs records into an external app
#[async_trait]
pub trait ExternalAppConnector: Send + Sync {
    /// App this connector talks to
    fn app_type(&self) -> ExternalAppType;

    /// Tests if credentials and configuration are valid
    async fn check(&self, config: &Value) -> Result<CheckResult>;

    /// Lists the objects records can be synced into
    async fn list_objects(&self, config: &Value) -> Result<Vec<AppObject>>;

    /// Sync modes the app supports for one object
    async fn sync_modes(&self, config: &Value, object: &str) -> Result<Vec<AppSyncMode>>;

    /// Sub-resources of an object (e.g., a list inside a mailing app)
    async fn sub_resources(&self, _config: &Value, _object: &str) -> Result<Vec<AppObject>> {
        Ok(Vec::new())
    }
}

/// Produces dialect-specific SQL fragments
pub trait JdbcQueryHelper: Send + Sync {
    /// Dialect this helper targets
    fn connection_type(&self) -> JdbcConnectionType;

    /// Quote an identifier (table or column name)
    fn quote_identifier(&self, identifier: &str) -> String;

    /// Row limit clause
    fn limit_clause(&self, limit: u64) -> String {
        format!("LIMIT {limit}")
    }
}

/// Accepts records for one or more app objects
#[async_trait]
pub trait ObjectDataSink: Send + Sync {
    /// Sink name, used in logs
    fn name(&self) -> &str;

    /// Write records for `object`, returning how many were accepted
    async fn write_records(&self, object: IntercomObject, records: &[Value]) -> Result<usize>;
}

/// Returns a fixed option list with no inputs
pub trait StaticOptionsFetcher: Send + Sync {
    /// The options, in display order
    fn options(&self) -> Vec<FormOption>;
}

/// Computes options at configuration time from the current form state
///
/// Implementations may perform network I/O and are responsible for their
/// own timeouts; a hung fetch is a defect of the fetcher.
#[async_trait]
pub trait DynamicOptionsFetcher: Send + Sync {
    /// Fetch the options for `ctx.field`
    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<FormOption>>;
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Credentials and targets for one configuration session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    /// Destination app being configured
    #[serde(default)]
    pub app_type: Option<ExternalAppType>,

    /// App credentials/config
    #[serde(default)]
    pub app_config: Value,

    /// Source warehouse being configured
    #[serde(default)]
    pub warehouse_type: Option<WarehouseType>,

    /// Warehouse credentials/config
    #[serde(default)]
    pub warehouse_config: Value,
}

impl SessionContext {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session targeting an app
    pub fn for_app(app_type: ExternalAppType, app_config: Value) -> Self {
        Self {
            app_type: Some(app_type),
            app_config,
            ..Default::default()
        }
    }

    /// Create a session targeting a warehouse
    pub fn for_warehouse(warehouse_type: WarehouseType, warehouse_config: Value) -> Self {
        Self {
            warehouse_type: Some(warehouse_type),
            warehouse_config,
            ..Default::default()
        }
    }

    /// App type, or an error when the session has none
    pub fn require_app(&self) -> Result<ExternalAppType> {
        self.app_type
            .ok_or_else(|| Error::missing_context("app_type"))
    }

    /// Warehouse type, or an error when the session has none
    pub fn require_warehouse(&self) -> Result<WarehouseType> {
        self.warehouse_type
            .ok_or_else(|| Error::missing_context("warehouse_type"))
    }
}

/// Everything a dynamic fetcher may read for one resolution request
pub struct FetchContext<'a> {
    /// Field being resolved
    pub field: &'a str,

    /// Snapshot of the form state at request time
    pub state: &'a FormState,

    /// Session credentials/targets
    pub session: &'a SessionContext,

    /// Registries, for fetchers that dispatch to a connector
    pub registries: &'a CapabilityRegistries,
}

impl<'a> FetchContext<'a> {
    /// The app connector bound to the session's app type
    pub fn app_connector(&self) -> Result<Arc<dyn ExternalAppConnector>> {
        let app = self.session.require_app()?;
        self.registries.app_connectors().resolve(&app)
    }

    /// A string value from the form state, or a missing-value error
    pub fn require_str(&self, field: &str) -> Result<&'a str> {
        self.state
            .get_str(field)
            .ok_or_else(|| Error::missing_value(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_result_success() {
        let result = CheckResult::success();
        assert!(result.success);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_check_result_failure() {
        let result = CheckResult::failure("Connection failed");
        assert!(!result.success);
        assert_eq!(result.message, Some("Connection failed".to_string()));
    }

    #[test]
    fn test_session_context_deserialize() {
        let session: SessionContext = serde_json::from_value(json!({
            "app_type": "INTERCOM",
            "app_config": {"api_key": "k"}
        }))
        .unwrap();

        assert_eq!(session.require_app().unwrap(), ExternalAppType::Intercom);
        assert_eq!(session.app_config["api_key"], "k");
        assert!(session.require_warehouse().is_err());
    }

    #[test]
    fn test_require_app_missing() {
        let err = SessionContext::new().require_app().unwrap_err();
        assert!(matches!(err, Error::MissingContext { .. }));
    }

    #[test]
    fn test_app_object_into_option() {
        let option: FormOption = AppObject::new("CONTACT", "Contact").into();
        assert_eq!(option.value, json!("CONTACT"));
        assert_eq!(option.title, "Contact");
    }
}
