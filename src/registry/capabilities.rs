//! Capability axes composed into one registry set
//!
//! Each axis owns its key space, so a key collision in one axis never
//! affects another.

use super::typed::TypedRegistry;
use crate::connector::{
    DynamicOptionsFetcher, ExternalAppConnector, JdbcQueryHelper, ObjectDataSink,
    StaticOptionsFetcher, WarehouseConnector,
};
use crate::error::Result;
use crate::types::{ExternalAppType, IntercomObject, JdbcConnectionType, WarehouseType};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Warehouse connectors by warehouse type
pub type WarehouseConnectorRegistry = TypedRegistry<WarehouseType, dyn WarehouseConnector>;

/// App connectors by app type
pub type AppConnectorRegistry = TypedRegistry<ExternalAppType, dyn ExternalAppConnector>;

/// JDBC query helpers by dialect
pub type JdbcHelperRegistry = TypedRegistry<JdbcConnectionType, dyn JdbcQueryHelper>;

/// Data sinks by app object
pub type ObjectSinkRegistry = TypedRegistry<IntercomObject, dyn ObjectDataSink>;

/// Static option lists by reference key
pub type StaticFetcherRegistry = TypedRegistry<String, dyn StaticOptionsFetcher>;

/// Dynamic option fetchers by reference key
pub type DynamicFetcherRegistry = TypedRegistry<String, dyn DynamicOptionsFetcher>;

// ============================================================================
// Axes
// ============================================================================

/// One independent classification dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityAxis {
    WarehouseConnector,
    AppConnector,
    JdbcQueryHelper,
    ObjectSink,
    StaticOptionsFetcher,
    DynamicOptionsFetcher,
}

impl CapabilityAxis {
    /// Every axis, in display order
    pub const ALL: [CapabilityAxis; 6] = [
        CapabilityAxis::WarehouseConnector,
        CapabilityAxis::AppConnector,
        CapabilityAxis::JdbcQueryHelper,
        CapabilityAxis::ObjectSink,
        CapabilityAxis::StaticOptionsFetcher,
        CapabilityAxis::DynamicOptionsFetcher,
    ];

    /// Axis label used in errors and logs
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityAxis::WarehouseConnector => "warehouse connector",
            CapabilityAxis::AppConnector => "app connector",
            CapabilityAxis::JdbcQueryHelper => "jdbc query helper",
            CapabilityAxis::ObjectSink => "object sink",
            CapabilityAxis::StaticOptionsFetcher => "static options fetcher",
            CapabilityAxis::DynamicOptionsFetcher => "dynamic options fetcher",
        }
    }
}

// ============================================================================
// Registries
// ============================================================================

/// The frozen set of registries, shared read-only after bootstrap
#[derive(Debug)]
pub struct CapabilityRegistries {
    warehouse_connectors: WarehouseConnectorRegistry,
    app_connectors: AppConnectorRegistry,
    jdbc_query_helpers: JdbcHelperRegistry,
    object_sinks: ObjectSinkRegistry,
    static_option_fetchers: StaticFetcherRegistry,
    dynamic_option_fetchers: DynamicFetcherRegistry,
}

impl CapabilityRegistries {
    /// Start registering bindings
    pub fn builder() -> CapabilityRegistriesBuilder {
        CapabilityRegistriesBuilder::new()
    }

    pub fn warehouse_connectors(&self) -> &WarehouseConnectorRegistry {
        &self.warehouse_connectors
    }

    pub fn app_connectors(&self) -> &AppConnectorRegistry {
        &self.app_connectors
    }

    pub fn jdbc_query_helpers(&self) -> &JdbcHelperRegistry {
        &self.jdbc_query_helpers
    }

    pub fn object_sinks(&self) -> &ObjectSinkRegistry {
        &self.object_sinks
    }

    pub fn static_option_fetchers(&self) -> &StaticFetcherRegistry {
        &self.static_option_fetchers
    }

    pub fn dynamic_option_fetchers(&self) -> &DynamicFetcherRegistry {
        &self.dynamic_option_fetchers
    }

    /// Keys of one axis as strings, in registration order
    pub fn keys_of(&self, axis: CapabilityAxis) -> Vec<String> {
        fn names<K: ToString>(keys: &[K]) -> Vec<String> {
            keys.iter().map(ToString::to_string).collect()
        }

        match axis {
            CapabilityAxis::WarehouseConnector => names(self.warehouse_connectors.keys()),
            CapabilityAxis::AppConnector => names(self.app_connectors.keys()),
            CapabilityAxis::JdbcQueryHelper => names(self.jdbc_query_helpers.keys()),
            CapabilityAxis::ObjectSink => names(self.object_sinks.keys()),
            CapabilityAxis::StaticOptionsFetcher => names(self.static_option_fetchers.keys()),
            CapabilityAxis::DynamicOptionsFetcher => names(self.dynamic_option_fetchers.keys()),
        }
    }

    /// Keys of every axis, for UI enumeration
    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            axes: CapabilityAxis::ALL
                .iter()
                .map(|&axis| AxisSummary {
                    axis,
                    keys: self.keys_of(axis),
                })
                .collect(),
        }
    }
}

/// Registered keys per axis
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySummary {
    pub axes: Vec<AxisSummary>,
}

/// Registered keys of one axis
#[derive(Debug, Clone, Serialize)]
pub struct AxisSummary {
    pub axis: CapabilityAxis,
    pub keys: Vec<String>,
}

// ============================================================================
// Builder
// ============================================================================

/// Mutable registries used during bootstrap
///
/// Registration takes `&mut self`, so it is single-threaded by construction.
/// `build` freezes the result.
#[derive(Debug)]
pub struct CapabilityRegistriesBuilder {
    registries: CapabilityRegistries,
}

impl CapabilityRegistriesBuilder {
    /// Create a builder with every axis empty
    pub fn new() -> Self {
        Self {
            registries: CapabilityRegistries {
                warehouse_connectors: TypedRegistry::new(
                    CapabilityAxis::WarehouseConnector.as_str(),
                ),
                app_connectors: TypedRegistry::new(CapabilityAxis::AppConnector.as_str()),
                jdbc_query_helpers: TypedRegistry::new(CapabilityAxis::JdbcQueryHelper.as_str()),
                object_sinks: TypedRegistry::new(CapabilityAxis::ObjectSink.as_str()),
                static_option_fetchers: TypedRegistry::new(
                    CapabilityAxis::StaticOptionsFetcher.as_str(),
                ),
                dynamic_option_fetchers: TypedRegistry::new(
                    CapabilityAxis::DynamicOptionsFetcher.as_str(),
                ),
            },
        }
    }

    /// Bind a warehouse connector
    pub fn warehouse_connector(
        &mut self,
        key: WarehouseType,
        connector: Arc<dyn WarehouseConnector>,
    ) -> Result<&mut Self> {
        self.registries.warehouse_connectors.register(key, connector)?;
        Ok(self)
    }

    /// Bind an app connector
    pub fn app_connector(
        &mut self,
        key: ExternalAppType,
        connector: Arc<dyn ExternalAppConnector>,
    ) -> Result<&mut Self> {
        self.registries.app_connectors.register(key, connector)?;
        Ok(self)
    }

    /// Bind a JDBC query helper
    pub fn jdbc_query_helper(
        &mut self,
        key: JdbcConnectionType,
        helper: Arc<dyn JdbcQueryHelper>,
    ) -> Result<&mut Self> {
        self.registries.jdbc_query_helpers.register(key, helper)?;
        Ok(self)
    }

    /// Bind a data sink to one object; the same sink may serve several objects
    pub fn object_sink(
        &mut self,
        key: IntercomObject,
        sink: Arc<dyn ObjectDataSink>,
    ) -> Result<&mut Self> {
        self.registries.object_sinks.register(key, sink)?;
        Ok(self)
    }

    /// Bind a static option list
    pub fn static_options(
        &mut self,
        key: impl Into<String>,
        fetcher: Arc<dyn StaticOptionsFetcher>,
    ) -> Result<&mut Self> {
        self.registries
            .static_option_fetchers
            .register(key.into(), fetcher)?;
        Ok(self)
    }

    /// Bind a dynamic option fetcher
    pub fn dynamic_options(
        &mut self,
        key: impl Into<String>,
        fetcher: Arc<dyn DynamicOptionsFetcher>,
    ) -> Result<&mut Self> {
        self.registries
            .dynamic_option_fetchers
            .register(key.into(), fetcher)?;
        Ok(self)
    }

    /// Read access to what has been registered so far
    pub fn registries(&self) -> &CapabilityRegistries {
        &self.registries
    }

    /// Freeze the registries
    pub fn build(self) -> CapabilityRegistries {
        let registries = self.registries;
        info!(
            warehouses = registries.warehouse_connectors.len(),
            apps = registries.app_connectors.len(),
            jdbc_helpers = registries.jdbc_query_helpers.len(),
            object_sinks = registries.object_sinks.len(),
            static_fetchers = registries.static_option_fetchers.len(),
            dynamic_fetchers = registries.dynamic_option_fetchers.len(),
            "Capability registries built"
        );
        registries
    }
}

impl Default for CapabilityRegistriesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
