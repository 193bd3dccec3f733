//! Capability registries
//!
//! Exactly-one-binding maps from closed key types to capability
//! implementations, one per axis.
//!
//! # Overview
//!
//! The registry module provides:
//! - `TypedRegistry` - Generic key → `Arc<V>` map that rejects duplicate keys
//! - `CapabilityRegistries` - The six axes composed into one read-only value
//! - `CapabilityRegistriesBuilder` - Single-threaded registration during bootstrap

mod capabilities;
mod typed;

pub use capabilities::{
    AppConnectorRegistry, AxisSummary, CapabilityAxis, CapabilityRegistries,
    CapabilityRegistriesBuilder, DynamicFetcherRegistry, JdbcHelperRegistry, ObjectSinkRegistry,
    RegistrySummary, StaticFetcherRegistry, WarehouseConnectorRegistry,
};
pub use typed::{RegistryKey, TypedRegistry};
