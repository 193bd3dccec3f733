//! Built-in option fetchers
//!
//! Supports: app objects, sub-resources, sync modes, BigQuery locations,
//! and HTTP-backed option lists.
//!
//! # Overview
//!
//! The app-sync fetchers dispatch to the session's `ExternalAppConnector`
//! through the registries; `HttpOptionsFetcher` calls an endpoint whose URL
//! and headers are templated from the form state and app config.

mod appsync;
mod bigquery;
mod http;
pub mod refs;

pub use appsync::{ObjectOptionsFetcher, SubResourceOptionsFetcher, SyncModeOptionsFetcher};
pub use bigquery::BqLocationsFetcher;
pub use http::{HttpOptionsConfig, HttpOptionsFetcher};

/// Form field carrying the selected app object
pub const OBJECT_FIELD: &str = "object";

#[cfg(test)]
mod tests;
