//! Registry bootstrap
//!
//! Populates every axis once, in a fixed order: built-in fetchers, then the
//! manifest's catalog bindings, then collaborator bindings supplied through
//! a hook. Any duplicate key aborts startup.

use crate::catalog::{
    CatalogAppConnector, CatalogWarehouseConnector, DialectQueryHelper, StaticOptionList,
};
use crate::config::RegistryManifest;
use crate::error::Result;
use crate::fetchers::{
    refs, BqLocationsFetcher, HttpOptionsFetcher, ObjectOptionsFetcher,
    SubResourceOptionsFetcher, SyncModeOptionsFetcher,
};
use crate::registry::{CapabilityRegistries, CapabilityRegistriesBuilder};
use std::sync::Arc;
use tracing::{debug, info};

/// Register the fetchers that ship with the crate
pub fn register_builtin_fetchers(builder: &mut CapabilityRegistriesBuilder) -> Result<()> {
    builder
        .dynamic_options(refs::OBJECT, Arc::new(ObjectOptionsFetcher))?
        .dynamic_options(refs::SUB_RESOURCE, Arc::new(SubResourceOptionsFetcher))?
        .dynamic_options(refs::SYNC_MODE, Arc::new(SyncModeOptionsFetcher))?
        .static_options(refs::BQ_LOCATIONS, Arc::new(BqLocationsFetcher))?;
    Ok(())
}

/// Register everything a manifest declares
pub fn register_manifest(
    builder: &mut CapabilityRegistriesBuilder,
    manifest: &RegistryManifest,
) -> Result<()> {
    for app in &manifest.apps {
        debug!(app = %app.app_type, objects = app.objects.len(), "Registering catalog app");
        builder.app_connector(app.app_type, Arc::new(CatalogAppConnector::new(app.clone())))?;
    }

    for warehouse in &manifest.warehouses {
        builder.warehouse_connector(
            warehouse.warehouse_type,
            Arc::new(CatalogWarehouseConnector::new(warehouse.clone())),
        )?;
    }

    for dialect in &manifest.jdbc_dialects {
        builder.jdbc_query_helper(
            dialect.connection_type,
            Arc::new(DialectQueryHelper::new(dialect.clone())),
        )?;
    }

    for (key, options) in &manifest.static_options {
        builder.static_options(key, Arc::new(StaticOptionList::new(options.clone())))?;
    }

    for (key, config) in &manifest.http_options {
        builder.dynamic_options(key, Arc::new(HttpOptionsFetcher::new(config.clone())?))?;
    }

    Ok(())
}

/// Build the frozen registries for a process
///
/// `hook` runs last and is where collaborators bind their own connectors,
/// sinks and fetchers.
pub fn bootstrap<F>(manifest: &RegistryManifest, hook: F) -> Result<Arc<CapabilityRegistries>>
where
    F: FnOnce(&mut CapabilityRegistriesBuilder) -> Result<()>,
{
    let mut builder = CapabilityRegistries::builder();
    register_builtin_fetchers(&mut builder)?;
    register_manifest(&mut builder, manifest)?;
    hook(&mut builder)?;

    let registries = builder.build();
    info!(
        apps = manifest.apps.len(),
        warehouses = manifest.warehouses.len(),
        "Bootstrap complete"
    );
    Ok(Arc::new(registries))
}

/// Bootstrap from a manifest with no collaborator bindings
pub fn bootstrap_manifest(manifest: &RegistryManifest) -> Result<Arc<CapabilityRegistries>> {
    bootstrap(manifest, |_| Ok(()))
}
