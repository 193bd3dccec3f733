//! App sync option fetchers
//!
//! These resolve the session's app connector and ask it about objects.
//! A dependency the user has not filled in yet is an error, not an empty
//! list: the activation rules should keep such fields hidden, so reaching
//! here without the value means the caller skipped them.

use super::OBJECT_FIELD;
use crate::connector::{DynamicOptionsFetcher, FetchContext};
use crate::error::Result;
use crate::forms::FormOption;
use async_trait::async_trait;
use tracing::debug;

/// Objects exposed by the app (`OBJECT`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectOptionsFetcher;

#[async_trait]
impl DynamicOptionsFetcher for ObjectOptionsFetcher {
    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<FormOption>> {
        let connector = ctx.app_connector()?;
        let objects = connector.list_objects(&ctx.session.app_config).await?;
        debug!(app = %connector.app_type(), count = objects.len(), "Listed app objects");
        Ok(objects.into_iter().map(FormOption::from).collect())
    }
}

/// Sub-resources of the chosen object (`SUB_RESOURCE`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SubResourceOptionsFetcher;

#[async_trait]
impl DynamicOptionsFetcher for SubResourceOptionsFetcher {
    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<FormOption>> {
        let object = ctx.require_str(OBJECT_FIELD)?;
        let connector = ctx.app_connector()?;
        let resources = connector
            .sub_resources(&ctx.session.app_config, object)
            .await?;
        Ok(resources.into_iter().map(FormOption::from).collect())
    }
}

/// Sync modes valid for the chosen object (`SYNC_MODE`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncModeOptionsFetcher;

#[async_trait]
impl DynamicOptionsFetcher for SyncModeOptionsFetcher {
    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<FormOption>> {
        let object = ctx.require_str(OBJECT_FIELD)?;
        let connector = ctx.app_connector()?;
        let modes = connector
            .sync_modes(&ctx.session.app_config, object)
            .await?;
        Ok(modes
            .into_iter()
            .map(|mode| FormOption::new(mode.as_str(), mode.title()))
            .collect())
    }
}
