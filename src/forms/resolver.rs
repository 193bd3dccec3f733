//! Options resolution
//!
//! Every request goes to the fetcher. Nothing is cached, because the
//! dependency values an option set is computed from can change at any time
//! during interactive configuration.

use super::schema::FormSchema;
use super::types::{FormState, OptionsRefKind, ResolvedOptions};
use crate::connector::{FetchContext, SessionContext};
use crate::error::{Error, Result};
use crate::registry::CapabilityRegistries;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves selectable values for form fields
#[derive(Debug, Clone)]
pub struct OptionsResolver {
    registries: Arc<CapabilityRegistries>,
}

impl OptionsResolver {
    pub fn new(registries: Arc<CapabilityRegistries>) -> Self {
        Self { registries }
    }

    /// Registries this resolver dispatches to
    pub fn registries(&self) -> &CapabilityRegistries {
        &self.registries
    }

    /// Resolve the options of one field
    ///
    /// Static references ignore `state`. Dynamic references invoke the bound
    /// fetcher with the full state; its failures come back as `OptionsFetch`.
    pub async fn resolve(
        &self,
        schema: &FormSchema,
        field: &str,
        state: &FormState,
        session: &SessionContext,
    ) -> Result<ResolvedOptions> {
        let descriptor = schema
            .field(field)
            .ok_or_else(|| Error::unknown_field(field))?;
        let options_ref = descriptor
            .options_ref
            .as_ref()
            .ok_or_else(|| Error::NoOptionsRef {
                field: field.to_string(),
            })?;

        let options = match options_ref.kind {
            OptionsRefKind::Static => {
                let fetcher = self
                    .registries
                    .static_option_fetchers()
                    .resolve(options_ref.key.as_str())?;
                fetcher.options()
            }
            OptionsRefKind::Dynamic => {
                let fetcher = self
                    .registries
                    .dynamic_option_fetchers()
                    .resolve(options_ref.key.as_str())?;
                let ctx = FetchContext {
                    field,
                    state,
                    session,
                    registries: &self.registries,
                };
                fetcher.fetch(&ctx).await.map_err(|e| {
                    warn!(
                        schema = schema.name(),
                        field,
                        key = %options_ref.key,
                        error = %e,
                        "Options fetch failed"
                    );
                    Error::options_fetch(field, e)
                })?
            }
        };

        debug!(
            schema = schema.name(),
            field,
            count = options.len(),
            "Resolved options"
        );
        Ok(ResolvedOptions::new(field, options))
    }

    /// Resolve every active field that has an options reference
    ///
    /// Fields are fetched concurrently. Each field gets its own result, so
    /// one failing fetcher does not hide the others.
    pub async fn resolve_active(
        &self,
        schema: &FormSchema,
        state: &FormState,
        session: &SessionContext,
    ) -> Vec<(String, Result<ResolvedOptions>)> {
        let fields: Vec<&str> = schema
            .active_fields(state)
            .into_iter()
            .filter(|id| {
                schema
                    .field(id)
                    .is_some_and(|f| f.options_ref.is_some())
            })
            .collect();

        let results = join_all(
            fields
                .iter()
                .map(|field| self.resolve(schema, field, state, session)),
        )
        .await;

        fields
            .into_iter()
            .map(String::from)
            .zip(results)
            .collect()
    }
}
