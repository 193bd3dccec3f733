//! CLI runner - executes commands

use crate::bootstrap::bootstrap_manifest;
use crate::builtin::{self, DEFAULT_MANIFEST};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_manifest, load_manifest_from_str, RegistryManifest};
use crate::connector::SessionContext;
use crate::error::{Error, Result};
use crate::forms::{FormSchema, FormState, OptionsResolver};
use crate::loader::load_schema;
use crate::registry::CapabilityRegistries;
use serde_json::{json, Value};
use std::sync::Arc;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let registries = self.load_registries()?;

        match &self.cli.command {
            Commands::Registry => self.registry(&registries),
            Commands::Schemas => self.schemas(),
            Commands::Validate { schema } => self.validate(schema, &registries),
            Commands::Active { schema, state_json } => {
                self.active(schema, state_json, &registries)
            }
            Commands::Options {
                schema,
                field,
                state_json,
                session_json,
            } => {
                self.options(
                    schema,
                    field.as_deref(),
                    state_json,
                    session_json,
                    registries,
                )
                .await
            }
            Commands::Serve { port, schemas_dir } => {
                let config = crate::cli::ServerConfig {
                    registries,
                    schemas_dir: schemas_dir.clone(),
                };
                crate::cli::serve(config, *port).await
            }
        }
    }

    /// Load the manifest, falling back to the embedded default
    fn load_manifest(&self) -> Result<RegistryManifest> {
        match &self.cli.manifest {
            Some(path) => load_manifest(path),
            None => load_manifest_from_str(DEFAULT_MANIFEST),
        }
    }

    fn load_registries(&self) -> Result<Arc<CapabilityRegistries>> {
        bootstrap_manifest(&self.load_manifest()?)
    }

    /// Print registered keys per axis
    fn registry(&self, registries: &CapabilityRegistries) -> Result<()> {
        self.output_message(&json!({
            "type": "REGISTRY",
            "registry": registries.summary()
        }));
        Ok(())
    }

    /// Print built-in schema names
    fn schemas(&self) -> Result<()> {
        self.output_message(&json!({
            "type": "SCHEMAS",
            "schemas": builtin::list_builtin_schemas()
        }));
        Ok(())
    }

    /// Validate a schema
    fn validate(&self, schema: &str, registries: &CapabilityRegistries) -> Result<()> {
        let schema = load_schema(schema, registries)?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Schema '{}' is valid with {} fields in {} groups",
                    schema.name(),
                    schema.fields().len(),
                    schema.groups().len()
                )
            }
        }));
        Ok(())
    }

    /// Print group states and active fields
    fn active(
        &self,
        schema: &str,
        state_json: &str,
        registries: &CapabilityRegistries,
    ) -> Result<()> {
        let schema = load_schema(schema, registries)?;
        let state = parse_state(state_json)?;
        self.output_message(&activation_report(&schema, &state));
        Ok(())
    }

    /// Resolve options for one field, or every active field
    async fn options(
        &self,
        schema: &str,
        field: Option<&str>,
        state_json: &str,
        session_json: &str,
        registries: Arc<CapabilityRegistries>,
    ) -> Result<()> {
        let schema = load_schema(schema, &registries)?;
        let state = parse_state(state_json)?;
        let session: SessionContext = serde_json::from_str(session_json)
            .map_err(|e| Error::config(format!("Invalid session JSON: {e}")))?;
        let resolver = OptionsResolver::new(registries);

        if let Some(field) = field {
            let resolved = resolver.resolve(&schema, field, &state, &session).await?;
            self.output_message(&json!({
                "type": "OPTIONS",
                "options": resolved
            }));
            return Ok(());
        }

        for (field, result) in resolver.resolve_active(&schema, &state, &session).await {
            match result {
                Ok(resolved) => self.output_message(&json!({
                    "type": "OPTIONS",
                    "options": resolved
                })),
                Err(e) => self.output_message(&json!({
                    "type": "LOG",
                    "log": {
                        "level": "ERROR",
                        "message": format!("{field}: {e}")
                    }
                })),
            }
        }
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn parse_state(state_json: &str) -> Result<FormState> {
    let value: Value = serde_json::from_str(state_json)
        .map_err(|e| Error::config(format!("Invalid state JSON: {e}")))?;
    FormState::from_json(value)
}

/// Group states and active fields, as shared by the CLI and the server
pub(crate) fn activation_report(schema: &FormSchema, state: &FormState) -> Value {
    let engine = schema.activation();
    let groups: serde_json::Map<String, Value> = engine
        .group_states(state)
        .into_iter()
        .map(|(name, s)| (name.to_string(), json!(s)))
        .collect();

    json!({
        "type": "ACTIVATION",
        "schema": schema.name(),
        "groups": groups,
        "active_fields": engine.active_fields(state)
    })
}
