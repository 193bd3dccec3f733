//! Loader types
//!
//! Declarative form definition types for YAML parsing.

use crate::error::Result;
use crate::forms::{FieldDescriptor, FormSchema, GroupDescriptor};
use crate::registry::CapabilityRegistries;
use serde::{Deserialize, Serialize};

/// Top-level form definition, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FormDefinition {
    /// Schema name
    pub name: String,

    /// Optional description shown above the form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Groups in display order
    #[serde(default)]
    pub groups: Vec<GroupDescriptor>,

    /// Fields in display order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl FormDefinition {
    /// Validate against the registries
    pub fn into_schema(self, registries: &CapabilityRegistries) -> Result<FormSchema> {
        let schema = FormSchema::new(self.name, self.fields, self.groups, registries)?;
        Ok(match self.description {
            Some(description) => schema.with_description(description),
            None => schema,
        })
    }
}
