//! Form schema construction and validation
//!
//! A `FormSchema` can only be obtained through validation, so every value
//! of the type satisfies the schema invariants:
//!
//! - field ids and group names are unique
//! - every field belongs to an existing group, and to exactly one
//! - every activation dependency names an existing field
//! - the activation graph between groups is acyclic
//! - every options reference is bound in the matching fetcher registry

use super::types::{FieldDescriptor, GroupDescriptor, OptionsRefKind};
use crate::error::{Error, Result};
use crate::registry::CapabilityRegistries;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A validated form schema
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    fields: Vec<FieldDescriptor>,
    groups: Vec<GroupDescriptor>,
    #[serde(skip)]
    field_index: HashMap<String, usize>,
    #[serde(skip)]
    group_index: HashMap<String, usize>,
    /// Group indices, dependencies before dependents
    #[serde(skip)]
    activation_order: Vec<usize>,
}

impl FormSchema {
    /// Validate and build a schema
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        groups: Vec<GroupDescriptor>,
        registries: &CapabilityRegistries,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_schema(name, "schema name cannot be empty"));
        }

        let field_index = index_unique(&name, "field", fields.iter().map(|f| f.id.as_str()))?;
        let group_index = index_unique(&name, "group", groups.iter().map(|g| g.name.as_str()))?;

        let mut schema = Self {
            name,
            description: None,
            fields,
            groups,
            field_index,
            group_index,
            activation_order: Vec::new(),
        };

        schema.check_field_groups()?;
        schema.fill_group_members()?;
        schema.check_dependencies()?;
        schema.activation_order = schema.topological_order()?;
        schema.check_options_refs(registries)?;

        debug!(
            schema = %schema.name,
            fields = schema.fields.len(),
            groups = schema.groups.len(),
            "Form schema validated"
        );
        Ok(schema)
    }

    /// Start building a schema
    pub fn builder(name: impl Into<String>) -> FormSchemaBuilder {
        FormSchemaBuilder {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text shown above the form
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Attach a description; it plays no part in validation
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Groups in declaration order
    pub fn groups(&self) -> &[GroupDescriptor] {
        &self.groups
    }

    /// Look up a field
    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.field_index.get(id).map(|&i| &self.fields[i])
    }

    /// Look up a group
    pub fn group(&self, name: &str) -> Option<&GroupDescriptor> {
        self.group_index.get(name).map(|&i| &self.groups[i])
    }

    /// Groups ordered so that every group comes after the groups it depends on
    pub fn activation_order(&self) -> impl Iterator<Item = &GroupDescriptor> {
        self.activation_order.iter().map(|&i| &self.groups[i])
    }

    pub(crate) fn group_position(&self, name: &str) -> Option<usize> {
        self.group_index.get(name).copied()
    }

    // ------------------------------------------------------------------------
    // Validation passes
    // ------------------------------------------------------------------------

    /// Every field's group exists
    fn check_field_groups(&self) -> Result<()> {
        for field in &self.fields {
            if !self.group_index.contains_key(&field.group) {
                return Err(Error::UnknownFieldGroup {
                    field: field.id.clone(),
                    group: field.group.clone(),
                });
            }
        }
        Ok(())
    }

    /// Derive group members from field ownership, checking any declared list
    fn fill_group_members(&mut self) -> Result<()> {
        for group in &mut self.groups {
            let owned: Vec<String> = self
                .fields
                .iter()
                .filter(|f| f.group == group.name)
                .map(|f| f.id.clone())
                .collect();

            if group.fields.is_empty() {
                group.fields = owned;
                continue;
            }

            let declared: HashSet<&str> = group.fields.iter().map(String::as_str).collect();
            let derived: HashSet<&str> = owned.iter().map(String::as_str).collect();
            if declared.len() != group.fields.len() || declared != derived {
                return Err(Error::invalid_schema(
                    &self.name,
                    format!(
                        "group '{}' declares members [{}] but owns fields [{}]",
                        group.name,
                        group.fields.join(", "),
                        owned.join(", ")
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Every activation dependency names an existing field
    fn check_dependencies(&self) -> Result<()> {
        for group in &self.groups {
            for dep in group.dependencies() {
                if !self.field_index.contains_key(dep) {
                    return Err(Error::UnknownDependency {
                        group: group.name.clone(),
                        field: dep.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Topologically sort groups by activation dependency
    ///
    /// Group `g` depends on group `h` when one of `g`'s activation fields is
    /// owned by `h`. A group depending on its own field is a cycle of one.
    fn topological_order(&self) -> Result<Vec<usize>> {
        let edges: Vec<Vec<usize>> = self
            .groups
            .iter()
            .map(|group| {
                let mut targets: Vec<usize> = group
                    .dependencies()
                    .iter()
                    .filter_map(|dep| self.field_index.get(dep))
                    .filter_map(|&fi| self.group_index.get(&self.fields[fi].group).copied())
                    .collect();
                targets.sort_unstable();
                targets.dedup();
                targets
            })
            .collect();

        let mut marks = vec![Mark::Unvisited; self.groups.len()];
        let mut order = Vec::with_capacity(self.groups.len());
        let mut path = Vec::new();

        for start in 0..self.groups.len() {
            if marks[start] == Mark::Unvisited {
                self.visit(start, &edges, &mut marks, &mut path, &mut order)?;
            }
        }
        Ok(order)
    }

    fn visit(
        &self,
        node: usize,
        edges: &[Vec<usize>],
        marks: &mut [Mark],
        path: &mut Vec<usize>,
        order: &mut Vec<usize>,
    ) -> Result<()> {
        marks[node] = Mark::InProgress;
        path.push(node);

        for &next in &edges[node] {
            match marks[next] {
                Mark::Done => {}
                Mark::Unvisited => self.visit(next, edges, marks, path, order)?,
                Mark::InProgress => {
                    let start = path.iter().position(|&n| n == next).unwrap_or(0);
                    let chain = path[start..]
                        .iter()
                        .chain(std::iter::once(&next))
                        .map(|&i| self.groups[i].name.clone())
                        .collect();
                    return Err(Error::SchemaCycle {
                        schema: self.name.clone(),
                        chain,
                    });
                }
            }
        }

        path.pop();
        marks[node] = Mark::Done;
        order.push(node);
        Ok(())
    }

    /// Every options reference is bound in its registry
    fn check_options_refs(&self, registries: &CapabilityRegistries) -> Result<()> {
        for field in &self.fields {
            let Some(options_ref) = &field.options_ref else {
                continue;
            };

            let bound = match options_ref.kind {
                OptionsRefKind::Static => registries
                    .static_option_fetchers()
                    .contains_key(options_ref.key.as_str()),
                OptionsRefKind::Dynamic => registries
                    .dynamic_option_fetchers()
                    .contains_key(options_ref.key.as_str()),
            };

            if !bound {
                return Err(Error::UnresolvableOptionsRef {
                    field: field.id.clone(),
                    kind: options_ref.kind.as_str(),
                    key: options_ref.key.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Index names by position, rejecting duplicates and blanks
fn index_unique<'a>(
    schema: &str,
    what: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (i, name) in names.enumerate() {
        if name.trim().is_empty() {
            return Err(Error::invalid_schema(
                schema,
                format!("{what} name cannot be empty"),
            ));
        }
        if index.insert(name.to_string(), i).is_some() {
            return Err(Error::invalid_schema(
                schema,
                format!("duplicate {what} '{name}'"),
            ));
        }
    }
    Ok(index)
}

// ============================================================================
// Builder
// ============================================================================

/// Collects descriptors, validating them on `build`
#[derive(Debug, Clone)]
pub struct FormSchemaBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDescriptor>,
    groups: Vec<GroupDescriptor>,
}

impl FormSchemaBuilder {
    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a group
    #[must_use]
    pub fn group(mut self, group: GroupDescriptor) -> Self {
        self.groups.push(group);
        self
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate against the registries and build
    pub fn build(self, registries: &CapabilityRegistries) -> Result<FormSchema> {
        let schema = FormSchema::new(self.name, self.fields, self.groups, registries)?;
        Ok(match self.description {
            Some(description) => schema.with_description(description),
            None => schema,
        })
    }
}
