//! Form data model
//!
//! Descriptors are static metadata; `FormState` and `ResolvedOptions` live
//! for one configuration session.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Field Type
// ============================================================================

/// How a field is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    #[default]
    TextBox,
    TextArea,
    RadioGroup,
    DropDown,
    CheckBox,
    Hidden,
}

impl FieldType {
    /// Whether the field picks from a list of options
    pub fn is_choice(self) -> bool {
        matches!(self, FieldType::RadioGroup | FieldType::DropDown)
    }
}

// ============================================================================
// Options Reference
// ============================================================================

/// Where a field's options come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionsRefKind {
    /// Fixed list, independent of the form state
    Static,
    /// Computed at configuration time
    Dynamic,
}

impl OptionsRefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionsRefKind::Static => "static",
            OptionsRefKind::Dynamic => "dynamic",
        }
    }
}

/// Binding from a field to an option source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsRef {
    /// Static or dynamic
    #[serde(rename = "type")]
    pub kind: OptionsRefKind,

    /// Reference key in the fetcher registry
    #[serde(alias = "value")]
    pub key: String,
}

impl OptionsRef {
    /// Reference a static option list
    pub fn static_ref(key: impl Into<String>) -> Self {
        Self {
            kind: OptionsRefKind::Static,
            key: key.into(),
        }
    }

    /// Reference a dynamic option fetcher
    pub fn dynamic(key: impl Into<String>) -> Self {
        Self {
            kind: OptionsRefKind::Dynamic,
            key: key.into(),
        }
    }
}

// ============================================================================
// Descriptors
// ============================================================================

/// One form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field identifier (key in `FormState`)
    pub id: String,

    /// Display title
    pub title: String,

    /// Longer help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Rendering type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Owning group
    pub group: String,

    /// Option source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_ref: Option<OptionsRef>,

    /// Whether a value must be provided
    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    /// Create a field
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        field_type: FieldType,
        group: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            field_type,
            group: group.into(),
            options_ref: None,
            required: false,
        }
    }

    /// Bind the field to an option source
    #[must_use]
    pub fn with_options(mut self, options_ref: OptionsRef) -> Self {
        self.options_ref = Some(options_ref);
        self
    }

    /// Add help text
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Condition under which a group becomes active
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivationRule {
    /// Fields that must all be non-empty
    pub dependencies: Vec<String>,
}

impl ActivationRule {
    pub fn new<I, S>(dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named group of fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    /// Group name
    pub name: String,

    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Member field ids, in order; filled from the fields when left empty
    #[serde(default)]
    pub fields: Vec<String>,

    /// Activation condition; `None` means always active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<ActivationRule>,
}

impl GroupDescriptor {
    /// Create an always-active group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            fields: Vec::new(),
            activation: None,
        }
    }

    /// Make the group depend on fields being filled in
    #[must_use]
    pub fn activated_by<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activation = Some(ActivationRule::new(dependencies));
        self
    }

    /// Set the display title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Dependencies of the activation rule (empty if none)
    pub fn dependencies(&self) -> &[String] {
        self.activation
            .as_ref()
            .map_or(&[][..], |rule| rule.dependencies.as_slice())
    }
}

/// Activation state of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupState {
    Inactive,
    Active,
}

// ============================================================================
// Options
// ============================================================================

/// One selectable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormOption {
    /// Value stored in the form state when selected
    pub value: Value,

    /// Label shown to the user
    pub title: String,
}

impl FormOption {
    pub fn new(value: impl Into<Value>, title: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            title: title.into(),
        }
    }
}

/// Options produced for one field by one resolution request
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedOptions {
    /// Field the options belong to
    pub field: String,

    /// Options, in display order
    pub options: Vec<FormOption>,

    /// When the options were produced
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedOptions {
    pub fn new(field: impl Into<String>, options: Vec<FormOption>) -> Self {
        Self {
            field: field.into(),
            options,
            resolved_at: Utc::now(),
        }
    }

    /// Option values, in display order
    pub fn values(&self) -> Vec<&Value> {
        self.options.iter().map(|o| &o.value).collect()
    }
}

// ============================================================================
// Form State
// ============================================================================

/// Field values entered so far in one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, Value>,
}

impl FormState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            Value::Null => Ok(Self::new()),
            other => Err(Error::config(format!(
                "Form state must be a JSON object, got: {other}"
            ))),
        }
    }

    /// Set a field value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Set a field value (builder style)
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Clear a field, returning its previous value
    pub fn clear(&mut self, field: &str) -> Option<Value> {
        self.values.remove(field)
    }

    /// Raw value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Non-empty string value of a field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.values
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Whether the field has a non-empty value
    pub fn is_set(&self, field: &str) -> bool {
        self.values.get(field).is_some_and(|v| !is_empty_value(v))
    }

    /// Number of entries (set or not)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The state as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

/// Null, blank strings, empty arrays and empty objects count as unset
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
