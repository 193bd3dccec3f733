//! Declarative form schemas
//!
//! Field and group descriptors, validated once at construction, plus the
//! engines that read a partial `FormState`.
//!
//! # Overview
//!
//! The forms module provides:
//! - `FormSchema` - Fields grouped into named groups, validated on construction
//! - `GroupActivationEngine` - Which groups are active for a form state
//! - `OptionsResolver` - Selectable values for a field, static or fetched

mod activation;
mod resolver;
mod schema;
mod types;

pub use activation::GroupActivationEngine;
pub use resolver::OptionsResolver;
pub use schema::{FormSchema, FormSchemaBuilder};
pub use types::{
    is_empty_value, ActivationRule, FieldDescriptor, FieldType, FormOption, FormState,
    GroupDescriptor, GroupState, OptionsRef, OptionsRefKind, ResolvedOptions,
};
