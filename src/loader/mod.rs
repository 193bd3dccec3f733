//! YAML Loader module
//!
//! Parse form definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `FormDefinition` - Declarative form definition
//! - YAML parsing, then validation into a `FormSchema`

mod parser;
mod types;

pub use parser::{load_schema, load_schema_from_str, parse_definition};
pub use types::FormDefinition;

#[cfg(test)]
mod tests;
