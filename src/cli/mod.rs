//! CLI module
//!
//! Command-line interface over the registries and form schemas.
//!
//! # Commands
//!
//! - `registry` - List registered keys per capability axis
//! - `schemas` - List built-in form schemas
//! - `validate` - Validate a form schema
//! - `active` - Show active groups and fields for a form state
//! - `options` - Resolve field options
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve, AppState, ServerConfig};
