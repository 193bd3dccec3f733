// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # syncform
//!
//! Connector capability registries and a declarative form-schema engine for
//! configuring warehouse-to-app syncs.
//!
//! ## Features
//!
//! - **Typed Registries**: Exactly one implementation per closed key, per axis
//! - **Form Schemas**: Fields in groups, validated once against the registries
//! - **Group Activation**: Groups appear as the fields they depend on are filled in
//! - **Options Resolution**: Static lists and state-dependent fetchers, never cached
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use syncform::{bootstrap, load_schema, OptionsResolver, FormState, SessionContext};
//!
//! #[tokio::main]
//! async fn main() -> syncform::Result<()> {
//!     let manifest = syncform::config::load_manifest_from_str(syncform::DEFAULT_MANIFEST)?;
//!     let registries = bootstrap(&manifest, |_| Ok(()))?;
//!
//!     let schema = load_schema("generic_object_radio_group", &registries)?;
//!     let state = FormState::new().with("object", "CONTACT");
//!     assert_eq!(schema.active_fields(&state), vec!["object", "mode"]);
//!
//!     let session = SessionContext::for_app(
//!         syncform::ExternalAppType::Intercom,
//!         serde_json::json!({ "access_token": "..." }),
//!     );
//!     let resolver = OptionsResolver::new(registries);
//!     let modes = resolver.resolve(&schema, "mode", &state, &session).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  bootstrap(manifest, hook) → Arc<CapabilityRegistries> (frozen)  │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌───────────┬───────────┬───────┴───────┬─────────────┬────────────┐
//! │ Warehouse │    App    │  JDBC helper  │ Object sink │  Options   │
//! │ connector │ connector │               │             │  fetchers  │
//! └───────────┴───────────┴───────────────┴─────────────┴────────────┘
//!                                 │
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  FormSchema ─ GroupActivationEngine ─ OptionsResolver            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Closed key enumerations and type aliases
pub mod types;

/// Capability traits and fetch context
pub mod connector;

/// Typed capability registries
pub mod registry;

/// Form schemas, activation and options resolution
pub mod forms;

/// Built-in option fetchers
pub mod fetchers;

/// Template interpolation
pub mod template;

/// Registry manifest configuration
pub mod config;

/// Manifest-backed capability implementations
pub mod catalog;

/// Registry bootstrap
pub mod bootstrap;

/// Built-in schemas and manifest
pub mod builtin;

/// YAML loader for form definitions
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use bootstrap::bootstrap;
pub use builtin::DEFAULT_MANIFEST;
pub use connector::{FetchContext, SessionContext};
pub use forms::{FormSchema, FormState, GroupActivationEngine, OptionsResolver};
pub use loader::{load_schema, load_schema_from_str};
pub use registry::{CapabilityRegistries, CapabilityRegistriesBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
