//! Option reference keys
//!
//! Keys that form fields use in their `OptionsRef` to name a fetcher.

// Bound by `bootstrap::register_builtin_fetchers`
pub const OBJECT: &str = "OBJECT";
pub const SUB_RESOURCE: &str = "SUB_RESOURCE";
pub const SYNC_MODE: &str = "SYNC_MODE";
pub const BQ_LOCATIONS: &str = "BQ_LOCATIONS";

// Bound by the default manifest
pub const SENDGRID_LISTS: &str = "SENDGRID_LISTS";
pub const CIO_EVENT_TYPES: &str = "CIO_EVENT_TYPES";

/// Keys with no default binding
///
/// These need per-tenant credentials or an OAuth client, so the process
/// embedding syncform binds them: through the `bootstrap` hook, or as an
/// `http_options` entry in its own manifest. A schema that references one
/// fails validation until it is bound.
pub const COLLABORATOR_KEYS: &[&str] = &[GADS_ACCOUNT_ID, GADS_LOGIN_ACCOUNT_ID, CIO_PRIMARY_KEYS];

pub const GADS_ACCOUNT_ID: &str = "GADS_ACCOUNT_ID";
pub const GADS_LOGIN_ACCOUNT_ID: &str = "GADS_LOGIN_ACCOUNT_ID";
pub const CIO_PRIMARY_KEYS: &str = "CIO_PRIMARY_KEYS";
