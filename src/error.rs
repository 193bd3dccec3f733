//! Error types for syncform
//!
//! This module defines the error hierarchy for the registry and form engine.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for syncform
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Registry Errors
    // ============================================================================
    #[error("Duplicate binding for key '{key}' in {axis} registry")]
    DuplicateKey { axis: &'static str, key: String },

    #[error("No binding for key '{key}' in {axis} registry")]
    UnboundKey { axis: &'static str, key: String },

    // ============================================================================
    // Schema Errors
    // ============================================================================
    #[error("Schema '{schema}' has an activation cycle: {}", .chain.join(" -> "))]
    SchemaCycle { schema: String, chain: Vec<String> },

    #[error("Field '{field}' references {kind} options '{key}' which is not registered")]
    UnresolvableOptionsRef {
        field: String,
        kind: &'static str,
        key: String,
    },

    #[error("Field '{field}' belongs to unknown group '{group}'")]
    UnknownFieldGroup { field: String, group: String },

    #[error("Group '{group}' depends on unknown field '{field}'")]
    UnknownDependency { group: String, field: String },

    #[error("Invalid schema '{schema}': {message}")]
    InvalidSchema { schema: String, message: String },

    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    #[error("Unknown group: {group}")]
    UnknownGroup { group: String },

    // ============================================================================
    // Options Errors
    // ============================================================================
    #[error("Field '{field}' has no options reference")]
    NoOptionsRef { field: String },

    #[error("Could not load options for field '{field}': {source}")]
    OptionsFetch {
        field: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Missing value for form field: {field}")]
    MissingFormValue { field: String },

    #[error("Missing session context: {what}")]
    MissingContext { what: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a duplicate key error
    pub fn duplicate_key(axis: &'static str, key: impl ToString) -> Self {
        Self::DuplicateKey {
            axis,
            key: key.to_string(),
        }
    }

    /// Create an unbound key error
    pub fn unbound_key(axis: &'static str, key: impl ToString) -> Self {
        Self::UnboundKey {
            axis,
            key: key.to_string(),
        }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            schema: schema.into(),
            message: message.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Create an unknown group error
    pub fn unknown_group(group: impl Into<String>) -> Self {
        Self::UnknownGroup {
            group: group.into(),
        }
    }

    /// Wrap a fetcher failure for the given field
    pub fn options_fetch(field: impl Into<String>, source: Error) -> Self {
        Self::OptionsFetch {
            field: field.into(),
            source: Box::new(source),
        }
    }

    /// Create a missing form value error
    pub fn missing_value(field: impl Into<String>) -> Self {
        Self::MissingFormValue {
            field: field.into(),
        }
    }

    /// Create a missing context error
    pub fn missing_context(what: impl Into<String>) -> Self {
        Self::MissingContext { what: what.into() }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Option fetches are retried by re-invoking resolution, so a fetch
    /// failure is retryable whenever its cause is.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::OptionsFetch { source, .. } => source.is_retryable(),
            Error::Http(_) | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this error should stop the process (or the schema) from starting
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::DuplicateKey { .. }
                | Error::SchemaCycle { .. }
                | Error::UnresolvableOptionsRef { .. }
                | Error::UnknownFieldGroup { .. }
                | Error::UnknownDependency { .. }
                | Error::InvalidSchema { .. }
        )
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for syncform
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
