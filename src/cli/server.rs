//! HTTP server mode for REST API access to schemas and options

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::builtin;
use crate::cli::runner::activation_report;
use crate::connector::SessionContext;
use crate::error::{Error, Result, ResultExt};
use crate::forms::{FormSchema, FormState, OptionsResolver};
use crate::loader::{load_schema, load_schema_from_str};
use crate::registry::CapabilityRegistries;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Frozen registries from bootstrap
    pub registries: Arc<CapabilityRegistries>,
    /// Directory with additional schema YAML files
    pub schemas_dir: Option<PathBuf>,
}

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    resolver: OptionsResolver,
    schemas: Arc<BTreeMap<String, Arc<FormSchema>>>,
}

impl AppState {
    /// Load every built-in schema plus the YAML files in `schemas_dir`
    ///
    /// Schemas are validated once here; a bad file fails startup.
    pub fn load(config: &ServerConfig) -> Result<Self> {
        let registries = &config.registries;
        let mut schemas = BTreeMap::new();

        for name in builtin::list_builtin_schemas() {
            let schema = load_schema(name, registries)?;
            schemas.insert(schema.name().to_string(), Arc::new(schema));
        }

        if let Some(dir) = &config.schemas_dir {
            for schema in load_schema_dir(dir, registries)? {
                if schemas.contains_key(schema.name()) {
                    return Err(Error::config(format!(
                        "Schema '{}' in {} shadows another schema",
                        schema.name(),
                        dir.display()
                    )));
                }
                schemas.insert(schema.name().to_string(), Arc::new(schema));
            }
        }

        Ok(Self {
            resolver: OptionsResolver::new(Arc::clone(registries)),
            schemas: Arc::new(schemas),
        })
    }

    fn schema(&self, name: &str) -> std::result::Result<&Arc<FormSchema>, Response> {
        self.schemas.get(name).ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                format!("Schema not found: {name}"),
            )
        })
    }
}

/// Every `*.yaml` / `*.yml` file in `dir`, sorted by file name
fn load_schema_dir(dir: &FsPath, registries: &CapabilityRegistries) -> Result<Vec<FormSchema>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema {}", path.display()))?;
            load_schema_from_str(&content, registries)
        })
        .collect()
}

/// Request body for the activation endpoint
#[derive(Debug, Default, Deserialize)]
struct ActiveRequest {
    #[serde(default)]
    state: FormState,
}

/// Request body for the options endpoint
#[derive(Debug, Default, Deserialize)]
struct OptionsRequest {
    #[serde(default)]
    state: FormState,
    #[serde(default)]
    session: SessionContext,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

fn ok_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::error(msg))).into_response()
}

/// HTTP status for an error surfaced by a handler
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::UnknownField { .. } | Error::UnknownGroup { .. } => StatusCode::NOT_FOUND,
        Error::OptionsFetch { source, .. } => match source.as_ref() {
            Error::MissingFormValue { .. } | Error::MissingContext { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::BAD_GATEWAY,
        },
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Build the router over already-loaded state
pub fn router(state: AppState) -> Router {
    // Build CORS layer - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/registry", get(registry_summary))
        .route("/schemas", get(list_schemas))
        .route("/schemas/:name", get(get_schema))
        .route("/schemas/:name/active", post(active_fields))
        .route("/schemas/:name/options/:field", post(resolve_options))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    let state = AppState::load(&config)?;
    info!(schemas = state.schemas.len(), "Schemas loaded");
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Registered keys per capability axis
async fn registry_summary(State(state): State<AppState>) -> Response {
    ok_response(state.resolver.registries().summary())
}

/// Schema names
async fn list_schemas(State(state): State<AppState>) -> Response {
    let names: Vec<&str> = state.schemas.keys().map(String::as_str).collect();
    ok_response(json!({ "schemas": names }))
}

/// One schema's fields and groups
async fn get_schema(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.schema(&name) {
        Ok(schema) => ok_response(schema.as_ref()),
        Err(response) => response,
    }
}

/// Group states and active fields for a form state
async fn active_fields(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<ActiveRequest>>,
) -> Response {
    let schema = match state.schema(&name) {
        Ok(schema) => schema,
        Err(response) => return response,
    };
    let Json(req) = body.unwrap_or_default();

    ok_response(activation_report(schema, &req.state))
}

/// Options for one field
async fn resolve_options(
    State(state): State<AppState>,
    Path((name, field)): Path<(String, String)>,
    body: Option<Json<OptionsRequest>>,
) -> Response {
    let schema = match state.schema(&name) {
        Ok(schema) => Arc::clone(schema),
        Err(response) => return response,
    };
    let Json(req) = body.unwrap_or_default();

    match state
        .resolver
        .resolve(&schema, &field, &req.state, &req.session)
        .await
    {
        Ok(resolved) => ok_response(resolved),
        Err(e) => {
            warn!(schema = %name, field = %field, error = %e, "Options request failed");
            error_response(status_for(&e), e.to_string())
        }
    }
}
