//! Tests for built-in option fetchers

use super::*;
use crate::bootstrap::bootstrap_manifest;
use crate::builtin::DEFAULT_MANIFEST;
use crate::config::load_manifest_from_str;
use crate::connector::{DynamicOptionsFetcher, FetchContext, SessionContext, StaticOptionsFetcher};
use crate::error::Error;
use crate::forms::FormState;
use crate::registry::CapabilityRegistries;
use crate::types::ExternalAppType;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn empty_registries() -> CapabilityRegistries {
    CapabilityRegistries::builder().build()
}

fn default_registries() -> Arc<CapabilityRegistries> {
    bootstrap_manifest(&load_manifest_from_str(DEFAULT_MANIFEST).unwrap()).unwrap()
}

fn ctx<'a>(
    field: &'a str,
    state: &'a FormState,
    session: &'a SessionContext,
    registries: &'a CapabilityRegistries,
) -> FetchContext<'a> {
    FetchContext {
        field,
        state,
        session,
        registries,
    }
}

// ============================================================================
// HTTP Fetcher Tests
// ============================================================================

#[tokio::test]
async fn test_http_fetcher_maps_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/marketing/lists"))
        .and(header("Authorization", "Bearer sg_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"id": "l1", "name": "Newsletter"},
                {"id": "l2", "name": "Beta users"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let fetcher = HttpOptionsFetcher::new(
        HttpOptionsConfig::new(format!("{}/v3/marketing/lists", mock_server.uri()))
            .header("Authorization", "Bearer {{ config.api_key }}")
            .records_path("result"),
    )
    .unwrap();

    let registries = empty_registries();
    let state = FormState::new();
    let session = SessionContext::for_app(ExternalAppType::Sendgrid, json!({"api_key": "sg_123"}));

    let options = fetcher
        .fetch(&ctx("list", &state, &session, &registries))
        .await
        .unwrap();

    assert_eq!(options.len(), 2);
    assert_eq!(options[0].value, json!("l1"));
    assert_eq!(options[0].title, "Newsletter");
    assert_eq!(options[1].title, "Beta users");
}

#[tokio::test]
async fn test_http_fetcher_templates_state_into_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fields"))
        .and(query_param("object", "Custom Object"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": 1, "label": "Email"},
            {"key": 2}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpOptionsFetcher::new(
        HttpOptionsConfig::new(format!(
            "{}/fields?object={{{{ state.object }}}}",
            mock_server.uri()
        ))
        .keys("key", "label"),
    )
    .unwrap();

    let registries = empty_registries();
    let state = FormState::new().with("object", "Custom Object");
    let session = SessionContext::new();

    let options = fetcher
        .fetch(&ctx("field", &state, &session, &registries))
        .await
        .unwrap();

    assert_eq!(options[0].value, json!(1));
    assert_eq!(options[0].title, "Email");
    // Title falls back to the value
    assert_eq!(options[1].title, "2");
}

#[tokio::test]
async fn test_http_fetcher_scalar_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/event_types"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"types": ["page", "track"]}})),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpOptionsFetcher::new(
        HttpOptionsConfig::new(format!("{}/event_types", mock_server.uri()))
            .records_path("data.types"),
    )
    .unwrap();

    let registries = empty_registries();
    let state = FormState::new();
    let session = SessionContext::new();

    let options = fetcher
        .fetch(&ctx("event", &state, &session, &registries))
        .await
        .unwrap();

    let titles: Vec<&str> = options.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, vec!["page", "track"]);
}

#[tokio::test]
async fn test_http_fetcher_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&mock_server)
        .await;

    let fetcher =
        HttpOptionsFetcher::new(HttpOptionsConfig::new(format!("{}/lists", mock_server.uri())))
            .unwrap();

    let registries = empty_registries();
    let state = FormState::new();
    let session = SessionContext::new();

    let err = fetcher
        .fetch(&ctx("list", &state, &session, &registries))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad token");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_fetcher_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpOptionsFetcher::new(
        HttpOptionsConfig::new(format!("{}/slow", mock_server.uri()))
            .timeout(Duration::from_millis(50)),
    )
    .unwrap();

    let registries = empty_registries();
    let state = FormState::new();
    let session = SessionContext::new();

    let err = fetcher
        .fetch(&ctx("slow", &state, &session, &registries))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_http_fetcher_decode_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/object"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/no_ids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "x"}])))
        .mount(&mock_server)
        .await;

    let registries = empty_registries();
    let state = FormState::new();
    let session = SessionContext::new();

    for endpoint in ["object", "no_ids"] {
        let fetcher = HttpOptionsFetcher::new(HttpOptionsConfig::new(format!(
            "{}/{endpoint}",
            mock_server.uri()
        )))
        .unwrap();

        let err = fetcher
            .fetch(&ctx("f", &state, &session, &registries))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "{endpoint}: {err:?}");
    }
}

#[tokio::test]
async fn test_http_fetcher_undefined_variable() {
    let fetcher = HttpOptionsFetcher::new(HttpOptionsConfig::new(
        "http://127.0.0.1:1/lists?object={{ state.object }}",
    ))
    .unwrap();

    let registries = empty_registries();
    let state = FormState::new();
    let session = SessionContext::new();

    let err = fetcher
        .fetch(&ctx("list", &state, &session, &registries))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UndefinedVariable { .. }));
}

#[tokio::test]
async fn test_http_fetcher_base_url_from_config() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/lists"))
        .and(query_param("object", "Custom Object"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "name": "All accounts"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpOptionsFetcher::new(HttpOptionsConfig::new(
        "{{ config.base_url }}/services/lists?object={{ state.object }}",
    ))
    .unwrap();

    let registries = empty_registries();
    let state = FormState::new().with("object", "Custom Object");
    let session = SessionContext::for_app(
        ExternalAppType::Salesforce,
        json!({"base_url": mock_server.uri()}),
    );

    let options = fetcher
        .fetch(&ctx("list", &state, &session, &registries))
        .await
        .unwrap();

    assert_eq!(options.len(), 1);
    assert_eq!(options[0].value, json!("a1"));
}

#[test]
fn test_http_fetcher_rejects_unknown_template_root() {
    let err = HttpOptionsFetcher::new(
        HttpOptionsConfig::new("https://api.example.com/lists")
            .header("Authorization", "Bearer {{ confg.api_key }}"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Template { .. }));

    let err =
        HttpOptionsFetcher::new(HttpOptionsConfig::new("{{ sesion.base_url }}/lists")).unwrap_err();
    assert!(matches!(err, Error::Template { .. }));
}

#[test]
fn test_http_options_config_defaults() {
    let config: HttpOptionsConfig =
        serde_yaml::from_str("url: https://api.example.com/lists").unwrap();
    assert_eq!(config.value_key, "id");
    assert_eq!(config.title_key, "name");
    assert_eq!(config.timeout_ms, 10_000);
    assert!(config.records_path.is_none());
}

// ============================================================================
// App Sync Fetcher Tests
// ============================================================================

#[tokio::test]
async fn test_object_options_from_app_connector() {
    let registries = default_registries();
    let state = FormState::new();
    let session = SessionContext::for_app(ExternalAppType::Intercom, json!({}));

    let options = ObjectOptionsFetcher
        .fetch(&ctx("object", &state, &session, &registries))
        .await
        .unwrap();

    let values: Vec<&str> = options.iter().filter_map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["COMPANY", "CONTACT", "USER", "LEAD"]);
    assert_eq!(options[0].title, "Company");
}

#[tokio::test]
async fn test_sync_mode_options_depend_on_object() {
    let registries = default_registries();
    let session = SessionContext::for_app(ExternalAppType::Intercom, json!({}));

    let company = FormState::new().with(OBJECT_FIELD, "COMPANY");
    let options = SyncModeOptionsFetcher
        .fetch(&ctx("mode", &company, &session, &registries))
        .await
        .unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].value, json!("UPSERT"));
    assert_eq!(options[0].title, "Upsert");

    let contact = FormState::new().with(OBJECT_FIELD, "CONTACT");
    let options = SyncModeOptionsFetcher
        .fetch(&ctx("mode", &contact, &session, &registries))
        .await
        .unwrap();
    let values: Vec<&str> = options.iter().filter_map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["INSERT", "UPDATE", "UPSERT"]);
}

#[tokio::test]
async fn test_sub_resource_options() {
    let registries = default_registries();
    let session = SessionContext::for_app(ExternalAppType::Mailchimp, json!({}));
    let state = FormState::new().with(OBJECT_FIELD, "AUDIENCE");

    let options = SubResourceOptionsFetcher
        .fetch(&ctx("sub_resource", &state, &session, &registries))
        .await
        .unwrap();

    assert_eq!(options.len(), 2);
    assert_eq!(options[0].value, json!("newsletter"));
    assert_eq!(options[0].title, "Newsletter");
}

#[tokio::test]
async fn test_app_sync_fetchers_need_object_and_app() {
    let registries = default_registries();
    let state = FormState::new();

    let session = SessionContext::for_app(ExternalAppType::Intercom, json!({}));
    let err = SyncModeOptionsFetcher
        .fetch(&ctx("mode", &state, &session, &registries))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingFormValue { ref field } if field == OBJECT_FIELD));

    let no_app = SessionContext::new();
    let err = ObjectOptionsFetcher
        .fetch(&ctx("object", &state, &no_app, &registries))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingContext { .. }));

    let unbound = SessionContext::for_app(ExternalAppType::Kafka, json!({}));
    let err = ObjectOptionsFetcher
        .fetch(&ctx("object", &state, &unbound, &registries))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnboundKey { axis: "app connector", .. }));
}

// ============================================================================
// Static Fetcher Tests
// ============================================================================

#[test]
fn test_bq_locations() {
    let options = BqLocationsFetcher.options();
    assert!(options.len() > 20);
    assert_eq!(options[0].value, json!("US"));
    assert!(options.iter().any(|o| o.value == json!("europe-west2")));
}

#[test]
fn test_builtin_refs_are_registered() {
    let registries = default_registries();
    for key in [refs::OBJECT, refs::SUB_RESOURCE, refs::SYNC_MODE, refs::SENDGRID_LISTS] {
        assert!(
            registries.dynamic_option_fetchers().contains_key(key),
            "{key} not bound"
        );
    }
    assert!(registries
        .static_option_fetchers()
        .contains_key(refs::BQ_LOCATIONS));
    assert!(registries
        .static_option_fetchers()
        .contains_key(refs::CIO_EVENT_TYPES));
}

#[test]
fn test_collaborator_keys_unbound_by_default() {
    let registries = default_registries();
    for key in refs::COLLABORATOR_KEYS {
        assert!(
            !registries.dynamic_option_fetchers().contains_key(*key),
            "{key} should be left to the embedding process"
        );
    }

    let err = crate::loader::load_schema_from_str(
        r#"
name: gads
groups: [{name: MAIN}]
fields:
  - id: account
    title: Account
    type: DROP_DOWN
    group: MAIN
    options_ref: {type: DYNAMIC, key: GADS_LOGIN_ACCOUNT_ID}
"#,
        &registries,
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnresolvableOptionsRef { .. }));
}
