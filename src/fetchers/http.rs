//! HTTP-backed option fetcher
//!
//! GETs a templated endpoint and maps a JSON array into options. The request
//! timeout is enforced here, so a slow endpoint surfaces as an error instead
//! of stalling resolution.

use crate::connector::{DynamicOptionsFetcher, FetchContext};
use crate::error::{Error, Result};
use crate::forms::FormOption;
use crate::template::{self, TemplateContext};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Endpoint description for an HTTP option list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpOptionsConfig {
    /// URL template, e.g. `https://api.example.com/lists?object={{ state.object }}`
    pub url: String,

    /// Header templates, e.g. `Authorization: Bearer {{ config.api_key }}`
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Dot path to the array in the response body (root when absent)
    #[serde(default)]
    pub records_path: Option<String>,

    /// Key holding the option value in each record
    #[serde(default = "default_value_key")]
    pub value_key: String,

    /// Key holding the option label in each record
    #[serde(default = "default_title_key")]
    pub title_key: String,

    /// Request timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_value_key() -> String {
    "id".to_string()
}

fn default_title_key() -> String {
    "name".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl HttpOptionsConfig {
    /// Create a config with default keys and timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            records_path: None,
            value_key: default_value_key(),
            title_key: default_title_key(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Add a header template
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the records path
    #[must_use]
    pub fn records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Set the value and title keys
    #[must_use]
    pub fn keys(mut self, value_key: impl Into<String>, title_key: impl Into<String>) -> Self {
        self.value_key = value_key.into();
        self.title_key = title_key.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Dynamic fetcher backed by an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpOptionsFetcher {
    config: HttpOptionsConfig,
    client: Client,
}

impl HttpOptionsFetcher {
    /// Create a fetcher, building its HTTP client
    ///
    /// Fails when the URL or a header template names an unknown variable root.
    pub fn new(config: HttpOptionsConfig) -> Result<Self> {
        template::check_template(&config.url)?;
        for value in config.headers.values() {
            template::check_template(value)?;
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("syncform/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, client })
    }

    /// Endpoint configuration
    pub fn config(&self) -> &HttpOptionsConfig {
        &self.config
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            Error::Http(e)
        }
    }

    /// Turn the response body into options
    fn extract_options(&self, body: &Value) -> Result<Vec<FormOption>> {
        let records = match &self.config.records_path {
            Some(path) => path
                .split('.')
                .filter(|p| !p.is_empty())
                .try_fold(body, |current, part| current.get(part))
                .ok_or_else(|| Error::decode(format!("No value at records path '{path}'")))?,
            None => body,
        };

        let items = records
            .as_array()
            .ok_or_else(|| Error::decode("Options response is not an array"))?;

        items.iter().map(|item| self.to_option(item)).collect()
    }

    fn to_option(&self, item: &Value) -> Result<FormOption> {
        match item {
            Value::Object(record) => {
                let value = record
                    .get(&self.config.value_key)
                    .filter(|v| !v.is_null())
                    .cloned()
                    .ok_or_else(|| {
                        Error::decode(format!(
                            "Option record is missing '{}'",
                            self.config.value_key
                        ))
                    })?;
                let title = match record.get(&self.config.title_key) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) if !other.is_null() => other.to_string(),
                    _ => label_of(&value),
                };
                Ok(FormOption::new(value, title))
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                Ok(FormOption::new(item.clone(), label_of(item)))
            }
            other => Err(Error::decode(format!("Unsupported option record: {other}"))),
        }
    }
}

fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl DynamicOptionsFetcher for HttpOptionsFetcher {
    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<FormOption>> {
        let tctx = TemplateContext::for_fetch(ctx);
        let url = Url::parse(&template::render_url(&self.config.url, &tctx)?)?;

        let mut request = self.client.get(url.clone());
        for (name, value) in &self.config.headers {
            request = request.header(name.as_str(), template::render(value, &tctx)?);
        }

        debug!(field = ctx.field, url = %url, "Fetching options over HTTP");
        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body: Value = response.json().await.map_err(|e| self.map_send_error(e))?;
        self.extract_options(&body)
    }
}
