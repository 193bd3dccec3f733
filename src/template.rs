//! Template interpolation for fetcher endpoints
//!
//! Handles `{{ variable }}` interpolation in URLs and headers.
//! Supports nested access like `{{ config.api_key }}` and `{{ state.object }}`.

use crate::connector::FetchContext;
use crate::error::{Error, Result};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}")
        .expect("template regex is valid")
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Current form state
    pub state: Value,
    /// App configuration values
    pub config: Value,
    /// Warehouse configuration values
    pub warehouse: Value,
    /// Additional context variables
    pub vars: Value,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the context a fetcher sees for one request
    pub fn for_fetch(ctx: &FetchContext<'_>) -> Self {
        Self {
            state: ctx.state.to_json(),
            config: ctx.session.app_config.clone(),
            warehouse: ctx.session.warehouse_config.clone(),
            vars: serde_json::json!({ "field": ctx.field }),
        }
    }

    /// Set form state values
    pub fn set_state(&mut self, state: Value) -> &mut Self {
        self.state = state;
        self
    }

    /// Set app config values
    pub fn set_config(&mut self, config: Value) -> &mut Self {
        self.config = config;
        self
    }

    /// Get a value by path (e.g., "state.object")
    pub fn get(&self, path: &str) -> Option<&Value> {
        let parts: Vec<&str> = path.split('.').collect();
        let (first, rest) = parts.split_first()?;

        let root = match *first {
            "state" => &self.state,
            "config" => &self.config,
            "warehouse" => &self.warehouse,
            "vars" => &self.vars,
            // Bare names resolve against the form state, then the app config
            _ if rest.is_empty() => {
                return get_nested_value(&self.state, &parts)
                    .or_else(|| get_nested_value(&self.config, &parts));
            }
            _ => return None,
        };

        get_nested_value(root, rest)
    }
}

/// Get a nested value from a JSON value by path
fn get_nested_value<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for part in path {
        match current {
            Value::Object(map) => {
                current = map.get(*part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Roots a dotted template variable may start with
pub const TEMPLATE_ROOTS: &[&str] = &["state", "config", "warehouse", "vars"];

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    render_with(template, ctx, |_, value| value_to_string(value))
}

/// Render a URL template
///
/// Values substituted into the scheme or authority (e.g. a per-tenant
/// `{{ config.base_url }}`) are inserted as-is. Values in the path, query or
/// fragment are percent-encoded.
pub fn render_url(template: &str, ctx: &TemplateContext) -> Result<String> {
    let base_end = base_end(template);
    render_with(template, ctx, |offset, value| {
        let raw = value_to_string(value);
        if offset < base_end {
            raw
        } else {
            url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
        }
    })
}

/// Offset in the template where the path, query or fragment starts
fn base_end(template: &str) -> usize {
    let authority_start = template.find("://").map_or(0, |i| i + 3);
    template[authority_start..]
        .find(['/', '?', '#'])
        .map_or(template.len(), |i| authority_start + i)
}

fn render_with(
    template: &str,
    ctx: &TemplateContext,
    encode: impl Fn(usize, &Value) -> String,
) -> Result<String> {
    let mut missing = Vec::new();

    let rendered = TEMPLATE_REGEX.replace_all(template, |cap: &Captures<'_>| {
        let var_path = &cap[1];
        match ctx.get(var_path) {
            Some(value) => encode(cap.get(0).map_or(0, |m| m.start()), value),
            None => {
                missing.push(var_path.to_string());
                String::new()
            }
        }
    });

    if missing.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::undefined_var(missing.join(", ")))
    }
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

/// Extract all variable names from a template
pub fn extract_variables(template: &str) -> Vec<String> {
    TEMPLATE_REGEX
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Reject dotted variables whose root is not one of [`TEMPLATE_ROOTS`]
///
/// Such a variable can never resolve, so a typo like `{{ confg.api_key }}`
/// is caught when the template is configured rather than on first use.
pub fn check_template(template: &str) -> Result<()> {
    if !has_templates(template) {
        return Ok(());
    }
    for var in extract_variables(template) {
        if let Some((root, _)) = var.split_once('.') {
            if !TEMPLATE_ROOTS.contains(&root) {
                return Err(Error::template(format!(
                    "Unknown root '{root}' in {{{{ {var} }}}} (expected one of: {})",
                    TEMPLATE_ROOTS.join(", ")
                )));
            }
        }
    }
    Ok(())
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // For complex types, use JSON serialization
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.set_state(json!({"object": "CONTACT", "list": {"id": 42}}));
        ctx.set_config(json!({"api_key": "sg_123", "region": "us"}));
        ctx
    }

    #[test]
    fn test_state_and_config_substitution() {
        let result = render(
            "https://{{ config.region }}.example.com/objects/{{ state.object }}",
            &ctx(),
        )
        .unwrap();
        assert_eq!(result, "https://us.example.com/objects/CONTACT");
    }

    #[test]
    fn test_nested_value() {
        let result = render("list={{ state.list.id }}", &ctx()).unwrap();
        assert_eq!(result, "list=42");
    }

    #[test]
    fn test_bare_names_prefer_state() {
        let mut ctx = ctx();
        ctx.set_config(json!({"object": "FROM_CONFIG", "api_key": "k"}));

        assert_eq!(render("{{ object }}", &ctx).unwrap(), "CONTACT");
        assert_eq!(render("{{ api_key }}", &ctx).unwrap(), "k");
    }

    #[test]
    fn test_undefined_variable() {
        let result = render("{{ state.mode }} {{ config.missing }}", &ctx());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("state.mode"));
        assert!(err.contains("config.missing"));
    }

    #[test]
    fn test_render_url_encodes_path_and_query() {
        let mut ctx = TemplateContext::new();
        ctx.set_state(json!({"object": "Custom Object/1"}));

        let result = render_url("/objects?name={{ state.object }}", &ctx).unwrap();
        assert_eq!(result, "/objects?name=Custom+Object%2F1");

        let result = render_url(
            "https://api.example.com/objects/{{ state.object }}",
            &ctx,
        )
        .unwrap();
        assert_eq!(result, "https://api.example.com/objects/Custom+Object%2F1");
    }

    #[test]
    fn test_render_url_keeps_base_raw() {
        let mut ctx = TemplateContext::new();
        ctx.set_state(json!({"object": "a b"}));
        ctx.set_config(json!({
            "base_url": "https://acme.my.example.com:8443",
            "subdomain": "acme"
        }));

        let result = render_url("{{ config.base_url }}/lists?object={{ state.object }}", &ctx)
            .unwrap();
        assert_eq!(result, "https://acme.my.example.com:8443/lists?object=a+b");

        let result = render_url("https://{{ config.subdomain }}.example.com/lists", &ctx).unwrap();
        assert_eq!(result, "https://acme.example.com/lists");
    }

    #[test]
    fn test_dotted_path_needs_known_root() {
        let ctx = ctx();
        assert!(matches!(
            render("{{ object.id }}", &ctx),
            Err(Error::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn test_check_template() {
        assert!(check_template("https://api.example.com/lists").is_ok());
        assert!(check_template("{{ config.base_url }}/x?o={{ object }}").is_ok());
        assert!(check_template("{{ vars.field }} {{ warehouse.project_id }}").is_ok());

        let err = check_template("Bearer {{ confg.api_key }}").unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
        assert!(err.to_string().contains("confg"));
    }

    #[test]
    fn test_whitespace_in_template() {
        let ctx = ctx();
        assert_eq!(render("{{state.object}}", &ctx).unwrap(), "CONTACT");
        assert_eq!(render("{{  state.object  }}", &ctx).unwrap(), "CONTACT");
    }

    #[test]
    fn test_has_templates() {
        assert!(has_templates("{{ state.object }}"));
        assert!(!has_templates("no templates here"));
        assert!(!has_templates("{ not a template }"));
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_variables("{{ config.a }} and {{ state.b }}");
        assert_eq!(vars, vec!["config.a", "state.b"]);
    }
}
