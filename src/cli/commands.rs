//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Connector registry and form schema CLI
#[derive(Parser, Debug)]
#[command(name = "syncform")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Registry manifest (YAML); the embedded default when absent
    #[arg(short, long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered keys per capability axis
    Registry,

    /// List built-in form schemas
    Schemas,

    /// Validate a form schema against the registries
    Validate {
        /// Built-in schema name or YAML path
        #[arg(short, long)]
        schema: String,
    },

    /// Show which groups and fields are active for a form state
    Active {
        /// Built-in schema name or YAML path
        #[arg(short, long)]
        schema: String,

        /// Form state JSON object
        #[arg(long, default_value = "{}")]
        state_json: String,
    },

    /// Resolve the options of a field
    Options {
        /// Built-in schema name or YAML path
        #[arg(short, long)]
        schema: String,

        /// Field id; every active field with options when absent
        #[arg(long)]
        field: Option<String>,

        /// Form state JSON object
        #[arg(long, default_value = "{}")]
        state_json: String,

        /// Session context JSON (app_type, app_config, ...)
        #[arg(long, default_value = "{}")]
        session_json: String,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Directory with additional schema YAML files
        #[arg(long)]
        schemas_dir: Option<PathBuf>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_command() {
        let cli = Cli::parse_from([
            "syncform",
            "--manifest",
            "m.yaml",
            "options",
            "--schema",
            "generic_object_radio_group",
            "--field",
            "mode",
            "--state-json",
            r#"{"object":"CONTACT"}"#,
        ]);

        assert_eq!(cli.manifest, Some(PathBuf::from("m.yaml")));
        match cli.command {
            Commands::Options {
                schema,
                field,
                state_json,
                session_json,
            } => {
                assert_eq!(schema, "generic_object_radio_group");
                assert_eq!(field.as_deref(), Some("mode"));
                assert_eq!(state_json, r#"{"object":"CONTACT"}"#);
                assert_eq!(session_json, "{}");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["syncform", "registry", "-v", "--format", "pretty"]);
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(matches!(cli.command, Commands::Registry));
    }
}
