use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use graphql_openapi::{Converter, CustomPlurals, OutputFormat, render};
use runtime::Config;
use tracing::{Level, debug, info};

mod runtime;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the converter. Any argument given here overrides the config file and environment.
#[derive(Debug, Default, clap::Parser)]
#[command(
    styles = STYLES,
    about = "GraphQL to OpenAPI - convert a GraphQL schema into an OpenAPI 3.0 document",
)]
struct Args {
    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// The GraphQL schema file to convert
    #[arg(long, short = 's')]
    schema: Option<PathBuf>,

    /// The OpenAPI file to write
    ///
    /// [default: openapi.yaml]
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Output format: yaml or json
    ///
    /// [default: yaml]
    #[arg(long, short = 'f')]
    format: Option<OutputFormat>,

    /// API title
    ///
    /// [default: the first line of the schema description, or "Converted from GraphQL"]
    #[arg(long)]
    title: Option<String>,

    /// API version
    ///
    /// [default: 1.0.0]
    #[arg(long)]
    version: Option<String>,

    /// Base URL for the API
    #[arg(long)]
    base_url: Option<String>,

    /// Path prefix for all endpoints (e.g. "/api/v1")
    #[arg(long)]
    path_prefix: Option<String>,

    /// Enable REST pattern detection
    ///
    /// [default: true]
    #[arg(long, value_name = "BOOL")]
    detect_rest_patterns: Option<bool>,

    /// Custom pluralization suffix rules as a JSON file
    #[arg(long = "pluralize-suffixes")]
    custom_plurals: Option<PathBuf>,

    /// Comma-separated suffixes that get "es" added
    ///
    /// [default: s,x,z,ch,sh]
    #[arg(long, value_delimiter = ',')]
    pluralize_es_suffixes: Option<Vec<String>>,

    /// Suffix that triggers "ies" conversion
    ///
    /// [default: y]
    #[arg(long)]
    pluralize_ies_suffix: Option<String>,

    /// Default suffix to add for pluralization
    ///
    /// [default: s]
    #[arg(long)]
    pluralize_default_suffix: Option<String>,

    /// Prefix for create operations in REST pattern detection
    ///
    /// [default: create]
    #[arg(long)]
    crud_prefix_create: Option<String>,

    /// Prefix for update operations in REST pattern detection
    ///
    /// [default: update]
    #[arg(long)]
    crud_prefix_update: Option<String>,

    /// Prefix for delete operations in REST pattern detection
    ///
    /// [default: delete]
    #[arg(long)]
    crud_prefix_delete: Option<String>,

    /// The log level
    ///
    /// [default: info]
    #[arg(long = "log", short = 'l')]
    log_level: Option<Level>,
}

impl Args {
    /// Apply every explicitly given argument on top of the loaded config
    fn apply_overrides(self, config: &mut Config) {
        let converter = &mut config.converter;
        let pluralization = &mut converter.pluralization;
        let prefixes = &mut converter.crud_prefixes;

        config.schema = self.schema.or(config.schema.take());
        config.custom_plurals = self.custom_plurals.or(config.custom_plurals.take());
        converter.title = self.title.or(converter.title.take());
        converter.base_url = self.base_url.or(converter.base_url.take());

        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(version) = self.version {
            converter.version = version;
        }
        if let Some(path_prefix) = self.path_prefix {
            converter.path_prefix = path_prefix;
        }
        if let Some(detect) = self.detect_rest_patterns {
            converter.detect_rest_patterns = detect;
        }
        if let Some(es_suffixes) = self.pluralize_es_suffixes {
            pluralization.es_suffixes = es_suffixes
                .into_iter()
                .map(|suffix| suffix.trim().to_string())
                .filter(|suffix| !suffix.is_empty())
                .collect();
        }
        if let Some(ies_suffix) = self.pluralize_ies_suffix {
            pluralization.ies_suffix = ies_suffix;
        }
        if let Some(default_suffix) = self.pluralize_default_suffix {
            pluralization.default_suffix = default_suffix;
        }
        if let Some(create) = self.crud_prefix_create {
            prefixes.create = create;
        }
        if let Some(update) = self.crud_prefix_update {
            prefixes.update = update;
        }
        if let Some(delete) = self.crud_prefix_delete {
            prefixes.delete = delete;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => runtime::read_config(path)?,
        None => runtime::read_config_from_env()?,
    };
    args.apply_overrides(&mut config);

    let _guard = runtime::setup_logging(&config)?;

    info!(
        "GraphQL to OpenAPI v{} // Licensed under MIT",
        std::env!("CARGO_PKG_VERSION")
    );

    let Some(schema_path) = config.schema.clone() else {
        bail!("No GraphQL schema file was supplied (use --schema)");
    };

    if let Some(custom_plurals) = &config.custom_plurals {
        let table = CustomPlurals::try_from(custom_plurals)?;
        config
            .converter
            .pluralization
            .custom
            .extend(table.into_inner());
    }

    let source = std::fs::read_to_string(&schema_path)
        .with_context(|| format!("Failed to read schema file {}", schema_path.display()))?;
    debug!(schema = %schema_path.display(), bytes = source.len(), "Read schema");

    let conversion = Converter::new(config.converter)
        .convert(&source, &schema_path.display().to_string())?;

    for pattern in &conversion.patterns {
        info!("Detected REST pattern {pattern}");
    }

    let rendered = render(&conversion.document, config.format)?;
    std::fs::write(&config.output, rendered)
        .with_context(|| format!("Failed to write output file {}", config.output.display()))?;

    info!(
        "Successfully converted {} to {}",
        schema_path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| schema_path.to_string_lossy()),
        config.output.display()
    );
    Ok(())
}
