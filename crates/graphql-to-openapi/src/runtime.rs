//! Runtime utilities
//!
//! This module is only used by the binaries and provides helper code
//! related to runtime configuration and logging.

mod config;
mod logging;

use std::path::Path;

pub use config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
pub use logging::LogRotation;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Prefix of the environment variables read into the config
const ENV_PREFIX: &str = "GRAPHQL_OPENAPI_";

/// Separator to use when drilling down into nested options in the env figment
const ENV_NESTED_SEPARATOR: &str = "__";

/// Read configuration from environment variables only (when no config file is provided)
#[allow(clippy::result_large_err)]
pub fn read_config_from_env() -> Result<Config, figment::Error> {
    Figment::new()
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .extract()
}

/// Read in a config from a YAML file, filling in any missing values from the environment
#[allow(clippy::result_large_err)]
pub fn read_config(yaml_path: impl AsRef<Path>) -> Result<Config, figment::Error> {
    Figment::new()
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .join(Yaml::file(yaml_path))
        .extract()
}

/// Sets up either file logging or stderr logging depending on provided configuration options
pub fn setup_logging(config: &Config) -> Result<Option<WorkerGuard>, anyhow::Error> {
    let env_filter = EnvFilter::from_default_env().add_directive(config.logging.level.into());

    if let Some(path) = &config.logging.path {
        setup_file_logging(path, env_filter, config.logging.rotation)
    } else {
        setup_stderr_logging(env_filter)
    }
}

/// Sets up rolling file appender logging but falls back to stderr logging on failure
fn setup_file_logging(
    log_path: &Path,
    env_filter: EnvFilter,
    log_rotation: LogRotation,
) -> Result<Option<WorkerGuard>, anyhow::Error> {
    if std::fs::create_dir_all(log_path).is_err() {
        eprintln!("Could not build log path - falling back to stderr");
        return setup_stderr_logging(env_filter);
    }

    let (non_blocking_writer, guard) = match RollingFileAppender::builder()
        .rotation(log_rotation.into())
        .filename_prefix("graphql_to_openapi")
        .filename_suffix("log")
        .build(log_path)
    {
        Ok(appender) => tracing_appender::non_blocking(appender),
        Err(_error) => {
            eprintln!("Log file setup failed - falling back to stderr");
            return setup_stderr_logging(env_filter);
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_writer)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    Ok(Some(guard))
}

/// Sets up stderr logging
fn setup_stderr_logging(env_filter: EnvFilter) -> Result<Option<WorkerGuard>, anyhow::Error> {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false),
        )
        .init();

    Ok(None)
}

#[cfg(test)]
mod test {
    use graphql_openapi::OutputFormat;
    use tracing::Level;

    use super::{LogRotation, read_config, read_config_from_env};

    #[test]
    fn it_uses_defaults_without_any_source() {
        figment::Jail::expect_with(|_jail| {
            let config = read_config_from_env()?;

            assert_eq!(config.schema, None);
            assert_eq!(config.output.to_str(), Some("openapi.yaml"));
            assert_eq!(config.format, OutputFormat::Yaml);
            assert_eq!(config.logging.level, Level::INFO);
            assert!(config.converter.detect_rest_patterns);
            Ok(())
        });
    }

    #[test]
    fn it_reads_engine_options_at_the_top_level() {
        let config = r#"
            schema: schema.graphql
            format: json
            title: Blog API
            path_prefix: /api/v1
            pluralization:
                default_suffix: en
                custom:
                    person: people
            crud_prefixes:
                create: add
            logging:
                level: debug
                path: logs
                rotation: never
        "#;

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";
            jail.create_file(path, config)?;

            let config = read_config(path)?;

            assert_eq!(config.schema.as_deref().and_then(|p| p.to_str()), Some("schema.graphql"));
            assert_eq!(config.format, OutputFormat::Json);
            assert_eq!(config.converter.title.as_deref(), Some("Blog API"));
            assert_eq!(config.converter.path("/users"), "/api/v1/users");
            assert_eq!(config.converter.pluralization.default_suffix, "en");
            assert_eq!(
                config.converter.pluralization.custom.get("person").map(String::as_str),
                Some("people")
            );
            assert_eq!(config.converter.crud_prefixes.create, "add");
            assert_eq!(config.converter.crud_prefixes.update, "update");
            assert_eq!(config.logging.level, Level::DEBUG);
            assert_eq!(config.logging.rotation, LogRotation::Never);
            Ok(())
        });
    }

    #[test]
    fn it_prioritizes_env_vars() {
        let config = r#"
            output: from_file.yaml
        "#;

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";

            jail.create_file(path, config)?;
            jail.set_env("GRAPHQL_OPENAPI_OUTPUT", "from_env.json");

            let config = read_config(path)?;

            assert_eq!(config.output.to_str(), Some("from_env.json"));
            Ok(())
        });
    }

    #[test]
    fn it_extracts_nested_env() {
        let config = r#"
            crud_prefixes:
                delete: delete
        "#;

        figment::Jail::expect_with(move |jail| {
            let path = "config.yaml";

            jail.create_file(path, config)?;
            jail.set_env("GRAPHQL_OPENAPI_CRUD_PREFIXES__DELETE", "remove");
            jail.set_env("GRAPHQL_OPENAPI_DETECT_REST_PATTERNS", "false");

            let config = read_config(path)?;

            assert_eq!(config.converter.crud_prefixes.delete, "remove");
            assert!(!config.converter.detect_rest_patterns);
            Ok(())
        });
    }

    #[test]
    fn it_rejects_unknown_formats() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("GRAPHQL_OPENAPI_FORMAT", "toml");

            assert!(read_config_from_env().is_err());
            Ok(())
        });
    }
}
