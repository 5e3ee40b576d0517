use std::path::PathBuf;

use graphql_openapi::{ConverterConfig, OutputFormat};
use schemars::JsonSchema;
use serde::Deserialize;

use super::logging::Logging;

/// Configuration for a conversion run
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Path to the GraphQL schema file to convert
    pub schema: Option<PathBuf>,

    /// Path the OpenAPI document is written to
    pub output: PathBuf,

    /// Serialization format of the OpenAPI document
    pub format: OutputFormat,

    /// Path to a JSON file of custom pluralization suffix rules
    pub custom_plurals: Option<PathBuf>,

    /// Logging configuration
    pub logging: Logging,

    /// Conversion options
    #[serde(flatten)]
    pub converter: ConverterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: None,
            output: PathBuf::from("openapi.yaml"),
            format: OutputFormat::default(),
            custom_plurals: None,
            logging: Logging::default(),
            converter: ConverterConfig::default(),
        }
    }
}

impl Config {
    /// The JSON Schema describing config files
    #[allow(dead_code)] // Only called by the config-schema binary
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
