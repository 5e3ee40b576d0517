//! Converter configuration

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Deserialize;

/// The title used when neither the configuration nor the schema header supplies one
pub const DEFAULT_TITLE: &str = "Converted from GraphQL";

/// Configuration for a single conversion run
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConverterConfig {
    /// Explicit API title. When unset, the first line of the schema header is used
    pub title: Option<String>,

    /// The API version written into the document info
    pub version: String,

    /// Base URL of the API, emitted as the single server entry
    pub base_url: Option<String>,

    /// Prefix prepended to every generated path (e.g. `/api/v1`)
    pub path_prefix: String,

    /// Consolidate CRUD-style root fields into REST resources
    pub detect_rest_patterns: bool,

    /// Pluralization rules
    pub pluralization: Pluralization,

    /// Mutation name prefixes recognized by REST pattern detection
    pub crud_prefixes: CrudPrefixes,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            title: None,
            version: "1.0.0".to_string(),
            base_url: None,
            path_prefix: String::new(),
            detect_rest_patterns: true,
            pluralization: Pluralization::default(),
            crud_prefixes: CrudPrefixes::default(),
        }
    }
}

impl ConverterConfig {
    /// Prepend the configured path prefix
    pub fn path(&self, path: &str) -> String {
        format!("{}{}", self.path_prefix, path)
    }
}

/// Rules for turning a singular resource name into its plural form and back
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Pluralization {
    /// Suffix replacements checked before any other rule (e.g. `person` -> `people`)
    pub custom: BTreeMap<String, String>,

    /// Suffixes that take `es` in the plural form
    pub es_suffixes: Vec<String>,

    /// Suffix replaced by `ies` when preceded by a consonant
    pub ies_suffix: String,

    /// Suffix appended when no other rule applies
    pub default_suffix: String,
}

impl Default for Pluralization {
    fn default() -> Self {
        Self {
            custom: BTreeMap::new(),
            es_suffixes: ["s", "x", "z", "ch", "sh"]
                .into_iter()
                .map(String::from)
                .collect(),
            ies_suffix: "y".to_string(),
            default_suffix: "s".to_string(),
        }
    }
}

/// Mutation prefixes for create, update and delete operations.
///
/// An empty prefix disables detection of that operation.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CrudPrefixes {
    pub create: String,
    pub update: String,
    pub delete: String,
}

impl Default for CrudPrefixes {
    fn default() -> Self {
        Self {
            create: "create".to_string(),
            update: "update".to_string(),
            delete: "delete".to_string(),
        }
    }
}
