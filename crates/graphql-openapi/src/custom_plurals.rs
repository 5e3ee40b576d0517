//! Loading of custom pluralization tables
//!
//! A table is a JSON object mapping a singular suffix to its plural
//! replacement, e.g. `{"person": "people", "child": "children"}`.

use std::{collections::BTreeMap, path::PathBuf, str::FromStr};

use crate::errors::ConfigError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomPlurals(BTreeMap<String, String>);

impl CustomPlurals {
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl FromStr for CustomPlurals {
    type Err = ConfigError;

    fn from_str(table: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(table)
            .map(CustomPlurals)
            .map_err(ConfigError::CustomPlurals)
    }
}

impl TryFrom<&PathBuf> for CustomPlurals {
    type Error = ConfigError;

    fn try_from(path: &PathBuf) -> Result<Self, Self::Error> {
        tracing::debug!(custom_plurals=?path, "Loading custom pluralization table");
        let table = std::fs::read_to_string(path)?;
        CustomPlurals::from_str(table.as_str())
    }
}
