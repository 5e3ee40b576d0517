//! Rendering of a finished document

use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{document::OpenApiDocument, errors::ConversionError};

/// The serialization format of the rendered document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}', expected yaml or json")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => f.write_str("yaml"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Render a document as YAML or pretty-printed JSON
pub fn render(document: &OpenApiDocument, format: OutputFormat) -> Result<String, ConversionError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)?),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::document::{DocumentBuilder, Info};

    fn document() -> OpenApiDocument {
        DocumentBuilder::new(
            Info {
                title: "Blog".to_string(),
                description: None,
                version: "1.0.0".to_string(),
            },
            vec![],
        )
        .finish()
    }

    #[rstest]
    #[case("yaml", OutputFormat::Yaml)]
    #[case("YML", OutputFormat::Yaml)]
    #[case("Json", OutputFormat::Json)]
    fn parses_formats_case_insensitively(#[case] raw: &str, #[case] expected: OutputFormat) {
        assert_eq!(raw.parse::<OutputFormat>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_formats() {
        assert!("toml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn renders_yaml() {
        let rendered = render(&document(), OutputFormat::Yaml).unwrap();

        insta::assert_snapshot!(rendered, @r"
        openapi: 3.0.0
        info:
          title: Blog
          version: 1.0.0
        paths: {}
        components: {}
        ");
    }

    #[test]
    fn renders_pretty_json() {
        let rendered = render(&document(), OutputFormat::Json).unwrap();

        insta::assert_snapshot!(rendered, @r#"
        {
          "openapi": "3.0.0",
          "info": {
            "title": "Blog",
            "version": "1.0.0"
          },
          "paths": {},
          "components": {}
        }
        "#);
    }
}
