use apollo_compiler::{Schema, validation::WithErrors};

/// A fatal error during conversion
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Could not parse GraphQL schema: {0}")]
    GraphQLSchema(Box<WithErrors<Schema>>),

    #[error("Could not render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// An error loading converter configuration from a file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not open file: {0}")]
    ReadFile(#[from] std::io::Error),

    #[error("invalid custom pluralization table: {0}")]
    CustomPlurals(serde_json::Error),
}
