//! Conversion of GraphQL schemas into OpenAPI 3.0 documents
//!
//! ```no_run
//! use graphql_openapi::{Converter, ConverterConfig, OutputFormat, render};
//!
//! let source = std::fs::read_to_string("schema.graphql")?;
//! let conversion = Converter::new(ConverterConfig::default()).convert(&source, "schema.graphql")?;
//! println!("{}", render(&conversion.document, OutputFormat::Yaml)?);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use apollo_compiler::Schema as GraphQLSchema;
use tracing::debug;

pub mod config;
pub mod custom_plurals;
pub mod description;
pub mod directives;
pub mod document;
pub mod errors;
pub mod naming;
pub mod output;
pub mod paths;
pub mod rest_patterns;
pub mod type_converter;
pub mod type_mapper;

pub use config::ConverterConfig;
pub use custom_plurals::CustomPlurals;
pub use document::OpenApiDocument;
pub use errors::{ConfigError, ConversionError};
pub use output::{OutputFormat, render};
pub use rest_patterns::ResourcePattern;

use crate::{
    document::DocumentBuilder,
    naming::Inflector,
    paths::PathBuilder,
    type_converter::TypeConverter,
    type_mapper::{RootTypes, TypeMapper},
};

/// The result of a conversion run
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: OpenApiDocument,

    /// The REST resources that were consolidated, ordered by resource name
    pub patterns: Vec<ResourcePattern>,
}

/// Converts GraphQL SDL into OpenAPI documents using a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a schema source. `source_path` is only used in parse error messages.
    pub fn convert(&self, source: &str, source_path: &str) -> Result<Conversion, ConversionError> {
        let schema = GraphQLSchema::parse(source, source_path)
            .map_err(|e| ConversionError::GraphQLSchema(Box::new(e)))?;

        let roots = RootTypes::of(&schema);
        let mapper = TypeMapper::new(&schema, &roots);
        let inflector = Inflector::new(&self.config.pluralization);

        let mut builder = DocumentBuilder::new(
            description::document_info(&self.config, source),
            description::servers(&self.config),
        );

        TypeConverter::new(&schema, &roots, mapper, inflector).convert_all(&mut builder);

        let patterns = if self.config.detect_rest_patterns {
            rest_patterns::detect(
                roots.query.as_deref().and_then(|name| schema.get_object(name)),
                roots.mutation.as_deref().and_then(|name| schema.get_object(name)),
                inflector,
                &self.config.crud_prefixes,
            )
        } else {
            debug!("REST pattern detection disabled");
            Vec::new()
        };

        PathBuilder::new(&schema, &roots, &self.config, mapper, inflector)
            .build(&patterns, &mut builder);

        Ok(Conversion {
            document: builder.finish(),
            patterns,
        })
    }
}
