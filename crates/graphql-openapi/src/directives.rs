//! Directive processing
//!
//! Only a closed set of directives affects the generated document. Each one is
//! decoded from the GraphQL directive list into a typed [`Directive`] and then
//! applied to a schema fragment or an operation. Any other directive is ignored.

use apollo_compiler::ast::{Directive as GraphQLDirective, Value};
use tracing::debug;

use crate::document::{Operation, Schema};
use crate::naming::camel_to_title;

/// A directive recognized by the converter
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `@deprecated(reason: String)`
    Deprecated { reason: Option<String> },

    /// `@constraint(minLength, maxLength, min, max, pattern, format)`
    Constraint(Constraint),

    /// `@specifiedBy(url: String!)`, attached to a custom scalar declaration
    SpecifiedBy { url: String },
}

/// Validation bounds copied from a `@constraint` directive.
///
/// Values that cannot be parsed are left unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraint {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub pattern: Option<String>,
    pub format: Option<String>,
}

impl Directive {
    /// Decode a GraphQL directive, returning `None` for directives the converter does not handle
    pub fn decode(directive: &GraphQLDirective) -> Option<Self> {
        match directive.name.as_str() {
            "deprecated" => Some(Directive::Deprecated {
                reason: argument_text(directive, "reason").map(str::to_string),
            }),
            "constraint" => Some(Directive::Constraint(Constraint::decode(directive))),
            "specifiedBy" => argument_text(directive, "url").map(|url| Directive::SpecifiedBy {
                url: url.to_string(),
            }),
            _ => None,
        }
    }

    /// Decode every recognized directive in a list, in declaration order
    pub fn decode_all<'d>(directives: impl IntoIterator<Item = &'d GraphQLDirective>) -> Vec<Self> {
        directives.into_iter().filter_map(Directive::decode).collect()
    }

    /// Annotate a component property schema for the named field
    pub fn apply_to_schema(&self, field_name: &str, schema: &mut Schema) {
        match self {
            Directive::Deprecated { reason } => {
                schema.deprecated = true;
                if let Some(reason) = reason {
                    schema.description = Some(format!(
                        "{} - DEPRECATED: {reason}",
                        camel_to_title(field_name)
                    ));
                }
            }
            Directive::Constraint(constraint) => constraint.apply(schema),
            Directive::SpecifiedBy { url } => apply_specified_by(schema, url),
        }
    }

    /// Annotate a generated operation. Only deprecation applies at the operation level.
    pub fn apply_to_operation(&self, operation: &mut Operation) {
        if let Directive::Deprecated { reason } = self {
            operation.deprecated = true;
            if let Some(reason) = reason {
                let notice = format!("DEPRECATED: {reason}");
                operation.description = Some(match operation.description.take() {
                    Some(description) if !description.is_empty() => {
                        format!("{notice}\n\n{description}")
                    }
                    _ => notice.clone(),
                });
                operation.summary = Some(notice);
            }
        }
    }
}

impl Constraint {
    fn decode(directive: &GraphQLDirective) -> Self {
        let mut constraint = Constraint::default();
        for argument in &directive.arguments {
            let Some(raw) = value_text(&argument.value) else {
                debug!(argument = %argument.name, "ignoring non-scalar constraint argument");
                continue;
            };
            match argument.name.as_str() {
                "minLength" => constraint.min_length = raw.parse().ok(),
                "maxLength" => constraint.max_length = raw.parse().ok(),
                "min" => constraint.minimum = raw.parse().ok(),
                "max" => constraint.maximum = raw.parse().ok(),
                "pattern" => constraint.pattern = Some(raw.to_string()),
                "format" => constraint.format = Some(raw.to_string()),
                _ => {}
            }
        }
        constraint
    }

    fn apply(&self, schema: &mut Schema) {
        if self.min_length.is_some() {
            schema.min_length = self.min_length;
        }
        if self.max_length.is_some() {
            schema.max_length = self.max_length;
        }
        if self.minimum.is_some() {
            schema.minimum = self.minimum;
        }
        if self.maximum.is_some() {
            schema.maximum = self.maximum;
        }
        if let Some(pattern) = &self.pattern {
            schema.pattern = Some(pattern.clone());
        }
        if let Some(format) = &self.format {
            schema.format = Some(format.clone());
        }
    }
}

/// Infer a format from a scalar specification URL and reference the URL in the description
fn apply_specified_by(schema: &mut Schema, url: &str) {
    let lowercase = url.to_lowercase();
    if lowercase.contains("rfc4122") || lowercase.contains("uuid") {
        schema.format = Some("uuid".to_string());
    } else if lowercase.contains("date-time") {
        schema.format = Some("date-time".to_string());
    }

    schema.description = Some(match schema.description.take() {
        Some(description) if !description.is_empty() => format!("{description}\n\nSpec: {url}"),
        _ => format!("Spec: {url}"),
    });
}

fn argument_text<'d>(directive: &'d GraphQLDirective, name: &str) -> Option<&'d str> {
    directive
        .arguments
        .iter()
        .find(|argument| argument.name.as_str() == name)
        .and_then(|argument| value_text(&argument.value))
}

/// The source text of a scalar argument value
fn value_text(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text.as_str()),
        Value::Int(int) => Some(int.as_str()),
        Value::Float(float) => Some(float.as_str()),
        Value::Enum(name) => Some(name.as_str()),
        _ => None,
    }
}
