//! Path emission for root operation fields
//!
//! Paths are written in a fixed order: consolidated query endpoints, the
//! remaining queries, sub-resource endpoints, consolidated mutation
//! endpoints, the remaining mutations and finally subscriptions. Later
//! writes to the same path and method replace earlier ones.

use std::collections::HashSet;

use apollo_compiler::{
    Node, Schema as GraphQLSchema,
    ast::{FieldDefinition, InputValueDefinition},
    schema::{ExtendedType, ObjectType},
};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{
    config::ConverterConfig,
    directives::Directive,
    document::{
        DocumentBuilder, MediaType, Operation, Parameter, ParameterLocation, RequestBody,
        Response, Schema,
    },
    naming::{Inflector, add_field_name_prefix, camel_to_title, capitalize, split_description},
    rest_patterns::{CrudOperation, ResourcePattern},
    type_mapper::{RootTypes, TypeMapper},
};

const JSON_MEDIA_TYPE: &str = "application/json";
const EVENT_STREAM_MEDIA_TYPE: &str = "text/event-stream";
const SUCCESS_STATUS: &str = "200";
const SUCCESS_DESCRIPTION: &str = "Successful response";

/// Emits a path item for every root field, consolidating detected resources
pub struct PathBuilder<'a> {
    schema: &'a GraphQLSchema,
    roots: &'a RootTypes,
    config: &'a ConverterConfig,
    mapper: TypeMapper<'a>,
    inflector: Inflector<'a>,
}

impl<'a> PathBuilder<'a> {
    pub fn new(
        schema: &'a GraphQLSchema,
        roots: &'a RootTypes,
        config: &'a ConverterConfig,
        mapper: TypeMapper<'a>,
        inflector: Inflector<'a>,
    ) -> Self {
        Self {
            schema,
            roots,
            config,
            mapper,
            inflector,
        }
    }

    /// Write every path into the document
    pub fn build(&self, patterns: &[ResourcePattern], builder: &mut DocumentBuilder) {
        if let Some(query) = self.root_object(self.roots.query.as_deref()) {
            self.query_paths(query, patterns, builder);
        }
        self.sub_resource_paths(builder);
        if let Some(mutation) = self.root_object(self.roots.mutation.as_deref()) {
            self.mutation_paths(mutation, patterns, builder);
        }
        if let Some(subscription) = self.root_object(self.roots.subscription.as_deref()) {
            self.subscription_paths(subscription, builder);
        }
    }

    fn root_object(&self, name: Option<&str>) -> Option<&'a ObjectType> {
        name.and_then(|name| self.schema.get_object(name))
            .map(|object| &**object)
    }

    fn path(&self, path: String) -> String {
        self.config.path(&path)
    }

    fn query_paths(
        &self,
        query: &ObjectType,
        patterns: &[ResourcePattern],
        builder: &mut DocumentBuilder,
    ) {
        let mut consumed: HashSet<&str> = HashSet::new();

        for pattern in patterns {
            if pattern.has(CrudOperation::List) {
                let operation = Operation {
                    operation_id: Some(format!("list{}", capitalize(&pattern.plural))),
                    summary: Some(format!("List {}", pattern.plural)),
                    responses: json_response(Schema::array(Schema::reference(
                        &pattern.target_type,
                    ))),
                    ..Default::default()
                };
                builder.path_item(self.path(format!("/{}", pattern.plural))).get =
                    Some(operation);
                consumed.insert(pattern.plural.as_str());
            }

            if pattern.has(CrudOperation::Get) {
                let operation = Operation {
                    operation_id: Some(format!("get{}", capitalize(&pattern.resource))),
                    summary: Some(format!("Get {} by ID", pattern.resource)),
                    parameters: vec![Parameter::id_path()],
                    responses: json_response(Schema::reference(&pattern.target_type)),
                    ..Default::default()
                };
                builder
                    .path_item(self.path(format!("/{}/{{id}}", pattern.plural)))
                    .get = Some(operation);
                consumed.insert(pattern.resource.as_str());
            }
        }

        for field in query.fields.values() {
            let name = field.name.as_str();
            if consumed.contains(name) || name.starts_with("__") {
                continue;
            }
            debug!(field = name, "query emitted as GET /{name}");
            builder.path_item(self.path(format!("/{name}"))).get =
                Some(self.query_operation(field));
        }
    }

    /// A `GET` endpoint for every list of a non-scalar type declared on an object type
    fn sub_resource_paths(&self, builder: &mut DocumentBuilder) {
        for (owner, extended_type) in &self.schema.types {
            let ExtendedType::Object(object) = extended_type else {
                continue;
            };
            if extended_type.is_built_in()
                || owner.starts_with("__")
                || self.roots.contains(owner)
            {
                continue;
            }

            let collection = self.inflector.pluralize(&owner.to_lowercase());
            for field in object.fields.values() {
                let element = field.ty.inner_named_type();
                if !field.ty.is_list() || self.mapper.kind(element).is_scalar() {
                    continue;
                }

                let operation = Operation {
                    operation_id: Some(format!("get{owner}{}", capitalize(&field.name))),
                    summary: Some(format!(
                        "Get {} by {}",
                        field.name,
                        owner.to_lowercase()
                    )),
                    parameters: vec![Parameter::id_path()],
                    responses: json_response(Schema::array(Schema::reference(element))),
                    ..Default::default()
                };
                builder
                    .path_item(self.path(format!("/{collection}/{{id}}/{}", field.name)))
                    .get = Some(operation);
            }
        }
    }

    fn mutation_paths(
        &self,
        mutation: &ObjectType,
        patterns: &[ResourcePattern],
        builder: &mut DocumentBuilder,
    ) {
        let prefixes = &self.config.crud_prefixes;
        let mut consumed: HashSet<&str> = HashSet::new();

        for pattern in patterns {
            let kinds = [
                (CrudOperation::Create, prefixes.create.as_str(), "Create"),
                (CrudOperation::Update, prefixes.update.as_str(), "Update"),
                (CrudOperation::Delete, prefixes.delete.as_str(), "Delete"),
            ];
            for (kind, prefix, verb) in kinds {
                if !pattern.has(kind) {
                    continue;
                }

                let field_name = format!("{prefix}{}", capitalize(&pattern.resource));
                let Some(field) = mutation.fields.get(field_name.as_str()) else {
                    warn!(
                        resource = %pattern.resource,
                        operation = %kind,
                        field = %field_name,
                        "mutation for detected resource not found, skipping endpoint"
                    );
                    continue;
                };

                let fallback = format!("{verb} {}", pattern.resource);
                let mut operation = self.mutation_operation(field, Some(&fallback));
                let collection = format!("/{}", pattern.plural);
                let item = format!("/{}/{{id}}", pattern.plural);
                match kind {
                    CrudOperation::Create => {
                        builder.path_item(self.path(collection)).post = Some(operation);
                    }
                    CrudOperation::Update => {
                        operation.parameters.insert(0, Parameter::id_path());
                        builder.path_item(self.path(item)).put = Some(operation);
                    }
                    CrudOperation::Delete => {
                        let takes_only_id = matches!(
                            field.arguments.as_slice(),
                            [argument] if argument.name.as_str() == "id"
                        );
                        if takes_only_id {
                            operation.parameters = vec![Parameter::id_path()];
                            operation.request_body = None;
                        } else {
                            operation.parameters.insert(0, Parameter::id_path());
                        }
                        builder.path_item(self.path(item)).delete = Some(operation);
                    }
                    CrudOperation::List | CrudOperation::Get => {}
                }
                consumed.insert(field.name.as_str());
            }
        }

        for field in mutation.fields.values() {
            let name = field.name.as_str();
            if consumed.contains(name) || name.starts_with("__") {
                continue;
            }
            debug!(field = name, "mutation emitted as POST /{name}");
            builder.path_item(self.path(format!("/{name}"))).post =
                Some(self.mutation_operation(field, None));
        }
    }

    fn subscription_paths(&self, subscription: &ObjectType, builder: &mut DocumentBuilder) {
        for field in subscription.fields.values() {
            if field.name.starts_with("__") {
                continue;
            }

            let path_argument = field
                .arguments
                .iter()
                .find(|argument| argument.ty.is_non_null());
            let path = match path_argument {
                Some(argument) => format!("/{}/{{{}}}", field.name, argument.name),
                None => format!("/{}", field.name),
            };
            builder.path_item(self.path(path)).get = Some(self.subscription_operation(field));
        }
    }

    fn query_operation(&self, field: &FieldDefinition) -> Operation {
        let (summary, description) = split_description(&add_field_name_prefix(
            &field.name,
            field.description.as_deref().unwrap_or_default(),
        ));

        let mut operation = Operation {
            operation_id: Some(field.name.to_string()),
            summary: Some(summary),
            description: non_empty(description),
            parameters: field
                .arguments
                .iter()
                .map(|argument| self.parameter(argument, ParameterLocation::Query))
                .collect(),
            responses: json_response(self.mapper.map(&field.ty)),
            ..Default::default()
        };
        apply_deprecation(field, &mut operation);
        operation
    }

    /// Build a mutation operation; `fallback` is used for both summary and
    /// description when the field has no description of its own
    fn mutation_operation(&self, field: &FieldDefinition, fallback: Option<&str>) -> Operation {
        let field_description = field.description.as_deref().filter(|text| !text.is_empty());
        let (summary, description) = match (field_description, fallback) {
            (Some(text), _) => {
                let (summary, description) =
                    split_description(&add_field_name_prefix(&field.name, text));
                (summary, non_empty(description))
            }
            (None, Some(fallback)) => (fallback.to_string(), Some(fallback.to_string())),
            (None, None) => (camel_to_title(&field.name), None),
        };

        let mut operation = Operation {
            operation_id: Some(field.name.to_string()),
            summary: Some(summary),
            description,
            request_body: self.request_body(&field.arguments),
            responses: json_response(self.mapper.map(&field.ty)),
            ..Default::default()
        };
        apply_deprecation(field, &mut operation);
        operation
    }

    fn subscription_operation(&self, field: &FieldDefinition) -> Operation {
        let (summary, description) = split_description(&add_field_name_prefix(
            &field.name,
            field.description.as_deref().unwrap_or_default(),
        ));
        let event_type = field.ty.inner_named_type();

        let stream = event_stream_description(&field.name, event_type);
        let mut operation = Operation {
            operation_id: Some(format!("subscribe{}", capitalize(&field.name))),
            summary: Some(format!("Subscribe: {summary}")),
            description: Some(if description.is_empty() {
                stream
            } else {
                format!("{description}\n\n{stream}")
            }),
            responses: IndexMap::from([(
                SUCCESS_STATUS.to_string(),
                Response::with_content(
                    format!("SSE stream of {event_type} events"),
                    EVENT_STREAM_MEDIA_TYPE,
                    Schema::string().described(format!(
                        "Server-Sent Events stream. Each event contains a {event_type} object in JSON format."
                    )),
                ),
            )]),
            ..Default::default()
        };
        apply_deprecation(field, &mut operation);

        let mut path_argument_used = false;
        for argument in &field.arguments {
            let parameter = if argument.ty.is_non_null() && !path_argument_used {
                path_argument_used = true;
                self.parameter(argument, ParameterLocation::Path)
            } else {
                self.parameter(argument, ParameterLocation::Query)
            };
            operation.parameters.push(parameter);
        }

        operation
    }

    fn parameter(&self, argument: &InputValueDefinition, location: ParameterLocation) -> Parameter {
        let exploded = location == ParameterLocation::Query && argument.ty.is_list();
        Parameter {
            name: argument.name.to_string(),
            location,
            description: argument
                .description
                .as_deref()
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            required: location == ParameterLocation::Path || argument.ty.is_non_null(),
            schema: Some(self.mapper.map(&argument.ty)),
            style: exploded.then(|| "form".to_string()),
            explode: exploded,
        }
    }

    /// Collect all arguments into a single JSON object body
    fn request_body(&self, arguments: &[Node<InputValueDefinition>]) -> Option<RequestBody> {
        if arguments.is_empty() {
            return None;
        }

        let mut body = Schema::object();
        for argument in arguments {
            let mut property = self.mapper.map(&argument.ty);
            if let Some(text) = argument.description.as_deref().filter(|text| !text.is_empty()) {
                property.description = Some(text.to_string());
            }
            body.properties.insert(argument.name.to_string(), property);
            if argument.ty.is_non_null() {
                body.required.push(argument.name.to_string());
            }
        }

        Some(RequestBody {
            description: None,
            required: true,
            content: IndexMap::from([(
                JSON_MEDIA_TYPE.to_string(),
                MediaType { schema: Some(body) },
            )]),
        })
    }
}

fn json_response(schema: Schema) -> IndexMap<String, Response> {
    IndexMap::from([(
        SUCCESS_STATUS.to_string(),
        Response::with_content(SUCCESS_DESCRIPTION, JSON_MEDIA_TYPE, schema),
    )])
}

fn apply_deprecation(field: &FieldDefinition, operation: &mut Operation) {
    for directive in Directive::decode_all(field.directives.iter().map(|d| &**d)) {
        directive.apply_to_operation(operation);
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn event_stream_description(field_name: &str, event_type: &str) -> String {
    format!(
        "Server-Sent Events (SSE) stream.

Each event is formatted as:
  event: {field_name}
  data: <JSON-encoded {event_type} object>

Example:
  event: {field_name}
  data: {{\"id\":\"123\",...}}

The connection remains open and events are pushed as they occur.
Use the EventSource API in browsers or any SSE client library."
    )
}
