//! Conversion of GraphQL type declarations into component schemas

use apollo_compiler::{
    Node, Schema as GraphQLSchema,
    ast::{DirectiveList, Type},
    schema::{EnumType, ExtendedType, InputObjectType, InterfaceType, ObjectType, UnionType},
};
use tracing::debug;

use crate::{
    directives::Directive,
    document::{DocumentBuilder, Schema},
    naming::{Inflector, add_field_name_prefix},
    type_mapper::{RootTypes, TypeMapper},
};

/// A field or input value, reduced to what the conversion needs
struct FieldInput<'f> {
    name: &'f str,
    description: Option<&'f str>,
    r#type: &'f Type,
    directives: Vec<Directive>,
}

/// Converts every declared type of a schema into a named component schema
pub struct TypeConverter<'a> {
    schema: &'a GraphQLSchema,
    roots: &'a RootTypes,
    mapper: TypeMapper<'a>,
    inflector: Inflector<'a>,
}

impl<'a> TypeConverter<'a> {
    pub fn new(
        schema: &'a GraphQLSchema,
        roots: &'a RootTypes,
        mapper: TypeMapper<'a>,
        inflector: Inflector<'a>,
    ) -> Self {
        Self {
            schema,
            roots,
            mapper,
            inflector,
        }
    }

    /// Write a component schema for every user-declared, non-root type
    pub fn convert_all(&self, builder: &mut DocumentBuilder) {
        for (name, extended_type) in &self.schema.types {
            if extended_type.is_built_in()
                || name.starts_with("__")
                || self.roots.contains(name)
            {
                continue;
            }

            let schema = match extended_type {
                ExtendedType::Enum(r#enum) => self.convert_enum(r#enum),
                ExtendedType::Union(union) => self.convert_union(union),
                ExtendedType::Interface(interface) => self.convert_interface(interface),
                ExtendedType::Object(object) => self.convert_object(object),
                ExtendedType::InputObject(input) => self.convert_input_object(input),
                ExtendedType::Scalar(_) => {
                    debug!(name = %name, "custom scalar is inlined where used");
                    continue;
                }
            };

            debug!(name = %name, "converted type to component schema");
            builder.schema(name.as_str(), schema);
        }
    }

    fn convert_enum(&self, r#enum: &EnumType) -> Schema {
        let mut schema = Schema::string();
        schema.enum_values = r#enum
            .values
            .values()
            .map(|value| value.value.to_string())
            .collect();
        schema.description = description(&r#enum.description);
        schema
    }

    fn convert_union(&self, union: &UnionType) -> Schema {
        Schema {
            one_of: union
                .members
                .iter()
                .map(|member| Schema::reference(member.name.as_str()))
                .collect(),
            description: description(&union.description),
            ..Default::default()
        }
    }

    /// Interfaces list their own fields only and never compute a required set
    fn convert_interface(&self, interface: &InterfaceType) -> Schema {
        let mut schema = Schema::object();
        schema.description = description(&interface.description);
        for field in interface.fields.values() {
            let input = FieldInput {
                name: field.name.as_str(),
                description: field.description.as_deref(),
                r#type: &field.ty,
                directives: decode(&field.directives),
            };
            if let Some((key, property)) = self.convert_field(&input) {
                schema.properties.insert(key, property);
            }
        }
        schema
    }

    /// Objects are built from their own declared fields; implemented interfaces are not consulted
    fn convert_object(&self, object: &ObjectType) -> Schema {
        let fields = object.fields.values().map(|field| FieldInput {
            name: field.name.as_str(),
            description: field.description.as_deref(),
            r#type: &field.ty,
            directives: decode(&field.directives),
        });
        self.object_schema(&object.description, fields)
    }

    fn convert_input_object(&self, input: &InputObjectType) -> Schema {
        let fields = input.fields.values().map(|field| FieldInput {
            name: field.name.as_str(),
            description: field.description.as_deref(),
            r#type: &field.ty,
            directives: decode(&field.directives),
        });
        self.object_schema(&input.description, fields)
    }

    fn object_schema<'f>(
        &self,
        type_description: &Option<Node<str>>,
        fields: impl Iterator<Item = FieldInput<'f>>,
    ) -> Schema {
        let mut schema = Schema::object();
        schema.description = description(type_description);

        for field in fields {
            let Some((key, property)) = self.convert_field(&field) else {
                continue;
            };
            if field.r#type.is_non_null() {
                schema.required.push(key.clone());
            }
            schema.properties.insert(key, property);
        }

        schema
    }

    /// Convert one field into its property key and schema, or `None` when the
    /// field is exposed as a sub-resource instead of being embedded
    fn convert_field(&self, field: &FieldInput<'_>) -> Option<(String, Schema)> {
        let mut property = self.mapper.map(field.r#type);

        if let Some(text) = field.description.filter(|text| !text.is_empty()) {
            property.description = Some(add_field_name_prefix(field.name, text));
        }

        for directive in &field.directives {
            directive.apply_to_schema(field.name, &mut property);
        }

        let named_type = field.r#type.inner_named_type();
        if let Some(ExtendedType::Scalar(scalar)) = self.schema.types.get(named_type) {
            for directive in Directive::decode_all(scalar.directives.iter().map(|d| &***d)) {
                if matches!(directive, Directive::SpecifiedBy { .. }) {
                    directive.apply_to_schema(field.name, &mut property);
                }
            }
        }

        if !self.mapper.kind(named_type).is_structured() {
            return Some((field.name.to_string(), property));
        }

        if field.r#type.is_list() {
            debug!(field = field.name, ty = %named_type, "list field becomes a sub-resource");
            return None;
        }

        let reference = Schema::string().described(format!(
            "Reference to {named_type}.id - use GET /{}/{{{}Id}}",
            self.inflector.pluralize(&named_type.to_lowercase()),
            field.name
        ));
        Some((format!("{}Id", field.name), reference))
    }
}

fn decode(directives: &DirectiveList) -> Vec<Directive> {
    Directive::decode_all(directives.iter().map(|d| &**d))
}

fn description(description: &Option<Node<str>>) -> Option<String> {
    description
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
