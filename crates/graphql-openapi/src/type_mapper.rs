//! Mapping of GraphQL type references to OpenAPI schema fragments
//!
//! The mapper is total: every type reference produces a fragment. Names
//! that carry no structural information degrade to the closest
//! representable type instead of failing.

use apollo_compiler::{
    Name, Schema as GraphQLSchema,
    ast::{OperationType, Type},
    schema::ExtendedType,
};

use crate::document::{Schema, SchemaType};

/// The names of the root operation types of a schema
#[derive(Debug, Clone, Default)]
pub struct RootTypes {
    pub query: Option<Name>,
    pub mutation: Option<Name>,
    pub subscription: Option<Name>,
}

impl RootTypes {
    pub fn of(schema: &GraphQLSchema) -> Self {
        Self {
            query: schema.root_operation(OperationType::Query).cloned(),
            mutation: schema.root_operation(OperationType::Mutation).cloned(),
            subscription: schema.root_operation(OperationType::Subscription).cloned(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        [&self.query, &self.mutation, &self.subscription]
            .into_iter()
            .flatten()
            .any(|root| root.as_str() == name)
    }
}

/// The broad category of a named type, as far as the converter is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `Int`, `Float`, `String`, `Boolean` or `ID`
    BuiltInScalar,
    /// A declared scalar, or a name the schema does not declare at all
    CustomScalar,
    Enum,
    /// Query, Mutation or Subscription
    Root,
    Object,
    Interface,
    Union,
    InputObject,
}

impl TypeKind {
    /// Types with fields of their own. Component properties of these types are
    /// flattened to identifiers, or dropped when list-wrapped.
    pub fn is_structured(self) -> bool {
        matches!(
            self,
            TypeKind::Object | TypeKind::Interface | TypeKind::Union | TypeKind::InputObject
        )
    }

    pub fn is_scalar(self) -> bool {
        matches!(self, TypeKind::BuiltInScalar | TypeKind::CustomScalar)
    }
}

/// Maps GraphQL type references onto schema fragments
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    schema: &'a GraphQLSchema,
    roots: &'a RootTypes,
}

impl<'a> TypeMapper<'a> {
    pub fn new(schema: &'a GraphQLSchema, roots: &'a RootTypes) -> Self {
        Self { schema, roots }
    }

    /// Classify a named type
    pub fn kind(&self, name: &str) -> TypeKind {
        if builtin_scalar(name).is_some() {
            return TypeKind::BuiltInScalar;
        }
        if self.roots.contains(name) {
            return TypeKind::Root;
        }
        match self.schema.types.get(name) {
            Some(ExtendedType::Object(_)) => TypeKind::Object,
            Some(ExtendedType::Interface(_)) => TypeKind::Interface,
            Some(ExtendedType::Union(_)) => TypeKind::Union,
            Some(ExtendedType::Enum(_)) => TypeKind::Enum,
            Some(ExtendedType::InputObject(_)) => TypeKind::InputObject,
            Some(ExtendedType::Scalar(_)) | None => TypeKind::CustomScalar,
        }
    }

    /// Convert a (possibly list-wrapped, possibly non-null) type reference.
    ///
    /// Note: This is recursive in the list nesting depth of the type.
    pub fn map(&self, r#type: &Type) -> Schema {
        match r#type {
            Type::List(inner) | Type::NonNullList(inner) => Schema::array(self.map(inner)),
            Type::Named(name) | Type::NonNullNamed(name) => self.map_named(name),
        }
    }

    fn map_named(&self, name: &str) -> Schema {
        if let Some(schema) = builtin_scalar(name) {
            return schema;
        }

        match self.kind(name) {
            TypeKind::Root => Schema::object(),
            TypeKind::Object
            | TypeKind::Interface
            | TypeKind::Union
            | TypeKind::Enum
            | TypeKind::InputObject => Schema::reference(name),
            TypeKind::BuiltInScalar | TypeKind::CustomScalar => Schema::string(),
        }
    }
}

fn builtin_scalar(name: &str) -> Option<Schema> {
    match name {
        "Int" => Some(Schema::with_format(SchemaType::Integer, "int32")),
        "Float" => Some(Schema::with_format(SchemaType::Number, "double")),
        "String" | "ID" => Some(Schema::string()),
        "Boolean" => Some(Schema::of_type(SchemaType::Boolean)),
        _ => None,
    }
}
