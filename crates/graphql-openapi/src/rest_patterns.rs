//! REST resource pattern detection
//!
//! Root query and mutation fields that follow a resource naming convention
//! (a plural list query plus a `create` mutation, optionally with a singular
//! get by id and update/delete mutations) are grouped into a single REST
//! resource. Detection is pure; reporting of the detected patterns is left to
//! the caller.

use std::collections::BTreeMap;
use std::fmt;

use apollo_compiler::{Node, ast::Type, schema::ObjectType};
use enumset::{EnumSet, EnumSetType};
use tracing::debug;

use crate::{
    config::CrudPrefixes,
    naming::{Inflector, uncapitalize},
};

/// An operation that a resource can expose
#[derive(EnumSetType, Debug)]
pub enum CrudOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrudOperation::List => "list",
            CrudOperation::Get => "get",
            CrudOperation::Create => "create",
            CrudOperation::Update => "update",
            CrudOperation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A detected REST resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePattern {
    /// The singular resource name, e.g. `user`
    pub resource: String,

    /// The plural resource name used as the collection path, e.g. `users`
    pub plural: String,

    /// The GraphQL object type returned for the resource
    pub target_type: String,

    /// The operations found for the resource
    pub operations: EnumSet<CrudOperation>,
}

impl ResourcePattern {
    pub fn has(&self, operation: CrudOperation) -> bool {
        self.operations.contains(operation)
    }
}

impl fmt::Display for ResourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}': consolidated {} operations -> /{}",
            self.resource,
            self.operations.len(),
            self.plural
        )
    }
}

/// A resource candidate collected while scanning the root types
#[derive(Debug)]
struct Candidate {
    plural: String,
    target_type: String,
    operations: EnumSet<CrudOperation>,
}

/// Detect REST patterns among the root query and mutation fields.
///
/// Only candidates with both a list query and a create mutation are returned.
/// The result is ordered by resource name.
pub fn detect(
    query: Option<&Node<ObjectType>>,
    mutation: Option<&Node<ObjectType>>,
    inflector: Inflector<'_>,
    prefixes: &CrudPrefixes,
) -> Vec<ResourcePattern> {
    let mut candidates: BTreeMap<String, Candidate> = BTreeMap::new();

    for field in query.into_iter().flat_map(|query| query.fields.values()) {
        let field_name = field.name.as_str();
        if field_name.starts_with("__") {
            continue;
        }

        if let Some(element) = list_element(&field.ty) {
            let singular = inflector.singularize(field_name);
            if singular != field_name {
                let candidate = candidates.entry(singular).or_insert_with(|| Candidate {
                    plural: field_name.to_string(),
                    target_type: element.to_string(),
                    operations: EnumSet::empty(),
                });
                candidate.plural = field_name.to_string();
                candidate.target_type = element.to_string();
                candidate.operations |= CrudOperation::List;
            }
        }

        let takes_only_id = matches!(
            field.arguments.as_slice(),
            [argument] if argument.name.as_str() == "id"
        );
        if takes_only_id {
            let type_name = field.ty.inner_named_type().as_str();
            if field_name == inflector.singularize(type_name)
                || field_name.to_lowercase() == type_name.to_lowercase()
            {
                let candidate = candidates
                    .entry(field_name.to_string())
                    .or_insert_with(|| Candidate {
                        plural: inflector.pluralize(field_name),
                        target_type: type_name.to_string(),
                        operations: EnumSet::empty(),
                    });
                candidate.target_type = type_name.to_string();
                candidate.operations |= CrudOperation::Get;
            }
        }
    }

    let mutation_prefixes = [
        (prefixes.create.as_str(), CrudOperation::Create),
        (prefixes.update.as_str(), CrudOperation::Update),
        (prefixes.delete.as_str(), CrudOperation::Delete),
    ];
    for field in mutation.into_iter().flat_map(|mutation| mutation.fields.values()) {
        for (prefix, operation) in mutation_prefixes {
            if prefix.is_empty() {
                continue;
            }
            let Some(rest) = field.name.as_str().strip_prefix(prefix) else {
                continue;
            };
            // Mutations never start a resource on their own
            if let Some(candidate) = candidates.get_mut(&uncapitalize(rest)) {
                candidate.operations |= operation;
            }
        }
    }

    candidates
        .into_iter()
        .filter_map(|(resource, candidate)| {
            let complete = candidate
                .operations
                .is_superset(CrudOperation::List | CrudOperation::Create);
            if !complete {
                debug!(
                    resource = %resource,
                    operations = ?candidate.operations,
                    "resource candidate lacks a list query or create mutation"
                );
                return None;
            }
            Some(ResourcePattern {
                resource,
                plural: candidate.plural,
                target_type: candidate.target_type,
                operations: candidate.operations,
            })
        })
        .collect()
}

/// The element type name of a list of named types
fn list_element(r#type: &Type) -> Option<&str> {
    match r#type {
        Type::List(inner) | Type::NonNullList(inner) => match inner.as_ref() {
            Type::Named(name) | Type::NonNullNamed(name) => Some(name.as_str()),
            Type::List(_) | Type::NonNullList(_) => None,
        },
        Type::Named(_) | Type::NonNullNamed(_) => None,
    }
}
