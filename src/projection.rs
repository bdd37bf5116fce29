//! Field-projection engine.
//!
//! YouTrack only returns the attributes named in the `fields` query parameter,
//! e.g. `$type,id,customFields($type,id,name,value(id,name))`. The selector is
//! derived here from the static descriptors of the requested type so that the
//! server returns exactly what the typed model can hold.

use std::fmt;

use thiserror::Error;

use crate::schema::{EntityDescriptor, Schema, TypeDescriptor, TYPE_KEY};

/// Errors raised while computing a field selector.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// The requested type (or one of its top-level union members) is not an entity.
    #[error("Cannot project {0}: only entities and unions of entities have fields")]
    NotAnEntity(String),

    /// An entity is reachable from itself.
    #[error("Cyclic field projection: {path}")]
    Cycle { path: String },
}

/// An ordered tree of selected field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTree {
    entries: Vec<(&'static str, FieldTree)>,
}

impl FieldTree {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names at this level in order of first encounter.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldTree> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, sub)| sub)
    }

    /// Add `name` with the given sub-tree, merging into an existing entry.
    pub fn insert(&mut self, name: &'static str, sub: FieldTree) {
        match self.entries.iter_mut().find(|(entry, _)| *entry == name) {
            Some((_, existing)) => existing.merge(sub),
            None => self.entries.push((name, sub)),
        }
    }

    /// Deep merge: shared names merge recursively, new names are appended.
    pub fn merge(&mut self, other: FieldTree) {
        for (name, sub) in other.entries {
            self.insert(name, sub);
        }
    }

    /// Parse a selector such as `field(name,fieldType(id)),bundle`.
    ///
    /// Repeated names are merged. A missing closing parenthesis is implied
    /// at the end of the input.
    pub fn parse(selector: &'static str) -> FieldTree {
        let mut rest = selector;
        parse_level(&mut rest)
    }
}

fn parse_level(rest: &mut &'static str) -> FieldTree {
    let mut tree = FieldTree::default();
    loop {
        let current: &'static str = *rest;
        let end = current.find([',', '(', ')']).unwrap_or(current.len());
        let name = current[..end].trim();
        let mut tail = &current[end..];

        let mut sub = FieldTree::default();
        if let Some(inner) = tail.strip_prefix('(') {
            *rest = inner;
            sub = parse_level(rest);
            tail = *rest;
            if let Some(after) = tail.strip_prefix(')') {
                tail = after;
            }
        }
        if !name.is_empty() {
            tree.insert(name, sub);
        }

        match tail.strip_prefix(',') {
            Some(after) => *rest = after,
            None => {
                *rest = tail;
                return tree;
            }
        }
    }
}

impl fmt::Display for FieldTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, sub)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if sub.is_empty() {
                f.write_str(name)?;
            } else {
                write!(f, "{}({})", name, sub)?;
            }
        }
        Ok(())
    }
}

/// Compute the field selector of `T`.
///
/// ```
/// use youtrack_sdk::field_selector;
/// use youtrack_sdk::model::Project;
///
/// assert_eq!(
///     field_selector::<Project>().unwrap().as_deref(),
///     Some("$type,id,name,shortName")
/// );
/// ```
pub fn field_selector<T: Schema>() -> Result<Option<String>, ProjectionError> {
    compute_field_selector(&T::type_descriptor())
}

/// Compute the field selector for a type descriptor.
///
/// The input may be an entity, a union of entities or a discriminated union.
/// Fields reachable through several union members are listed once. Returns
/// `None` when the resulting tree is empty.
///
/// # Errors
///
/// - [`ProjectionError::NotAnEntity`] if a top-level member is not an entity
/// - [`ProjectionError::Cycle`] if an entity is reachable from itself
pub fn compute_field_selector(ty: &TypeDescriptor) -> Result<Option<String>, ProjectionError> {
    let tree = field_tree(ty)?;
    Ok((!tree.is_empty()).then(|| tree.to_string()))
}

/// The field tree behind [`compute_field_selector`], for callers that need to
/// merge in fields the model does not declare.
pub fn field_tree(ty: &TypeDescriptor) -> Result<FieldTree, ProjectionError> {
    let members: Vec<&TypeDescriptor> = match unwrap_discriminated(ty) {
        TypeDescriptor::Union(members) => members.iter().collect(),
        other => vec![other],
    };

    let mut tree = FieldTree::default();
    for member in members {
        match unwrap_discriminated(member) {
            TypeDescriptor::Entity(entity) => tree.merge(entity_tree(entity, &mut Vec::new())?),
            other => return Err(ProjectionError::NotAnEntity(other.describe())),
        }
    }

    Ok(tree)
}

fn unwrap_discriminated(ty: &TypeDescriptor) -> &TypeDescriptor {
    match ty {
        TypeDescriptor::Discriminated(inner) => unwrap_discriminated(inner),
        other => other,
    }
}

fn entity_tree(
    entity: &'static EntityDescriptor,
    path: &mut Vec<&'static EntityDescriptor>,
) -> Result<FieldTree, ProjectionError> {
    if path.iter().any(|seen| std::ptr::eq(*seen, entity)) {
        let mut names: Vec<&str> = path.iter().map(|seen| seen.name).collect();
        names.push(entity.name);
        return Err(ProjectionError::Cycle {
            path: names.join(" -> "),
        });
    }

    path.push(entity);
    let mut tree = FieldTree::default();
    if entity.is_tagged() {
        tree.insert(TYPE_KEY, FieldTree::default());
    }
    for field in entity.fields {
        let sub = type_tree(&(field.ty)(), path)?;
        tree.insert(field.wire_key(), sub);
    }
    path.pop();

    Ok(tree)
}

fn type_tree(
    ty: &TypeDescriptor,
    path: &mut Vec<&'static EntityDescriptor>,
) -> Result<FieldTree, ProjectionError> {
    match ty {
        TypeDescriptor::Scalar(_) => Ok(FieldTree::default()),
        TypeDescriptor::Entity(entity) => entity_tree(entity, path),
        TypeDescriptor::Sequence(inner) | TypeDescriptor::Discriminated(inner) => {
            type_tree(inner, path)
        }
        TypeDescriptor::Union(members) => {
            let mut tree = FieldTree::default();
            for member in members {
                tree.merge(type_tree(member, path)?);
            }
            Ok(tree)
        }
    }
}
