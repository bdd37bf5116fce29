//! The entity trait and the helpers the declaration macros expand to.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::codec::{DecodeError, View, WireField, WireMap, WireValue};
use crate::schema::{EntityDescriptor, Schema, TYPE_KEY};

/// Presence-set name of the discriminator.
pub const TYPE_FIELD: &str = "type";

/// Names of the fields that were explicitly supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet(BTreeSet<&'static str>);

impl FieldSet {
    pub fn insert(&mut self, name: &'static str) {
        self.0.insert(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }
}

/// A record type of the YouTrack object model.
///
/// Implemented by [`entity!`](crate::entity); hand-written implementations
/// must keep [`Entity::descriptor`] and the codec methods in agreement.
pub trait Entity: WireField + Schema + Clone + std::fmt::Debug {
    /// Accepted `$type` values, default first. Empty for untagged entities.
    const TAGS: &'static [&'static str];

    fn descriptor() -> &'static EntityDescriptor;

    /// The discriminator this value carries.
    fn type_tag(&self) -> Option<&'static str>;

    fn fields_set(&self) -> &FieldSet;

    /// Wire map of this entity for one view.
    fn wire_view(&self, view: View) -> WireMap;

    /// Build the entity from a JSON object whose `$type` (if any) is known to match.
    fn decode_map(map: &Map<String, Value>) -> Result<Self, DecodeError>;
}

#[doc(hidden)]
pub fn encode_type(map: &mut WireMap, fields_set: &FieldSet, view: View, tag: Option<&str>) {
    let Some(tag) = tag else { return };
    if view == View::NonNull || fields_set.contains(TYPE_FIELD) {
        map.insert(TYPE_KEY, WireValue::String(tag.to_string()));
    }
}

#[doc(hidden)]
pub fn encode_field<T: WireField>(
    map: &mut WireMap,
    fields_set: &FieldSet,
    view: View,
    name: &str,
    key: &str,
    value: &T,
) {
    let include = match view {
        View::Explicit => fields_set.contains(name),
        View::NonNull => !value.is_null(),
    };
    if include {
        map.insert(key, value.to_wire(view));
    }
}

#[doc(hidden)]
pub fn decode_tag(
    map: &Map<String, Value>,
    tags: &'static [&'static str],
    entity: &'static str,
    fields_set: &mut FieldSet,
) -> Result<Option<&'static str>, DecodeError> {
    if tags.is_empty() {
        return Ok(None);
    }
    match map.get(TYPE_KEY) {
        None | Some(Value::Null) => Ok(tags.first().copied()),
        Some(Value::String(tag)) => {
            let known = tags.iter().find(|known| **known == tag.as_str()).copied();
            match known {
                Some(known) => {
                    fields_set.insert(TYPE_FIELD);
                    Ok(Some(known))
                }
                None => Err(DecodeError::UnknownDiscriminator {
                    tag: tag.clone(),
                    expected: entity,
                }),
            }
        }
        Some(other) => Err(DecodeError::invalid_type(TYPE_KEY, "string", other)),
    }
}

/// Read the `$type` of a union payload.
#[doc(hidden)]
pub fn read_discriminator<'a>(
    map: &'a Map<String, Value>,
    union: &'static str,
) -> Result<&'a str, DecodeError> {
    match map.get(TYPE_KEY) {
        None | Some(Value::Null) => Err(DecodeError::MissingDiscriminator { expected: union }),
        Some(Value::String(tag)) => Ok(tag),
        Some(other) => Err(DecodeError::invalid_type(TYPE_KEY, "string", other)),
    }
}

#[doc(hidden)]
pub fn decode_field<T: WireField>(
    map: &Map<String, Value>,
    entity: &'static str,
    name: &'static str,
    key: &'static str,
    fields_set: &mut FieldSet,
) -> Result<T, DecodeError> {
    match map.get(key) {
        Some(value) => {
            let decoded = T::from_wire(value, key)?;
            fields_set.insert(name);
            Ok(decoded)
        }
        None => T::absent().ok_or(DecodeError::MissingField { entity, field: key }),
    }
}

#[doc(hidden)]
pub fn expect_object<'a>(value: &'a Value, key: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::invalid_type(key, "object", other)),
    }
}
