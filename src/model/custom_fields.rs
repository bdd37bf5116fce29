//! Project and issue custom fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::codec::timestamp::{millis_to_datetime, DATE_AND_TIME};
use crate::codec::{DecodeError, View, WireField, WireMap, WireValue};
use crate::schema::{EntityDescriptor, FieldDescriptor, Schema, TypeDescriptor};
use crate::{entity, entity_union};

use super::__macro_support::{decode_field, decode_tag, encode_field, encode_type, expect_object};
use super::bundles::{
    BuildBundle, BuildBundleElement, EnumBundle, EnumBundleElement, OwnedBundle,
    OwnedBundleElement, StateBundle, StateBundleElement, UserBundle, VersionBundle,
    VersionBundleElement,
};
use super::common::{CustomField, PeriodValue, TextFieldValue, User, UserGroup};
use super::entity::{Entity, FieldSet};

/// Dispatch the same accessor over every variant of a union.
macro_rules! delegate {
    ($value:expr, $union:ident { $($variant:ident),+ $(,)? }, $inner:ident => $body:expr) => {
        match $value {
            $( $union::$variant($inner) => $body, )+
        }
    };
}

// Project custom fields

entity! {
    pub struct GroupProjectCustomField: "GroupProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
    }
}

entity! {
    pub struct BundleProjectCustomField: "BundleProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
    }
}

entity! {
    pub struct BuildProjectCustomField: "BuildProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
        bundle: Option<BuildBundle>,
    }
}

entity! {
    pub struct EnumProjectCustomField: "EnumProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
        bundle: Option<EnumBundle>,
    }
}

entity! {
    pub struct OwnedProjectCustomField: "OwnedProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
        bundle: Option<OwnedBundle>,
    }
}

entity! {
    pub struct StateProjectCustomField: "StateProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
        bundle: Option<StateBundle>,
    }
}

entity! {
    pub struct UserProjectCustomField: "UserProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
        bundle: Option<UserBundle>,
    }
}

entity! {
    pub struct VersionProjectCustomField: "VersionProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
        bundle: Option<VersionBundle>,
    }
}

entity! {
    /// Integer, float, string, date and "date and time" fields.
    pub struct SimpleProjectCustomField: "SimpleProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
    }
}

entity! {
    pub struct TextProjectCustomField: "TextProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
    }
}

entity! {
    pub struct PeriodProjectCustomField: "PeriodProjectCustomField" {
        id: Option<String>,
        field: Option<CustomField>,
        can_be_empty as "canBeEmpty": Option<bool>,
        is_public as "isPublic": Option<bool>,
    }
}

entity_union! {
    /// Settings of a custom field in one project.
    pub enum ProjectCustomFieldType {
        Group(GroupProjectCustomField),
        Bundle(BundleProjectCustomField),
        Build(BuildProjectCustomField),
        Enum(EnumProjectCustomField),
        Owned(OwnedProjectCustomField),
        State(StateProjectCustomField),
        User(UserProjectCustomField),
        Version(VersionProjectCustomField),
        Simple(SimpleProjectCustomField),
        Text(TextProjectCustomField),
        Period(PeriodProjectCustomField),
    }
}

macro_rules! project_field {
    ($value:expr, $inner:ident => $body:expr) => {
        delegate!(
            $value,
            ProjectCustomFieldType {
                Group, Bundle, Build, Enum, Owned, State, User, Version, Simple, Text, Period,
            },
            $inner => $body
        )
    };
}

impl ProjectCustomFieldType {
    pub fn id(&self) -> Option<&str> {
        project_field!(self, inner => inner.id().as_deref())
    }

    /// The shared custom field this project field configures.
    pub fn field(&self) -> Option<&CustomField> {
        project_field!(self, inner => inner.field().as_ref())
    }

    /// Name of the shared custom field.
    pub fn name(&self) -> Option<&str> {
        self.field().and_then(|field| field.name().as_deref())
    }

    pub fn can_be_empty(&self) -> Option<bool> {
        project_field!(self, inner => *inner.can_be_empty())
    }

    pub fn is_public(&self) -> Option<bool> {
        project_field!(self, inner => *inner.is_public())
    }

    /// The `field.fieldType.id` chain, if every link is present.
    pub fn field_type_id(&self) -> Option<&str> {
        self.field()?.field_type().as_ref()?.id().as_deref()
    }

    /// Names of the predefined values of a bundle field.
    pub fn bundle_value_names(&self) -> Vec<&str> {
        fn names<'a, T: 'a>(
            values: Option<&'a Vec<T>>,
            name: impl Fn(&'a T) -> Option<&'a str>,
        ) -> Vec<&'a str> {
            values.into_iter().flatten().filter_map(name).collect()
        }

        match self {
            Self::Build(field) => names(
                field.bundle().as_ref().and_then(|b| b.values().as_ref()),
                |v| v.name().as_deref(),
            ),
            Self::Enum(field) => names(
                field.bundle().as_ref().and_then(|b| b.values().as_ref()),
                |v| v.name().as_deref(),
            ),
            Self::Owned(field) => names(
                field.bundle().as_ref().and_then(|b| b.values().as_ref()),
                |v| v.name().as_deref(),
            ),
            Self::State(field) => names(
                field.bundle().as_ref().and_then(|b| b.values().as_ref()),
                |v| v.name().as_deref(),
            ),
            Self::Version(field) => names(
                field.bundle().as_ref().and_then(|b| b.values().as_ref()),
                |v| v.name().as_deref(),
            ),
            Self::User(field) => names(
                field.bundle().as_ref().and_then(|b| b.aggregated_users().as_ref()),
                |v| v.login().as_deref(),
            ),
            _ => Vec::new(),
        }
    }
}

// Issue custom fields

entity! {
    /// A custom field of an issue whose value is not requested.
    pub struct IssueCustomField {
        id: Option<String>,
        name: Option<String>,
        project_custom_field as "projectCustomField": Option<ProjectCustomFieldType>,
    }
}

entity! {
    pub struct SingleEnumIssueCustomField: "SingleEnumIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        value: Option<EnumBundleElement>,
    }
}

entity! {
    pub struct MultiEnumIssueCustomField: "MultiEnumIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
    }
    required {
        value: Vec<EnumBundleElement>,
    }
}

entity! {
    pub struct SingleBuildIssueCustomField: "SingleBuildIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        value: Option<BuildBundleElement>,
    }
}

entity! {
    pub struct MultiBuildIssueCustomField: "MultiBuildIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
    }
    required {
        value: Vec<BuildBundleElement>,
    }
}

entity! {
    pub struct StateIssueCustomField: "StateIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        value: Option<StateBundleElement>,
    }
}

entity! {
    pub struct SingleVersionIssueCustomField: "SingleVersionIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        value: Option<VersionBundleElement>,
    }
}

entity! {
    pub struct MultiVersionIssueCustomField: "MultiVersionIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
    }
    required {
        value: Vec<VersionBundleElement>,
    }
}

entity! {
    pub struct SingleOwnedIssueCustomField: "SingleOwnedIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        value: Option<OwnedBundleElement>,
    }
}

entity! {
    pub struct MultiOwnedIssueCustomField: "MultiOwnedIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
    }
    required {
        value: Vec<OwnedBundleElement>,
    }
}

entity! {
    pub struct SingleUserIssueCustomField: "SingleUserIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        value: Option<User>,
    }
}

entity! {
    pub struct MultiUserIssueCustomField: "MultiUserIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
    }
    required {
        value: Vec<User>,
    }
}

entity! {
    pub struct SingleGroupIssueCustomField: "SingleGroupIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        value: Option<UserGroup>,
    }
}

entity! {
    pub struct MultiGroupIssueCustomField: "MultiGroupIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
    }
    required {
        value: Vec<UserGroup>,
    }
}

entity! {
    pub struct DateIssueCustomField: "DateIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        project_custom_field as "projectCustomField": Option<ProjectCustomFieldType>,
        /// Travels as the epoch milliseconds of noon UTC.
        value: Option<NaiveDate>,
    }
}

entity! {
    pub struct PeriodIssueCustomField: "PeriodIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        value: Option<PeriodValue>,
    }
}

entity! {
    pub struct TextIssueCustomField: "TextIssueCustomField" {
        id: Option<String>,
        name: Option<String>,
        value: Option<TextFieldValue>,
    }
}

/// Value of a simple issue custom field.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleValue {
    DateTime(DateTime<Utc>),
    String(String),
    Integer(i64),
    Float(f64),
}

impl Schema for SimpleValue {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Scalar("simple value")
    }
}

impl WireField for SimpleValue {
    fn to_wire(&self, _view: View) -> WireValue {
        match self {
            SimpleValue::DateTime(value) => WireValue::DateTime(*value),
            SimpleValue::String(value) => WireValue::String(value.clone()),
            SimpleValue::Integer(value) => WireValue::Int(*value),
            SimpleValue::Float(value) => WireValue::Float(*value),
        }
    }

    /// Context-free decode: strings stay strings, integers stay integers.
    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(SimpleValue::String(s.clone())),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(SimpleValue::Integer(i)),
                (None, Some(f)) => Ok(SimpleValue::Float(f)),
                (None, None) => Err(DecodeError::invalid_type(key, "string or number", value)),
            },
            other => Err(DecodeError::invalid_type(key, "string or number", other)),
        }
    }
}

/// The project custom field seen by the simple value decoder.
#[derive(Debug, Clone, Copy)]
pub enum Sibling<'a> {
    /// The project custom field has not been decoded.
    Unavailable,
    /// The project custom field is null or missing.
    Absent,
    Present(&'a ProjectCustomFieldType),
}

impl<'a> From<Option<&'a ProjectCustomFieldType>> for Sibling<'a> {
    fn from(value: Option<&'a ProjectCustomFieldType>) -> Self {
        value.map_or(Sibling::Absent, Sibling::Present)
    }
}

/// Interpret a simple field value in the light of its project custom field.
///
/// Only a "date and time" field turns its value into an instant; every other
/// field type, and a field whose type is unknown, passes the value through.
///
/// # Errors
///
/// - [`DecodeError::SiblingUnavailable`] if the project field was not decoded
/// - [`DecodeError::DateTimeNotInteger`] if a "date and time" value is neither
///   an instant nor an integer
pub fn normalize_simple_value(
    candidate: Option<SimpleValue>,
    sibling: Sibling<'_>,
) -> Result<Option<SimpleValue>, DecodeError> {
    let project_field = match sibling {
        Sibling::Unavailable => return Err(DecodeError::SiblingUnavailable),
        Sibling::Absent => return Ok(candidate),
        Sibling::Present(field) => field,
    };
    if project_field.field_type_id() != Some(DATE_AND_TIME) {
        return Ok(candidate);
    }

    match candidate {
        None => Ok(None),
        Some(SimpleValue::DateTime(value)) => Ok(Some(SimpleValue::DateTime(value))),
        Some(SimpleValue::Integer(millis)) => millis_to_datetime(millis)
            .map(|value| Some(SimpleValue::DateTime(value)))
            .ok_or_else(|| DecodeError::invalid_timestamp("value", millis)),
        Some(_) => Err(DecodeError::DateTimeNotInteger),
    }
}

const SIMPLE_FIELD: &str = "SimpleIssueCustomField";

/// A simple (string, number or timestamp) issue custom field.
///
/// The raw value is interpreted as epoch milliseconds only when the
/// project custom field is of type "date and time", so the project field is
/// always decoded before the value.
#[derive(Debug, Clone)]
pub struct SimpleIssueCustomField {
    type_tag: Option<&'static str>,
    id: Option<String>,
    name: Option<String>,
    project_custom_field: Option<ProjectCustomFieldType>,
    value: Option<SimpleValue>,
    fields_set: FieldSet,
}

impl Default for SimpleIssueCustomField {
    fn default() -> Self {
        Self {
            type_tag: Some(SIMPLE_FIELD),
            id: None,
            name: None,
            project_custom_field: None,
            value: None,
            fields_set: FieldSet::default(),
        }
    }
}

impl SimpleIssueCustomField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> &Option<String> {
        &self.id
    }

    pub fn name(&self) -> &Option<String> {
        &self.name
    }

    pub fn project_custom_field(&self) -> &Option<ProjectCustomFieldType> {
        &self.project_custom_field
    }

    pub fn value(&self) -> &Option<SimpleValue> {
        &self.value
    }

    #[must_use]
    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self.fields_set.insert("id");
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self.fields_set.insert("name");
        self
    }

    #[must_use]
    pub fn with_project_custom_field(mut self, field: Option<ProjectCustomFieldType>) -> Self {
        self.project_custom_field = field;
        self.fields_set.insert("project_custom_field");
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: Option<SimpleValue>) -> Self {
        self.value = value;
        self.fields_set.insert("value");
        self
    }
}

impl PartialEq for SimpleIssueCustomField {
    fn eq(&self, other: &Self) -> bool {
        self.type_tag == other.type_tag
            && self.id == other.id
            && self.name == other.name
            && self.project_custom_field == other.project_custom_field
            && self.value == other.value
    }
}

impl Schema for SimpleIssueCustomField {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::Entity(Self::descriptor())
    }
}

impl WireField for SimpleIssueCustomField {
    fn to_wire(&self, view: View) -> WireValue {
        WireValue::Map(self.wire_view(view))
    }

    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        Self::decode_map(expect_object(value, key)?)
    }
}

impl Entity for SimpleIssueCustomField {
    const TAGS: &'static [&'static str] = &[SIMPLE_FIELD];

    fn descriptor() -> &'static EntityDescriptor {
        static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
            name: SIMPLE_FIELD,
            tags: &[SIMPLE_FIELD],
            fields: &[
                FieldDescriptor {
                    name: "id",
                    alias: None,
                    ty: <Option<String>>::type_descriptor,
                },
                FieldDescriptor {
                    name: "name",
                    alias: None,
                    ty: <Option<String>>::type_descriptor,
                },
                FieldDescriptor {
                    name: "project_custom_field",
                    alias: Some("projectCustomField"),
                    ty: <Option<ProjectCustomFieldType>>::type_descriptor,
                },
                FieldDescriptor {
                    name: "value",
                    alias: None,
                    ty: <Option<SimpleValue>>::type_descriptor,
                },
            ],
        };
        &DESCRIPTOR
    }

    fn type_tag(&self) -> Option<&'static str> {
        self.type_tag
    }

    fn fields_set(&self) -> &FieldSet {
        &self.fields_set
    }

    fn wire_view(&self, view: View) -> WireMap {
        let set = &self.fields_set;
        let mut map = WireMap::new();
        encode_type(&mut map, set, view, self.type_tag);
        encode_field(&mut map, set, view, "id", "id", &self.id);
        encode_field(&mut map, set, view, "name", "name", &self.name);
        encode_field(
            &mut map,
            set,
            view,
            "project_custom_field",
            "projectCustomField",
            &self.project_custom_field,
        );
        encode_field(&mut map, set, view, "value", "value", &self.value);
        map
    }

    fn decode_map(map: &Map<String, Value>) -> Result<Self, DecodeError> {
        let mut fields_set = FieldSet::default();
        let type_tag = decode_tag(map, Self::TAGS, SIMPLE_FIELD, &mut fields_set)?;
        let id = decode_field(map, SIMPLE_FIELD, "id", "id", &mut fields_set)?;
        let name = decode_field(map, SIMPLE_FIELD, "name", "name", &mut fields_set)?;
        let project_custom_field: Option<ProjectCustomFieldType> = decode_field(
            map,
            SIMPLE_FIELD,
            "project_custom_field",
            "projectCustomField",
            &mut fields_set,
        )?;
        let candidate: Option<SimpleValue> =
            decode_field(map, SIMPLE_FIELD, "value", "value", &mut fields_set)?;
        let value = normalize_simple_value(candidate, project_custom_field.as_ref().into())?;

        Ok(Self {
            type_tag,
            id,
            name,
            project_custom_field,
            value,
            fields_set,
        })
    }
}

entity_union! {
    /// A custom field of an issue together with its value.
    pub enum IssueCustomFieldType {
        SingleEnum(SingleEnumIssueCustomField),
        MultiEnum(MultiEnumIssueCustomField),
        SingleBuild(SingleBuildIssueCustomField),
        MultiBuild(MultiBuildIssueCustomField),
        State(StateIssueCustomField),
        SingleVersion(SingleVersionIssueCustomField),
        MultiVersion(MultiVersionIssueCustomField),
        SingleOwned(SingleOwnedIssueCustomField),
        MultiOwned(MultiOwnedIssueCustomField),
        SingleUser(SingleUserIssueCustomField),
        MultiUser(MultiUserIssueCustomField),
        SingleGroup(SingleGroupIssueCustomField),
        MultiGroup(MultiGroupIssueCustomField),
        Simple(SimpleIssueCustomField),
        Date(DateIssueCustomField),
        Period(PeriodIssueCustomField),
        Text(TextIssueCustomField),
    }
}

macro_rules! issue_field {
    ($value:expr, $inner:ident => $body:expr) => {
        delegate!(
            $value,
            IssueCustomFieldType {
                SingleEnum, MultiEnum, SingleBuild, MultiBuild, State, SingleVersion,
                MultiVersion, SingleOwned, MultiOwned, SingleUser, MultiUser, SingleGroup,
                MultiGroup, Simple, Date, Period, Text,
            },
            $inner => $body
        )
    };
}

impl IssueCustomFieldType {
    pub fn id(&self) -> Option<&str> {
        issue_field!(self, inner => inner.id().as_deref())
    }

    pub fn name(&self) -> Option<&str> {
        issue_field!(self, inner => inner.name().as_deref())
    }

    /// Whether the field holds a sequence of values.
    pub fn is_multi_value(&self) -> bool {
        matches!(
            self,
            Self::MultiEnum(_)
                | Self::MultiBuild(_)
                | Self::MultiVersion(_)
                | Self::MultiOwned(_)
                | Self::MultiUser(_)
                | Self::MultiGroup(_)
        )
    }

    /// The value in its wire form, `Null` when unset.
    pub fn wire_value(&self) -> WireValue {
        let map = self.to_wire(View::NonNull);
        map.as_map()
            .and_then(|map| map.get("value"))
            .cloned()
            .unwrap_or(WireValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_entity, from_json_value, to_json_value, to_wire_map};
    use crate::field_selector;
    use crate::model::test_support::{assert_round_trip, assert_union_round_trip};
    use crate::model::FieldType;
    use chrono::TimeZone;
    use serde_json::json;

    fn simple_project_field(type_id: &str) -> ProjectCustomFieldType {
        SimpleProjectCustomField::new()
            .with_field(Some(
                CustomField::new()
                    .with_name(Some("Due".into()))
                    .with_field_type(Some(FieldType::new().with_id(Some(type_id.into())))),
            ))
            .into()
    }

    fn simple_payload(type_id: &str, value: Value) -> Value {
        json!({
            "$type": "SimpleIssueCustomField",
            "id": "1",
            "name": "Due",
            "projectCustomField": {
                "$type": "SimpleProjectCustomField",
                "field": {
                    "$type": "CustomField",
                    "fieldType": {"$type": "FieldType", "id": type_id},
                },
            },
            "value": value,
        })
    }

    #[test]
    fn test_date_and_time_integer_becomes_instant() {
        let field: IssueCustomFieldType =
            from_json_value(&simple_payload("date and time", json!(1704067200000_i64))).unwrap();
        let IssueCustomFieldType::Simple(field) = field else {
            panic!("Expected simple field");
        };
        assert_eq!(
            field.value(),
            &Some(SimpleValue::DateTime(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_date_and_time_round_trips_as_millis() {
        let payload = simple_payload("date and time", json!(1704067200000_i64));
        let field: SimpleIssueCustomField = from_json_value(&payload).unwrap();
        let map = to_wire_map(Some(&field)).unwrap().unwrap();
        assert_eq!(to_json_value(&WireValue::Map(map)).unwrap(), payload);
    }

    #[test]
    fn test_date_and_time_rejects_string() {
        let result: Result<SimpleIssueCustomField, _> =
            from_json_value(&simple_payload("date and time", json!("2024-01-01")));
        let err = result.unwrap_err();
        assert!(matches!(err, DecodeError::DateTimeNotInteger));
        assert_eq!(err.to_string(), "'date and time' field must be an integer");
    }

    #[test]
    fn test_other_type_passes_string_through() {
        let field: SimpleIssueCustomField =
            from_json_value(&simple_payload("string", json!("string"))).unwrap();
        assert_eq!(field.value(), &Some(SimpleValue::String("string".into())));
    }

    #[test]
    fn test_other_type_keeps_integer() {
        let field: SimpleIssueCustomField =
            from_json_value(&simple_payload("integer", json!(1704067200000_i64))).unwrap();
        assert_eq!(field.value(), &Some(SimpleValue::Integer(1704067200000)));
    }

    #[test]
    fn test_missing_project_field_passes_through() {
        let field: SimpleIssueCustomField = from_json_value(&json!({
            "$type": "SimpleIssueCustomField",
            "value": 3.5,
        }))
        .unwrap();
        assert_eq!(field.value(), &Some(SimpleValue::Float(3.5)));
        assert_eq!(field.project_custom_field(), &None);
    }

    #[test]
    fn test_unreachable_type_id_passes_through() {
        let sibling: ProjectCustomFieldType = SimpleProjectCustomField::new().into();
        let value = normalize_simple_value(
            Some(SimpleValue::Integer(5)),
            Sibling::Present(&sibling),
        )
        .unwrap();
        assert_eq!(value, Some(SimpleValue::Integer(5)));
    }

    #[test]
    fn test_normalize_variants() {
        let sibling = simple_project_field(DATE_AND_TIME);
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            normalize_simple_value(
                Some(SimpleValue::DateTime(instant)),
                Sibling::Present(&sibling)
            )
            .unwrap(),
            Some(SimpleValue::DateTime(instant))
        );
        assert_eq!(
            normalize_simple_value(None, Sibling::Present(&sibling)).unwrap(),
            None
        );
        assert!(matches!(
            normalize_simple_value(Some(SimpleValue::Float(1.0)), Sibling::Present(&sibling)),
            Err(DecodeError::DateTimeNotInteger)
        ));
        assert!(matches!(
            normalize_simple_value(None, Sibling::Unavailable),
            Err(DecodeError::SiblingUnavailable)
        ));
        assert_eq!(
            normalize_simple_value(Some(SimpleValue::Integer(1)), Sibling::Absent).unwrap(),
            Some(SimpleValue::Integer(1))
        );
    }

    #[test]
    fn test_simple_value_rejects_boolean() {
        let result: Result<SimpleIssueCustomField, _> =
            from_json_value(&simple_payload("string", json!(true)));
        assert!(matches!(result, Err(DecodeError::InvalidType { .. })));
    }

    #[test]
    fn test_single_enum_discriminator() {
        let field = IssueCustomFieldType::from(
            SingleEnumIssueCustomField::new()
                .with_name(Some("Priority".into()))
                .with_value(Some(EnumBundleElement::new().with_name(Some("Major".into())))),
        );
        let bytes = encode_entity(match &field {
            IssueCustomFieldType::SingleEnum(inner) => inner,
            _ => unreachable!(),
        })
        .unwrap();
        let decoded: IssueCustomFieldType = crate::codec::from_wire_bytes(&bytes).unwrap();
        assert!(matches!(decoded, IssueCustomFieldType::SingleEnum(_)));
        assert_eq!(decoded.type_tag(), Some("SingleEnumIssueCustomField"));
        assert_eq!(decoded, field);
    }

    #[test]
    fn test_multi_value_is_required() {
        let result: Result<IssueCustomFieldType, _> =
            from_json_value(&json!({"$type": "MultiUserIssueCustomField", "name": "Assignees"}));
        assert!(matches!(
            result,
            Err(DecodeError::MissingField { field: "value", .. })
        ));

        let field: IssueCustomFieldType = from_json_value(&json!({
            "$type": "MultiUserIssueCustomField",
            "name": "Assignees",
            "value": [],
        }))
        .unwrap();
        assert!(field.is_multi_value());
        assert_eq!(field.wire_value(), WireValue::Seq(vec![]));
    }

    #[test]
    fn test_multi_value_new_marks_value_set() {
        let field = MultiEnumIssueCustomField::new(vec![]);
        let map = to_wire_map(Some(&field)).unwrap().unwrap();
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["value", "$type"]
        );
    }

    #[test]
    fn test_date_field_uses_noon_convention() {
        let field: IssueCustomFieldType = from_json_value(&json!({
            "$type": "DateIssueCustomField",
            "value": 1645099200000_i64,
        }))
        .unwrap();
        let IssueCustomFieldType::Date(field) = field else {
            panic!("Expected date field");
        };
        assert_eq!(field.value(), &NaiveDate::from_ymd_opt(2022, 2, 17));
    }

    #[test]
    fn test_project_field_accessors() {
        let field = simple_project_field("date and time");
        assert_eq!(field.name(), Some("Due"));
        assert_eq!(field.field_type_id(), Some("date and time"));
        assert!(field.bundle_value_names().is_empty());

        let field: ProjectCustomFieldType = from_json_value(&json!({
            "$type": "EnumProjectCustomField",
            "bundle": {
                "$type": "EnumBundle",
                "values": [{"$type": "EnumBundleElement", "name": "Low"}],
            },
        }))
        .unwrap();
        assert_eq!(field.bundle_value_names(), vec!["Low"]);
    }

    #[test]
    fn test_issue_custom_field_selector() {
        let selector = field_selector::<IssueCustomField>().unwrap().unwrap();
        assert!(selector.starts_with("id,name,projectCustomField($type,id,field($type,id,name,fieldType($type,id)),canBeEmpty,isPublic,bundle("));
    }

    fn enum_value(name: &str) -> Value {
        json!({"$type": "EnumBundleElement", "id": "67-0", "name": name})
    }

    #[test]
    fn test_issue_custom_field_variants_round_trip() {
        let payloads = vec![
            json!({"$type": "SingleEnumIssueCustomField", "id": "92-1", "name": "Priority", "value": enum_value("Major")}),
            json!({"$type": "MultiEnumIssueCustomField", "id": null, "name": "Platforms", "value": [enum_value("Linux"), enum_value("macOS")]}),
            json!({"$type": "SingleBuildIssueCustomField", "name": "Build", "value": {"$type": "BuildBundleElement", "name": "1024"}}),
            json!({"$type": "MultiBuildIssueCustomField", "name": "Builds", "value": []}),
            json!({"$type": "StateIssueCustomField", "name": "State", "value": {"$type": "StateBundleElement", "id": "68-1", "name": null}}),
            json!({"$type": "SingleVersionIssueCustomField", "name": "Fix version", "value": null}),
            json!({"$type": "MultiVersionIssueCustomField", "name": "Affected versions", "value": [{"$type": "VersionBundleElement", "name": "2.0"}]}),
            json!({"$type": "SingleOwnedIssueCustomField", "name": "Subsystem", "value": {"$type": "OwnedBundleElement", "name": "Core"}}),
            json!({"$type": "MultiOwnedIssueCustomField", "name": "Subsystems", "value": [{"$type": "OwnedBundleElement", "id": "70-1"}]}),
            json!({"$type": "SingleUserIssueCustomField", "name": "Assignee", "value": {"$type": "Me", "login": "root"}}),
            json!({"$type": "MultiUserIssueCustomField", "name": "Reviewers", "value": [{"$type": "User", "id": "1-1", "ringId": "c2a1", "email": null}]}),
            json!({"$type": "SingleGroupIssueCustomField", "name": "Team", "value": {"$type": "UserGroup", "name": "developers"}}),
            json!({"$type": "MultiGroupIssueCustomField", "name": "Teams", "value": [{"$type": "UserGroup", "id": "3-0", "ringId": null}]}),
            json!({"$type": "SimpleIssueCustomField", "name": "Estimate", "value": 3.5}),
            simple_payload("integer", json!(7)),
            simple_payload(DATE_AND_TIME, json!(1704067200000_i64)),
            json!({"$type": "DateIssueCustomField", "name": "Due Date", "projectCustomField": null, "value": 1645099200000_i64}),
            json!({"$type": "PeriodIssueCustomField", "name": "Spent time", "value": {"$type": "PeriodValue", "minutes": 90, "presentation": "1h 30m"}}),
            json!({"$type": "TextIssueCustomField", "name": "Notes", "value": {"$type": "TextFieldValue", "text": "<p>Hi</p>", "markdownText": null}}),
        ];

        let mut tags = Vec::new();
        for payload in payloads {
            let field = assert_union_round_trip(
                payload,
                IssueCustomFieldType::type_tag,
                IssueCustomFieldType::wire_map,
            );
            tags.push(field.type_tag());
        }
        tags.dedup();
        assert_eq!(tags.len(), 17);
    }

    #[test]
    fn test_project_custom_field_variants_round_trip() {
        let field = |name: &str, type_id: &str| {
            json!({
                "$type": "CustomField",
                "id": "58-1",
                "name": name,
                "fieldType": {"$type": "FieldType", "id": type_id},
            })
        };
        let payloads = vec![
            json!({"$type": "GroupProjectCustomField", "id": "82-1", "field": field("Team", "group[1]"), "canBeEmpty": true}),
            json!({"$type": "BundleProjectCustomField", "field": field("Kind", "enum[1]"), "isPublic": null}),
            json!({"$type": "BuildProjectCustomField", "field": field("Build", "build[1]"), "bundle": {"$type": "BuildBundle", "id": "71-0", "values": []}}),
            json!({"$type": "EnumProjectCustomField", "field": field("Priority", "enum[1]"), "canBeEmpty": false, "isPublic": true, "bundle": {"$type": "EnumBundle", "values": [enum_value("Major")]}}),
            json!({"$type": "OwnedProjectCustomField", "field": field("Subsystem", "ownedField[1]"), "bundle": {"$type": "OwnedBundle", "values": [{"$type": "OwnedBundleElement", "name": "Core"}]}}),
            json!({"$type": "StateProjectCustomField", "field": field("State", "state[1]"), "bundle": {"$type": "StateBundle", "values": [{"$type": "StateBundleElement", "name": "Open"}]}}),
            json!({"$type": "UserProjectCustomField", "field": field("Assignee", "user[1]"), "bundle": {"$type": "UserBundle", "aggregatedUsers": [{"$type": "User", "login": "jane"}]}}),
            json!({"$type": "VersionProjectCustomField", "field": field("Fix versions", "version[*]"), "bundle": null}),
            json!({"$type": "SimpleProjectCustomField", "field": field("Due", DATE_AND_TIME)}),
            json!({"$type": "TextProjectCustomField", "field": field("Notes", "text")}),
            json!({"$type": "PeriodProjectCustomField", "field": field("Estimation", "period"), "canBeEmpty": true}),
        ];

        for payload in payloads {
            let name = payload["field"]["name"].as_str().map(str::to_string);
            let field = assert_union_round_trip(
                payload,
                ProjectCustomFieldType::type_tag,
                ProjectCustomFieldType::wire_map,
            );
            assert_eq!(field.name().map(str::to_string), name);
        }
    }

    #[test]
    fn test_issue_custom_field_without_value_round_trips() {
        let field: IssueCustomField = assert_round_trip(json!({
            "id": "92-4",
            "name": "Priority",
            "projectCustomField": {
                "$type": "EnumProjectCustomField",
                "field": {"$type": "CustomField", "name": "Priority", "fieldType": null},
            },
        }));
        assert_eq!(field.type_tag(), None);
        assert_eq!(
            field.project_custom_field().as_ref().and_then(|f| f.field_type_id()),
            None
        );
    }
}
