//! The YouTrack object model.
//!
//! Entities are immutable records declared with [`entity!`](crate::entity).
//! Polymorphic fields are closed enums declared with
//! [`entity_union!`](crate::entity_union) and selected by `$type`.

mod agile;
mod bundles;
mod common;
mod custom_fields;
mod entity;
mod issue;
mod macros;

pub use agile::{Agile, AgileRef, Sprint, SprintRef};
pub use bundles::{
    BuildBundle, BuildBundleElement, BundleElement, EnumBundle, EnumBundleElement, OwnedBundle,
    OwnedBundleElement, StateBundle, StateBundleElement, UserBundle, VersionBundle,
    VersionBundleElement,
};
pub use common::{
    CustomField, DurationValue, FieldType, PeriodValue, Project, Tag, TextFieldValue, User,
    UserGroup,
};
pub use custom_fields::{
    normalize_simple_value, BuildProjectCustomField, BundleProjectCustomField,
    DateIssueCustomField, EnumProjectCustomField, GroupProjectCustomField, IssueCustomField,
    IssueCustomFieldType, MultiBuildIssueCustomField, MultiEnumIssueCustomField,
    MultiGroupIssueCustomField, MultiOwnedIssueCustomField, MultiUserIssueCustomField,
    MultiVersionIssueCustomField, OwnedProjectCustomField, PeriodIssueCustomField,
    PeriodProjectCustomField, ProjectCustomFieldType, Sibling, SimpleIssueCustomField,
    SimpleProjectCustomField, SimpleValue, SingleBuildIssueCustomField,
    SingleEnumIssueCustomField, SingleGroupIssueCustomField, SingleOwnedIssueCustomField,
    SingleUserIssueCustomField, SingleVersionIssueCustomField, StateIssueCustomField,
    StateProjectCustomField, TextIssueCustomField, TextProjectCustomField,
    UserProjectCustomField, VersionProjectCustomField,
};
pub use entity::{Entity, FieldSet, TYPE_FIELD};
pub use issue::{
    Issue, IssueAttachment, IssueComment, IssueLink, IssueLinkDirection, IssueLinkType,
    IssueWorkItem, LinkDirection, WorkItemType,
};

#[doc(hidden)]
pub mod __macro_support {
    pub use super::entity::{
        decode_field, decode_tag, encode_field, encode_type, expect_object, read_discriminator,
    };
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fmt::Debug;

    use serde_json::Value;

    use super::Entity;
    use crate::codec::{
        from_json_value, to_json_value, to_wire_map, MergeError, WireField, WireMap, WireValue,
    };

    fn assert_same<T: WireField + PartialEq + Debug>(payload: &Value, decoded: &T, map: WireMap) {
        let encoded = to_json_value(&WireValue::Map(map)).unwrap();
        assert_eq!(&encoded, payload);
        let again: T = from_json_value(&encoded).unwrap();
        assert_eq!(&again, decoded);
    }

    /// Decode `payload` as `E`, encode it again and expect the same JSON and
    /// an equal entity.
    pub(crate) fn assert_round_trip<E: Entity + PartialEq>(payload: Value) -> E {
        let decoded: E =
            from_json_value(&payload).unwrap_or_else(|e| panic!("{}: {}", e, payload));
        let map = to_wire_map(Some(&decoded)).unwrap().unwrap();
        assert_same(&payload, &decoded, map);
        decoded
    }

    /// [`assert_round_trip`] for a union, which must keep the variant's tag.
    pub(crate) fn assert_union_round_trip<U>(
        payload: Value,
        type_tag: fn(&U) -> Option<&'static str>,
        wire_map: fn(&U) -> Result<WireMap, MergeError>,
    ) -> U
    where
        U: WireField + PartialEq + Debug,
    {
        let decoded: U =
            from_json_value(&payload).unwrap_or_else(|e| panic!("{}: {}", e, payload));
        assert_eq!(type_tag(&decoded), payload["$type"].as_str());
        assert_same(&payload, &decoded, wire_map(&decoded).unwrap());
        decoded
    }
}
