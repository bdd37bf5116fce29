//! Entity codec.
//!
//! Encoding goes entity → [`WireMap`] → JSON bytes. The wire map of an entity
//! is built from two views: the explicitly supplied fields (so that a caller
//! can send an explicit `null`) and every non-null field (so that defaults
//! such as the `$type` discriminator are always present). The second view is
//! deep-merged onto the first.
//!
//! Decoding parses JSON and lets each [`WireField`] pick its own value out of
//! the payload, dispatching unions on `$type`.

mod error;
mod field;
pub mod timestamp;
mod wire;

pub use error::{DecodeError, EncodeError, MergeError};
pub use field::{View, WireField};
pub use wire::{deep_update, WireMap, WireValue};

use serde_json::Value;

use crate::model::Entity;

/// Wire map of `entity`, or `None` when there is no entity.
///
/// # Errors
///
/// Returns a [`MergeError`] if the two views of the entity disagree
/// structurally, which means a field value changed shape between them.
pub fn to_wire_map<E: Entity>(entity: Option<&E>) -> Result<Option<WireMap>, MergeError> {
    let Some(entity) = entity else {
        return Ok(None);
    };

    let mut merged = entity.wire_view(View::Explicit);
    wire::merge_into(&mut merged, &entity.wire_view(View::NonNull))?;
    Ok(Some(merged))
}

/// JSON value of a wire value.
pub fn to_json_value(value: &WireValue) -> Result<Value, EncodeError> {
    value.to_json()
}

/// JSON bytes of a wire value.
pub fn to_wire_bytes(value: &WireValue) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(&value.to_json()?)?)
}

/// Encode an entity straight to JSON bytes.
pub fn encode_entity<E: Entity>(entity: &E) -> Result<Vec<u8>, EncodeError> {
    let map = to_wire_map(Some(entity))?.unwrap_or_default();
    to_wire_bytes(&WireValue::Map(map))
}

/// Decode `T` from a JSON payload.
pub fn from_wire_bytes<T: WireField>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_json_value(&value)
}

/// Decode `T` from an already parsed JSON value.
pub fn from_json_value<T: WireField>(value: &Value) -> Result<T, DecodeError> {
    T::from_wire(value, "$")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity;
    use chrono::{DateTime, NaiveDate, Utc};
    use serde_json::json;

    entity! {
        struct SimpleModel: "SimpleModel" {
            id: Option<String>,
            short_name as "shortName": Option<String>,
            value: Option<i64>,
        }
    }

    entity! {
        struct NestedModel: "NestedModel" {
            id: Option<String>,
            value: Option<SimpleModel>,
        }
    }

    entity! {
        struct SequenceModel: "SequenceModel" {
            items: Option<Vec<NestedModel>>,
        }
    }

    entity! {
        struct TimedModel: "TimedModel" {
            created: Option<DateTime<Utc>>,
            due: Option<NaiveDate>,
            ratio: Option<f64>,
        }
    }

    fn encode<E: Entity>(entity: &E) -> Value {
        let map = to_wire_map(Some(entity)).unwrap().unwrap();
        to_json_value(&WireValue::Map(map)).unwrap()
    }

    #[test]
    fn test_none_short_circuits() {
        assert_eq!(to_wire_map::<SimpleModel>(None).unwrap(), None);
    }

    #[test]
    fn test_explicit_null_is_kept() {
        let model = SimpleModel::new()
            .with_short_name(Some("Demo".into()))
            .with_value(None);
        assert_eq!(
            encode(&model),
            json!({"$type": "SimpleModel", "shortName": "Demo", "value": null})
        );
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        assert_eq!(encode(&SimpleModel::new()), json!({"$type": "SimpleModel"}));
    }

    #[test]
    fn test_wire_order_follows_explicit_fields_first() {
        let model = SimpleModel::new().with_value(None).with_id(Some("1".into()));
        let map = to_wire_map(Some(&model)).unwrap().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["id", "value", "$type"]);
    }

    #[test]
    fn test_nested_sequence_keeps_types() {
        let model = SequenceModel::new().with_items(Some(vec![
            NestedModel::new(),
            NestedModel::new().with_value(Some(SimpleModel::new().with_id(Some("7".into())))),
        ]));
        assert_eq!(
            encode(&model),
            json!({
                "$type": "SequenceModel",
                "items": [
                    {"$type": "NestedModel"},
                    {"$type": "NestedModel", "value": {"$type": "SimpleModel", "id": "7"}},
                ],
            })
        );
    }

    #[test]
    fn test_times_encode_as_millis() {
        let model = TimedModel::new()
            .with_created(Some("2021-02-09T14:03:11Z".parse().unwrap()))
            .with_due(NaiveDate::from_ymd_opt(2022, 2, 17));
        let bytes = encode_entity(&model).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            json!({"$type": "TimedModel", "created": 1612879391000_i64, "due": 1645099200000_i64})
        );
    }

    #[test]
    fn test_non_finite_float_fails() {
        let model = TimedModel::new().with_ratio(Some(f64::INFINITY));
        assert!(matches!(
            encode_entity(&model),
            Err(EncodeError::NonFiniteFloat(_, _))
        ));
    }

    #[test]
    fn test_decode_round_trip() {
        let model = NestedModel::new()
            .with_id(Some("1-2".into()))
            .with_value(Some(SimpleModel::new().with_short_name(Some("DEMO".into()))));
        let bytes = encode_entity(&model).unwrap();
        let decoded: NestedModel = from_wire_bytes(&bytes).unwrap();
        assert_eq!(decoded, model);
        assert!(decoded.fields_set().contains("value"));
    }

    #[test]
    fn test_decode_ignores_unknown_keys_and_defaults_tag() {
        let decoded: SimpleModel =
            from_json_value(&json!({"id": "1", "unexpected": [1, 2, 3]})).unwrap();
        assert_eq!(decoded.type_tag(), Some("SimpleModel"));
        assert_eq!(decoded.id().as_deref(), Some("1"));
        assert!(!decoded.fields_set().contains("short_name"));
    }

    #[test]
    fn test_decode_unknown_tag_fails() {
        let result: Result<SimpleModel, _> = from_json_value(&json!({"$type": "Other"}));
        assert!(matches!(
            result,
            Err(DecodeError::UnknownDiscriminator { ref tag, .. }) if tag == "Other"
        ));
    }

    #[test]
    fn test_decode_malformed_json() {
        let result: Result<SimpleModel, _> = from_wire_bytes(b"{not json");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_list_payload() {
        let decoded: Vec<SimpleModel> =
            from_wire_bytes(br#"[{"$type":"SimpleModel","id":"a"},{"$type":"SimpleModel","id":"b"}]"#)
                .unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].id().as_deref(), Some("b"));
    }
}
