//! Generic wire values and the structural deep merge.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Number, Value};

use super::error::{EncodeError, MergeError};
use super::timestamp::{date_to_millis, datetime_to_millis};

/// A JSON-ready value that still knows about dates and instants.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Seq(Vec<WireValue>),
    Map(WireMap),
}

impl WireValue {
    /// Structural kind, used in merge errors.
    pub fn kind(&self) -> &'static str {
        match self {
            WireValue::Null => "null",
            WireValue::Bool(_) => "boolean",
            WireValue::Int(_) => "integer",
            WireValue::Float(_) => "float",
            WireValue::String(_) => "string",
            WireValue::Date(_) => "date",
            WireValue::DateTime(_) => "timestamp",
            WireValue::Seq(_) => "sequence",
            WireValue::Map(_) => "map",
        }
    }

    pub fn as_map(&self) -> Option<&WireMap> {
        match self {
            WireValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Convert to JSON, applying the epoch millisecond convention.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::NonFiniteFloat`] for NaN and infinities.
    pub fn to_json(&self) -> Result<Value, EncodeError> {
        self.to_json_at("$")
    }

    fn to_json_at(&self, key: &str) -> Result<Value, EncodeError> {
        Ok(match self {
            WireValue::Null => Value::Null,
            WireValue::Bool(value) => Value::Bool(*value),
            WireValue::Int(value) => Value::from(*value),
            WireValue::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .ok_or_else(|| EncodeError::NonFiniteFloat(*value, key.to_string()))?,
            WireValue::String(value) => Value::String(value.clone()),
            WireValue::Date(value) => Value::from(date_to_millis(*value)),
            WireValue::DateTime(value) => Value::from(datetime_to_millis(value)),
            WireValue::Seq(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.to_json_at(key))
                    .collect::<Result<_, _>>()?,
            ),
            WireValue::Map(map) => {
                let mut object = Map::with_capacity(map.len());
                for (k, v) in map.iter() {
                    object.insert(k.to_string(), v.to_json_at(k)?);
                }
                Value::Object(object)
            }
        })
    }
}

impl From<WireMap> for WireValue {
    fn from(map: WireMap) -> Self {
        WireValue::Map(map)
    }
}

/// An insertion-ordered string-keyed map of wire values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireMap {
    entries: Vec<(String, WireValue)>,
}

impl WireMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut WireValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: WireValue) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, WireValue)> for WireMap {
    fn from_iter<I: IntoIterator<Item = (K, WireValue)>>(iter: I) -> Self {
        let mut map = WireMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Merge `source` into a copy of `dest`.
///
/// Maps merge key by key, sequences element by element, scalars from
/// `source` overwrite those in `dest`. Keys only present in `source` are
/// appended.
///
/// # Errors
///
/// - [`MergeError::TypeMismatch`] when a key holds structurally different values
/// - [`MergeError::LengthMismatch`] when two sequences differ in length
pub fn deep_update(dest: &WireMap, source: &WireMap) -> Result<WireMap, MergeError> {
    let mut merged = dest.clone();
    merge_into(&mut merged, source)?;
    Ok(merged)
}

pub(crate) fn merge_into(dest: &mut WireMap, source: &WireMap) -> Result<(), MergeError> {
    for (key, value) in source.iter() {
        match dest.get_mut(key) {
            Some(existing) => merge_value(existing, value, key)?,
            None => dest.insert(key, value.clone()),
        }
    }
    Ok(())
}

fn merge_value(dest: &mut WireValue, source: &WireValue, key: &str) -> Result<(), MergeError> {
    if std::mem::discriminant(dest) != std::mem::discriminant(source) {
        return Err(MergeError::TypeMismatch {
            key: key.to_string(),
            existing: dest.kind(),
            incoming: source.kind(),
        });
    }

    match (dest, source) {
        (WireValue::Map(dest), WireValue::Map(source)) => merge_into(dest, source),
        (WireValue::Seq(dest), WireValue::Seq(source)) => {
            if dest.len() != source.len() {
                return Err(MergeError::LengthMismatch {
                    key: key.to_string(),
                    existing: dest.len(),
                    incoming: source.len(),
                });
            }
            for (d, s) in dest.iter_mut().zip(source) {
                merge_value(d, s, key)?;
            }
            Ok(())
        }
        (dest, source) => {
            *dest = source.clone();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map<const N: usize>(entries: [(&str, WireValue); N]) -> WireMap {
        entries.into_iter().collect()
    }

    #[test]
    fn test_merge_appends_new_keys() {
        let dest = map([("value", WireValue::Null)]);
        let source = map([
            ("$type", WireValue::String("SimpleModel".into())),
            ("shortName", WireValue::String("Demo".into())),
        ]);
        let merged = deep_update(&dest, &source).unwrap();
        assert_eq!(
            merged.keys().collect::<Vec<_>>(),
            vec!["value", "$type", "shortName"]
        );
    }

    #[test]
    fn test_merge_recurses_into_maps() {
        let dest = map([("inner", WireValue::Map(map([("a", WireValue::Int(1))])))]);
        let source = map([("inner", WireValue::Map(map([("b", WireValue::Int(2))])))]);
        let merged = deep_update(&dest, &source).unwrap();
        let inner = merged.get("inner").and_then(WireValue::as_map).unwrap();
        assert_eq!(inner.get("a"), Some(&WireValue::Int(1)));
        assert_eq!(inner.get("b"), Some(&WireValue::Int(2)));
    }

    #[test]
    fn test_merge_sequences_elementwise() {
        let dest = map([(
            "items",
            WireValue::Seq(vec![WireValue::Map(WireMap::new())]),
        )]);
        let source = map([(
            "items",
            WireValue::Seq(vec![WireValue::Map(map([(
                "$type",
                WireValue::String("NestedModel".into()),
            )]))]),
        )]);
        let merged = deep_update(&dest, &source).unwrap();
        assert_eq!(
            merged.get("items").unwrap().to_json().unwrap(),
            json!([{"$type": "NestedModel"}])
        );
    }

    #[test]
    fn test_merge_source_scalar_wins() {
        let dest = map([("count", WireValue::Int(1))]);
        let source = map([("count", WireValue::Int(2))]);
        assert_eq!(
            deep_update(&dest, &source).unwrap().get("count"),
            Some(&WireValue::Int(2))
        );
    }

    #[test]
    fn test_merge_type_mismatch() {
        let dest = map([("value", WireValue::Map(WireMap::new()))]);
        let source = map([("value", WireValue::Seq(vec![]))]);
        assert_eq!(
            deep_update(&dest, &source),
            Err(MergeError::TypeMismatch {
                key: "value".into(),
                existing: "map",
                incoming: "sequence",
            })
        );
    }

    #[test]
    fn test_merge_length_mismatch() {
        let dest = map([("items", WireValue::Seq(vec![WireValue::Int(1)]))]);
        let source = map([("items", WireValue::Seq(vec![]))]);
        assert!(matches!(
            deep_update(&dest, &source),
            Err(MergeError::LengthMismatch {
                existing: 1,
                incoming: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_to_json_converts_times() {
        let value = map([
            (
                "created",
                WireValue::DateTime("2021-02-09T14:03:11Z".parse().unwrap()),
            ),
            (
                "due",
                WireValue::Date(NaiveDate::from_ymd_opt(2022, 2, 17).unwrap()),
            ),
        ]);
        assert_eq!(
            WireValue::Map(value).to_json().unwrap(),
            json!({"created": 1612879391000_i64, "due": 1645099200000_i64})
        );
    }

    #[test]
    fn test_to_json_rejects_nan() {
        let value = WireValue::Map(map([("ratio", WireValue::Float(f64::NAN))]));
        match value.to_json() {
            Err(EncodeError::NonFiniteFloat(_, key)) => assert_eq!(key, "ratio"),
            other => panic!("Expected NonFiniteFloat, got {:?}", other),
        }
    }
}
