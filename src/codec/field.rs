//! Per-type wire conversion.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::error::DecodeError;
use super::timestamp::{millis_to_date, millis_to_datetime};
use super::wire::WireValue;

/// Which fields of an entity a wire view contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Only fields that were explicitly supplied, nulls included.
    Explicit,
    /// Every field whose value is not null, defaults included.
    NonNull,
}

/// A value that can appear as a field of an entity.
pub trait WireField: Sized {
    /// Wire form of the value for `view`.
    fn to_wire(&self, view: View) -> WireValue;

    /// Decode from a JSON value found under `key`.
    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError>;

    /// Whether the value is null on the wire.
    fn is_null(&self) -> bool {
        false
    }

    /// Value to use when the key is missing from a payload.
    ///
    /// `None` marks the field as required.
    fn absent() -> Option<Self> {
        None
    }
}

impl WireField for String {
    fn to_wire(&self, _view: View) -> WireValue {
        WireValue::String(self.clone())
    }

    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(DecodeError::invalid_type(key, "string", other)),
        }
    }
}

impl WireField for i64 {
    fn to_wire(&self, _view: View) -> WireValue {
        WireValue::Int(*self)
    }

    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        value
            .as_i64()
            .ok_or_else(|| DecodeError::invalid_type(key, "integer", value))
    }
}

impl WireField for f64 {
    fn to_wire(&self, _view: View) -> WireValue {
        WireValue::Float(*self)
    }

    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        value
            .as_f64()
            .ok_or_else(|| DecodeError::invalid_type(key, "float", value))
    }
}

impl WireField for bool {
    fn to_wire(&self, _view: View) -> WireValue {
        WireValue::Bool(*self)
    }

    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        value
            .as_bool()
            .ok_or_else(|| DecodeError::invalid_type(key, "boolean", value))
    }
}

impl WireField for DateTime<Utc> {
    fn to_wire(&self, _view: View) -> WireValue {
        WireValue::DateTime(*self)
    }

    /// Accepts epoch milliseconds or an RFC 3339 string.
    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .and_then(millis_to_datetime)
                .ok_or_else(|| DecodeError::invalid_timestamp(key, n)),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|_| DecodeError::invalid_timestamp(key, s)),
            other => Err(DecodeError::invalid_type(key, "timestamp", other)),
        }
    }
}

impl WireField for NaiveDate {
    fn to_wire(&self, _view: View) -> WireValue {
        WireValue::Date(*self)
    }

    /// Accepts epoch milliseconds of noon UTC or a `YYYY-MM-DD` string.
    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .and_then(millis_to_date)
                .ok_or_else(|| DecodeError::invalid_timestamp(key, n)),
            Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| DecodeError::invalid_timestamp(key, s)),
            other => Err(DecodeError::invalid_type(key, "date", other)),
        }
    }
}

impl<T: WireField> WireField for Option<T> {
    fn to_wire(&self, view: View) -> WireValue {
        match self {
            Some(value) => value.to_wire(view),
            None => WireValue::Null,
        }
    }

    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_wire(other, key).map(Some),
        }
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl<T: WireField> WireField for Vec<T> {
    fn to_wire(&self, view: View) -> WireValue {
        WireValue::Seq(self.iter().map(|item| item.to_wire(view)).collect())
    }

    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        match value {
            Value::Array(items) => items.iter().map(|item| T::from_wire(item, key)).collect(),
            other => Err(DecodeError::invalid_type(key, "array", other)),
        }
    }
}

impl<T: WireField> WireField for Box<T> {
    fn to_wire(&self, view: View) -> WireValue {
        self.as_ref().to_wire(view)
    }

    fn from_wire(value: &Value, key: &str) -> Result<Self, DecodeError> {
        T::from_wire(value, key).map(Box::new)
    }

    fn is_null(&self) -> bool {
        self.as_ref().is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_strict_string() {
        assert_eq!(String::from_wire(&json!("x"), "k").unwrap(), "x");
        assert!(matches!(
            String::from_wire(&json!(1), "k"),
            Err(DecodeError::InvalidType {
                expected: "string",
                found: "integer",
                ..
            })
        ));
    }

    #[test]
    fn test_integer_rejects_float() {
        assert_eq!(i64::from_wire(&json!(42), "k").unwrap(), 42);
        assert!(i64::from_wire(&json!(4.2), "k").is_err());
        assert!(i64::from_wire(&json!("42"), "k").is_err());
    }

    #[test]
    fn test_float_accepts_integer() {
        assert_eq!(f64::from_wire(&json!(3), "k").unwrap(), 3.0);
        assert_eq!(f64::from_wire(&json!(2.5), "k").unwrap(), 2.5);
    }

    #[test]
    fn test_timestamp_from_millis_and_string() {
        let expected = Utc.with_ymd_and_hms(2021, 2, 9, 14, 3, 11).unwrap();
        assert_eq!(
            DateTime::<Utc>::from_wire(&json!(1612879391000_i64), "created").unwrap(),
            expected
        );
        assert_eq!(
            DateTime::<Utc>::from_wire(&json!("2021-02-09T16:03:11+02:00"), "created").unwrap(),
            expected
        );
        assert!(matches!(
            DateTime::<Utc>::from_wire(&json!("yesterday"), "created"),
            Err(DecodeError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_date_from_millis_and_string() {
        let expected = NaiveDate::from_ymd_opt(2022, 2, 17).unwrap();
        assert_eq!(
            NaiveDate::from_wire(&json!(1645099200000_i64), "value").unwrap(),
            expected
        );
        assert_eq!(
            NaiveDate::from_wire(&json!("2022-02-17"), "value").unwrap(),
            expected
        );
    }

    #[test]
    fn test_option_defaults_and_null() {
        assert_eq!(<Option<String>>::absent(), Some(None));
        assert_eq!(<Option<String>>::from_wire(&json!(null), "k").unwrap(), None);
        assert!(<Option<String>>::None.is_null());
        assert_eq!(<Vec<String>>::absent(), None);
    }

    #[test]
    fn test_sequence_rejects_null() {
        assert!(matches!(
            <Vec<String>>::from_wire(&json!(null), "value"),
            Err(DecodeError::InvalidType {
                expected: "array",
                ..
            })
        ));
        assert_eq!(
            <Vec<i64>>::from_wire(&json!([1, 2]), "value").unwrap(),
            vec![1, 2]
        );
    }
}
