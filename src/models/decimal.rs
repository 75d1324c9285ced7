//! Decimal-as-string decoding.
//!
//! The server serializes decimal columns as strings (`"12.50"`). Integral JSON
//! numbers are also accepted since they convert to text exactly. A fractional
//! number has already been parsed into a float and may have lost digits or
//! trailing zeros, so it is a decode error.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal as a string or an integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Err(E::custom(format!(
            "decimal {v} was sent as a JSON float; expected a string"
        )))
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DecimalVisitor)
}

/// Same as [`deserialize`] for optional fields; `null` decodes to `None`.
pub mod option {
    use super::*;

    struct OptionVisitor;

    impl<'de> Visitor<'de> for OptionVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an optional decimal")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            super::deserialize(deserializer).map(Some)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "super::deserialize")]
        amount: String,
        #[serde(default, deserialize_with = "super::option::deserialize")]
        km: Option<String>,
    }

    #[test]
    fn test_string_kept_verbatim() {
        let row: Row = serde_json::from_str(r#"{"amount": "1200.50", "km": "0.10"}"#).unwrap();
        assert_eq!(row.amount, "1200.50");
        assert_eq!(row.km.as_deref(), Some("0.10"));
    }

    #[test]
    fn test_integers_accepted_exactly() {
        let row: Row = serde_json::from_str(r#"{"amount": 42, "km": -3}"#).unwrap();
        assert_eq!(row.amount, "42");
        assert_eq!(row.km.as_deref(), Some("-3"));

        let row: Row = serde_json::from_str(r#"{"amount": 12345678901234567}"#).unwrap();
        assert_eq!(row.amount, "12345678901234567");
    }

    #[test]
    fn test_fractional_numbers_rejected() {
        for body in [
            r#"{"amount": 420.10}"#,
            r#"{"amount": 12345678901234567.89}"#,
            r#"{"amount": "1", "km": 12.5}"#,
            r#"{"amount": 123456789012345678901234}"#,
        ] {
            let err = serde_json::from_str::<Row>(body).unwrap_err();
            assert!(err.to_string().contains("JSON float"), "{body}: {err}");
        }

        let row: Row =
            serde_json::from_str(r#"{"amount": "420.10", "km": "12345678901234567.89"}"#).unwrap();
        assert_eq!(row.amount, "420.10");
        assert_eq!(row.km.as_deref(), Some("12345678901234567.89"));
    }

    #[test]
    fn test_null_and_missing_optional() {
        let row: Row = serde_json::from_str(r#"{"amount": "1", "km": null}"#).unwrap();
        assert!(row.km.is_none());

        let row: Row = serde_json::from_str(r#"{"amount": "1"}"#).unwrap();
        assert!(row.km.is_none());
    }

    #[test]
    fn test_rejects_non_scalar() {
        assert!(serde_json::from_str::<Row>(r#"{"amount": true}"#).is_err());
    }
}
