//! JSON (de)serialization for records as served by the portal API.
//!
//! ## Read Format (Deserialization)
//!
//! Each record is one JSON object:
//! - `"@entity": "project"` sets the entity name and is not stored as a field
//! - `"id"` (string or number) sets the record ID and is also kept as a field
//! - RFC 3339 strings become `DateTime`, `YYYY-MM-DD` strings become `Date`
//! - Integers become `Int`, other numbers `Float`
//! - Arrays become `List`, nested objects become nested `Record`s
//!
//! ## Write Format (Serialization)
//!
//! Records serialize back to a flat object. Dates are written in the same
//! string forms they are read from, decimals as strings, and nulls are
//! skipped.

use std::fmt;

use chrono::NaiveDate;
use chrono::SecondsFormat;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;

use super::Record;
use super::Value;

const ENTITY_KEY: &str = "@entity";
const ID_KEY: &str = "id";

impl Record {
    /// Parses a JSON array of record objects, as returned by a listing
    /// endpoint.
    ///
    /// # Example
    ///
    /// ```
    /// use finportal_lib::model::Record;
    ///
    /// let records = Record::list_from_json(r#"[{"id": 1, "name": "Alpha"}]"#).unwrap();
    /// assert_eq!(records[0].id(), Some("1"));
    /// ```
    pub fn list_from_json(json: &str) -> Result<Vec<Record>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// =============================================================================
// Serialization
// =============================================================================

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::Decimal(d) => Serialize::serialize(d, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(record) => record.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        if !self.entity_name.is_empty() {
            map.serialize_entry(ENTITY_KEY, &self.entity_name)?;
        }
        // The ID is only written separately when no field carries it
        if let Some(id) = &self.id {
            if !self.fields.contains_key(ID_KEY) {
                map.serialize_entry(ID_KEY, id)?;
            }
        }

        for (key, value) in &self.fields {
            if value.is_null() {
                continue;
            }
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

// =============================================================================
// Deserialization
// =============================================================================

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(json_value_to_value)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map representing a portal record")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Record, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut object = serde_json::Map::new();
        while let Some(key) = map.next_key::<String>()? {
            let value: serde_json::Value = map.next_value()?;
            object.insert(key, value);
        }
        Ok(object_to_record(object))
    }
}

fn object_to_record(object: serde_json::Map<String, serde_json::Value>) -> Record {
    let mut record = Record::default();

    for (key, json_value) in object {
        if key == ENTITY_KEY {
            if let serde_json::Value::String(name) = json_value {
                record.entity_name = name;
            }
            continue;
        }

        if key == ID_KEY {
            match &json_value {
                serde_json::Value::String(s) => record.id = Some(s.clone()),
                serde_json::Value::Number(n) => record.id = Some(n.to_string()),
                _ => {}
            }
        }

        record.fields.insert(key, json_value_to_value(json_value));
    }

    record
}

/// Converts a serde_json::Value to our Value enum.
fn json_value_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                n.as_f64().map(Value::Float).unwrap_or(Value::Null)
            }
        }
        serde_json::Value::String(s) => {
            // Try to parse as DateTime (RFC 3339)
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                Value::DateTime(dt.with_timezone(&chrono::Utc))
            }
            // Then as a plain calendar date
            else if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                Value::Date(date)
            }
            // Otherwise keep as string
            else {
                Value::String(s)
            }
        }
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(json_value_to_value).collect())
        }
        serde_json::Value::Object(object) => Value::Record(Box::new(object_to_record(object))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_deserialize_simple_fields() {
        let json = r#"{"@entity": "project", "id": 42, "name": "Alpha", "amount": 10, "share": 0.25}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.entity_name(), "project");
        assert_eq!(record.id(), Some("42"));
        assert_eq!(record.get("id"), Some(&Value::Int(42)));
        assert!(!record.contains("@entity"));
        assert_eq!(record.get_string("name").unwrap(), Some("Alpha"));
        assert_eq!(record.get_int("amount").unwrap(), Some(10));
        assert_eq!(record.get("share"), Some(&Value::Float(0.25)));
    }

    #[test]
    fn test_deserialize_dates() {
        let json = r#"{"start": "2024-03-01", "updated": "2024-03-01T10:30:00Z", "code": "2024"}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.get_date("start").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            record.get_datetime("updated").unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(record.get_string("code").unwrap(), Some("2024"));
    }

    #[test]
    fn test_deserialize_nested_and_lists() {
        let json = r#"{"agency": {"name": "Ministry of Environment"}, "sectors": ["energy", "water"]}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.get_path("agency.name"),
            Some(&Value::from("Ministry of Environment"))
        );
        assert_eq!(
            record.get_list("sectors").unwrap(),
            Some(&[Value::from("energy"), Value::from("water")][..])
        );
    }

    #[test]
    fn test_list_from_json_rejects_non_objects() {
        assert!(Record::list_from_json("[1, 2]").is_err());
        assert!(Record::list_from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_serialize_skips_nulls() {
        let record = Record::with_id("project", "p-1")
            .set("name", "Alpha")
            .set("amount", Decimal::new(1050, 2))
            .set("closed", Value::Null)
            .set("start", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"@entity\":\"project\""));
        assert!(json.contains("\"id\":\"p-1\""));
        assert!(json.contains("\"name\":\"Alpha\""));
        assert!(json.contains("\"amount\":\"10.50\""));
        assert!(json.contains("\"start\":\"2024-03-01\""));
        assert!(!json.contains("closed"));
    }

    #[test]
    fn test_serialize_decimal_value() {
        let json = serde_json::to_value(Value::Decimal(Decimal::new(1050, 2))).unwrap();
        assert_eq!(json, serde_json::Value::String("10.50".to_string()));

        let nested = Value::List(vec![Value::Decimal(Decimal::new(-3, 0)), Value::Int(4)]);
        assert_eq!(serde_json::to_string(&nested).unwrap(), r#"["-3",4]"#);
    }
}
