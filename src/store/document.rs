//! Wire model for documents held by the hosted store.
//!
//! The store keeps loosely-typed key/value documents: every field is a
//! tagged union value and nothing about a document's schema is guaranteed.
//! Readers go through the typed accessors here once, immediately after
//! fetch, and work with typed values from then on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A latitude/longitude pair as encoded on the wire.
///
/// Wire values are not validated; see `feed::record::Coordinates` for the
/// bounds-checked canonical type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// An array field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<FieldValue>,
}

/// A nested map field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapValue {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, FieldValue>,
}

/// One loosely-typed document field.
///
/// Integer values are string-encoded on the wire (64-bit integers do not
/// survive JSON number representation), which is also why the normalizer can
/// pass them through verbatim when stringifying quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    GeoPointValue(LatLng),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

impl FieldValue {
    /// String field value
    pub fn string(value: impl Into<String>) -> Self {
        FieldValue::StringValue(value.into())
    }

    /// Integer field value (string-encoded on the wire)
    pub fn integer(value: i64) -> Self {
        FieldValue::IntegerValue(value.to_string())
    }

    /// Double field value
    pub fn double(value: f64) -> Self {
        FieldValue::DoubleValue(value)
    }

    /// Boolean field value
    pub fn boolean(value: bool) -> Self {
        FieldValue::BooleanValue(value)
    }

    /// Timestamp field value
    pub fn timestamp(value: DateTime<Utc>) -> Self {
        FieldValue::TimestampValue(value)
    }

    /// Geo-point field value
    pub fn geo_point(latitude: f64, longitude: f64) -> Self {
        FieldValue::GeoPointValue(LatLng {
            latitude,
            longitude,
        })
    }
}

/// One document fetched from or written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name; the trailing path segment is the document id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    /// The store-assigned document id (last segment of the resource name)
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or("")
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Read a field as a string, if it is one
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldValue::StringValue(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Read a field as a boolean, if it is one
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.fields.get(key) {
            Some(FieldValue::BooleanValue(b)) => Some(*b),
            _ => None,
        }
    }

    /// Read a numeric field, accepting either integer or double encoding
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.fields.get(key) {
            Some(FieldValue::DoubleValue(d)) => Some(*d),
            Some(FieldValue::IntegerValue(s)) => s.parse().ok(),
            _ => None,
        }
    }

    /// Read a native timestamp field, if it is one
    pub fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(key) {
            Some(FieldValue::TimestampValue(t)) => Some(*t),
            _ => None,
        }
    }

    /// Read a geo-point field, if it is one
    pub fn get_geo_point(&self, key: &str) -> Option<&LatLng> {
        match self.fields.get(key) {
            Some(FieldValue::GeoPointValue(p)) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn field_value_wire_encoding() {
        let cases = vec![
            (FieldValue::string("Rice"), json!({"stringValue": "Rice"})),
            (FieldValue::integer(5), json!({"integerValue": "5"})),
            (FieldValue::double(2.5), json!({"doubleValue": 2.5})),
            (FieldValue::boolean(true), json!({"booleanValue": true})),
            (FieldValue::NullValue(()), json!({"nullValue": null})),
            (
                FieldValue::geo_point(28.6, 77.2),
                json!({"geoPointValue": {"latitude": 28.6, "longitude": 77.2}}),
            ),
        ];

        for (value, wire) in cases {
            assert_eq!(serde_json::to_value(&value).unwrap(), wire);
            let back: FieldValue = serde_json::from_value(wire).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn timestamp_value_round_trips() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let value = FieldValue::timestamp(ts);
        let wire = serde_json::to_value(&value).unwrap();
        let back: FieldValue = serde_json::from_value(wire).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn document_id_is_last_path_segment() {
        let doc = Document {
            name: "projects/p/databases/(default)/documents/donations/abc123".to_string(),
            ..Default::default()
        };
        assert_eq!(doc.id(), "abc123");
    }

    #[test]
    fn typed_accessors_reject_wrong_types() {
        let mut fields = HashMap::new();
        fields.insert("quantity".to_string(), FieldValue::string("loaves"));
        fields.insert("count".to_string(), FieldValue::integer(7));
        let doc = Document {
            name: "d/x".to_string(),
            fields,
            ..Default::default()
        };

        assert_eq!(doc.get_f64("quantity"), None);
        assert_eq!(doc.get_f64("count"), Some(7.0));
        assert_eq!(doc.get_str("count"), None);
        assert_eq!(doc.get_bool("quantity"), None);
    }

    #[test]
    fn nested_map_and_array_values_parse() {
        let wire = json!({
            "mapValue": {
                "fields": {
                    "tags": {"arrayValue": {"values": [{"stringValue": "food"}]}}
                }
            }
        });
        let value: FieldValue = serde_json::from_value(wire).unwrap();
        match value {
            FieldValue::MapValue(map) => match map.fields.get("tags") {
                Some(FieldValue::ArrayValue(arr)) => {
                    assert_eq!(arr.values, vec![FieldValue::string("food")]);
                }
                other => panic!("unexpected tags value: {:?}", other),
            },
            other => panic!("unexpected value: {:?}", other),
        }
    }
}
