//! Firestore document representation.
//!
//! Mirrors the REST v1 JSON shape: every field value is a single-key object
//! naming its type, e.g. `{"stringValue": "Pen"}` or
//! `{"mapValue": {"fields": {...}}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A document as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, e.g.
    /// `projects/p/databases/(default)/documents/orders/abc123`.
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// Create a document with the given resource name and fields.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: BTreeMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            fields,
            create_time: None,
            update_time: None,
        }
    }

    /// The document ID: the last segment of the resource name.
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Look up a top-level field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// A typed Firestore value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    /// Always the string `NULL_VALUE`.
    NullValue(Option<String>),
    BooleanValue(bool),
    /// 64-bit integers are transported as decimal strings.
    IntegerValue(String),
    DoubleValue(f64),
    /// RFC 3339 timestamp.
    TimestampValue(String),
    StringValue(String),
    /// Base64-encoded bytes.
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

impl Value {
    /// Name of the value's type as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NullValue(_) => "nullValue",
            Self::BooleanValue(_) => "booleanValue",
            Self::IntegerValue(_) => "integerValue",
            Self::DoubleValue(_) => "doubleValue",
            Self::TimestampValue(_) => "timestampValue",
            Self::StringValue(_) => "stringValue",
            Self::BytesValue(_) => "bytesValue",
            Self::ReferenceValue(_) => "referenceValue",
            Self::GeoPointValue(_) => "geoPointValue",
            Self::ArrayValue(_) => "arrayValue",
            Self::MapValue(_) => "mapValue",
        }
    }

    /// Convenience constructor for string values.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringValue(value.into())
    }

    /// Convenience constructor for integer values.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::IntegerValue(value.to_string())
    }

    /// Convenience constructor for map values.
    #[must_use]
    pub fn map(fields: impl IntoIterator<Item = (&'static str, Self)>) -> Self {
        Self::MapValue(MapValue {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        })
    }

    /// Convenience constructor for array values.
    #[must_use]
    pub fn array(values: Vec<Self>) -> Self {
        Self::ArrayValue(ArrayValue { values })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// An empty array is sent as `{}`, so `values` defaults to empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

/// Response body of a `documents.list` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    /// Omitted entirely when the collection is empty.
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}
