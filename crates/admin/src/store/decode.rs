//! Schema validation from store documents to typed orders.
//!
//! Expected document shape (collection `orders`):
//!
//! ```text
//! customer    mapValue   { name: string, address: string, phone: string }
//! createdAt   timestampValue
//! cartItems   arrayValue of mapValue { id: string|integer, name: string,
//!                                      price: number, quantity: integer >= 1 }
//! totalPrice  integerValue | doubleValue, >= 0
//! ```
//!
//! Unknown fields are ignored.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use orderdesk_core::{CartItem, CartItemId, Customer, Order, OrderId, Price};
use rust_decimal::Decimal;
use thiserror::Error;

use super::document::{Document, Value};

/// Display format for creation timestamps, e.g. `5/1/2024, 10:00:00 AM`.
pub const CREATED_AT_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// A document that does not match the order schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("document {doc} has no id")]
    MissingId { doc: String },

    #[error("document {doc}: missing field `{field}`")]
    MissingField { doc: String, field: String },

    #[error("document {doc}: field `{field}` should be {expected}, got {found}")]
    WrongType {
        doc: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("document {doc}: field `{field}` is not a valid number: {value}")]
    InvalidNumber {
        doc: String,
        field: String,
        value: String,
    },

    #[error("document {doc}: field `{field}` is not a valid timestamp: {value}")]
    InvalidTimestamp {
        doc: String,
        field: String,
        value: String,
    },

    #[error("document {doc}: field `{field}` must be at least 1, got {value}")]
    NonPositiveQuantity {
        doc: String,
        field: String,
        value: String,
    },

    #[error("document {doc}: field `{field}` must not be negative, got {value}")]
    NegativeAmount {
        doc: String,
        field: String,
        value: String,
    },
}

/// Field lookup within one document, tracking the path for error messages.
struct Fields<'a> {
    doc: &'a str,
    path: String,
    fields: &'a BTreeMap<String, Value>,
}

impl<'a> Fields<'a> {
    const fn root(doc: &'a str, fields: &'a BTreeMap<String, Value>) -> Self {
        Self {
            doc,
            path: String::new(),
            fields,
        }
    }

    fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn get(&self, key: &str) -> Result<&'a Value, DecodeError> {
        match self.fields.get(key) {
            Some(Value::NullValue(_)) | None => Err(DecodeError::MissingField {
                doc: self.doc.to_string(),
                field: self.path_of(key),
            }),
            Some(value) => Ok(value),
        }
    }

    fn wrong_type(&self, key: &str, expected: &'static str, found: &Value) -> DecodeError {
        DecodeError::WrongType {
            doc: self.doc.to_string(),
            field: self.path_of(key),
            expected,
            found: found.kind(),
        }
    }

    fn string(&self, key: &str) -> Result<String, DecodeError> {
        match self.get(key)? {
            Value::StringValue(s) => Ok(s.clone()),
            other => Err(self.wrong_type(key, "stringValue", other)),
        }
    }

    fn map(&self, key: &str) -> Result<Self, DecodeError> {
        match self.get(key)? {
            Value::MapValue(map) => Ok(Self {
                doc: self.doc,
                path: self.path_of(key),
                fields: &map.fields,
            }),
            other => Err(self.wrong_type(key, "mapValue", other)),
        }
    }

    fn array(&self, key: &str) -> Result<&'a [Value], DecodeError> {
        match self.get(key)? {
            Value::ArrayValue(array) => Ok(&array.values),
            other => Err(self.wrong_type(key, "arrayValue", other)),
        }
    }

    fn timestamp(&self, key: &str) -> Result<DateTime<Utc>, DecodeError> {
        match self.get(key)? {
            Value::TimestampValue(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|_| DecodeError::InvalidTimestamp {
                    doc: self.doc.to_string(),
                    field: self.path_of(key),
                    value: raw.clone(),
                }),
            other => Err(self.wrong_type(key, "timestampValue", other)),
        }
    }

    /// Integer or double, non-negative.
    fn amount(&self, key: &str) -> Result<Decimal, DecodeError> {
        let invalid = |value: String| DecodeError::InvalidNumber {
            doc: self.doc.to_string(),
            field: self.path_of(key),
            value,
        };

        let amount = match self.get(key)? {
            Value::IntegerValue(raw) => Decimal::from_str(raw).map_err(|_| invalid(raw.clone()))?,
            Value::DoubleValue(v) => Decimal::try_from(*v).map_err(|_| invalid(v.to_string()))?,
            other => return Err(self.wrong_type(key, "integerValue or doubleValue", other)),
        };

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DecodeError::NegativeAmount {
                doc: self.doc.to_string(),
                field: self.path_of(key),
                value: amount.to_string(),
            });
        }
        Ok(amount)
    }

    fn quantity(&self, key: &str) -> Result<u32, DecodeError> {
        let raw = match self.get(key)? {
            Value::IntegerValue(raw) => raw,
            other => return Err(self.wrong_type(key, "integerValue", other)),
        };

        let value = raw.parse::<i64>().map_err(|_| DecodeError::InvalidNumber {
            doc: self.doc.to_string(),
            field: self.path_of(key),
            value: raw.clone(),
        })?;

        if value < 1 {
            return Err(DecodeError::NonPositiveQuantity {
                doc: self.doc.to_string(),
                field: self.path_of(key),
                value: raw.clone(),
            });
        }

        u32::try_from(value).map_err(|_| DecodeError::InvalidNumber {
            doc: self.doc.to_string(),
            field: self.path_of(key),
            value: raw.clone(),
        })
    }

    /// Item IDs are strings, but integer IDs are accepted and stringified.
    fn id_like(&self, key: &str) -> Result<String, DecodeError> {
        match self.get(key)? {
            Value::StringValue(s) if !s.is_empty() => Ok(s.clone()),
            Value::IntegerValue(raw) => Ok(raw.clone()),
            Value::StringValue(_) => Err(DecodeError::MissingField {
                doc: self.doc.to_string(),
                field: self.path_of(key),
            }),
            other => Err(self.wrong_type(key, "stringValue or integerValue", other)),
        }
    }
}

/// Format a timestamp for the order date column in the given time zone.
#[must_use]
pub fn format_created_at<Tz>(created_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    created_at
        .with_timezone(tz)
        .format(CREATED_AT_FORMAT)
        .to_string()
}

/// Decode one store document into an [`Order`].
///
/// `tz` selects the zone the creation timestamp is displayed in.
///
/// # Errors
///
/// Returns a [`DecodeError`] naming the document and the first field that
/// does not match the order schema.
pub fn decode_order<Tz>(doc: &Document, tz: &Tz) -> Result<Order, DecodeError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let doc_id = doc.id();
    let id = OrderId::parse(doc_id).map_err(|_| DecodeError::MissingId {
        doc: doc.name.clone(),
    })?;
    let fields = Fields::root(doc_id, &doc.fields);

    let customer = fields.map("customer")?;
    let customer = Customer {
        name: customer.string("name")?,
        address: customer.string("address")?,
        phone: customer.string("phone")?,
    };

    let created_at = format_created_at(&fields.timestamp("createdAt")?, tz);

    let cart_items = fields
        .array("cartItems")?
        .iter()
        .enumerate()
        .map(|(index, value)| decode_cart_item(&fields, index, value))
        .collect::<Result<Vec<_>, _>>()?;

    let total_price = Price::from_amount(fields.amount("totalPrice")?);

    Ok(Order {
        id,
        customer,
        created_at,
        cart_items,
        total_price,
    })
}

fn decode_cart_item(
    parent: &Fields<'_>,
    index: usize,
    value: &Value,
) -> Result<CartItem, DecodeError> {
    let key = format!("cartItems[{index}]");
    let Value::MapValue(map) = value else {
        return Err(parent.wrong_type(&key, "mapValue", value));
    };
    let item = Fields {
        doc: parent.doc,
        path: parent.path_of(&key),
        fields: &map.fields,
    };

    let id = item.id_like("id")?;
    Ok(CartItem {
        id: CartItemId::parse(id).map_err(|_| DecodeError::MissingField {
            doc: item.doc.to_string(),
            field: item.path_of("id"),
        })?,
        name: item.string("name")?,
        price: Price::from_amount(item.amount("price")?),
        quantity: item.quantity("quantity")?,
    })
}
