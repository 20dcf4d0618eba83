//! Order record type.
//!
//! An [`Order`] is one row of the `orders` table. It is built either from an
//! untrusted request payload (create/update) or from a stored row (read),
//! and never changes after construction.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::ValidationError;
use super::typed_value::{ColumnSpec, ColumnType, Row, TypedValue};

/// Name of the table holding orders.
pub const ORDERS_TABLE: &str = "orders";

/// Column holding the store-assigned identifier.
pub const ID_COLUMN: &str = "id";

/// Column holding the order name.
pub const NAME_COLUMN: &str = "name";

/// Column holding the creation timestamp.
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Store-assigned order identifier.
///
/// Identifiers handed out by the store start at one, so zero is never a
/// valid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(NonZeroU64);

impl OrderId {
    /// Create an id from a raw integer.
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidId(value.to_string()))
    }

    /// Parse an id from its decimal text form.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let value: u64 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidId(trimmed.to_string()))?;
        Self::new(value)
    }

    /// Largest id a signed 64-bit store key can hold.
    pub const MAX_STORED: u64 = i64::MAX.unsigned_abs();

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Whether a stored row can carry this id. Larger ids match nothing.
    #[must_use]
    pub const fn fits_store_key(self) -> bool {
        self.get() <= Self::MAX_STORED
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Whether a payload must carry an `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// The store assigns the id; any client-supplied value is dropped.
    Ignored,
    /// The payload must reference an existing order.
    Required,
}

/// One order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<OrderId>,
    name: String,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Columns of the `orders` table with their declared types.
    pub const COLUMNS: [ColumnSpec; 3] = [
        ColumnSpec::new(ID_COLUMN, ColumnType::Uint64),
        ColumnSpec::new(NAME_COLUMN, ColumnType::Utf8),
        ColumnSpec::new(CREATED_AT_COLUMN, ColumnType::Timestamp),
    ];

    /// Create an order that has not been stored yet.
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            id: None,
            name,
            created_at,
        })
    }

    /// Return a copy of this order carrying `id`.
    #[must_use]
    pub fn with_id(self, id: OrderId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// Build an order from a JSON request payload.
    ///
    /// `createdAt` accepts an RFC 3339 string or milliseconds since the Unix
    /// epoch. `id` accepts an unsigned integer or its decimal string form.
    pub fn from_payload(payload: &Value, policy: IdPolicy) -> Result<Self, ValidationError> {
        let object = payload.as_object().ok_or(ValidationError::NotAnObject)?;

        let name = parse_name(object)?;
        let created_at = parse_created_at(object)?;
        let order = Self::new(name, created_at)?;

        match policy {
            IdPolicy::Ignored => Ok(order),
            IdPolicy::Required => Ok(order.with_id(parse_id(object)?)),
        }
    }

    /// Build an order from a row read with [`Order::COLUMNS`].
    ///
    /// Stored rows are taken as they are: only column types and the id are
    /// checked, not the payload rules for `name`.
    pub fn from_row(row: &Row) -> Result<Self, ValidationError> {
        let id = row
            .get(ID_COLUMN)
            .and_then(TypedValue::as_uint64)
            .ok_or(ValidationError::ColumnType {
                column: ID_COLUMN,
                expected: ColumnType::Uint64,
            })?;
        let name = row
            .get(NAME_COLUMN)
            .and_then(TypedValue::as_utf8)
            .ok_or(ValidationError::ColumnType {
                column: NAME_COLUMN,
                expected: ColumnType::Utf8,
            })?;
        let created_at = row
            .get(CREATED_AT_COLUMN)
            .and_then(TypedValue::as_timestamp)
            .ok_or(ValidationError::ColumnType {
                column: CREATED_AT_COLUMN,
                expected: ColumnType::Timestamp,
            })?;

        Ok(Self {
            id: Some(OrderId::new(id)?),
            name: name.to_string(),
            created_at,
        })
    }

    /// Store-assigned id, if the order has been stored.
    #[must_use]
    pub const fn id(&self) -> Option<OrderId> {
        self.id
    }

    /// Order name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Name as a bindable `Utf8` value.
    #[must_use]
    pub fn name_value(&self) -> TypedValue {
        TypedValue::utf8(self.name.clone())
    }

    /// Creation time as a bindable `Timestamp` value.
    #[must_use]
    pub const fn created_at_value(&self) -> TypedValue {
        TypedValue::timestamp(self.created_at)
    }
}

fn parse_name(object: &Map<String, Value>) -> Result<String, ValidationError> {
    match object.get("name") {
        None | Some(Value::Null) => Err(ValidationError::MissingField("name")),
        Some(Value::String(name)) => Ok(name.clone()),
        Some(_) => Err(ValidationError::WrongType {
            field: "name",
            expected: "a string",
        }),
    }
}

fn parse_created_at(object: &Map<String, Value>) -> Result<DateTime<Utc>, ValidationError> {
    match object.get("createdAt") {
        None | Some(Value::Null) => Err(ValidationError::MissingField("createdAt")),
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| ValidationError::InvalidTimestamp(format!("{raw}: {e}"))),
        Some(Value::Number(millis)) => millis
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| ValidationError::InvalidTimestamp(millis.to_string())),
        Some(_) => Err(ValidationError::WrongType {
            field: "createdAt",
            expected: "an RFC 3339 string or epoch milliseconds",
        }),
    }
}

fn parse_id(object: &Map<String, Value>) -> Result<OrderId, ValidationError> {
    match object.get("id") {
        None | Some(Value::Null) => Err(ValidationError::MissingField("id")),
        Some(Value::Number(number)) => number
            .as_u64()
            .ok_or_else(|| ValidationError::InvalidId(number.to_string()))
            .and_then(OrderId::new),
        Some(Value::String(raw)) => OrderId::parse(raw),
        Some(_) => Err(ValidationError::WrongType {
            field: "id",
            expected: "a positive integer",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn new_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn payload_without_id_for_create() {
        let payload = json!({"name": "Widget", "createdAt": "2024-01-01T00:00:00Z"});
        let order = Order::from_payload(&payload, IdPolicy::Ignored).unwrap();

        assert_eq!(order.id(), None);
        assert_eq!(order.name(), "Widget");
        assert_eq!(order.created_at(), new_year());
    }

    #[test]
    fn create_drops_client_supplied_id() {
        let payload = json!({"id": 99, "name": "Widget", "createdAt": "2024-01-01T00:00:00Z"});
        let order = Order::from_payload(&payload, IdPolicy::Ignored).unwrap();
        assert_eq!(order.id(), None);
    }

    #[test]
    fn update_requires_id() {
        let payload = json!({"name": "B", "createdAt": "2024-01-01T00:00:00Z"});
        let err = Order::from_payload(&payload, IdPolicy::Required).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("id"));
    }

    #[test]
    fn id_accepts_number_and_string() {
        let numeric = json!({"id": 5, "name": "B", "createdAt": "2024-01-01T00:00:00Z"});
        let textual = json!({"id": "5", "name": "B", "createdAt": "2024-01-01T00:00:00Z"});

        let a = Order::from_payload(&numeric, IdPolicy::Required).unwrap();
        let b = Order::from_payload(&textual, IdPolicy::Required).unwrap();
        assert_eq!(a.id(), Some(OrderId::new(5).unwrap()));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_and_negative_ids_are_rejected() {
        for id in [json!(0), json!(-3), json!("0"), json!(1.5)] {
            let payload = json!({"id": id, "name": "B", "createdAt": "2024-01-01T00:00:00Z"});
            assert!(matches!(
                Order::from_payload(&payload, IdPolicy::Required),
                Err(ValidationError::InvalidId(_))
            ));
        }
    }

    #[test]
    fn missing_name_and_created_at() {
        let no_name = json!({"createdAt": "2024-01-01T00:00:00Z"});
        let no_ts = json!({"name": "Widget"});
        let null_name = json!({"name": null, "createdAt": "2024-01-01T00:00:00Z"});

        assert_eq!(
            Order::from_payload(&no_name, IdPolicy::Ignored).unwrap_err(),
            ValidationError::MissingField("name")
        );
        assert_eq!(
            Order::from_payload(&no_ts, IdPolicy::Ignored).unwrap_err(),
            ValidationError::MissingField("createdAt")
        );
        assert_eq!(
            Order::from_payload(&null_name, IdPolicy::Ignored).unwrap_err(),
            ValidationError::MissingField("name")
        );
    }

    #[test]
    fn wrong_shapes() {
        let numeric_name = json!({"name": 12, "createdAt": "2024-01-01T00:00:00Z"});
        let blank_name = json!({"name": "   ", "createdAt": "2024-01-01T00:00:00Z"});
        let bad_ts = json!({"name": "A", "createdAt": "yesterday"});
        let bool_ts = json!({"name": "A", "createdAt": true});

        assert!(matches!(
            Order::from_payload(&numeric_name, IdPolicy::Ignored),
            Err(ValidationError::WrongType { field: "name", .. })
        ));
        assert_eq!(
            Order::from_payload(&blank_name, IdPolicy::Ignored).unwrap_err(),
            ValidationError::EmptyName
        );
        assert!(matches!(
            Order::from_payload(&bad_ts, IdPolicy::Ignored),
            Err(ValidationError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            Order::from_payload(&bool_ts, IdPolicy::Ignored),
            Err(ValidationError::WrongType { field: "createdAt", .. })
        ));
        assert_eq!(
            Order::from_payload(&json!(["A"]), IdPolicy::Ignored).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn created_at_from_epoch_millis() {
        let payload = json!({"name": "A", "createdAt": 1_704_067_200_000_i64});
        let order = Order::from_payload(&payload, IdPolicy::Ignored).unwrap();
        assert_eq!(order.created_at(), new_year());
    }

    #[test]
    fn offset_timestamps_normalize_to_utc() {
        let payload = json!({"name": "A", "createdAt": "2024-01-01T03:00:00+03:00"});
        let order = Order::from_payload(&payload, IdPolicy::Ignored).unwrap();
        assert_eq!(order.created_at(), new_year());
    }

    #[test]
    fn row_mapping() {
        let row = Row::default()
            .with(ID_COLUMN, TypedValue::uint64(3))
            .with(NAME_COLUMN, TypedValue::utf8("Widget"))
            .with(CREATED_AT_COLUMN, TypedValue::timestamp(new_year()));

        let order = Order::from_row(&row).unwrap();
        assert_eq!(order.id(), Some(OrderId::new(3).unwrap()));
        assert_eq!(order.name_value(), TypedValue::utf8("Widget"));
        assert_eq!(order.created_at_value(), TypedValue::timestamp(new_year()));
    }

    #[test]
    fn stored_blank_name_is_kept() {
        let row = Row::default()
            .with(ID_COLUMN, TypedValue::uint64(4))
            .with(NAME_COLUMN, TypedValue::utf8(""))
            .with(CREATED_AT_COLUMN, TypedValue::timestamp(new_year()));

        let order = Order::from_row(&row).unwrap();
        assert_eq!(order.name(), "");
        assert_eq!(order.id(), Some(OrderId::new(4).unwrap()));
    }

    #[test]
    fn stored_zero_id_is_rejected() {
        let row = Row::default()
            .with(ID_COLUMN, TypedValue::uint64(0))
            .with(NAME_COLUMN, TypedValue::utf8("Widget"))
            .with(CREATED_AT_COLUMN, TypedValue::timestamp(new_year()));

        assert_eq!(
            Order::from_row(&row).unwrap_err(),
            ValidationError::InvalidId("0".to_string())
        );
    }

    #[test]
    fn row_with_wrong_column_type() {
        let row = Row::default()
            .with(ID_COLUMN, TypedValue::utf8("3"))
            .with(NAME_COLUMN, TypedValue::utf8("Widget"))
            .with(CREATED_AT_COLUMN, TypedValue::timestamp(new_year()));

        assert_eq!(
            Order::from_row(&row).unwrap_err(),
            ValidationError::ColumnType {
                column: ID_COLUMN,
                expected: ColumnType::Uint64,
            }
        );
    }

    #[test]
    fn serializes_camel_case_without_missing_id() {
        let order = Order::new("Widget", new_year()).unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["name"], "Widget");
        let created: DateTime<Utc> = json["createdAt"].as_str().unwrap().parse().unwrap();
        assert_eq!(created, new_year());

        let stored = order.with_id(OrderId::new(8).unwrap());
        assert_eq!(serde_json::to_value(&stored).unwrap()["id"], 8);
    }

    #[test]
    fn order_id_parse() {
        assert_eq!(OrderId::parse(" 42 ").unwrap().get(), 42);
        assert!(OrderId::parse("").is_err());
        assert!(OrderId::parse("abc").is_err());
        assert!(OrderId::parse("0").is_err());
        assert!(OrderId::parse("-1").is_err());
        assert_eq!("7".parse::<OrderId>().unwrap().to_string(), "7");
    }

    #[test]
    fn store_key_range() {
        assert!(OrderId::new(1).unwrap().fits_store_key());
        assert!(OrderId::new(OrderId::MAX_STORED).unwrap().fits_store_key());
        assert!(!OrderId::new(OrderId::MAX_STORED + 1).unwrap().fits_store_key());
        assert!(!OrderId::new(u64::MAX).unwrap().fits_store_key());
    }

    proptest::proptest! {
        #[test]
        fn every_positive_id_round_trips_through_text(raw in 1u64..=u64::MAX) {
            let id = OrderId::parse(&raw.to_string()).unwrap();
            proptest::prop_assert_eq!(id.get(), raw);
        }
    }
}
