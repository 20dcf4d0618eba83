//! Response envelope.
//!
//! Every function answers `{"statusCode": <u16>, "body": <json>}`.

use serde::Serialize;

use crate::domain::Order;

/// `201 Created`
pub const CREATED: u16 = 201;
/// `200 OK`
pub const OK: u16 = 200;
/// `400 Bad Request`
pub const BAD_REQUEST: u16 = 400;
/// `404 Not Found`
pub const NOT_FOUND: u16 = 404;
/// `405 Method Not Allowed`
pub const METHOD_NOT_ALLOWED: u16 = 405;
/// `500 Internal Server Error`
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Response body shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// `{"message": ...}`
    Message {
        /// Status text.
        message: String,
    },
    /// `{"error": ...}`
    Error {
        /// Error text.
        error: String,
    },
    /// `{"message": ..., "order": {...}}`
    Order {
        /// Status text.
        message: String,
        /// Affected order.
        order: Order,
    },
    /// `[{...}, ...]`
    Orders(Vec<Order>),
}

/// Response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response body.
    pub body: ResponseBody,
}

impl HttpResponse {
    fn message(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: ResponseBody::Message {
                message: message.to_string(),
            },
        }
    }

    fn error(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            body: ResponseBody::Error {
                error: error.into(),
            },
        }
    }

    fn with_order(status_code: u16, message: &str, order: Order) -> Self {
        Self {
            status_code,
            body: ResponseBody::Order {
                message: message.to_string(),
                order,
            },
        }
    }

    /// `201 {"message":"Created","order":...}`
    #[must_use]
    pub fn created(order: Order) -> Self {
        Self::with_order(CREATED, "Created", order)
    }

    /// `200 {"message":"OK","order":...}`
    #[must_use]
    pub fn ok_order(order: Order) -> Self {
        Self::with_order(OK, "OK", order)
    }

    /// `200 {"message":"OK"}`
    #[must_use]
    pub fn ok_message() -> Self {
        Self::message(OK, "OK")
    }

    /// `200 [order, ...]`
    #[must_use]
    pub const fn orders(orders: Vec<Order>) -> Self {
        Self {
            status_code: OK,
            body: ResponseBody::Orders(orders),
        }
    }

    /// `405 {"message":"Method not allowed"}`
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::message(METHOD_NOT_ALLOWED, "Method not allowed")
    }

    /// `400 {"error":"Bad request"}`
    #[must_use]
    pub fn bad_request() -> Self {
        Self::error(BAD_REQUEST, "Bad request")
    }

    /// `400 {"error":<reason>}`
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::error(BAD_REQUEST, reason)
    }

    /// `404 {"error":"Order not found"}`
    #[must_use]
    pub fn not_found() -> Self {
        Self::error(NOT_FOUND, "Order not found")
    }

    /// `500 {"error":"Internal server error"}`
    #[must_use]
    pub fn internal_error() -> Self {
        Self::error(INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::domain::OrderId;

    #[test]
    fn created_envelope() {
        let order = Order::new("A", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .unwrap()
            .with_id(OrderId::new(1).unwrap());

        assert_eq!(
            serde_json::to_value(HttpResponse::created(order)).unwrap(),
            json!({
                "statusCode": 201,
                "body": {
                    "message": "Created",
                    "order": {"id": 1, "name": "A", "createdAt": "2024-01-01T00:00:00Z"}
                }
            })
        );
    }

    #[test]
    fn list_body_is_bare_array() {
        assert_eq!(
            serde_json::to_value(HttpResponse::orders(Vec::new())).unwrap(),
            json!({"statusCode": 200, "body": []})
        );
    }

    #[test]
    fn status_envelopes() {
        assert_eq!(
            serde_json::to_value(HttpResponse::method_not_allowed()).unwrap(),
            json!({"statusCode": 405, "body": {"message": "Method not allowed"}})
        );
        assert_eq!(
            serde_json::to_value(HttpResponse::bad_request()).unwrap(),
            json!({"statusCode": 400, "body": {"error": "Bad request"}})
        );
        assert_eq!(
            serde_json::to_value(HttpResponse::internal_error()).unwrap(),
            json!({"statusCode": 500, "body": {"error": "Internal server error"}})
        );
        assert!(HttpResponse::ok_message().is_success());
        assert!(!HttpResponse::not_found().is_success());
    }
}
